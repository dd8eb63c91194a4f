//! Command implementations for the wtx-tools CLI.

pub mod encode;
pub mod inspect;
pub mod json_output;
pub mod panel;
pub mod spec;
