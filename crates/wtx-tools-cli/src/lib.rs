//! wtx-tools CLI library.
//!
//! This crate provides the command implementations behind the `wtx-tools`
//! binary, plus style-file loading and log setup.

pub mod commands;
pub mod config;
pub mod logging;
