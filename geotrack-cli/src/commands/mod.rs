//! CLI command implementations.
//!
//! # Command Modules
//!
//! - [`encode`] - Print the payload for a single fix
//! - [`init`] - Write a default config file
//! - [`run`] - Drive a tracking session from a command script

pub mod encode;
pub mod init;
pub mod run;
