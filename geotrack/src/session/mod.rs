//! Tracking session lifecycle.
//!
//! # Components
//!
//! - [`SessionController`] - Command surface and the single session it owns
//! - [`ConfigureTicket`] - An in-flight `configure`
//! - [`EventTranslator`] - Position events → host results
//! - [`ConfigPhase`] - Unconfigured / Configuring / Configured

mod controller;
mod handle;
mod state;
mod translator;

pub use controller::{ConfigureTicket, SessionController};
pub use state::ConfigPhase;
pub use translator::EventTranslator;
