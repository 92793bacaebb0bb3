//! geotrack - Background position tracking for host applications
//!
//! This library owns a single tracking session on behalf of a host: the host
//! configures tracking options, starts and stops the session, and receives
//! every position fix as a JSON payload on the callback it configured with.
//!
//! # High-Level API
//!
//! ```ignore
//! use std::sync::Arc;
//! use geotrack::channel::{CallbackId, ChannelSink};
//! use geotrack::command::CommandRouter;
//! use geotrack::notify::LogNotifier;
//! use geotrack::position::SimulatedSourceFactory;
//! use geotrack::session::SessionController;
//!
//! let (sink, mut results) = ChannelSink::new();
//! let sink = Arc::new(sink);
//! let controller = Arc::new(SessionController::new(
//!     Arc::new(SimulatedSourceFactory::default()),
//!     sink.clone(),
//!     Arc::new(LogNotifier),
//! ));
//! let router = CommandRouter::new(controller, sink);
//!
//! let call = CallbackId::new("cb-1");
//! router.execute("configure", r#"["","","","50","0","30","10","false"]"#, &call).await?;
//! router.execute("start", "", &CallbackId::new("cb-2")).await?;
//! ```

pub mod channel;
pub mod codec;
pub mod command;
pub mod config;
pub mod error;
pub mod logging;
pub mod notify;
pub mod options;
pub mod position;
pub mod session;

pub use error::TrackerError;

/// Version of the geotrack library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
