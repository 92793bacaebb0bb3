//! Position sources.
//!
//! The platform positioning service is an external collaborator. This module
//! defines its interface and ships one in-process implementation.
//!
//! # Components
//!
//! - [`state`] - `Coordinate`, `PositionStatus`, `PositionEvent`
//! - [`source`] - `PositionSource` and `PositionSourceFactory` traits
//! - [`simulated`] - `SimulatedSource` replaying a track
//! - [`geo`] - Great-circle distance

pub mod geo;
mod simulated;
mod source;
mod state;

pub use simulated::{SimulatedSource, SimulatedSourceConfig, SimulatedSourceFactory};
pub use source::{PositionSource, PositionSourceFactory, SourceError, SourceParams};
pub use state::{Coordinate, PositionEvent, PositionStatus};
