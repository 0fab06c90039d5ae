//! # vigil-core
//!
//! Core state, polling, and timer machinery for the VIGIL dashboard.
//!
//! This crate provides:
//! - [`VigilError`] - Error types for all VIGIL operations
//! - [`logging`] - Tracing setup
//! - [`config`] - YAML configuration with defaults
//! - [`clock`] - Injectable wall-clock capability
//! - [`types`] - Entity model, health classification, history points
//! - [`state`] - The single owned dashboard state
//! - [`route`] - Fragment routing between the list and detail screens
//! - [`fetch`] - HTTP fetchers for the two backend endpoints
//! - [`history`] - Per-entity ping series with injected synthesis
//! - [`cache`] - Best-effort local history persistence
//! - [`countdown`] - Leak-proof per-element countdown timers
//! - [`sched`] - Process-lifetime polling cadences
//!
//! ## Example
//!
//! ```no_run
//! use vigil_core::{config::VigilConfig, logging, Result};
//!
//! fn main() -> Result<()> {
//!     let _guard = logging::init_logging(None, false)?;
//!     let config = VigilConfig::load(None)?;
//!     tracing::info!(status_url = %config.bot_status_url, "configured");
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod clock;
pub mod config;
pub mod countdown;
pub mod error;
pub mod fetch;
pub mod history;
pub mod logging;
pub mod route;
pub mod sched;
pub mod state;
pub mod types;

// Re-export main types for convenience
pub use error::{Result, VigilError};
pub use logging::{init_logging, LogGuard};
pub use route::Route;
pub use state::DashState;
pub use types::{Entity, EntityId, EntityKind, HealthBucket, HistoryPoint};
