//! NeighborHub - New Neighbor Onboarding
//!
//! A terminal wizard that welcomes a new neighbor to the block: it collects
//! a short profile over several steps, lets them claim neighbor coupons from a
//! public catalog, and submits everything to the hosted hub backend.
//!
//! ## Quick Start
//!
//! ```bash
//! # Run the wizard against the configured backend
//! neighborhub
//!
//! # Try it without a backend
//! neighborhub --offline
//!
//! # Print the coupon catalog
//! neighborhub catalog
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod onboarding;
pub mod services;
pub mod tui;
pub mod utils;

// Re-export commonly used types
pub use error::{HubError, ServiceError};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
