//! Configuration Module
//!
//! Handles application configuration loading, validation, and management.

mod types;

pub use types::{
    BackendConfig, CollectionsConfig, Config, LoggingConfig, WizardConfig, neighborhub_home,
};
