//! Terminal UI
//!
//! Ratatui front end for the onboarding wizard.

pub mod app;
pub mod events;
pub mod onboarding;
pub mod render;

pub use app::{App, AppMode};
pub use events::{EventHandler, TuiEvent};
pub use onboarding::WizardAction;

use crate::config::Config;
use crate::services::Services;
use anyhow::Result;

/// Start the TUI and block until the user quits
pub async fn run(config: &Config, services: Services) -> Result<()> {
    let events = EventHandler::new();
    let app = App::new(services, config, events.sender());
    app.run(events).await
}
