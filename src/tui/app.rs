//! TUI Application State
//!
//! Home screen plus the onboarding dialog. Catalog fetches and submissions
//! run on spawned tasks and report back as events tagged with the dialog
//! session they belong to.

use super::events::{EventHandler, TuiEvent, keys};
use super::onboarding::WizardAction;
use super::render;
use crate::config::Config;
use crate::onboarding::{
    CatalogPanel, OnboardingWizard, SubmissionCoordinator, SubmissionReport, SubmissionRequest,
};
use crate::services::Services;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use std::time::Instant;
use tokio::sync::mpsc;

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Landing screen
    Home,
    /// Onboarding dialog on top of the home screen
    Onboarding,
}

pub struct App {
    pub mode: AppMode,
    pub wizard: OnboardingWizard,
    /// One-line status shown on the home screen
    pub status: Option<String>,
    pub should_quit: bool,

    services: Services,
    coordinator: SubmissionCoordinator,
    catalog_name: String,
    event_tx: mpsc::UnboundedSender<TuiEvent>,
}

impl App {
    pub fn new(services: Services, config: &Config, event_tx: mpsc::UnboundedSender<TuiEvent>) -> Self {
        let coordinator =
            SubmissionCoordinator::new(services.store.clone(), services.notifier.clone())
                .with_targets(config.collections.submission_targets());

        Self {
            mode: AppMode::Home,
            wizard: OnboardingWizard::new(config.wizard.reset_delay()),
            status: None,
            should_quit: false,
            services,
            coordinator,
            catalog_name: config.collections.catalog.clone(),
            event_tx,
        }
    }

    /// Show the dialog and start fetching the catalog for the new session
    pub fn open_wizard(&mut self) {
        let session = self.wizard.open();
        self.mode = AppMode::Onboarding;
        self.status = None;

        let catalog = self.services.catalog.clone();
        let name = self.catalog_name.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let items = CatalogPanel::fetch(catalog.as_ref(), &name).await;
            let _ = tx.send(TuiEvent::CatalogLoaded { session, items });
        });
    }

    fn spawn_submission(&self, request: SubmissionRequest) {
        let coordinator = self.coordinator.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = coordinator.run(&request).await;
            let _ = tx.send(TuiEvent::SubmissionFinished {
                session: request.session,
                result,
            });
        });
    }

    pub fn handle_event(&mut self, event: TuiEvent) {
        match event {
            TuiEvent::Key(key) => self.handle_key_event(key),
            TuiEvent::Tick => {
                self.wizard.poll_reset(Instant::now());
            }
            TuiEvent::CatalogLoaded { session, items } => {
                self.wizard.set_catalog(session, items);
            }
            TuiEvent::SubmissionFinished { session, result } => {
                self.apply_submission(session, result);
            }
            TuiEvent::Quit => {
                self.should_quit = true;
            }
            TuiEvent::Resize(_, _) => {
                // handled by the next draw
            }
        }
    }

    fn apply_submission(&mut self, session: u64, result: crate::error::Result<SubmissionReport>) {
        if !self.wizard.finish_submit(session, &result) {
            return;
        }
        if let Ok(report) = &result {
            tracing::info!(
                signup = ?report.signup_id,
                claims = report.claims.len(),
                failed_claims = report.failed_claims(),
                notified = report.notification_sent(),
                "Signup submitted"
            );
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        match self.mode {
            AppMode::Home => {
                if keys::is_quit(&key) || key.code == KeyCode::Char('q') {
                    self.should_quit = true;
                } else if key.code == KeyCode::Char('n') {
                    self.open_wizard();
                }
            }
            AppMode::Onboarding => match self.wizard.handle_key(key, Instant::now()) {
                WizardAction::None => {}
                WizardAction::Submit(request) => self.spawn_submission(request),
                WizardAction::Close => {
                    if self.wizard.step.is_terminal() {
                        self.status = Some(format!(
                            "Welcome to the block, {}!",
                            self.wizard.profile.display_name()
                        ));
                    }
                    self.mode = AppMode::Home;
                }
                WizardAction::Quit => self.should_quit = true,
            },
        }
    }

    /// Run the app until the user quits
    pub async fn run(mut self, mut events: EventHandler) -> Result<()> {
        use crossterm::execute;
        use crossterm::terminal::{
            EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
        };
        use ratatui::Terminal;
        use ratatui::backend::CrosstermBackend;

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

        EventHandler::start_terminal_listener(events.sender());

        let result = async {
            while !self.should_quit {
                terminal.draw(|f| render::render(f, &self))?;
                match events.next().await {
                    Some(event) => self.handle_event(event),
                    None => break,
                }
            }
            Ok::<(), anyhow::Error>(())
        }
        .await;

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }
}
