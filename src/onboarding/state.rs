//! Onboarding Wizard State
//!
//! Owns the current step, the accumulated profile fields and catalog
//! selection, the in-flight submission guard and the open/closing/closed
//! dialog lifecycle. Every mutation of wizard state goes through here.

use super::catalog::{CatalogPanel, Selection};
use super::step::OnboardingStep;
use super::submission::{SubmissionCoordinator, SubmissionReport};
use crate::error::{HubError, Result};
use crate::services::CatalogItem;
use serde::Serialize;
use std::time::{Duration, Instant};

/// Delay between hiding the dialog and resetting its contents
pub const DEFAULT_RESET_DELAY: Duration = Duration::from_millis(300);

/// Free-text profile fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKey {
    Name,
    Phone,
    Email,
    WelcomeMessage,
    Ideas,
}

impl FieldKey {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "Your Name *",
            Self::Phone => "Phone Number (for the group chat)",
            Self::Email => "Email (optional)",
            Self::WelcomeMessage => "Your message",
            Self::Ideas => "Your ideas",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            Self::Name => "How should neighbors know you?",
            Self::Phone => "We'll add you to the group",
            Self::Email => "For occasional block updates",
            Self::WelcomeMessage => "Hi! I just moved to the block...",
            Self::Ideas => "I'd love it if we had...",
        }
    }

    /// Whether a value is needed before the wizard can be submitted
    pub fn is_required(&self) -> bool {
        matches!(self, Self::Name)
    }
}

/// One interactive element on a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepInput {
    Text(FieldKey),
    GroupChatToggle,
}

/// Inputs shown on `step`, in focus order
pub fn step_inputs(step: OnboardingStep) -> &'static [StepInput] {
    match step {
        OnboardingStep::GroupInvite => &[
            StepInput::Text(FieldKey::Name),
            StepInput::Text(FieldKey::Phone),
            StepInput::Text(FieldKey::Email),
            StepInput::GroupChatToggle,
        ],
        OnboardingStep::Message => &[StepInput::Text(FieldKey::WelcomeMessage)],
        OnboardingStep::Ideas => &[StepInput::Text(FieldKey::Ideas)],
        OnboardingStep::Welcome | OnboardingStep::CatalogPick | OnboardingStep::Complete => &[],
    }
}

/// Profile attributes collected across the wizard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NeighborProfile {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub wants_group_chat: bool,
    pub welcome_message: String,
    pub ideas: String,
}

impl Default for NeighborProfile {
    fn default() -> Self {
        Self {
            name: String::new(),
            phone: String::new(),
            email: String::new(),
            wants_group_chat: true,
            welcome_message: String::new(),
            ideas: String::new(),
        }
    }
}

impl NeighborProfile {
    pub fn get(&self, key: FieldKey) -> &str {
        match key {
            FieldKey::Name => &self.name,
            FieldKey::Phone => &self.phone,
            FieldKey::Email => &self.email,
            FieldKey::WelcomeMessage => &self.welcome_message,
            FieldKey::Ideas => &self.ideas,
        }
    }

    pub fn get_mut(&mut self, key: FieldKey) -> &mut String {
        match key {
            FieldKey::Name => &mut self.name,
            FieldKey::Phone => &mut self.phone,
            FieldKey::Email => &mut self.email,
            FieldKey::WelcomeMessage => &mut self.welcome_message,
            FieldKey::Ideas => &mut self.ideas,
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.trim()
    }

    pub fn has_display_name(&self) -> bool {
        !self.display_name().is_empty()
    }
}

/// Blocking notice shown to the user (validation or primary-write failure)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
}

impl Notice {
    fn name_required() -> Self {
        Self {
            title: "Name required".to_string(),
            description: "Please enter your name to continue.".to_string(),
        }
    }

    fn submission_failed() -> Self {
        Self {
            title: "Error".to_string(),
            description: "Something went wrong. Please try again.".to_string(),
        }
    }
}

/// Dialog lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Not shown; state is at its initial values
    Closed,
    Open,
    /// Hidden, waiting for the reset delay to elapse
    Closing { since: Instant },
}

/// Snapshot handed to the submission coordinator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRequest {
    /// Dialog session the request was started in
    pub session: u64,
    pub profile: NeighborProfile,
    pub selected_ids: Vec<String>,
}

/// Main onboarding wizard state
#[derive(Debug, Clone)]
pub struct OnboardingWizard {
    pub step: OnboardingStep,
    pub profile: NeighborProfile,
    selected: Selection,
    submission_in_flight: bool,

    pub catalog: CatalogPanel,

    // Navigation
    pub focused_field: usize,
    pub notice: Option<Notice>,

    lifecycle: Lifecycle,
    session: u64,
    reset_delay: Duration,
}

impl Default for OnboardingWizard {
    fn default() -> Self {
        Self::new(DEFAULT_RESET_DELAY)
    }
}

impl OnboardingWizard {
    /// Create a closed wizard with the given close-to-reset delay
    pub fn new(reset_delay: Duration) -> Self {
        Self {
            step: OnboardingStep::first(),
            profile: NeighborProfile::default(),
            selected: Selection::new(),
            submission_in_flight: false,
            catalog: CatalogPanel::new(),
            focused_field: 0,
            notice: None,
            lifecycle: Lifecycle::Closed,
            session: 0,
            reset_delay,
        }
    }

    // --- Lifecycle ---

    /// Show the wizard, starting a new dialog session. Returns the session number.
    pub fn open(&mut self) -> u64 {
        if matches!(self.lifecycle, Lifecycle::Closing { .. }) {
            self.reset();
        }
        if self.lifecycle != Lifecycle::Open {
            self.session += 1;
            self.lifecycle = Lifecycle::Open;
            tracing::debug!(session = self.session, "Wizard opened");
        }
        self.session
    }

    /// Hide the wizard now; contents are reset once the delay has passed
    pub fn close(&mut self, now: Instant) {
        if self.lifecycle == Lifecycle::Open {
            self.lifecycle = Lifecycle::Closing { since: now };
            tracing::debug!(session = self.session, "Wizard closing");
        }
    }

    /// Complete a pending reset if the delay has elapsed. Returns true when a reset happened.
    pub fn poll_reset(&mut self, now: Instant) -> bool {
        if let Lifecycle::Closing { since } = self.lifecycle
            && now.saturating_duration_since(since) >= self.reset_delay
        {
            self.reset();
            return true;
        }
        false
    }

    fn reset(&mut self) {
        self.step = OnboardingStep::first();
        self.profile = NeighborProfile::default();
        self.selected.clear();
        self.submission_in_flight = false;
        self.catalog = CatalogPanel::new();
        self.focused_field = 0;
        self.notice = None;
        self.lifecycle = Lifecycle::Closed;
        tracing::debug!(session = self.session, "Wizard reset");
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_visible(&self) -> bool {
        self.lifecycle == Lifecycle::Open
    }

    pub fn session(&self) -> u64 {
        self.session
    }

    pub fn reset_delay(&self) -> Duration {
        self.reset_delay
    }

    // --- Navigation ---

    pub fn can_advance(&self) -> bool {
        !self.step.is_terminal() && !self.step.is_submit_step()
    }

    pub fn can_retreat(&self) -> bool {
        self.step.previous().is_some() && !self.step.is_terminal() && !self.submission_in_flight
    }

    /// Move to the next step. The terminal step is only reached through `submit`.
    pub fn advance(&mut self) -> bool {
        if !self.can_advance() {
            return false;
        }
        match self.step.next() {
            Some(next) => {
                self.enter_step(next);
                true
            }
            None => false,
        }
    }

    /// Move back one step; entered values are kept
    pub fn retreat(&mut self) -> bool {
        if !self.can_retreat() {
            return false;
        }
        match self.step.previous() {
            Some(prev) => {
                self.enter_step(prev);
                true
            }
            None => false,
        }
    }

    fn enter_step(&mut self, step: OnboardingStep) {
        self.step = step;
        self.focused_field = 0;
        self.notice = None;
    }

    /// Inputs on the current step
    pub fn inputs(&self) -> &'static [StepInput] {
        step_inputs(self.step)
    }

    pub fn focused_input(&self) -> Option<StepInput> {
        self.inputs().get(self.focused_field).copied()
    }

    pub fn focus_next(&mut self) {
        let n = self.inputs().len();
        if n > 0 {
            self.focused_field = (self.focused_field + 1) % n;
        }
    }

    pub fn focus_prev(&mut self) {
        let n = self.inputs().len();
        if n > 0 {
            self.focused_field = (self.focused_field + n - 1) % n;
        }
    }

    // --- Fields ---

    /// Replace one text field
    pub fn update_field(&mut self, key: FieldKey, value: impl Into<String>) {
        *self.profile.get_mut(key) = value.into();
    }

    pub fn set_wants_group_chat(&mut self, wants: bool) {
        self.profile.wants_group_chat = wants;
    }

    // --- Catalog selection ---

    /// Install the catalog fetched for `session`; stale results are dropped
    pub fn set_catalog(&mut self, session: u64, items: Vec<CatalogItem>) -> bool {
        if session != self.session || !self.is_visible() {
            tracing::debug!(session, current = self.session, "Dropping stale catalog");
            return false;
        }
        self.selected.retain(|id| items.iter().any(|item| &item.id == id));
        self.catalog.set_items(items);
        true
    }

    pub fn toggle_catalog_item(&mut self, id: &str) -> Option<bool> {
        self.catalog.toggle(&mut self.selected, id)
    }

    pub fn toggle_highlighted_item(&mut self) -> Option<bool> {
        self.catalog.toggle_highlighted(&mut self.selected)
    }

    pub fn selected_ids(&self) -> &Selection {
        &self.selected
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    // --- Submission ---

    pub fn is_submitting(&self) -> bool {
        self.submission_in_flight
    }

    /// Whether the submit control should be enabled
    pub fn can_submit(&self) -> bool {
        self.step.is_submit_step() && !self.submission_in_flight && self.profile.has_display_name()
    }

    /// Start a submission.
    ///
    /// Returns `Ok(None)` when a submission is already in flight or the wizard
    /// has already completed, and a validation error (also recorded as the blocking notice) when the name
    /// is empty. Otherwise marks the submission in flight and returns the
    /// snapshot to hand to the coordinator.
    pub fn begin_submit(&mut self) -> Result<Option<SubmissionRequest>> {
        if self.submission_in_flight {
            tracing::debug!(session = self.session, "Submission already in flight");
            return Ok(None);
        }
        if self.step.is_terminal() {
            tracing::debug!(session = self.session, "Wizard already completed");
            return Ok(None);
        }
        if !self.profile.has_display_name() {
            self.notice = Some(Notice::name_required());
            return Err(HubError::Validation("display name is required".to_string()));
        }

        self.submission_in_flight = true;
        self.notice = None;
        Ok(Some(SubmissionRequest {
            session: self.session,
            profile: self.profile.clone(),
            selected_ids: self.selected.iter().cloned().collect(),
        }))
    }

    /// Apply the coordinator's result. Results from an earlier session are ignored.
    pub fn finish_submit(&mut self, session: u64, outcome: &Result<SubmissionReport>) -> bool {
        if session != self.session || !self.submission_in_flight {
            tracing::warn!(
                session,
                current = self.session,
                "Ignoring submission result for a closed wizard session"
            );
            return false;
        }

        self.submission_in_flight = false;
        match outcome {
            Ok(report) => {
                if report.failed_claims() > 0 {
                    tracing::warn!(
                        failed = report.failed_claims(),
                        "Some catalog claims were not saved"
                    );
                }
                self.enter_step(OnboardingStep::terminal());
            }
            Err(e) => {
                tracing::error!(error = %e, code = e.code(), "Submission failed");
                self.notice = Some(Notice::submission_failed());
            }
        }
        true
    }

    /// Validate, run the coordinator and apply its outcome in one call.
    ///
    /// Returns `Ok(None)` if a submission was already in flight or done.
    pub async fn submit(
        &mut self,
        coordinator: &SubmissionCoordinator,
    ) -> Result<Option<SubmissionReport>> {
        let Some(request) = self.begin_submit()? else {
            return Ok(None);
        };

        let outcome = coordinator.run(&request).await;
        self.finish_submit(request.session, &outcome);
        outcome.map(Some)
    }
}
