//! Keyboard handling for the onboarding dialog

use super::events::keys;
use crate::onboarding::{OnboardingStep, OnboardingWizard, StepInput, SubmissionRequest};
use crossterm::event::KeyEvent;
use std::time::Instant;

/// What the app loop should do after a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardAction {
    /// Nothing special
    None,
    /// Run the coordinator on this snapshot
    Submit(SubmissionRequest),
    /// The dialog was closed (Esc on the first step, or "Start Exploring")
    Close,
    /// Leave the application
    Quit,
}

impl OnboardingWizard {
    /// Handle key events for the current step
    pub fn handle_key(&mut self, event: KeyEvent, now: Instant) -> WizardAction {
        if keys::is_quit(&event) {
            return WizardAction::Quit;
        }

        if keys::is_cancel(&event) {
            if self.step == OnboardingStep::first() || self.step.is_terminal() {
                self.close(now);
                return WizardAction::Close;
            }
            self.retreat();
            return WizardAction::None;
        }

        if keys::is_enter(&event) {
            return self.primary_action(now);
        }

        if keys::is_next_field(&event) {
            self.focus_next();
        } else if keys::is_prev_field(&event) {
            self.focus_prev();
        } else if self.step == OnboardingStep::CatalogPick {
            self.handle_catalog_key(&event);
        } else {
            self.handle_input_key(&event);
        }
        WizardAction::None
    }

    fn primary_action(&mut self, now: Instant) -> WizardAction {
        if self.step.is_terminal() {
            self.close(now);
            return WizardAction::Close;
        }
        if self.step.is_submit_step() {
            return match self.begin_submit() {
                Ok(Some(request)) => WizardAction::Submit(request),
                Ok(None) => WizardAction::None,
                Err(e) => {
                    tracing::debug!(error = %e, "Submit refused");
                    WizardAction::None
                }
            };
        }
        self.advance();
        WizardAction::None
    }

    fn handle_catalog_key(&mut self, event: &KeyEvent) {
        if keys::is_up(event) {
            self.catalog.cursor_up();
        } else if keys::is_down(event) {
            self.catalog.cursor_down();
        } else if keys::is_toggle(event) {
            self.toggle_highlighted_item();
        }
    }

    fn handle_input_key(&mut self, event: &KeyEvent) {
        match self.focused_input() {
            Some(StepInput::GroupChatToggle) => {
                if keys::is_toggle(event) {
                    let wants = !self.profile.wants_group_chat;
                    self.set_wants_group_chat(wants);
                }
            }
            Some(StepInput::Text(key)) => {
                let mut value = self.profile.get(key).to_string();
                if keys::is_backspace(event) {
                    value.pop();
                } else if let Some(c) = keys::typed_char(event) {
                    value.push(c);
                } else {
                    return;
                }
                self.update_field(key, value);
                self.notice = None;
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::onboarding::{FieldKey, Lifecycle};
    use crate::services::CatalogItem;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn type_text(wizard: &mut OnboardingWizard, text: &str) {
        for c in text.chars() {
            wizard.handle_key(key(KeyCode::Char(c)), Instant::now());
        }
    }

    fn open_wizard() -> OnboardingWizard {
        let mut wizard = OnboardingWizard::default();
        wizard.open();
        wizard
    }

    #[test]
    fn test_esc_on_first_step_closes() {
        let mut wizard = open_wizard();
        let action = wizard.handle_key(key(KeyCode::Esc), Instant::now());
        assert_eq!(action, WizardAction::Close);
        assert!(matches!(wizard.lifecycle(), Lifecycle::Closing { .. }));
    }

    #[test]
    fn test_esc_goes_back() {
        let mut wizard = open_wizard();
        wizard.handle_key(key(KeyCode::Enter), Instant::now());
        assert_eq!(wizard.step, OnboardingStep::GroupInvite);

        let action = wizard.handle_key(key(KeyCode::Esc), Instant::now());
        assert_eq!(action, WizardAction::None);
        assert_eq!(wizard.step, OnboardingStep::Welcome);
        assert!(wizard.is_visible());
    }

    #[test]
    fn test_typing_fills_focused_field() {
        let mut wizard = open_wizard();
        wizard.handle_key(key(KeyCode::Enter), Instant::now());

        type_text(&mut wizard, "Ashaa");
        wizard.handle_key(key(KeyCode::Backspace), Instant::now());
        wizard.handle_key(key(KeyCode::Tab), Instant::now());
        type_text(&mut wizard, "555 0100");

        assert_eq!(wizard.profile.name, "Asha");
        assert_eq!(wizard.profile.phone, "555 0100");
    }

    #[test]
    fn test_space_toggles_group_chat() {
        let mut wizard = open_wizard();
        wizard.handle_key(key(KeyCode::Enter), Instant::now());
        wizard.handle_key(key(KeyCode::BackTab), Instant::now());
        assert_eq!(wizard.focused_input(), Some(StepInput::GroupChatToggle));

        wizard.handle_key(key(KeyCode::Char(' ')), Instant::now());
        assert!(!wizard.profile.wants_group_chat);
    }

    #[test]
    fn test_catalog_keys_toggle_highlighted() {
        let mut wizard = open_wizard();
        wizard.handle_key(key(KeyCode::Enter), Instant::now());
        wizard.handle_key(key(KeyCode::Enter), Instant::now());
        assert_eq!(wizard.step, OnboardingStep::CatalogPick);

        let items = ["coupon-1", "coupon-42"]
            .iter()
            .map(|id| CatalogItem {
                id: id.to_string(),
                title: id.to_string(),
                description: String::new(),
                icon: String::new(),
            })
            .collect();
        wizard.set_catalog(wizard.session(), items);

        wizard.handle_key(key(KeyCode::Down), Instant::now());
        wizard.handle_key(key(KeyCode::Char(' ')), Instant::now());
        assert!(wizard.is_selected("coupon-42"));
        assert!(!wizard.is_selected("coupon-1"));
    }

    #[test]
    fn test_enter_on_ideas_submits_once() {
        let mut wizard = open_wizard();
        while wizard.advance() {}
        wizard.update_field(FieldKey::Name, "Asha");

        let first = wizard.handle_key(key(KeyCode::Enter), Instant::now());
        assert!(matches!(first, WizardAction::Submit(ref r) if r.profile.name == "Asha"));

        let second = wizard.handle_key(key(KeyCode::Enter), Instant::now());
        assert_eq!(second, WizardAction::None);
    }

    #[test]
    fn test_enter_without_name_shows_notice() {
        let mut wizard = open_wizard();
        while wizard.advance() {}

        let action = wizard.handle_key(key(KeyCode::Enter), Instant::now());
        assert_eq!(action, WizardAction::None);
        assert!(wizard.notice.is_some());

        type_text(&mut wizard, "x");
        assert!(wizard.notice.is_none());
    }

    #[test]
    fn test_ctrl_c_quits() {
        let mut wizard = open_wizard();
        let action = wizard.handle_key(
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            Instant::now(),
        );
        assert_eq!(action, WizardAction::Quit);
        assert!(wizard.profile.name.is_empty());
    }
}
