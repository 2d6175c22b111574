//! Step View
//!
//! Pure projection of the wizard state into what a step shows: prompt,
//! inputs, catalog rows, progress dots and which controls are enabled.
//! Holds no state and performs no validation; the terminal renderer draws
//! whatever this produces.

use super::state::{FieldKey, Notice, OnboardingWizard, StepInput};
use super::step::{OnboardingStep, STEPS};

/// Label and enablement of the main button on a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryAction {
    Next,
    Continue,
    Submit,
    Submitting,
    StartExploring,
}

impl PrimaryAction {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Next => "Next",
            Self::Continue => "Continue",
            Self::Submit => "Complete",
            Self::Submitting => "Submitting...",
            Self::StartExploring => "Start Exploring",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputView {
    Text {
        key: FieldKey,
        label: &'static str,
        value: String,
        placeholder: &'static str,
        required: bool,
        focused: bool,
    },
    Toggle {
        label: &'static str,
        checked: bool,
        focused: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRow {
    pub id: String,
    pub icon: String,
    pub title: String,
    pub description: String,
    pub selected: bool,
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogView {
    pub loading: bool,
    pub rows: Vec<CatalogRow>,
}

/// Everything needed to draw the current step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepView {
    pub step: OnboardingStep,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub body: Vec<String>,
    pub inputs: Vec<InputView>,
    pub catalog: Option<CatalogView>,
    /// One entry per non-terminal step, `true` = filled. Empty on the terminal step.
    pub indicator: Vec<bool>,
    pub back_enabled: bool,
    pub primary: PrimaryAction,
    pub primary_enabled: bool,
    pub notice: Option<Notice>,
}

/// Progress dots: filled up to and including the current step
pub fn progress_indicator(step: OnboardingStep) -> Vec<bool> {
    if step.is_terminal() {
        return Vec::new();
    }
    STEPS
        .iter()
        .filter(|s| !s.is_terminal())
        .map(|s| s.index() <= step.index())
        .collect()
}

fn body_for(wizard: &OnboardingWizard) -> Vec<String> {
    let profile = &wizard.profile;
    match wizard.step {
        OnboardingStep::Welcome => vec![
            "We're your neighbors on 48th Ave between Lincoln & Irving in San Francisco's \
             Outer Sunset. This hub helps us share resources, plan parties, and look out \
             for each other."
                .to_string(),
        ],
        OnboardingStep::GroupInvite => vec!["Totally optional. You can always join later!".to_string()],
        OnboardingStep::CatalogPick => vec![
            "Claim one and our block steward will make an intro.".to_string(),
        ],
        OnboardingStep::Message => vec![
            "Questions, ideas, anything on your mind!".to_string(),
        ],
        OnboardingStep::Ideas => vec![
            "Events, shared resources, traditions?".to_string(),
        ],
        OnboardingStep::Complete => {
            let mut thanks = format!("Thanks for introducing yourself, {}!", profile.display_name());
            if !profile.phone.trim().is_empty() {
                thanks.push_str(" We'll add you to the group chat soon.");
            }
            if !profile.welcome_message.trim().is_empty() {
                thanks.push_str(" We'll be in touch!");
            }
            vec![
                thanks,
                "Explore the hub to discover events, community services, and ways to \
                 connect with neighbors."
                    .to_string(),
            ]
        }
    }
}

fn inputs_for(wizard: &OnboardingWizard) -> Vec<InputView> {
    wizard
        .inputs()
        .iter()
        .enumerate()
        .map(|(i, input)| {
            let focused = i == wizard.focused_field;
            match *input {
                StepInput::Text(key) => InputView::Text {
                    key,
                    label: key.label(),
                    value: wizard.profile.get(key).to_string(),
                    placeholder: key.placeholder(),
                    required: key.is_required(),
                    focused,
                },
                StepInput::GroupChatToggle => InputView::Toggle {
                    label: "Add me to the neighbors' group chat",
                    checked: wizard.profile.wants_group_chat,
                    focused,
                },
            }
        })
        .collect()
}

fn catalog_for(wizard: &OnboardingWizard) -> CatalogView {
    let panel = &wizard.catalog;
    CatalogView {
        loading: panel.is_loading(),
        rows: panel
            .items()
            .iter()
            .enumerate()
            .map(|(i, item)| CatalogRow {
                id: item.id.clone(),
                icon: item.icon.clone(),
                title: item.title.clone(),
                description: item.description.clone(),
                selected: wizard.is_selected(&item.id),
                highlighted: i == panel.cursor(),
            })
            .collect(),
    }
}

/// Project the wizard into the view of its current step
pub fn render_step(wizard: &OnboardingWizard) -> StepView {
    let step = wizard.step;

    let (primary, primary_enabled) = match step {
        OnboardingStep::Welcome => (PrimaryAction::Next, true),
        OnboardingStep::Complete => (PrimaryAction::StartExploring, true),
        s if s.is_submit_step() => {
            if wizard.is_submitting() {
                (PrimaryAction::Submitting, false)
            } else {
                (PrimaryAction::Submit, wizard.can_submit())
            }
        }
        _ => (PrimaryAction::Continue, wizard.can_advance()),
    };

    StepView {
        step,
        title: step.title(),
        subtitle: step.subtitle(),
        body: body_for(wizard),
        inputs: inputs_for(wizard),
        catalog: (step == OnboardingStep::CatalogPick).then(|| catalog_for(wizard)),
        indicator: progress_indicator(step),
        back_enabled: wizard.can_retreat(),
        primary,
        primary_enabled,
        notice: wizard.notice.clone(),
    }
}
