//! Wizard step sequence

use serde::{Deserialize, Serialize};

/// Current step in the onboarding wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OnboardingStep {
    Welcome,
    GroupInvite,
    CatalogPick,
    Message,
    Ideas,
    Complete,
}

/// Fixed declared order of the wizard
pub const STEPS: [OnboardingStep; 6] = [
    OnboardingStep::Welcome,
    OnboardingStep::GroupInvite,
    OnboardingStep::CatalogPick,
    OnboardingStep::Message,
    OnboardingStep::Ideas,
    OnboardingStep::Complete,
];

impl OnboardingStep {
    /// First step of every session
    pub fn first() -> Self {
        STEPS[0]
    }

    /// Terminal "thank you" step
    pub fn terminal() -> Self {
        STEPS[STEPS.len() - 1]
    }

    /// Position in the declared order (0-based)
    pub fn index(&self) -> usize {
        match self {
            Self::Welcome => 0,
            Self::GroupInvite => 1,
            Self::CatalogPick => 2,
            Self::Message => 3,
            Self::Ideas => 4,
            Self::Complete => 5,
        }
    }

    /// Step number (1-based)
    pub fn number(&self) -> usize {
        self.index() + 1
    }

    /// Number of steps shown in the progress indicator (excluding Complete)
    pub fn total() -> usize {
        STEPS.len() - 1
    }

    /// Next step in declared order, if any
    pub fn next(&self) -> Option<Self> {
        STEPS.get(self.index() + 1).copied()
    }

    /// Previous step in declared order, if any
    pub fn previous(&self) -> Option<Self> {
        self.index().checked_sub(1).map(|i| STEPS[i])
    }

    pub fn is_terminal(&self) -> bool {
        *self == Self::terminal()
    }

    /// The last step the user acts on; its primary action submits
    pub fn is_submit_step(&self) -> bool {
        self.next().is_some_and(|n| n.is_terminal())
    }

    /// Stable identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Welcome => "welcome",
            Self::GroupInvite => "group-invite",
            Self::CatalogPick => "catalog-pick",
            Self::Message => "message",
            Self::Ideas => "ideas",
            Self::Complete => "complete",
        }
    }

    /// Step title
    pub fn title(&self) -> &'static str {
        match self {
            Self::Welcome => "Welcome!",
            Self::GroupInvite => "Join Our Group Chat",
            Self::CatalogPick => "Neighbor Coupons",
            Self::Message => "Say Hello!",
            Self::Ideas => "Got Ideas?",
            Self::Complete => "Welcome to the Block!",
        }
    }

    /// Step subtitle
    pub fn subtitle(&self) -> &'static str {
        match self {
            Self::Welcome => "Your neighbors on 48th Ave between Lincoln & Irving",
            Self::GroupInvite => "We use a group chat for quick updates and mutual support",
            Self::CatalogPick => "Pick any of these to connect with a neighbor",
            Self::Message => "Drop a note to the person who keeps this hub running",
            Self::Ideas => "What would make this block even better?",
            Self::Complete => "Thanks for introducing yourself",
        }
    }
}

impl std::fmt::Display for OnboardingStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
