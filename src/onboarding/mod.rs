//! Neighbor onboarding wizard
//!
//! Step sequence, wizard state, the embedded catalog picklist, the step view
//! and the submission coordinator that writes the collected profile out.

pub mod catalog;
pub mod state;
pub mod step;
pub mod submission;
pub mod view;

pub use catalog::{CatalogPanel, Selection};
pub use state::{
    DEFAULT_RESET_DELAY, FieldKey, Lifecycle, NeighborProfile, Notice, OnboardingWizard, StepInput,
    SubmissionRequest,
};
pub use step::{OnboardingStep, STEPS};
pub use submission::{
    BestEffort, ClaimOutcome, SubmissionCoordinator, SubmissionReport, SubmissionTargets,
};
pub use view::{InputView, PrimaryAction, StepView, render_step};
