//! Submission Coordinator
//!
//! Turns a finished wizard into one primary signup write, one claim write
//! per selected catalog item and one notification. Only the primary write
//! can fail the submission; claims and the notification are best-effort.

use super::state::{NeighborProfile, SubmissionRequest};
use crate::error::{HubError, Result, ServiceResult};
use crate::services::{Notifier, RecordId, RecordStore};
use futures::future::join_all;
use serde_json::{Value, json};
use std::sync::Arc;

/// Collection and event names used for a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionTargets {
    pub signups: String,
    pub claims: String,
    pub event_type: String,
}

impl Default for SubmissionTargets {
    fn default() -> Self {
        Self {
            signups: "new_neighbor_signups".to_string(),
            claims: "coupon_claims".to_string(),
            event_type: "new_neighbor_signup".to_string(),
        }
    }
}

/// Outcome of a call whose failure the caller has chosen to tolerate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BestEffort<T> {
    Done(T),
    Failed(String),
}

impl<T> BestEffort<T> {
    /// Swallow an error, logging it under `what`
    fn tolerate(result: ServiceResult<T>, what: &str) -> Self {
        match result {
            Ok(value) => Self::Done(value),
            Err(e) => {
                tracing::warn!(error = %e, "{} failed (ignored)", what);
                Self::Failed(e.to_string())
            }
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }
}

/// Result of a single catalog claim write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimOutcome {
    pub catalog_id: String,
    pub result: BestEffort<RecordId>,
}

/// What happened during a submission whose primary write succeeded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionReport {
    pub signup_id: Option<RecordId>,
    pub claims: Vec<ClaimOutcome>,
    /// `None` if no notification was attempted
    pub notification: Option<BestEffort<()>>,
}

impl SubmissionReport {
    pub fn failed_claims(&self) -> usize {
        self.claims.iter().filter(|c| !c.result.is_done()).count()
    }

    pub fn notification_sent(&self) -> bool {
        self.notification.as_ref().is_some_and(BestEffort::is_done)
    }
}

/// Trimmed text, or `null` when empty
fn optional_text(value: &str) -> Value {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Value::Null
    } else {
        Value::String(trimmed.to_string())
    }
}

/// The primary signup row
pub fn signup_record(profile: &NeighborProfile) -> Value {
    json!({
        "name": profile.display_name(),
        "phone": optional_text(&profile.phone),
        "email": optional_text(&profile.email),
        "wants_whatsapp": profile.wants_group_chat,
        "welcome_message": optional_text(&profile.welcome_message),
        "ideas": optional_text(&profile.ideas),
    })
}

/// A claim row, keyed by the claimer's name and email rather than the signup id
pub fn claim_record(catalog_id: &str, profile: &NeighborProfile) -> Value {
    json!({
        "coupon_id": catalog_id,
        "claimer_name": profile.display_name(),
        "claimer_email": optional_text(&profile.email),
        "status": "pending",
    })
}

/// Notification payload: the signup plus how many items were claimed
pub fn notification_payload(profile: &NeighborProfile, claimed: usize) -> Value {
    let mut payload = signup_record(profile);
    if let Value::Object(ref mut map) = payload {
        map.insert("claimed_coupon_count".to_string(), json!(claimed));
    }
    payload
}

/// Drives the writes and the notification for a finished wizard
#[derive(Clone)]
pub struct SubmissionCoordinator {
    store: Arc<dyn RecordStore>,
    notifier: Arc<dyn Notifier>,
    targets: SubmissionTargets,
}

impl SubmissionCoordinator {
    pub fn new(store: Arc<dyn RecordStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            notifier,
            targets: SubmissionTargets::default(),
        }
    }

    pub fn with_targets(mut self, targets: SubmissionTargets) -> Self {
        self.targets = targets;
        self
    }

    pub fn targets(&self) -> &SubmissionTargets {
        &self.targets
    }

    /// Run a submission.
    ///
    /// The primary write happens first; its failure is returned as
    /// `HubError::PrimaryWrite` and nothing else is attempted. After it
    /// succeeds, claim writes and the notification are issued concurrently
    /// and their failures only show up in the report.
    pub async fn run(&self, request: &SubmissionRequest) -> Result<SubmissionReport> {
        let profile = &request.profile;
        tracing::info!(
            session = request.session,
            claims = request.selected_ids.len(),
            "Submitting neighbor signup"
        );

        let signup_id = self
            .store
            .insert(&self.targets.signups, signup_record(profile))
            .await
            .map_err(HubError::PrimaryWrite)?;
        tracing::info!(record_id = %signup_id, "Signup saved");

        let claim_writes = request.selected_ids.iter().map(|id| async move {
            let result = self
                .store
                .insert(&self.targets.claims, claim_record(id, profile))
                .await;
            ClaimOutcome {
                catalog_id: id.clone(),
                result: BestEffort::tolerate(result, "Catalog claim write"),
            }
        });

        let notify = async {
            let payload = notification_payload(profile, request.selected_ids.len());
            let result = self.notifier.notify(&self.targets.event_type, payload).await;
            BestEffort::tolerate(result, "Signup notification")
        };

        let (claims, notification) = futures::join!(join_all(claim_writes), notify);

        Ok(SubmissionReport {
            signup_id: Some(signup_id),
            claims,
            notification: Some(notification),
        })
    }
}
