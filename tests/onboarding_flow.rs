//! End-to-end wizard runs against the in-memory backend

use neighborhub::HubError;
use neighborhub::onboarding::{
    FieldKey, Lifecycle, OnboardingStep, OnboardingWizard, SubmissionCoordinator,
};
use neighborhub::services::{CatalogItem, InMemoryBackend, Services};
use std::sync::Arc;
use std::time::{Duration, Instant};

fn coupon(id: &str, title: &str) -> CatalogItem {
    CatalogItem {
        id: id.to_string(),
        title: title.to_string(),
        description: String::new(),
        icon: "🎟".to_string(),
    }
}

fn backend() -> Arc<InMemoryBackend> {
    Arc::new(InMemoryBackend::with_catalog(vec![
        coupon("coupon-7", "Soup night"),
        coupon("coupon-42", "Borrow a ladder"),
    ]))
}

fn coordinator(backend: &Arc<InMemoryBackend>) -> SubmissionCoordinator {
    let services = Services::from_backend(backend.clone());
    SubmissionCoordinator::new(services.store, services.notifier)
}

/// Open the wizard and load the catalog as the TUI would
async fn open_with_catalog(wizard: &mut OnboardingWizard, backend: &Arc<InMemoryBackend>) {
    let session = wizard.open();
    let items = neighborhub::onboarding::CatalogPanel::fetch(backend.as_ref(), "get_public_coupons").await;
    assert!(wizard.set_catalog(session, items));
}

#[tokio::test]
async fn test_new_neighbor_happy_path() {
    let backend = backend();
    let coordinator = coordinator(&backend);
    let mut wizard = OnboardingWizard::default();
    open_with_catalog(&mut wizard, &backend).await;

    // welcome -> group invite
    assert!(wizard.advance());
    wizard.update_field(FieldKey::Name, "Asha");
    wizard.update_field(FieldKey::Phone, "555-0100");

    // -> catalog pick
    assert!(wizard.advance());
    assert_eq!(wizard.step, OnboardingStep::CatalogPick);
    assert_eq!(wizard.toggle_catalog_item("coupon-42"), Some(true));

    // -> message -> ideas
    assert!(wizard.advance());
    wizard.update_field(FieldKey::WelcomeMessage, "Hi all!");
    assert!(wizard.advance());
    assert_eq!(wizard.step, OnboardingStep::Ideas);
    assert!(!wizard.advance());

    let report = wizard.submit(&coordinator).await.unwrap().unwrap();
    assert!(report.signup_id.is_some());
    assert_eq!(report.failed_claims(), 0);
    assert!(report.notification_sent());

    assert_eq!(wizard.step, OnboardingStep::Complete);
    assert!(!wizard.is_submitting());

    let signups = backend.records("new_neighbor_signups");
    assert_eq!(signups.len(), 1);
    assert_eq!(signups[0]["name"], "Asha");
    assert_eq!(signups[0]["phone"], "555-0100");
    assert!(signups[0]["email"].is_null());
    assert_eq!(signups[0]["wants_whatsapp"], true);
    assert_eq!(signups[0]["welcome_message"], "Hi all!");

    let claims = backend.records("coupon_claims");
    assert_eq!(claims.len(), 1);
    assert_eq!(claims[0]["coupon_id"], "coupon-42");
    assert_eq!(claims[0]["claimer_name"], "Asha");
    assert_eq!(claims[0]["status"], "pending");

    let notifications = backend.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].0, "new_neighbor_signup");
    assert_eq!(notifications[0].1["claimed_coupon_count"], 1);
}

#[tokio::test]
async fn test_three_advances_then_two_more_completes() {
    let backend = backend();
    let coordinator = coordinator(&backend);
    let mut wizard = OnboardingWizard::default();
    open_with_catalog(&mut wizard, &backend).await;

    for _ in 0..3 {
        wizard.advance();
    }
    assert_eq!(wizard.toggle_catalog_item("coupon-42"), Some(true));
    assert!(wizard.advance());
    // ideas is the last actionable step; only submit leaves it
    assert!(!wizard.advance());
    assert_eq!(wizard.step, OnboardingStep::Ideas);
    wizard.update_field(FieldKey::Name, "Asha");

    let report = wizard.submit(&coordinator).await.unwrap().unwrap();
    assert_eq!(report.failed_claims(), 0);
    assert_eq!(wizard.step, OnboardingStep::Complete);
    assert!(!wizard.is_submitting());

    let signups = backend.records("new_neighbor_signups");
    assert_eq!(signups.len(), 1);
    assert_eq!(signups[0]["name"], "Asha");
    let claims = backend.records("coupon_claims");
    assert_eq!(claims.len(), 1);
    assert_eq!(claims[0]["coupon_id"], "coupon-42");
    assert_eq!(backend.notifications().len(), 1);
}

#[tokio::test]
async fn test_resubmit_after_completion_writes_nothing() {
    let backend = backend();
    let coordinator = coordinator(&backend);
    let mut wizard = OnboardingWizard::default();
    open_with_catalog(&mut wizard, &backend).await;
    wizard.update_field(FieldKey::Name, "Asha");
    wizard.toggle_catalog_item("coupon-7");
    while wizard.advance() {}

    assert!(wizard.submit(&coordinator).await.unwrap().is_some());
    assert!(wizard.submit(&coordinator).await.unwrap().is_none());

    assert_eq!(wizard.step, OnboardingStep::Complete);
    assert_eq!(backend.records("new_neighbor_signups").len(), 1);
    assert_eq!(backend.records("coupon_claims").len(), 1);
    assert_eq!(backend.notifications().len(), 1);
}

#[tokio::test]
async fn test_claim_failure_still_completes() {
    let backend = backend();
    backend.fail_collection("coupon_claims");
    let coordinator = coordinator(&backend);

    let mut wizard = OnboardingWizard::default();
    open_with_catalog(&mut wizard, &backend).await;
    wizard.update_field(FieldKey::Name, "Asha");
    wizard.toggle_catalog_item("coupon-7");
    wizard.toggle_catalog_item("coupon-42");
    while wizard.advance() {}

    let report = wizard.submit(&coordinator).await.unwrap().unwrap();
    assert_eq!(report.failed_claims(), 2);
    assert_eq!(wizard.step, OnboardingStep::Complete);
    assert_eq!(backend.records("new_neighbor_signups").len(), 1);
    assert_eq!(backend.notifications().len(), 1);
}

#[tokio::test]
async fn test_notification_failure_still_completes() {
    let backend = backend();
    backend.fail_notifications();
    let coordinator = coordinator(&backend);

    let mut wizard = OnboardingWizard::default();
    open_with_catalog(&mut wizard, &backend).await;
    wizard.update_field(FieldKey::Name, "Asha");
    while wizard.advance() {}

    let report = wizard.submit(&coordinator).await.unwrap().unwrap();
    assert!(!report.notification_sent());
    assert_eq!(wizard.step, OnboardingStep::Complete);
}

#[tokio::test]
async fn test_primary_failure_keeps_data_for_retry() {
    let backend = backend();
    backend.fail_collection("new_neighbor_signups");
    let coordinator = coordinator(&backend);

    let mut wizard = OnboardingWizard::default();
    open_with_catalog(&mut wizard, &backend).await;
    wizard.update_field(FieldKey::Name, "Asha");
    wizard.toggle_catalog_item("coupon-42");
    while wizard.advance() {}

    let result = wizard.submit(&coordinator).await;
    assert!(matches!(result, Err(HubError::PrimaryWrite(_))));
    assert_eq!(wizard.step, OnboardingStep::Ideas);
    assert_eq!(wizard.profile.name, "Asha");
    assert!(wizard.is_selected("coupon-42"));
    assert!(wizard.notice.is_some());
    assert!(backend.records("coupon_claims").is_empty());
    assert!(backend.notifications().is_empty());
}

#[tokio::test]
async fn test_empty_name_writes_nothing() {
    let backend = backend();
    let coordinator = coordinator(&backend);

    let mut wizard = OnboardingWizard::default();
    open_with_catalog(&mut wizard, &backend).await;
    while wizard.advance() {}
    wizard.update_field(FieldKey::Name, "  ");

    let result = wizard.submit(&coordinator).await;
    assert!(matches!(result, Err(HubError::Validation(_))));
    assert_ne!(wizard.step, OnboardingStep::Complete);
    assert!(backend.records("new_neighbor_signups").is_empty());
    assert!(backend.notifications().is_empty());
}

#[tokio::test]
async fn test_double_submit_writes_once() {
    let backend = backend();
    let coordinator = coordinator(&backend);

    let mut wizard = OnboardingWizard::default();
    open_with_catalog(&mut wizard, &backend).await;
    wizard.update_field(FieldKey::Name, "Asha");
    while wizard.advance() {}

    let first = wizard.begin_submit().unwrap().unwrap();
    assert!(wizard.begin_submit().unwrap().is_none());

    let outcome = coordinator.run(&first).await;
    assert!(wizard.finish_submit(first.session, &outcome));
    assert_eq!(backend.records("new_neighbor_signups").len(), 1);
    assert_eq!(backend.notifications().len(), 1);
}

#[tokio::test]
async fn test_catalog_outage_shows_empty_list() {
    let backend = backend();
    backend.fail_catalog();

    let mut wizard = OnboardingWizard::default();
    open_with_catalog(&mut wizard, &backend).await;
    assert!(!wizard.catalog.is_loading());
    assert!(wizard.catalog.items().is_empty());
    assert_eq!(wizard.toggle_catalog_item("coupon-42"), None);
}

#[tokio::test]
async fn test_close_then_reopen_starts_fresh() {
    let backend = backend();
    let mut wizard = OnboardingWizard::new(Duration::from_millis(300));
    open_with_catalog(&mut wizard, &backend).await;

    wizard.advance();
    wizard.update_field(FieldKey::Name, "Asha");
    wizard.advance();
    wizard.toggle_catalog_item("coupon-42");

    let t0 = Instant::now();
    wizard.close(t0);
    assert!(!wizard.is_visible());
    assert!(!wizard.poll_reset(t0 + Duration::from_millis(299)));
    assert!(wizard.poll_reset(t0 + Duration::from_millis(300)));
    assert_eq!(wizard.lifecycle(), Lifecycle::Closed);

    open_with_catalog(&mut wizard, &backend).await;
    assert_eq!(wizard.step, OnboardingStep::Welcome);
    assert!(wizard.profile.name.is_empty());
    assert!(wizard.profile.wants_group_chat);
    assert!(wizard.selected_ids().is_empty());
}
