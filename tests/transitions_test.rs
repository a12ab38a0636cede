//! Integration tests for the transition dispatcher.
//!
//! End-to-end scenarios over the in-memory backend: entity and client
//! writes, review-task escalation, notifications, permission enforcement,
//! conflict handling, and the zero-write failure paths.

mod common;

use common::Harness;
use lomis_core::constants::events;
use lomis_core::models::Task;
use lomis_core::store::TaskStore;
use lomis_core::workflow::states::{
    ClientAcatStatus, ClientStatus, GroupScreeningStatus, GroupStatus, LoanStatus, ScreeningStatus,
    TaskLifecycleStatus,
};
use lomis_core::workflow::{EntityType, WorkflowError};
use lomis_core::REVIEW_TASK_TYPE;
use uuid::Uuid;

async fn get_task(harness: &Harness, task_id: Uuid) -> Task {
    harness
        .backend
        .get(task_id)
        .await
        .unwrap()
        .expect("task should exist")
}

#[tokio::test]
async fn test_screening_declined_under_review_spawns_review_task() {
    let harness = Harness::new();
    let (task, screening_id, client_id) = harness.seed_screening_task().await;

    let receipt = harness
        .dispatcher
        .apply_status_transition(
            task.task_id,
            "declined_under_review",
            Some("income documents missing"),
            &harness.authorizer,
        )
        .await
        .unwrap();

    assert!(receipt.applied);
    assert_eq!(receipt.task.status, TaskLifecycleStatus::Completed);
    assert_eq!(
        receipt.task.comment.as_deref(),
        Some("income documents missing")
    );
    assert_eq!(receipt.entity_status.as_deref(), Some("declined_under_review"));
    assert_eq!(receipt.related_status.as_deref(), Some("screening_inprogress"));

    let screening = lomis_core::store::ScreeningStore::get(&*harness.backend, screening_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(screening.status, ScreeningStatus::DeclinedUnderReview);

    let client = lomis_core::store::ClientStore::get(&*harness.backend, client_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(client.status, ClientStatus::ScreeningInprogress);

    // Exactly one follow-up task, assigned back to whoever opened the
    // original, pointing at the same screening.
    let review = receipt.review_task.expect("review task should spawn");
    assert_eq!(review.task_type, REVIEW_TASK_TYPE);
    assert_eq!(review.status, TaskLifecycleStatus::Pending);
    assert_eq!(review.user, Some(task.created_by));
    assert_eq!(review.entity_ref, task.entity_ref);
    assert_eq!(review.entity_type, EntityType::Screening);
    assert_eq!(harness.backend.task_count(), 2);

    let notifications = harness.backend.all_notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].for_user, task.user.unwrap());
    assert_eq!(notifications[0].task_ref, review.task_id);

    let audit = harness.backend.all_audit_entries();
    assert_eq!(audit.len(), 1);
    assert_eq!(audit[0].event, events::TASK_REVIEW_REQUESTED);
    assert_eq!(audit[0].user, harness.authorizer.account_id);
}

#[tokio::test]
async fn test_review_notification_goes_to_original_assignee() {
    let harness = Harness::new();
    let assignee = Uuid::new_v4();
    let (task, _, _) = harness
        .seed_screening_task_assigned_to(Some(assignee))
        .await;

    let receipt = harness
        .dispatcher
        .apply_status_transition(
            task.task_id,
            "declined_under_review",
            None,
            &harness.authorizer,
        )
        .await
        .unwrap();

    let review = receipt.review_task.unwrap();
    let notifications = harness.backend.all_notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].for_user, assignee);
    assert_eq!(notifications[0].task_ref, review.task_id);
    assert_eq!(receipt.notified, vec![assignee]);
}

#[tokio::test]
async fn test_review_notification_falls_back_to_creator_when_unassigned() {
    let harness = Harness::new();
    let (task, _, _) = harness.seed_screening_task_assigned_to(None).await;

    let receipt = harness
        .dispatcher
        .apply_status_transition(
            task.task_id,
            "declined_under_review",
            None,
            &harness.authorizer,
        )
        .await
        .unwrap();

    let notifications = harness.backend.all_notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].for_user, task.created_by);
    assert_eq!(receipt.notified, vec![task.created_by]);
}

#[tokio::test]
async fn test_loan_paid_is_terminal_and_notifies_creator() {
    let harness = Harness::new();
    let (task, loan_id, client_id) = harness.seed_loan_task().await;

    let receipt = harness
        .dispatcher
        .apply_status_transition(task.task_id, "loan_paid", None, &harness.authorizer)
        .await
        .unwrap();

    assert!(receipt.applied);
    assert!(receipt.review_task.is_none());
    assert_eq!(receipt.task.status, TaskLifecycleStatus::Completed);

    let loan = lomis_core::store::LoanStore::get(&*harness.backend, loan_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loan.status, LoanStatus::LoanPaid);

    let client = lomis_core::store::ClientStore::get(&*harness.backend, client_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(client.status, ClientStatus::LoanPaid);

    // No escalation: just the original task and one closure notification
    // back to its creator.
    assert_eq!(harness.backend.task_count(), 1);
    let notifications = harness.backend.all_notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].for_user, task.created_by);
    assert_eq!(notifications[0].task_ref, task.task_id);

    let audit = harness.backend.all_audit_entries();
    assert_eq!(audit.len(), 1);
    assert_eq!(audit[0].event, events::TASK_COMPLETED);
}

#[tokio::test]
async fn test_group_screening_approval_marks_group_eligible() {
    let harness = Harness::new();
    let (task, group_screening_id, group_id) = harness.seed_group_screening_task().await;

    let receipt = harness
        .dispatcher
        .apply_status_transition(task.task_id, "approved", None, &harness.authorizer)
        .await
        .unwrap();

    assert!(receipt.applied);
    assert_eq!(receipt.related_status.as_deref(), Some("eligible"));

    let group_screening =
        lomis_core::store::GroupScreeningStore::get(&*harness.backend, group_screening_id)
            .await
            .unwrap()
            .unwrap();
    assert_eq!(group_screening.status, GroupScreeningStatus::Approved);

    let group = lomis_core::store::GroupStore::get(&*harness.backend, group_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(group.status, GroupStatus::Eligible);
}

#[tokio::test]
async fn test_illegal_status_is_rejected_before_any_write() {
    let harness = Harness::new();
    let (task, screening_id, client_id) = harness.seed_screening_task().await;

    let err = harness
        .dispatcher
        .apply_status_transition(task.task_id, "authorized", None, &harness.authorizer)
        .await
        .unwrap_err();

    match err {
        WorkflowError::IllegalStatus {
            entity_type,
            requested,
            allowed,
        } => {
            assert_eq!(entity_type, EntityType::Screening);
            assert_eq!(requested, "authorized");
            assert_eq!(allowed, &["approved", "declined_final", "declined_under_review"]);
        }
        other => panic!("expected IllegalStatus, got {other:?}"),
    }

    // Nothing moved.
    assert_eq!(
        get_task(&harness, task.task_id).await.status,
        TaskLifecycleStatus::Pending
    );
    let screening = lomis_core::store::ScreeningStore::get(&*harness.backend, screening_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(screening.status, ScreeningStatus::New);
    let client = lomis_core::store::ClientStore::get(&*harness.backend, client_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(client.status, ClientStatus::New);
    assert_eq!(harness.backend.notification_count(), 0);
    assert!(harness.backend.all_audit_entries().is_empty());
}

#[tokio::test]
async fn test_missing_authorize_grant_is_rejected_before_any_write() {
    let harness = Harness::new();
    let (task, _, client_id) = harness.seed_loan_task().await;

    let err = harness
        .dispatcher
        .apply_status_transition(task.task_id, "accepted", None, &harness.powerless)
        .await
        .unwrap_err();

    assert!(matches!(err, WorkflowError::NotPermitted { .. }));
    assert_eq!(
        get_task(&harness, task.task_id).await.status,
        TaskLifecycleStatus::Pending
    );
    let client = lomis_core::store::ClientStore::get(&*harness.backend, client_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(client.status, ClientStatus::New);
    assert_eq!(harness.backend.notification_count(), 0);
}

#[tokio::test]
async fn test_review_task_skips_the_permission_check() {
    let harness = Harness::new();
    let (task, _, client_id) = harness.seed_screening_task().await;

    let receipt = harness
        .dispatcher
        .apply_status_transition(
            task.task_id,
            "declined_under_review",
            None,
            &harness.authorizer,
        )
        .await
        .unwrap();
    let review = receipt.review_task.unwrap();

    // The review assignee closes it without holding any grant.
    let receipt = harness
        .dispatcher
        .apply_status_transition(review.task_id, "approved", None, &harness.powerless)
        .await
        .unwrap();

    assert!(receipt.applied);
    assert_eq!(receipt.task.status, TaskLifecycleStatus::Completed);
    let client = lomis_core::store::ClientStore::get(&*harness.backend, client_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(client.status, ClientStatus::Eligible);
}

#[tokio::test]
async fn test_legal_but_unmapped_status_writes_nothing() {
    let harness = Harness::new();
    let (task, acat_id, client_id) = harness.seed_acat_task().await;

    let receipt = harness
        .dispatcher
        .apply_status_transition(task.task_id, "submitted", None, &harness.authorizer)
        .await
        .unwrap();

    assert!(!receipt.applied);
    assert!(receipt.review_task.is_none());
    assert!(receipt.notified.is_empty());
    assert!(receipt.entity_status.is_none());

    // The task stays open and can still be closed with a mapped status.
    assert_eq!(
        get_task(&harness, task.task_id).await.status,
        TaskLifecycleStatus::Pending
    );
    let acat = lomis_core::store::AcatStore::get(&*harness.backend, acat_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(acat.status.to_string(), "new");
    let client = lomis_core::store::ClientStore::get(&*harness.backend, client_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(client.status, ClientStatus::New);
    assert_eq!(harness.backend.notification_count(), 0);
    assert!(harness.backend.all_audit_entries().is_empty());

    let receipt = harness
        .dispatcher
        .apply_status_transition(task.task_id, "authorized", None, &harness.authorizer)
        .await
        .unwrap();
    assert!(receipt.applied);
}

#[tokio::test]
async fn test_second_transition_on_a_closed_task_conflicts() {
    let harness = Harness::new();
    let (task, _, _) = harness.seed_screening_task().await;

    harness
        .dispatcher
        .apply_status_transition(task.task_id, "approved", None, &harness.authorizer)
        .await
        .unwrap();

    let err = harness
        .dispatcher
        .apply_status_transition(task.task_id, "declined_final", None, &harness.authorizer)
        .await
        .unwrap_err();

    match err {
        WorkflowError::AlreadyClosed { task_id, status } => {
            assert_eq!(task_id, task.task_id);
            assert_eq!(status, TaskLifecycleStatus::Completed);
        }
        other => panic!("expected AlreadyClosed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unknown_task_is_not_found() {
    let harness = Harness::new();
    let err = harness
        .dispatcher
        .apply_status_transition(Uuid::new_v4(), "approved", None, &harness.authorizer)
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::TaskNotFound { .. }));
}

#[tokio::test]
async fn test_client_acat_authorized_is_terminal() {
    let harness = Harness::new();
    let (task, client_acat_id, client_id) = harness.seed_client_acat_task().await;

    let receipt = harness
        .dispatcher
        .apply_status_transition(task.task_id, "authorized", None, &harness.authorizer)
        .await
        .unwrap();

    assert!(receipt.review_task.is_none());
    let client_acat =
        lomis_core::store::ClientAcatStore::get(&*harness.backend, client_acat_id)
            .await
            .unwrap()
            .unwrap();
    assert_eq!(client_acat.status, ClientAcatStatus::Authorized);
    let client = lomis_core::store::ClientStore::get(&*harness.backend, client_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(client.status, ClientStatus::AcatAuthorized);
    assert_eq!(harness.backend.task_count(), 1);
    assert_eq!(harness.backend.notification_count(), 1);
}

#[tokio::test]
async fn test_other_task_closes_without_entity_or_notification() {
    let harness = Harness::new();

    let completed = harness.seed_other_task().await;
    let receipt = harness
        .dispatcher
        .apply_status_transition(completed.task_id, "completed", None, &harness.powerless)
        .await
        .unwrap();
    assert!(receipt.applied);
    assert_eq!(receipt.task.status, TaskLifecycleStatus::Completed);
    assert!(receipt.entity_status.is_none());
    assert_eq!(harness.backend.notification_count(), 0);

    let cancelled = harness.seed_other_task().await;
    let receipt = harness
        .dispatcher
        .apply_status_transition(
            cancelled.task_id,
            "cancelled",
            Some("duplicate entry"),
            &harness.powerless,
        )
        .await
        .unwrap();
    assert_eq!(receipt.task.status, TaskLifecycleStatus::Cancelled);
    assert_eq!(receipt.task.comment.as_deref(), Some("duplicate entry"));

    let audit = harness.backend.all_audit_entries();
    assert_eq!(audit.len(), 2);
    assert!(audit.iter().any(|entry| entry.event == events::TASK_CANCELLED));
}

#[tokio::test]
async fn test_applied_transition_publishes_a_lifecycle_event() {
    let harness = Harness::new();
    let (task, _, _) = harness.seed_screening_task().await;
    let mut receiver = harness.dispatcher.subscribe();

    harness
        .dispatcher
        .apply_status_transition(task.task_id, "approved", None, &harness.authorizer)
        .await
        .unwrap();

    let event = receiver.recv().await.unwrap();
    assert_eq!(event.name, events::ENTITY_STATUS_CHANGED);
    assert_eq!(
        event.context["task_id"],
        serde_json::json!(task.task_id)
    );
    assert_eq!(event.context["requested_status"], "approved");
}
