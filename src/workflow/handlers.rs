//! Per-entity transition handlers.
//!
//! One handler per entity type, selected through the closed lookup in
//! [`handler_for`]. Each handler follows the same shape: load the business
//! entity, load its linked client (group for group screenings), persist the
//! mapped statuses, close the task under the pending precondition, then
//! either spawn a follow-up review task or notify the task creator.
//!
//! Side effects are a fail-fast sequence of independent writes; there is no
//! compensation for writes that already landed when a later one fails.

use super::errors::{entity_missing, mismatched_outcome, WorkflowError, WorkflowResult};
use super::outcomes::{
    AcatOutcome, BusinessOutcome, ClientAcatOutcome, GroupScreeningOutcome, LoanOutcome,
    ScreeningOutcome,
};
use super::states::{
    AcatStatus, ClientAcatStatus, ClientStatus, EntityType, GroupScreeningStatus, GroupStatus,
    LoanStatus, ScreeningStatus, TaskLifecycleStatus,
};
use crate::models::{Account, NewNotification, NewTask, Task};
use crate::store::{
    AcatStore, AuditTrail, ClientAcatStore, ClientStore, GroupScreeningStore, GroupStore,
    LoanStore, MemoryBackend, NotificationSink, PgBackend, ScreeningStore, TaskStore,
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Injected collaborator capabilities the handlers operate through.
#[derive(Clone)]
pub struct WorkflowContext {
    pub tasks: Arc<dyn TaskStore>,
    pub screenings: Arc<dyn ScreeningStore>,
    pub loans: Arc<dyn LoanStore>,
    pub client_acats: Arc<dyn ClientAcatStore>,
    pub acats: Arc<dyn AcatStore>,
    pub group_screenings: Arc<dyn GroupScreeningStore>,
    pub clients: Arc<dyn ClientStore>,
    pub groups: Arc<dyn GroupStore>,
    pub notifications: Arc<dyn NotificationSink>,
    pub audit: Arc<dyn AuditTrail>,
}

impl WorkflowContext {
    /// Wire every capability to one in-memory backend
    pub fn for_memory(backend: Arc<MemoryBackend>) -> Self {
        Self {
            tasks: backend.clone(),
            screenings: backend.clone(),
            loans: backend.clone(),
            client_acats: backend.clone(),
            acats: backend.clone(),
            group_screenings: backend.clone(),
            clients: backend.clone(),
            groups: backend.clone(),
            notifications: backend.clone(),
            audit: backend,
        }
    }

    /// Wire every capability to one PostgreSQL backend
    pub fn for_postgres(backend: Arc<PgBackend>) -> Self {
        Self {
            tasks: backend.clone(),
            screenings: backend.clone(),
            loans: backend.clone(),
            client_acats: backend.clone(),
            acats: backend.clone(),
            group_screenings: backend.clone(),
            clients: backend.clone(),
            groups: backend.clone(),
            notifications: backend.clone(),
            audit: backend,
        }
    }
}

/// What a transition actually did, for auditing, events, and assertions.
#[derive(Debug, Clone)]
pub struct TransitionReceipt {
    /// The task after the transition (unchanged when nothing applied)
    pub task: Task,
    /// Follow-up review task, when the outcome requested one
    pub review_task: Option<Task>,
    /// Users a notification was created for
    pub notified: Vec<Uuid>,
    /// Business-entity status written, as its wire string
    pub entity_status: Option<String>,
    /// Linked client/group status written, as its wire string
    pub related_status: Option<String>,
    /// False for legal-but-unmapped statuses, which write nothing
    pub applied: bool,
}

impl TransitionReceipt {
    pub(crate) fn skipped(task: Task) -> Self {
        Self {
            task,
            review_task: None,
            notified: Vec::new(),
            entity_status: None,
            related_status: None,
            applied: false,
        }
    }
}

/// One transition implementation per entity type.
#[async_trait]
pub trait TransitionHandler: Send + Sync {
    /// Apply a validated, authorized outcome to the task and its entity
    async fn apply(
        &self,
        ctx: &WorkflowContext,
        task: &Task,
        outcome: &BusinessOutcome,
        comment: Option<&str>,
        acting: &Account,
    ) -> WorkflowResult<TransitionReceipt>;

    /// Get a description of this handler for logging
    fn description(&self) -> &'static str;
}

/// Closed dispatch table keyed by entity type.
pub fn handler_for(entity_type: EntityType) -> &'static dyn TransitionHandler {
    static SCREENING: ScreeningTransition = ScreeningTransition;
    static LOAN: LoanTransition = LoanTransition;
    static CLIENT_ACAT: ClientAcatTransition = ClientAcatTransition;
    static ACAT: AcatTransition = AcatTransition;
    static GROUP_SCREENING: GroupScreeningTransition = GroupScreeningTransition;
    static GENERIC: GenericTransition = GenericTransition;

    match entity_type {
        EntityType::Screening => &SCREENING,
        EntityType::Loan => &LOAN,
        EntityType::ClientAcat => &CLIENT_ACAT,
        EntityType::Acat => &ACAT,
        EntityType::GroupScreening => &GROUP_SCREENING,
        EntityType::Other => &GENERIC,
    }
}

/// Close the task under the pending precondition; a lost race is a conflict.
async fn close_task(
    ctx: &WorkflowContext,
    task: &Task,
    comment: Option<&str>,
) -> WorkflowResult<Task> {
    match ctx
        .tasks
        .close_if_pending(task.task_id, TaskLifecycleStatus::Completed, comment)
        .await?
    {
        Some(closed) => Ok(closed),
        None => {
            let status = ctx
                .tasks
                .get(task.task_id)
                .await?
                .map(|current| current.status)
                .unwrap_or(TaskLifecycleStatus::Completed);
            Err(WorkflowError::AlreadyClosed {
                task_id: task.task_id,
                status,
            })
        }
    }
}

/// Open the follow-up review task and notify the original task's assignee
/// about it. Unassigned originals fall back to their creator.
async fn open_review(
    ctx: &WorkflowContext,
    original: &Task,
    entity_branch: Uuid,
    acting: &Account,
    message: String,
) -> WorkflowResult<(Task, Uuid)> {
    let review = ctx
        .tasks
        .create(NewTask::review_of(original, acting.account_id, entity_branch))
        .await?;
    let recipient = original.user.unwrap_or(original.created_by);
    ctx.notifications
        .create(NewNotification {
            for_user: recipient,
            message,
            task_ref: review.task_id,
        })
        .await?;
    debug!(
        review_task = %review.task_id,
        recipient = %recipient,
        "Opened review task"
    );
    Ok((review, recipient))
}

/// Notify the task creator that their task reached a terminal outcome.
async fn notify_closure(
    ctx: &WorkflowContext,
    original: &Task,
    closed_task_id: Uuid,
    message: String,
) -> WorkflowResult<Uuid> {
    ctx.notifications
        .create(NewNotification {
            for_user: original.created_by,
            message,
            task_ref: closed_task_id,
        })
        .await?;
    Ok(original.created_by)
}

/// Screening approvals drive client eligibility.
pub struct ScreeningTransition;

#[async_trait]
impl TransitionHandler for ScreeningTransition {
    async fn apply(
        &self,
        ctx: &WorkflowContext,
        task: &Task,
        outcome: &BusinessOutcome,
        comment: Option<&str>,
        acting: &Account,
    ) -> WorkflowResult<TransitionReceipt> {
        let BusinessOutcome::Screening(outcome) = outcome else {
            return Err(mismatched_outcome(EntityType::Screening, outcome.as_str()));
        };

        let screening = ctx
            .screenings
            .get(task.entity_ref)
            .await?
            .ok_or_else(|| entity_missing(EntityType::Screening, task.entity_ref, task.task_id))?;

        let (entity_status, client_status) = match outcome {
            ScreeningOutcome::Approved => (ScreeningStatus::Approved, ClientStatus::Eligible),
            ScreeningOutcome::DeclinedFinal => {
                (ScreeningStatus::DeclinedFinal, ClientStatus::Ineligible)
            }
            ScreeningOutcome::DeclinedUnderReview => (
                ScreeningStatus::DeclinedUnderReview,
                ClientStatus::ScreeningInprogress,
            ),
        };

        ctx.screenings.set_status(screening.screening_id, entity_status).await?;
        ctx.clients.set_status(screening.client, client_status).await?;
        let closed = close_task(ctx, task, comment).await?;

        let (review_task, notified) = if matches!(outcome, ScreeningOutcome::DeclinedUnderReview) {
            let (review, recipient) = open_review(
                ctx,
                task,
                screening.branch,
                acting,
                "Screening returned for review".to_string(),
            )
            .await?;
            (Some(review), vec![recipient])
        } else {
            let recipient = notify_closure(
                ctx,
                task,
                closed.task_id,
                format!("Screening {entity_status}"),
            )
            .await?;
            (None, vec![recipient])
        };

        Ok(TransitionReceipt {
            task: closed,
            review_task,
            notified,
            entity_status: Some(entity_status.to_string()),
            related_status: Some(client_status.to_string()),
            applied: true,
        })
    }

    fn description(&self) -> &'static str {
        "Apply screening outcome and derive client eligibility"
    }
}

/// Loan outcomes drive the client's application status.
pub struct LoanTransition;

#[async_trait]
impl TransitionHandler for LoanTransition {
    async fn apply(
        &self,
        ctx: &WorkflowContext,
        task: &Task,
        outcome: &BusinessOutcome,
        comment: Option<&str>,
        acting: &Account,
    ) -> WorkflowResult<TransitionReceipt> {
        let BusinessOutcome::Loan(outcome) = outcome else {
            return Err(mismatched_outcome(EntityType::Loan, outcome.as_str()));
        };

        let loan = ctx
            .loans
            .get(task.entity_ref)
            .await?
            .ok_or_else(|| entity_missing(EntityType::Loan, task.entity_ref, task.task_id))?;

        let (entity_status, client_status) = match outcome {
            LoanOutcome::Accepted => (LoanStatus::Accepted, ClientStatus::LoanApplicationAccepted),
            LoanOutcome::Rejected => (LoanStatus::Rejected, ClientStatus::LoanApplicationRejected),
            LoanOutcome::LoanPaid => (LoanStatus::LoanPaid, ClientStatus::LoanPaid),
            LoanOutcome::DeclinedUnderReview => (
                LoanStatus::DeclinedUnderReview,
                ClientStatus::LoanApplicationInprogress,
            ),
        };

        ctx.loans.set_status(loan.loan_id, entity_status).await?;
        ctx.clients.set_status(loan.client, client_status).await?;
        let closed = close_task(ctx, task, comment).await?;

        let (review_task, notified) = if matches!(outcome, LoanOutcome::DeclinedUnderReview) {
            let (review, recipient) = open_review(
                ctx,
                task,
                loan.branch,
                acting,
                "Loan application returned for review".to_string(),
            )
            .await?;
            (Some(review), vec![recipient])
        } else {
            let recipient = notify_closure(
                ctx,
                task,
                closed.task_id,
                format!("Loan application {entity_status}"),
            )
            .await?;
            (None, vec![recipient])
        };

        Ok(TransitionReceipt {
            task: closed,
            review_task,
            notified,
            entity_status: Some(entity_status.to_string()),
            related_status: Some(client_status.to_string()),
            applied: true,
        })
    }

    fn description(&self) -> &'static str {
        "Apply loan outcome and derive client application status"
    }
}

/// Client ACAT authorization flow.
pub struct ClientAcatTransition;

#[async_trait]
impl TransitionHandler for ClientAcatTransition {
    async fn apply(
        &self,
        ctx: &WorkflowContext,
        task: &Task,
        outcome: &BusinessOutcome,
        comment: Option<&str>,
        acting: &Account,
    ) -> WorkflowResult<TransitionReceipt> {
        let BusinessOutcome::ClientAcat(outcome) = outcome else {
            return Err(mismatched_outcome(EntityType::ClientAcat, outcome.as_str()));
        };

        let client_acat = ctx
            .client_acats
            .get(task.entity_ref)
            .await?
            .ok_or_else(|| entity_missing(EntityType::ClientAcat, task.entity_ref, task.task_id))?;

        let (entity_status, client_status) = match outcome {
            ClientAcatOutcome::Authorized => {
                (ClientAcatStatus::Authorized, ClientStatus::AcatAuthorized)
            }
            ClientAcatOutcome::Resubmitted => {
                (ClientAcatStatus::Resubmitted, ClientStatus::AcatResubmitted)
            }
            ClientAcatOutcome::DeclinedForReview => (
                ClientAcatStatus::DeclinedForReview,
                ClientStatus::AcatDeclinedForReview,
            ),
            // Unmapped upstream: filtered out by the dispatcher
            ClientAcatOutcome::Submitted | ClientAcatOutcome::LoanGranted => {
                return Err(mismatched_outcome(EntityType::ClientAcat, "unmapped"))
            }
        };

        ctx.client_acats
            .set_status(client_acat.client_acat_id, entity_status)
            .await?;
        ctx.clients.set_status(client_acat.client, client_status).await?;
        let closed = close_task(ctx, task, comment).await?;

        let (review_task, notified) = if outcome != &ClientAcatOutcome::Authorized {
            let (review, recipient) = open_review(
                ctx,
                task,
                client_acat.branch,
                acting,
                "Client ACAT returned for review".to_string(),
            )
            .await?;
            (Some(review), vec![recipient])
        } else {
            let recipient = notify_closure(
                ctx,
                task,
                closed.task_id,
                format!("Client ACAT {entity_status}"),
            )
            .await?;
            (None, vec![recipient])
        };

        Ok(TransitionReceipt {
            task: closed,
            review_task,
            notified,
            entity_status: Some(entity_status.to_string()),
            related_status: Some(client_status.to_string()),
            applied: true,
        })
    }

    fn description(&self) -> &'static str {
        "Apply client ACAT outcome and derive client ACAT status"
    }
}

/// Per-crop ACAT authorization flow.
pub struct AcatTransition;

#[async_trait]
impl TransitionHandler for AcatTransition {
    async fn apply(
        &self,
        ctx: &WorkflowContext,
        task: &Task,
        outcome: &BusinessOutcome,
        comment: Option<&str>,
        acting: &Account,
    ) -> WorkflowResult<TransitionReceipt> {
        let BusinessOutcome::Acat(outcome) = outcome else {
            return Err(mismatched_outcome(EntityType::Acat, outcome.as_str()));
        };

        let acat = ctx
            .acats
            .get(task.entity_ref)
            .await?
            .ok_or_else(|| entity_missing(EntityType::Acat, task.entity_ref, task.task_id))?;

        let (entity_status, client_status) = match outcome {
            AcatOutcome::Authorized => (AcatStatus::Authorized, ClientStatus::AcatAuthorized),
            AcatOutcome::Resubmitted => (AcatStatus::Resubmitted, ClientStatus::AcatResubmitted),
            AcatOutcome::DeclinedForReview => (
                AcatStatus::DeclinedForReview,
                ClientStatus::AcatDeclinedForReview,
            ),
            // Unmapped upstream: filtered out by the dispatcher
            AcatOutcome::Inprogress | AcatOutcome::Submitted => {
                return Err(mismatched_outcome(EntityType::Acat, "unmapped"))
            }
        };

        ctx.acats.set_status(acat.acat_id, entity_status).await?;
        ctx.clients.set_status(acat.client, client_status).await?;
        let closed = close_task(ctx, task, comment).await?;

        let (review_task, notified) = if outcome != &AcatOutcome::Authorized {
            let (review, recipient) = open_review(
                ctx,
                task,
                acat.branch,
                acting,
                "ACAT returned for review".to_string(),
            )
            .await?;
            (Some(review), vec![recipient])
        } else {
            let recipient =
                notify_closure(ctx, task, closed.task_id, format!("ACAT {entity_status}")).await?;
            (None, vec![recipient])
        };

        Ok(TransitionReceipt {
            task: closed,
            review_task,
            notified,
            entity_status: Some(entity_status.to_string()),
            related_status: Some(client_status.to_string()),
            applied: true,
        })
    }

    fn description(&self) -> &'static str {
        "Apply crop ACAT outcome and derive client ACAT status"
    }
}

/// Group screenings drive the linked group, not a client.
pub struct GroupScreeningTransition;

#[async_trait]
impl TransitionHandler for GroupScreeningTransition {
    async fn apply(
        &self,
        ctx: &WorkflowContext,
        task: &Task,
        outcome: &BusinessOutcome,
        comment: Option<&str>,
        acting: &Account,
    ) -> WorkflowResult<TransitionReceipt> {
        let BusinessOutcome::GroupScreening(outcome) = outcome else {
            return Err(mismatched_outcome(
                EntityType::GroupScreening,
                outcome.as_str(),
            ));
        };

        let group_screening = ctx.group_screenings.get(task.entity_ref).await?.ok_or_else(|| {
            entity_missing(EntityType::GroupScreening, task.entity_ref, task.task_id)
        })?;

        let (entity_status, group_status) = match outcome {
            GroupScreeningOutcome::Approved => {
                (GroupScreeningStatus::Approved, GroupStatus::Eligible)
            }
            GroupScreeningOutcome::ScreeningDeclinedForReview => (
                GroupScreeningStatus::ScreeningDeclinedForReview,
                GroupStatus::ScreeningInProgress,
            ),
            // Unmapped upstream: filtered out by the dispatcher
            GroupScreeningOutcome::InProgress
            | GroupScreeningOutcome::Submitted
            | GroupScreeningOutcome::ScreeningDeclined => {
                return Err(mismatched_outcome(EntityType::GroupScreening, "unmapped"))
            }
        };

        ctx.group_screenings
            .set_status(group_screening.group_screening_id, entity_status)
            .await?;
        ctx.groups.set_status(group_screening.group, group_status).await?;
        let closed = close_task(ctx, task, comment).await?;

        let (review_task, notified) =
            if matches!(outcome, GroupScreeningOutcome::ScreeningDeclinedForReview) {
                let (review, recipient) = open_review(
                    ctx,
                    task,
                    group_screening.branch,
                    acting,
                    "Group screening returned for review".to_string(),
                )
                .await?;
                (Some(review), vec![recipient])
            } else {
                let recipient = notify_closure(
                    ctx,
                    task,
                    closed.task_id,
                    format!("Group screening {entity_status}"),
                )
                .await?;
                (None, vec![recipient])
            };

        Ok(TransitionReceipt {
            task: closed,
            review_task,
            notified,
            entity_status: Some(entity_status.to_string()),
            related_status: Some(group_status.to_string()),
            applied: true,
        })
    }

    fn description(&self) -> &'static str {
        "Apply group screening outcome and derive group status"
    }
}

/// Fall-through for tasks without a business entity: only the task's own
/// lifecycle moves, no entity mutation and no notification.
pub struct GenericTransition;

#[async_trait]
impl TransitionHandler for GenericTransition {
    async fn apply(
        &self,
        ctx: &WorkflowContext,
        task: &Task,
        outcome: &BusinessOutcome,
        comment: Option<&str>,
        _acting: &Account,
    ) -> WorkflowResult<TransitionReceipt> {
        let BusinessOutcome::Generic(outcome) = outcome else {
            return Err(mismatched_outcome(EntityType::Other, outcome.as_str()));
        };

        let target = outcome.lifecycle_status();
        let closed = match ctx
            .tasks
            .close_if_pending(task.task_id, target, comment)
            .await?
        {
            Some(closed) => closed,
            None => {
                return Err(WorkflowError::AlreadyClosed {
                    task_id: task.task_id,
                    status: target,
                })
            }
        };

        Ok(TransitionReceipt {
            task: closed,
            review_task: None,
            notified: Vec::new(),
            entity_status: None,
            related_status: None,
            applied: true,
        })
    }

    fn description(&self) -> &'static str {
        "Close the task without touching any business entity"
    }
}
