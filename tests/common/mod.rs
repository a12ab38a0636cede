//! Shared fixtures for dispatcher integration tests.
//!
//! Everything runs against the in-memory backend with a static permission
//! oracle: one account holding AUTHORIZE on every category, one with no
//! grants at all.

// Not every suite uses every fixture builder.
#![allow(dead_code)]

use std::sync::Arc;

use chrono::Utc;
use lomis_core::events::EventPublisher;
use lomis_core::models::{
    Acat, Account, Client, ClientAcat, Group, GroupScreening, Loan, NewTask, Screening, Task,
};
use lomis_core::permissions::StaticPermissionOracle;
use lomis_core::store::{MemoryBackend, TaskStore};
use lomis_core::workflow::states::{
    AcatStatus, ClientAcatStatus, ClientStatus, GroupScreeningStatus, GroupStatus, LoanStatus,
    ScreeningStatus,
};
use lomis_core::workflow::{EntityType, TransitionDispatcher, WorkflowContext};
use uuid::Uuid;

pub struct Harness {
    pub backend: Arc<MemoryBackend>,
    pub oracle: Arc<StaticPermissionOracle>,
    pub dispatcher: TransitionDispatcher,
    pub branch: Uuid,
    /// Holds AUTHORIZE on every permission category
    pub authorizer: Account,
    /// Holds a role with no grants
    pub powerless: Account,
}

impl Harness {
    pub fn new() -> Self {
        let backend = Arc::new(MemoryBackend::new());
        let oracle = Arc::new(StaticPermissionOracle::new());
        let branch = Uuid::new_v4();

        let authorizer_role = Uuid::new_v4();
        oracle.grant_authorize_all(authorizer_role);
        let authorizer = Account::new(Uuid::new_v4(), Some(authorizer_role), branch);
        let powerless = Account::new(Uuid::new_v4(), Some(Uuid::new_v4()), branch);

        let dispatcher = TransitionDispatcher::new(
            WorkflowContext::for_memory(backend.clone()),
            oracle.clone(),
            EventPublisher::new(64),
        );

        Self {
            backend,
            oracle,
            dispatcher,
            branch,
            authorizer,
            powerless,
        }
    }

    pub fn seed_client(&self) -> Uuid {
        let now = Utc::now().naive_utc();
        let client = Client {
            client_id: Uuid::new_v4(),
            branch: self.branch,
            status: ClientStatus::New,
            group: None,
            created_at: now,
            updated_at: now,
        };
        let client_id = client.client_id;
        self.backend.insert_client(client);
        client_id
    }

    pub fn seed_group(&self) -> Uuid {
        let now = Utc::now().naive_utc();
        let group = Group {
            group_id: Uuid::new_v4(),
            branch: self.branch,
            status: GroupStatus::New,
            members: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        let group_id = group.group_id;
        self.backend.insert_group(group);
        group_id
    }

    /// Seed a screening plus its pending approval task.
    /// Returns (task, screening id, client id).
    pub async fn seed_screening_task(&self) -> (Task, Uuid, Uuid) {
        self.seed_screening_task_assigned_to(Some(Uuid::new_v4())).await
    }

    /// Same as [`seed_screening_task`](Self::seed_screening_task) but with an
    /// explicit (possibly absent) assignee.
    pub async fn seed_screening_task_assigned_to(
        &self,
        assignee: Option<Uuid>,
    ) -> (Task, Uuid, Uuid) {
        let client_id = self.seed_client();
        let now = Utc::now().naive_utc();
        let screening = Screening {
            screening_id: Uuid::new_v4(),
            client: client_id,
            branch: self.branch,
            status: ScreeningStatus::New,
            created_by: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        };
        let screening_id = screening.screening_id;
        self.backend.insert_screening(screening);
        let task = self
            .pending_task_assigned_to(
                EntityType::Screening,
                screening_id,
                "screening_approval",
                assignee,
            )
            .await;
        (task, screening_id, client_id)
    }

    pub async fn seed_loan_task(&self) -> (Task, Uuid, Uuid) {
        let client_id = self.seed_client();
        let now = Utc::now().naive_utc();
        let loan = Loan {
            loan_id: Uuid::new_v4(),
            client: client_id,
            branch: self.branch,
            status: LoanStatus::New,
            created_by: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        };
        let loan_id = loan.loan_id;
        self.backend.insert_loan(loan);
        let task = self
            .pending_task(EntityType::Loan, loan_id, "loan_approval")
            .await;
        (task, loan_id, client_id)
    }

    pub async fn seed_client_acat_task(&self) -> (Task, Uuid, Uuid) {
        let client_id = self.seed_client();
        let now = Utc::now().naive_utc();
        let client_acat = ClientAcat {
            client_acat_id: Uuid::new_v4(),
            client: client_id,
            branch: self.branch,
            status: ClientAcatStatus::New,
            acats: Vec::new(),
            created_by: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        };
        let client_acat_id = client_acat.client_acat_id;
        self.backend.insert_client_acat(client_acat);
        let task = self
            .pending_task(EntityType::ClientAcat, client_acat_id, "acat_authorization")
            .await;
        (task, client_acat_id, client_id)
    }

    pub async fn seed_acat_task(&self) -> (Task, Uuid, Uuid) {
        let client_id = self.seed_client();
        let now = Utc::now().naive_utc();
        let acat = Acat {
            acat_id: Uuid::new_v4(),
            client: client_id,
            client_acat: Uuid::new_v4(),
            branch: self.branch,
            status: AcatStatus::New,
            crop: Some("maize".to_string()),
            created_by: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        };
        let acat_id = acat.acat_id;
        self.backend.insert_acat(acat);
        let task = self
            .pending_task(EntityType::Acat, acat_id, "acat_authorization")
            .await;
        (task, acat_id, client_id)
    }

    pub async fn seed_group_screening_task(&self) -> (Task, Uuid, Uuid) {
        let group_id = self.seed_group();
        let now = Utc::now().naive_utc();
        let group_screening = GroupScreening {
            group_screening_id: Uuid::new_v4(),
            group: group_id,
            branch: self.branch,
            status: GroupScreeningStatus::New,
            created_by: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        };
        let group_screening_id = group_screening.group_screening_id;
        self.backend.insert_group_screening(group_screening);
        let task = self
            .pending_task(
                EntityType::GroupScreening,
                group_screening_id,
                "group_screening_approval",
            )
            .await;
        (task, group_screening_id, group_id)
    }

    pub async fn seed_other_task(&self) -> Task {
        self.pending_task(EntityType::Other, Uuid::new_v4(), "data_correction")
            .await
    }

    async fn pending_task(&self, entity_type: EntityType, entity_ref: Uuid, task_type: &str) -> Task {
        self.pending_task_assigned_to(entity_type, entity_ref, task_type, Some(Uuid::new_v4()))
            .await
    }

    async fn pending_task_assigned_to(
        &self,
        entity_type: EntityType,
        entity_ref: Uuid,
        task_type: &str,
        assignee: Option<Uuid>,
    ) -> Task {
        self.backend
            .create(NewTask {
                entity_type,
                entity_ref,
                task_type: task_type.to_string(),
                user: assignee,
                created_by: Uuid::new_v4(),
                branch: self.branch,
                comment: None,
            })
            .await
            .expect("seeding a task cannot fail in memory")
    }
}
