#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Lomis Core
//!
//! Back-office core for a multi-tenant microfinance loan-origination system.
//!
//! ## Overview
//!
//! Field officers and branch staff work through **tasks**: units of pending
//! work attached to a business entity (a screening, a loan application, a
//! client appraisal, a group screening). Closing a task with a business
//! outcome is the single write path that moves those entities through their
//! lifecycles. This crate implements that transition workflow end to end:
//! status vocabularies, per-entity transition handlers, permission checks,
//! review-task escalation, notifications, and the audit trail.
//!
//! ## Architecture
//!
//! The core implements a **transition dispatcher** over a closed set of
//! per-entity handlers. The dispatcher owns the cross-cutting sequence
//! (load, authorize, validate, dispatch, audit, publish); each handler owns
//! only the entity-specific effects of a business outcome.
//!
//! ## Module Organization
//!
//! - [`workflow`] - Status vocabularies, outcome parsing, transition handlers, dispatcher
//! - [`models`] - Data layer: tasks, entities, notifications, audit entries
//! - [`store`] - Persistence traits with in-memory and PostgreSQL backends
//! - [`permissions`] - Permission oracle and role-backed implementation
//! - [`events`] - In-process lifecycle event publishing
//! - [`config`] - Configuration management
//! - [`error`] - Structured error handling with HTTP response mapping
//! - [`constants`] - Status groups and system event names
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use lomis_core::store::MemoryBackend;
//! use lomis_core::permissions::StaticPermissionOracle;
//! use lomis_core::workflow::{TransitionDispatcher, WorkflowContext};
//! use lomis_core::events::EventPublisher;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = Arc::new(MemoryBackend::new());
//! let ctx = WorkflowContext::for_memory(backend);
//! let oracle = Arc::new(StaticPermissionOracle::new());
//! let dispatcher = TransitionDispatcher::new(ctx, oracle, EventPublisher::new(256));
//!
//! // let receipt = dispatcher
//! //     .apply_status_transition(task_id, "approved", None, &acting_account)
//! //     .await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod logging;
pub mod models;
pub mod permissions;
pub mod store;
pub mod workflow;

pub use config::LomisConfig;
pub use constants::{status_groups, REVIEW_TASK_TYPE};
// Re-export constants events with different name to avoid conflict
pub use constants::events as system_events;
pub use error::{ErrorResponse, LomisError, Result};
pub use events::EventPublisher;
pub use logging::init_structured_logging;
pub use workflow::{
    handler_for, legal_statuses, BusinessOutcome, EntityType, TaskLifecycleStatus,
    TransitionDispatcher, TransitionHandler, TransitionReceipt, WorkflowContext, WorkflowError,
    WorkflowResult,
};
