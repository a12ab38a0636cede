// Task status-transition workflow.
//
// The dispatcher validates a requested status against the referenced entity
// type's legal set, checks authorization, and routes to one handler per
// entity type. Typed status enums keep the task lifecycle and the business
// outcome vocabularies apart.

pub mod dispatcher;
pub mod errors;
pub mod handlers;
pub mod outcomes;
pub mod states;

// Re-export main types for convenient access
pub use dispatcher::TransitionDispatcher;
pub use errors::{WorkflowError, WorkflowResult};
pub use handlers::{handler_for, TransitionHandler, TransitionReceipt, WorkflowContext};
pub use outcomes::{legal_statuses, BusinessOutcome};
pub use states::{EntityType, TaskLifecycleStatus};
