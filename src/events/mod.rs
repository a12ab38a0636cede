// Lifecycle event publishing for applied transitions.

pub mod publisher;

pub use publisher::{EventPublisher, PublishError, PublishedEvent};
