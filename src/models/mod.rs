pub mod acat;
pub mod account;
pub mod audit;
pub mod client;
pub mod client_acat;
pub mod group;
pub mod group_screening;
pub mod loan;
pub mod notification;
pub mod screening;
pub mod task;

// Re-export core models for easy access
pub use acat::Acat;
pub use account::Account;
pub use audit::{AuditEntry, NewAuditEntry};
pub use client::Client;
pub use client_acat::ClientAcat;
pub use group::Group;
pub use group_screening::GroupScreening;
pub use loan::Loan;
pub use notification::{NewNotification, Notification};
pub use screening::Screening;
pub use task::{NewTask, Task};
