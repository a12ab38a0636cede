//! Requested business outcomes and their legal sets per entity type.
//!
//! A transition request carries a raw status string. Which strings are legal
//! depends entirely on the referenced entity's type, so parsing is keyed by
//! [`EntityType`] and a failed parse reports the full legal set for that type
//! so the caller can render it.

use super::states::{EntityType, TaskLifecycleStatus};
use serde::{Deserialize, Serialize};

/// Requested outcome for a screening task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreeningOutcome {
    Approved,
    DeclinedFinal,
    DeclinedUnderReview,
}

/// Requested outcome for a loan-application task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanOutcome {
    Accepted,
    Rejected,
    DeclinedUnderReview,
    LoanPaid,
}

/// Requested outcome for a client ACAT task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientAcatOutcome {
    Resubmitted,
    Submitted,
    LoanGranted,
    DeclinedForReview,
    Authorized,
}

/// Requested outcome for a crop ACAT task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcatOutcome {
    Inprogress,
    Submitted,
    Resubmitted,
    Authorized,
    DeclinedForReview,
}

/// Requested outcome for a group-screening task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupScreeningOutcome {
    InProgress,
    Submitted,
    Approved,
    ScreeningDeclined,
    ScreeningDeclinedForReview,
}

/// Requested outcome for a task with no business entity behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenericOutcome {
    Completed,
    Cancelled,
}

impl GenericOutcome {
    /// Target lifecycle status for the task itself
    pub fn lifecycle_status(&self) -> TaskLifecycleStatus {
        match self {
            Self::Completed => TaskLifecycleStatus::Completed,
            Self::Cancelled => TaskLifecycleStatus::Cancelled,
        }
    }
}

/// A validated transition request, tagged by the entity type it applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "entity_type", content = "outcome")]
pub enum BusinessOutcome {
    #[serde(rename = "screening")]
    Screening(ScreeningOutcome),
    #[serde(rename = "loan")]
    Loan(LoanOutcome),
    #[serde(rename = "clientACAT")]
    ClientAcat(ClientAcatOutcome),
    #[serde(rename = "ACAT")]
    Acat(AcatOutcome),
    #[serde(rename = "group_screening")]
    GroupScreening(GroupScreeningOutcome),
    #[serde(rename = "other")]
    Generic(GenericOutcome),
}

/// Legal requested-status values, fixed per entity type.
pub fn legal_statuses(entity_type: EntityType) -> &'static [&'static str] {
    match entity_type {
        EntityType::Screening => &["approved", "declined_final", "declined_under_review"],
        EntityType::Loan => &["accepted", "rejected", "declined_under_review", "loan_paid"],
        EntityType::ClientAcat => &[
            "resubmitted",
            "submitted",
            "loan_granted",
            "declined_for_review",
            "authorized",
        ],
        EntityType::Acat => &[
            "inprogress",
            "submitted",
            "resubmitted",
            "authorized",
            "declined_for_review",
        ],
        EntityType::GroupScreening => &[
            "in_progress",
            "submitted",
            "approved",
            "screening_declined",
            "screening_declined_for_review",
        ],
        EntityType::Other => &["completed", "cancelled"],
    }
}

impl BusinessOutcome {
    /// Parse a raw requested status against the legal set for `entity_type`.
    ///
    /// On failure returns the legal set so the boundary can enumerate it.
    pub fn parse(entity_type: EntityType, raw: &str) -> Result<Self, &'static [&'static str]> {
        let illegal = || legal_statuses(entity_type);
        match entity_type {
            EntityType::Screening => match raw {
                "approved" => Ok(Self::Screening(ScreeningOutcome::Approved)),
                "declined_final" => Ok(Self::Screening(ScreeningOutcome::DeclinedFinal)),
                "declined_under_review" => {
                    Ok(Self::Screening(ScreeningOutcome::DeclinedUnderReview))
                }
                _ => Err(illegal()),
            },
            EntityType::Loan => match raw {
                "accepted" => Ok(Self::Loan(LoanOutcome::Accepted)),
                "rejected" => Ok(Self::Loan(LoanOutcome::Rejected)),
                "declined_under_review" => Ok(Self::Loan(LoanOutcome::DeclinedUnderReview)),
                "loan_paid" => Ok(Self::Loan(LoanOutcome::LoanPaid)),
                _ => Err(illegal()),
            },
            EntityType::ClientAcat => match raw {
                "resubmitted" => Ok(Self::ClientAcat(ClientAcatOutcome::Resubmitted)),
                "submitted" => Ok(Self::ClientAcat(ClientAcatOutcome::Submitted)),
                "loan_granted" => Ok(Self::ClientAcat(ClientAcatOutcome::LoanGranted)),
                "declined_for_review" => Ok(Self::ClientAcat(ClientAcatOutcome::DeclinedForReview)),
                "authorized" => Ok(Self::ClientAcat(ClientAcatOutcome::Authorized)),
                _ => Err(illegal()),
            },
            EntityType::Acat => match raw {
                "inprogress" => Ok(Self::Acat(AcatOutcome::Inprogress)),
                "submitted" => Ok(Self::Acat(AcatOutcome::Submitted)),
                "resubmitted" => Ok(Self::Acat(AcatOutcome::Resubmitted)),
                "authorized" => Ok(Self::Acat(AcatOutcome::Authorized)),
                "declined_for_review" => Ok(Self::Acat(AcatOutcome::DeclinedForReview)),
                _ => Err(illegal()),
            },
            EntityType::GroupScreening => match raw {
                "in_progress" => Ok(Self::GroupScreening(GroupScreeningOutcome::InProgress)),
                "submitted" => Ok(Self::GroupScreening(GroupScreeningOutcome::Submitted)),
                "approved" => Ok(Self::GroupScreening(GroupScreeningOutcome::Approved)),
                "screening_declined" => {
                    Ok(Self::GroupScreening(GroupScreeningOutcome::ScreeningDeclined))
                }
                "screening_declined_for_review" => Ok(Self::GroupScreening(
                    GroupScreeningOutcome::ScreeningDeclinedForReview,
                )),
                _ => Err(illegal()),
            },
            EntityType::Other => match raw {
                "completed" => Ok(Self::Generic(GenericOutcome::Completed)),
                "cancelled" => Ok(Self::Generic(GenericOutcome::Cancelled)),
                _ => Err(illegal()),
            },
        }
    }

    /// Entity type this outcome belongs to
    pub fn entity_type(&self) -> EntityType {
        match self {
            Self::Screening(_) => EntityType::Screening,
            Self::Loan(_) => EntityType::Loan,
            Self::ClientAcat(_) => EntityType::ClientAcat,
            Self::Acat(_) => EntityType::Acat,
            Self::GroupScreening(_) => EntityType::GroupScreening,
            Self::Generic(_) => EntityType::Other,
        }
    }

    /// Raw wire string of the requested status
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Screening(ScreeningOutcome::Approved) => "approved",
            Self::Screening(ScreeningOutcome::DeclinedFinal) => "declined_final",
            Self::Screening(ScreeningOutcome::DeclinedUnderReview) => "declined_under_review",
            Self::Loan(LoanOutcome::Accepted) => "accepted",
            Self::Loan(LoanOutcome::Rejected) => "rejected",
            Self::Loan(LoanOutcome::DeclinedUnderReview) => "declined_under_review",
            Self::Loan(LoanOutcome::LoanPaid) => "loan_paid",
            Self::ClientAcat(ClientAcatOutcome::Resubmitted) => "resubmitted",
            Self::ClientAcat(ClientAcatOutcome::Submitted) => "submitted",
            Self::ClientAcat(ClientAcatOutcome::LoanGranted) => "loan_granted",
            Self::ClientAcat(ClientAcatOutcome::DeclinedForReview) => "declined_for_review",
            Self::ClientAcat(ClientAcatOutcome::Authorized) => "authorized",
            Self::Acat(AcatOutcome::Inprogress) => "inprogress",
            Self::Acat(AcatOutcome::Submitted) => "submitted",
            Self::Acat(AcatOutcome::Resubmitted) => "resubmitted",
            Self::Acat(AcatOutcome::Authorized) => "authorized",
            Self::Acat(AcatOutcome::DeclinedForReview) => "declined_for_review",
            Self::GroupScreening(GroupScreeningOutcome::InProgress) => "in_progress",
            Self::GroupScreening(GroupScreeningOutcome::Submitted) => "submitted",
            Self::GroupScreening(GroupScreeningOutcome::Approved) => "approved",
            Self::GroupScreening(GroupScreeningOutcome::ScreeningDeclined) => "screening_declined",
            Self::GroupScreening(GroupScreeningOutcome::ScreeningDeclinedForReview) => {
                "screening_declined_for_review"
            }
            Self::Generic(GenericOutcome::Completed) => "completed",
            Self::Generic(GenericOutcome::Cancelled) => "cancelled",
        }
    }

    /// Whether a successful transition spawns a follow-up review task
    pub fn spawns_review(&self) -> bool {
        matches!(
            self,
            Self::Screening(ScreeningOutcome::DeclinedUnderReview)
                | Self::Loan(LoanOutcome::DeclinedUnderReview)
                | Self::ClientAcat(ClientAcatOutcome::Resubmitted)
                | Self::ClientAcat(ClientAcatOutcome::DeclinedForReview)
                | Self::Acat(AcatOutcome::Resubmitted)
                | Self::Acat(AcatOutcome::DeclinedForReview)
                | Self::GroupScreening(GroupScreeningOutcome::ScreeningDeclinedForReview)
        )
    }

    /// Legal-but-unmapped statuses: accepted by validation, but no handler
    /// branch exists for them upstream, so applying one writes nothing.
    pub fn is_mapped(&self) -> bool {
        !matches!(
            self,
            Self::ClientAcat(ClientAcatOutcome::Submitted)
                | Self::ClientAcat(ClientAcatOutcome::LoanGranted)
                | Self::Acat(AcatOutcome::Inprogress)
                | Self::Acat(AcatOutcome::Submitted)
                | Self::GroupScreening(GroupScreeningOutcome::InProgress)
                | Self::GroupScreening(GroupScreeningOutcome::Submitted)
                | Self::GroupScreening(GroupScreeningOutcome::ScreeningDeclined)
        )
    }
}
