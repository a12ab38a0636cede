//! Status vocabularies for tasks and the business entities they reference.
//!
//! The task's own lifecycle (`TaskLifecycleStatus`) and the business outcome
//! vocabulary a caller may request are distinct domains, even though the
//! upstream back office stored both under a single `status` field. Keeping
//! them as separate enums prevents the category error that collision invites.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle of a work item itself, independent of the referenced entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskLifecycleStatus {
    /// Work item is open and awaiting a transition
    Pending,
    /// Work item was closed by a successful transition
    Completed,
    /// Work item was closed without being acted on
    Cancelled,
}

impl TaskLifecycleStatus {
    /// Terminal work items accept no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl Default for TaskLifecycleStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl fmt::Display for TaskLifecycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Completed => write!(f, "completed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl FromStr for TaskLifecycleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("Invalid task lifecycle status: {s}")),
        }
    }
}

/// Kind of business entity a task references.
///
/// The wire strings preserve the upstream vocabulary, including the
/// mixed-case ACAT spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    #[serde(rename = "screening")]
    Screening,
    #[serde(rename = "loan")]
    Loan,
    #[serde(rename = "clientACAT")]
    ClientAcat,
    #[serde(rename = "ACAT")]
    Acat,
    #[serde(rename = "group_screening")]
    GroupScreening,
    /// Tasks not tied to a business entity; only their own lifecycle moves
    #[serde(rename = "other")]
    Other,
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Screening => write!(f, "screening"),
            Self::Loan => write!(f, "loan"),
            Self::ClientAcat => write!(f, "clientACAT"),
            Self::Acat => write!(f, "ACAT"),
            Self::GroupScreening => write!(f, "group_screening"),
            Self::Other => write!(f, "other"),
        }
    }
}

impl FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "screening" => Ok(Self::Screening),
            "loan" => Ok(Self::Loan),
            "clientACAT" => Ok(Self::ClientAcat),
            "ACAT" => Ok(Self::Acat),
            "group_screening" => Ok(Self::GroupScreening),
            "other" => Ok(Self::Other),
            _ => Err(format!("Invalid entity type: {s}")),
        }
    }
}

/// Underwriting status of a screening form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreeningStatus {
    New,
    Approved,
    DeclinedFinal,
    DeclinedUnderReview,
}

impl fmt::Display for ScreeningStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::New => write!(f, "new"),
            Self::Approved => write!(f, "approved"),
            Self::DeclinedFinal => write!(f, "declined_final"),
            Self::DeclinedUnderReview => write!(f, "declined_under_review"),
        }
    }
}

impl FromStr for ScreeningStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "approved" => Ok(Self::Approved),
            "declined_final" => Ok(Self::DeclinedFinal),
            "declined_under_review" => Ok(Self::DeclinedUnderReview),
            _ => Err(format!("Invalid screening status: {s}")),
        }
    }
}

/// Status of a loan application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    New,
    Accepted,
    Rejected,
    DeclinedUnderReview,
    LoanPaid,
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::New => write!(f, "new"),
            Self::Accepted => write!(f, "accepted"),
            Self::Rejected => write!(f, "rejected"),
            Self::DeclinedUnderReview => write!(f, "declined_under_review"),
            Self::LoanPaid => write!(f, "loan_paid"),
        }
    }
}

impl FromStr for LoanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            "declined_under_review" => Ok(Self::DeclinedUnderReview),
            "loan_paid" => Ok(Self::LoanPaid),
            _ => Err(format!("Invalid loan status: {s}")),
        }
    }
}

/// Status of a client-level cost-assessment (ACAT) form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientAcatStatus {
    New,
    Inprogress,
    Submitted,
    Resubmitted,
    Authorized,
    DeclinedForReview,
    LoanGranted,
}

impl fmt::Display for ClientAcatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::New => write!(f, "new"),
            Self::Inprogress => write!(f, "inprogress"),
            Self::Submitted => write!(f, "submitted"),
            Self::Resubmitted => write!(f, "resubmitted"),
            Self::Authorized => write!(f, "authorized"),
            Self::DeclinedForReview => write!(f, "declined_for_review"),
            Self::LoanGranted => write!(f, "loan_granted"),
        }
    }
}

impl FromStr for ClientAcatStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "inprogress" => Ok(Self::Inprogress),
            "submitted" => Ok(Self::Submitted),
            "resubmitted" => Ok(Self::Resubmitted),
            "authorized" => Ok(Self::Authorized),
            "declined_for_review" => Ok(Self::DeclinedForReview),
            "loan_granted" => Ok(Self::LoanGranted),
            _ => Err(format!("Invalid client ACAT status: {s}")),
        }
    }
}

/// Status of a per-crop cost-assessment (ACAT) form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcatStatus {
    New,
    Inprogress,
    Submitted,
    Resubmitted,
    Authorized,
    DeclinedForReview,
}

impl fmt::Display for AcatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::New => write!(f, "new"),
            Self::Inprogress => write!(f, "inprogress"),
            Self::Submitted => write!(f, "submitted"),
            Self::Resubmitted => write!(f, "resubmitted"),
            Self::Authorized => write!(f, "authorized"),
            Self::DeclinedForReview => write!(f, "declined_for_review"),
        }
    }
}

impl FromStr for AcatStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "inprogress" => Ok(Self::Inprogress),
            "submitted" => Ok(Self::Submitted),
            "resubmitted" => Ok(Self::Resubmitted),
            "authorized" => Ok(Self::Authorized),
            "declined_for_review" => Ok(Self::DeclinedForReview),
            _ => Err(format!("Invalid ACAT status: {s}")),
        }
    }
}

/// Status of a group screening form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupScreeningStatus {
    New,
    InProgress,
    Submitted,
    Approved,
    ScreeningDeclined,
    ScreeningDeclinedForReview,
}

impl fmt::Display for GroupScreeningStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::New => write!(f, "new"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Submitted => write!(f, "submitted"),
            Self::Approved => write!(f, "approved"),
            Self::ScreeningDeclined => write!(f, "screening_declined"),
            Self::ScreeningDeclinedForReview => write!(f, "screening_declined_for_review"),
        }
    }
}

impl FromStr for GroupScreeningStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "in_progress" => Ok(Self::InProgress),
            "submitted" => Ok(Self::Submitted),
            "approved" => Ok(Self::Approved),
            "screening_declined" => Ok(Self::ScreeningDeclined),
            "screening_declined_for_review" => Ok(Self::ScreeningDeclinedForReview),
            _ => Err(format!("Invalid group screening status: {s}")),
        }
    }
}

/// Derived underwriting status of a client.
///
/// The ACAT values keep the upstream mixed-case wire spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClientStatus {
    #[serde(rename = "new")]
    New,
    #[serde(rename = "eligible")]
    Eligible,
    #[serde(rename = "ineligible")]
    Ineligible,
    #[serde(rename = "screening_inprogress")]
    ScreeningInprogress,
    #[serde(rename = "loan_application_accepted")]
    LoanApplicationAccepted,
    #[serde(rename = "loan_application_rejected")]
    LoanApplicationRejected,
    #[serde(rename = "loan_application_inprogress")]
    LoanApplicationInprogress,
    #[serde(rename = "loan_paid")]
    LoanPaid,
    #[serde(rename = "ACAT_Authorized")]
    AcatAuthorized,
    #[serde(rename = "ACAT_Resubmitted")]
    AcatResubmitted,
    #[serde(rename = "ACAT_Declined_For_Review")]
    AcatDeclinedForReview,
}

impl fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::New => write!(f, "new"),
            Self::Eligible => write!(f, "eligible"),
            Self::Ineligible => write!(f, "ineligible"),
            Self::ScreeningInprogress => write!(f, "screening_inprogress"),
            Self::LoanApplicationAccepted => write!(f, "loan_application_accepted"),
            Self::LoanApplicationRejected => write!(f, "loan_application_rejected"),
            Self::LoanApplicationInprogress => write!(f, "loan_application_inprogress"),
            Self::LoanPaid => write!(f, "loan_paid"),
            Self::AcatAuthorized => write!(f, "ACAT_Authorized"),
            Self::AcatResubmitted => write!(f, "ACAT_Resubmitted"),
            Self::AcatDeclinedForReview => write!(f, "ACAT_Declined_For_Review"),
        }
    }
}

impl FromStr for ClientStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "eligible" => Ok(Self::Eligible),
            "ineligible" => Ok(Self::Ineligible),
            "screening_inprogress" => Ok(Self::ScreeningInprogress),
            "loan_application_accepted" => Ok(Self::LoanApplicationAccepted),
            "loan_application_rejected" => Ok(Self::LoanApplicationRejected),
            "loan_application_inprogress" => Ok(Self::LoanApplicationInprogress),
            "loan_paid" => Ok(Self::LoanPaid),
            "ACAT_Authorized" => Ok(Self::AcatAuthorized),
            "ACAT_Resubmitted" => Ok(Self::AcatResubmitted),
            "ACAT_Declined_For_Review" => Ok(Self::AcatDeclinedForReview),
            _ => Err(format!("Invalid client status: {s}")),
        }
    }
}

/// Derived screening status of a solidarity group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupStatus {
    New,
    Eligible,
    ScreeningInProgress,
}

impl fmt::Display for GroupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::New => write!(f, "new"),
            Self::Eligible => write!(f, "eligible"),
            Self::ScreeningInProgress => write!(f, "screening_in_progress"),
        }
    }
}

impl FromStr for GroupStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "eligible" => Ok(Self::Eligible),
            "screening_in_progress" => Ok(Self::ScreeningInProgress),
            _ => Err(format!("Invalid group status: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_terminal_check() {
        assert!(TaskLifecycleStatus::Completed.is_terminal());
        assert!(TaskLifecycleStatus::Cancelled.is_terminal());
        assert!(!TaskLifecycleStatus::Pending.is_terminal());
    }

    #[test]
    fn test_entity_type_wire_strings() {
        assert_eq!(EntityType::ClientAcat.to_string(), "clientACAT");
        assert_eq!(EntityType::Acat.to_string(), "ACAT");
        assert_eq!(
            "group_screening".parse::<EntityType>().unwrap(),
            EntityType::GroupScreening
        );
        assert!("loanACAT".parse::<EntityType>().is_err());
    }

    #[test]
    fn test_client_status_mixed_case_spellings() {
        assert_eq!(
            ClientStatus::AcatDeclinedForReview.to_string(),
            "ACAT_Declined_For_Review"
        );
        assert_eq!(
            "ACAT_Authorized".parse::<ClientStatus>().unwrap(),
            ClientStatus::AcatAuthorized
        );
        // Lowercase variants are not valid wire values
        assert!("acat_authorized".parse::<ClientStatus>().is_err());
    }

    #[test]
    fn test_status_serde_round_trip() {
        let json = serde_json::to_string(&ClientStatus::AcatResubmitted).unwrap();
        assert_eq!(json, "\"ACAT_Resubmitted\"");
        let parsed: ClientStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, ClientStatus::AcatResubmitted);

        let json =
            serde_json::to_string(&GroupScreeningStatus::ScreeningDeclinedForReview).unwrap();
        assert_eq!(json, "\"screening_declined_for_review\"");
    }

    #[test]
    fn test_display_parse_round_trip() {
        for status in [
            LoanStatus::Accepted,
            LoanStatus::Rejected,
            LoanStatus::DeclinedUnderReview,
            LoanStatus::LoanPaid,
        ] {
            assert_eq!(status.to_string().parse::<LoanStatus>().unwrap(), status);
        }
        for status in [GroupStatus::Eligible, GroupStatus::ScreeningInProgress] {
            assert_eq!(status.to_string().parse::<GroupStatus>().unwrap(), status);
        }
    }
}
