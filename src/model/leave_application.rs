use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Lifecycle states of a leave application. `Pending` is the only state a
/// decision can be made from; the other two are terminal.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

impl LeaveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveStatus::Pending => "Pending",
            LeaveStatus::Approved => "Approved",
            LeaveStatus::Rejected => "Rejected",
        }
    }

    /// A valid decision target, i.e. anything but `Pending`.
    pub fn is_decision(self) -> bool {
        matches!(self, LeaveStatus::Approved | LeaveStatus::Rejected)
    }
}

/// One row of `leave_applications`, serialized to clients as stored.
/// Applicant name/role are denormalized at submission time and never
/// re-synced with the user record.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveApplication {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 42)]
    pub applicant_id: u64,
    #[schema(example = "Asha Verma")]
    pub applicant_name: String,
    #[schema(example = "student")]
    pub applicant_role: String,
    #[schema(example = "Sick")]
    pub leave_type: String,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-03", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "Medical")]
    pub reason: String,
    #[schema(example = "Pending")]
    pub status: String,
    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub submitted_at: Option<DateTime<Utc>>,
    pub approver_id: Option<u64>,
    pub approver_name: Option<String>,
    #[schema(example = "2026-01-02T00:00:00Z", format = "date-time", value_type = String)]
    pub approved_at: Option<DateTime<Utc>>,
    pub approver_remarks: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_strings() {
        for (text, status) in [
            ("Pending", LeaveStatus::Pending),
            ("Approved", LeaveStatus::Approved),
            ("Rejected", LeaveStatus::Rejected),
        ] {
            assert_eq!(text.parse::<LeaveStatus>().unwrap(), status);
            assert_eq!(status.as_str(), text);
            assert_eq!(status.to_string(), text);
        }
    }

    #[test]
    fn lowercase_and_unknown_statuses_rejected() {
        assert!("pending".parse::<LeaveStatus>().is_err());
        assert!("Cancelled".parse::<LeaveStatus>().is_err());
        assert!("".parse::<LeaveStatus>().is_err());
    }

    #[test]
    fn only_terminal_states_are_decisions() {
        assert!(!LeaveStatus::Pending.is_decision());
        assert!(LeaveStatus::Approved.is_decision());
        assert!(LeaveStatus::Rejected.is_decision());
    }
}
