use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
    Admin,
}

impl Role {
    /// Roles allowed to review the pending queue.
    pub fn is_approver(self) -> bool {
        matches!(self, Role::Teacher | Role::Admin)
    }

    /// Decision rule: admins decide on any application, teachers only on
    /// student applications.
    pub fn can_decide_for(self, applicant: Role) -> bool {
        match self {
            Role::Admin => true,
            Role::Teacher => applicant == Role::Student,
            Role::Student => false,
        }
    }

    /// Detail-view rule: the applicant themself, or anyone with the
    /// authority to decide on the application.
    pub fn can_view(self, applicant: Role, is_owner: bool) -> bool {
        is_owner || self.can_decide_for(applicant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_teachers_and_admins_approve() {
        assert!(!Role::Student.is_approver());
        assert!(Role::Teacher.is_approver());
        assert!(Role::Admin.is_approver());
    }

    #[test]
    fn admin_decides_on_any_applicant() {
        assert!(Role::Admin.can_decide_for(Role::Student));
        assert!(Role::Admin.can_decide_for(Role::Teacher));
        assert!(Role::Admin.can_decide_for(Role::Admin));
    }

    #[test]
    fn teacher_decides_only_on_students() {
        assert!(Role::Teacher.can_decide_for(Role::Student));
        assert!(!Role::Teacher.can_decide_for(Role::Teacher));
        assert!(!Role::Teacher.can_decide_for(Role::Admin));
    }

    #[test]
    fn student_never_decides() {
        assert!(!Role::Student.can_decide_for(Role::Student));
        assert!(!Role::Student.can_decide_for(Role::Teacher));
        assert!(!Role::Student.can_decide_for(Role::Admin));
    }

    #[test]
    fn owner_always_views_own_application() {
        assert!(Role::Student.can_view(Role::Student, true));
        assert!(!Role::Student.can_view(Role::Student, false));
        assert!(Role::Teacher.can_view(Role::Admin, true));
        assert!(!Role::Teacher.can_view(Role::Admin, false));
    }

    #[test]
    fn role_round_trips_through_strings() {
        for (text, role) in [
            ("student", Role::Student),
            ("teacher", Role::Teacher),
            ("admin", Role::Admin),
        ] {
            assert_eq!(text.parse::<Role>().unwrap(), role);
            assert_eq!(role.to_string(), text);
        }
        assert!("hr".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
    }
}
