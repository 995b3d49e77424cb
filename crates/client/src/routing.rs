//! Pages and guard decisions.

use classroom_core::Role;

/// A view the portal can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    /// Unauthenticated landing view offering login and signup.
    Entry,
    /// Assignment management for teachers.
    TeacherDashboard,
    /// Assignment listing and submission for students.
    StudentDashboard,
}

impl Page {
    /// The dashboard belonging to a role.
    #[must_use]
    pub const fn dashboard(role: Role) -> Self {
        match role {
            Role::Teacher => Self::TeacherDashboard,
            Role::Student => Self::StudentDashboard,
        }
    }

    /// Role a viewer must hold to see this page. `None` for the entry page.
    #[must_use]
    pub const fn required_role(self) -> Option<Role> {
        match self {
            Self::Entry => None,
            Self::TeacherDashboard => Some(Role::Teacher),
            Self::StudentDashboard => Some(Role::Student),
        }
    }

    /// Human-readable page name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Entry => "entry page",
            Self::TeacherDashboard => "teacher dashboard",
            Self::StudentDashboard => "student dashboard",
        }
    }
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of a page-load guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The viewer may see the page.
    Allow,
    /// The viewer belongs elsewhere.
    Redirect(Page),
}

impl Decision {
    /// Whether the page may be shown.
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_requires_its_own_role() {
        for role in [Role::Teacher, Role::Student] {
            assert_eq!(Page::dashboard(role).required_role(), Some(role));
        }
        assert_eq!(Page::Entry.required_role(), None);
    }

    #[test]
    fn test_decision_is_allowed() {
        assert!(Decision::Allow.is_allowed());
        assert!(!Decision::Redirect(Page::Entry).is_allowed());
    }
}
