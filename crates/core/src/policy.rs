//! Authorization policies for categories and issues.
//!
//! A policy is a pure function of `(actor, action, subject)`. It never reads
//! ambient session state: the caller passes the actor (or `None` for an
//! anonymous request) explicitly.

use std::fmt;

use crate::error::CoreError;
use crate::roles::{self, ROLE_ADMIN};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Actor
// ---------------------------------------------------------------------------

/// The authenticated identity performing an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: DbId,
    roles: Vec<String>,
}

impl Actor {
    /// Build an actor from its stored roles. The base role is always added.
    pub fn new<S: AsRef<str>>(user_id: DbId, roles: &[S]) -> Self {
        Self {
            user_id,
            roles: roles::effective_roles(roles),
        }
    }

    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(ROLE_ADMIN)
    }
}

// ---------------------------------------------------------------------------
// Decisions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    View,
    Create,
    Edit,
    Delete,
}

/// Entity kind a policy guards; used to phrase denial messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Category,
    Issue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    /// No actor is attached to the request.
    Unauthenticated,
    /// The actor lacks the role (or ownership) the action requires.
    InsufficientRole,
    /// The category still owns issues and cannot be deleted.
    HasAssociatedIssues { name: String, count: i64 },
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthenticated => f.write_str("Authentication required"),
            Self::InsufficientRole => f.write_str("Insufficient role"),
            Self::HasAssociatedIssues { name, count } => write!(
                f,
                "Cannot delete category \"{name}\" because it has {count} associated issue(s). \
                 Please reassign or delete the issues first."
            ),
        }
    }
}

/// Outcome of a policy evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
    /// The policy does not apply to this action/subject combination.
    Abstain,
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Collapse a decision into a result for a single-policy call site.
    ///
    /// `Abstain` is treated like a plain permission denial.
    pub fn into_result(self, action: Action, resource: Resource) -> Result<(), CoreError> {
        match self {
            Self::Allow => Ok(()),
            Self::Deny(DenyReason::Unauthenticated) => Err(CoreError::Unauthorized(
                DenyReason::Unauthenticated.to_string(),
            )),
            Self::Deny(reason @ DenyReason::HasAssociatedIssues { .. }) => {
                Err(CoreError::Integrity(reason.to_string()))
            }
            Self::Deny(DenyReason::InsufficientRole) | Self::Abstain => Err(
                CoreError::Forbidden(permission_message(action, resource)),
            ),
        }
    }
}

/// User-facing denial message for a role failure.
pub fn permission_message(action: Action, resource: Resource) -> String {
    let (verb, subject) = match (action, resource) {
        (Action::Create, Resource::Category) => ("create", "categories"),
        (Action::Create, Resource::Issue) => ("create", "issues"),
        (Action::View, Resource::Category) => ("view", "this category"),
        (Action::View, Resource::Issue) => ("view", "this issue"),
        (Action::Edit, Resource::Category) => ("edit", "this category"),
        (Action::Edit, Resource::Issue) => ("edit", "this issue"),
        (Action::Delete, Resource::Category) => ("delete", "this category"),
        (Action::Delete, Resource::Issue) => ("delete", "this issue"),
    };
    format!("You do not have permission to {verb} {subject}.")
}

// ---------------------------------------------------------------------------
// Category policy
// ---------------------------------------------------------------------------

/// The facts about a category the policy needs.
#[derive(Debug, Clone, Copy)]
pub struct CategorySubject<'a> {
    pub name: &'a str,
    pub issue_count: i64,
}

/// View is public; create/edit require admin; delete additionally requires
/// the category to own no issues.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryPolicy;

impl CategoryPolicy {
    pub fn evaluate(
        &self,
        actor: Option<&Actor>,
        action: Action,
        subject: Option<&CategorySubject<'_>>,
    ) -> Decision {
        if action == Action::View {
            return Decision::Allow;
        }
        if matches!(action, Action::Edit | Action::Delete) && subject.is_none() {
            return Decision::Abstain;
        }
        let Some(actor) = actor else {
            return Decision::Deny(DenyReason::Unauthenticated);
        };
        if !actor.is_admin() {
            return Decision::Deny(DenyReason::InsufficientRole);
        }
        match (action, subject) {
            (Action::Delete, Some(category)) if category.issue_count > 0 => {
                Decision::Deny(DenyReason::HasAssociatedIssues {
                    name: category.name.to_string(),
                    count: category.issue_count,
                })
            }
            _ => Decision::Allow,
        }
    }

    pub fn authorize(
        &self,
        actor: Option<&Actor>,
        action: Action,
        subject: Option<&CategorySubject<'_>>,
    ) -> Result<(), CoreError> {
        self.evaluate(actor, action, subject)
            .into_result(action, Resource::Category)
    }
}

// ---------------------------------------------------------------------------
// Issue policy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct IssueSubject {
    pub author_id: Option<DbId>,
}

/// View is public; create requires admin. Edit and delete require admin,
/// or, when `require_admin_only` is `false`, authorship of the issue.
#[derive(Debug, Clone, Copy)]
pub struct IssuePolicy {
    pub require_admin_only: bool,
}

impl Default for IssuePolicy {
    fn default() -> Self {
        Self {
            require_admin_only: true,
        }
    }
}

impl IssuePolicy {
    pub fn new(require_admin_only: bool) -> Self {
        Self { require_admin_only }
    }

    pub fn evaluate(
        &self,
        actor: Option<&Actor>,
        action: Action,
        subject: Option<&IssueSubject>,
    ) -> Decision {
        if action == Action::View {
            return Decision::Allow;
        }
        if matches!(action, Action::Edit | Action::Delete) && subject.is_none() {
            return Decision::Abstain;
        }
        let Some(actor) = actor else {
            return Decision::Deny(DenyReason::Unauthenticated);
        };
        if actor.is_admin() {
            return Decision::Allow;
        }
        let is_author = subject
            .and_then(|issue| issue.author_id)
            .is_some_and(|author| author == actor.user_id);
        match action {
            Action::Edit | Action::Delete if !self.require_admin_only && is_author => {
                Decision::Allow
            }
            _ => Decision::Deny(DenyReason::InsufficientRole),
        }
    }

    pub fn authorize(
        &self,
        actor: Option<&Actor>,
        action: Action,
        subject: Option<&IssueSubject>,
    ) -> Result<(), CoreError> {
        self.evaluate(actor, action, subject)
            .into_result(action, Resource::Issue)
    }
}
