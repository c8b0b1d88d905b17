//! Outcomes of transactional operations that can be blocked by state checks
//!
//! These are results, not errors: a declined invitation or a reference to a
//! missing target is a normal outcome the caller decides how to present.

use crate::data::types::collaboration::{CommentRow, ProjectItemRow, ProjectMemberRow};

/// Outcome of responding to a project invitation
#[derive(Debug)]
pub enum InvitationOutcome {
    /// Invitation accepted; the new membership row
    Accepted(ProjectMemberRow),
    Declined,
    /// No invitation with that id
    NotFound,
    /// The invitation was already responded to; carries its terminal status
    AlreadyResponded(String),
}

/// Outcome of attaching a polymorphic reference (project item or comment)
#[derive(Debug)]
pub enum AttachOutcome<T> {
    Attached(T),
    /// The referenced (targetType, targetId) does not exist
    MissingTarget,
}

pub type ItemOutcome = AttachOutcome<ProjectItemRow>;
pub type CommentOutcome = AttachOutcome<CommentRow>;

impl<T> AttachOutcome<T> {
    pub fn attached(self) -> Option<T> {
        match self {
            Self::Attached(value) => Some(value),
            Self::MissingTarget => None,
        }
    }
}
