//! Pull requests and their reviewer slots.
//!
//! A pull request keeps an ordered list of reviewer identifiers. The order is
//! assignment order: replacing a reviewer keeps the slot position.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use super::text::bounded_text;
use super::user::UserId;

/// Reviewer slots per pull request.
pub const MAX_REVIEWERS: usize = 2;

bounded_text! {
    /// Opaque pull request identifier.
    PullRequestId, field = "pull_request_id", max = 64
}

bounded_text! {
    /// Pull request title.
    PullRequestName, field = "pull_request_name", max = 255
}

/// Lifecycle state. `Merged` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PullRequestStatus {
    /// Accepting reviewer changes.
    Open,
    /// Closed for reviewer changes.
    Merged,
}

impl PullRequestStatus {
    /// Stored and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Merged => "MERGED",
        }
    }
}

impl fmt::Display for PullRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when parsing an unknown status string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown pull request status: {0}")]
pub struct UnknownStatusError(pub String);

impl FromStr for PullRequestStatus {
    type Err = UnknownStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(Self::Open),
            "MERGED" => Ok(Self::Merged),
            other => Err(UnknownStatusError(other.to_owned())),
        }
    }
}

/// Invariant violations rejected by [`PullRequest::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PullRequestValidationError {
    /// Merge timestamp present on an open pull request or missing on a merged one.
    #[error("merged_at must be set exactly when the pull request is merged")]
    MergedAtMismatch,
    /// More reviewers than there are slots.
    #[error("{count} reviewers exceed the limit of {MAX_REVIEWERS}")]
    TooManyReviewers {
        /// Number of reviewers supplied.
        count: usize,
    },
    /// A reviewer occupies more than one slot.
    #[error("reviewer {reviewer} is assigned more than once")]
    DuplicateReviewer {
        /// Repeated reviewer.
        reviewer: String,
    },
    /// The author appears among the reviewers.
    #[error("author {author} cannot review their own pull request")]
    AuthorAssigned {
        /// Offending author.
        author: String,
    },
}

/// Field bundle for [`PullRequest::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestDraft {
    /// Identifier.
    pub id: PullRequestId,
    /// Title.
    pub name: PullRequestName,
    /// Author.
    pub author_id: UserId,
    /// Lifecycle state.
    pub status: PullRequestStatus,
    /// Reviewers in slot order.
    pub reviewers: Vec<UserId>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Merge time; set exactly when merged.
    pub merged_at: Option<DateTime<Utc>>,
}

/// A pull request whose invariants hold.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use reviewchecker::domain::{
///     PullRequest, PullRequestDraft, PullRequestId, PullRequestName, PullRequestStatus, UserId,
/// };
///
/// let pr = PullRequest::new(PullRequestDraft {
///     id: PullRequestId::new("pr-1").expect("valid id"),
///     name: PullRequestName::new("Add search").expect("valid name"),
///     author_id: UserId::new("u1").expect("valid id"),
///     status: PullRequestStatus::Open,
///     reviewers: vec![UserId::new("u2").expect("valid id")],
///     created_at: Utc::now(),
///     merged_at: None,
/// })
/// .expect("valid pull request");
/// assert!(!pr.is_merged());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    id: PullRequestId,
    name: PullRequestName,
    author_id: UserId,
    status: PullRequestStatus,
    reviewers: Vec<UserId>,
    created_at: DateTime<Utc>,
    merged_at: Option<DateTime<Utc>>,
}

impl PullRequest {
    /// Validate a draft.
    pub fn new(draft: PullRequestDraft) -> Result<Self, PullRequestValidationError> {
        let PullRequestDraft {
            id,
            name,
            author_id,
            status,
            reviewers,
            created_at,
            merged_at,
        } = draft;

        if (status == PullRequestStatus::Merged) != merged_at.is_some() {
            return Err(PullRequestValidationError::MergedAtMismatch);
        }
        if reviewers.len() > MAX_REVIEWERS {
            return Err(PullRequestValidationError::TooManyReviewers {
                count: reviewers.len(),
            });
        }
        let mut seen = HashSet::with_capacity(reviewers.len());
        for reviewer in &reviewers {
            if reviewer == &author_id {
                return Err(PullRequestValidationError::AuthorAssigned {
                    author: author_id.to_string(),
                });
            }
            if !seen.insert(reviewer) {
                return Err(PullRequestValidationError::DuplicateReviewer {
                    reviewer: reviewer.to_string(),
                });
            }
        }

        Ok(Self {
            id,
            name,
            author_id,
            status,
            reviewers,
            created_at,
            merged_at,
        })
    }

    /// Identifier.
    #[must_use]
    pub const fn id(&self) -> &PullRequestId {
        &self.id
    }

    /// Title.
    #[must_use]
    pub const fn name(&self) -> &PullRequestName {
        &self.name
    }

    /// Author.
    #[must_use]
    pub const fn author_id(&self) -> &UserId {
        &self.author_id
    }

    /// Lifecycle state.
    #[must_use]
    pub const fn status(&self) -> PullRequestStatus {
        self.status
    }

    /// Reviewers in slot order.
    #[must_use]
    pub fn reviewers(&self) -> &[UserId] {
        &self.reviewers
    }

    /// Creation time.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Merge time.
    #[must_use]
    pub const fn merged_at(&self) -> Option<DateTime<Utc>> {
        self.merged_at
    }

    /// Whether the pull request reached its terminal state.
    #[must_use]
    pub fn is_merged(&self) -> bool {
        self.status == PullRequestStatus::Merged
    }

    /// Whether `user` holds a reviewer slot.
    #[must_use]
    pub fn has_reviewer(&self, user: &UserId) -> bool {
        self.reviewers.contains(user)
    }

    /// Merged copy stamped with `at`; already merged values are returned as is.
    #[must_use]
    pub fn merge(mut self, at: DateTime<Utc>) -> Self {
        if !self.is_merged() {
            self.status = PullRequestStatus::Merged;
            self.merged_at = Some(at);
        }
        self
    }

    /// Copy with `old` swapped for `new` in the same slot.
    ///
    /// Returns `None` when `old` is not assigned. The result is revalidated so
    /// `new` can be neither the author nor an existing reviewer.
    pub fn with_replaced_reviewer(
        &self,
        old: &UserId,
        new: UserId,
    ) -> Option<Result<Self, PullRequestValidationError>> {
        let slot = self.reviewers.iter().position(|id| id == old)?;
        let mut draft = self.clone().into_draft();
        if let Some(entry) = draft.reviewers.get_mut(slot) {
            *entry = new;
        }
        Some(Self::new(draft))
    }

    /// Unpack into an editable draft.
    #[must_use]
    pub fn into_draft(self) -> PullRequestDraft {
        PullRequestDraft {
            id: self.id,
            name: self.name,
            author_id: self.author_id,
            status: self.status,
            reviewers: self.reviewers,
            created_at: self.created_at,
            merged_at: self.merged_at,
        }
    }
}
