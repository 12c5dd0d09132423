use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{FieldError, ValidationErrors};

/// Article lifecycle state.
///
/// `Draft → Scheduled → Published` is the usual path, but callers may set
/// any state explicitly through the edit surface. The only automatic
/// transition is [`auto_promote`], applied on every persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    Draft,
    Scheduled,
    Published,
}

impl ArticleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleStatus::Draft => "draft",
            ArticleStatus::Scheduled => "scheduled",
            ArticleStatus::Published => "published",
        }
    }
}

impl Default for ArticleStatus {
    fn default() -> Self {
        ArticleStatus::Draft
    }
}

impl fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid article status: {0}")]
pub struct InvalidStatus(pub String);

impl FromStr for ArticleStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(ArticleStatus::Draft),
            "scheduled" => Ok(ArticleStatus::Scheduled),
            "published" => Ok(ArticleStatus::Published),
            other => Err(InvalidStatus(other.to_string())),
        }
    }
}

/// The single automatic status transition, evaluated on every save:
/// a Scheduled article whose publish date has arrived becomes Published.
///
/// Everything else is caller-driven; in particular this never stamps
/// `published_at`, it only reads it.
pub fn auto_promote(
    status: ArticleStatus,
    published_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> ArticleStatus {
    match (status, published_at) {
        (ArticleStatus::Scheduled, Some(at)) if at <= now => ArticleStatus::Published,
        _ => status,
    }
}

/// Whether an article is actually published, as opposed to merely having
/// `Published` stored in its status column.
///
/// True iff status is Published, `published_at` is set, and
/// `published_at <= now` (boundary inclusive). A forcibly-Published
/// article with an absent or future publish date is not published.
pub fn is_published(
    status: ArticleStatus,
    published_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> bool {
    status == ArticleStatus::Published
        && published_at.is_some_and(|at| at <= now)
}

/// Validate a submitted publish date against the lifecycle rules.
///
/// Creation (`is_new`): a Published article may not be given a date in the
/// past. Editing: re-scheduling may not move the date earlier than the one
/// previously stored, and a Scheduled article must carry a date at all.
///
/// Failures are field-level errors on `published_at`; nothing is persisted
/// when validation fails.
pub fn validate_publish_date(
    status: ArticleStatus,
    submitted: Option<DateTime<Utc>>,
    stored: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    is_new: bool,
) -> Result<(), ValidationErrors> {
    if status == ArticleStatus::Scheduled && submitted.is_none() {
        return Err(FieldError::new(
            "published_at",
            "a publish date is required for scheduled articles",
        )
        .into());
    }

    if !is_new {
        if status == ArticleStatus::Scheduled {
            if let (Some(new_date), Some(old_date)) = (submitted, stored) {
                if new_date < old_date {
                    return Err(FieldError::new(
                        "published_at",
                        "publish date cannot be in the past",
                    )
                    .into());
                }
            }
        }
        return Ok(());
    }

    if status == ArticleStatus::Published {
        if let Some(date) = submitted {
            if date < now {
                return Err(FieldError::new(
                    "published_at",
                    "publish date cannot be in the past",
                )
                .into());
            }
        }
    }
    Ok(())
}
