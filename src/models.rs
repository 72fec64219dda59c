//! Domain records shared by the service and the client core

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder returned for absent external links.
pub const LINK_SENTINEL: &str = "#";

/// Default tag and pill for user submissions.
pub const SUBMITTED_LABEL: &str = "Submitted";

/// Kind of a single vote. Closed set; anything else is rejected at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteKind {
    Yes,
    Maybe,
    No,
    Skip,
}

impl VoteKind {
    pub const ALL: [VoteKind; 4] = [VoteKind::Yes, VoteKind::Maybe, VoteKind::No, VoteKind::Skip];

    pub fn as_str(&self) -> &'static str {
        match self {
            VoteKind::Yes => "yes",
            VoteKind::Maybe => "maybe",
            VoteKind::No => "no",
            VoteKind::Skip => "skip",
        }
    }
}

impl fmt::Display for VoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid vote '{0}'. Must be: yes, maybe, no, or skip")]
pub struct UnknownVoteKind(pub String);

impl FromStr for VoteKind {
    type Err = UnknownVoteKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yes" => Ok(VoteKind::Yes),
            "maybe" => Ok(VoteKind::Maybe),
            "no" => Ok(VoteKind::No),
            "skip" => Ok(VoteKind::Skip),
            other => Err(UnknownVoteKind(other.to_string())),
        }
    }
}

/// A submitted startup as shown in the swipe deck.
///
/// This is the wire shape of `GET /records`; missing links are serialized as
/// [`LINK_SENTINEL`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: String,
    pub name: String,
    pub pill: String,
    pub tag: String,
    pub caption: String,
    pub description: String,
    pub about_text: String,
    pub confidence: i64,
    pub media_id: String,
    pub website: String,
    pub social: String,
    pub owner_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Record {
    pub fn has_website(&self) -> bool {
        !self.website.is_empty() && self.website != LINK_SENTINEL
    }

    pub fn has_social(&self) -> bool {
        !self.social.is_empty() && self.social != LINK_SENTINEL
    }
}

/// An immutable vote row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub id: String,
    pub record_id: String,
    pub voter_id: Option<String>,
    pub kind: VoteKind,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /records`. Every field is optional on the wire so that
/// missing values surface as validation errors rather than decode failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecordRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(alias = "about")]
    pub about_text: Option<String>,
    #[serde(alias = "ytId")]
    pub media_id: Option<String>,
    pub website: Option<String>,
    pub social: Option<String>,
    pub tag: Option<String>,
    pub pill: Option<String>,
    pub caption: Option<String>,
}

/// Why a submission was refused
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required fields: name, description, mediaId")]
    MissingRequired,
}

/// A validated submission, ready to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    pub name: String,
    pub description: String,
    pub about_text: String,
    pub media_id: String,
    pub website: Option<String>,
    pub social: Option<String>,
    pub tag: String,
    pub pill: String,
    pub caption: String,
    pub owner_id: String,
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl CreateRecordRequest {
    /// Validate and fill defaults for a submission made by `owner_id`.
    ///
    /// `owner_name` feeds the default caption.
    pub fn validate(
        &self,
        owner_id: &str,
        owner_name: Option<&str>,
    ) -> Result<NewRecord, ValidationError> {
        let name = non_blank(&self.name);
        let description = non_blank(&self.description);
        let media = non_blank(&self.media_id);

        let (name, description, media) = match (name, description, media) {
            (Some(n), Some(d), Some(m)) => (n, d, m),
            _ => return Err(ValidationError::MissingRequired),
        };

        let media_id = crate::media::extract_youtube_id(&media).unwrap_or(media);
        let caption = non_blank(&self.caption).unwrap_or_else(|| {
            format!("Submitted by {}", owner_name.filter(|n| !n.is_empty()).unwrap_or("User"))
        });

        Ok(NewRecord {
            about_text: non_blank(&self.about_text).unwrap_or_else(|| description.clone()),
            name,
            description,
            media_id,
            website: non_blank(&self.website),
            social: non_blank(&self.social),
            tag: non_blank(&self.tag).unwrap_or_else(|| SUBMITTED_LABEL.to_string()),
            pill: non_blank(&self.pill).unwrap_or_else(|| SUBMITTED_LABEL.to_string()),
            caption,
            owner_id: owner_id.to_string(),
        })
    }
}

/// Body of `POST /votes`. The kind stays a string until validated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    #[serde(alias = "startupId")]
    pub record_id: Option<String>,
    #[serde(alias = "kind")]
    pub vote: Option<String>,
}

/// Response of `POST /votes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteResponse {
    pub success: bool,
    pub confidence: i64,
}
