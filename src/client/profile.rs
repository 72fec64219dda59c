//! Profile statistics for the signed-in user's submissions

use chrono::{DateTime, Utc};

use crate::auth::SessionUser;
use crate::media;
use crate::models::Record;

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileItem {
    pub id: String,
    pub name: String,
    pub confidence: i64,
    pub tag: String,
    pub thumbnail_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileStats {
    pub avatar_letter: char,
    pub display_name: String,
    pub submissions: usize,
    /// Rounded mean confidence, None without submissions
    pub average_confidence: Option<i64>,
    pub latest: Option<DateTime<Utc>>,
    pub items: Vec<ProfileItem>,
}

impl ProfileStats {
    pub fn meta(&self) -> String {
        format!("{} submissions", self.submissions)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProfileView {
    Guest,
    Member(ProfileStats),
}

pub fn build(user: Option<&SessionUser>, records: &[Record]) -> ProfileView {
    let Some(user) = user else {
        return ProfileView::Guest;
    };

    let mine: Vec<&Record> = records
        .iter()
        .filter(|r| r.owner_id.as_deref() == Some(user.id.as_str()))
        .collect();

    let average_confidence = if mine.is_empty() {
        None
    } else {
        let sum: i64 = mine.iter().map(|r| r.confidence).sum();
        Some((sum as f64 / mine.len() as f64).round() as i64)
    };

    let display_name = user.display_name().to_string();

    ProfileView::Member(ProfileStats {
        avatar_letter: display_name
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('?'),
        submissions: mine.len(),
        average_confidence,
        latest: mine.iter().map(|r| r.created_at).max(),
        items: mine
            .iter()
            .map(|r| ProfileItem {
                id: r.id.clone(),
                name: r.name.clone(),
                confidence: r.confidence,
                tag: r.tag.clone(),
                thumbnail_url: media::thumbnail_url(&r.media_id),
            })
            .collect(),
        display_name,
    })
}
