//! Card presentation
//!
//! Display fields for the current record, the "read more" panel, and the
//! confidence ring animation.

use std::f64::consts::PI;

use super::Millis;
use crate::media;
use crate::models::Record;

pub const RING_RADIUS: f64 = 18.0;
pub const RING_DURATION_MS: Millis = 520.0;

/// Text and media shown on the swipe card
#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub record_id: Option<String>,
    pub pill: String,
    pub name: String,
    pub tag: String,
    pub description: String,
    pub caption: String,
    pub embed_url: Option<String>,
}

fn or_default(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

impl CardView {
    pub fn from_record(record: &Record) -> Self {
        let caption = if record.caption.trim().is_empty() {
            or_default(&record.description, "Startup demo")
        } else {
            record.caption.clone()
        };

        Self {
            record_id: Some(record.id.clone()),
            pill: or_default(&record.pill, "Startup"),
            name: or_default(&record.name, "Startup Name"),
            tag: or_default(&record.tag, "General"),
            description: or_default(&record.description, "No description"),
            caption,
            embed_url: (!record.media_id.trim().is_empty())
                .then(|| media::embed_url(&record.media_id)),
        }
    }

    /// Shown when the deck is empty
    pub fn placeholder() -> Self {
        Self {
            record_id: None,
            pill: String::new(),
            name: "No startups yet".to_string(),
            tag: String::new(),
            description: "Be the first to submit a startup!".to_string(),
            caption: String::new(),
            embed_url: None,
        }
    }
}

/// Contents of the "read more" modal
#[derive(Debug, Clone, PartialEq)]
pub struct InfoPanel {
    pub title: String,
    pub text: String,
    /// None renders a disabled link
    pub website: Option<String>,
    pub social: Option<String>,
}

impl InfoPanel {
    pub fn from_record(record: &Record) -> Self {
        let text = if record.about_text.trim().is_empty() {
            record.description.clone()
        } else {
            record.about_text.clone()
        };

        Self {
            title: record.name.clone(),
            text,
            website: record.has_website().then(|| record.website.clone()),
            social: record.has_social().then(|| record.social.clone()),
        }
    }
}

pub fn ease_out_cubic(p: f64) -> f64 {
    let p = p.clamp(0.0, 1.0);
    1.0 - (1.0 - p).powi(3)
}

pub fn ring_circumference() -> f64 {
    2.0 * PI * RING_RADIUS
}

/// One rendered step of the ring
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingFrame {
    pub value: i64,
    pub dash_offset: f64,
    pub done: bool,
}

/// Eased count from the previously displayed confidence to the new one
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingAnimation {
    from: i64,
    to: i64,
    started: Millis,
}

impl RingAnimation {
    pub fn new(from: i64, to: i64, started: Millis) -> Self {
        Self { from, to, started }
    }

    pub fn target(&self) -> i64 {
        self.to
    }

    pub fn frame(&self, now: Millis) -> RingFrame {
        let p = ((now - self.started) / RING_DURATION_MS).clamp(0.0, 1.0);
        let eased = ease_out_cubic(p);
        let value = (self.from as f64 + (self.to - self.from) as f64 * eased).round() as i64;

        RingFrame {
            value,
            dash_offset: ring_circumference() * (1.0 - value as f64 / 100.0),
            done: p >= 1.0,
        }
    }
}
