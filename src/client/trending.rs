//! Trending list: records ranked by confidence

use super::deck::Deck;

pub const TRENDING_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Up,
    Down,
    Flat,
}

impl Movement {
    pub fn between(previous: Option<i64>, current: i64) -> Self {
        let diff = current - previous.unwrap_or(current);
        if diff >= 1 {
            Movement::Up
        } else if diff <= -1 {
            Movement::Down
        } else {
            Movement::Flat
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Movement::Up => "▲",
            Movement::Down => "▼",
            Movement::Flat => "▬",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Movement::Up => "up",
            Movement::Down => "down",
            Movement::Flat => "flat",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendingEntry {
    pub id: String,
    pub name: String,
    pub ticker: String,
    pub tag: String,
    pub confidence: i64,
    /// Width of the bar in percent
    pub bar_width: i64,
    pub movement: Movement,
}

/// `$` followed by the first five letters of the name, uppercased
pub fn ticker_from_name(name: &str) -> String {
    let letters: String = name
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .take(5)
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if letters.is_empty() {
        "$START".to_string()
    } else {
        format!("${}", letters)
    }
}

/// Top records by confidence, highest first. Ties keep deck order.
pub fn rank(deck: &Deck) -> Vec<TrendingEntry> {
    let mut ranked: Vec<_> = deck.records().iter().collect();
    ranked.sort_by(|a, b| b.confidence.cmp(&a.confidence));

    ranked
        .into_iter()
        .take(TRENDING_LIMIT)
        .map(|r| TrendingEntry {
            id: r.id.clone(),
            name: r.name.clone(),
            ticker: ticker_from_name(&r.name),
            tag: r.tag.clone(),
            confidence: r.confidence,
            bar_width: r.confidence.clamp(0, 100),
            movement: Movement::between(deck.previous_confidence(&r.id), r.confidence),
        })
        .collect()
}
