use serde::{Deserialize, Serialize};

/// One unit of content from the upstream content source: an article headline,
/// a player stat card, or a quiz question. The scheduler only relies on `id`
/// being stable across fetches within the same day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ContentItem {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            category: None,
            value: None,
            link: None,
            image: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    /// Stable sort key used to erase insertion-order nondeterminism from the
    /// upstream fetch before any seeded shuffle.
    pub fn sort_key(&self) -> String {
        format!("{}{}", self.id, self.label)
    }
}

/// One playable round within a daily set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Round {
    /// One correct item hidden among decoys, options in on-screen order.
    Choice {
        number: usize,
        correct: ContentItem,
        options: Vec<ContentItem>,
    },
    /// Two items from the same category to compare.
    Pair {
        number: usize,
        category: String,
        left: ContentItem,
        right: ContentItem,
    },
    /// A single pre-authored question.
    Question { number: usize, item: ContentItem },
}

impl Round {
    pub fn number(&self) -> usize {
        match self {
            Round::Choice { number, .. } => *number,
            Round::Pair { number, .. } => *number,
            Round::Question { number, .. } => *number,
        }
    }
}

/// The ordered, reproducible sequence of rounds for one day key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRoundSet {
    pub day_key: String,
    pub rounds: Vec<Round>,
}

impl DailyRoundSet {
    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// Round by 1-indexed round number.
    pub fn round(&self, number: usize) -> Option<&Round> {
        if number == 0 {
            return None;
        }
        self.rounds.get(number - 1)
    }
}

/// Persisted tuple gating the daily replay limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub date_key: String,
    pub rounds_completed: u32,
}

impl ProgressRecord {
    pub fn fresh(date_key: impl Into<String>) -> Self {
        Self {
            date_key: date_key.into(),
            rounds_completed: 0,
        }
    }
}

/// Rollover-corrected view of today's progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub date_key: String,
    pub rounds_completed: u32,
    pub rounds_left: u32,
}
