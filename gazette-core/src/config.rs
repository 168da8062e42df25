use crate::daykey::DayBoundary;
use crate::error::{GazetteError, Result};
use crate::rounds::{RoundShape, Variant};
use serde::{Deserialize, Serialize};

/// Per-game scheduler configuration: where progress is stored, how many
/// rounds a day allows, which calendar the day rolls over on, and the round
/// shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub storage_key: String,
    pub daily_limit: usize,
    pub boundary: DayBoundary,
    pub shape: RoundShape,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            storage_key: "gazette_daily_progress".to_string(),
            daily_limit: 5,
            boundary: DayBoundary::Utc,
            shape: RoundShape::ChoiceWithDecoys { decoys: 3 },
        }
    }
}

impl GameConfig {
    /// Headline-guessing game: pick the real headline among three decoys.
    pub fn headline_game() -> Self {
        Self {
            storage_key: "headline_daily_progress".to_string(),
            ..Self::default()
        }
    }

    /// Stat-comparison game: which of two same-category players ranks higher.
    pub fn stat_showdown() -> Self {
        Self {
            storage_key: "showdown_daily_progress".to_string(),
            shape: RoundShape::CategoryPairs,
            ..Self::default()
        }
    }

    /// Daily news quiz over a pre-authored question pool.
    pub fn news_quiz(variant: Variant) -> Self {
        Self {
            storage_key: "quiz_daily_progress".to_string(),
            shape: RoundShape::QuestionPool { variant },
            ..Self::default()
        }
    }

    pub fn with_boundary(mut self, boundary: DayBoundary) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.storage_key.is_empty() {
            return Err(GazetteError::config("storage key cannot be empty"));
        }

        if self.daily_limit == 0 {
            return Err(GazetteError::config("daily limit must be greater than 0"));
        }

        match &self.shape {
            RoundShape::ChoiceWithDecoys { decoys } if *decoys == 0 => Err(GazetteError::config(
                "choice rounds need at least one decoy",
            )),
            RoundShape::QuestionPool {
                variant: Variant::ShuffledCapped(cap),
            } if *cap == 0 => Err(GazetteError::config(
                "capped question variant must keep at least one question",
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_validate() {
        GameConfig::default().validate().unwrap();
        GameConfig::headline_game().validate().unwrap();
        GameConfig::stat_showdown().validate().unwrap();
        GameConfig::news_quiz(Variant::Shuffled).validate().unwrap();
    }

    #[test]
    fn rejects_degenerate_configs() {
        let mut config = GameConfig::default();
        config.storage_key.clear();
        assert!(config.validate().is_err());

        let config = GameConfig {
            daily_limit: 0,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());

        let config = GameConfig {
            shape: RoundShape::ChoiceWithDecoys { decoys: 0 },
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());

        let config = GameConfig::news_quiz(Variant::ShuffledCapped(0));
        assert!(config.validate().is_err());
    }
}
