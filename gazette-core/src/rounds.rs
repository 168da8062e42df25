use crate::daykey::DayKey;
use crate::shuffle::{pick_distinct, pick_pair_by_category, shuffle};
use crate::types::{ContentItem, DailyRoundSet, Round};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Seed offset separating the on-screen option order from the decoy draw
/// within one round.
const OPTION_ORDER_SALT: i64 = 7_919;

/// Question-pool presentation variant, resolved once per session by the
/// owning experimentation layer and passed in explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Variant {
    /// Pre-authored order, sliced to the daily limit.
    Standard,
    /// Day-seeded shuffle before slicing to the daily limit.
    Shuffled,
    /// Day-seeded shuffle sliced to a smaller variant-specific count.
    ShuffledCapped(usize),
}

/// Per-game round-composition strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundShape {
    /// One correct item plus `decoys` wrong options (headline games).
    ChoiceWithDecoys { decoys: usize },
    /// Two same-category items to compare (stat games).
    CategoryPairs,
    /// One question per round (quiz games).
    QuestionPool { variant: Variant },
}

/// Carves a content pool into the ordered round sequence for one day.
///
/// Every round is fully determined by (pool snapshot, day, round index):
/// rebuilding with the same inputs yields identical rounds. Insufficient
/// content yields a short or empty set, never an error.
#[derive(Debug, Clone)]
pub struct DailyRoundBuilder {
    day: DayKey,
    limit: usize,
    shape: RoundShape,
}

impl DailyRoundBuilder {
    pub fn new(day: DayKey, limit: usize, shape: RoundShape) -> Self {
        Self { day, limit, shape }
    }

    pub fn build(&self, pool: &[ContentItem]) -> DailyRoundSet {
        let rounds = match &self.shape {
            RoundShape::ChoiceWithDecoys { decoys } => self.build_choice_rounds(pool, *decoys),
            RoundShape::CategoryPairs => self.build_pair_rounds(pool),
            RoundShape::QuestionPool { variant } => self.build_question_rounds(pool, *variant),
        };
        tracing::info!(
            day = %self.day,
            requested = self.limit,
            built = rounds.len(),
            "built daily round set"
        );
        DailyRoundSet {
            day_key: self.day.key(),
            rounds,
        }
    }

    fn build_choice_rounds(&self, pool: &[ContentItem], decoys: usize) -> Vec<Round> {
        // A round needs one correct answer plus a full decoy set; a smaller
        // pool yields no rounds rather than partially-decoyed ones.
        if pool.len() < decoys + 1 {
            return Vec::new();
        }

        // Stable sort first: upstream fetch order must not leak into the
        // permutation.
        let mut sorted = pool.to_vec();
        sorted.sort_by_key(|item| item.sort_key());

        let ordered = shuffle(&sorted, self.day.seed(0));
        let correct_count = self.limit.min(ordered.len());

        let mut rounds = Vec::with_capacity(correct_count);
        for (index, correct) in ordered[..correct_count].iter().enumerate() {
            let number = index + 1;
            let round_seed = self.day.seed(number as i64);

            let remainder: Vec<ContentItem> = sorted
                .iter()
                .filter(|item| item.id != correct.id)
                .cloned()
                .collect();
            let mut options = vec![correct.clone()];
            options.extend(pick_distinct(&remainder, round_seed, decoys));

            rounds.push(Round::Choice {
                number,
                correct: correct.clone(),
                options: shuffle(&options, round_seed + OPTION_ORDER_SALT),
            });
        }
        rounds
    }

    fn build_pair_rounds(&self, pool: &[ContentItem]) -> Vec<Round> {
        let base = self.day.seed(0);
        let mut used: HashSet<String> = HashSet::new();
        let mut rounds = Vec::new();

        for number in 1..=self.limit {
            let Some(pair) = pick_pair_by_category(pool, &used, base + number as i64) else {
                // Pool exhausted; a short set is a valid, signaled outcome.
                tracing::debug!(
                    day = %self.day,
                    built = rounds.len(),
                    "pairing pool exhausted before daily limit"
                );
                break;
            };
            used.insert(pair.left.id.clone());
            used.insert(pair.right.id.clone());
            rounds.push(Round::Pair {
                number,
                category: pair.category,
                left: pair.left,
                right: pair.right,
            });
        }
        rounds
    }

    fn build_question_rounds(&self, pool: &[ContentItem], variant: Variant) -> Vec<Round> {
        let take = match variant {
            Variant::Standard | Variant::Shuffled => self.limit,
            Variant::ShuffledCapped(cap) => cap.min(self.limit),
        };
        let ordered = match variant {
            Variant::Standard => pool.to_vec(),
            Variant::Shuffled | Variant::ShuffledCapped(_) => shuffle(pool, self.day.seed(0)),
        };
        ordered
            .into_iter()
            .take(take)
            .enumerate()
            .map(|(index, item)| Round::Question {
                number: index + 1,
                item,
            })
            .collect()
    }
}
