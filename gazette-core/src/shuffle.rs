use crate::rng::SeededRandom;
use crate::types::ContentItem;
use std::collections::{BTreeMap, HashSet};

/// Seed offset separating the member shuffle from the category shuffle
/// inside one pairing draw.
const MEMBER_SALT: i64 = 101;

/// Deterministic Fisher-Yates permutation of `items` under `seed`.
///
/// Returns a new vector; the input is never mutated. Same input order and
/// same seed always produce the same output order.
pub fn shuffle<T: Clone>(items: &[T], seed: i64) -> Vec<T> {
    let mut out = items.to_vec();
    let mut rng = SeededRandom::new(seed);
    for i in (1..out.len()).rev() {
        let j = rng.next_below(i + 1);
        out.swap(i, j);
    }
    out
}

/// First `n` items of the seeded shuffle: a draw of `n` distinct items.
pub fn pick_distinct<T: Clone>(items: &[T], seed: i64, n: usize) -> Vec<T> {
    let mut picked = shuffle(items, seed);
    picked.truncate(n);
    picked
}

/// A left/right comparison pair drawn from one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryPair {
    pub category: String,
    pub left: ContentItem,
    pub right: ContentItem,
}

/// Draws a comparison pair from the pool: categories are shuffled under
/// `seed`, and the first category (in shuffle order) that still has two
/// eligible members supplies the pair.
///
/// Items with no category, or whose id is in `used`, are ineligible. Returns
/// `None` when no category qualifies; callers treat that as pool exhaustion,
/// not an error.
pub fn pick_pair_by_category(
    pool: &[ContentItem],
    used: &HashSet<String>,
    seed: i64,
) -> Option<CategoryPair> {
    // BTreeMap grouping keeps category order independent of pool order.
    let mut by_category: BTreeMap<String, Vec<ContentItem>> = BTreeMap::new();
    for item in pool {
        if used.contains(&item.id) {
            continue;
        }
        if let Some(category) = &item.category {
            by_category
                .entry(category.clone())
                .or_default()
                .push(item.clone());
        }
    }

    let names: Vec<String> = by_category.keys().cloned().collect();
    for name in shuffle(&names, seed) {
        let members = &by_category[&name];
        if members.len() < 2 {
            continue;
        }
        let mut picked = pick_distinct(members, seed + MEMBER_SALT, 2);
        let right = picked.pop()?;
        let left = picked.pop()?;
        return Some(CategoryPair {
            category: name,
            left,
            right,
        });
    }
    None
}
