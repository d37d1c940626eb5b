//! Weighted item selection without replacement.
//!
//! Each eligible item gets a random key `ln(u) / w` with `u` uniform in
//! `(0, 1]` and `w` its record weight (Efraimidis & Spirakis, 2006). Taking
//! the `n` largest keys is distributed exactly like drawing `n` items one
//! at a time, each draw proportional to weight among the items left.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{DrillError, Result};
use crate::model::{Item, ItemId, QuestionType};
use crate::records::Records;

/// Non-fatal notice that fewer items were eligible than requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolTooSmall {
    pub requested: usize,
    pub available: usize,
}

/// Ids chosen for one session, in asking order.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub ids: Vec<ItemId>,
    pub warning: Option<PoolTooSmall>,
}

/// Draw `n` distinct item ids from the enabled types, biased by weight.
///
/// Items without a record fall back to `initial_weight`. When fewer than
/// `n` items are eligible, all of them are returned in weighted order and
/// the shortfall is reported as a [`PoolTooSmall`] warning.
pub fn select<R: Rng + ?Sized>(
    items_by_type: &BTreeMap<QuestionType, BTreeMap<ItemId, Item>>,
    records: &Records,
    enabled: &BTreeSet<QuestionType>,
    n: usize,
    initial_weight: f64,
    rng: &mut R,
) -> Result<Selection> {
    let pool: Vec<&ItemId> = items_by_type
        .iter()
        .filter(|(ty, _)| enabled.contains(*ty))
        .flat_map(|(_, items)| items.keys())
        .collect();

    if n > 0 && pool.is_empty() {
        return Err(DrillError::EmptyPool);
    }

    let warning = (pool.len() < n).then(|| {
        tracing::warn!(
            "only {} item(s) available for {n} requested question(s)",
            pool.len()
        );
        PoolTooSmall {
            requested: n,
            available: pool.len(),
        }
    });

    let weights: Vec<f64> = pool
        .iter()
        .map(|id| match records.get(*id) {
            Some(record) if record.weight.is_finite() && record.weight > 0.0 => record.weight,
            _ => {
                tracing::debug!("no usable record for '{id}', using seed weight");
                initial_weight
            }
        })
        .collect();

    let ids = weighted_sample(&weights, n, rng)
        .into_iter()
        .map(|i| pool[i].clone())
        .collect();

    Ok(Selection { ids, warning })
}

/// Sample `min(k, weights.len())` distinct indices, each draw proportional
/// to the weight remaining. Returns indices in draw order.
///
/// Every weight must be positive and finite.
pub fn weighted_sample<R: Rng + ?Sized>(weights: &[f64], k: usize, rng: &mut R) -> Vec<usize> {
    let mut keyed: Vec<(f64, usize)> = weights
        .iter()
        .enumerate()
        .map(|(i, &w)| {
            // 1 - [0, 1) keeps u away from zero, so ln(u) is finite.
            let u = 1.0 - rng.random::<f64>();
            (u.ln() / w, i)
        })
        .collect();

    keyed.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    keyed.truncate(k);
    keyed.into_iter().map(|(_, i)| i).collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::corpus::parse_corpus_str;
    use crate::records::{reconcile, Record, INITIAL_WEIGHT};

    const CORPUS: &str = r#"{
        "vocabulary": {
            "v1": ["one", ["uno"]],
            "v2": ["two", ["dos"]],
            "v3": ["three", ["tres"]]
        },
        "fill_in_gap": {
            "f1": ["I ___ here.", "am"],
            "f2": ["You ___ there.", "are"]
        },
        "idiom": {
            "i1": ["break the ice", "start talking"]
        }
    }"#;

    fn fixture() -> (crate::corpus::Corpus, Records) {
        let corpus = parse_corpus_str(CORPUS, "test.json", 3).unwrap();
        let records = reconcile(corpus.ids(), Records::new(), INITIAL_WEIGHT).records;
        (corpus, records)
    }

    fn types(list: &[QuestionType]) -> BTreeSet<QuestionType> {
        list.iter().copied().collect()
    }

    #[test]
    fn select_returns_distinct_ids_from_enabled_types() {
        let (corpus, records) = fixture();
        let enabled = types(&[QuestionType::Vocabulary, QuestionType::Idiom]);
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..100 {
            let selection =
                select(corpus.by_type(), &records, &enabled, 3, INITIAL_WEIGHT, &mut rng)
                    .unwrap();
            assert_eq!(selection.ids.len(), 3);
            assert!(selection.warning.is_none());
            let unique: HashSet<_> = selection.ids.iter().collect();
            assert_eq!(unique.len(), 3);
            assert!(selection
                .ids
                .iter()
                .all(|id| enabled.contains(&corpus.get(id).unwrap().question_type())));
        }
    }

    #[test]
    fn select_clamps_to_pool_and_warns() {
        let (corpus, records) = fixture();
        let enabled = types(&[QuestionType::FillInGap]);
        let selection = select(
            corpus.by_type(),
            &records,
            &enabled,
            10,
            INITIAL_WEIGHT,
            &mut StdRng::seed_from_u64(2),
        )
        .unwrap();

        let mut ids = selection.ids.clone();
        ids.sort();
        assert_eq!(ids, vec!["f1", "f2"]);
        assert_eq!(
            selection.warning,
            Some(PoolTooSmall {
                requested: 10,
                available: 2
            })
        );
    }

    #[test]
    fn select_empty_pool() {
        let (corpus, records) = fixture();
        let mut rng = StdRng::seed_from_u64(3);

        let none_enabled = select(
            corpus.by_type(),
            &records,
            &BTreeSet::new(),
            1,
            INITIAL_WEIGHT,
            &mut rng,
        );
        assert!(matches!(none_enabled, Err(DrillError::EmptyPool)));

        let zero = select(
            corpus.by_type(),
            &records,
            &BTreeSet::new(),
            0,
            INITIAL_WEIGHT,
            &mut rng,
        )
        .unwrap();
        assert!(zero.ids.is_empty());
    }

    #[test]
    fn heavier_items_are_drawn_more_often() {
        let (corpus, mut records) = fixture();
        let mastered = Record {
            correct: 4.0,
            asked: 4,
            weight: 4.0 / 17.0,
        };
        let struggling = Record {
            correct: 0.0,
            asked: 5,
            weight: 5.0,
        };
        records.insert("v1".into(), mastered);
        records.insert("v3".into(), struggling);

        let enabled = types(&[QuestionType::Vocabulary]);
        let mut rng = StdRng::seed_from_u64(4);
        let mut counts: BTreeMap<ItemId, usize> = BTreeMap::new();
        for _ in 0..5000 {
            let selection =
                select(corpus.by_type(), &records, &enabled, 1, INITIAL_WEIGHT, &mut rng)
                    .unwrap();
            *counts.entry(selection.ids[0].clone()).or_default() += 1;
        }

        let v1 = counts.get("v1").copied().unwrap_or(0);
        let v2 = counts.get("v2").copied().unwrap_or(0);
        let v3 = counts.get("v3").copied().unwrap_or(0);
        assert!(v1 < v2 && v2 < v3, "counts {counts:?}");
    }

    #[test]
    fn weighted_sample_matches_first_draw_probabilities() {
        let weights = [1.0, 2.0, 7.0];
        let mut rng = StdRng::seed_from_u64(5);
        let mut firsts = [0usize; 3];
        let trials = 20_000;
        for _ in 0..trials {
            let drawn = weighted_sample(&weights, 2, &mut rng);
            assert_eq!(drawn.len(), 2);
            assert_ne!(drawn[0], drawn[1]);
            firsts[drawn[0]] += 1;
        }
        for (i, w) in weights.iter().enumerate() {
            let expected = w / 10.0;
            let observed = firsts[i] as f64 / trials as f64;
            assert!(
                (observed - expected).abs() < 0.02,
                "index {i}: expected {expected}, observed {observed}"
            );
        }
    }

    #[test]
    fn weighted_sample_caps_at_population() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut drawn = weighted_sample(&[1.0, 1.0, 1.0], 5, &mut rng);
        drawn.sort();
        assert_eq!(drawn, vec![0, 1, 2]);
        assert!(weighted_sample(&[], 3, &mut rng).is_empty());
    }
}
