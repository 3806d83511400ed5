//! Rule generation shared by the miners.

use std::collections::{HashMap, HashSet};

use itertools::Itertools;

use metrics;
use super::{AssociationRule, Itemset, RuleMetric};
use {ItemId, MiningError};

/// Derive directed association rules from frequent itemsets.
///
/// Every itemset of size two or more is split into all non-empty proper
/// (antecedent, consequent) pairs; a split is kept iff its `metric`
/// value meets `metric_threshold`. The Kulczynski and imbalance-ratio
/// measures are filled in from the base supports and the transaction
/// count. Output rules are unique by (antecedent, consequent).
pub fn generate_rules(
    itemsets: &[Itemset],
    num_transactions: usize,
    metric: RuleMetric,
    metric_threshold: f64,
) -> Result<Vec<AssociationRule>, MiningError> {
    let support_index: HashMap<&[ItemId], f64> = itemsets
        .iter()
        .map(|itemset| (itemset.items.as_slice(), itemset.support))
        .collect();

    let mut seen: HashSet<(Vec<ItemId>, Vec<ItemId>)> = HashSet::new();
    let mut rules = Vec::new();

    for itemset in itemsets.iter().filter(|itemset| itemset.items.len() >= 2) {
        for size in 1..itemset.items.len() {
            for antecedent in itemset.items.iter().cloned().combinations(size) {
                let consequent: Vec<ItemId> = itemset
                    .items
                    .iter()
                    .cloned()
                    .filter(|item| !antecedent.contains(item))
                    .collect();

                let antecedent_support = subset_support(&support_index, &antecedent);
                let consequent_support = subset_support(&support_index, &consequent);

                // Antecedent support is positive by construction: the
                // antecedent is itself a frequent itemset.
                let confidence = itemset.support / antecedent_support;
                let lift = confidence / consequent_support;

                let value = match metric {
                    RuleMetric::Support => itemset.support,
                    RuleMetric::Confidence => confidence,
                    RuleMetric::Lift => lift,
                };

                if value < metric_threshold {
                    continue;
                }

                if !seen.insert((antecedent.clone(), consequent.clone())) {
                    continue;
                }

                let kulczynski = metrics::kulczynski(
                    antecedent_support,
                    consequent_support,
                    itemset.support,
                    num_transactions,
                );
                let imbalance_ratio = metrics::imbalance_ratio(
                    antecedent_support,
                    consequent_support,
                    itemset.support,
                    num_transactions,
                )?;

                rules.push(AssociationRule {
                    antecedent: antecedent,
                    consequent: consequent,
                    antecedent_support: antecedent_support,
                    consequent_support: consequent_support,
                    support: itemset.support,
                    confidence: confidence,
                    lift: lift,
                    kulczynski: kulczynski,
                    imbalance_ratio: imbalance_ratio,
                });
            }
        }
    }

    Ok(rules)
}

fn subset_support(index: &HashMap<&[ItemId], f64>, items: &[ItemId]) -> f64 {
    // Support is antitone in set inclusion, so every subset of a
    // frequent itemset is itself in the frequent list.
    *index
        .get(items)
        .expect("all subsets of a frequent itemset are frequent")
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    // Frequent itemsets of [{A,B},{A,B},{A},{B,C}] at min_support 0.5.
    fn sample_itemsets() -> Vec<Itemset> {
        vec![
            Itemset {
                items: vec![0],
                support: 0.75,
            },
            Itemset {
                items: vec![1],
                support: 0.75,
            },
            Itemset {
                items: vec![0, 1],
                support: 0.5,
            },
        ]
    }

    #[test]
    fn splits_itemsets_into_directed_rules() {
        let rules = generate_rules(&sample_itemsets(), 4, RuleMetric::Confidence, 0.0).unwrap();

        assert_eq!(rules.len(), 2);

        let forward = rules
            .iter()
            .find(|rule| rule.antecedent == vec![0])
            .unwrap();
        assert_eq!(forward.consequent, vec![1]);
        assert!((forward.confidence - 2.0 / 3.0).abs() < 1e-9);
        assert!((forward.lift - 8.0 / 9.0).abs() < 1e-9);
        assert!((forward.support - 0.5).abs() < 1e-9);
    }

    #[test]
    fn metric_threshold_discards_splits() {
        let rules = generate_rules(&sample_itemsets(), 4, RuleMetric::Confidence, 0.7).unwrap();
        assert!(rules.is_empty());

        let rules = generate_rules(&sample_itemsets(), 4, RuleMetric::Support, 0.5).unwrap();
        assert_eq!(rules.len(), 2);

        let rules = generate_rules(&sample_itemsets(), 4, RuleMetric::Lift, 1.0).unwrap();
        assert!(rules.is_empty());
    }

    #[test]
    fn sides_are_disjoint_and_pairs_unique() {
        let itemsets = vec![
            Itemset {
                items: vec![0],
                support: 0.75,
            },
            Itemset {
                items: vec![1],
                support: 0.75,
            },
            Itemset {
                items: vec![2],
                support: 0.5,
            },
            Itemset {
                items: vec![0, 1],
                support: 0.5,
            },
            Itemset {
                items: vec![0, 2],
                support: 0.5,
            },
            Itemset {
                items: vec![1, 2],
                support: 0.5,
            },
            Itemset {
                items: vec![0, 1, 2],
                support: 0.5,
            },
        ];

        let rules = generate_rules(&itemsets, 4, RuleMetric::Confidence, 0.0).unwrap();

        let mut pairs = HashSet::new();
        for rule in &rules {
            assert!(rule
                .antecedent
                .iter()
                .all(|item| !rule.consequent.contains(item)));
            assert!(pairs.insert((rule.antecedent.clone(), rule.consequent.clone())));
        }

        // 3 two-item itemsets contribute 2 splits each; the three-item
        // itemset contributes 2^3 - 2 splits.
        assert_eq!(rules.len(), 12);
    }

    #[test]
    fn confidence_stays_within_bounds() {
        let rules = generate_rules(&sample_itemsets(), 4, RuleMetric::Confidence, 0.0).unwrap();

        for rule in &rules {
            assert!(rule.confidence >= 0.0 && rule.confidence <= 1.0);
        }
    }

    #[test]
    fn augmented_measures_are_filled() {
        let rules = generate_rules(&sample_itemsets(), 4, RuleMetric::Confidence, 0.0).unwrap();

        for rule in &rules {
            // A => B and B => A share supports here, so both directions
            // agree on the symmetric measure.
            assert!((rule.kulczynski - 2.0 / 3.0).abs() < 1e-6);
            assert_eq!(rule.imbalance_ratio, 0.0);
        }
    }
}
