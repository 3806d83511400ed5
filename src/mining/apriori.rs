//! Frequent-itemset mining with Apriori candidate generation.
//!
//! Kept alongside [`fpgrowth`](../fpgrowth/index.html) as an
//! independent implementation of the same contract: the two miners
//! return identical itemsets, which makes this one a convenient
//! cross-check on small snapshots. Candidate counting scans the whole
//! occurrence matrix per level, so it does not scale to large catalogs.

use std::collections::HashSet;

use data::{TransactionMatrix, Transactions};
use mining::{generate_rules, Itemset, RuleMetric, RuleSet};
use {ItemId, MiningError, RuleMiningModel};

/// Hyperparameters for the Apriori rule miner.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Hyperparameters {
    min_support: f64,
    metric: RuleMetric,
    metric_threshold: f64,
}

impl Hyperparameters {
    /// Build new hyperparameters.
    ///
    /// Defaults: `min_support` 0.1, metric confidence at threshold 0.6.
    pub fn new() -> Self {
        Hyperparameters {
            min_support: 0.1,
            metric: RuleMetric::Confidence,
            metric_threshold: 0.6,
        }
    }

    /// Set the minimum support threshold, in (0, 1].
    pub fn min_support(mut self, min_support: f64) -> Self {
        self.min_support = min_support;
        self
    }

    /// Set the rule acceptance metric.
    pub fn metric(mut self, metric: RuleMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Set the minimum value of the rule acceptance metric.
    pub fn metric_threshold(mut self, metric_threshold: f64) -> Self {
        self.metric_threshold = metric_threshold;
        self
    }

    /// Build the Apriori model.
    pub fn build(self) -> AprioriModel {
        AprioriModel { hyper: self }
    }
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Hyperparameters::new()
    }
}

/// Apriori rule mining model.
#[derive(Clone, Debug)]
pub struct AprioriModel {
    hyper: Hyperparameters,
}

impl RuleMiningModel for AprioriModel {
    fn mine(&self, transactions: &Transactions) -> Result<RuleSet, MiningError> {
        let matrix = transactions.to_matrix();
        let itemsets = frequent_itemsets(&matrix, self.hyper.min_support)?;
        let rules = generate_rules(
            &itemsets,
            matrix.num_transactions(),
            self.hyper.metric,
            self.hyper.metric_threshold,
        )?;

        Ok(RuleSet::new(
            transactions.items().to_vec(),
            rules,
            matrix.num_transactions(),
        ))
    }
}

/// Enumerate every itemset whose support meets `min_support` by
/// levelwise candidate generation.
///
/// Same contract and output as `fpgrowth::frequent_itemsets`.
pub fn frequent_itemsets(
    matrix: &TransactionMatrix,
    min_support: f64,
) -> Result<Vec<Itemset>, MiningError> {
    if min_support <= 0.0 || min_support > 1.0 {
        return Err(MiningError::InvalidMinSupport(min_support));
    }
    if matrix.num_transactions() == 0 {
        return Err(MiningError::EmptyDataset);
    }

    let num_transactions = matrix.num_transactions();
    let support = |items: &[ItemId]| matrix.support_count(items) as f64 / num_transactions as f64;

    let mut itemsets: Vec<Itemset> = Vec::new();

    let mut current: Vec<Itemset> = (0..matrix.num_items())
        .map(|item| {
            let items = vec![item];
            let item_support = support(&items);
            Itemset {
                items: items,
                support: item_support,
            }
        })
        .filter(|itemset| itemset.support >= min_support)
        .collect();

    while !current.is_empty() {
        itemsets.extend(current.iter().cloned());

        let candidates = generate_candidates(&current);
        current = candidates
            .into_iter()
            .map(|items| {
                let candidate_support = support(&items);
                Itemset {
                    items: items,
                    support: candidate_support,
                }
            })
            .filter(|itemset| itemset.support >= min_support)
            .collect();
    }

    itemsets.sort_by(|a, b| {
        a.items
            .len()
            .cmp(&b.items.len())
            .then_with(|| a.items.cmp(&b.items))
    });

    Ok(itemsets)
}

/// Join frequent k-itemsets into (k+1)-candidates, pruning any
/// candidate with an infrequent k-subset.
fn generate_candidates(frequent: &[Itemset]) -> Vec<Vec<ItemId>> {
    let frequent_sets: HashSet<&[ItemId]> = frequent
        .iter()
        .map(|itemset| itemset.items.as_slice())
        .collect();

    let mut seen: HashSet<Vec<ItemId>> = HashSet::new();
    let mut candidates = Vec::new();

    for (position, first) in frequent.iter().enumerate() {
        for second in &frequent[position + 1..] {
            let union = merge_sorted(&first.items, &second.items);

            if union.len() != first.items.len() + 1 {
                continue;
            }
            if seen.contains(&union) {
                continue;
            }
            if has_infrequent_subset(&union, &frequent_sets) {
                continue;
            }

            seen.insert(union.clone());
            candidates.push(union);
        }
    }

    candidates
}

fn merge_sorted(first: &[ItemId], second: &[ItemId]) -> Vec<ItemId> {
    let mut union = first.to_vec();
    for &item in second {
        if !union.contains(&item) {
            union.push(item);
        }
    }
    union.sort();

    union
}

fn has_infrequent_subset(candidate: &[ItemId], frequent: &HashSet<&[ItemId]>) -> bool {
    (0..candidate.len()).any(|skip| {
        let subset: Vec<ItemId> = candidate
            .iter()
            .enumerate()
            .filter(|&(position, _)| position != skip)
            .map(|(_, &item)| item)
            .collect();

        !frequent.contains(subset.as_slice())
    })
}
