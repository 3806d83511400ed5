//! Frequent-itemset mining with FP-growth.
//!
//! The miner never materializes candidate itemsets: transactions are
//! compressed into a prefix tree whose paths are ordered by descending
//! item frequency, and itemsets are enumerated by recursing into
//! conditional trees, one per item. This is what keeps mining tractable
//! at catalog scale, where candidate generation over thousands of items
//! explodes combinatorially.
//!
//! Itemset enumeration order carries no meaning; the output is sorted
//! by length and items purely for determinism.

use std::collections::HashMap;

use data::{TransactionMatrix, Transactions};
use mining::{generate_rules, Itemset, RuleMetric, RuleSet};
use {ItemId, MiningError, RuleMiningModel};

/// Hyperparameters for the FP-growth rule miner.
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

    /// Build the FP-growth model.
    pub fn build(self) -> FPGrowthModel {
        FPGrowthModel { hyper: self }
    }
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Hyperparameters::new()
    }
}

/// FP-growth rule mining model.
#[derive(Clone, Debug)]
pub struct FPGrowthModel {
    hyper: Hyperparameters,
}

impl RuleMiningModel for FPGrowthModel {
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

/// Enumerate every itemset whose support meets `min_support`.
///
/// Fails with `InvalidMinSupport` outside (0, 1] and `EmptyDataset` on
/// a matrix without rows. A threshold no itemset reaches yields an
/// empty collection, not an error.
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
    let baskets: Vec<(Vec<ItemId>, usize)> = (0..num_transactions)
        .map(|row| (matrix.row_items(row), 1))
        .collect();

    let mut itemsets = Vec::new();
    let tree = FPTree::build(&baskets, min_support, num_transactions);
    tree.mine(&[], min_support, num_transactions, &mut itemsets);

    itemsets.sort_by(|a, b| {
        a.items
            .len()
            .cmp(&b.items.len())
            .then_with(|| a.items.cmp(&b.items))
    });

    Ok(itemsets)
}

struct FPNode {
    item: ItemId,
    count: usize,
    parent: usize,
    children: HashMap<ItemId, usize>,
}

/// A prefix tree over frequency-ordered transactions. Nodes live in an
/// arena; index 0 is the root sentinel.
struct FPTree {
    nodes: Vec<FPNode>,
    item_nodes: HashMap<ItemId, Vec<usize>>,
    item_counts: HashMap<ItemId, usize>,
}

impl FPTree {
    /// Build a tree from weighted baskets, keeping only items whose
    /// total weight meets `min_support` of `num_transactions`.
    fn build(
        baskets: &[(Vec<ItemId>, usize)],
        min_support: f64,
        num_transactions: usize,
    ) -> FPTree {
        let mut counts: HashMap<ItemId, usize> = HashMap::new();
        for &(ref items, weight) in baskets {
            for &item in items {
                *counts.entry(item).or_insert(0) += weight;
            }
        }
        counts.retain(|_, count| *count as f64 / num_transactions as f64 >= min_support);

        // Descending frequency, item id breaking ties, so that shared
        // prefixes compress maximally and ordering is deterministic.
        let mut order: Vec<ItemId> = counts.keys().cloned().collect();
        order.sort_by(|a, b| counts[b].cmp(&counts[a]).then_with(|| a.cmp(b)));
        let rank: HashMap<ItemId, usize> = order
            .iter()
            .enumerate()
            .map(|(position, &item)| (item, position))
            .collect();

        let root = FPNode {
            item: 0,
            count: 0,
            parent: 0,
            children: HashMap::new(),
        };
        let mut tree = FPTree {
            nodes: vec![root],
            item_nodes: HashMap::new(),
            item_counts: counts,
        };

        for &(ref items, weight) in baskets {
            let mut path: Vec<ItemId> = items
                .iter()
                .cloned()
                .filter(|item| rank.contains_key(item))
                .collect();
            path.sort_by_key(|item| rank[item]);
            tree.insert(&path, weight);
        }

        tree
    }

    fn insert(&mut self, path: &[ItemId], count: usize) {
        let mut node = 0;

        for &item in path {
            let child = match self.nodes[node].children.get(&item).cloned() {
                Some(child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(FPNode {
                        item: item,
                        count: 0,
                        parent: node,
                        children: HashMap::new(),
                    });
                    self.nodes[node].children.insert(item, child);
                    self.item_nodes
                        .entry(item)
                        .or_insert_with(Vec::new)
                        .push(child);
                    child
                }
            };

            self.nodes[child].count += count;
            node = child;
        }
    }

    /// The items on the path from a node's parent up to the root.
    fn prefix_path(&self, node: usize) -> Vec<ItemId> {
        let mut path = Vec::new();
        let mut current = self.nodes[node].parent;

        while current != 0 {
            path.push(self.nodes[current].item);
            current = self.nodes[current].parent;
        }

        path.reverse();
        path
    }

    /// Emit every frequent itemset extending `suffix`, recursing into
    /// the conditional tree of each item.
    fn mine(
        &self,
        suffix: &[ItemId],
        min_support: f64,
        num_transactions: usize,
        itemsets: &mut Vec<Itemset>,
    ) {
        let mut items: Vec<ItemId> = self.item_counts.keys().cloned().collect();
        items.sort_by(|a, b| {
            self.item_counts[a]
                .cmp(&self.item_counts[b])
                .then_with(|| a.cmp(b))
        });

        for item in items {
            let count = self.item_counts[&item];

            let mut extended = suffix.to_vec();
            extended.push(item);
            extended.sort();

            itemsets.push(Itemset {
                items: extended.clone(),
                support: count as f64 / num_transactions as f64,
            });

            let paths: Vec<(Vec<ItemId>, usize)> = self
                .item_nodes
                .get(&item)
                .map(|nodes| {
                    nodes
                        .iter()
                        .map(|&node| (self.prefix_path(node), self.nodes[node].count))
                        .filter(|&(ref path, _)| !path.is_empty())
                        .collect()
                })
                .unwrap_or_else(Vec::new);

            if paths.is_empty() {
                continue;
            }

            let conditional = FPTree::build(&paths, min_support, num_transactions);
            if !conditional.item_counts.is_empty() {
                conditional.mine(&extended, min_support, num_transactions, itemsets);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::distributions::{Distribution, Uniform};
    use rand::{SeedableRng, XorShiftRng};

    use super::*;
    use mining::apriori;

    fn baskets(raw: &[&[&str]]) -> Transactions {
        let owned: Vec<Vec<String>> = raw
            .iter()
            .map(|basket| basket.iter().map(|x| x.to_string()).collect())
            .collect();

        Transactions::from_baskets(&owned)
    }

    fn support_of(itemsets: &[Itemset], items: &[ItemId]) -> Option<f64> {
        itemsets
            .iter()
            .find(|itemset| itemset.items == items)
            .map(|itemset| itemset.support)
    }

    #[test]
    fn small_snapshot_itemsets() {
        let transactions = baskets(&[&["A", "B"], &["A", "B"], &["A"], &["B", "C"]]);
        let matrix = transactions.to_matrix();

        let itemsets = frequent_itemsets(&matrix, 0.5).unwrap();

        // A = 0, B = 1, C = 2 in the sorted vocabulary.
        assert_eq!(support_of(&itemsets, &[0]), Some(0.75));
        assert_eq!(support_of(&itemsets, &[1]), Some(0.75));
        assert_eq!(support_of(&itemsets, &[0, 1]), Some(0.5));
        assert!(itemsets
            .iter()
            .all(|itemset| !itemset.items.contains(&2)));
        assert_eq!(itemsets.len(), 3);
    }

    #[test]
    fn empty_snapshot_is_an_error() {
        let transactions = Transactions::from_baskets(&[]);
        let matrix = transactions.to_matrix();

        match frequent_itemsets(&matrix, 0.5) {
            Err(MiningError::EmptyDataset) => (),
            other => panic!("expected EmptyDataset, got {:?}", other),
        }
    }

    #[test]
    fn min_support_is_validated() {
        let transactions = baskets(&[&["A"]]);
        let matrix = transactions.to_matrix();

        for &bad in &[0.0, -0.1, 1.5] {
            match frequent_itemsets(&matrix, bad) {
                Err(MiningError::InvalidMinSupport(value)) => assert_eq!(value, bad),
                other => panic!("expected InvalidMinSupport, got {:?}", other),
            }
        }
    }

    #[test]
    fn unreachable_threshold_yields_no_itemsets() {
        let transactions = baskets(&[&["A"], &["B"], &["C"], &["D"]]);
        let matrix = transactions.to_matrix();

        let itemsets = frequent_itemsets(&matrix, 0.9).unwrap();
        assert!(itemsets.is_empty());
    }

    #[test]
    fn support_is_monotone_in_set_inclusion() {
        let transactions = baskets(&[
            &["A", "B", "C"],
            &["A", "B"],
            &["A", "C"],
            &["B", "C"],
            &["A", "B", "C", "D"],
        ]);
        let matrix = transactions.to_matrix();

        let itemsets = frequent_itemsets(&matrix, 0.2).unwrap();

        for larger in &itemsets {
            for smaller in &itemsets {
                if smaller.items.iter().all(|item| larger.items.contains(item)) {
                    assert!(smaller.support >= larger.support);
                }
            }
        }
    }

    #[test]
    fn mining_is_idempotent() {
        let transactions = baskets(&[
            &["A", "B", "C"],
            &["A", "B"],
            &["B", "C"],
            &["A", "C"],
        ]);

        let model = Hyperparameters::new()
            .min_support(0.25)
            .metric_threshold(0.0)
            .build();

        let first = model.mine(&transactions).unwrap();
        let second = model.mine(&transactions).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn agrees_with_apriori_on_random_snapshots() {
        let mut rng = XorShiftRng::from_seed([7; 16]);
        let item_range = Uniform::new(0usize, 12);

        let raw: Vec<Vec<String>> = (0..60)
            .map(|_| {
                (0..5)
                    .map(|_| format!("item-{:02}", item_range.sample(&mut rng)))
                    .collect()
            })
            .collect();
        let transactions = Transactions::from_baskets(&raw);
        let matrix = transactions.to_matrix();

        let from_tree = frequent_itemsets(&matrix, 0.1).unwrap();
        let from_candidates = apriori::frequent_itemsets(&matrix, 0.1).unwrap();

        assert_eq!(from_tree, from_candidates);
        assert!(!from_tree.is_empty());
    }

    #[test]
    fn model_produces_expected_rule() {
        let transactions = baskets(&[&["A", "B"], &["A", "B"], &["A"], &["B", "C"]]);

        let model = Hyperparameters::new()
            .min_support(0.5)
            .metric_threshold(0.0)
            .build();
        let rules = model.mine(&transactions).unwrap();

        let forward = rules
            .rules()
            .iter()
            .find(|rule| rules.titles(&rule.antecedent) == vec!["A".to_owned()])
            .unwrap();

        assert_eq!(rules.titles(&forward.consequent), vec!["B".to_owned()]);
        assert!((forward.confidence - 2.0 / 3.0).abs() < 1e-9);
    }
}
