//! Frequent-itemset mining and association rule generation.
//!
//! Two miners share the same contract and produce identical output:
//! [`fpgrowth`] (the default, tree-based, built for catalogs with
//! thousands of items) and [`apriori`] (candidate generation, kept for
//! cross-checking and small snapshots). Both encode the transaction
//! snapshot as a boolean occurrence matrix, enumerate every itemset
//! whose support meets `min_support`, split each itemset of size two or
//! more into directed rules, and keep the rules passing the configured
//! metric threshold.
//!
//! # Example
//!
//! ```
//! # extern crate rulerec;
//! use rulerec::RuleMiningModel;
//! use rulerec::data::Transactions;
//! use rulerec::mining::fpgrowth::Hyperparameters;
//!
//! let baskets = vec![
//!     vec!["A".to_owned(), "B".to_owned()],
//!     vec!["A".to_owned(), "B".to_owned()],
//!     vec!["A".to_owned()],
//!     vec!["B".to_owned(), "C".to_owned()],
//! ];
//! let transactions = Transactions::from_baskets(&baskets);
//!
//! let model = Hyperparameters::new()
//!     .min_support(0.5)
//!     .metric_threshold(0.0)
//!     .build();
//! let rules = model.mine(&transactions).unwrap();
//!
//! for rule in rules.rules() {
//!     println!(
//!         "{:?} => {:?} (conf={:.2}, lift={:.2})",
//!         rules.titles(&rule.antecedent),
//!         rules.titles(&rule.consequent),
//!         rule.confidence,
//!         rule.lift
//!     );
//! }
//! ```

pub mod apriori;
pub mod fpgrowth;
mod rules;

use std::str::FromStr;

use {ItemId, MiningError};

pub use self::rules::generate_rules;

/// An immutable set of items annotated with its support: the fraction
/// of transactions containing every item of the set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Itemset {
    /// Item ids, sorted ascending.
    pub items: Vec<ItemId>,
    /// Fraction of transactions containing the set, in (0, 1].
    pub support: f64,
}

/// A directed association rule: antecedent => consequent.
///
/// Rules are value objects: a rule set contains a given (antecedent,
/// consequent) pair at most once. The two sides are always disjoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssociationRule {
    /// Items on the left side, sorted ascending.
    pub antecedent: Vec<ItemId>,
    /// Items on the right side, sorted ascending.
    pub consequent: Vec<ItemId>,
    /// Support of the antecedent alone.
    pub antecedent_support: f64,
    /// Support of the consequent alone.
    pub consequent_support: f64,
    /// Joint support of antecedent and consequent together.
    pub support: f64,
    /// Joint support over antecedent support.
    pub confidence: f64,
    /// Confidence over consequent support.
    pub lift: f64,
    /// Average of the two directional confidences.
    pub kulczynski: f64,
    /// Skew between antecedent and consequent supports.
    pub imbalance_ratio: f64,
}

/// The metric used to accept or reject a candidate rule during
/// generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleMetric {
    /// Joint support of the rule.
    Support,
    /// Joint support over antecedent support.
    Confidence,
    /// Confidence over consequent support.
    Lift,
}

impl FromStr for RuleMetric {
    type Err = MiningError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "support" => Ok(RuleMetric::Support),
            "confidence" => Ok(RuleMetric::Confidence),
            "lift" => Ok(RuleMetric::Lift),
            _ => Err(MiningError::InvalidMetric(name.to_owned())),
        }
    }
}

/// The rules produced by one mining run at fixed parameters, together
/// with the vocabulary they index into.
///
/// Immutable once produced; a new mining run replaces it wholesale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    items: Vec<String>,
    rules: Vec<AssociationRule>,
    num_transactions: usize,
}

impl RuleSet {
    /// Assemble a rule set over a sorted vocabulary.
    pub fn new(items: Vec<String>, rules: Vec<AssociationRule>, num_transactions: usize) -> Self {
        RuleSet {
            items: items,
            rules: rules,
            num_transactions: num_transactions,
        }
    }

    /// The rules, in generation order.
    pub fn rules(&self) -> &[AssociationRule] {
        &self.rules
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the set holds no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The transaction count the supports were normalized by.
    pub fn num_transactions(&self) -> usize {
        self.num_transactions
    }

    /// The title of an item id.
    pub fn title(&self, item: ItemId) -> &str {
        &self.items[item]
    }

    /// The id of a title, if it occurs in the vocabulary.
    pub fn item_id(&self, title: &str) -> Option<ItemId> {
        self.items
            .binary_search_by(|probe| probe.as_str().cmp(title))
            .ok()
    }

    /// Map item ids back to titles.
    pub fn titles(&self, ids: &[ItemId]) -> Vec<String> {
        ids.iter().map(|&id| self.items[id].clone()).collect()
    }
}
