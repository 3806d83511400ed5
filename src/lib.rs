#![deny(missing_docs)]
//! # rulerec
//!
//! `rulerec` mines user-item interaction logs (such as movie ratings) into
//! association rules ("users who liked A also liked B") and uses the
//! resulting rule set to answer recommendation queries: given a basket of
//! items, or a known user's history, which items should be suggested next?
//!
//! Mining runs as a synchronous batch over a full transaction snapshot:
//! transactions are encoded into a boolean occurrence matrix, frequent
//! itemsets are extracted with FP-growth (or Apriori), directed rules are
//! derived with support/confidence/lift plus the symmetry-aware Kulczynski
//! and imbalance-ratio measures, and a recommender filters and ranks the
//! surviving rules. When no rule matches a query, a popularity fallback
//! guarantees a non-empty answer.
//!
//! ## Example
//!
//! ```rust
//! # extern crate rulerec;
//! use rulerec::RuleMiningModel;
//! use rulerec::data::Transactions;
//! use rulerec::mining::fpgrowth::Hyperparameters;
//! use rulerec::recommend::RuleRecommender;
//!
//! let baskets = vec![
//!     vec!["Alien (1979)".to_owned(), "Blade Runner (1982)".to_owned()],
//!     vec!["Alien (1979)".to_owned(), "Blade Runner (1982)".to_owned()],
//!     vec!["Alien (1979)".to_owned(), "Casablanca (1942)".to_owned()],
//! ];
//! let transactions = Transactions::from_baskets(&baskets);
//!
//! let model = Hyperparameters::new()
//!     .min_support(0.5)
//!     .metric_threshold(0.6)
//!     .build();
//! let rules = model.mine(&transactions).unwrap();
//!
//! let recommender = RuleRecommender::new(rules)
//!     .min_kulczynski(0.5)
//!     .max_imbalance_ratio(1.0);
//! let recommended = recommender.recommend(&["Blade Runner (1982)".to_owned()], 3);
//!
//! assert_eq!(recommended, vec!["Alien (1979)".to_owned()]);
//! ```
#[macro_use]
extern crate serde_derive;

extern crate itertools;

#[cfg(feature = "default")]
extern crate csv;
#[macro_use]
extern crate failure;
extern crate ndarray;
extern crate rand;
extern crate rayon;
extern crate serde;
extern crate serde_json;
extern crate siphasher;

pub mod data;
#[cfg(feature = "default")]
pub mod datasets;
pub mod evaluation;
#[cfg(feature = "default")]
pub mod export;
pub mod metrics;
pub mod mining;
pub mod recommend;

use data::Transactions;
use mining::RuleSet;

/// Alias for item indices into a transaction vocabulary.
pub type ItemId = usize;

/// Mining error types.
#[derive(Debug, Fail)]
pub enum MiningError {
    /// The transaction snapshot contains no transactions.
    #[fail(display = "no transactions to mine")]
    EmptyDataset,
    /// The minimum support threshold is outside (0, 1].
    #[fail(display = "min_support must be in (0, 1], got {}", _0)]
    InvalidMinSupport(f64),
    /// An unsupported rule metric name was supplied.
    #[fail(display = "unsupported rule metric: {}", _0)]
    InvalidMetric(String),
    /// The imbalance-ratio denominator is zero: the antecedent and
    /// consequent counts sum to exactly the joint count.
    #[fail(display = "degenerate rule: zero imbalance-ratio denominator")]
    DegenerateRule,
}

/// Recommendation query error types.
#[derive(Debug, Fail)]
pub enum RecommendationError {
    /// The query references items absent from the catalog. Carries all
    /// offending titles.
    #[fail(display = "items not present in the catalog: {:?}", _0)]
    UnknownItems(Vec<String>),
}

/// Trait describing models that mine an association rule set from a
/// transaction snapshot.
///
/// Mining is a pure function of the transactions and the model's
/// parameters: mining the same snapshot twice yields an identical rule
/// set. Callers own any caching of the result.
pub trait RuleMiningModel {
    /// Mine association rules from `transactions`.
    fn mine(&self, transactions: &Transactions) -> Result<RuleSet, MiningError>;
}
