//! Rule-based recommendation on top of a mined rule set.
//!
//! The recommender matches an input basket against rule antecedents,
//! keeps the rules whose quality measures clear the configured gates,
//! and walks their consequents in confidence order. When no gated rule
//! matches the basket it falls back to globally popular consequents so
//! that a recommendation is always produced.

use std::cmp::Ordering;
use std::collections::HashSet;

use data::Catalog;
use mining::{AssociationRule, RuleSet};
use {ItemId, RecommendationError};

/// Recommends items by matching baskets against association rules.
#[derive(Clone, Debug)]
pub struct RuleRecommender {
    rules: RuleSet,
    min_kulczynski: f64,
    max_imbalance_ratio: f64,
}

impl RuleRecommender {
    /// Build a recommender over a rule set.
    ///
    /// Defaults: Kulczynski of at least 0.6, imbalance ratio of at
    /// most 0.3.
    pub fn new(rules: RuleSet) -> Self {
        RuleRecommender {
            rules: rules,
            min_kulczynski: 0.6,
            max_imbalance_ratio: 0.3,
        }
    }

    /// Set the minimum Kulczynski measure a rule must reach.
    pub fn min_kulczynski(mut self, min_kulczynski: f64) -> Self {
        self.min_kulczynski = min_kulczynski;
        self
    }

    /// Set the maximum imbalance ratio a rule may have.
    pub fn max_imbalance_ratio(mut self, max_imbalance_ratio: f64) -> Self {
        self.max_imbalance_ratio = max_imbalance_ratio;
        self
    }

    /// The underlying rule set.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Recommend up to `top_n` titles for a basket of liked titles.
    ///
    /// A rule matches if at least one of its antecedent items occurs in
    /// the basket and its measures pass both gates. Matching rules are
    /// ranked by confidence, descending, and their consequents are
    /// collected in that order, skipping basket members and duplicates.
    /// Titles absent from the rule vocabulary are ignored; if nothing
    /// matches, popular consequents are returned instead.
    pub fn recommend(&self, basket: &[String], top_n: usize) -> Vec<String> {
        let basket_ids: HashSet<ItemId> = basket
            .iter()
            .filter_map(|title| self.rules.item_id(title))
            .collect();

        let mut matching: Vec<&AssociationRule> = self
            .rules
            .rules()
            .iter()
            .filter(|rule| rule.antecedent.iter().any(|item| basket_ids.contains(item)))
            .filter(|rule| self.passes_gates(rule))
            .collect();
        matching.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
        });

        let recommended = self.walk_consequents(&matching, &basket_ids, top_n);

        if recommended.is_empty() {
            self.popular_items(top_n, basket)
        } else {
            recommended
        }
    }

    /// Recommend up to `top_n` titles for a user's liked titles,
    /// validating them against a catalog first.
    ///
    /// Every unknown title is reported, not just the first one.
    pub fn recommend_for_user(
        &self,
        user_items: &[String],
        catalog: &Catalog,
        top_n: usize,
    ) -> Result<Vec<String>, RecommendationError> {
        let unknown: Vec<String> = user_items
            .iter()
            .filter(|title| !catalog.contains(title))
            .cloned()
            .collect();

        if !unknown.is_empty() {
            return Err(RecommendationError::UnknownItems(unknown));
        }

        Ok(self.recommend(user_items, top_n))
    }

    /// The most popular consequents across the whole rule set.
    ///
    /// Walks every rule in confidence order without applying the
    /// quality gates. Excluded titles are skipped.
    pub fn popular_items(&self, top_n: usize, exclude: &[String]) -> Vec<String> {
        let excluded: HashSet<ItemId> = exclude
            .iter()
            .filter_map(|title| self.rules.item_id(title))
            .collect();

        let mut ranked: Vec<&AssociationRule> = self.rules.rules().iter().collect();
        ranked.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
        });

        self.walk_consequents(&ranked, &excluded, top_n)
    }

    fn passes_gates(&self, rule: &AssociationRule) -> bool {
        rule.kulczynski >= self.min_kulczynski && rule.imbalance_ratio <= self.max_imbalance_ratio
    }

    fn walk_consequents(
        &self,
        ranked: &[&AssociationRule],
        excluded: &HashSet<ItemId>,
        top_n: usize,
    ) -> Vec<String> {
        let mut seen: HashSet<ItemId> = HashSet::new();
        let mut recommended = Vec::new();

        'outer: for rule in ranked {
            for &item in &rule.consequent {
                if excluded.contains(&item) || !seen.insert(item) {
                    continue;
                }

                recommended.push(self.rules.title(item).to_owned());

                if recommended.len() == top_n {
                    break 'outer;
                }
            }
        }

        recommended
    }
}
