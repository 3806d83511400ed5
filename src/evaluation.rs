//! Evaluation of rule-based recommenders.

use rayon::prelude::*;

use data::Transactions;
use recommend::RuleRecommender;

/// Compute the hit rate of a recommender on held-out transactions.
///
/// For every test transaction with at least two items, the last item
/// is held out, the rest is used as the query basket, and a hit is
/// scored when the held-out title appears among the `top_n`
/// recommendations. Transactions with fewer than two items are
/// skipped; errors if none remain.
pub fn hit_rate_score(
    recommender: &RuleRecommender,
    test: &Transactions,
    top_n: usize,
) -> Result<f32, &'static str> {
    let hits: Vec<f32> = test
        .transactions()
        .par_iter()
        .filter_map(|items| {
            if items.len() < 2 {
                return None;
            }

            let basket = test.titles(&items[..items.len() - 1]);
            let held_out = test.title(*items.last().unwrap());

            let recommended = recommender.recommend(&basket, top_n);

            if recommended.iter().any(|title| title == held_out) {
                Some(1.0)
            } else {
                Some(0.0)
            }
        })
        .collect();

    if hits.is_empty() {
        return Err("no test transactions with at least two items");
    }

    Ok(hits.iter().sum::<f32>() / hits.len() as f32)
}
