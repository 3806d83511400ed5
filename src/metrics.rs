//! Symmetry-aware interestingness measures for association rules.
//!
//! Support, confidence and lift are computed during rule generation; the
//! two measures here are derived afterwards from the base supports and
//! the transaction count. Both recover absolute counts by rounding the
//! support fractions, and round to six decimal places at each
//! intermediate step. The rounding chain is part of the contract: it
//! reproduces the reference outputs exactly.

use MiningError;

/// Round a value to six decimal places.
pub fn round6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

/// The Kulczynski measure of a rule: the average of the two directional
/// confidences.
///
/// 0.5 means the rule is uninteresting; values towards 0 mean the
/// itemsets are negatively associated, values towards 1 positively.
/// Swapping antecedent and consequent leaves the result unchanged.
pub fn kulczynski(
    antecedent_support: f64,
    consequent_support: f64,
    joint_support: f64,
    num_transactions: usize,
) -> f64 {
    let n = num_transactions as f64;

    let count_a = (antecedent_support * n).round();
    let count_b = (consequent_support * n).round();
    let count_ab = (joint_support * n).round();

    // P(B|A)
    let p_ba = round6(count_ab / count_a);
    // P(A|B)
    let p_ab = round6(count_ab / count_b);

    round6(0.5 * (p_ab + p_ba))
}

/// The imbalance ratio of a rule: how skewed the antecedent and
/// consequent supports are relative to each other.
///
/// 0 means perfectly balanced, 1 maximally unbalanced. Fails with
/// `MiningError::DegenerateRule` when the denominator is zero, i.e. the
/// antecedent and consequent counts sum to exactly the joint count.
pub fn imbalance_ratio(
    antecedent_support: f64,
    consequent_support: f64,
    joint_support: f64,
    num_transactions: usize,
) -> Result<f64, MiningError> {
    let n = num_transactions as f64;

    let count_a = (antecedent_support * n).round();
    let count_b = (consequent_support * n).round();
    let count_ab = (joint_support * n).round();

    let denominator = count_a + count_b - count_ab;

    if denominator == 0.0 {
        return Err(MiningError::DegenerateRule);
    }

    Ok(round6((count_a - count_b).abs() / denominator))
}
