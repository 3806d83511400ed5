extern crate rulerec;

use std::env;
use std::process;
use std::str::FromStr;

use rulerec::data::Feedback;
use rulerec::datasets::load_ratings;
use rulerec::export::write_rules_csv;
use rulerec::mining::fpgrowth::Hyperparameters;
use rulerec::mining::RuleMetric;
use rulerec::RuleMiningModel;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        eprintln!(
            "Usage: {} <ratings.csv> <rules.csv> [min_support] [metric] [threshold]",
            args[0]
        );
        process::exit(1);
    }

    let min_support = args
        .get(3)
        .map(|x| f64::from_str(x).unwrap())
        .unwrap_or(0.1);
    let metric = args
        .get(4)
        .map(|x| RuleMetric::from_str(x).unwrap())
        .unwrap_or(RuleMetric::Confidence);
    let threshold = args
        .get(5)
        .map(|x| f64::from_str(x).unwrap())
        .unwrap_or(0.6);

    let ratings = load_ratings(&args[1]).unwrap();
    let transactions = ratings.to_transactions(Feedback::Explicit);

    println!(
        "Mining {} transactions over {} items (min_support={}, metric={:?}, threshold={})",
        transactions.len(),
        transactions.num_items(),
        min_support,
        metric,
        threshold
    );

    let model = Hyperparameters::new()
        .min_support(min_support)
        .metric(metric)
        .metric_threshold(threshold)
        .build();
    let rules = model.mine(&transactions).unwrap();

    println!("Mined {} rules", rules.len());

    write_rules_csv(&args[2], &rules).unwrap();
}
