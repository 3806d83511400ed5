//! CSV export of mined rule sets.

use std::path::Path;

use csv;
use failure;
use serde_json;

use metrics::round6;
use mining::RuleSet;

/// Write a rule set to a CSV file.
///
/// One row per rule, numbered from one. Antecedent and consequent
/// title lists are JSON-encoded into their cells; measures are
/// rounded to six decimals.
pub fn write_rules_csv<P: AsRef<Path>>(path: P, rules: &RuleSet) -> Result<(), failure::Error> {
    let mut writer = csv::Writer::from_path(path)?;

    writer.write_record(&[
        "id",
        "antecedents",
        "consequents",
        "antecedent_support",
        "consequent_support",
        "support",
        "confidence",
        "kulczynski",
        "imbalance_ratio",
    ])?;

    for (id, rule) in rules.rules().iter().enumerate() {
        writer.write_record(&[
            format!("{}", id + 1),
            serde_json::to_string(&rules.titles(&rule.antecedent))?,
            serde_json::to_string(&rules.titles(&rule.consequent))?,
            format!("{}", round6(rule.antecedent_support)),
            format!("{}", round6(rule.consequent_support)),
            format!("{}", round6(rule.support)),
            format!("{}", round6(rule.confidence)),
            format!("{}", rule.kulczynski),
            format!("{}", rule.imbalance_ratio),
        ])?;
    }

    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;

    use super::*;
    use data::Transactions;
    use mining::fpgrowth::Hyperparameters;
    use RuleMiningModel;

    #[test]
    fn writes_one_row_per_rule() {
        let baskets: Vec<Vec<String>> = vec![
            vec!["A".to_owned(), "B".to_owned()],
            vec!["A".to_owned(), "B".to_owned()],
            vec!["A".to_owned()],
        ];
        let model = Hyperparameters::new()
            .min_support(0.5)
            .metric_threshold(0.0)
            .build();
        let rules = model
            .mine(&Transactions::from_baskets(&baskets))
            .unwrap();

        let path = env::temp_dir().join("rulerec_export_test.csv");
        write_rules_csv(&path, &rules).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();

        assert_eq!(lines.len(), rules.len() + 1);
        assert!(lines[0].starts_with("id,antecedents,consequents"));
        assert!(contents.contains("[\"\"A\"\"]") || contents.contains("[\"A\"]"));

        // Rows are numbered from one.
        assert!(lines[1].starts_with("1,"));
        assert!(lines[lines.len() - 1].starts_with(&format!("{},", rules.len())));
    }
}
