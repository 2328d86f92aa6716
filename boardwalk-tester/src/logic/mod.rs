pub mod loader;
pub mod presenter;
pub mod reports;
pub mod scenarios;
pub mod tester;

pub use loader::FileBoardLoader;
pub use scenarios::{Scenario, ScenarioContext, list_scenarios};
pub use tester::*;

use std::collections::HashSet;

/// Split a comma-separated CLI value, dropping blanks.
pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Parse seed tokens; an empty list falls back to the default seed.
///
/// # Errors
///
/// Returns an error for tokens that are not integers.
pub fn resolve_seeds(tokens: &[String]) -> anyhow::Result<Vec<u64>> {
    let mut seeds = Vec::new();
    for token in tokens {
        if let Ok(value) = token.parse::<u64>() {
            seeds.push(value);
        } else if let Ok(value) = token.parse::<i64>() {
            seeds.push(value.unsigned_abs());
        } else {
            anyhow::bail!("Unrecognized seed token: {token}");
        }
    }
    let mut seen = HashSet::new();
    seeds.retain(|seed| seen.insert(*seed));
    if seeds.is_empty() {
        seeds.push(1337);
    }
    Ok(seeds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_csv_trims_and_filters() {
        let parts = split_csv(" smoke, ,card-draws,  mortgage-rules ");
        assert_eq!(parts, vec!["smoke", "card-draws", "mortgage-rules"]);
    }

    #[test]
    fn seeds_parse_and_default() {
        let tokens = split_csv("7, -9, 7");
        assert_eq!(resolve_seeds(&tokens).unwrap(), vec![7, 9]);
        assert_eq!(resolve_seeds(&[]).unwrap(), vec![1337]);
        assert!(resolve_seeds(&["abc".to_string()]).is_err());
    }

    #[test]
    fn repeated_seeds_run_once_in_first_seen_order() {
        let tokens = split_csv("5,3,5,-3,8,3");
        assert_eq!(resolve_seeds(&tokens).unwrap(), vec![5, 3, 8]);
    }
}
