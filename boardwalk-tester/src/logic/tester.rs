use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use super::scenarios::{Scenario, ScenarioContext};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub seed: u64,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub cards_resolved: usize,
    pub mortgages_checked: usize,
    pub failures: Vec<String>,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
}

pub struct LogicTester {
    context: ScenarioContext,
}

impl LogicTester {
    pub const fn new(context: ScenarioContext) -> Self {
        Self { context }
    }

    pub async fn run_scenario(
        &self,
        scenario: Scenario,
        seeds: &[u64],
        iterations: usize,
    ) -> Vec<ScenarioResult> {
        let mut results = Vec::with_capacity(seeds.len());
        for &seed in seeds {
            if self.context.verbose {
                println!(
                    "🧪 Testing scenario: {} (seed: {seed})",
                    scenario.key().bright_white()
                );
            }
            results.push(self.run_single_scenario(scenario, seed, iterations).await);
        }
        results
    }

    async fn run_single_scenario(
        &self,
        scenario: Scenario,
        seed: u64,
        iterations: usize,
    ) -> ScenarioResult {
        let mut successes = 0;
        let mut cards_resolved = 0;
        let mut mortgages_checked = 0;
        let mut failures = Vec::new();
        let mut performance_data = Vec::new();

        for i in 0..iterations {
            let start_time = Instant::now();
            let iteration_seed = seed.wrapping_add(u64::try_from(i).unwrap_or(u64::MAX));

            match scenario.run(&self.context, iteration_seed).await {
                Ok(summary) => {
                    successes += 1;
                    cards_resolved += summary.cards_resolved;
                    mortgages_checked += summary.mortgages_checked;
                    let duration = start_time.elapsed();
                    performance_data.push(duration);
                    if self.context.verbose {
                        let signature = summary
                            .signature
                            .map(|s| format!(" signature:{s:016x}"))
                            .unwrap_or_default();
                        println!(
                            "  ✅ Iteration {}/{} passed ({duration:?}) cards:{} mortgages:{}{signature}",
                            i + 1,
                            iterations,
                            summary.cards_resolved,
                            summary.mortgages_checked
                        );
                    }
                }
                Err(err) => {
                    let message = format!("Iteration {} (seed {iteration_seed}): {err:#}", i + 1);
                    if self.context.verbose {
                        println!("  ❌ {}", message.clone().red());
                    }
                    failures.push(message);
                }
            }
        }

        let average_duration = if performance_data.is_empty() {
            Duration::ZERO
        } else {
            performance_data.iter().sum::<Duration>()
                / u32::try_from(performance_data.len()).unwrap_or(1)
        };

        ScenarioResult {
            scenario_name: scenario.key().to_string(),
            seed,
            passed: failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: successes,
            cards_resolved,
            mortgages_checked,
            failures,
            average_duration,
        }
    }
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_micros().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let micros = u128::deserialize(deserializer)?;
        Ok(Duration::from_micros(u64::try_from(micros).unwrap_or(0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boardwalk_game::{Board, RulesConfig};

    fn tester() -> LogicTester {
        LogicTester::new(ScenarioContext {
            board: Board::default(),
            rules: RulesConfig::default(),
            verbose: false,
        })
    }

    #[tokio::test]
    async fn runs_one_result_per_seed() {
        let results = tester()
            .run_scenario(Scenario::FallbackIntegrity, &[1, 2, 3], 2)
            .await;
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.passed && r.successful_iterations == 2));
        assert_eq!(results[0].cards_resolved, 4_000);
    }

    #[tokio::test]
    async fn failing_rules_are_reported_per_iteration() {
        let tester = LogicTester::new(ScenarioContext {
            board: Board::default(),
            rules: RulesConfig {
                unmortgage_interest_pct: -200,
                ..RulesConfig::default()
            },
            verbose: false,
        });
        let results = tester.run_scenario(Scenario::MortgageRules, &[5], 3).await;
        assert!(!results[0].passed);
        assert_eq!(results[0].failures.len(), 3);
        assert!(results[0].failures[0].starts_with("Iteration 1 (seed 5)"));
        assert!(results[0].failures[0].contains("below the base value"));
    }

    #[test]
    fn results_serialize_durations_as_micros() {
        let result = ScenarioResult {
            scenario_name: "smoke".to_string(),
            seed: 1,
            passed: true,
            iterations_run: 1,
            successful_iterations: 1,
            cards_resolved: 4,
            mortgages_checked: 0,
            failures: Vec::new(),
            average_duration: Duration::from_millis(2),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["average_duration"], 2_000);
        let back: ScenarioResult = serde_json::from_value(json).unwrap();
        assert_eq!(back.average_duration, Duration::from_millis(2));
    }
}
