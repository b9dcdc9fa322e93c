//! Main test runner that orchestrates fixtures and Playwright

use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::config::E2eConfig;
use crate::error::{E2eError, E2eResult, FailureKind};
use crate::fixture::FixtureController;
use crate::playwright::{PlaywrightConfig, PlaywrightHandle};
use crate::scenario::Scenario;

/// Result of running a single scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<FailureKind>,
    pub duration_ms: u64,
    /// Names of the recorded steps, in order
    pub steps: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_step: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,
}

impl ScenarioResult {
    fn passed(scenario: &Scenario, steps: Vec<String>, duration_ms: u64) -> Self {
        Self {
            name: scenario.name.clone(),
            description: scenario.description.clone(),
            success: true,
            kind: None,
            duration_ms,
            steps,
            failed_step: None,
            error: None,
            expected: None,
            actual: None,
            screenshot: None,
        }
    }

    fn failed(scenario: &Scenario, steps: Vec<String>, duration_ms: u64, err: &E2eError) -> Self {
        let mut result = Self::passed(scenario, steps, duration_ms);
        result.success = false;
        result.kind = Some(err.kind());
        result.error = Some(err.to_string());
        if let E2eError::AssertionFailed {
            step,
            expected,
            actual,
            ..
        } = err
        {
            result.failed_step = Some(step.clone());
            result.expected = expected.clone();
            result.actual = actual.clone();
        }
        result
    }
}

/// Result of running all scenarios
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteResult {
    pub started_at: DateTime<Utc>,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// Failures caused by the environment rather than the app
    pub setup_failures: usize,
    pub duration_ms: u64,
    pub results: Vec<ScenarioResult>,
}

impl SuiteResult {
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// Runs scenarios one after another against a single backend
pub struct ScenarioRunner {
    config: E2eConfig,
    fixtures: FixtureController,
    playwright: PlaywrightHandle,
    playwright_checked: bool,
}

impl ScenarioRunner {
    pub fn new(config: E2eConfig) -> E2eResult<Self> {
        config.validate()?;
        let fixtures = FixtureController::new(
            config.api_base(),
            Duration::from_millis(config.timeouts.request_ms),
        )?;
        let playwright = PlaywrightHandle::new(PlaywrightConfig::from(&config));
        Ok(Self {
            config,
            fixtures,
            playwright,
            playwright_checked: false,
        })
    }

    /// Wait up to the configured startup timeout for the front-end and the API
    pub async fn wait_for_app(&self) -> E2eResult<()> {
        self.wait_for_app_within(Duration::from_millis(self.config.timeouts.startup_ms))
            .await
    }

    pub async fn wait_for_app_within(&self, startup: Duration) -> E2eResult<()> {
        let app = format!("{}/", self.config.app_base());
        let api = format!("{}/", self.config.api_base());
        self.fixtures.wait_until_ready(&app, startup).await?;
        self.fixtures.wait_until_ready(&api, startup).await?;
        info!("App is up at {} (API {})", self.config.app_base(), self.config.api_base());
        Ok(())
    }

    /// Write the rendered script of every scenario without running anything
    pub fn emit_scripts(&self, scenarios: &[&Scenario]) -> E2eResult<Vec<PathBuf>> {
        let dir = self.config.script_dir();
        scenarios
            .iter()
            .map(|scenario| self.playwright.emit_script(&scenario.session(), &dir))
            .collect()
    }

    /// Run a list of scenarios
    pub async fn run_all(&mut self, scenarios: &[&Scenario]) -> SuiteResult {
        let started_at = Utc::now();
        let start = Instant::now();
        let mut results = Vec::with_capacity(scenarios.len());

        info!("Running {} scenario(s)...", scenarios.len());

        for scenario in scenarios {
            let result = self.run_scenario(scenario).await;
            if result.success {
                info!("✓ {} ({} ms)", result.name, result.duration_ms);
            } else {
                error!(
                    "✗ {} [{:?}] - {}",
                    result.name,
                    result.kind.unwrap_or(FailureKind::Harness),
                    result.error.as_deref().unwrap_or("unknown error")
                );
                if let (Some(expected), Some(actual)) = (&result.expected, &result.actual) {
                    error!("    expected: {}", expected);
                    error!("    actual:   {}", actual);
                }
            }
            results.push(result);
        }

        let passed = results.iter().filter(|r| r.success).count();
        let setup_failures = results
            .iter()
            .filter(|r| r.kind == Some(FailureKind::Setup))
            .count();
        let duration_ms = start.elapsed().as_millis() as u64;

        info!(
            "Results: {} passed, {} failed ({} setup) in {} ms",
            passed,
            results.len() - passed,
            setup_failures,
            duration_ms
        );

        SuiteResult {
            started_at,
            total: results.len(),
            passed,
            failed: results.len() - passed,
            setup_failures,
            duration_ms,
            results,
        }
    }

    /// Reset, seed, then replay the scenario in a fresh browser
    pub async fn run_scenario(&mut self, scenario: &Scenario) -> ScenarioResult {
        let start = Instant::now();
        let session = scenario.session();
        let steps: Vec<String> = session.steps().iter().map(|s| s.name()).collect();
        debug!("Running scenario: {} ({} steps)", scenario.name, steps.len());

        if let Err(e) = self.fixtures.prepare(&scenario.users).await {
            return ScenarioResult::failed(scenario, steps, elapsed_ms(start), &e);
        }

        if !self.playwright_checked {
            if let Err(e) = self.playwright.check_installed().await {
                return ScenarioResult::failed(scenario, steps, elapsed_ms(start), &e);
            }
            self.playwright_checked = true;
        }

        match self.playwright.run(&session).await {
            Ok(executed) => {
                debug!("{}: {} steps executed", scenario.name, executed);
                ScenarioResult::passed(scenario, steps, elapsed_ms(start))
            }
            Err(e) => {
                let mut result = ScenarioResult::failed(scenario, steps, elapsed_ms(start), &e);
                // Cleared at the start of every run, so this belongs to this failure
                let screenshot = self.playwright.screenshot_path(&session);
                if screenshot.exists() {
                    result.screenshot = Some(screenshot.to_string_lossy().to_string());
                }
                result
            }
        }
    }

    /// Write results to a JSON file
    pub fn write_results(&self, results: &SuiteResult) -> E2eResult<PathBuf> {
        std::fs::create_dir_all(&self.config.output_dir)?;

        let path = self.config.output_dir.join("test-results.json");
        let json = serde_json::to_string_pretty(results)?;
        std::fs::write(&path, json)?;

        info!("Results written to: {}", path.display());
        Ok(path)
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}
