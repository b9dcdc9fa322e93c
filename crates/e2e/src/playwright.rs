//! Playwright browser automation
//!
//! A [`Session`] records the steps of one scenario. [`PlaywrightHandle`]
//! renders them into a single Node.js script (one browser, one context, one
//! page), runs it, and turns the JSON line the script prints into either a
//! step count or an [`E2eError`].

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::{Browser, E2eConfig, TimeoutConfig, Viewport};
use crate::error::{E2eError, E2eResult};
use crate::locator::{js_str, Locator};
use crate::step::{Expectation, Step, Timeout};

/// Steps of one scenario, replayed in order inside a single browser page
#[derive(Debug, Clone, Default)]
pub struct Session {
    name: String,
    steps: Vec<Step>,
}

impl Session {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn push(&mut self, step: Step) -> &mut Self {
        self.steps.push(step);
        self
    }

    pub fn goto(&mut self, path: impl Into<String>) -> &mut Self {
        self.push(Step::Goto { path: path.into() })
    }

    pub fn click(&mut self, locator: Locator) -> &mut Self {
        self.push(Step::Click { locator })
    }

    pub fn fill(&mut self, locator: Locator, value: impl Into<String>) -> &mut Self {
        self.push(Step::Fill {
            locator,
            value: value.into(),
        })
    }

    pub fn accept_dialogs(&mut self) -> &mut Self {
        self.push(Step::AcceptDialogs)
    }

    pub fn expect(&mut self, locator: Locator, expectation: Expectation) -> &mut Self {
        self.expect_within(locator, expectation, Timeout::Default)
    }

    pub fn expect_within(
        &mut self,
        locator: Locator,
        expectation: Expectation,
        timeout: Timeout,
    ) -> &mut Self {
        self.push(Step::Expect {
            locator,
            expectation,
            timeout,
        })
    }

    pub fn expect_visible(&mut self, locator: Locator) -> &mut Self {
        self.expect(locator, Expectation::Visible)
    }

    pub fn expect_hidden(&mut self, locator: Locator) -> &mut Self {
        self.expect(locator, Expectation::Hidden)
    }

    pub fn expect_text(&mut self, locator: Locator, text: impl Into<String>) -> &mut Self {
        self.expect(locator, Expectation::ContainsText { text: text.into() })
    }

    pub fn expect_count(&mut self, locator: Locator, count: usize) -> &mut Self {
        self.expect(locator, Expectation::HasCount { count })
    }
}

/// Configuration for Playwright
#[derive(Debug, Clone)]
pub struct PlaywrightConfig {
    pub base_url: String,
    pub browser: Browser,
    pub headless: bool,
    pub viewport: Viewport,
    pub timeouts: TimeoutConfig,
    pub node_dir: PathBuf,
    pub screenshot_dir: PathBuf,
}

impl From<&E2eConfig> for PlaywrightConfig {
    fn from(config: &E2eConfig) -> Self {
        Self {
            base_url: config.app_base().to_string(),
            browser: config.browser,
            headless: config.headless,
            viewport: config.viewport,
            timeouts: config.timeouts.clone(),
            node_dir: config.node_dir.clone(),
            screenshot_dir: config.screenshot_dir(),
        }
    }
}

/// The JSON line a rendered script prints when it finishes
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptReport {
    pub success: bool,
    #[serde(default)]
    pub steps: Option<usize>,
    #[serde(default)]
    pub step: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub expected: Option<String>,
    #[serde(default)]
    pub actual: Option<String>,
}

/// Playwright browser handle
pub struct PlaywrightHandle {
    config: PlaywrightConfig,
}

impl PlaywrightHandle {
    pub fn new(config: PlaywrightConfig) -> Self {
        Self { config }
    }

    fn node_path(&self) -> PathBuf {
        self.config.node_dir.join("node_modules")
    }

    /// Check that node can resolve `@playwright/test`
    pub async fn check_installed(&self) -> E2eResult<()> {
        let status = Command::new("node")
            .args(["-e", "require.resolve('@playwright/test')"])
            .env("NODE_PATH", self.node_path())
            .current_dir(&self.config.node_dir)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        match status {
            Ok(status) if status.success() => Ok(()),
            _ => Err(E2eError::PlaywrightNotFound),
        }
    }

    /// Where the failure screenshot of a session lands
    pub fn screenshot_path(&self, session: &Session) -> PathBuf {
        self.config
            .screenshot_dir
            .join(format!("{}.png", slug(session.name())))
    }

    /// Build the Playwright script for a session
    pub fn build_script(&self, session: &Session) -> String {
        let mut script = String::new();

        script.push_str(&format!(
            r#"// Scenario: {scenario}
const {{ chromium, firefox, webkit, expect }} = require('@playwright/test');

(async () => {{
  let browser;
  let page;
  let step = -1;

  try {{
    browser = await {browser}.launch({{ headless: {headless} }});
    const context = await browser.newContext({{
      viewport: {{ width: {width}, height: {height} }}
    }});
    page = await context.newPage();
    page.setDefaultTimeout({default_timeout});
"#,
            scenario = session.name().replace('\n', " "),
            browser = self.config.browser.as_str(),
            headless = self.config.headless,
            width = self.config.viewport.width,
            height = self.config.viewport.height,
            default_timeout = self.config.timeouts.default_ms,
        ));

        for (i, step) in session.steps().iter().enumerate() {
            script.push_str(&format!(
                "\n    // Step {}: {}\n    step = {};\n",
                i + 1,
                step.name().replace('\n', " "),
                i
            ));
            script.push_str(&self.step_to_js(step));
            script.push('\n');
        }

        script.push_str(&format!(
            r#"
    console.log(JSON.stringify({{ success: true, steps: {count} }}));
  }} catch (error) {{
    if (page) {{
      await page.screenshot({{ path: {screenshot}, fullPage: true }}).catch(() => {{}});
    }}
    const matcher = error.matcherResult || {{}};
    const text = (v) => v === undefined || v === null ? null : (typeof v === 'string' ? v : JSON.stringify(v));
    console.error(JSON.stringify({{
      success: false,
      step,
      name: error.name,
      error: error.message,
      expected: text(matcher.expected),
      actual: text(matcher.actual),
    }}));
    process.exitCode = 1;
  }} finally {{
    if (browser) {{
      await browser.close();
    }}
  }}
}})();
"#,
            count = session.steps().len(),
            screenshot = js_str(&self.screenshot_path(session).to_string_lossy()),
        ));

        script
    }

    /// Convert a step to JavaScript code
    fn step_to_js(&self, step: &Step) -> String {
        match step {
            Step::Goto { path } => {
                let url = format!("{}{}", self.config.base_url, path);
                format!("    await page.goto({});", js_str(&url))
            }
            Step::Click { locator } => format!("    await {}.click();", locator.to_js()),
            Step::Fill { locator, value } => {
                format!("    await {}.fill({});", locator.to_js(), js_str(value))
            }
            Step::AcceptDialogs => {
                "    page.on('dialog', dialog => dialog.accept());".to_string()
            }
            Step::Expect {
                locator,
                expectation,
                timeout,
            } => {
                let timeout = timeout.resolve(&self.config.timeouts);
                let matcher = match expectation {
                    Expectation::Visible => format!("toBeVisible({{ timeout: {} }})", timeout),
                    Expectation::Hidden => format!("toBeHidden({{ timeout: {} }})", timeout),
                    Expectation::ContainsText { text } => {
                        format!("toContainText({}, {{ timeout: {} }})", js_str(text), timeout)
                    }
                    Expectation::HasCount { count } => {
                        format!("toHaveCount({}, {{ timeout: {} }})", count, timeout)
                    }
                    Expectation::TextsInOrder { texts } => {
                        let list: Vec<String> = texts.iter().map(|t| js_str(t)).collect();
                        format!(
                            "toContainText([{}], {{ timeout: {} }})",
                            list.join(", "),
                            timeout
                        )
                    }
                };
                format!("    await expect({}).{};", locator.to_js(), matcher)
            }
        }
    }

    /// Write the rendered script to `dir` without running it
    pub fn emit_script(&self, session: &Session, dir: &Path) -> E2eResult<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.js", slug(session.name())));
        std::fs::write(&path, self.build_script(session))?;
        info!("Wrote {}", path.display());
        Ok(path)
    }

    /// Run a whole session in one browser. Returns the number of steps executed.
    pub async fn run(&self, session: &Session) -> E2eResult<usize> {
        std::fs::create_dir_all(&self.config.screenshot_dir)?;
        self.clear_screenshot(session)?;

        let temp_dir = tempfile::tempdir()?;
        let script_path = temp_dir.path().join(format!("{}.js", slug(session.name())));
        std::fs::write(&script_path, self.build_script(session))?;

        debug!("Running Playwright script: {}", script_path.display());

        let child = Command::new("node")
            .arg(&script_path)
            .env("NODE_PATH", self.node_path())
            .current_dir(&self.config.node_dir)
            .kill_on_drop(true)
            .output();

        let budget = self.run_budget(session);
        let output = match tokio::time::timeout(budget, child).await {
            Ok(output) => output?,
            Err(_) => {
                return Err(E2eError::Playwright(format!(
                    "script for '{}' did not finish within {:?}",
                    session.name(),
                    budget
                )))
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        match parse_report(&stdout, &stderr) {
            Some(report) => interpret_report(report, session),
            None if output.status.success() => Err(E2eError::Playwright(format!(
                "script exited without a report:\nstdout: {}",
                stdout
            ))),
            None => Err(E2eError::Playwright(format!(
                "Script failed:\nstdout: {}\nstderr: {}",
                stdout, stderr
            ))),
        }
    }

    /// Drop a screenshot left behind by an earlier run of the same scenario
    fn clear_screenshot(&self, session: &Session) -> E2eResult<()> {
        match std::fs::remove_file(self.screenshot_path(session)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Upper bound for a whole script: every step could wait its full timeout
    fn run_budget(&self, session: &Session) -> Duration {
        let per_step = self.config.timeouts.extended_ms;
        let steps = session.steps().len() as u64 + 1;
        Duration::from_millis(steps * per_step + 60_000)
    }
}

/// Find the report line, preferring the last JSON object on stderr
pub fn parse_report(stdout: &str, stderr: &str) -> Option<ScriptReport> {
    stderr
        .lines()
        .rev()
        .chain(stdout.lines().rev())
        .map(str::trim)
        .filter(|line| line.starts_with('{') && line.contains("\"success\""))
        .find_map(|line| serde_json::from_str(line).ok())
}

/// Map a script report onto the session it was rendered from
pub fn interpret_report(report: ScriptReport, session: &Session) -> E2eResult<usize> {
    if report.success {
        return Ok(report.steps.unwrap_or(session.steps().len()));
    }

    let message = report
        .error
        .as_deref()
        .map(strip_ansi)
        .unwrap_or_else(|| "unknown error".to_string());

    let step = report
        .step
        .and_then(|i| usize::try_from(i).ok())
        .and_then(|i| session.steps().get(i));

    let step = match step {
        Some(step) => step,
        None => return Err(E2eError::Playwright(message)),
    };

    let timed_out = report.name.as_deref() == Some("TimeoutError")
        || message.contains("Timeout")
        || message.contains("timed out");

    if step.is_expectation() || timed_out {
        let (parsed_expected, parsed_actual) = expected_and_received(&message);
        return Err(E2eError::AssertionFailed {
            step: step.name(),
            expected: report.expected.or(parsed_expected),
            actual: report.actual.or(parsed_actual),
            message: first_line(&message),
        });
    }

    Err(E2eError::Playwright(format!("{}: {}", step.name(), message)))
}

fn ansi_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\x1b\[[0-9;]*m").expect("valid regex"))
}

fn expected_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*Expected(?: string| substring| pattern| value)?:\s*(.+?)\s*$")
            .expect("valid regex")
    })
}

fn received_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*Received(?: string| value)?:\s*(.+?)\s*$").expect("valid regex")
    })
}

fn strip_ansi(s: &str) -> String {
    ansi_regex().replace_all(s, "").into_owned()
}

/// Pull `Expected:` / `Received:` lines out of a Playwright assertion message
pub fn expected_and_received(message: &str) -> (Option<String>, Option<String>) {
    let capture = |re: &Regex| {
        re.captures(message)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    };
    (capture(expected_regex()), capture(received_regex()))
}

fn first_line(message: &str) -> String {
    message.lines().next().unwrap_or_default().trim().to_string()
}

/// File-system friendly form of a scenario name
pub fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    out.trim_matches('-').to_string()
}
