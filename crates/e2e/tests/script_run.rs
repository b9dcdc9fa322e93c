//! Runs rendered scripts through `node` against a stand-in `@playwright/test`
//! module, so the JSON report printed by a real script is parsed end to end.
//! Skipped when `node` is not on the PATH.

use std::path::PathBuf;

use serde_json::json;
use tempfile::TempDir;

use bloglist_e2e::playwright::PlaywrightConfig;
use bloglist_e2e::{suite, E2eConfig, E2eError, FailureKind, Locator, PlaywrightHandle, Session};

/// Minimal browser/page/expect surface used by the rendered scripts.
/// Behaviour comes from `stub.json` in the node dir.
const STUB_MODULE: &str = r#"
const fs = require('fs');
const path = require('path');

const settings = JSON.parse(
  fs.readFileSync(path.join(__dirname, '..', '..', '..', 'stub.json'), 'utf8')
);

function makeLocator(desc) {
  return {
    desc,
    first() { return makeLocator(desc + '>>first'); },
    async click() {},
    async fill() {},
  };
}

const page = {
  setDefaultTimeout() {},
  on() {},
  async goto() {},
  async screenshot(opts) { fs.writeFileSync(opts.path, 'png'); },
  getByRole(role, opts) {
    return makeLocator('role=' + role + (opts && opts.name ? '[' + opts.name + ']' : ''));
  },
  getByText(text) { return makeLocator('text=' + text); },
  getByPlaceholder(placeholder) { return makeLocator('placeholder=' + placeholder); },
  locator(css) { return makeLocator(css); },
};

const browserType = {
  async launch() {
    if (settings.launchFails) {
      throw new Error("browserType.launch: Executable doesn't exist at /ms-playwright/chromium");
    }
    return {
      async newContext() { return { async newPage() { return page; } }; },
      async close() {},
    };
  },
};

function expect(target) {
  const matcher = (name) => async () => {
    if ((settings.hidden || []).includes(target.desc)) {
      const error = new Error(
        'Timed out 5000ms waiting for expect(locator).' + name + '()\n\n' +
        'Locator: ' + target.desc + '\nExpected: visible\nReceived: hidden'
      );
      error.matcherResult = { expected: 'visible', actual: 'hidden' };
      throw error;
    }
  };
  return {
    toBeVisible: matcher('toBeVisible'),
    toBeHidden: matcher('toBeHidden'),
    toContainText: matcher('toContainText'),
    toHaveCount: matcher('toHaveCount'),
  };
}

module.exports = { chromium: browserType, firefox: browserType, webkit: browserType, expect };
"#;

fn node_available() -> bool {
    std::process::Command::new("node")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

struct StubNode {
    dir: TempDir,
}

impl StubNode {
    fn new(settings: serde_json::Value) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let module = dir.path().join("node_modules/@playwright/test");
        std::fs::create_dir_all(&module).unwrap();
        std::fs::write(
            module.join("package.json"),
            r#"{ "name": "@playwright/test", "main": "index.js" }"#,
        )
        .unwrap();
        std::fs::write(module.join("index.js"), STUB_MODULE).unwrap();
        std::fs::write(dir.path().join("stub.json"), settings.to_string()).unwrap();
        Self { dir }
    }

    fn config(&self) -> E2eConfig {
        E2eConfig {
            node_dir: self.dir.path().to_path_buf(),
            output_dir: self.dir.path().join("out"),
            ..Default::default()
        }
    }

    fn handle(&self) -> PlaywrightHandle {
        PlaywrightHandle::new(PlaywrightConfig::from(&self.config()))
    }

    fn screenshot_dir(&self) -> PathBuf {
        self.config().screenshot_dir()
    }
}

fn title_session() -> Session {
    let mut session = Session::new("Title is shown");
    session
        .goto("/")
        .fill(Locator::textbox("Username"), "mluukkai")
        .expect_visible(Locator::text("Blog"));
    session
}

#[tokio::test]
async fn passing_script_reports_step_count() {
    if !node_available() {
        eprintln!("node not found, skipping");
        return;
    }
    let stub = StubNode::new(json!({}));
    let handle = stub.handle();

    handle.check_installed().await.unwrap();
    assert_eq!(handle.run(&title_session()).await.unwrap(), 3);
}

#[tokio::test]
async fn failed_expectation_reports_expected_and_actual() {
    if !node_available() {
        eprintln!("node not found, skipping");
        return;
    }
    let stub = StubNode::new(json!({ "hidden": ["text=Blog"] }));
    let handle = stub.handle();
    let session = title_session();

    let err = handle.run(&session).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::Assertion);
    match err {
        E2eError::AssertionFailed {
            step,
            expected,
            actual,
            message,
        } => {
            assert_eq!(step, "expect:text=Blog visible");
            assert_eq!(expected.as_deref(), Some("visible"));
            assert_eq!(actual.as_deref(), Some("hidden"));
            assert!(message.starts_with("Timed out 5000ms"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(handle.screenshot_path(&session).exists());
}

#[tokio::test]
async fn launch_failure_still_prints_a_report() {
    if !node_available() {
        eprintln!("node not found, skipping");
        return;
    }
    let stub = StubNode::new(json!({ "launchFails": true }));
    let handle = stub.handle();
    let session = title_session();

    // Left over from an earlier failing run of the same scenario
    std::fs::create_dir_all(stub.screenshot_dir()).unwrap();
    std::fs::write(handle.screenshot_path(&session), "stale").unwrap();

    let err = handle.run(&session).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::Harness);
    match err {
        E2eError::Playwright(message) => {
            assert!(
                message.starts_with("browserType.launch: Executable doesn't exist"),
                "{message}"
            );
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!handle.screenshot_path(&session).exists());
}

#[tokio::test]
async fn every_suite_scenario_runs_to_completion() {
    if !node_available() {
        eprintln!("node not found, skipping");
        return;
    }
    let stub = StubNode::new(json!({}));
    let handle = stub.handle();

    for scenario in suite::scenarios() {
        let session = scenario.session();
        let executed = handle.run(&session).await.unwrap();
        assert_eq!(executed, session.steps().len(), "{}", scenario.name);
    }
}
