//! The recorded vocabulary of a browser scenario

use serde::{Deserialize, Serialize};

use crate::config::TimeoutConfig;
use crate::locator::Locator;

/// How long an expectation may wait for the DOM to settle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeout {
    #[default]
    Default,
    /// For checks that sit behind an API round trip
    Extended,
}

impl Timeout {
    pub fn resolve(self, config: &TimeoutConfig) -> u64 {
        match self {
            Timeout::Default => config.default_ms,
            Timeout::Extended => config.extended_ms,
        }
    }
}

/// A condition on a located element set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expectation {
    Visible,
    Hidden,
    ContainsText { text: String },
    HasCount { count: usize },
    /// Matched elements contain these texts, in this order
    TextsInOrder { texts: Vec<String> },
}

/// A single step in a scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Navigate to a path relative to the app URL
    Goto { path: String },

    Click { locator: Locator },

    Fill { locator: Locator, value: String },

    /// Accept every native dialog (confirm/alert) from here on
    AcceptDialogs,

    Expect {
        locator: Locator,
        expectation: Expectation,
        #[serde(default)]
        timeout: Timeout,
    },
}

impl Step {
    /// Short label used in logs and results
    pub fn name(&self) -> String {
        match self {
            Step::Goto { path } => format!("goto:{}", path),
            Step::Click { locator } => format!("click:{}", locator),
            Step::Fill { locator, .. } => format!("fill:{}", locator),
            Step::AcceptDialogs => "accept-dialogs".to_string(),
            Step::Expect { locator, expectation, .. } => {
                let what = match expectation {
                    Expectation::Visible => "visible".to_string(),
                    Expectation::Hidden => "hidden".to_string(),
                    Expectation::ContainsText { text } => format!("contains '{}'", text),
                    Expectation::HasCount { count } => format!("count {}", count),
                    Expectation::TextsInOrder { texts } => format!("in order {:?}", texts),
                };
                format!("expect:{} {}", locator, what)
            }
        }
    }

    pub fn is_expectation(&self) -> bool {
        matches!(self, Step::Expect { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_resolve() {
        let config = TimeoutConfig {
            default_ms: 5000,
            extended_ms: 15000,
            ..Default::default()
        };
        assert_eq!(Timeout::Default.resolve(&config), 5000);
        assert_eq!(Timeout::Extended.resolve(&config), 15000);
    }

    #[test]
    fn test_step_names() {
        let step = Step::Expect {
            locator: Locator::class("blogLikes"),
            expectation: Expectation::ContainsText { text: "6".into() },
            timeout: Timeout::Extended,
        };
        assert_eq!(step.name(), "expect:.blogLikes contains '6'");
        assert!(step.is_expectation());

        let step = Step::Fill {
            locator: Locator::placeholder("Blog Title"),
            value: "Type wars".into(),
        };
        assert_eq!(step.name(), "fill:placeholder=Blog Title");
        assert!(!step.is_expectation());
    }

    #[test]
    fn test_steps_roundtrip_yaml_shape() {
        let yaml = r#"
- action: goto
  path: /
- action: accept_dialogs
- action: expect
  locator:
    selector:
      by: role
      role: button
      name: remove
  expectation:
    kind: has_count
    count: 0
"#;
        let steps: Vec<Step> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(steps.len(), 3);
        assert_eq!(
            steps[2],
            Step::Expect {
                locator: Locator::button("remove"),
                expectation: Expectation::HasCount { count: 0 },
                timeout: Timeout::Default,
            }
        );
    }
}
