//! Typed Playwright locators
//!
//! Locators are rendered into the `page.getBy*()` / `page.locator()` calls of
//! the generated script. String arguments go through JSON encoding, which is
//! also a valid JavaScript string literal, so user-provided text never needs
//! hand escaping.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How an element is found on the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "by", rename_all = "snake_case")]
pub enum Selector {
    /// ARIA role with an optional accessible name, e.g. `textbox` / `Username`
    Role { role: String, name: Option<String> },
    /// Visible text (substring, case-insensitive)
    Text { text: String },
    /// Input placeholder
    Placeholder { placeholder: String },
    /// Raw CSS
    Css { css: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locator {
    pub selector: Selector,
    /// Narrow to the first match when the selector hits several elements
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub first: bool,
}

impl Locator {
    fn from_selector(selector: Selector) -> Self {
        Self {
            selector,
            first: false,
        }
    }

    /// Any element with the given role
    pub fn role(role: impl Into<String>) -> Self {
        Self::from_selector(Selector::Role {
            role: role.into(),
            name: None,
        })
    }

    /// Element with the given role and accessible name
    pub fn role_named(role: impl Into<String>, name: impl Into<String>) -> Self {
        Self::from_selector(Selector::Role {
            role: role.into(),
            name: Some(name.into()),
        })
    }

    pub fn textbox(name: impl Into<String>) -> Self {
        Self::role_named("textbox", name)
    }

    pub fn button(name: impl Into<String>) -> Self {
        Self::role_named("button", name)
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::from_selector(Selector::Text { text: text.into() })
    }

    pub fn placeholder(placeholder: impl Into<String>) -> Self {
        Self::from_selector(Selector::Placeholder {
            placeholder: placeholder.into(),
        })
    }

    pub fn css(css: impl Into<String>) -> Self {
        Self::from_selector(Selector::Css { css: css.into() })
    }

    /// Shorthand for a `.class` CSS selector
    pub fn class(class: &str) -> Self {
        Self::css(format!(".{}", class))
    }

    pub fn first(mut self) -> Self {
        self.first = true;
        self
    }

    /// Render as a JavaScript expression rooted at `page`
    pub fn to_js(&self) -> String {
        let base = match &self.selector {
            Selector::Role { role, name: Some(name) } => {
                format!("page.getByRole({}, {{ name: {} }})", js_str(role), js_str(name))
            }
            Selector::Role { role, name: None } => format!("page.getByRole({})", js_str(role)),
            Selector::Text { text } => format!("page.getByText({})", js_str(text)),
            Selector::Placeholder { placeholder } => {
                format!("page.getByPlaceholder({})", js_str(placeholder))
            }
            Selector::Css { css } => format!("page.locator({})", js_str(css)),
        };

        if self.first {
            format!("{}.first()", base)
        } else {
            base
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.selector {
            Selector::Role { role, name: Some(name) } => write!(f, "role={}[{}]", role, name)?,
            Selector::Role { role, name: None } => write!(f, "role={}", role)?,
            Selector::Text { text } => write!(f, "text={}", text)?,
            Selector::Placeholder { placeholder } => write!(f, "placeholder={}", placeholder)?,
            Selector::Css { css } => write!(f, "{}", css)?,
        }
        if self.first {
            write!(f, ">>first")?;
        }
        Ok(())
    }
}

/// Quote a string as a JavaScript literal
pub fn js_str(s: &str) -> String {
    serde_json::Value::String(s.to_owned()).to_string()
}
