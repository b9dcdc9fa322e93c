//! Bloglist E2E Test Suite
//!
//! Rust-controlled end-to-end tests for the Bloglist web app:
//! - Resets and seeds the backend through its test-only HTTP endpoints
//! - Records each scenario as typed browser steps
//! - Renders those steps into one Playwright script per scenario and runs it
//!   with node, one fresh browser context per scenario
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 ScenarioRunner (sequential)                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  FixtureController                                          │
//! │    ├── reset_state()      POST /api/reset-tests/            │
//! │    └── seed_user(user)    POST /api/users/ { data: user }   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Scenario -> Session (steps)                                │
//! │    ├── helpers::login / helpers::create_blog                │
//! │    ├── goto, click, fill, accept_dialogs                    │
//! │    └── expect { locator, expectation, timeout }             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  PlaywrightHandle                                           │
//! │    ├── build_script(session) -> JS                          │
//! │    └── run(session) -> steps | AssertionFailed | Playwright │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod fixture;
pub mod helpers;
pub mod locator;
pub mod model;
pub mod playwright;
pub mod runner;
pub mod scenario;
pub mod step;
pub mod suite;

pub use config::E2eConfig;
pub use error::{E2eError, E2eResult, FailureKind};
pub use fixture::FixtureController;
pub use locator::Locator;
pub use model::{BlogFixture, UserFixture};
pub use playwright::{PlaywrightHandle, Session};
pub use runner::{ScenarioResult, ScenarioRunner, SuiteResult};
pub use scenario::Scenario;
pub use step::{Expectation, Step, Timeout};
