//! Fixture controller: resets and seeds the backend over HTTP
//!
//! Every scenario starts with [`FixtureController::reset_state`] followed by
//! one [`FixtureController::seed_user`] per account it logs in with. Neither
//! call is retried; a failure here is an environment problem, not a failing
//! assertion, and surfaces as a setup error.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::error::{E2eError, E2eResult};
use crate::model::UserFixture;

pub const RESET_PATH: &str = "/api/reset-tests/";
pub const USERS_PATH: &str = "/api/users/";

#[derive(Serialize)]
struct SeedUserRequest<'a> {
    data: &'a UserFixture,
}

pub struct FixtureController {
    client: reqwest::Client,
    api_base: String,
    request_timeout: Duration,
    /// Usernames created since the last successful reset
    seeded: HashSet<String>,
}

impl FixtureController {
    pub fn new(api_base: impl Into<String>, request_timeout: Duration) -> E2eResult<Self> {
        let client = reqwest::Client::builder().timeout(request_timeout).build()?;
        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            request_timeout,
            seeded: HashSet::new(),
        })
    }

    /// Wipe users, blogs and sessions on the backend
    pub async fn reset_state(&mut self) -> E2eResult<()> {
        let url = format!("{}{}", self.api_base, RESET_PATH);
        debug!("POST {}", url);

        let resp = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(|e| E2eError::setup(format!("POST {}", RESET_PATH), e.to_string()))?;

        if !resp.status().is_success() {
            return Err(E2eError::setup(
                format!("POST {}", RESET_PATH),
                format!("status {}", resp.status()),
            ));
        }

        self.seeded.clear();
        Ok(())
    }

    /// Create one account. Must follow a reset; usernames are unique until the next one.
    pub async fn seed_user(&mut self, user: &UserFixture) -> E2eResult<()> {
        if self.seeded.contains(&user.username) {
            return Err(E2eError::DuplicateUsername(user.username.clone()));
        }

        let url = format!("{}{}", self.api_base, USERS_PATH);
        debug!("POST {} ({})", url, user.username);

        let resp = self
            .client
            .post(&url)
            .json(&SeedUserRequest { data: user })
            .send()
            .await
            .map_err(|e| E2eError::setup(format!("POST {}", USERS_PATH), e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(E2eError::setup(
                format!("POST {} ({})", USERS_PATH, user.username),
                format!("status {} {}", status, body.trim()),
            ));
        }

        self.seeded.insert(user.username.clone());
        Ok(())
    }

    /// Reset, then seed each user in order
    pub async fn prepare(&mut self, users: &[UserFixture]) -> E2eResult<()> {
        self.reset_state().await?;
        for user in users {
            self.seed_user(user).await?;
        }
        Ok(())
    }

    /// Wait until `url` answers HTTP at all; any status counts as up
    pub async fn wait_until_ready(&self, url: &str, timeout_duration: Duration) -> E2eResult<()> {
        let start = Instant::now();
        let mut attempts = 0;

        loop {
            attempts += 1;

            // A hung connection must not outlast the overall budget
            let remaining = timeout_duration.saturating_sub(start.elapsed());
            let attempt_timeout = remaining
                .min(self.request_timeout)
                .max(Duration::from_millis(50));

            match self.client.get(url).timeout(attempt_timeout).send().await {
                Ok(resp) => {
                    debug!("{} answered {}", url, resp.status());
                    return Ok(());
                }
                Err(e) => {
                    if attempts == 1 {
                        info!("Waiting for {} ...", url);
                    }
                    // Connection refused is expected while the app is starting
                    if !e.is_connect() {
                        warn!("Readiness probe error: {}", e);
                    }
                }
            }

            if start.elapsed() >= timeout_duration {
                return Err(E2eError::AppUnreachable {
                    url: url.to_string(),
                    attempts,
                });
            }
            sleep(Duration::from_millis(250)).await;
        }
    }
}
