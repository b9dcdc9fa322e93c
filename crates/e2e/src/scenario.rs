//! A named, self-contained browser scenario

use std::fmt;

use crate::model::UserFixture;
use crate::playwright::Session;

type Script = Box<dyn Fn(&mut Session) + Send + Sync>;

/// One independent test: the users to seed after the reset, and the browser
/// steps to replay from the app root.
pub struct Scenario {
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub users: Vec<UserFixture>,
    script: Script,
}

impl Scenario {
    pub fn new<F>(name: impl Into<String>, script: F) -> Self
    where
        F: Fn(&mut Session) + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: String::new(),
            tags: Vec::new(),
            users: Vec::new(),
            script: Box::new(script),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Seed this user after the reset
    pub fn user(mut self, user: UserFixture) -> Self {
        self.users.push(user);
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Record the browser steps, starting from the app root
    pub fn session(&self) -> Session {
        let mut session = Session::new(self.name.clone());
        session.goto("/");
        (self.script)(&mut session);
        session
    }
}

impl fmt::Debug for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scenario")
            .field("name", &self.name)
            .field("tags", &self.tags)
            .field("users", &self.users)
            .finish_non_exhaustive()
    }
}

/// Filter scenarios by tag
pub fn filter_by_tag<'a>(scenarios: &'a [Scenario], tag: &str) -> Vec<&'a Scenario> {
    scenarios.iter().filter(|s| s.has_tag(tag)).collect()
}
