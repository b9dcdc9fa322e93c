//! Fixture data seeded into, or typed into, the app under test

use serde::{Deserialize, Serialize};

/// An account created through the API before a scenario starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFixture {
    pub name: String,
    pub username: String,
    pub password: String,
}

impl UserFixture {
    pub fn new(
        name: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Greeting the app renders once this user is authenticated
    pub fn greeting(&self) -> String {
        format!("{} logged in", self.name)
    }
}

/// A blog entered through the new-blog form. Never created via the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogFixture {
    pub title: String,
    pub author: String,
    pub url: String,
    pub likes: u32,
}

impl BlogFixture {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        url: impl Into<String>,
        likes: u32,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            url: url.into(),
            likes,
        }
    }
}

/// Titles ordered the way the app is expected to list them: most liked first.
pub fn titles_by_likes_desc(blogs: &[BlogFixture]) -> Vec<String> {
    let mut sorted: Vec<&BlogFixture> = blogs.iter().collect();
    sorted.sort_by(|a, b| b.likes.cmp(&a.likes));
    sorted.into_iter().map(|b| b.title.clone()).collect()
}
