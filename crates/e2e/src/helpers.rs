//! Interaction helpers shared by every scenario
//!
//! Both helpers only perform the mechanical UI steps. Neither asserts the
//! outcome: a rejected login and a slow blog save are both valid states the
//! caller has to wait for itself.

use crate::locator::Locator;
use crate::model::BlogFixture;
use crate::playwright::Session;

pub fn username_input() -> Locator {
    Locator::textbox("Username")
}

pub fn password_input() -> Locator {
    Locator::textbox("Password")
}

/// The new-blog affordance shown to authenticated users
pub fn new_blog_button() -> Locator {
    Locator::class("new-blog")
}

/// Fill the login form and submit it
pub fn login(session: &mut Session, username: &str, password: &str) {
    session
        .fill(username_input(), username)
        .fill(password_input(), password)
        // The unauthenticated view only has the one button
        .click(Locator::role("button"));
}

/// Open the blog form, fill all four fields and submit
pub fn create_blog(session: &mut Session, blog: &BlogFixture) {
    session
        .click(new_blog_button())
        .fill(Locator::placeholder("Blog Title"), blog.title.as_str())
        .fill(Locator::placeholder("Blog Author"), blog.author.as_str())
        .fill(Locator::placeholder("Blog URL"), blog.url.as_str())
        .fill(Locator::placeholder("Blog Likes"), blog.likes.to_string())
        .click(Locator::class("newBlogSubmit"));
}
