//! The Bloglist scenarios

use crate::helpers::{create_blog, login, new_blog_button, password_input, username_input};
use crate::locator::Locator;
use crate::model::{titles_by_likes_desc, BlogFixture, UserFixture};
use crate::playwright::Session;
use crate::scenario::Scenario;
use crate::step::{Expectation, Timeout};

pub const LOGIN_ERROR: &str = "Username or Password is incorrect";

pub fn owner() -> UserFixture {
    UserFixture::new("Matti Luukkainen", "mluukkai", "salainen")
}

pub fn other_user() -> UserFixture {
    UserFixture::new("Arto Hellas", "hellas", "sekret")
}

pub fn sample_blog() -> BlogFixture {
    BlogFixture::new(
        "Canonical string reduction",
        "Edsger W. Dijkstra",
        "http://www.cs.utexas.edu/~EWD/transcriptions/EWD08xx/EWD808.html",
        5,
    )
}

/// Blogs with distinct likes, deliberately entered out of order
pub fn ranked_blogs() -> Vec<BlogFixture> {
    vec![
        BlogFixture::new(
            "First class tests",
            "Robert C. Martin",
            "http://blog.cleancoder.com/first",
            3,
        ),
        BlogFixture::new(
            "Type wars",
            "Robert C. Martin",
            "http://blog.cleancoder.com/types",
            12,
        ),
        BlogFixture::new(
            "React patterns",
            "Michael Chan",
            "https://reactpatterns.com/",
            7,
        ),
    ]
}

/// Log in and wait until the greeting shows up
fn login_as(session: &mut Session, user: &UserFixture) {
    login(session, &user.username, &user.password);
    session.expect_within(
        Locator::text(user.greeting()),
        Expectation::Visible,
        Timeout::Extended,
    );
}

/// Submit a blog and wait until the list holds `listed` entries
fn publish(session: &mut Session, blog: &BlogFixture, listed: usize) {
    create_blog(session, blog);
    session.expect_within(
        Locator::button("show"),
        Expectation::HasCount { count: listed },
        Timeout::Extended,
    );
}

/// Every scenario of the suite
pub fn scenarios() -> Vec<Scenario> {
    vec![
        login_form_is_shown(),
        login_succeeds(),
        login_fails(),
        blog_can_be_created(),
        blog_can_be_liked(),
        owner_can_remove_blog(),
        only_owner_sees_remove(),
        blogs_ordered_by_likes(),
    ]
}

pub fn login_form_is_shown() -> Scenario {
    Scenario::new("Login form is shown", |s| {
        s.expect_visible(Locator::text("Blog"))
            .expect_visible(username_input())
            .expect_visible(password_input());
    })
    .description("An anonymous visitor sees the title and the login form")
    .tag("login")
    .tag("smoke")
}

pub fn login_succeeds() -> Scenario {
    let user = owner();
    Scenario::new("Login succeeds with correct credentials", {
        let user = user.clone();
        move |s: &mut Session| {
            login_as(s, &user);
            s.expect_visible(new_blog_button())
                .expect_hidden(username_input())
                .expect_hidden(password_input());
        }
    })
    .description("The greeting and the new-blog affordance replace the login form")
    .tag("login")
    .user(user)
}

pub fn login_fails() -> Scenario {
    let user = owner();
    Scenario::new("Login fails with wrong credentials", {
        let user = user.clone();
        move |s: &mut Session| {
            login(s, &user.username, "wrong");
            s.expect_within(Locator::text(LOGIN_ERROR), Expectation::Visible, Timeout::Extended)
                .expect_visible(username_input())
                .expect_visible(password_input())
                .expect_count(Locator::text(user.greeting()), 0);
        }
    })
    .description("A rejected login shows the error and keeps the form")
    .tag("login")
    .user(user)
}

pub fn blog_can_be_created() -> Scenario {
    let user = owner();
    Scenario::new("A logged-in user can create a blog", {
        let user = user.clone();
        move |s: &mut Session| {
            let blog = sample_blog();
            login_as(s, &user);
            create_blog(s, &blog);
            s.expect_within(Locator::button("show"), Expectation::Visible, Timeout::Extended)
                .expect_text(Locator::class("blogTitle"), blog.title.as_str());
        }
    })
    .description("The submitted blog is listed with its title and a show control")
    .tag("blogs")
    .user(user)
}

pub fn blog_can_be_liked() -> Scenario {
    let user = owner();
    Scenario::new("A blog can be liked", {
        let user = user.clone();
        move |s: &mut Session| {
            let blog = sample_blog();
            login_as(s, &user);
            publish(s, &blog, 1);
            s.click(Locator::button("show"))
                .expect_text(Locator::class("blogLikes"), blog.likes.to_string())
                .click(Locator::button("like"))
                .expect_within(
                    Locator::class("blogLikes"),
                    Expectation::ContainsText {
                        text: (blog.likes + 1).to_string(),
                    },
                    Timeout::Extended,
                );
        }
    })
    .description("Clicking like bumps the shown count by exactly one")
    .tag("blogs")
    .user(user)
}

pub fn owner_can_remove_blog() -> Scenario {
    let user = owner();
    Scenario::new("The owner can remove a blog", {
        let user = user.clone();
        move |s: &mut Session| {
            let blog = sample_blog();
            s.accept_dialogs();
            login_as(s, &user);
            publish(s, &blog, 1);
            s.click(Locator::button("show"))
                .expect_visible(Locator::button("remove"))
                .click(Locator::button("remove"))
                .expect_within(
                    Locator::class("blogContainer"),
                    Expectation::HasCount { count: 0 },
                    Timeout::Extended,
                )
                .expect_count(Locator::class("blogTitle"), 0)
                .expect_count(Locator::text(blog.url.as_str()), 0)
                .expect_count(Locator::button("show"), 0)
                .expect_count(Locator::button("hide"), 0);
        }
    })
    .description("Accepting the confirmation removes the blog from the list")
    .tag("blogs")
    .user(user)
}

pub fn only_owner_sees_remove() -> Scenario {
    let creator = owner();
    let visitor = other_user();
    Scenario::new("Only the owner sees the remove button", {
        let creator = creator.clone();
        let visitor = visitor.clone();
        move |s: &mut Session| {
            login_as(s, &creator);
            publish(s, &sample_blog(), 1);
            s.click(Locator::button("Log Out"));
            login_as(s, &visitor);
            s.expect_within(Locator::button("show"), Expectation::Visible, Timeout::Extended)
                .click(Locator::button("show"))
                .expect_visible(Locator::button("hide"))
                .expect_count(Locator::button("remove"), 0);
        }
    })
    .tag("blogs")
    .user(creator)
    .user(visitor)
}

pub fn blogs_ordered_by_likes() -> Scenario {
    let user = owner();
    Scenario::new("Blogs are ordered by likes", {
        let user = user.clone();
        move |s: &mut Session| {
            let blogs = ranked_blogs();
            login_as(s, &user);
            for (i, blog) in blogs.iter().enumerate() {
                publish(s, blog, i + 1);
            }
            // Each click turns one "show" into "hide"
            for _ in &blogs {
                s.click(Locator::button("show").first());
            }
            s.expect_count(Locator::button("hide"), blogs.len())
                .expect(
                    Locator::class("blogTitle"),
                    Expectation::TextsInOrder {
                        texts: titles_by_likes_desc(&blogs),
                    },
                );
        }
    })
    .description("Shown blogs are listed most liked first")
    .tag("blogs")
    .user(user)
}
