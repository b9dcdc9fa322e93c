//! Checks the rendered Playwright scripts of the Bloglist scenarios.
//! No browser or app is needed.

use bloglist_e2e::playwright::PlaywrightConfig;
use bloglist_e2e::{suite, E2eConfig, Expectation, Locator, PlaywrightHandle, Step};

fn render(scenario: &bloglist_e2e::Scenario) -> String {
    let handle = PlaywrightHandle::new(PlaywrightConfig::from(&E2eConfig::default()));
    handle.build_script(&scenario.session())
}

fn position(script: &str, needle: &str) -> usize {
    script
        .find(needle)
        .unwrap_or_else(|| panic!("missing `{}` in script:\n{}", needle, script))
}

#[test]
fn every_scenario_starts_at_the_app_root() {
    for scenario in suite::scenarios() {
        let session = scenario.session();
        assert_eq!(
            session.steps().first(),
            Some(&Step::Goto { path: "/".into() }),
            "{}",
            scenario.name
        );
        assert!(render(&scenario).contains(r#"await page.goto("http://localhost:5173/");"#));
    }
}

#[test]
fn login_form_checks_title_and_inputs() {
    let script = render(&suite::login_form_is_shown());
    assert!(script.contains(
        r#"await expect(page.getByText("Blog")).toBeVisible({ timeout: 5000 });"#
    ));
    assert!(script.contains(
        r#"await expect(page.getByRole("textbox", { name: "Username" })).toBeVisible({ timeout: 5000 });"#
    ));
    assert!(script.contains(
        r#"await expect(page.getByRole("textbox", { name: "Password" })).toBeVisible({ timeout: 5000 });"#
    ));
}

#[test]
fn successful_login_waits_for_greeting_then_hides_form() {
    let script = render(&suite::login_succeeds());
    let greeting = position(
        &script,
        r#"await expect(page.getByText("Matti Luukkainen logged in")).toBeVisible({ timeout: 15000 });"#,
    );
    let hidden = position(
        &script,
        r#"await expect(page.getByRole("textbox", { name: "Username" })).toBeHidden({ timeout: 5000 });"#,
    );
    assert!(greeting < hidden);
    assert!(script.contains(r#"await expect(page.locator(".new-blog")).toBeVisible"#));
}

#[test]
fn failed_login_never_reaches_greeting() {
    let scenario = suite::login_fails();
    let script = render(&scenario);
    assert!(script.contains(r#".fill("wrong");"#));
    assert!(script.contains(r#"page.getByText("Username or Password is incorrect")"#));
    assert!(script.contains(
        r#"await expect(page.getByText("Matti Luukkainen logged in")).toHaveCount(0, { timeout: 5000 });"#
    ));
}

#[test]
fn created_blog_title_is_checked_in_the_list() {
    let script = render(&suite::blog_can_be_created());
    let show = position(
        &script,
        r#"await expect(page.getByRole("button", { name: "show" })).toBeVisible({ timeout: 15000 });"#,
    );
    let title = position(
        &script,
        r#"await expect(page.locator(".blogTitle")).toContainText("Canonical string reduction""#,
    );
    assert!(show < title);
    assert!(!script.contains(r#"page.getByText("Canonical string reduction")"#));
}

#[test]
fn like_expects_count_plus_one() {
    let script = render(&suite::blog_can_be_liked());
    let before = position(&script, r#"toContainText("5", { timeout: 5000 })"#);
    let click = position(&script, r#"await page.getByRole("button", { name: "like" }).click();"#);
    let after = position(&script, r#"toContainText("6", { timeout: 15000 })"#);
    assert!(before < click && click < after);
}

#[test]
fn removal_accepts_dialog_before_clicking_remove() {
    let script = render(&suite::owner_can_remove_blog());
    let dialogs = position(&script, "page.on('dialog', dialog => dialog.accept());");
    let remove = position(
        &script,
        r#"await page.getByRole("button", { name: "remove" }).click();"#,
    );
    let gone = position(&script, r#"await expect(page.locator(".blogContainer")).toHaveCount(0"#);
    assert!(dialogs < remove && remove < gone);
}

#[test]
fn non_owner_sees_no_remove_button() {
    let scenario = suite::only_owner_sees_remove();
    assert_eq!(scenario.users.len(), 2);

    let script = render(&scenario);
    let logout = position(
        &script,
        r#"await page.getByRole("button", { name: "Log Out" }).click();"#,
    );
    let second = position(&script, r#"page.getByText("Arto Hellas logged in")"#);
    let no_remove = position(
        &script,
        r#"await expect(page.getByRole("button", { name: "remove" })).toHaveCount(0"#,
    );
    assert!(logout < second && second < no_remove);
}

#[test]
fn ordering_expects_titles_by_descending_likes() {
    let scenario = suite::blogs_ordered_by_likes();
    let session = scenario.session();

    let last = session.steps().last().unwrap();
    assert_eq!(
        last,
        &Step::Expect {
            locator: Locator::class("blogTitle"),
            expectation: Expectation::TextsInOrder {
                texts: vec![
                    "Type wars".to_string(),
                    "React patterns".to_string(),
                    "First class tests".to_string(),
                ],
            },
            timeout: Default::default(),
        }
    );

    let creations = session
        .steps()
        .iter()
        .filter(|s| **s == Step::Click { locator: Locator::class("newBlogSubmit") })
        .count();
    assert_eq!(creations, suite::ranked_blogs().len());
}
