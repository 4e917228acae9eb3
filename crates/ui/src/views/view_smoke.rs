use qshell_core::model::PageName;
use services::document::{ADMIN_HIDDEN_RULE, ADMIN_VISIBLE_RULE};
use storage::repository::TokenRepository;

use super::test_harness::setup_shell_harness;

const ADMIN_TOKEN: &str = "eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiJhbGljZSIsImlzX2FkbWluIjp0cnVlfQ.sig";

fn site() -> Vec<(&'static str, &'static str)> {
    vec![
        (
            "home",
            r#"<h2>Welcome</h2><a href="about.html">About us</a>"#,
        ),
        ("about", "<h2>About</h2>"),
    ]
}

#[tokio::test(flavor = "current_thread")]
async fn shell_renders_loaded_page_and_marks_current_link() {
    let mut harness = setup_shell_harness(&site(), &["home", "about"]);
    harness
        .services
        .navigator()
        .load_page(&PageName::new("home").unwrap())
        .await
        .expect("load home");

    harness.rebuild();
    let html = harness.render();

    assert!(html.contains("<h2>Welcome</h2>"), "missing fragment in {html}");
    assert!(
        html.contains(r#"href="about.html" data-page="about""#),
        "relative link not marked in {html}"
    );
    assert!(html.contains("nav-link current"), "no current link in {html}");
    assert_eq!(html.matches("nav-link").count(), 2);
    assert!(html.contains(ADMIN_HIDDEN_RULE), "missing admin rule in {html}");
    assert!(!html.contains(ADMIN_VISIBLE_RULE));
}

#[tokio::test(flavor = "current_thread")]
async fn shell_shows_username_for_restored_session() {
    let mut harness = setup_shell_harness(&site(), &["home"]);
    harness
        .storage
        .tokens
        .save_token(ADMIN_TOKEN)
        .await
        .expect("save token");
    harness
        .services
        .auth()
        .restore()
        .await
        .expect("restore session");

    harness.rebuild();
    let html = harness.render();

    assert!(html.contains("alice"), "missing username in {html}");
    assert!(html.contains(ADMIN_VISIBLE_RULE), "admin rule not shown in {html}");
    assert_eq!(html.matches(".adminOnly").count(), 1);
}

#[tokio::test(flavor = "current_thread")]
async fn shell_renders_empty_region_before_navigation() {
    let mut harness = setup_shell_harness(&site(), &["home", "about"]);

    harness.rebuild();
    let html = harness.render();

    assert!(html.contains(r#"id="content""#), "missing content region in {html}");
    assert!(!html.contains("nav-link current"));
    assert!(!html.contains("Welcome"));
}
