mod common;

use std::sync::Arc;

use qshell_core::markup::rewrite_relative_links;
use qshell_core::model::PageName;
use qshell_core::time::fixed_clock;
use reqwest::Client;
use serde_json::json;
use services::{
    AppServices, ElementHandle, HttpAssets, LoadOutcome, QuestionnaireError,
    QuestionnaireRenderer, ShellConfig, ShellDocument, ShellEvent,
};
use storage::repository::{Storage, TokenRepository};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{auth_for, base_url, token};

const GROUP_TEMPLATE: &str =
    r#"<fieldset class="group {{groupClass}}"><legend>{{group}}</legend></fieldset>"#;
const QUESTION_TEMPLATE: &str = r#"<div class="question" id="{{questionIndex}}" data-id="{{questionID}}"><label>{{question}}</label><input type="radio" name="{{questionIndex}}" value="a"><input type="radio" name="{{questionIndex}}" value="b"><input type="radio" name="{{questionIndex}}" value="c"><input type="radio" name="{{questionIndex}}" value="d"><input type="radio" name="{{questionIndex}}" value="e"></div>"#;

async fn mount_templates(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/content/_question-group-template.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(GROUP_TEMPLATE))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/content/_question-template.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(QUESTION_TEMPLATE))
        .mount(server)
        .await;
}

fn data() -> serde_json::Value {
    json!({
        "question_groups": [
            {
                "display_text": "Sleep",
                "group_class": "sleep",
                "questions": [
                    {"question_id": 11, "question_text": "Rested?", "value": 2},
                    {"question_id": 12, "question_text": "Dreams?", "value": 9},
                    {"question_id": 13, "question_text": "Naps?"}
                ]
            },
            {
                "display_text": "Food",
                "group_class": "food",
                "questions": [{"question_id": 21, "question_text": "Breakfast?", "value": "0"}]
            }
        ]
    })
}

fn target(document: &ShellDocument) -> ElementHandle {
    document.replace_content(rewrite_relative_links(
        r#"<h1>Questions</h1><form id="questionnaire"><p>Loading</p></form>"#,
    ));
    ElementHandle::detached(document.clone(), "questionnaire")
}

fn renderer(server: &MockServer, fx: &common::AuthFixture) -> QuestionnaireRenderer {
    let client = Client::new();
    QuestionnaireRenderer::new(
        client.clone(),
        base_url(server).join("get_data").unwrap(),
        Arc::new(HttpAssets::new(client, base_url(server))),
        Arc::clone(&fx.auth),
    )
}

#[tokio::test]
async fn renders_groups_and_selects_prior_answers() {
    let server = MockServer::start().await;
    mount_templates(&server).await;
    Mock::given(method("GET"))
        .and(path("/get_data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(data()))
        .mount(&server)
        .await;
    let fx = auth_for(&server);
    let document = ShellDocument::new();
    let handle = target(&document);

    renderer(&server, &fx).render(&handle).await.unwrap();

    let html = document.content();
    assert!(html.starts_with(r#"<h1>Questions</h1><form id="questionnaire"><fieldset class="group sleep"><legend>Sleep</legend><div class="question" id="question0" data-id="11">"#));
    assert!(!html.contains("Loading"));
    assert!(html.contains(r#"id="question100" data-id="21""#));
    assert!(!html.contains("{{"));
    assert_eq!(html.matches(r#"checked="checked""#).count(), 2);
    assert!(html.contains(r#"name="question0" value="c" checked="checked""#));
    assert!(html.contains(r#"name="question100" value="a" checked="checked""#));
    assert!(!html.contains(r#"name="question1" value="e" checked"#));
    assert!(html.ends_with("</div></fieldset></form>"));
}

#[tokio::test]
async fn sends_bearer_token_when_logged_in() {
    let server = MockServer::start().await;
    mount_templates(&server).await;
    let fx = auth_for(&server);
    let issued = token(&json!({"sub": "alice"}));
    fx.repo.save_token(&issued).await.unwrap();
    fx.auth.restore().await.unwrap();
    Mock::given(method("GET"))
        .and(path("/get_data"))
        .and(header("authorization", format!("Bearer {issued}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"question_groups": []})))
        .expect(1)
        .mount(&server)
        .await;
    let document = ShellDocument::new();
    let handle = target(&document);

    renderer(&server, &fx).render(&handle).await.unwrap();

    assert_eq!(
        document.content(),
        r#"<h1>Questions</h1><form id="questionnaire"></form>"#
    );
}

#[tokio::test]
async fn failed_template_leaves_target_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/content/_question-group-template.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(GROUP_TEMPLATE))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/get_data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(data()))
        .mount(&server)
        .await;
    let fx = auth_for(&server);
    let document = ShellDocument::new();
    let handle = target(&document);
    let before = document.content();

    let err = renderer(&server, &fx).render(&handle).await.unwrap_err();

    assert!(matches!(err, QuestionnaireError::Template { path, .. } if path.ends_with("_question-template.html")));
    assert_eq!(document.content(), before);
}

#[tokio::test]
async fn failed_data_request_leaves_target_untouched() {
    let server = MockServer::start().await;
    mount_templates(&server).await;
    Mock::given(method("GET"))
        .and(path("/get_data"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let fx = auth_for(&server);
    let document = ShellDocument::new();
    let handle = target(&document);
    let before = document.content();

    let err = renderer(&server, &fx).render(&handle).await.unwrap_err();

    assert!(matches!(err, QuestionnaireError::Data(_)));
    assert_eq!(document.content(), before);
}

#[tokio::test]
async fn questionnaire_page_behavior_renders_into_its_element() {
    let server = MockServer::start().await;
    mount_templates(&server).await;
    Mock::given(method("GET"))
        .and(path("/get_data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(data()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/content/questionnaire.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<section><div id="questionnaire"></div><a href="home.html">Done</a></section>"#,
        ))
        .mount(&server)
        .await;
    let config = ShellConfig::new()
        .unwrap()
        .with_api_url(base_url(&server))
        .with_assets_url(base_url(&server));
    let services = AppServices::new(config, Storage::in_memory(), fixed_clock()).unwrap();
    let mut events = services.events().subscribe();

    let outcome = services
        .navigator()
        .load_page(&PageName::new("questionnaire").unwrap())
        .await
        .unwrap();

    assert_eq!(outcome, LoadOutcome::Loaded);
    let document = services.document();
    assert_eq!(document.title(), "Questionnaire");
    let html = document.content();
    assert!(html.contains(r#"<div id="questionnaire"><fieldset class="group sleep">"#));
    assert!(html.contains(r#"<a href="home.html" data-page="home">Done</a>"#));
    let ready = std::iter::from_fn(|| events.try_recv().ok())
        .filter(|event| matches!(event, ShellEvent::PageReady(_)))
        .count();
    assert_eq!(ready, 1);
}

#[tokio::test]
async fn questionnaire_page_without_target_element_skips_rendering() {
    let server = MockServer::start().await;
    mount_templates(&server).await;
    Mock::given(method("GET"))
        .and(path("/get_data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(data()))
        .expect(0)
        .mount(&server)
        .await;
    let fragment = r#"<section><div data-id="questionnaire"></div></section>"#;
    Mock::given(method("GET"))
        .and(path("/content/questionnaire.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(fragment))
        .mount(&server)
        .await;
    let config = ShellConfig::new()
        .unwrap()
        .with_api_url(base_url(&server))
        .with_assets_url(base_url(&server));
    let services = AppServices::new(config, Storage::in_memory(), fixed_clock()).unwrap();
    let mut events = services.events().subscribe();

    let outcome = services
        .navigator()
        .load_page(&PageName::new("questionnaire").unwrap())
        .await
        .unwrap();

    assert_eq!(outcome, LoadOutcome::Loaded);
    assert_eq!(services.document().content(), fragment);
    assert_eq!(services.document().title(), "Questionnaire");
    let ready = std::iter::from_fn(|| events.try_recv().ok())
        .filter(|event| matches!(event, ShellEvent::PageReady(_)))
        .count();
    assert_eq!(ready, 1);
}
