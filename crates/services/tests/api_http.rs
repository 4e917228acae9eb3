mod common;

use qshell_core::model::{NewQuestion, QuestionUpdate};
use reqwest::Client;
use serde_json::json;
use services::{ApiError, QuestionnaireApi, ShellConfig};
use storage::repository::TokenRepository;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{auth_for, base_url, token};

async fn api_for(server: &MockServer, logged_in_as: Option<&str>) -> (QuestionnaireApi, String) {
    let fx = auth_for(server);
    let issued = token(&json!({"sub": logged_in_as.unwrap_or(""), "is_admin": true}));
    if logged_in_as.is_some() {
        fx.repo.save_token(&issued).await.unwrap();
        fx.auth.restore().await.unwrap();
    }
    let config = ShellConfig::new().unwrap().with_api_url(base_url(server));
    (QuestionnaireApi::new(Client::new(), config, fx.auth), issued)
}

#[tokio::test]
async fn update_and_create_send_bearer_json() {
    let server = MockServer::start().await;
    let (api, issued) = api_for(&server, Some("root")).await;
    let bearer = format!("Bearer {issued}");
    Mock::given(method("PUT"))
        .and(path("/update_question"))
        .and(header("authorization", bearer.as_str()))
        .and(body_json(json!({"question_id": 11, "question_text": "Slept well?"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "question_id": 11, "question_text": "Slept well?"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/create_question"))
        .and(header("authorization", bearer.as_str()))
        .and(body_json(json!({"group_id": 2, "question_text": "Lunch?"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "question_id": 30, "question_text": "Lunch?"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let updated = api
        .update_question(&QuestionUpdate {
            question_id: 11,
            question_text: "Slept well?".into(),
        })
        .await
        .unwrap();
    let created = api
        .create_question(&NewQuestion {
            group_id: 2,
            question_text: "Lunch?".into(),
        })
        .await
        .unwrap();

    assert_eq!(updated.question_text, "Slept well?");
    assert_eq!(created.question_id, 30);
    assert_eq!(created.value, None);
}

#[tokio::test]
async fn delete_and_profile() {
    let server = MockServer::start().await;
    let (api, _) = api_for(&server, Some("root")).await;
    Mock::given(method("DELETE"))
        .and(path("/delete_question/30"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"message": "Question deleted"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "username": "root", "email": "root@example.com", "is_admin": true
        })))
        .mount(&server)
        .await;

    let deleted = api.delete_question(30).await.unwrap();
    let me = api.current_user().await.unwrap();

    assert_eq!(deleted["message"], "Question deleted");
    assert_eq!(me.username, "root");
    assert!(me.is_admin);
    assert_eq!(me.disabled, None);
}

#[tokio::test]
async fn rejected_calls_surface_the_status() {
    let server = MockServer::start().await;
    let (api, _) = api_for(&server, None).await;
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = api.current_user().await.unwrap_err();

    assert!(matches!(err, ApiError::Status(status) if status.as_u16() == 401));
}
