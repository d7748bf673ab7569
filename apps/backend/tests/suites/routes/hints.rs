use actix_web::http::StatusCode;
use actix_web::test;
use party_backend::ai::{fallback_hint, NO_WORD_HINT};
use party_backend::AppState;
use serde_json::{json, Value};

use super::app;

#[actix_web::test]
async fn disabled_provider_falls_back_to_template() {
    let srv = test::init_service(app(AppState::for_tests().unwrap())).await;

    let req = test::TestRequest::post()
        .uri("/api/hints")
        .set_json(json!({"word": "lighthouse", "role": "citizen"}))
        .to_request();
    let res = test::call_service(&srv, req).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body, json!({"hint": fallback_hint("lighthouse")}));
}

#[actix_web::test]
async fn missing_word_gets_the_no_word_hint() {
    let srv = test::init_service(app(AppState::for_tests().unwrap())).await;

    for payload in [
        json!({"role": "infiltrator"}),
        json!({"word": null, "role": "infiltrator"}),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/hints")
            .set_json(payload)
            .to_request();
        let body: Value = test::call_and_read_body_json(&srv, req).await;
        assert_eq!(body["hint"], NO_WORD_HINT);
    }
}

#[actix_web::test]
async fn blank_word_is_a_validation_problem() {
    let srv = test::init_service(app(AppState::for_tests().unwrap())).await;

    let req = test::TestRequest::post()
        .uri("/api/hints")
        .set_json(json!({"word": "   ", "role": "agent"}))
        .to_request();
    let res = test::call_service(&srv, req).await;

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        res.headers().get("content-type").unwrap(),
        "application/problem+json"
    );
    let header_id = res
        .headers()
        .get("x-request-id")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["status"], 422);
    assert_eq!(body["trace_id"], header_id.as_str());
}

#[actix_web::test]
async fn overlong_word_is_rejected() {
    let srv = test::init_service(app(AppState::for_tests().unwrap())).await;

    let req = test::TestRequest::post()
        .uri("/api/hints")
        .set_json(json!({"word": "w".repeat(65), "role": "spy"}))
        .to_request();
    let res = test::call_service(&srv, req).await;

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn unknown_role_is_a_bad_request() {
    let srv = test::init_service(app(AppState::for_tests().unwrap())).await;

    let req = test::TestRequest::post()
        .uri("/api/hints")
        .set_json(json!({"word": "apple", "role": "wizard"}))
        .to_request();
    let res = test::call_service(&srv, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "BAD_REQUEST");
}
