mod common;

use actix_web::{http::StatusCode, test};
use serde_json::{json, Value};

#[actix_web::test]
async fn sign_up_sign_in_and_sign_out() {
    let (pool, auth) = common::setup().await;
    let app = test_app!(pool, auth);

    let req = test::TestRequest::post()
        .uri("/auth/signup")
        .set_json(json!({ "email": "Jamie@Example.com ", "password": "password123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["redirect"], "/room-details");
    assert!(body["token"].as_str().is_some());

    let req = test::TestRequest::post()
        .uri("/auth/signin")
        .set_json(json!({ "email": "jamie@example.com", "password": "password123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let token = body["token"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/auth/session")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["email"], "jamie@example.com");
    assert!(body.get("token").is_none());

    let req = test::TestRequest::post()
        .uri("/auth/signout")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/auth/session")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["redirect"], "/auth");
}

#[actix_web::test]
async fn duplicate_email_is_a_conflict() {
    let (pool, auth) = common::setup().await;
    common::register(&auth, "jamie@example.com").await;
    let app = test_app!(pool, auth);

    let req = test::TestRequest::post()
        .uri("/auth/signup")
        .set_json(json!({ "email": "JAMIE@example.com", "password": "password123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(common::count(&pool, "SELECT COUNT(*) FROM users").await, 1);
}

#[actix_web::test]
async fn wrong_password_is_rejected() {
    let (pool, auth) = common::setup().await;
    common::register(&auth, "jamie@example.com").await;
    let app = test_app!(pool, auth);

    let req = test::TestRequest::post()
        .uri("/auth/signin")
        .set_json(json!({ "email": "jamie@example.com", "password": "not-the-password" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/auth/signin")
        .set_json(json!({ "email": "nobody@example.com", "password": "password123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn malformed_credentials_are_bad_requests() {
    let (pool, auth) = common::setup().await;
    let app = test_app!(pool, auth);

    let req = test::TestRequest::post()
        .uri("/auth/signup")
        .set_json(json!({ "email": "not-an-email", "password": "short" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/auth/signup")
        .set_json(json!({ "email": "jamie@example.com" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn missing_or_unknown_token_is_unauthorized() {
    let (pool, auth) = common::setup().await;
    let app = test_app!(pool, auth);

    let req = test::TestRequest::get().uri("/bookings/upcoming").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/bookings/upcoming")
        .insert_header(("Authorization", "Bearer not-a-session"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn expired_sessions_are_removed() {
    let (pool, auth) = common::setup_with_ttl(chrono::Duration::seconds(-1)).await;
    let session = common::register(&auth, "jamie@example.com").await;
    let app = test_app!(pool, auth);

    let req = test::TestRequest::get()
        .uri("/auth/session")
        .insert_header(common::bearer(&session))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(common::count(&pool, "SELECT COUNT(*) FROM sessions").await, 0);
}

#[actix_web::test]
async fn deleting_an_account_removes_everything_it_owns() {
    let (pool, auth) = common::setup().await;
    let session = common::register(&auth, "jamie@example.com").await;
    let other = common::register(&auth, "sam@example.com").await;
    common::onboard(&pool, session.user_id).await;
    let app = test_app!(pool, auth);

    let req = test::TestRequest::post()
        .uri("/bookings")
        .insert_header(common::bearer(&session))
        .set_json(json!({
            "booking_date": common::days_from_today(3),
            "time_slot": "midday",
            "rooms": [{ "room_type": "Kitchen", "tier": "deep", "addons": ["Inside Fridge"] }]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::delete()
        .uri("/auth/account")
        .insert_header(common::bearer(&session))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    for table in [
        "service_bookings",
        "booking_rooms",
        "booking_addons",
        "properties",
        "service_preferences",
    ] {
        let rows = common::count(&pool, &format!("SELECT COUNT(*) FROM {table}")).await;
        assert_eq!(rows, 0, "{table} still has rows");
    }
    assert_eq!(common::count(&pool, "SELECT COUNT(*) FROM users").await, 1);
    assert_eq!(common::count(&pool, "SELECT COUNT(*) FROM profiles").await, 1);

    let req = test::TestRequest::get()
        .uri("/auth/session")
        .insert_header(common::bearer(&other))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
