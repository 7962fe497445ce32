//! API integration tests against a running server

use catalog_server::{access::CAN_MARK_RETURNED, models::UserClaims};
use chrono::{Duration, Utc};
use reqwest::{redirect::Policy, Client, StatusCode};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:8080/api/v1";

fn jwt_secret() -> String {
    std::env::var("JWT_SECRET").unwrap_or_else(|_| "change-this-secret-in-production".to_string())
}

/// Helper to mint a token the server accepts
fn token(user_id: i32, permissions: &[&str]) -> String {
    let now = Utc::now();
    UserClaims {
        sub: format!("user{}", user_id),
        user_id,
        permissions: permissions.iter().map(|p| p.to_string()).collect(),
        exp: (now + Duration::hours(1)).timestamp(),
        iat: now.timestamp(),
    }
    .create_token(&jwt_secret())
    .expect("Failed to sign token")
}

/// Client that reports redirects instead of following them
fn client() -> Client {
    Client::builder()
        .redirect(Policy::none())
        .build()
        .expect("Failed to build client")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let response = client()
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_ready() {
    let response = client()
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
}

#[tokio::test]
#[ignore]
async fn test_book_list_requires_login() {
    let response = client()
        .get(format!("{}/catalog/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::FOUND);
    let location = response.headers()["location"].to_str().unwrap();
    assert!(location.contains("next=%2Fapi%2Fv1%2Fcatalog%2Fbooks"));
}

#[tokio::test]
#[ignore]
async fn test_list_books() {
    let response = client()
        .get(format!("{}/catalog/books", BASE_URL))
        .bearer_auth(token(1, &[]))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["items"].is_array());
    assert!(body["total"].is_number());
    assert_eq!(body["per_page"], 5);
}

#[tokio::test]
#[ignore]
async fn test_out_of_range_page_is_empty() {
    let response = client()
        .get(format!("{}/catalog/authors?page=100000", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["items"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
#[ignore]
async fn test_missing_book() {
    let response = client()
        .get(format!("{}/catalog/books/2147483647", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_visit_counter() {
    let client = client();
    let bearer = token(1, &[]);

    let first = client
        .get(format!("{}/catalog", BASE_URL))
        .bearer_auth(&bearer)
        .send()
        .await
        .expect("Failed to send request");
    assert!(first.status().is_success());

    let cookie = first.headers()["set-cookie"]
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();
    let body: Value = first.json().await.expect("Failed to parse response");
    assert_eq!(body["num_visits"], 0);
    assert!(body["num_instances_available"].as_i64() <= body["num_instances"].as_i64());

    for expected in 1..3 {
        let body: Value = client
            .get(format!("{}/catalog", BASE_URL))
            .bearer_auth(&bearer)
            .header("cookie", &cookie)
            .send()
            .await
            .expect("Failed to send request")
            .json()
            .await
            .expect("Failed to parse response");
        assert_eq!(body["num_visits"], expected);
    }
}

#[tokio::test]
#[ignore]
async fn test_borrowed_requires_permission() {
    let response = client()
        .get(format!("{}/catalog/borrowed", BASE_URL))
        .bearer_auth(token(1, &[]))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = client()
        .get(format!("{}/catalog/borrowed", BASE_URL))
        .bearer_auth(token(1, &[CAN_MARK_RETURNED]))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body.is_array());
}
