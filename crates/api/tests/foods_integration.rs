//! Integration tests for the food catalogue.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    create_test_app, create_test_pool, get_request, json_request, run_migrations, send,
    test_config, unique_suffix,
};
use serde_json::json;

#[tokio::test]
async fn test_create_and_get_food() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool);

    let name = format!("Soto Ayam {}", unique_suffix());
    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/v1/foods",
            json!({ "name": format!("  {}  ", name), "calories": 312.5 }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], name.as_str());
    assert_eq!(body["calories"], 312.5);

    let (status, body) = send(&app, get_request(&format!("/api/v1/foods/{}", body["id"]))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], name.as_str());
}

#[tokio::test]
async fn test_duplicate_food_name_conflicts() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool);

    let name = format!("Rawon {}", unique_suffix());
    let request = || {
        json_request(
            Method::POST,
            "/api/v1/foods",
            json!({ "name": name, "calories": 400.0 }),
        )
    };

    let (status, _) = send(&app, request()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, request()).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn test_negative_calories_rejected() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool);

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/v1/foods",
            json!({ "name": "Air Putih", "calories": -1.0 }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "calories");
}

#[tokio::test]
async fn test_search_foods_by_name() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool);

    let tag = unique_suffix();
    for dish in ["Bakso", "Bakwan", "Lontong"] {
        let (status, _) = send(
            &app,
            json_request(
                Method::POST,
                "/api/v1/foods",
                json!({ "name": format!("{} {}", dish, tag), "calories": 150.0 }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, get_request(&format!("/api/v1/foods?name={}", tag))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (status, body) = send(
        &app,
        get_request(&format!("/api/v1/foods?name=bakso%20{}", tag)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let foods = body.as_array().unwrap();
    assert_eq!(foods.len(), 1);
    assert!(foods[0]["name"].as_str().unwrap().starts_with("Bakso"));
}

#[tokio::test]
async fn test_get_unknown_food() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool);

    let (status, body) = send(&app, get_request("/api/v1/foods/999999999")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Food not found");
}
