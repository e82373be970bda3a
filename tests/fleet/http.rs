//! Full axum HTTP roundtrips against a seeded store.

use fleet_monitor::http::{router, AppState};
use fleet_monitor::{seed_demo_data, InMemoryStore, Settings};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Serve a freshly seeded fleet on a random port; returns the base URL.
async fn spawn_app(settings: Settings) -> String {
    let store = InMemoryStore::new();
    seed_demo_data(&store).unwrap();
    let app = router(AppState::new(settings, store));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

async fn get(url: &str) -> (u16, Value) {
    let resp = reqwest::get(url).await.unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

#[tokio::test]
async fn health_reports_name_and_version() {
    let base = spawn_app(Settings::default()).await;

    let (status, body) = get(&format!("{}/health", base)).await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn truck_listing_is_paginated_with_links() {
    let base = spawn_app(Settings::default()).await;

    let (status, body) = get(&format!("{}/api/v1/trucks?page=2&per_page=1", base)).await;
    assert_eq!(status, 200);
    assert_eq!(
        body["meta"],
        json!({"total": 3, "page": 2, "per_page": 1, "total_pages": 3})
    );
    assert_eq!(body["data"][0]["board_number"], "102");
    assert_eq!(body["data"][0]["model"]["name"], "BELAZ");
    assert_eq!(
        body["links"]["self"],
        format!("{}/api/v1/trucks?page=2&per_page=1", base)
    );
    assert_eq!(
        body["links"]["prev"],
        format!("{}/api/v1/trucks?page=1&per_page=1", base)
    );
    assert_eq!(
        body["links"]["next"],
        format!("{}/api/v1/trucks?page=3&per_page=1", base)
    );
}

#[tokio::test]
async fn filters_survive_into_links() {
    let base = spawn_app(Settings::default()).await;

    let (status, body) = get(&format!("{}/api/v1/trucks?model_name=koma", base)).await;
    assert_eq!(status, 200);
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["board_number"], "K103");
    assert_eq!(
        body["links"]["first"],
        format!("{}/api/v1/trucks?model_name=koma&page=1&per_page=50", base)
    );
    assert!(body["links"].get("prev").is_none());
    assert!(body["links"].get("next").is_none());
}

#[tokio::test]
async fn model_catalogue_is_sorted_by_name() {
    let base = spawn_app(Settings::default()).await;

    for path in ["/api/v1/models", "/api/v1/trucks/models"] {
        let (status, body) = get(&format!("{}{}", base, path)).await;
        assert_eq!(status, 200);
        assert_eq!(body["meta"]["per_page"], 100);
        assert_eq!(body["data"][0]["name"], "BELAZ");
        assert_eq!(body["data"][1]["name"], "Komatsu");
    }
}

#[tokio::test]
async fn create_update_delete_truck() {
    let base = spawn_app(Settings::default()).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/api/v1/trucks", base))
        .json(&json!({"model_id": 2, "board_number": " k200 ", "current_weight": 55}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["board_number"], "K200");
    assert_eq!(body["data"]["load_percentage"], json!(50.0));
    let id = body["data"]["id"].as_i64().unwrap();

    let resp = client
        .put(format!("{}/api/v1/trucks/{}", base, id))
        .json(&json!({"model_id": 1, "board_number": "K200", "current_weight": 130}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["model"]["name"], "BELAZ");
    assert_eq!(body["data"]["is_overloaded"], true);

    let resp = client
        .delete(format!("{}/api/v1/trucks/{}", base, id))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({}));

    let (status, body) = get(&format!("{}/api/v1/trucks/{}", base, id)).await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "TruckNotFound");
    assert_eq!(body["status_code"], 404);
}

#[tokio::test]
async fn conflicts_answer_409() {
    let base = spawn_app(Settings::default()).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/api/v1/models", base))
        .json(&json!({"name": "belaz", "max_capacity": 50}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 409);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "DuplicateModelName");

    let resp = client
        .delete(format!("{}/api/v1/models/1", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 409);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "ModelInUse");
}

#[tokio::test]
async fn unknown_model_reference_answers_404() {
    let base = spawn_app(Settings::default()).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/api/v1/trucks", base))
        .json(&json!({"model_id": 42, "board_number": "101"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "ModelNotFound");
}

#[tokio::test]
async fn invalid_input_answers_422() {
    let base = spawn_app(Settings::default()).await;
    let client = reqwest::Client::new();

    for query in ["page=0", "per_page=0", "per_page=101", "page=abc"] {
        let (status, body) = get(&format!("{}/api/v1/trucks?{}", base, query)).await;
        assert_eq!(status, 422, "{}", query);
        assert_eq!(body["error"], "ValidationError");
    }

    let (status, _) = get(&format!("{}/api/v1/trucks/0", base)).await;
    assert_eq!(status, 422);
    let (status, _) = get(&format!("{}/api/v1/models/abc", base)).await;
    assert_eq!(status, 422);

    let resp = client
        .post(format!("{}/api/v1/trucks", base))
        .json(&json!({"model_id": 1, "board_number": "A-1"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 422);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "board_number: may contain only letters and digits");

    let resp = client
        .post(format!("{}/api/v1/models", base))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 422);
}

#[tokio::test]
async fn collections_answer_with_trailing_slash() {
    let base = spawn_app(Settings::default()).await;

    let (status, body) = get(&format!("{}/api/v1/trucks/", base)).await;
    assert_eq!(status, 200);
    assert_eq!(body["meta"]["total"], 3);
    assert_eq!(
        body["links"]["self"],
        format!("{}/api/v1/trucks/?page=1&per_page=50", base)
    );

    let resp = reqwest::Client::new()
        .post(format!("{}/api/v1/models/", base))
        .json(&json!({"name": "CAT", "max_capacity": 90}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["id"], 3);
}

#[tokio::test]
async fn unknown_route_answers_json_404() {
    let base = spawn_app(Settings::default()).await;

    let (status, body) = get(&format!("{}/api/v2/trucks", base)).await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "NotFound");
}

#[tokio::test]
async fn empty_prefix_serves_at_root() {
    let settings = Settings {
        api_prefix: String::new(),
        ..Settings::default()
    };
    let base = spawn_app(settings).await;

    let (status, body) = get(&format!("{}/trucks/1", base)).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["board_number"], "101");
}
