//! API integration tests

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";
const ACCESS_KEY: &str = "change-this-key-in-production";

fn valid_submission(vehicle_id: &str) -> Value {
    json!({
        "requester_name": "Ana Souza",
        "requester_email": "ana.souza@example.com",
        "requester_id": "X12345",
        "department": "DE-TV",
        "cost_center": "CC-401",
        "requester_phone": "+55 41 99999-0000",
        "supervisor_name": "Bruno Lima",
        "supervisor_email": "bruno.lima@example.com",
        "reason": "Track tests at the proving ground",
        "expected_return_date": "2030-03-05",
        "vehicle_id": vehicle_id,
        "agreed_to_rules": true
    })
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
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
async fn test_unlock_with_correct_key() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/unlock", BASE_URL))
        .json(&json!({ "access_key": ACCESS_KEY }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["authorized"], true);
}

#[tokio::test]
#[ignore]
async fn test_unlock_with_wrong_key() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/unlock", BASE_URL))
        .json(&json!({ "access_key": "wrong" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_records_require_access_key() {
    let client = Client::new();

    let response = client
        .get(format!("{}/records", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_loan_rules_are_served() {
    let client = Client::new();

    let response = client
        .get(format!("{}/rules", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains("FUEL CARDS"));
}

#[tokio::test]
#[ignore]
async fn test_submit_and_list_round_trip() {
    let client = Client::new();

    let response = client
        .post(format!("{}/submissions", BASE_URL))
        .json(&valid_submission("SV6122"))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let record_id = body["record_id"].as_str().expect("No record id").to_string();

    let response = client
        .get(format!("{}/records?vehicle=SV61", BASE_URL))
        .header("X-Access-Key", ACCESS_KEY)
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let rows: Value = response.json().await.expect("Failed to parse response");
    let found = rows
        .as_array()
        .expect("Expected an array")
        .iter()
        .any(|row| row["record_id"] == record_id.as_str() && row["status"] == "Open");
    assert!(found);
}

#[tokio::test]
#[ignore]
async fn test_submit_missing_vehicle_is_rejected() {
    let client = Client::new();

    let response = client
        .post(format!("{}/submissions", BASE_URL))
        .json(&valid_submission(""))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "MissingRequiredField");
}

#[tokio::test]
#[ignore]
async fn test_reconcile_unchanged_rows_writes_nothing() {
    let client = Client::new();

    let response = client
        .get(format!("{}/records", BASE_URL))
        .header("X-Access-Key", ACCESS_KEY)
        .send()
        .await
        .expect("Failed to send request");
    let rows: Value = response.json().await.expect("Failed to parse response");

    // Send the rows straight back, untouched
    let edits: Vec<Value> = rows
        .as_array()
        .expect("Expected an array")
        .iter()
        .map(|row| {
            let mut edit = row.clone();
            edit.as_object_mut().unwrap().remove("status");
            edit.as_object_mut().unwrap().remove("registered_at");
            edit
        })
        .collect();
    let expected_unchanged = edits.len();

    let response = client
        .post(format!("{}/records/reconcile", BASE_URL))
        .header("X-Access-Key", ACCESS_KEY)
        .json(&json!({ "rows": edits }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let report: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(report["unchanged"], expected_unchanged);
    assert_eq!(report["updated"].as_array().unwrap().len(), 0);
    assert_eq!(report["inserted"].as_array().unwrap().len(), 0);
}
