mod common;

use anyhow::Result;
use futures::future::join_all;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{send, TestApp};

fn pu1() -> Value {
    json!({ "code": "PU-1", "description": "d", "unit": "u", "unit_price": "1.00" })
}

#[tokio::test]
async fn create_conflict_update_delete_scenario() -> Result<()> {
    let app = TestApp::spawn().await?;
    let admin = app.superuser().await?;

    let (status, created) = send(app.post("/line-items/", &admin, &pu1())).await?;
    assert_eq!(status, StatusCode::OK, "{}", created);
    let id = created["id"].as_str().expect("id present").to_string();
    assert_eq!(created["unit_price"], "1.00");

    let (status, body) = send(app.post("/line-items/", &admin, &pu1())).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Code already exists");

    let (status, updated) = send(app.put(
        &format!("/line-items/{}", id),
        &admin,
        &json!({ "unit_price": "2.50" }),
    ))
    .await?;
    assert_eq!(status, StatusCode::OK, "{}", updated);
    assert_eq!(updated["unit_price"], "2.50");
    assert_eq!(updated["code"], "PU-1");

    let (status, body) = send(app.delete(&format!("/line-items/{}", id), &admin)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Line item deleted successfully");

    let (status, body) = send(app.get(&format!("/line-items/{}", id), &admin)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Line item not found");

    Ok(())
}

#[tokio::test]
async fn get_returns_what_create_returned() -> Result<()> {
    let app = TestApp::spawn().await?;
    let admin = app.superuser().await?;
    let reader = app.normal_user().await?;

    let (_, created) = send(app.post(
        "/line-items/",
        &admin,
        &json!({ "description": "cement", "unit": "bag", "unit_price": "12.345" }),
    ))
    .await?;
    // half away from zero at scale 2
    assert_eq!(created["unit_price"], "12.35");
    assert_eq!(created["code"], Value::Null);

    let (status, fetched) = send(app.get(&format!("/line-items/{}", created["id"].as_str().unwrap()), &reader)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    Ok(())
}

#[tokio::test]
async fn partial_update_leaves_other_fields_alone() -> Result<()> {
    let app = TestApp::spawn().await?;
    let admin = app.superuser().await?;

    let (_, created) = send(app.post("/line-items/", &admin, &pu1())).await?;
    let path = format!("/line-items/{}", created["id"].as_str().unwrap());

    let (status, updated) = send(app.put(
        &path,
        &admin,
        &json!({ "description": "new description", "unit_price": "7" }),
    ))
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["description"], "new description");
    assert_eq!(updated["unit_price"], "7.00");
    assert_eq!(updated["code"], created["code"]);
    assert_eq!(updated["unit"], created["unit"]);
    assert_eq!(updated["created_at"], created["created_at"]);

    Ok(())
}

#[tokio::test]
async fn non_superuser_writes_are_denied_regardless_of_payload() -> Result<()> {
    let app = TestApp::spawn().await?;
    let admin = app.superuser().await?;
    let user = app.normal_user().await?;

    let (_, created) = send(app.post("/line-items/", &admin, &pu1())).await?;
    let path = format!("/line-items/{}", created["id"].as_str().unwrap());

    let payloads = [
        pu1(),
        json!({ "code": "x".repeat(80), "description": "d", "unit": "u", "unit_price": "1" }),
        json!({ "unit_price": 1.5 }),
        json!({ "nonsense": true }),
    ];
    for payload in &payloads {
        let (status, body) = send(app.post("/line-items/", &user, payload)).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
        assert_eq!(body["detail"], "Not enough permissions");

        let (status, body) = send(app.put(&path, &user, payload)).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
        assert_eq!(body["detail"], "Not enough permissions");
    }

    let (status, body) = send(app.delete(&path, &user)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "PERMISSION_DENIED");

    // still there
    let (status, _) = send(app.get(&path, &user)).await?;
    assert_eq!(status, StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn validation_failures_are_unprocessable() -> Result<()> {
    let app = TestApp::spawn().await?;
    let admin = app.superuser().await?;

    let (status, body) = send(app.post(
        "/line-items/",
        &admin,
        &json!({ "description": "d", "unit": "far-too-long-unit", "unit_price": "1.00" }),
    ))
    .await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["field_errors"]["unit"].is_string(), "{}", body);

    // floats never enter the pipeline
    let (status, _) = send(app.post(
        "/line-items/",
        &admin,
        &json!({ "description": "d", "unit": "u", "unit_price": 1.25 }),
    ))
    .await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    Ok(())
}

#[tokio::test]
async fn update_to_taken_code_conflicts() -> Result<()> {
    let app = TestApp::spawn().await?;
    let admin = app.superuser().await?;

    send(app.post("/line-items/", &admin, &pu1())).await?;
    let (_, other) = send(app.post(
        "/line-items/",
        &admin,
        &json!({ "code": "PU-2", "description": "d", "unit": "u", "unit_price": "1.00" }),
    ))
    .await?;
    let path = format!("/line-items/{}", other["id"].as_str().unwrap());

    let (status, body) = send(app.put(&path, &admin, &json!({ "code": "PU-1" }))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Code already exists");

    let (status, body) = send(app.put(&path, &admin, &json!({ "code": "PU-2" }))).await?;
    assert_eq!(status, StatusCode::OK, "{}", body);

    let (status, _) = send(app.put(
        &format!("/line-items/{}", uuid::Uuid::new_v4()),
        &admin,
        &json!({ "code": "PU-3" }),
    ))
    .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn concurrent_creates_with_one_code_admit_exactly_one() -> Result<()> {
    let app = TestApp::spawn().await?;
    let admin = app.superuser().await?;

    let body = json!({ "code": "RACE", "description": "d", "unit": "u", "unit_price": "1.00" });
    let results = join_all((0..10).map(|_| send(app.post("/line-items/", &admin, &body)))).await;

    let mut created = 0;
    for result in results {
        let (status, body) = result?;
        match status {
            StatusCode::OK => created += 1,
            StatusCode::BAD_REQUEST => assert_eq!(body["detail"], "Code already exists"),
            other => panic!("unexpected status {}: {}", other, body),
        }
    }
    assert_eq!(created, 1);

    let (_, listing) = send(app.get("/line-items/", &admin)).await?;
    assert_eq!(listing["count"], 1);

    Ok(())
}

#[tokio::test]
async fn listing_pages_and_counts_everything() -> Result<()> {
    let app = TestApp::spawn().await?;
    let admin = app.superuser().await?;

    for i in 0..5 {
        let body = json!({ "code": format!("C-{}", i), "description": "d", "unit": "u", "unit_price": "1" });
        send(app.post("/line-items/", &admin, &body)).await?;
    }

    let (status, page) = send(app.get("/line-items/?skip=1&limit=2", &admin)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["count"], 5);
    assert_eq!(page["data"].as_array().unwrap().len(), 2);

    Ok(())
}
