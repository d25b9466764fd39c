mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

use common::{send, TestApp};

#[tokio::test]
async fn me_returns_the_caller() -> Result<()> {
    let app = TestApp::spawn().await?;
    let user = app.normal_user().await?;

    let (status, me) = send(app.get("/users/me", &user)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"], user.id.to_string());
    assert_eq!(me["email"], "someone@example.com");
    assert_eq!(me["is_superuser"], false);
    assert_eq!(me["is_active"], true);

    Ok(())
}

#[tokio::test]
async fn account_management_is_superuser_only() -> Result<()> {
    let app = TestApp::spawn().await?;
    let admin = app.superuser().await?;
    let user = app.normal_user().await?;

    let (status, body) = send(app.get("/users/", &user)).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["detail"], "The user doesn't have enough privileges");

    let (status, _) = send(app.get(&format!("/users/{}", admin.id), &user)).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(app.get(&format!("/users/{}", user.id), &user)).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(app.post("/users/", &user, &json!({ "email": "new@example.com" }))).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, listing) = send(app.get("/users/", &admin)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing["count"], 2);

    Ok(())
}

#[tokio::test]
async fn create_and_patch_users() -> Result<()> {
    let app = TestApp::spawn().await?;
    let admin = app.superuser().await?;

    let (status, created) = send(app.post(
        "/users/",
        &admin,
        &json!({ "email": "new@example.com", "full_name": "New Person" }),
    ))
    .await?;
    assert_eq!(status, StatusCode::OK, "{}", created);
    assert_eq!(created["is_superuser"], false);

    let (status, body) = send(app.post("/users/", &admin, &json!({ "email": "new@example.com" }))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "The user with this email already exists in the system.");

    let path = format!("/users/{}", created["id"].as_str().unwrap());
    let (status, patched) = send(app.patch(&path, &admin, &json!({ "full_name": null }))).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(patched["full_name"].is_null());
    assert_eq!(patched["email"], "new@example.com");

    let (status, body) = send(app.patch(&path, &admin, &json!({ "email": "admin@example.com" }))).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["detail"], "User with this email already exists");

    let (status, body) = send(app.patch(
        &format!("/users/{}", uuid::Uuid::new_v4()),
        &admin,
        &json!({ "full_name": "x" }),
    ))
    .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "The user with this id does not exist in the system");

    let (status, _) = send(app.post("/users/", &admin, &json!({ "email": "no-at-sign" }))).await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    Ok(())
}

#[tokio::test]
async fn superuser_cannot_delete_themself() -> Result<()> {
    let app = TestApp::spawn().await?;
    let admin = app.superuser().await?;
    let user = app.normal_user().await?;

    let (status, body) = send(app.delete(&format!("/users/{}", admin.id), &admin)).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["detail"], "Super users are not allowed to delete themselves");

    let (status, body) = send(app.delete(&format!("/users/{}", user.id), &admin)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User deleted successfully");

    let (status, body) = send(app.delete(&format!("/users/{}", user.id), &admin)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "User not found");

    Ok(())
}

#[tokio::test]
async fn private_route_seeds_users_locally() -> Result<()> {
    let app = TestApp::spawn().await?;

    let (status, created) = send(
        app.client
            .post(format!("{}/private/users/", app.api))
            .json(&json!({ "email": "seed@example.com", "is_superuser": true })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK, "{}", created);
    assert_eq!(created["is_superuser"], true);

    Ok(())
}

#[tokio::test]
async fn private_route_is_absent_outside_local() -> Result<()> {
    let app = TestApp::spawn_with(&[("APP_ENV", "staging")]).await?;

    let res = app
        .client
        .post(format!("{}/private/users/", app.api))
        .json(&json!({ "email": "seed@example.com" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}
