//! Profile screen and profile API over the seeded in-memory directory.
mod common;

use axum::http::{header, StatusCode};
use common::{get, patch_json, post_form, read_json, read_text, test_app, test_app_with};
use idm_console::directory::InMemoryDirectory;
use idm_console::profile::{ProfileRecord, SchemaDescriptor};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn api_profile_projects_schema_onto_user() {
    let (app, _) = test_app();

    let response = app
        .oneshot(get("/api/users/alice/profile"))
        .await
        .expect("profile");
    assert_eq!(response.status(), StatusCode::OK);

    let payload = read_json(response).await;
    assert_eq!(payload["userId"], "alice");
    assert_eq!(payload["userName"], "PRIMARY/alice");
    assert_eq!(payload["profileUrl"], serde_json::Value::Null);

    let values = &payload["values"];
    assert_eq!(values["userName"], "PRIMARY/alice");
    assert_eq!(values["name.givenName"], "Alice");
    assert_eq!(values["name.familyName"], "Liddell");
    assert_eq!(values["emails"], "alice@example.com");
    assert_eq!(values["phoneNumbers.mobile"], "+1 555 0100");
    assert!(values.get("profileUrl").is_none());

    // Form fields skip the reserved roles.default descriptor
    let fields = payload["fields"].as_array().expect("fields");
    assert_eq!(fields.len(), 6);
    assert_eq!(fields[0]["name"], "userName");
    assert_eq!(fields[0]["value"], "alice");
    assert_eq!(fields[0]["domain"], "PRIMARY");
}

#[tokio::test]
async fn api_profile_missing_user_is_not_found() {
    let (app, _) = test_app();

    let response = app
        .oneshot(get("/api/users/nobody/profile"))
        .await
        .expect("profile");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let payload = read_json(response).await;
    assert_eq!(payload["code"], "NOT_FOUND");
    assert_eq!(payload["message"], "user nobody not found");
}

#[tokio::test]
async fn api_patch_sends_replace_operations() {
    let (app, directory) = test_app();

    let response = app
        .clone()
        .oneshot(patch_json(
            "/api/users/alice/profile",
            json!({ "name.givenName": "Alicia", "roles.default": "Internal/admin" }),
        ))
        .await
        .expect("patch");
    assert_eq!(response.status(), StatusCode::OK);

    let payload = read_json(response).await;
    assert_eq!(
        payload["schemas"],
        json!(["urn:ietf:params:scim:api:messages:2.0:PatchOp"])
    );
    assert_eq!(
        payload["Operations"],
        json!([{ "op": "replace", "value": { "name": { "givenName": "Alicia" } } }])
    );
    assert_eq!(directory.patches_for("alice").await.len(), 1);

    let response = app
        .oneshot(get("/api/users/alice/profile"))
        .await
        .expect("profile");
    let payload = read_json(response).await;
    assert_eq!(payload["values"]["name.givenName"], "Alicia");
    // Sibling name members survive a partial replace
    assert_eq!(payload["values"]["name.familyName"], "Liddell");
}

#[tokio::test]
async fn api_patch_rejects_blank_required_field() {
    let (app, directory) = test_app();

    let response = app
        .oneshot(patch_json(
            "/api/users/alice/profile",
            json!({ "userName": "" }),
        ))
        .await
        .expect("patch");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let payload = read_json(response).await;
    assert_eq!(payload["code"], "VALIDATION_FAILED");
    assert_eq!(payload["fields"][0]["name"], "userName");
    assert!(directory.patches_for("alice").await.is_empty());
}

#[tokio::test]
async fn api_patch_without_editable_values_is_bad_request() {
    let (app, _) = test_app();

    let response = app
        .oneshot(patch_json(
            "/api/users/alice/profile",
            json!({ "roles.default": "Internal/admin" }),
        ))
        .await
        .expect("patch");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn profile_page_renders_form_and_danger_zone() {
    let (app, _) = test_app();

    let response = app
        .oneshot(get("/users/alice/profile"))
        .await
        .expect("page");
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_text(response).await;
    assert!(body.contains("name=\"name.givenName\""));
    assert!(body.contains("value=\"Alice\""));
    assert!(body.contains("name=\"userName__domain\""));
    assert!(body.contains("Danger Zone"));
    assert!(!body.contains("name=\"roles.default\""));
}

#[tokio::test]
async fn profile_page_for_missing_user_is_not_found() {
    let (app, _) = test_app();

    let response = app
        .oneshot(get("/users/nobody/profile"))
        .await
        .expect("page");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(read_text(response).await.contains("Profile retrieval error"));
}

#[tokio::test]
async fn form_submission_updates_profile() {
    let (app, directory) = test_app();

    let response = app
        .oneshot(post_form(
            "/users/alice/profile",
            "userName=alice&userName__domain=PRIMARY&name.givenName=Alicia&emails=alicia%40example.com",
        ))
        .await
        .expect("update");
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_text(response).await;
    assert!(body.contains("Profile updated successfully"));
    assert!(body.contains("value=\"Alicia\""));

    let patches = directory.patches_for("alice").await;
    assert_eq!(patches.len(), 1);
    let sent = serde_json::to_value(&patches[0]).expect("patch json");
    assert_eq!(
        sent["Operations"],
        json!([
            { "op": "replace", "value": { "userName": "PRIMARY/alice" } },
            { "op": "replace", "value": { "name": { "givenName": "Alicia" } } },
            { "op": "replace", "value": { "emails": ["alicia@example.com"] } }
        ])
    );
}

#[tokio::test]
async fn form_submission_with_blank_required_field_is_rejected() {
    let (app, directory) = test_app();

    let response = app
        .oneshot(post_form(
            "/users/alice/profile",
            "userName=+&userName__domain=PRIMARY",
        ))
        .await
        .expect("update");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(read_text(response).await.contains("Username is required"));
    assert!(directory.patches_for("alice").await.is_empty());
}

#[tokio::test]
async fn delete_user_requires_typed_user_name() {
    let (app, _) = test_app();

    let response = app
        .clone()
        .oneshot(post_form("/users/alice/delete", "assertion=alice"))
        .await
        .expect("delete");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(read_text(response).await.contains("Confirmation failed"));

    let response = app
        .clone()
        .oneshot(post_form("/users/alice/delete", "assertion=PRIMARY%2Falice"))
        .await
        .expect("delete");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/");

    let response = app
        .oneshot(get("/api/users/alice/profile"))
        .await
        .expect("profile");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn api_required_message_uses_field_label() {
    let directory = InMemoryDirectory::new()
        .with_schemas(vec![
            SchemaDescriptor::new("userName", "Username").required(true),
            SchemaDescriptor::new("profileUrl", "Profile URL").required(true),
        ])
        .with_user(
            ProfileRecord::try_from(json!({ "id": "bob", "userName": "bob" }))
                .expect("profile"),
        );
    let (app, directory) = test_app_with(directory);

    let response = app
        .oneshot(patch_json(
            "/api/users/bob/profile",
            json!({ "profileUrl": "" }),
        ))
        .await
        .expect("patch");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let payload = read_json(response).await;
    assert_eq!(payload["fields"][0]["name"], "profileUrl");
    assert_eq!(payload["fields"][0]["message"], "Profile Image URL is required");
    assert!(directory.patches_for("bob").await.is_empty());
}
