mod common;

use authledger_backend::errors::AuthError;
use authledger_backend::types::dto::{Credentials, ProfileUpdate};
use serde_json::{Value, json};

#[tokio::test]
async fn test_display_name_update_records_only_that_field() {
    let app = common::setup_test_app().await;
    let id = app
        .auth_service
        .register(Credentials::new("frank@example.com", "pw1"))
        .await
        .unwrap();

    let updated = app
        .auth_service
        .update_profile(&id, ProfileUpdate::display_name("Frank"))
        .await
        .unwrap();

    assert_eq!(updated.display_name.as_deref(), Some("Frank"));
    assert!(updated.updated_at >= updated.created_at);

    let events = common::events_of_type(&app.connections.audit, "UPDATE_DATA").await;
    assert_eq!(events.len(), 1);
    let change: Value = serde_json::from_str(events[0].change.as_deref().unwrap()).unwrap();
    assert_eq!(change["new_data"], json!({"display_name": "Frank"}));
    assert_eq!(change["old_data"], json!({"display_name": null}));
}

#[tokio::test]
async fn test_email_update_then_login_with_new_email() {
    let app = common::setup_test_app().await;
    let id = app
        .auth_service
        .register(Credentials::new("grace@example.com", "pw1"))
        .await
        .unwrap();

    app.auth_service
        .update_profile(&id, ProfileUpdate::email("grace@new.example.com"))
        .await
        .unwrap();

    assert!(app
        .auth_service
        .login(Credentials::new("grace@new.example.com", "pw1"))
        .await
        .is_ok());
    assert!(matches!(
        app.auth_service
            .login(Credentials::new("grace@example.com", "pw1"))
            .await,
        Err(AuthError::Forbidden(_))
    ));

    let events = common::events_of_type(&app.connections.audit, "UPDATE_DATA").await;
    let change: Value = serde_json::from_str(events[0].change.as_deref().unwrap()).unwrap();
    assert_eq!(change["old_data"], json!({"email": "grace@example.com"}));
    assert_eq!(change["new_data"], json!({"email": "grace@new.example.com"}));
}

#[tokio::test]
async fn test_email_taken_by_other_account_is_conflict() {
    let app = common::setup_test_app().await;
    app.auth_service
        .register(Credentials::new("heidi@example.com", "pw1"))
        .await
        .unwrap();
    let ivan = app
        .auth_service
        .register(Credentials::new("ivan@example.com", "pw1"))
        .await
        .unwrap();

    let result = app
        .auth_service
        .update_profile(&ivan, ProfileUpdate::email("heidi@example.com"))
        .await;

    assert!(matches!(result, Err(AuthError::Conflict(_))));
    assert_eq!(app.auth_service.get_self(&ivan).await.unwrap().email, "ivan@example.com");
    assert!(common::events_of_type(&app.connections.audit, "UPDATE_DATA").await.is_empty());
}

#[tokio::test]
async fn test_empty_update_is_bad_request() {
    let app = common::setup_test_app().await;
    let id = app
        .auth_service
        .register(Credentials::new("judy@example.com", "pw1"))
        .await
        .unwrap();

    let result = app.auth_service.update_profile(&id, ProfileUpdate::default()).await;

    assert!(matches!(result, Err(AuthError::BadRequest(_))));
}
