//! Integration tests for subscription storage.

use serde_json::json;
use uuid::Uuid;

use msgcenter_core::error::ErrorKind;
use msgcenter_core::types::SubscriptionId;
use msgcenter_filter::SubscribeRequest;
use msgcenter_service::RequestContext;

use crate::helpers::TestApp;

fn owner() -> RequestContext {
    let name = format!("owner-{}", Uuid::new_v4().simple());
    RequestContext::new(name.clone(), name)
}

fn issue_request(mode_name: &str) -> SubscribeRequest {
    SubscribeRequest {
        source: "https://gitee.com/".into(),
        event_type: "issues".into(),
        mode_name: mode_name.into(),
        repos: Some("openeuler/kernel,src-openeuler/*".into()),
        is_bot: Some(false),
        ..Default::default()
    }
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_create_stores_canonical_filter() {
    let app = TestApp::new().await;
    let ctx = owner();
    let service = app.subscriptions();

    let created = service.create(&ctx, &issue_request("kernel issues")).await.unwrap();
    assert_eq!(created.source, "gitee");
    assert_eq!(created.event_type, "issue");
    assert_eq!(created.spec_version, "1.0");
    assert_eq!(created.user_name.as_deref(), Some(ctx.user_name.as_str()));
    assert_eq!(
        created.mode_filter["IssueEvent.Repository.FullName"],
        json!("oneof=src-openeuler/* openeuler/kernel")
    );

    let listed = service.list(&ctx, Some("gitee")).await.unwrap();
    assert!(listed.iter().any(|s| s.id == created.id));
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_duplicate_name_conflicts() {
    let app = TestApp::new().await;
    let ctx = owner();
    let service = app.subscriptions();

    service.create(&ctx, &issue_request("dup")).await.unwrap();
    let err = service.create(&ctx, &issue_request("dup")).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_rename_and_delete() {
    let app = TestApp::new().await;
    let ctx = owner();
    let service = app.subscriptions();

    let created = service.create(&ctx, &issue_request("before")).await.unwrap();
    let renamed = service.rename(&ctx, created.id, "after").await.unwrap();
    assert_eq!(renamed.mode_name, "after");

    service.delete(&ctx, created.id).await.unwrap();
    let err = service.delete(&ctx, created.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let listed = service.list(&ctx, None).await.unwrap();
    assert!(listed.iter().all(|s| s.id != created.id));
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_other_users_subscription_is_not_found() {
    let app = TestApp::new().await;
    let service = app.subscriptions();
    let created = service.create(&owner(), &issue_request("private")).await.unwrap();

    let err = service.rename(&owner(), created.id, "stolen").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    let err = service.delete(&owner(), SubscriptionId::new()).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_default_subscription_is_read_only() {
    let app = TestApp::new().await;
    let id = SubscriptionId::new();
    sqlx::query(
        "INSERT INTO subscription (id, source, event_type, mode_name, spec_version, mode_filter, is_default) \
         VALUES ($1, 'cve', 'cve', $2, '1.0', '{}'::jsonb, TRUE)",
    )
    .bind(id)
    .bind(format!("default-{id}"))
    .execute(&app.pool)
    .await
    .expect("insert default subscription");

    let ctx = owner();
    let service = app.subscriptions();
    let err = service.rename(&ctx, id, "mine now").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);
    let err = service.delete(&ctx, id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);

    let listed = service.list(&ctx, Some("cve")).await.unwrap();
    assert!(listed.iter().any(|s| s.id == id && s.is_default));
}
