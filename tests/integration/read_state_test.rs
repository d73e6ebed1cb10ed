//! Integration tests for read, done and remove marks.

use msgcenter_core::types::PageRequest;
use msgcenter_database::query::{InboxFilter, InboxView};

use crate::helpers::{self, TestApp, at};

fn unread() -> InboxFilter {
    InboxFilter {
        is_read: Some(false),
        ..Default::default()
    }
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_mark_read_is_idempotent() {
    let app = TestApp::new().await;
    let id = app.event("gitee", "someone", at(0)).await;
    app.follow(&id, at(0)).await;

    let inbox = app.inbox();
    let ctx = app.ctx();
    assert_eq!(inbox.mark_read(&ctx, InboxView::Follow, &unread()).await.unwrap(), 1);
    assert_eq!(inbox.mark_read(&ctx, InboxView::Follow, &unread()).await.unwrap(), 0);

    let page = inbox
        .list(&ctx, InboxView::Follow, &unread(), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.total_count, 0);

    let page = inbox
        .list(&ctx, InboxView::Follow, &InboxFilter::default(), PageRequest::default())
        .await
        .unwrap();
    assert!(page.items[0].is_read);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_mark_targets_only_given_keys() {
    let app = TestApp::new().await;
    let first = app.event("gitee", "someone", at(0)).await;
    let second = app.event("gitee", "someone", at(1)).await;
    app.related(&first, at(0)).await;
    app.related(&second, at(1)).await;

    let filter = InboxFilter {
        keys: Some(vec![first.clone()]),
        ..Default::default()
    };
    let inbox = app.inbox();
    assert_eq!(inbox.mark_read(&app.ctx(), InboxView::Related, &filter).await.unwrap(), 1);

    let page = inbox
        .list(&app.ctx(), InboxView::Related, &unread(), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.total_count, 1);
    assert_eq!(page.items[0].event_id, second);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_remove_hides_rows() {
    let app = TestApp::new().await;
    let id = app.event("eur", "builder", at(0)).await;
    app.follow(&id, at(0)).await;

    let inbox = app.inbox();
    assert_eq!(inbox.remove(&app.ctx(), InboxView::Follow, &InboxFilter::default()).await.unwrap(), 1);
    assert_eq!(inbox.remove(&app.ctx(), InboxView::Follow, &InboxFilter::default()).await.unwrap(), 0);

    let page = inbox
        .list(&app.ctx(), InboxView::Follow, &InboxFilter::default(), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.total_count, 0);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_mark_done_covers_the_whole_business() {
    let app = TestApp::new().await;
    let issue = helpers::business_id("issue");
    let first = app.event_for("gitee", "someone", at(0), Some(&issue)).await;
    let second = app.event_for("gitee", "someone", at(1), Some(&issue)).await;
    app.todo(&issue, &first, at(0), None).await;
    app.todo(&issue, &second, at(1), None).await;

    let filter = InboxFilter {
        keys: Some(vec![issue.clone()]),
        ..Default::default()
    };
    let inbox = app.inbox();
    assert_eq!(inbox.mark_done(&app.ctx(), InboxView::TodoLatest, &filter).await.unwrap(), 2);

    let pending = InboxFilter {
        is_done: Some(false),
        ..Default::default()
    };
    let page = inbox
        .list(&app.ctx(), InboxView::Todo, &pending, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.total_count, 0);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_mark_read_on_every_todo_spares_hidden_rows() {
    let app = TestApp::new().await;
    let issue = helpers::business_id("issue");
    let older = app.event_for("gitee", "someone", at(0), Some(&issue)).await;
    let newer = app.event_for("gitee", "someone", at(60), Some(&issue)).await;
    app.todo(&issue, &older, at(0), None).await;
    app.todo(&issue, &newer, at(60), None).await;

    let recent = InboxFilter {
        start_time: Some(at(30).to_rfc3339()),
        ..Default::default()
    };
    let inbox = app.inbox();
    let shown = inbox
        .list(&app.ctx(), InboxView::Todo, &recent, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(shown.total_count, 1);
    assert_eq!(inbox.mark_read(&app.ctx(), InboxView::Todo, &recent).await.unwrap(), 1);

    let left = inbox
        .list(&app.ctx(), InboxView::Todo, &unread(), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(left.total_count, 1);
    assert_eq!(left.items[0].event_id, older);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_mark_all_read_spans_channels() {
    let app = TestApp::new().await;
    let followed = app.event("gitee", "someone", at(0)).await;
    let related = app.event("gitee", "someone", at(1)).await;
    let issue = helpers::business_id("issue");
    let todo = app.event_for("gitee", "someone", at(2), Some(&issue)).await;
    app.follow(&followed, at(0)).await;
    app.related(&related, at(1)).await;
    app.todo(&issue, &todo, at(2), None).await;

    let inbox = app.inbox();
    assert_eq!(inbox.mark_all_read(&app.ctx()).await.unwrap(), 3);

    let page = inbox
        .list(&app.ctx(), InboxView::All, &unread(), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.total_count, 0);
}
