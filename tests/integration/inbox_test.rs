//! Integration tests for inbox pages.

use chrono::{Duration, Utc};

use msgcenter_core::traits::SecondaryIdentity;
use msgcenter_core::types::PageRequest;
use msgcenter_database::query::{InboxFilter, InboxView, MeetingWindow};

use crate::helpers::{self, TestApp, at};

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_follow_pages_are_ordered_and_counted() {
    let app = TestApp::new().await;
    let mut ids = Vec::new();
    for minute in 0..5 {
        let id = app.event("gitee", "someone", at(minute)).await;
        app.follow(&id, at(minute)).await;
        ids.push(id);
    }

    let inbox = app.inbox();
    let page = inbox
        .list(&app.ctx(), InboxView::Follow, &InboxFilter::default(), PageRequest::new(2, 2))
        .await
        .unwrap();

    assert_eq!(page.total_count, 5);
    assert_eq!(page.total_pages, 3);
    let got: Vec<_> = page.items.iter().map(|m| m.event_id.clone()).collect();
    assert_eq!(got, vec![ids[2].clone(), ids[1].clone()]);
    assert!(page.items.iter().all(|m| m.channel == "follow" && m.recipient_id == app.recipient));
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_page_past_the_end_keeps_total() {
    let app = TestApp::new().await;
    for minute in 0..3 {
        let id = app.event("cve", "someone", at(minute)).await;
        app.follow(&id, at(minute)).await;
    }

    let page = app
        .inbox()
        .list(&app.ctx(), InboxView::Follow, &InboxFilter::default(), PageRequest::new(9, 2))
        .await
        .unwrap();

    assert!(page.items.is_empty());
    assert_eq!(page.total_count, 3);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_empty_inbox_reports_zero() {
    let app = TestApp::new().await;
    let page = app
        .inbox()
        .list(&app.ctx(), InboxView::All, &InboxFilter::default(), PageRequest::default())
        .await
        .unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total_count, 0);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_rollup_yields_one_row_per_business_id() {
    let app = TestApp::new().await;
    let issue = helpers::business_id("issue");
    let first = app.event_for("gitee", "someone", at(0), Some(&issue)).await;
    let second = app.event_for("gitee", "someone", at(5), Some(&issue)).await;
    app.todo(&issue, &first, at(0), None).await;
    app.todo(&issue, &second, at(5), None).await;

    let inbox = app.inbox();
    let latest = inbox
        .list(&app.ctx(), InboxView::TodoLatest, &InboxFilter::default(), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(latest.total_count, 1);
    assert_eq!(latest.items[0].event_id, second);
    assert_eq!(latest.items[0].business_id.as_deref(), Some(issue.as_str()));
    assert_eq!(latest.items[0].is_done, Some(false));

    let every = inbox
        .list(&app.ctx(), InboxView::Todo, &InboxFilter::default(), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(every.total_count, 2);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_rollup_tie_breaks_on_row_id() {
    let app = TestApp::new().await;
    let issue = helpers::business_id("issue");
    let older = app.event_for("gitee", "someone", at(0), Some(&issue)).await;
    let newer = app.event_for("gitee", "someone", at(1), Some(&issue)).await;
    app.todo(&issue, &older, at(3), None).await;
    app.todo(&issue, &newer, at(3), None).await;

    let latest = app
        .inbox()
        .list(&app.ctx(), InboxView::TodoLatest, &InboxFilter::default(), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(latest.total_count, 1);
    assert_eq!(latest.items[0].event_id, newer);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_related_bot_toggle() {
    let app = TestApp::new().await;
    let human = app.event("gitee", "octocat", at(0)).await;
    let bot = app.event("gitee", "ci-robot", at(1)).await;
    app.related(&human, at(0)).await;
    app.related(&bot, at(1)).await;

    let inbox = app.inbox();
    let humans = InboxFilter {
        is_bot: Some(false),
        ..Default::default()
    };
    let page = inbox
        .list(&app.ctx(), InboxView::Related, &humans, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.total_count, 1);
    assert_eq!(page.items[0].event_id, human);

    let bots = InboxFilter {
        is_bot: Some(true),
        ..Default::default()
    };
    let page = inbox
        .list(&app.ctx(), InboxView::Related, &bots, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.items[0].event_id, bot);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_missing_identity_short_circuits() {
    let app = TestApp::new().await;
    let id = app.event("gitee", "someone", at(0)).await;
    app.related(&id, at(0)).await;

    let page = app
        .inbox_with(SecondaryIdentity::Absent)
        .list(&app.ctx(), InboxView::Related, &InboxFilter::default(), PageRequest::default())
        .await
        .unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total_count, 0);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_meeting_window() {
    let app = TestApp::new().await;
    let upcoming = helpers::business_id("meeting");
    let past = helpers::business_id("meeting");
    let up_event = app.event_for("meeting", "host", at(0), Some(&upcoming)).await;
    let past_event = app.event_for("meeting", "host", at(1), Some(&past)).await;
    app.todo(&upcoming, &up_event, at(0), Some(Utc::now() + Duration::days(2))).await;
    app.todo(&past, &past_event, at(1), Some(Utc::now() - Duration::days(2))).await;

    let filter = InboxFilter {
        meeting: Some(MeetingWindow::Upcoming),
        ..Default::default()
    };
    let page = app
        .inbox()
        .list(&app.ctx(), InboxView::Meeting, &filter, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.total_count, 1);
    assert_eq!(page.items[0].business_id.as_deref(), Some(upcoming.as_str()));
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_all_view_unions_channels() {
    let app = TestApp::new().await;
    let followed = app.event("gitee", "someone", at(0)).await;
    let related = app.event("gitee", "someone", at(1)).await;
    let issue = helpers::business_id("issue");
    let todo = app.event_for("gitee", "someone", at(2), Some(&issue)).await;
    app.follow(&followed, at(0)).await;
    app.related(&related, at(1)).await;
    app.todo(&issue, &todo, at(2), None).await;

    let page = app
        .inbox()
        .list(&app.ctx(), InboxView::All, &InboxFilter::default(), PageRequest::default())
        .await
        .unwrap();
    let channels: Vec<_> = page.items.iter().map(|m| m.channel.as_str()).collect();
    assert_eq!(page.total_count, 3);
    assert_eq!(channels, vec!["todo", "related", "follow"]);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_uri_sourced_events_match_source_filters() {
    let app = TestApp::new().await;
    let meeting = helpers::business_id("meeting");
    let event = app
        .event_for("https://www.openeuler.org/meeting", "host", at(0), Some(&meeting))
        .await;
    app.todo(&meeting, &event, at(0), Some(Utc::now() + Duration::days(1))).await;
    let followed = app.event("https://gitee.com", "someone", at(1)).await;
    app.follow(&followed, at(1)).await;

    let inbox = app.inbox();
    let page = inbox
        .list(&app.ctx(), InboxView::Meeting, &InboxFilter::default(), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.total_count, 1);
    assert_eq!(page.items[0].event_id, event);

    for source in ["gitee", "https://gitee.com/"] {
        let filter = InboxFilter {
            source: Some(source.into()),
            ..Default::default()
        };
        let page = inbox
            .list(&app.ctx(), InboxView::Follow, &filter, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total_count, 1, "{source}");
        assert_eq!(page.items[0].event_id, followed);
    }
}
