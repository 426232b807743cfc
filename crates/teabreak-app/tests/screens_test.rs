//! Screen orchestration against a mock TeaBreak server.

mod helpers;

use std::time::Duration;

use helpers::{admin, app, mount_users, ok, reader, rejected};
use serde_json::json;
use teabreak_app::{AdminTab, EmailLookup, FriendsTab, PaperFilters};
use teabreak_core::{Error, RecordKey, RefreshScope, RequestStatus, Session};
use teabreak_pipeline::{PageRequest, PipelineStatus};
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// PAPERS
// =============================================================================

async fn mount_papers(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/Papers/GetAllPapers"))
        .respond_with(ok(json!([
            {"id": 1, "title": "Deep Learning", "conference": "ICML 2023", "createTime": "2023-04-01T10:00:00"},
            {"id": 2, "title": "Graph Nets", "conference": "NeurIPS", "createTime": "2022-12-01 08:00:00"},
            {"id": 3, "title": "Attention", "conference": "ICML 2021", "createTime": "2021-06-01"}
        ])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/PaperAuthor/GetAuthorList"))
        .and(query_param("paperId", "1"))
        .respond_with(ok(json!([{"id": 5, "username": "dana"}])))
        .mount(server)
        .await;
    for id in ["2", "3"] {
        Mock::given(method("GET"))
            .and(path("/PaperAuthor/GetAuthorList"))
            .and(query_param("paperId", id))
            .respond_with(ok(json!(null)))
            .mount(server)
            .await;
    }
}

#[tokio::test]
async fn test_papers_require_sign_in() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/Papers/GetAllPapers"))
        .respond_with(ok(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let result = app(&server)
        .papers()
        .load(&Session::anonymous(), &PaperFilters::default(), PageRequest::default())
        .await;

    assert!(matches!(result, Err(Error::Unauthorized(_))));
}

#[tokio::test]
async fn test_papers_conference_and_year_facets() {
    let server = MockServer::start().await;
    mount_papers(&server).await;
    let screen = app(&server).papers();

    let filters = PaperFilters::default().with_conference("ICML");
    let view = screen
        .load(&reader(), &filters, PageRequest::default())
        .await
        .unwrap();

    assert_eq!(view.status, PipelineStatus::Ready);
    assert_eq!(view.total_items, 2);
    let ids: Vec<_> = view.items.iter().filter_map(|r| r.key()).collect();
    assert_eq!(ids, vec![RecordKey::new("1"), RecordKey::new("3")]);

    let view = screen.apply_filters(&filters.clone().with_year("2021")).await;
    assert_eq!(view.total_items, 1);
    assert_eq!(view.items[0].key(), Some(RecordKey::new("3")));
}

#[tokio::test]
async fn test_papers_search_matches_enriched_authors() {
    let server = MockServer::start().await;
    mount_papers(&server).await;
    let screen = app(&server).papers();

    let filters = PaperFilters::default().with_text("  DANA ");
    let view = screen
        .load(&reader(), &filters, PageRequest::default())
        .await
        .unwrap();

    assert_eq!(view.total_items, 1);
    assert_eq!(view.items[0].key(), Some(RecordKey::new("1")));
    assert_eq!(view.items[0].get("year"), Some(&json!(2023)));
}

#[tokio::test]
async fn test_papers_filter_options() {
    let server = MockServer::start().await;
    mount_papers(&server).await;
    let screen = app(&server).papers();
    screen
        .load(&reader(), &PaperFilters::default(), PageRequest::default())
        .await
        .unwrap();

    let options = screen.filter_options().await;

    assert_eq!(options.conferences, vec!["ICML 2021", "ICML 2023", "NeurIPS"]);
    assert_eq!(options.years, vec!["2021", "2022", "2023"]);
}

#[tokio::test]
async fn test_papers_paging() {
    let server = MockServer::start().await;
    mount_papers(&server).await;
    let screen = app(&server).papers();

    let view = screen
        .load(&reader(), &PaperFilters::default(), PageRequest::new(2, 2))
        .await
        .unwrap();
    assert_eq!(view.total_pages, 2);
    assert_eq!(view.items.len(), 1);
    assert_eq!((view.first_item, view.last_item), (3, 3));

    let view = screen.set_page_size(10).await;
    assert_eq!(view.page_number, 1);
    assert_eq!(view.items.len(), 3);
}

#[tokio::test]
async fn test_delete_paper_refreshes_list() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/Papers/GetAllPapers"))
        .respond_with(ok(json!([{"id": 1, "title": "Deep Learning"}])))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/PaperAuthor/GetAuthorList"))
        .respond_with(ok(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/Papers/DeletePaper"))
        .and(body_string_contains("paperId=1"))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;
    let screen = app(&server).papers();
    screen
        .load(&admin(), &PaperFilters::default(), PageRequest::default())
        .await
        .unwrap();

    let outcome = screen.delete_paper(&admin(), &RecordKey::new("1")).await.unwrap();

    assert!(outcome.invalidates(RefreshScope::Papers));
}

// =============================================================================
// PAPER DETAIL
// =============================================================================

async fn mount_paper(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/Papers/GetPaperById"))
        .and(query_param("paperId", "4"))
        .respond_with(ok(json!({"id": 4, "title": "Tea", "createTime": "2024-01-02T00:00:00"})))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/PaperStatus/GetViewCount"))
        .respond_with(ok(json!(5)))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/PaperStatus/GetDownloadCount"))
        .respond_with(ok(json!(null)))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/PaperStatus/AddViewCount"))
        .respond_with(ok(json!(null)))
        .mount(server)
        .await;
}

fn thread() -> serde_json::Value {
    json!([
        {"id": 10, "userId": 7, "content": "first", "children": [
            {"id": 11, "pid": 10, "userId": 8, "content": "reply"}
        ]},
        {"id": 12, "userId": 9, "content": "second"}
    ])
}

#[tokio::test]
async fn test_paper_detail_load() {
    let server = MockServer::start().await;
    mount_paper(&server).await;
    Mock::given(method("GET"))
        .and(path("/comments/GetAllCommentList"))
        .and(query_param("paperId", "4"))
        .respond_with(ok(thread()))
        .mount(&server)
        .await;
    // User 9 is unknown to the mock server.
    mount_users(&server, &[("7", "reader"), ("8", "writer")]).await;

    let detail = app(&server)
        .paper(RecordKey::new("4"))
        .load(&reader())
        .await
        .unwrap();

    assert_eq!(detail.paper.year, Some(2024));
    assert_eq!((detail.stats.views, detail.stats.downloads, detail.stats.comments), (5, 0, 3));
    let reply = &detail.comments[0].children[0];
    assert_eq!(reply.user.as_ref().and_then(|u| u.username.as_deref()), Some("writer"));
    assert!(detail.comments[1].enrichment_error);
    assert!(detail.comments[1].user.is_none());
}

#[tokio::test]
async fn test_reply_inserted_locally_when_refresh_fails() {
    let server = MockServer::start().await;
    mount_paper(&server).await;
    mount_users(&server, &[("7", "reader"), ("8", "writer"), ("9", "editor")]).await;
    Mock::given(method("GET"))
        .and(path("/comments/GetAllCommentList"))
        .respond_with(ok(thread()))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/comments/GetAllCommentList"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/comments/AddChildComment"))
        .and(body_string_contains("pid=11"))
        .respond_with(ok(json!({"id": 99, "createAt": "2024-05-01 10:00:00"})))
        .expect(1)
        .mount(&server)
        .await;

    let screen = app(&server).paper(RecordKey::new("4"));
    screen.load(&reader()).await.unwrap();
    let outcome = screen
        .reply(&reader(), &RecordKey::new("11"), "thanks")
        .await
        .unwrap();

    assert_eq!(outcome.created, Some(RecordKey::new("99")));
    let comments = screen.comments().await;
    let inserted = comments[0].find(&RecordKey::new("99")).unwrap();
    assert_eq!(inserted.pid, Some(RecordKey::new("11")));
    assert_eq!(inserted.content.as_deref(), Some("thanks"));
    assert_eq!(inserted.user.as_ref().and_then(|u| u.username.as_deref()), Some("reader"));
}

#[tokio::test]
async fn test_delete_comment_refreshes_thread() {
    let server = MockServer::start().await;
    mount_paper(&server).await;
    mount_users(&server, &[("7", "reader"), ("8", "writer"), ("9", "editor")]).await;
    Mock::given(method("GET"))
        .and(path("/comments/GetAllCommentList"))
        .respond_with(ok(thread()))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/comments/GetAllCommentList"))
        .respond_with(ok(json!([{"id": 12, "userId": 9, "content": "second"}])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/comments/DeleteComment"))
        .respond_with(ok(json!(null)))
        .mount(&server)
        .await;

    let screen = app(&server).paper(RecordKey::new("4"));
    screen.load(&reader()).await.unwrap();
    screen.delete_comment(&reader(), &RecordKey::new("10")).await.unwrap();

    let comments = screen.comments().await;
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].id, RecordKey::new("12"));
    assert_eq!(comments[0].user.as_ref().and_then(|u| u.username.as_deref()), Some("editor"));
}

// =============================================================================
// FRIENDS
// =============================================================================

#[tokio::test]
async fn test_received_requests_search_by_sender() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/friendRequests/GetReceivedApplyList"))
        .respond_with(ok(json!([
            {"id": 1, "fromUserId": 7, "message": "hi"},
            {"id": 2, "fromUserId": 8}
        ])))
        .mount(&server)
        .await;
    mount_users(&server, &[("7", "reader"), ("8", "writer")]).await;
    let screen = app(&server).friends();

    let view = screen
        .load(&reader(), FriendsTab::Received, "writer@", PageRequest::default())
        .await
        .unwrap();

    assert_eq!(view.total_items, 1);
    assert_eq!(view.items[0].key(), Some(RecordKey::new("2")));

    let view = screen.search(FriendsTab::Received, "").await;
    assert_eq!(view.total_items, 2);
}

#[tokio::test]
async fn test_accepting_request_refreshes_request_and_friend_tabs() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/friendRequests/GetReceivedApplyList"))
        .respond_with(ok(json!([])))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/friendRequests/GetApplyFriendList"))
        .respond_with(ok(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/friends/GetAllFriendList"))
        .respond_with(ok(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/friends/GetAllFollowList"))
        .respond_with(ok(json!([])))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/friendRequests/HandleFriendApply"))
        .and(body_string_contains("status=1"))
        .respond_with(ok(json!(null)))
        .mount(&server)
        .await;
    let screen = app(&server).friends();
    screen
        .load(&reader(), FriendsTab::Received, "", PageRequest::default())
        .await
        .unwrap();

    let outcome = screen
        .handle_request(&reader(), &RecordKey::new("1"), RequestStatus::Accepted)
        .await
        .unwrap();

    assert!(outcome.ok);
}

#[tokio::test]
async fn test_failed_follow_refreshes_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/friends/AddFollow"))
        .respond_with(rejected(500, "already following"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/friends/GetAllFollowList"))
        .respond_with(ok(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let outcome = app(&server)
        .friends()
        .follow(&reader(), &RecordKey::new("8"))
        .await
        .unwrap();

    assert!(!outcome.ok);
    assert_eq!(outcome.message.as_deref(), Some("already following"));
}

// =============================================================================
// ADMINISTRATION
// =============================================================================

#[tokio::test]
async fn test_admin_requires_admin_role() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Users/GetAllUsers"))
        .respond_with(ok(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let result = app(&server)
        .admin()
        .load(&reader(), AdminTab::Users, "", PageRequest::default())
        .await;

    assert!(matches!(result, Err(Error::Forbidden(_))));
}

#[tokio::test]
async fn test_admin_delete_user_refreshes_users() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Users/GetAllUsers"))
        .respond_with(ok(json!([{"id": 7, "username": "reader", "email": "reader@tea.break"}])))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/Users/DeleteUser"))
        .and(body_string_contains("userId=7"))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;
    let screen = app(&server).admin();
    screen
        .load(&admin(), AdminTab::Users, "", PageRequest::default())
        .await
        .unwrap();

    let outcome = screen.delete_user(&admin(), &RecordKey::new("7")).await.unwrap();

    assert!(outcome.invalidates(RefreshScope::Users));
}

#[tokio::test]
async fn test_admin_applications_carry_applicant() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ReporterApply/GetAllRegisterList"))
        .respond_with(ok(json!([
            {"id": 1, "userId": 7, "applyNote": "I cover ML venues"},
            {"id": 2, "userId": 8, "applyNote": "Systems"}
        ])))
        .mount(&server)
        .await;
    mount_users(&server, &[("7", "reader"), ("8", "writer")]).await;
    let screen = app(&server).admin();

    let view = screen
        .load(&admin(), AdminTab::Applications, "reader@tea", PageRequest::default())
        .await
        .unwrap();

    assert_eq!(view.total_items, 1);
    assert_eq!(view.items[0].get("username"), Some(&json!("reader")));

    let view = screen
        .search(&admin(), AdminTab::Applications, "systems")
        .await
        .unwrap();
    assert_eq!(view.items[0].get("email"), Some(&json!("writer@tea.break")));
}

// =============================================================================
// SESSION AND PROFILE
// =============================================================================

#[tokio::test]
async fn test_sign_in_loads_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/Users/UserLogin"))
        .respond_with(ok(json!(null)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/Users/GetInfo"))
        .respond_with(ok(json!({"id": 1, "username": "root", "role": 2})))
        .mount(&server)
        .await;
    let mut app = app(&server);

    let session = app.sign_in("root@tea.break", "secret").await.unwrap();

    assert!(session.is_admin());
}

#[tokio::test]
async fn test_rejected_sign_in_is_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/Users/UserLogin"))
        .respond_with(rejected(401, "wrong password"))
        .mount(&server)
        .await;
    let mut app = app(&server);

    let err = app.sign_in("root@tea.break", "nope").await.unwrap_err();

    assert!(matches!(err, Error::Unauthorized(ref m) if m == "wrong password"));
    assert!(!app.session().is_signed_in());
}

#[tokio::test]
async fn test_profile_papers_carry_counters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Users/GetInfo"))
        .respond_with(ok(json!({"id": 7, "username": "reader", "role": 1})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/Papers/GetUserPaperListByPage"))
        .and(query_param("userId", "7"))
        .respond_with(ok(json!({"records": [{"id": 3, "title": "Steeping"}], "total": 1})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/PaperStatus/GetViewCount"))
        .and(query_param("paperId", "3"))
        .respond_with(ok(json!(12)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/PaperStatus/GetDownloadCount"))
        .and(query_param("paperId", "3"))
        .respond_with(ok(json!(null)))
        .mount(&server)
        .await;

    let profile = app(&server)
        .profile()
        .load(&reader(), PageRequest::default())
        .await
        .unwrap();

    assert_eq!(profile.user.username.as_deref(), Some("reader"));
    assert_eq!(profile.papers.items[0].get("views"), Some(&json!(12)));
    assert_eq!(profile.papers.items[0].get("downloads"), Some(&json!(0)));
}

#[tokio::test]
async fn test_email_search_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Users/GetInfoByEmail"))
        .and(query_param("email", "writer@tea.break"))
        .respond_with(ok(json!({"id": 8, "username": "writer"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/Users/GetInfoByEmail"))
        .and(query_param("email", "ghost@tea.break"))
        .respond_with(rejected(404, "no such user"))
        .mount(&server)
        .await;
    let search = app(&server).email_search().with_debounce(Duration::from_millis(1));

    match search.search("writer@tea.break").await {
        EmailLookup::Found(user) => assert_eq!(user.username.as_deref(), Some("writer")),
        other => panic!("unexpected lookup result: {:?}", other),
    }
    assert_eq!(search.search("ghost@tea.break").await, EmailLookup::NotFound);
}
