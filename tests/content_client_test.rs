//! HTTP contract tests for the content platform client, against mockito.

use mockito::Server;

use sitemender::domain::models::{ContentCollection, ContentUpdate, WebsiteCredentials};
use sitemender::domain::ports::{ContentSource, ContentSourceError};
use sitemender::infrastructure::content::{ContentClient, ContentClientConfig};

fn credentials(base_url: &str) -> WebsiteCredentials {
    WebsiteCredentials {
        base_url: base_url.to_string(),
        username: "admin".to_string(),
        app_password: "app-pass".to_string(),
    }
}

fn client() -> ContentClient {
    ContentClient::new(ContentClientConfig { timeout_secs: 5 }).unwrap()
}

#[tokio::test]
async fn fetch_recent_parses_items_and_tags_collection() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/content/posts")
        .match_query(mockito::Matcher::AllOf(vec![
            mockito::Matcher::UrlEncoded("per_page".into(), "50".into()),
            mockito::Matcher::UrlEncoded("status".into(), "published".into()),
        ]))
        .match_header("authorization", mockito::Matcher::Regex("^Basic ".into()))
        .with_status(200)
        .with_body(
            r#"[
                {"id": 1, "title": "First", "content": "<p>a</p>", "excerpt": ""},
                {"id": 2, "title": "Second", "content": "<p>b</p>", "excerpt": ""},
                {"id": 3, "title": "Third", "content": "<p>c</p>", "excerpt": ""}
            ]"#,
        )
        .create_async()
        .await;

    let items = client()
        .fetch_recent(&credentials(&server.url()), ContentCollection::Posts, 2)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(items.len(), 2, "limit truncates the page");
    assert_eq!(items[0].id, 1);
    assert_eq!(items[0].collection, ContentCollection::Posts);
}

#[tokio::test]
async fn rejected_credentials_surface_as_auth_errors() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", mockito::Matcher::Any)
        .with_status(401)
        .with_body("bad credentials")
        .create_async()
        .await;

    let err = client()
        .fetch_recent(&credentials(&server.url()), ContentCollection::Pages, 10)
        .await
        .unwrap_err();

    assert!(matches!(err, ContentSourceError::AuthRejected(_)));
}

#[tokio::test]
async fn updating_a_deleted_item_is_not_found() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/content/posts/42")
        .with_status(404)
        .create_async()
        .await;

    let err = client()
        .update_item(
            &credentials(&server.url()),
            ContentCollection::Posts,
            42,
            ContentUpdate::default(),
        )
        .await
        .unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn rejected_update_carries_the_response_body() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/content/pages/7")
        .with_status(500)
        .with_body("locked by another editor")
        .create_async()
        .await;

    let err = client()
        .update_item(
            &credentials(&server.url()),
            ContentCollection::Pages,
            7,
            ContentUpdate {
                excerpt: Some("new".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    match err {
        ContentSourceError::UpdateRejected { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "locked by another editor");
        }
        other => panic!("expected UpdateRejected, got {other:?}"),
    }
}

#[tokio::test]
async fn check_connection_probes_one_item() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/content/posts")
        .match_query(mockito::Matcher::UrlEncoded("per_page".into(), "1".into()))
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    client()
        .check_connection(&credentials(&server.url()))
        .await
        .unwrap();
    mock.assert_async().await;
}
