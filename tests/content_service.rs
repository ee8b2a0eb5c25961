use scripture::config::ClientConfig;
use scripture::error::ContentError;
use scripture::remote::{RawResponse, API_KEY_HEADER};
use scripture::testing::{fixtures, MockTransport};
use scripture::ContentService;
use serde_json::json;
use std::time::Duration;

const BIBLE: &str = "de4e12af7f28f599-02";

fn config() -> ClientConfig {
    ClientConfig {
        base_url: "https://api.test/v1".to_string(),
        api_key: "integration-key".to_string(),
        random_seed: Some(2024),
        ..ClientConfig::default()
    }
}

#[tokio::test(start_paused = true)]
async fn test_browse_from_book_to_verse() {
    let mock = fixtures::canon();
    let service = ContentService::new(mock.clone(), &config());

    let books = service.list_books(BIBLE).await;
    let ruth = books.iter().find(|b| b.id == "RUT").unwrap();
    assert_eq!(ruth.chapters, 4);

    let chapters = service.list_chapters(BIBLE, &ruth.id).await;
    assert_eq!(chapters.len(), 4);

    let chapter = service
        .get_chapter(BIBLE, &chapters[0].id, true)
        .await
        .unwrap();
    assert_eq!(chapter.verse_count, fixtures::verses_in(1));
    assert_eq!(chapter.verses.first().map(|v| v.number), Some(1));
    assert_eq!(chapter.translation_id, BIBLE);

    let verse = service
        .get_verse(BIBLE, &chapter.verses[0].id)
        .await
        .unwrap();
    assert_eq!(verse.reference, "Ruth 1:1");
    assert_eq!(verse.key(), (BIBLE, "RUT", 1, 1));

    // books, chapters, chapter, chapter verses, verse
    assert_eq!(mock.calls(), 5);
    assert!(mock
        .requests()
        .iter()
        .all(|r| r.header(API_KEY_HEADER) == Some("integration-key")));
}

#[tokio::test(start_paused = true)]
async fn test_rate_limits_are_retried_then_served() {
    let mock = MockTransport::new().route_sequence(
        &format!("/bibles/{}/verses/JHN.11.35", BIBLE),
        vec![
            Ok(RawResponse::new(429, "{}")),
            Ok(RawResponse::new(
                200,
                json!({"data": {
                    "id": "JHN.11.35",
                    "reference": "John 11:35",
                    "content": "<p>Jesus wept.</p>"
                }})
                .to_string(),
            )),
        ],
    );
    let service = ContentService::new(mock.clone(), &config());

    let started = tokio::time::Instant::now();
    let verse = service.get_verse(BIBLE, "JHN.11.35").await.unwrap();
    assert_eq!(verse.text, "Jesus wept.");
    assert_eq!(started.elapsed(), Duration::from_millis(1000));
    assert_eq!(mock.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_strict_and_lenient_agree_on_success_and_differ_on_failure() {
    let service = ContentService::new(MockTransport::always(503), &config());

    assert!(service.get_book(BIBLE, "GEN").await.is_none());
    assert_eq!(
        service.try_get_book(BIBLE, "GEN").await.unwrap_err(),
        ContentError::RemoteError {
            status: 503,
            endpoint: format!("/bibles/{}/books/GEN", BIBLE),
        }
    );

    let working = ContentService::new(fixtures::canon(), &config());
    assert_eq!(
        working.get_book(BIBLE, "GEN").await,
        working.try_get_book(BIBLE, "GEN").await.ok()
    );
}

#[tokio::test(start_paused = true)]
async fn test_retry_policy_comes_from_config() {
    let mock = MockTransport::offline();
    let service = ContentService::new(
        mock.clone(),
        &ClientConfig {
            max_attempts: 2,
            retry_base_delay_ms: 50,
            ..config()
        },
    );

    let started = tokio::time::Instant::now();
    let err = service.try_list_books(BIBLE).await.unwrap_err();
    assert!(err.is_retryable());
    assert_eq!(mock.calls(), 2);
    assert_eq!(started.elapsed(), Duration::from_millis(50));
}

#[tokio::test(start_paused = true)]
async fn test_ttls_come_from_config() {
    let mock = fixtures::canon();
    let service = ContentService::new(
        mock.clone(),
        &ClientConfig {
            catalog_ttl_secs: 60,
            ..config()
        },
    );

    service.list_books(BIBLE).await;
    tokio::time::advance(Duration::from_secs(61)).await;
    service.list_books(BIBLE).await;
    assert_eq!(mock.calls(), 2);
}

#[tokio::test]
async fn test_random_verses_use_the_default_translation() {
    let service = ContentService::new(fixtures::canon(), &config());
    assert_eq!(service.default_translation(), BIBLE);

    let verse = service.random_verse(None).await.unwrap();
    assert_eq!(verse.translation_id, BIBLE);
    assert!(verse.text.contains(&verse.id));
}
