//! In-memory [`Transport`] for tests, in this crate and in consumers.
//!
//! Responses are looked up by the request's path and query (the part of the
//! URL after the host), so a `MockTransport` works with any base URL.
//!
//! ```no_run
//! use scripture::testing::MockTransport;
//! use serde_json::json;
//!
//! let mock = MockTransport::new()
//!     .route("/bibles/kjv/books", json!([{"id": "GEN", "name": "Genesis"}]))
//!     .route_status("/bibles/kjv/books/XYZ", 404);
//! ```

use crate::error::{ContentError, Result};
use crate::remote::{RawResponse, RemoteRequest, Transport};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

type Responder = dyn Fn(&str) -> Result<RawResponse> + Send + Sync;

struct Route {
    // Played in order; the last one repeats.
    replies: Vec<Result<RawResponse>>,
    served: usize,
}

struct MockState {
    routes: HashMap<String, Route>,
    log: Vec<(RemoteRequest, Instant)>,
}

/// Cheap to clone; clones share routes and the request log.
#[derive(Clone)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
    fallback: Arc<Responder>,
    latency: Option<Duration>,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    /// Unrouted paths answer 404.
    pub fn new() -> Self {
        Self::from_fn(|_| Ok(RawResponse::new(404, r#"{"message": "Not Found"}"#)))
    }

    /// Every request answers with `status` and an empty JSON object.
    pub fn always(status: u16) -> Self {
        Self::from_fn(move |_| Ok(RawResponse::new(status, "{}")))
    }

    /// Every request fails before reaching a server.
    pub fn offline() -> Self {
        Self::from_fn(|_| Err(ContentError::NetworkFailure("connection refused".into())))
    }

    /// Unrouted paths are answered by `responder`, which gets the path and query.
    pub fn from_fn<F>(responder: F) -> Self
    where
        F: Fn(&str) -> Result<RawResponse> + Send + Sync + 'static,
    {
        Self {
            state: Arc::new(Mutex::new(MockState {
                routes: HashMap::new(),
                log: Vec::new(),
            })),
            fallback: Arc::new(responder),
            latency: None,
        }
    }

    /// Answers `path` with 200 and `{"data": data}`.
    pub fn route(self, path: &str, data: serde_json::Value) -> Self {
        let body = serde_json::json!({ "data": data }).to_string();
        self.route_raw(path, RawResponse::new(200, body))
    }

    pub fn route_status(self, path: &str, status: u16) -> Self {
        self.route_raw(path, RawResponse::new(status, "{}"))
    }

    pub fn route_raw(self, path: &str, response: RawResponse) -> Self {
        self.route_sequence(path, vec![Ok(response)])
    }

    /// Answers `path` with each reply in turn, repeating the last one.
    pub fn route_sequence(self, path: &str, replies: Vec<Result<RawResponse>>) -> Self {
        self.state
            .lock()
            .routes
            .insert(path.to_string(), Route { replies, served: 0 });
        self
    }

    /// Delays every response, giving concurrent callers time to overlap.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn calls(&self) -> usize {
        self.state.lock().log.len()
    }

    pub fn calls_to(&self, path: &str) -> usize {
        self.state
            .lock()
            .log
            .iter()
            .filter(|(request, _)| path_of(&request.url) == path)
            .count()
    }

    pub fn requests(&self) -> Vec<RemoteRequest> {
        self.state
            .lock()
            .log
            .iter()
            .map(|(request, _)| request.clone())
            .collect()
    }

    /// When each request arrived, on tokio's (pausable) clock.
    pub fn call_times(&self) -> Vec<Instant> {
        self.state.lock().log.iter().map(|(_, at)| *at).collect()
    }

    fn reply(&self, request: &RemoteRequest) -> Result<RawResponse> {
        let path = path_of(&request.url);
        let scripted = {
            let mut state = self.state.lock();
            state.log.push((request.clone(), Instant::now()));
            state
                .routes
                .get_mut(path)
                .filter(|route| !route.replies.is_empty())
                .map(|route| {
                    let index = route.served.min(route.replies.len() - 1);
                    route.served += 1;
                    route.replies[index].clone()
                })
        };
        scripted.unwrap_or_else(|| (self.fallback)(path))
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: &RemoteRequest) -> Result<RawResponse> {
        let reply = self.reply(request);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        reply
    }
}

/// `https://host/v1/bibles?x=1` → `/bibles?x=1`. A leading `/v<digits>`
/// segment is dropped so routes are written without the API version.
fn path_of(url: &str) -> &str {
    let after_scheme = url.find("://").map(|i| &url[i + 3..]).unwrap_or(url);
    let path = after_scheme
        .find('/')
        .map(|i| &after_scheme[i..])
        .unwrap_or("/");
    let mut segments = path.splitn(3, '/');
    segments.next();
    match segments.next() {
        Some(first)
            if first.len() > 1
                && first.starts_with('v')
                && first[1..].chars().all(|c| c.is_ascii_digit()) =>
        {
            &path[first.len() + 1..]
        }
        _ => path,
    }
}

/// A consistent fake canon served for any translation id.
///
/// Every catalog book exists with its catalog chapter count (plus an `intro`
/// pseudo-chapter, as the real API returns), and chapter `n` of every book has
/// `10 + n % 7` verses whose text names the verse.
pub mod fixtures {
    use super::*;
    use crate::catalog;
    use serde_json::{json, Value};

    pub fn verses_in(chapter: u32) -> u32 {
        10 + chapter % 7
    }

    pub fn canon() -> MockTransport {
        MockTransport::from_fn(|path| match respond(path) {
            Some(data) => Ok(RawResponse::new(200, json!({ "data": data }).to_string())),
            None => Ok(RawResponse::new(404, "{}")),
        })
    }

    fn respond(path: &str) -> Option<Value> {
        let path = path.split('?').next().unwrap_or(path);
        let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
        match segments.as_slice() {
            ["bibles", bible, "books"] => Some(Value::Array(
                catalog::books()
                    .all()
                    .iter()
                    .map(|b| book_json(bible, &b.id))
                    .collect(),
            )),
            ["bibles", bible, "books", book] => {
                catalog::books().get(book)?;
                Some(book_json(bible, book))
            }
            ["bibles", bible, "books", book, "chapters"] => {
                let known = catalog::books().get(book)?;
                let mut chapters = vec![json!({
                    "id": format!("{}.intro", book),
                    "bibleId": bible,
                    "bookId": book,
                    "number": "intro",
                    "reference": format!("{} Introduction", known.name),
                })];
                chapters.extend((1..=known.chapters).map(|n| {
                    json!({
                        "id": format!("{}.{}", book, n),
                        "bibleId": bible,
                        "bookId": book,
                        "number": n.to_string(),
                        "reference": format!("{} {}", known.name, n),
                    })
                }));
                Some(Value::Array(chapters))
            }
            ["bibles", bible, "chapters", chapter] => {
                let (book, number) = split_chapter(chapter)?;
                let verses = verses_in(number);
                Some(json!({
                    "id": chapter,
                    "bibleId": bible,
                    "bookId": book,
                    "number": number.to_string(),
                    "reference": format!("{} {}", book, number),
                    "content": format!("<p>{} {} has {} verses</p>", book, number, verses),
                    "verseCount": verses,
                }))
            }
            ["bibles", bible, "chapters", chapter, "verses"] => {
                let (book, number) = split_chapter(chapter)?;
                Some(Value::Array(
                    (1..=verses_in(number))
                        .rev()
                        .map(|v| {
                            json!({
                                "id": format!("{}.{}.{}", book, number, v),
                                "bibleId": bible,
                                "bookId": book,
                                "chapterId": chapter,
                            })
                        })
                        .collect(),
                ))
            }
            ["bibles", _, "verses", verse] => {
                let (book, chapter, number) = crate::remote::wire::parse_verse_id(verse)?;
                if number == 0 || number > verses_in(chapter) {
                    return None;
                }
                Some(json!({
                    "id": verse,
                    "bookId": book,
                    "chapterId": format!("{}.{}", book, chapter),
                    "content": format!(
                        r#"<p><span class="v">{}</span>Text of {}</p>"#,
                        number, verse
                    ),
                }))
            }
            _ => None,
        }
    }

    fn book_json(bible: &str, book: &str) -> Value {
        let name = catalog::books()
            .get(book)
            .map(|b| b.name.clone())
            .unwrap_or_default();
        json!({ "id": book, "bibleId": bible, "name": name, "nameLong": "" })
    }

    fn split_chapter(chapter: &str) -> Option<(&str, u32)> {
        let (book, number) = chapter.split_once('.')?;
        Some((book, number.parse().ok()?))
    }
}
