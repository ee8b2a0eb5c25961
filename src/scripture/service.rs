//! # Content Service
//!
//! The facade every client talks to. Each network-backed method follows the
//! same path:
//!
//! 1. Build a cache key from every parameter.
//! 2. Return the cached value on a hit.
//! 3. On a miss, fetch through the [`RequestExecutor`], map the wire shape into
//!    the model (cleaning text on the way), store it with the TTL for its kind
//!    and return it.
//!
//! ## Two error policies
//!
//! The plain methods (`list_books`, `get_verse`, ...) never fail. A remote
//! failure or an unexpected shape is logged at `warn` and turned into an empty
//! `Vec`, `None` or an empty [`SearchResult`]. That is the behavior callers
//! rendering a page want.
//!
//! Every one of them wraps a `try_` twin (`try_list_books`, `try_get_verse`,
//! ...) returning [`Result`], for callers that need to tell "nothing there"
//! apart from "remote down".
//!
//! ## Concurrent misses
//!
//! With `coalesce_requests` on (the default), concurrent misses for one key
//! share a single fetch: the first caller starts it, later callers await the
//! same [`Shared`] future, and the fetch writes the cache once before leaving
//! the in-flight map. The fetch runs as its own task, so it completes even if
//! every caller gives up on it. With it off, each caller fetches on its own and the
//! last write wins; entries are replaced whole, so the cache stays valid
//! either way.
//!
//! ## Random verses
//!
//! [`ContentService::random_verse`] picks a book uniformly, then a chapter of
//! that book uniformly, then a verse of that chapter uniformly. Verses in short
//! books and short chapters come up more often than they would under a draw
//! over all verses. Callers may rely on this distribution, so it stays.

use crate::cache::{CacheStats, CacheStore};
use crate::catalog;
use crate::config::ClientConfig;
use crate::error::{ContentError, Result};
use crate::model::{
    Book, Chapter, ChapterSummary, Language, Passage, SearchResult, Translation, Verse,
};
use crate::remote::wire::{
    BibleDto, BookDto, ChapterDto, ChapterSummaryDto, PassageDto, SearchDto, VerseDto,
};
use crate::remote::{HttpTransport, RequestExecutor, Transport};
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// What the service keeps in its cache, one variant per kind of content.
#[derive(Debug, Clone)]
enum Cached {
    Translations(Vec<Translation>),
    Translation(Translation),
    Books(Vec<Book>),
    Book(Book),
    Chapters(Vec<ChapterSummary>),
    Chapter(Chapter),
    Verses(Vec<Verse>),
    Verse(Verse),
    Search(SearchResult),
    Passage(Passage),
}

trait Cacheable: Clone + Send + Sized + 'static {
    fn into_cached(self) -> Cached;
    fn from_cached(cached: Cached) -> Option<Self>;
}

macro_rules! cacheable {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Cacheable for $ty {
                fn into_cached(self) -> Cached {
                    Cached::$variant(self)
                }

                fn from_cached(cached: Cached) -> Option<Self> {
                    match cached {
                        Cached::$variant(value) => Some(value),
                        _ => None,
                    }
                }
            }
        )*
    };
}

cacheable! {
    Vec<Translation> => Translations,
    Translation => Translation,
    Vec<Book> => Books,
    Book => Book,
    Vec<ChapterSummary> => Chapters,
    Chapter => Chapter,
    Vec<Verse> => Verses,
    Verse => Verse,
    SearchResult => Search,
    Passage => Passage,
}

type SharedFetch = Shared<BoxFuture<'static, Result<Cached>>>;

pub struct ContentService<T: Transport> {
    executor: Arc<RequestExecutor<T>>,
    cache: Arc<CacheStore<Cached>>,
    in_flight: Arc<Mutex<HashMap<String, SharedFetch>>>,
    catalog_ttl: Duration,
    search_ttl: Duration,
    default_translation: String,
    coalesce: bool,
    rng: Mutex<StdRng>,
}

impl ContentService<HttpTransport> {
    /// A service talking to the real API over HTTP.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.request_timeout())?;
        Ok(Self::new(transport, config))
    }
}

impl<T: Transport> ContentService<T> {
    pub fn new(transport: T, config: &ClientConfig) -> Self {
        let executor = RequestExecutor::new(transport, &config.base_url, &config.api_key)
            .with_policy(config.retry_policy());
        let rng = match config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            executor: Arc::new(executor),
            cache: Arc::new(CacheStore::new(config.default_ttl())),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            catalog_ttl: config.catalog_ttl(),
            search_ttl: config.search_ttl(),
            default_translation: config.default_translation.clone(),
            coalesce: config.coalesce_requests,
            rng: Mutex::new(rng),
        }
    }

    pub fn default_translation(&self) -> &str {
        &self.default_translation
    }

    // --- static catalog ---

    pub fn list_translations(&self) -> Vec<Translation> {
        catalog::translations().all().to_vec()
    }

    /// Accepts an id or an abbreviation.
    pub fn get_translation(&self, id: &str) -> Option<Translation> {
        catalog::translations().resolve(id).cloned()
    }

    pub fn list_languages(&self) -> Vec<Language> {
        catalog::translations().languages()
    }

    // --- strict API ---

    /// Every translation the remote account can read, not only the catalog's.
    pub async fn try_list_remote_translations(&self) -> Result<Vec<Translation>> {
        let endpoint = path(&["bibles"]);
        self.cached(cache_key("bibles", &[]), self.catalog_ttl, move |executor| async move {
            executor
                .execute::<Vec<BibleDto>>(&endpoint)
                .await
                .map(|bibles| bibles.into_iter().map(BibleDto::into_translation).collect())
        })
        .await
    }

    pub async fn try_get_remote_translation(&self, translation_id: &str) -> Result<Translation> {
        let endpoint = path(&["bibles", translation_id]);
        let key = cache_key("bible", &[translation_id]);
        self.cached(key, self.catalog_ttl, move |executor| async move {
            executor
                .execute::<BibleDto>(&endpoint)
                .await
                .map(BibleDto::into_translation)
        })
        .await
    }

    /// Books of a translation in canonical order. Books outside the canon
    /// (deuterocanon, front matter) are left out.
    pub async fn try_list_books(&self, translation_id: &str) -> Result<Vec<Book>> {
        let endpoint = path(&["bibles", translation_id, "books"]);
        let key = cache_key("books", &[translation_id]);
        self.cached(key, self.catalog_ttl, move |executor| async move {
            executor
                .execute::<Vec<BookDto>>(&endpoint)
                .await
                .map(|books| books.into_iter().filter_map(BookDto::into_book).collect())
        })
        .await
    }

    pub async fn try_get_book(&self, translation_id: &str, book_id: &str) -> Result<Book> {
        let endpoint = path(&["bibles", translation_id, "books", book_id]);
        let key = cache_key("book", &[translation_id, book_id]);
        self.cached(key, self.catalog_ttl, move |executor| async move {
            executor
                .execute::<BookDto>(&endpoint)
                .await
                .and_then(|dto| {
                    let id = dto.id.clone();
                    dto.into_book().ok_or_else(|| {
                        ContentError::MalformedResponse(format!("book {} is not in the canon", id))
                    })
                })
        })
        .await
    }

    /// Numbered chapters of a book; `intro` and similar entries are dropped.
    pub async fn try_list_chapters(
        &self,
        translation_id: &str,
        book_id: &str,
    ) -> Result<Vec<ChapterSummary>> {
        let endpoint = path(&["bibles", translation_id, "books", book_id, "chapters"]);
        let key = cache_key("chapters", &[translation_id, book_id]);
        self.cached(key, self.catalog_ttl, move |executor| async move {
            executor
                .execute::<Vec<ChapterSummaryDto>>(&endpoint)
                .await
                .map(|chapters| {
                    chapters
                        .into_iter()
                        .filter_map(ChapterSummaryDto::into_summary)
                        .collect()
                })
        })
        .await
    }

    pub async fn try_get_chapter(
        &self,
        translation_id: &str,
        chapter_id: &str,
        include_verses: bool,
    ) -> Result<Chapter> {
        let key = cache_key(
            "chapter",
            &[translation_id, chapter_id, include_verses.to_string().as_str()],
        );
        let translation_id = translation_id.to_string();
        let chapter_id = chapter_id.to_string();
        self.cached(key, self.cache.default_ttl(), move |executor| {
            fetch_chapter(executor, translation_id, chapter_id, include_verses)
        })
        .await
    }

    /// Verses of a chapter, ascending. Text is empty when the listing omits it;
    /// [`try_get_verse`](Self::try_get_verse) always carries it.
    pub async fn try_list_verses(
        &self,
        translation_id: &str,
        chapter_id: &str,
    ) -> Result<Vec<Verse>> {
        let key = cache_key("verses", &[translation_id, chapter_id]);
        let translation_id = translation_id.to_string();
        let chapter_id = chapter_id.to_string();
        self.cached(key, self.cache.default_ttl(), move |executor| async move {
            fetch_verses(&executor, &translation_id, &chapter_id).await
        })
        .await
    }

    pub async fn try_get_verse(&self, translation_id: &str, verse_id: &str) -> Result<Verse> {
        let endpoint = path(&["bibles", translation_id, "verses", verse_id]);
        let key = cache_key("verse", &[translation_id, verse_id]);
        let translation_id = translation_id.to_string();
        self.cached(key, self.cache.default_ttl(), move |executor| async move {
            executor
                .execute::<VerseDto>(&endpoint)
                .await
                .and_then(|dto| dto.into_verse(&translation_id))
        })
        .await
    }

    /// A blank query answers an empty result without a request.
    pub async fn try_search(
        &self,
        translation_id: &str,
        query: &str,
        limit: u32,
        offset: u32,
    ) -> Result<SearchResult> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(SearchResult::empty(query, limit, offset));
        }

        let endpoint = format!(
            "{}?query={}&limit={}&offset={}",
            path(&["bibles", translation_id, "search"]),
            urlencoding::encode(query),
            limit,
            offset
        );
        let key = cache_key(
            "search",
            &[
                translation_id,
                query,
                limit.to_string().as_str(),
                offset.to_string().as_str(),
            ],
        );
        let query = query.to_string();
        self.cached(key, self.search_ttl, move |executor| async move {
            executor
                .execute::<SearchDto>(&endpoint)
                .await
                .map(|dto| dto.into_result(&query, limit, offset))
        })
        .await
    }

    /// A span such as `JHN.3.16-JHN.3.18`, kept as one block of text.
    pub async fn try_get_passage(&self, translation_id: &str, passage_id: &str) -> Result<Passage> {
        let endpoint = path(&["bibles", translation_id, "passages", passage_id]);
        let key = cache_key("passage", &[translation_id, passage_id]);
        let translation_id = translation_id.to_string();
        self.cached(key, self.cache.default_ttl(), move |executor| async move {
            executor
                .execute::<PassageDto>(&endpoint)
                .await
                .map(|dto| dto.into_passage(&translation_id))
        })
        .await
    }

    /// Book, then chapter, then verse, each drawn uniformly. Falls back to the
    /// configured default translation.
    pub async fn try_random_verse(&self, translation_id: Option<&str>) -> Result<Verse> {
        let translation_id = translation_id.unwrap_or(&self.default_translation);

        let books = self.try_list_books(translation_id).await?;
        let book = self
            .pick(&books)
            .ok_or_else(|| empty_listing("books", translation_id))?;

        let chapters = self.try_list_chapters(translation_id, &book.id).await?;
        let chapter = self
            .pick(&chapters)
            .ok_or_else(|| empty_listing("chapters", &book.id))?;

        let verses = self.try_list_verses(translation_id, &chapter.id).await?;
        let verse = self
            .pick(&verses)
            .ok_or_else(|| empty_listing("verses", &chapter.id))?;

        if verse.text.is_empty() {
            return self.try_get_verse(translation_id, &verse.id).await;
        }
        Ok(verse)
    }

    // --- lenient API ---

    pub async fn list_remote_translations(&self) -> Vec<Translation> {
        degrade("list_remote_translations", self.try_list_remote_translations().await)
            .unwrap_or_default()
    }

    pub async fn get_remote_translation(&self, translation_id: &str) -> Option<Translation> {
        degrade(
            "get_remote_translation",
            self.try_get_remote_translation(translation_id).await,
        )
    }

    pub async fn list_books(&self, translation_id: &str) -> Vec<Book> {
        degrade("list_books", self.try_list_books(translation_id).await).unwrap_or_default()
    }

    pub async fn get_book(&self, translation_id: &str, book_id: &str) -> Option<Book> {
        degrade("get_book", self.try_get_book(translation_id, book_id).await)
    }

    pub async fn list_chapters(&self, translation_id: &str, book_id: &str) -> Vec<ChapterSummary> {
        degrade(
            "list_chapters",
            self.try_list_chapters(translation_id, book_id).await,
        )
        .unwrap_or_default()
    }

    pub async fn get_chapter(
        &self,
        translation_id: &str,
        chapter_id: &str,
        include_verses: bool,
    ) -> Option<Chapter> {
        degrade(
            "get_chapter",
            self.try_get_chapter(translation_id, chapter_id, include_verses)
                .await,
        )
    }

    pub async fn list_verses(&self, translation_id: &str, chapter_id: &str) -> Vec<Verse> {
        degrade(
            "list_verses",
            self.try_list_verses(translation_id, chapter_id).await,
        )
        .unwrap_or_default()
    }

    pub async fn get_verse(&self, translation_id: &str, verse_id: &str) -> Option<Verse> {
        degrade("get_verse", self.try_get_verse(translation_id, verse_id).await)
    }

    pub async fn search(
        &self,
        translation_id: &str,
        query: &str,
        limit: u32,
        offset: u32,
    ) -> SearchResult {
        degrade(
            "search",
            self.try_search(translation_id, query, limit, offset).await,
        )
        .unwrap_or_else(|| SearchResult::empty(query.trim(), limit, offset))
    }

    pub async fn get_passage(&self, translation_id: &str, passage_id: &str) -> Option<Passage> {
        degrade(
            "get_passage",
            self.try_get_passage(translation_id, passage_id).await,
        )
    }

    pub async fn random_verse(&self, translation_id: Option<&str>) -> Option<Verse> {
        degrade("random_verse", self.try_random_verse(translation_id).await)
    }

    // --- cache ---

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    fn pick<V: Clone>(&self, items: &[V]) -> Option<V> {
        items.choose(&mut *self.rng.lock()).cloned()
    }

    /// Cache lookup, then `fetch` on a miss. `fetch` gets its own handle on the
    /// executor so the future can outlive this call when it is shared.
    async fn cached<V, F, Fut>(&self, key: String, ttl: Duration, fetch: F) -> Result<V>
    where
        V: Cacheable,
        F: FnOnce(Arc<RequestExecutor<T>>) -> Fut,
        Fut: Future<Output = Result<V>> + Send + 'static,
    {
        if let Some(value) = self.cache.get(&key).and_then(V::from_cached) {
            debug!(%key, "cache hit");
            return Ok(value);
        }

        let fetch = fetch(Arc::clone(&self.executor));

        if !self.coalesce {
            debug!(%key, "cache miss, fetching");
            let value = fetch.await?;
            self.cache.set(key, value.clone().into_cached(), ttl);
            return Ok(value);
        }

        let shared = {
            let mut in_flight = self.in_flight.lock();
            match in_flight.get(&key) {
                Some(pending) => {
                    debug!(%key, "cache miss, joining in-flight fetch");
                    pending.clone()
                }
                None => {
                    debug!(%key, "cache miss, fetching");
                    let cache = Arc::clone(&self.cache);
                    let registry = Arc::clone(&self.in_flight);
                    let task_key = key.clone();
                    // Spawned so the fetch finishes and leaves the map even
                    // when every caller waiting on it is dropped.
                    let handle = tokio::spawn(async move {
                        let outcome = fetch.await.map(V::into_cached);
                        if let Ok(value) = &outcome {
                            cache.set(task_key.clone(), value.clone(), ttl);
                        }
                        registry.lock().remove(&task_key);
                        outcome
                    });
                    let task = async move {
                        handle.await.unwrap_or_else(|err| {
                            let reason = format!("fetch task failed: {}", err);
                            Err(ContentError::NetworkFailure(reason))
                        })
                    }
                    .boxed()
                    .shared();
                    in_flight.insert(key.clone(), task.clone());
                    task
                }
            }
        };

        let cached = shared.await?;
        V::from_cached(cached).ok_or_else(|| {
            ContentError::MalformedResponse(format!("cache entry {} holds another kind", key))
        })
    }
}

async fn fetch_chapter<T: Transport>(
    executor: Arc<RequestExecutor<T>>,
    translation_id: String,
    chapter_id: String,
    include_verses: bool,
) -> Result<Chapter> {
    let endpoint = path(&["bibles", translation_id.as_str(), "chapters", chapter_id.as_str()]);
    let (summary, text, verse_count) = executor.execute::<ChapterDto>(&endpoint).await?.split()?;
    let verses = if include_verses {
        fetch_verses(&executor, &translation_id, &chapter_id).await?
    } else {
        Vec::new()
    };
    let verse_count = verse_count.unwrap_or(verses.len() as u32);
    Ok(Chapter {
        summary,
        translation_id,
        text,
        verses,
        verse_count,
    })
}

async fn fetch_verses<T: Transport>(
    executor: &RequestExecutor<T>,
    translation_id: &str,
    chapter_id: &str,
) -> Result<Vec<Verse>> {
    let endpoint = path(&["bibles", translation_id, "chapters", chapter_id, "verses"]);
    let mut verses = executor
        .execute::<Vec<VerseDto>>(&endpoint)
        .await?
        .into_iter()
        .map(|dto| dto.into_verse(translation_id))
        .collect::<Result<Vec<_>>>()?;
    verses.sort_by_key(|verse| verse.number);
    Ok(verses)
}

/// `/seg/seg/...` with every segment percent-encoded.
fn path(segments: &[&str]) -> String {
    segments
        .iter()
        .map(|segment| format!("/{}", urlencoding::encode(segment)))
        .collect()
}

/// `kind:part:part`. Parts are percent-encoded so a `:` inside one cannot
/// collide with another key.
fn cache_key(kind: &str, parts: &[&str]) -> String {
    let mut key = kind.to_string();
    for part in parts {
        key.push(':');
        key.push_str(&urlencoding::encode(part));
    }
    key
}

fn empty_listing(what: &str, parent: &str) -> ContentError {
    ContentError::MalformedResponse(format!("no {} listed for {}", what, parent))
}

fn degrade<V>(operation: &'static str, outcome: Result<V>) -> Option<V> {
    match outcome {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(operation, kind = err.kind(), error = %err, "content unavailable");
            None
        }
    }
}
