//! # Static Catalogs
//!
//! Read-only lookup tables built once on first use and shared for the life of
//! the process. Nothing here talks to the network and there is no way to add,
//! remove or edit an entry at runtime.
//!
//! - [`TranslationCatalog`]: the translations this client knows how to serve.
//! - [`BookCatalog`]: the 66 canonical books with testament, category and
//!   chapter count. Remote book listings are filtered through it and enriched
//!   from it.

mod books;
mod translations;

pub use books::BookCatalog;
pub use translations::{TranslationCatalog, KJV as DEFAULT_TRANSLATION};

use once_cell::sync::Lazy;

static TRANSLATIONS: Lazy<TranslationCatalog> = Lazy::new(TranslationCatalog::builtin);
static BOOKS: Lazy<BookCatalog> = Lazy::new(BookCatalog::builtin);

pub fn translations() -> &'static TranslationCatalog {
    &TRANSLATIONS
}

pub fn books() -> &'static BookCatalog {
    &BOOKS
}
