//! JSON shapes returned by the scripture API and their mapping into the
//! crate's model. Remote text passes through [`clean`] on the way in.

use crate::catalog;
use crate::error::{ContentError, Result};
use crate::model::{
    Book, ChapterSummary, Passage, ScriptDirection, SearchResult, SearchVerse, Translation, Verse,
};
use crate::normalize::clean;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageDto {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub script: Option<String>,
    #[serde(default)]
    pub script_direction: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CountryDto {
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BibleDto {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub abbreviation: Option<String>,
    #[serde(default)]
    pub abbreviation_local: Option<String>,
    pub language: LanguageDto,
    #[serde(default)]
    pub countries: Vec<CountryDto>,
}

impl BibleDto {
    pub fn into_translation(self) -> Translation {
        let abbreviation = self
            .abbreviation_local
            .or(self.abbreviation)
            .unwrap_or_else(|| self.id.clone());
        Translation {
            id: self.id,
            name: self.name,
            abbreviation,
            language_code: self.language.id,
            language_name: self.language.name,
            script: self.language.script.unwrap_or_default(),
            direction: ScriptDirection::from_code(
                self.language.script_direction.as_deref().unwrap_or("ltr"),
            ),
            country: self
                .countries
                .into_iter()
                .next()
                .map(|c| c.name)
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDto {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub name_long: Option<String>,
}

impl BookDto {
    /// Merges the remote (possibly localized) names over the catalog entry.
    /// Books missing from the catalog map to `None`.
    pub fn into_book(self) -> Option<Book> {
        let known = catalog::books().get(&self.id)?;
        Some(Book {
            id: known.id.clone(),
            name: if self.name.trim().is_empty() {
                known.name.clone()
            } else {
                clean(&self.name)
            },
            long_name: self
                .name_long
                .map(|n| clean(&n))
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| known.long_name.clone()),
            testament: known.testament,
            category: known.category,
            chapters: known.chapters,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterSummaryDto {
    pub id: String,
    pub book_id: String,
    pub number: String,
    #[serde(default)]
    pub reference: Option<String>,
}

impl ChapterSummaryDto {
    /// Non-numeric chapters such as `intro` map to `None`.
    pub fn into_summary(self) -> Option<ChapterSummary> {
        let number: u32 = self.number.trim().parse().ok().filter(|n| *n > 0)?;
        let reference = self
            .reference
            .unwrap_or_else(|| format!("{} {}", book_name(&self.book_id), number));
        Some(ChapterSummary {
            id: self.id,
            book_id: self.book_id,
            number,
            reference,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterDto {
    pub id: String,
    pub book_id: String,
    pub number: String,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub verse_count: Option<u32>,
}

impl ChapterDto {
    pub fn split(self) -> Result<(ChapterSummary, String, Option<u32>)> {
        let id = self.id.clone();
        let text = clean(&self.content);
        let verse_count = self.verse_count;
        let summary = ChapterSummaryDto {
            id: self.id,
            book_id: self.book_id,
            number: self.number,
            reference: self.reference,
        }
        .into_summary()
        .ok_or_else(|| ContentError::MalformedResponse(format!("chapter {} has no number", id)))?;
        Ok((summary, text, verse_count))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerseDto {
    pub id: String,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

impl VerseDto {
    pub fn into_verse(self, translation_id: &str) -> Result<Verse> {
        let (book_id, chapter, number) = parse_verse_id(&self.id).ok_or_else(|| {
            ContentError::MalformedResponse(format!("unrecognized verse id {}", self.id))
        })?;
        let raw = self.content.or(self.text).unwrap_or_default();
        let reference = self
            .reference
            .map(|r| clean(&r))
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| format!("{} {}:{}", book_name(&book_id), chapter, number));
        Ok(Verse {
            id: self.id,
            translation_id: translation_id.to_string(),
            book_id,
            chapter,
            number,
            text: clean(&raw),
            reference,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchVerseDto {
    pub id: String,
    pub book_id: String,
    pub chapter_id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub reference: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchDto {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
    #[serde(default)]
    pub total: Option<u32>,
    #[serde(default)]
    pub verses: Option<Vec<SearchVerseDto>>,
}

impl SearchDto {
    pub fn into_result(self, query: &str, limit: u32, offset: u32) -> SearchResult {
        let verses: Vec<SearchVerse> = self
            .verses
            .unwrap_or_default()
            .into_iter()
            .map(|v| SearchVerse {
                id: v.id,
                book_id: v.book_id,
                chapter_id: v.chapter_id,
                text: clean(&v.text),
                reference: v.reference,
            })
            .collect();
        SearchResult {
            query: self.query.unwrap_or_else(|| query.to_string()),
            limit: self.limit.unwrap_or(limit),
            offset: self.offset.unwrap_or(offset),
            total: self.total.unwrap_or(verses.len() as u32),
            verses,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassageDto {
    pub id: String,
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub verse_count: Option<u32>,
}

impl PassageDto {
    pub fn into_passage(self, translation_id: &str) -> Passage {
        Passage {
            id: self.id,
            translation_id: translation_id.to_string(),
            reference: self.reference,
            text: clean(&self.content),
            verse_count: self.verse_count.unwrap_or(0),
        }
    }
}

/// Splits `JHN.3.16` into (`JHN`, 3, 16).
pub fn parse_verse_id(id: &str) -> Option<(String, u32, u32)> {
    let mut parts = id.split('.');
    let book = parts.next().filter(|b| !b.is_empty())?;
    let chapter = parts.next()?.parse().ok()?;
    let verse = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((book.to_string(), chapter, verse))
}

fn book_name(book_id: &str) -> String {
    catalog::books()
        .get(book_id)
        .map(|b| b.name.clone())
        .unwrap_or_else(|| book_id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Testament;
    use serde_json::json;

    fn from<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> T {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn parses_verse_ids() {
        assert_eq!(parse_verse_id("JHN.3.16"), Some(("JHN".into(), 3, 16)));
        assert_eq!(parse_verse_id("1CO.13.4"), Some(("1CO".into(), 13, 4)));
        assert_eq!(parse_verse_id("JHN.3"), None);
        assert_eq!(parse_verse_id("JHN.3.16.2"), None);
        assert_eq!(parse_verse_id("JHN.intro.1"), None);
    }

    #[test]
    fn books_take_remote_names_and_catalog_facts() {
        let dto: BookDto = from(json!({
            "id": "JHN",
            "bibleId": "x",
            "name": "Juan",
            "nameLong": "El Santo Evangelio Según San Juan"
        }));
        let book = dto.into_book().unwrap();
        assert_eq!(book.name, "Juan");
        assert_eq!(book.long_name, "El Santo Evangelio Según San Juan");
        assert_eq!(book.testament, Testament::New);
        assert_eq!(book.chapters, 21);
    }

    #[test]
    fn books_outside_the_canon_are_dropped() {
        let dto: BookDto = from(json!({"id": "TOB", "name": "Tobit"}));
        assert!(dto.into_book().is_none());
    }

    #[test]
    fn intro_chapters_are_dropped() {
        let intro: ChapterSummaryDto = from(json!({
            "id": "GEN.intro",
            "bookId": "GEN",
            "number": "intro",
            "reference": "Genesis"
        }));
        assert!(intro.into_summary().is_none());

        let first: ChapterSummaryDto =
            from(json!({"id": "GEN.1", "bookId": "GEN", "number": "1"}));
        let summary = first.into_summary().unwrap();
        assert_eq!(summary.number, 1);
        assert_eq!(summary.reference, "Genesis 1");
    }

    #[test]
    fn verses_are_cleaned_and_referenced() {
        let dto: VerseDto = from(json!({
            "id": "JHN.3.16",
            "content": "<p class=\"p\">For God so loved the world&nbsp;&amp; gave</p>"
        }));
        let verse = dto.into_verse("kjv").unwrap();
        assert_eq!(verse.text, "For God so loved the world & gave");
        assert_eq!(verse.reference, "John 3:16");
        assert_eq!(verse.key(), ("kjv", "JHN", 3, 16));
    }

    #[test]
    fn verse_ids_that_do_not_parse_are_malformed() {
        let dto: VerseDto = from(json!({"id": "JHN-3-16"}));
        assert!(matches!(
            dto.into_verse("kjv"),
            Err(ContentError::MalformedResponse(_))
        ));
    }

    #[test]
    fn search_without_verses_is_empty() {
        let dto: SearchDto = from(json!({"query": "John 3:16", "passages": []}));
        let result = dto.into_result("John 3:16", 10, 0);
        assert!(result.verses.is_empty());
        assert_eq!(result.total, 0);
        assert_eq!(result.limit, 10);
    }

    #[test]
    fn bibles_map_to_translations() {
        let dto: BibleDto = from(json!({
            "id": "0b262f1ed7f084a6-01",
            "name": "Westminster Leningrad Codex",
            "abbreviation": "WLC",
            "language": {
                "id": "heb",
                "name": "Hebrew",
                "script": "Hebrew",
                "scriptDirection": "RTL"
            },
            "countries": [{"id": "IL", "name": "Israel"}]
        }));
        let translation = dto.into_translation();
        assert_eq!(translation.direction, ScriptDirection::Rtl);
        assert_eq!(translation.country, "Israel");
        assert_eq!(translation.abbreviation, "WLC");
    }
}
