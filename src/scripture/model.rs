use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScriptDirection {
    Ltr,
    Rtl,
}

impl ScriptDirection {
    pub fn from_code(code: &str) -> Self {
        if code.eq_ignore_ascii_case("rtl") {
            ScriptDirection::Rtl
        } else {
            ScriptDirection::Ltr
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub id: String,
    pub name: String,
    pub abbreviation: String,
    pub language_code: String,
    pub language_name: String,
    pub script: String,
    pub direction: ScriptDirection,
    pub country: String,
}

/// Translations sharing one language code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Language {
    pub code: String,
    pub name: String,
    pub translations: Vec<Translation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Testament {
    Old,
    New,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookCategory {
    Law,
    History,
    Poetry,
    MajorProphets,
    MinorProphets,
    Gospels,
    Acts,
    PaulineEpistles,
    GeneralEpistles,
    Apocalyptic,
}

impl BookCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookCategory::Law => "Law",
            BookCategory::History => "History",
            BookCategory::Poetry => "Poetry",
            BookCategory::MajorProphets => "Major Prophets",
            BookCategory::MinorProphets => "Minor Prophets",
            BookCategory::Gospels => "Gospels",
            BookCategory::Acts => "Acts",
            BookCategory::PaulineEpistles => "Pauline Epistles",
            BookCategory::GeneralEpistles => "General Epistles",
            BookCategory::Apocalyptic => "Apocalyptic",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// USFM book code, e.g. `JHN`
    pub id: String,
    pub name: String,
    pub long_name: String,
    pub testament: Testament,
    pub category: BookCategory,
    pub chapters: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterSummary {
    /// e.g. `JHN.3`
    pub id: String,
    pub book_id: String,
    pub number: u32,
    pub reference: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub summary: ChapterSummary,
    pub translation_id: String,
    pub text: String,
    /// Ascending by `Verse::number`. Empty unless verses were requested.
    pub verses: Vec<Verse>,
    pub verse_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    /// e.g. `JHN.3.16`
    pub id: String,
    pub translation_id: String,
    pub book_id: String,
    pub chapter: u32,
    pub number: u32,
    pub text: String,
    pub reference: String,
}

impl Verse {
    /// The identity of a verse across fetches.
    pub fn key(&self) -> (&str, &str, u32, u32) {
        (&self.translation_id, &self.book_id, self.chapter, self.number)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchVerse {
    pub id: String,
    pub book_id: String,
    pub chapter_id: String,
    pub text: String,
    pub reference: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub query: String,
    pub limit: u32,
    pub offset: u32,
    pub total: u32,
    pub verses: Vec<SearchVerse>,
}

impl SearchResult {
    pub fn empty(query: &str, limit: u32, offset: u32) -> Self {
        Self {
            query: query.to_string(),
            limit,
            offset,
            total: 0,
            verses: Vec::new(),
        }
    }
}

/// A multi-verse span kept as one block of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    pub id: String,
    pub translation_id: String,
    pub reference: String,
    pub text: String,
    pub verse_count: u32,
}
