use crate::model::{Language, ScriptDirection, Translation};
use std::collections::BTreeMap;

/// Default translation used when a caller does not name one.
pub const KJV: &str = "de4e12af7f28f599-02";

// (id, name, abbreviation, language code, language name, script, direction, country)
type Row = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
);

const ROWS: &[Row] = &[
    (
        KJV,
        "King James (Authorised) Version",
        "KJV",
        "eng",
        "English",
        "Latin",
        "ltr",
        "United Kingdom",
    ),
    (
        "06125adad2d5898a-01",
        "The Holy Bible, American Standard Version",
        "ASV",
        "eng",
        "English",
        "Latin",
        "ltr",
        "United States",
    ),
    (
        "9879dbb7cfe39e4d-04",
        "World English Bible",
        "WEB",
        "eng",
        "English",
        "Latin",
        "ltr",
        "United States",
    ),
    (
        "bba9f40183526463-01",
        "Berean Standard Bible",
        "BSB",
        "eng",
        "English",
        "Latin",
        "ltr",
        "United States",
    ),
    (
        "65eec8e0b60e656b-01",
        "Free Bible Version",
        "FBV",
        "eng",
        "English",
        "Latin",
        "ltr",
        "United States",
    ),
    (
        "592420522e16049f-01",
        "Reina Valera 1909",
        "RVR09",
        "spa",
        "Spanish",
        "Latin",
        "ltr",
        "Spain",
    ),
    (
        "0b262f1ed7f084a6-01",
        "Westminster Leningrad Codex",
        "WLC",
        "heb",
        "Hebrew",
        "Hebrew",
        "rtl",
        "Israel",
    ),
];

/// Registry of supported translations, in display order.
#[derive(Debug)]
pub struct TranslationCatalog {
    entries: Vec<Translation>,
}

impl TranslationCatalog {
    pub(crate) fn builtin() -> Self {
        let entries = ROWS
            .iter()
            .map(
                |&(id, name, abbreviation, code, language, script, direction, country)| {
                    Translation {
                        id: id.to_string(),
                        name: name.to_string(),
                        abbreviation: abbreviation.to_string(),
                        language_code: code.to_string(),
                        language_name: language.to_string(),
                        script: script.to_string(),
                        direction: ScriptDirection::from_code(direction),
                        country: country.to_string(),
                    }
                },
            )
            .collect();
        Self { entries }
    }

    pub fn all(&self) -> &[Translation] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&Translation> {
        self.entries.iter().find(|t| t.id == id)
    }

    /// Looks a translation up by id or, failing that, by abbreviation
    /// (case-insensitive). Lets the CLI accept `-t web`.
    pub fn resolve(&self, id_or_abbreviation: &str) -> Option<&Translation> {
        self.get(id_or_abbreviation).or_else(|| {
            self.entries
                .iter()
                .find(|t| t.abbreviation.eq_ignore_ascii_case(id_or_abbreviation))
        })
    }

    /// Groups translations by language code, ordered by code.
    pub fn languages(&self) -> Vec<Language> {
        let mut grouped: BTreeMap<&str, Language> = BTreeMap::new();
        for translation in &self.entries {
            grouped
                .entry(translation.language_code.as_str())
                .or_insert_with(|| Language {
                    code: translation.language_code.clone(),
                    name: translation.language_name.clone(),
                    translations: Vec::new(),
                })
                .translations
                .push(translation.clone());
        }
        grouped.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let catalog = TranslationCatalog::builtin();
        let mut ids: Vec<_> = catalog.all().iter().map(|t| t.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), catalog.all().len());
    }

    #[test]
    fn default_translation_is_present() {
        let catalog = TranslationCatalog::builtin();
        assert_eq!(catalog.get(KJV).unwrap().abbreviation, "KJV");
    }

    #[test]
    fn resolves_abbreviations() {
        let catalog = TranslationCatalog::builtin();
        assert_eq!(catalog.resolve("web").unwrap().id, "9879dbb7cfe39e4d-04");
        assert!(catalog.resolve("nope").is_none());
    }

    #[test]
    fn groups_languages_by_code() {
        let catalog = TranslationCatalog::builtin();
        let languages = catalog.languages();
        let codes: Vec<_> = languages.iter().map(|l| l.code.as_str()).collect();
        assert_eq!(codes, vec!["eng", "heb", "spa"]);

        let english = &languages[0];
        assert_eq!(english.name, "English");
        assert!(english.translations.iter().all(|t| t.language_code == "eng"));
        assert_eq!(english.translations.len(), 5);
    }

    #[test]
    fn hebrew_reads_right_to_left() {
        let catalog = TranslationCatalog::builtin();
        let wlc = catalog.resolve("WLC").unwrap();
        assert_eq!(wlc.direction, ScriptDirection::Rtl);
    }
}
