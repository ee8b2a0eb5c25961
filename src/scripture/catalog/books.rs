use crate::model::{Book, BookCategory, Testament};

use BookCategory::*;
use Testament::{New, Old};

// (USFM id, name, long name, testament, category, chapters), canonical order.
#[rustfmt::skip]
const ROWS: &[(&str, &str, &str, Testament, BookCategory, u32)] = &[
    ("GEN", "Genesis", "The First Book of Moses, Called Genesis", Old, Law, 50),
    ("EXO", "Exodus", "The Second Book of Moses, Called Exodus", Old, Law, 40),
    ("LEV", "Leviticus", "The Third Book of Moses, Called Leviticus", Old, Law, 27),
    ("NUM", "Numbers", "The Fourth Book of Moses, Called Numbers", Old, Law, 36),
    ("DEU", "Deuteronomy", "The Fifth Book of Moses, Called Deuteronomy", Old, Law, 34),
    ("JOS", "Joshua", "The Book of Joshua", Old, History, 24),
    ("JDG", "Judges", "The Book of Judges", Old, History, 21),
    ("RUT", "Ruth", "The Book of Ruth", Old, History, 4),
    ("1SA", "1 Samuel", "The First Book of Samuel", Old, History, 31),
    ("2SA", "2 Samuel", "The Second Book of Samuel", Old, History, 24),
    ("1KI", "1 Kings", "The First Book of the Kings", Old, History, 22),
    ("2KI", "2 Kings", "The Second Book of the Kings", Old, History, 25),
    ("1CH", "1 Chronicles", "The First Book of the Chronicles", Old, History, 29),
    ("2CH", "2 Chronicles", "The Second Book of the Chronicles", Old, History, 36),
    ("EZR", "Ezra", "The Book of Ezra", Old, History, 10),
    ("NEH", "Nehemiah", "The Book of Nehemiah", Old, History, 13),
    ("EST", "Esther", "The Book of Esther", Old, History, 10),
    ("JOB", "Job", "The Book of Job", Old, Poetry, 42),
    ("PSA", "Psalms", "The Book of Psalms", Old, Poetry, 150),
    ("PRO", "Proverbs", "The Proverbs", Old, Poetry, 31),
    ("ECC", "Ecclesiastes", "Ecclesiastes, or The Preacher", Old, Poetry, 12),
    ("SNG", "Song of Solomon", "The Song of Solomon", Old, Poetry, 8),
    ("ISA", "Isaiah", "The Book of the Prophet Isaiah", Old, MajorProphets, 66),
    ("JER", "Jeremiah", "The Book of the Prophet Jeremiah", Old, MajorProphets, 52),
    ("LAM", "Lamentations", "The Lamentations of Jeremiah", Old, MajorProphets, 5),
    ("EZK", "Ezekiel", "The Book of the Prophet Ezekiel", Old, MajorProphets, 48),
    ("DAN", "Daniel", "The Book of Daniel", Old, MajorProphets, 12),
    ("HOS", "Hosea", "Hosea", Old, MinorProphets, 14),
    ("JOL", "Joel", "Joel", Old, MinorProphets, 3),
    ("AMO", "Amos", "Amos", Old, MinorProphets, 9),
    ("OBA", "Obadiah", "Obadiah", Old, MinorProphets, 1),
    ("JON", "Jonah", "Jonah", Old, MinorProphets, 4),
    ("MIC", "Micah", "Micah", Old, MinorProphets, 7),
    ("NAM", "Nahum", "Nahum", Old, MinorProphets, 3),
    ("HAB", "Habakkuk", "Habakkuk", Old, MinorProphets, 3),
    ("ZEP", "Zephaniah", "Zephaniah", Old, MinorProphets, 3),
    ("HAG", "Haggai", "Haggai", Old, MinorProphets, 2),
    ("ZEC", "Zechariah", "Zechariah", Old, MinorProphets, 14),
    ("MAL", "Malachi", "Malachi", Old, MinorProphets, 4),
    ("MAT", "Matthew", "The Gospel According to St. Matthew", New, Gospels, 28),
    ("MRK", "Mark", "The Gospel According to St. Mark", New, Gospels, 16),
    ("LUK", "Luke", "The Gospel According to St. Luke", New, Gospels, 24),
    ("JHN", "John", "The Gospel According to St. John", New, Gospels, 21),
    ("ACT", "Acts", "The Acts of the Apostles", New, Acts, 28),
    ("ROM", "Romans", "The Epistle of Paul the Apostle to the Romans", New, PaulineEpistles, 16),
    ("1CO", "1 Corinthians", "The First Epistle of Paul the Apostle to the Corinthians", New, PaulineEpistles, 16),
    ("2CO", "2 Corinthians", "The Second Epistle of Paul the Apostle to the Corinthians", New, PaulineEpistles, 13),
    ("GAL", "Galatians", "The Epistle of Paul the Apostle to the Galatians", New, PaulineEpistles, 6),
    ("EPH", "Ephesians", "The Epistle of Paul the Apostle to the Ephesians", New, PaulineEpistles, 6),
    ("PHP", "Philippians", "The Epistle of Paul the Apostle to the Philippians", New, PaulineEpistles, 4),
    ("COL", "Colossians", "The Epistle of Paul the Apostle to the Colossians", New, PaulineEpistles, 4),
    ("1TH", "1 Thessalonians", "The First Epistle of Paul the Apostle to the Thessalonians", New, PaulineEpistles, 5),
    ("2TH", "2 Thessalonians", "The Second Epistle of Paul the Apostle to the Thessalonians", New, PaulineEpistles, 3),
    ("1TI", "1 Timothy", "The First Epistle of Paul the Apostle to Timothy", New, PaulineEpistles, 6),
    ("2TI", "2 Timothy", "The Second Epistle of Paul the Apostle to Timothy", New, PaulineEpistles, 4),
    ("TIT", "Titus", "The Epistle of Paul to Titus", New, PaulineEpistles, 3),
    ("PHM", "Philemon", "The Epistle of Paul to Philemon", New, PaulineEpistles, 1),
    ("HEB", "Hebrews", "The Epistle of Paul the Apostle to the Hebrews", New, GeneralEpistles, 13),
    ("JAS", "James", "The General Epistle of James", New, GeneralEpistles, 5),
    ("1PE", "1 Peter", "The First Epistle General of Peter", New, GeneralEpistles, 5),
    ("2PE", "2 Peter", "The Second Epistle General of Peter", New, GeneralEpistles, 3),
    ("1JN", "1 John", "The First Epistle General of John", New, GeneralEpistles, 5),
    ("2JN", "2 John", "The Second Epistle of John", New, GeneralEpistles, 1),
    ("3JN", "3 John", "The Third Epistle of John", New, GeneralEpistles, 1),
    ("JUD", "Jude", "The General Epistle of Jude", New, GeneralEpistles, 1),
    ("REV", "Revelation", "The Revelation of St. John the Divine", New, Apocalyptic, 22),
];

/// Registry of the protestant canon in canonical order.
#[derive(Debug)]
pub struct BookCatalog {
    entries: Vec<Book>,
}

impl BookCatalog {
    pub(crate) fn builtin() -> Self {
        let entries = ROWS
            .iter()
            .map(|&(id, name, long_name, testament, category, chapters)| Book {
                id: id.to_string(),
                name: name.to_string(),
                long_name: long_name.to_string(),
                testament,
                category,
                chapters,
            })
            .collect();
        Self { entries }
    }

    pub fn all(&self) -> &[Book] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&Book> {
        self.entries.iter().find(|b| b.id.eq_ignore_ascii_case(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn by_testament(&self, testament: Testament) -> Vec<&Book> {
        self.entries
            .iter()
            .filter(|b| b.testament == testament)
            .collect()
    }

    pub fn by_category(&self, category: BookCategory) -> Vec<&Book> {
        self.entries
            .iter()
            .filter(|b| b.category == category)
            .collect()
    }

    /// Finds a book by its English name, e.g. "john" or "1 Corinthians".
    pub fn find_by_name(&self, name: &str) -> Option<&Book> {
        let wanted = name.trim();
        self.entries
            .iter()
            .find(|b| b.name.eq_ignore_ascii_case(wanted))
    }

    pub fn total_chapters(&self) -> u32 {
        self.entries.iter().map(|b| b.chapters).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holds_the_sixty_six_books() {
        let catalog = BookCatalog::builtin();
        assert_eq!(catalog.all().len(), 66);
        assert_eq!(catalog.by_testament(Testament::Old).len(), 39);
        assert_eq!(catalog.by_testament(Testament::New).len(), 27);
    }

    #[test]
    fn chapter_counts_add_up() {
        let catalog = BookCatalog::builtin();
        assert_eq!(catalog.total_chapters(), 1189);
        assert_eq!(catalog.get("PSA").unwrap().chapters, 150);
        assert_eq!(catalog.get("OBA").unwrap().chapters, 1);
    }

    #[test]
    fn lookups_ignore_case() {
        let catalog = BookCatalog::builtin();
        assert_eq!(catalog.get("jhn").unwrap().name, "John");
        assert_eq!(catalog.find_by_name("1 corinthians").unwrap().id, "1CO");
        assert!(!catalog.contains("TOB"));
    }

    #[test]
    fn categories_partition_the_canon() {
        let catalog = BookCatalog::builtin();
        assert_eq!(catalog.by_category(BookCategory::Law).len(), 5);
        assert_eq!(catalog.by_category(BookCategory::Gospels).len(), 4);
        assert_eq!(catalog.by_category(BookCategory::MinorProphets).len(), 12);
        assert_eq!(catalog.by_category(BookCategory::PaulineEpistles).len(), 13);
    }
}
