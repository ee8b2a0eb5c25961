//! Terminal rendering. Every `render_*` returns the text to print so it can be
//! checked without a terminal; `commands.rs` does the printing.

use colored::Colorize;
use scripture::model::{
    Book, Chapter, ChapterSummary, Language, Passage, ScriptDirection, SearchResult, Testament,
    Translation, Verse,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 80;
const INDENT: &str = "    ";
const UNAVAILABLE: &str = "Content unavailable, try again later.";

pub(super) fn render_unavailable() -> String {
    format!("{}\n", UNAVAILABLE.dimmed())
}

pub(super) fn render_translations(translations: &[Translation], default_id: &str) -> String {
    let abbreviation_width = column_width(translations.iter().map(|t| t.abbreviation.as_str()));
    let mut out = String::new();
    for t in translations {
        let marker = if t.id == default_id { "*" } else { " " };
        let direction = match t.direction {
            ScriptDirection::Rtl => " rtl",
            ScriptDirection::Ltr => "",
        };
        let name = truncate_to_width(&t.name, LINE_WIDTH.saturating_sub(abbreviation_width + 12));
        out.push_str(&format!(
            "{} {} {}  {}\n",
            marker.yellow(),
            pad_to_width(&t.abbreviation, abbreviation_width).bold(),
            name,
            format!("[{}{}]", t.language_code, direction).dimmed()
        ));
    }
    out
}

pub(super) fn render_languages(languages: &[Language]) -> String {
    let mut out = String::new();
    for language in languages {
        let abbreviations: Vec<&str> = language
            .translations
            .iter()
            .map(|t| t.abbreviation.as_str())
            .collect();
        out.push_str(&format!(
            "{} {}  {}\n",
            language.code.yellow(),
            language.name.bold(),
            abbreviations.join(", ").dimmed()
        ));
    }
    out
}

pub(super) fn render_books(books: &[Book]) -> String {
    let mut out = String::new();
    for testament in [Testament::Old, Testament::New] {
        let section: Vec<&Book> = books.iter().filter(|b| b.testament == testament).collect();
        if section.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
        }
        let heading = match testament {
            Testament::Old => "Old Testament",
            Testament::New => "New Testament",
        };
        out.push_str(&format!("{}\n", heading.bold()));
        for book in section {
            out.push_str(&format!(
                "{}{} {}  {}\n",
                INDENT,
                book.id.yellow(),
                pad_to_width(&book.name, 18),
                format!("{} ch · {}", book.chapters, book.category.as_str()).dimmed()
            ));
        }
    }
    out
}

pub(super) fn render_chapters(chapters: &[ChapterSummary]) -> String {
    let ids: Vec<&str> = chapters.iter().map(|c| c.id.as_str()).collect();
    let mut out = String::new();
    for line in wrap(&ids.join("  "), LINE_WIDTH) {
        out.push_str(&line);
        out.push('\n');
    }
    out
}

pub(super) fn render_chapter(chapter: &Chapter, numbered_verses: bool) -> String {
    let mut out = format!("{}\n\n", chapter.summary.reference.bold());
    if numbered_verses && !chapter.verses.is_empty() {
        for verse in &chapter.verses {
            out.push_str(&render_numbered(verse));
        }
    } else {
        out.push_str(&render_wrapped(&chapter.text, ""));
    }
    out
}

pub(super) fn render_verse(verse: &Verse) -> String {
    format!(
        "{}\n{}",
        verse.reference.bold(),
        render_wrapped(&verse.text, INDENT)
    )
}

pub(super) fn render_passage(passage: &Passage) -> String {
    format!(
        "{}\n{}",
        passage.reference.bold(),
        render_wrapped(&passage.text, INDENT)
    )
}

pub(super) fn render_search(result: &SearchResult) -> String {
    if result.verses.is_empty() {
        return format!("{}\n", format!("No verses found for \"{}\".", result.query).dimmed());
    }

    let mut out = String::new();
    for verse in &result.verses {
        out.push_str(&format!("{}\n", verse.reference.yellow()));
        out.push_str(&render_wrapped(&verse.text, INDENT));
    }
    let first = result.offset + 1;
    let last = result.offset + result.verses.len() as u32;
    out.push_str(&format!(
        "\n{}\n",
        format!("{}-{} of {}", first, last, result.total).dimmed()
    ));
    out
}

pub(super) fn render_config(entries: &[(&str, String)]) -> String {
    let width = column_width(entries.iter().map(|(key, _)| *key));
    entries
        .iter()
        .map(|(key, value)| format!("{} = {}\n", pad_to_width(key, width), value))
        .collect()
}

fn render_numbered(verse: &Verse) -> String {
    let number = format!("{:>3} ", verse.number);
    let lines = wrap(&verse.text, LINE_WIDTH - number.width());
    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        if i == 0 {
            out.push_str(&format!("{}{}\n", number.dimmed(), line));
        } else {
            out.push_str(&format!("{}{}\n", " ".repeat(number.width()), line));
        }
    }
    out
}

fn render_wrapped(text: &str, indent: &str) -> String {
    wrap(text, LINE_WIDTH - indent.width())
        .into_iter()
        .map(|line| format!("{}{}\n", indent, line))
        .collect()
}

/// Greedy word wrap by display width. Words wider than `width` get a line
/// of their own.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.width() + 1 + word.width() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn pad_to_width(s: &str, width: usize) -> String {
    format!("{}{}", s, " ".repeat(width.saturating_sub(s.width())))
}

fn column_width<'a>(values: impl Iterator<Item = &'a str>) -> usize {
    values.map(|v| v.width()).max().unwrap_or(0)
}
