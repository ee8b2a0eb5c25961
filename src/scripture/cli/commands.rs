//! Dispatch: parse arguments, build the [`ContentService`], call it and print.
//!
//! Content commands never fail the process. When the service comes back empty
//! the user gets a dimmed "unavailable" line and exit code 0. Only config and
//! I/O problems reach `main` as errors.

use super::print::{
    render_books, render_chapter, render_chapters, render_config, render_languages,
    render_passage, render_search, render_translations, render_unavailable, render_verse,
};
use super::setup::{Cli, Commands};
use clap::Parser;
use colored::Colorize;
use scripture::catalog;
use scripture::config::{self, ClientConfig, KEYS};
use scripture::error::{ConfigError, ContentError};
use scripture::remote::HttpTransport;
use scripture::ContentService;
use std::path::Path;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Content(#[from] ContentError),
}

pub type Result<T> = std::result::Result<T, CliError>;

struct AppContext {
    service: ContentService<HttpTransport>,
    translation: String,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_dir = config::config_dir()?;

    // Config edits work on the file as saved, without env overrides.
    if let Commands::Config { key, value } = &cli.command {
        return handle_config(&config_dir, key.as_deref(), value.as_deref());
    }

    let config = ClientConfig::load(&config_dir)?.with_env();
    let ctx = init_context(&cli, &config)?;

    match cli.command {
        Commands::Translations { remote } => handle_translations(&ctx, remote).await,
        Commands::Languages => handle_languages(&ctx),
        Commands::Books => handle_books(&ctx).await,
        Commands::Chapters { book } => handle_chapters(&ctx, &book).await,
        Commands::Read { chapter, verses } => handle_read(&ctx, &chapter, verses).await,
        Commands::Verse { id } => handle_verse(&ctx, &id).await,
        Commands::Search {
            query,
            limit,
            offset,
        } => handle_search(&ctx, &query.join(" "), limit, offset).await,
        Commands::Passage { id } => handle_passage(&ctx, &id).await,
        Commands::Random => handle_random(&ctx).await,
        Commands::Config { .. } => Ok(()),
    }
}

/// `RUST_LOG` wins unless `--verbose` asks for debug output.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("scripture=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("scripture=error"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn init_context(cli: &Cli, config: &ClientConfig) -> Result<AppContext> {
    let requested = cli
        .translation
        .as_deref()
        .unwrap_or(&config.default_translation);
    // Abbreviations of known translations map to their ids; anything else is
    // passed through as a remote id.
    let translation = catalog::translations()
        .resolve(requested)
        .map(|t| t.id.clone())
        .unwrap_or_else(|| requested.to_string());

    let service = ContentService::from_config(config)?;
    Ok(AppContext {
        service,
        translation,
    })
}

async fn handle_translations(ctx: &AppContext, remote: bool) -> Result<()> {
    let translations = if remote {
        ctx.service.list_remote_translations().await
    } else {
        ctx.service.list_translations()
    };
    if translations.is_empty() {
        print!("{}", render_unavailable());
    } else {
        print!("{}", render_translations(&translations, &ctx.translation));
    }
    Ok(())
}

fn handle_languages(ctx: &AppContext) -> Result<()> {
    print!("{}", render_languages(&ctx.service.list_languages()));
    Ok(())
}

async fn handle_books(ctx: &AppContext) -> Result<()> {
    let books = ctx.service.list_books(&ctx.translation).await;
    if books.is_empty() {
        print!("{}", render_unavailable());
    } else {
        print!("{}", render_books(&books));
    }
    Ok(())
}

async fn handle_chapters(ctx: &AppContext, book: &str) -> Result<()> {
    let book_id = resolve_book(book);
    let chapters = ctx.service.list_chapters(&ctx.translation, &book_id).await;
    if chapters.is_empty() {
        print!("{}", render_unavailable());
    } else {
        print!("{}", render_chapters(&chapters));
    }
    Ok(())
}

async fn handle_read(ctx: &AppContext, chapter_id: &str, verses: bool) -> Result<()> {
    match ctx
        .service
        .get_chapter(&ctx.translation, chapter_id, verses)
        .await
    {
        Some(chapter) => print!("{}", render_chapter(&chapter, verses)),
        None => print!("{}", render_unavailable()),
    }
    Ok(())
}

async fn handle_verse(ctx: &AppContext, verse_id: &str) -> Result<()> {
    match ctx.service.get_verse(&ctx.translation, verse_id).await {
        Some(verse) => print!("{}", render_verse(&verse)),
        None => print!("{}", render_unavailable()),
    }
    Ok(())
}

async fn handle_search(ctx: &AppContext, query: &str, limit: u32, offset: u32) -> Result<()> {
    let result = ctx
        .service
        .search(&ctx.translation, query, limit, offset)
        .await;
    print!("{}", render_search(&result));
    Ok(())
}

async fn handle_passage(ctx: &AppContext, passage_id: &str) -> Result<()> {
    match ctx.service.get_passage(&ctx.translation, passage_id).await {
        Some(passage) => print!("{}", render_passage(&passage)),
        None => print!("{}", render_unavailable()),
    }
    Ok(())
}

async fn handle_random(ctx: &AppContext) -> Result<()> {
    match ctx.service.random_verse(Some(&ctx.translation)).await {
        Some(verse) => print!("{}", render_verse(&verse)),
        None => print!("{}", render_unavailable()),
    }
    Ok(())
}

fn handle_config(config_dir: &Path, key: Option<&str>, value: Option<&str>) -> Result<()> {
    let mut config = ClientConfig::load(config_dir)?;
    match (key, value) {
        (None, _) => {
            let entries = KEYS
                .iter()
                .map(|key| Ok((*key, config.get(key)?)))
                .collect::<std::result::Result<Vec<_>, ConfigError>>()?;
            print!("{}", render_config(&entries));
        }
        (Some(key), None) => {
            println!("{}", config.get(key)?);
        }
        (Some(key), Some(value)) => {
            config.set(key, value)?;
            config.save(config_dir)?;
            println!("{}", format!("{} set to {}", key, value).green());
        }
    }
    Ok(())
}

/// Accepts a USFM id (`JHN`) or a name (`John`, `1 Corinthians`).
fn resolve_book(input: &str) -> String {
    let books = catalog::books();
    books
        .get(input)
        .or_else(|| books.find_by_name(input))
        .map(|b| b.id.clone())
        .unwrap_or_else(|| input.to_uppercase())
}
