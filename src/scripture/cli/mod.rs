//! # CLI Behavior
//!
//! This is **one possible UI client** for scripture, not the application itself.
//! The CLI is the only place that knows about terminal I/O, exit codes and
//! output formatting.
//!
//! For the overall architecture, see the library documentation.
//!
//! ## Translation
//!
//! Every content command reads from one translation: `--translation/-t` if
//! given, otherwise `default-translation` from the config. Both accept an id
//! or, for the built-in catalog, an abbreviation (`-t web`).
//!
//! ## Unavailable Content
//!
//! The service never fails a content call. An empty answer prints
//! "Content unavailable, try again later." and the process still exits 0, so
//! scripts can tell a missing passage apart from a broken setup (exit 1).
//!
//! ## Structure
//!
//! - `setup.rs`: clap definitions and version string
//! - `commands.rs`: `run()`, context wiring and per-command handlers
//! - `print.rs`: rendering to strings (colors, wrapping, columns)

mod commands;
mod print;
mod setup;

pub use commands::run;
