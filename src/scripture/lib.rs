//! # Scripture Architecture
//!
//! Scripture is a **UI-agnostic content library**. It turns a remote, paginated,
//! rate-limited HTTP API for biblical texts into a normalized, cached local data
//! source. The `scripture` binary is one small client of it, nothing more.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Service Layer (service.rs)                                 │
//! │  - Entity-shaped methods: books, chapters, verses, search   │
//! │  - Cache lookup → fetch → normalize → store                 │
//! │  - Lenient methods (empty on failure) and strict `try_`s    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!              ┌───────────────┼────────────────┐
//!              ▼               ▼                ▼
//!      catalog/ (static)   cache.rs (TTL)   remote/ (executor, wire)
//!                                               │
//!                                               ▼
//!                                   Transport trait (HTTP or mock)
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `service.rs` inward, code takes regular Rust arguments, returns regular
//! Rust types, never prints and never exits. Network access goes through the
//! [`remote::Transport`] trait, so the whole service runs against
//! [`testing::MockTransport`] in tests.
//!
//! ## Testing Strategy
//!
//! 1. **Pure pieces** (`normalize`, `catalog`, `remote::wire`): plain unit tests.
//! 2. **Timing** (`cache`, `remote::executor`): `#[tokio::test(start_paused = true)]`
//!    so TTLs and backoff are checked against tokio's clock without sleeping.
//! 3. **Service**: scripted [`testing::MockTransport`] responses, asserting on
//!    returned values and on how many requests reached the transport.
//! 4. **CLI**: `assert_cmd` runs the binary against a temporary config dir.
//!
//! ## Module Overview
//!
//! - [`service`]: The facade, entry point for all content
//! - [`catalog`]: Built-in translation and book tables
//! - [`cache`]: TTL key/value store
//! - [`remote`]: Transport, retrying executor and wire shapes
//! - [`normalize`]: Markup and entity stripping
//! - [`model`]: Core data types (`Translation`, `Book`, `Chapter`, `Verse`, ...)
//! - [`config`]: Configuration management
//! - [`error`]: Error types
//! - [`testing`]: In-memory transport and a fake canon for tests
//! - `cli`: Argument parsing and printing for the binary (not part of the lib API)

pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod remote;
pub mod service;
pub mod testing;

pub use service::ContentService;
