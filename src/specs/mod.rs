// src/specs/mod.rs
//! # Scraping “specs” module
//!
//! This module hosts the **page-specific scraping specifications**. Each spec
//! focuses on a single page kind and encodes *where the ground truth lives in
//! the HTML* and *how to extract it robustly*.
//!
//! ## What lives here
//! - **Pure HTML parsing** of the two page kinds the pipeline reads: a league
//!   landing page (club links) and a club squad page (player rows).
//! - **Selector precedence** as ordered strategy lists per field (e.g. the
//!   dedicated name cell before the first anchor in the row, `alt` before
//!   `title` for the flag in the nationality cell).
//! - **Tolerant extraction** through `core::html` helpers and `scraper`
//!   selectors. Unparseable rows are skipped, never reported.
//!
//! ## What does **not** live here
//! - **Retries, headers, pacing** – `core::net` and `throttle`.
//! - **Dedup/merge** – `merge`. Specs return raw rows, duplicates included.
//! - **Persistence** – `store`.
//!
//! ## Typical call chain
//! ```text
//! scrape::run_league → specs::teams::discover_league → {team id → squad URL}
//!                   ↘ Fetcher::fetch(squad URL) → specs::roster::extract
//!                                              ↘ store::save_team (merges)
//! ```
//!
//! ## Conventions & invariants
//! - Selectors are parsed once (`selector!`) and regexes live in `LazyLock`s.
//! - Extraction is pure: `&str` in, owned records out, no I/O, no logging spam.
//! - Team ids are canonical slugs (`core::sanitize::canonical_team_id`), so
//!   re-running discovery always maps a club to the same file.
//!
//! ## Testing notes
//! - Specs are testable **offline** against inline or fixture HTML.
//!
//! In short: **`specs` knows how to read the pages.** Other layers decide when
//! to fetch, how to merge, and where to write.
pub mod roster;
pub mod teams;
