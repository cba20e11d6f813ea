//! Heuristic stages of the structure-extraction pipeline.
//!
//! Each submodule implements exactly one inference step. Keeping stages
//! separate makes each independently testable and lets thresholds be
//! recalibrated against a corpus without touching neighbouring stages.
//!
//! ## Data Flow
//!
//! ```text
//! samples ──▶ classify ──▶ config
//!                            │
//! page text ─┬─▶ firstpage ──┤   (skip/scan content heuristic)
//!            ├─▶ index ──────┤   (3-tier locator + entry parser)
//!            └─▶ textgrid ──▶ tables   (grid validation + normalisation)
//! ```
//!
//! 1. [`classify`]  — score sparse text samples into a [`classify::BookType`]
//!    and map it to pre-tuned extraction thresholds
//! 2. [`firstpage`] — find the first content page past the front matter
//! 3. [`index`]     — locate TOC/index pages with cascading strategies and
//!    parse them into entries
//! 4. [`textgrid`]  — derive raw table candidates from a page's text layer
//! 5. [`tables`]    — validate candidates and normalise them into
//!    structured records

pub mod classify;
pub mod firstpage;
pub mod index;
pub mod tables;
pub mod textgrid;
