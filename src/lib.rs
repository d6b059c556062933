//! Bibleref – finds scripture references in free-form text.
//!
//! A reference names a book, a chapter and a verse, optionally a range and a
//! translation code: `John 3:16`, `Gen. 1:1-3`, `[Rom 8:28 - 9:2 NASB]`.
//! Resolution is built from three pieces:
//! * A [`book::BookRegistry`] holds the canonical book dataset (name, OSIS code,
//!   paratext code, aliases, canon section) with case-insensitive lookups.
//! * A [`grammar::ReferenceGrammar`] compiles the registry's spellings into a
//!   handful of regular expressions, once.
//! * A [`reference::Resolver`] applies the grammar to text and turns matches
//!   into [`reference::VerseRange`] values.
//!
//! ## Scanning
//! [`Resolver::scan_all`] returns one entry per reference it found, each an
//! `Ok(VerseRange)` or an `Err(ReferenceError)`. A reference that fails to
//! resolve never hides the others:
//! ```
//! use bibleref::ReferenceError;
//! let found = bibleref::scan_all("See [Frobnicate 9:9] and [John 3:16 NASB]", false);
//! assert_eq!(found.len(), 2);
//! assert_eq!(found[0], Err(ReferenceError::BookNotUnderstood("Frobnicate".into())));
//! let john = found[1].as_ref().unwrap();
//! assert_eq!(john.to_string(), "John 3:16");
//! assert_eq!(john.version(), Some("NASB"));
//! ```
//!
//! ## Exact parsing
//! [`parse_exact`] and [`parse_exact_with_version`] accept a string only when
//! all of it is a reference. The rendered form of a range parses back to it:
//! ```
//! let range = bibleref::parse_exact("rom 8:28-9:2").unwrap();
//! assert_eq!(range.to_string(), "Romans 8:28-9:2");
//! assert_eq!(bibleref::parse_exact(&range.to_string()).unwrap(), range);
//! ```
//!
//! ## Around the core
//! * [`version`] and [`persist`] – translation records and a SQLite store for
//!   the translation each user or guild prefers.
//! * [`service`] – the interface passage and search providers implement.
//! * [`settings`] – configuration from files and the environment.
//!
//! The free functions in this module share one resolver over the embedded
//! dataset, built on first use. Build a [`Resolver`] yourself to use another
//! dataset.

pub mod book;
pub mod error;
pub mod grammar;
pub mod passage;
pub mod persist;
pub mod reference;
pub mod service;
pub mod settings;
pub mod version;

pub use book::{BookEntry, BookRegistry, Section};
pub use error::{BiblerefError, ReferenceError, Result, ServiceError};
pub use passage::{Passage, SearchResults};
pub use reference::{Resolver, Scanned, Verse, VerseRange};
pub use version::BibleVersion;

use lazy_static::lazy_static;
use std::sync::Arc;

lazy_static! {
    // The embedded dataset is part of the build, a defect in it is fatal.
    static ref RESOLVER: Resolver = BookRegistry::embedded()
        .and_then(|registry| Resolver::new(Arc::new(registry)))
        .unwrap_or_else(|e| panic!("the embedded book dataset is unusable: {}", e));
}

/// The resolver behind the free functions of this crate.
pub fn resolver() -> &'static Resolver {
    &RESOLVER
}

pub fn registry() -> &'static BookRegistry {
    RESOLVER.registry()
}

pub fn parse_exact(text: &str) -> std::result::Result<VerseRange, ReferenceError> {
    RESOLVER.parse_exact(text)
}

pub fn parse_exact_with_version(text: &str) -> std::result::Result<VerseRange, ReferenceError> {
    RESOLVER.parse_exact_with_version(text)
}

pub fn scan_all(text: &str, only_bracketed: bool) -> Vec<Scanned> {
    RESOLVER.scan_all(text, only_bracketed)
}
