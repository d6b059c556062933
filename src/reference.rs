use regex::Captures;
use serde::Serialize;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::book::{BookRegistry, Section};
use crate::error::{ReferenceError, Result};
use crate::grammar::{self, ReferenceGrammar};

/// The outcome of resolving a single match found while scanning text.
pub type Scanned = std::result::Result<VerseRange, ReferenceError>;

// ------------- Verse -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Verse {
    chapter: u32,
    verse: u32,
}

impl Verse {
    pub fn new(chapter: u32, verse: u32) -> Self {
        Self { chapter, verse }
    }
    pub fn chapter(&self) -> u32 {
        self.chapter
    }
    pub fn verse(&self) -> u32 {
        self.verse
    }
}

impl fmt::Display for Verse {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.chapter, self.verse)
    }
}

// ------------- VerseRange -------------
/// A resolved reference. The only way to obtain one is through
/// [`VerseRange::create`] (or the parsers built on it), so the book is always
/// a canonical name from the registry.
///
/// An end that precedes the start (`John 3:20-3:5`) is kept as written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct VerseRange {
    book: String,
    start: Verse,
    end: Option<Verse>,
    version: Option<String>,
    section: Section,
    osis: String,
    paratext: Option<String>,
}

impl VerseRange {
    pub fn create(
        registry: &BookRegistry,
        book: &str,
        start: Verse,
        end: Option<Verse>,
        version: Option<&str>,
    ) -> std::result::Result<Self, ReferenceError> {
        let entry = registry.resolve(book)?;
        Ok(Self {
            book: entry.name().to_owned(),
            start,
            end,
            version: version.map(str::to_owned),
            section: entry.section(),
            osis: entry.osis().to_owned(),
            paratext: entry.paratext().map(str::to_owned),
        })
    }
    pub fn book(&self) -> &str {
        &self.book
    }
    pub fn start(&self) -> Verse {
        self.start
    }
    pub fn end(&self) -> Option<Verse> {
        self.end
    }
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
    pub fn section(&self) -> Section {
        self.section
    }
    pub fn osis(&self) -> &str {
        &self.osis
    }
    pub fn paratext(&self) -> Option<&str> {
        self.paratext.as_deref()
    }
    /// The same range under another (or no) translation code.
    pub fn with_version(self, version: Option<&str>) -> Self {
        Self {
            version: version.map(str::to_owned),
            ..self
        }
    }
    /// The chapter and verse part, `3:16`, `3:16-18` or `3:16-4:1`.
    pub fn verses(&self) -> String {
        match self.end {
            Some(end) if end.chapter == self.start.chapter => {
                format!("{}-{}", self.start, end.verse)
            }
            Some(end) => format!("{}-{}", self.start, end),
            None => self.start.to_string(),
        }
    }
}

// Providers build their requests from this form, and it parses back to the
// same range (less the translation code).
impl fmt::Display for VerseRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.book, self.verses())
    }
}

impl FromStr for VerseRange {
    type Err = ReferenceError;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        crate::parse_exact_with_version(s)
    }
}

// ------------- Resolver -------------
/// Applies the compiled grammar to text and materializes the matches against
/// the registry. Cheap to share, nothing in it changes after construction.
#[derive(Debug, Clone)]
pub struct Resolver {
    registry: Arc<BookRegistry>,
    grammar: ReferenceGrammar,
}

impl Resolver {
    pub fn new(registry: Arc<BookRegistry>) -> Result<Self> {
        let grammar = ReferenceGrammar::new(&registry)?;
        Ok(Self { registry, grammar })
    }
    pub fn registry(&self) -> &BookRegistry {
        &self.registry
    }
    pub fn grammar(&self) -> &ReferenceGrammar {
        &self.grammar
    }
    /// The whole of `text` must be a reference without a translation code.
    pub fn parse_exact(&self, text: &str) -> std::result::Result<VerseRange, ReferenceError> {
        let captures = self
            .grammar
            .exact()
            .captures(text)
            .ok_or_else(|| ReferenceError::ReferenceNotUnderstood(text.to_owned()))?;
        self.materialize(&captures)
    }
    /// The whole of `text` must be a reference, optionally followed by a
    /// translation code.
    pub fn parse_exact_with_version(
        &self,
        text: &str,
    ) -> std::result::Result<VerseRange, ReferenceError> {
        let captures = self
            .grammar
            .exact_with_version()
            .captures(text)
            .ok_or_else(|| ReferenceError::ReferenceNotUnderstood(text.to_owned()))?;
        self.materialize(&captures)
    }
    /// Finds every reference in `text`, left to right. A match that cannot be
    /// resolved shows up as an error in its place and the scan carries on
    /// after it.
    pub fn scan_all(&self, text: &str, only_bracketed: bool) -> Vec<Scanned> {
        let scanned: Vec<Scanned> = self
            .grammar
            .scanner(only_bracketed)
            .captures_iter(text)
            .map(|captures| {
                let result = self.materialize(&captures);
                if let Err(e) = &result {
                    debug!(error = %e, "reference not resolved");
                }
                result
            })
            .collect();
        trace!(found = scanned.len(), only_bracketed, "scanned text");
        scanned
    }
    fn materialize(&self, captures: &Captures) -> std::result::Result<VerseRange, ReferenceError> {
        let matched = captures.get(0).map_or("", |m| m.as_str());
        let not_understood = || ReferenceError::ReferenceNotUnderstood(matched.to_owned());
        let number = |name: &str| -> std::result::Result<u32, ReferenceError> {
            grammar::field(captures, name)
                .ok_or_else(not_understood)?
                .parse::<u32>()
                .map_err(|_| not_understood())
        };

        let chapter_start = number(grammar::CHAPTER_START)?;
        let start = Verse::new(chapter_start, number(grammar::VERSE_START)?);
        let end = match grammar::field(captures, grammar::VERSE_END) {
            Some(_) => {
                let chapter_end = match grammar::field(captures, grammar::CHAPTER_END) {
                    Some(_) => number(grammar::CHAPTER_END)?,
                    None => chapter_start,
                };
                Some(Verse::new(chapter_end, number(grammar::VERSE_END)?))
            }
            None => None,
        };
        let version = grammar::field(captures, grammar::VERSION);
        let book = grammar::field(captures, grammar::BOOK).ok_or_else(not_understood)?;

        VerseRange::create(&self.registry, book, start, end, version)
    }
}
