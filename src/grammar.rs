//! The reference grammar, assembled from small pattern fragments and compiled
//! once into four matchers:
//!
//! * `exact` – the whole input is a reference, no translation code;
//! * `exact_with_version` – the whole input is a reference with an optional
//!   trailing translation code (`John 3:16 NASB`);
//! * `anywhere` – finds references in running text, either bare
//!   (`John 3:16`) or wrapped in brackets with an optional translation code
//!   inside them (`[John 3:16 NASB]`);
//! * `bracketed` – finds bracket-wrapped references only.
//!
//! The book token is an alternation of every spelling in the registry, longest
//! first. Inside brackets an unknown word is also accepted as a book so the
//! reference can be reported back rather than silently skipped.

use regex::{Captures, Regex, RegexBuilder};
use std::collections::HashSet;
use tracing::debug;

use crate::book::BookRegistry;
use crate::error::Result;

pub const BOOK: &str = "book";
pub const CHAPTER_START: &str = "chapter_start";
pub const VERSE_START: &str = "verse_start";
pub const CHAPTER_END: &str = "chapter_end";
pub const VERSE_END: &str = "verse_end";
pub const VERSION: &str = "version";

// prefix of the groups in the bracketed branch of `anywhere`, since the
// regex crate does not allow a group name to appear twice
const BRACKETED: &str = "bracketed_";

const NUMBER: &str = "[0-9]+";
const COLON: &str = r"\s*:\s*";
const DASH: &str = r"[-\x{2013}\x{2014}]";
const TRANSLATION: &str = "[A-Za-z0-9]+";
const UNKNOWN_BOOK: &str = r"(?:[0-9]\s?)?\p{L}+";

// the case folded book alternation is large
const SIZE_LIMIT: usize = 64 * (1 << 20);

/// Every distinct spelling of every book, longest first. Spellings that only
/// differ by case are kept once, in the form first seen in the dataset.
pub fn book_literals(registry: &BookRegistry) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut literals: Vec<String> = registry
        .iter()
        .flat_map(|book| book.forms())
        .filter(|form| seen.insert(form.to_lowercase()))
        .map(str::to_owned)
        .collect();
    // stable, so equally long spellings keep their dataset order
    literals.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));
    literals
}

fn locator(books: &str, prefix: &str, unknown_books: bool) -> String {
    let book = if unknown_books {
        format!("{}|{}", books, UNKNOWN_BOOK)
    } else {
        books.to_owned()
    };
    format!(
        r"(?P<{p}{BOOK}>{book})\.?\s+(?P<{p}{CHAPTER_START}>{NUMBER}){COLON}(?P<{p}{VERSE_START}>{NUMBER})(?:\s*{DASH}\s*(?:(?P<{p}{CHAPTER_END}>{NUMBER}){COLON})?(?P<{p}{VERSE_END}>{NUMBER}))?",
        p = prefix,
        book = book,
    )
}

fn translation(prefix: &str) -> String {
    format!(r"(?:\s+(?P<{p}{VERSION}>{TRANSLATION}))?", p = prefix)
}

fn compile(pattern: &str) -> Result<Regex> {
    Ok(RegexBuilder::new(pattern)
        .case_insensitive(true)
        .size_limit(SIZE_LIMIT)
        .build()?)
}

#[derive(Debug, Clone)]
pub struct ReferenceGrammar {
    exact: Regex,
    exact_with_version: Regex,
    anywhere: Regex,
    bracketed: Regex,
}

impl ReferenceGrammar {
    pub fn new(registry: &BookRegistry) -> Result<Self> {
        let literals = book_literals(registry);
        let books = literals
            .iter()
            .map(|literal| regex::escape(literal))
            .collect::<Vec<_>>()
            .join("|");

        let bare = locator(&books, "", false);
        let exact = compile(&format!("^{}$", bare))?;
        let exact_with_version = compile(&format!("^{}{}$", bare, translation("")))?;
        let anywhere = compile(&format!(
            r"\[\s*{}{}\s*\]|{}",
            locator(&books, BRACKETED, true),
            translation(BRACKETED),
            bare
        ))?;
        let bracketed = compile(&format!(
            r"\[\s*{}{}\s*\]",
            locator(&books, "", true),
            translation("")
        ))?;
        debug!(literals = literals.len(), "reference grammar compiled");
        Ok(Self {
            exact,
            exact_with_version,
            anywhere,
            bracketed,
        })
    }
    pub fn exact(&self) -> &Regex {
        &self.exact
    }
    pub fn exact_with_version(&self) -> &Regex {
        &self.exact_with_version
    }
    /// The matcher used when scanning running text.
    pub fn scanner(&self, only_bracketed: bool) -> &Regex {
        if only_bracketed {
            &self.bracketed
        } else {
            &self.anywhere
        }
    }
}

/// Reads a group from a match, whichever branch of the pattern produced it.
pub(crate) fn field<'t>(captures: &Captures<'t>, name: &str) -> Option<&'t str> {
    captures
        .name(name)
        .or_else(|| captures.name(&format!("{}{}", BRACKETED, name)))
        .map(|m| m.as_str())
}
