use serde::Serialize;
use std::fmt;

use crate::reference::VerseRange;

/// Passage text as returned by a content provider. The text is carried as
/// is, nothing in this crate looks inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Passage {
    text: String,
    range: VerseRange,
    version: Option<String>,
}

impl Passage {
    pub fn new(text: &str, range: VerseRange, version: Option<&str>) -> Self {
        Self {
            text: text.to_owned(),
            range,
            version: version.map(str::to_owned),
        }
    }
    pub fn text(&self) -> &str {
        &self.text
    }
    pub fn range(&self) -> &VerseRange {
        &self.range
    }
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
    pub fn citation(&self) -> String {
        match &self.version {
            Some(version) => format!("{} ({})", self.range, version),
            None => self.range.to_string(),
        }
    }
}

impl fmt::Display for Passage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}\n\n{}", self.text, self.citation())
    }
}

/// One page of search hits. `total` is what the provider reports overall and
/// is usually larger than the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    verses: Vec<Passage>,
    total: usize,
}

impl SearchResults {
    pub fn new(verses: Vec<Passage>, total: usize) -> Self {
        Self { verses, total }
    }
    pub fn verses(&self) -> &[Passage] {
        &self.verses
    }
    pub fn total(&self) -> usize {
        self.total
    }
    pub fn len(&self) -> usize {
        self.verses.len()
    }
    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }
    pub fn iter(&self) -> std::slice::Iter<'_, Passage> {
        self.verses.iter()
    }
}

impl<'a> IntoIterator for &'a SearchResults {
    type Item = &'a Passage;
    type IntoIter = std::slice::Iter<'a, Passage>;
    fn into_iter(self) -> Self::IntoIter {
        self.verses.iter()
    }
}
