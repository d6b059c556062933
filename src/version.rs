use serde::{Deserialize, Serialize};
use std::fmt;

use crate::book::{BookEntry, BookRegistry};

/// A translation that can be requested from a provider.
///
/// `command` is the short code users type (`esv`), `service` names the
/// provider and `service_version` is the provider's own identifier for the
/// translation. `books` is a section mask telling which parts of the canon
/// the translation covers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BibleVersion {
    pub command: String,
    pub name: String,
    pub abbr: String,
    pub service: String,
    pub service_version: String,
    #[serde(default)]
    pub rtl: bool,
    pub books: u64,
}

impl BibleVersion {
    /// The books covered by this translation, see
    /// [`BookRegistry::expand_section_mask`].
    pub fn covered_books<'r>(&self, registry: &'r BookRegistry) -> Vec<&'r BookEntry> {
        registry.expand_section_mask(self.books)
    }
}

impl fmt::Display for BibleVersion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.abbr)
    }
}
