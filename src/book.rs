// used to read the book dataset
use serde::{Deserialize, Serialize, Serializer};

// the alias lookups are string keyed, so a fast hasher is used for them
use core::hash::BuildHasherDefault;
use seahash::SeaHasher;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::error::{BiblerefError, ReferenceError, Result};

pub type AliasHasher = BuildHasherDefault<SeaHasher>;

// The canonical dataset shipped with the crate.
const EMBEDDED_BOOKS: &str = include_str!("../data/books.json");

// ------------- Section -------------
/// Groups books by canon division. Old and New Testament books share the
/// bits `1` and `2`, the remaining books each carry a bit of their own, and
/// a few container books are only tagged as deuterocanonical.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "RawSection")]
pub enum Section {
    Mask(u64),
    Deuterocanonical,
}

impl Section {
    pub const OLD_TESTAMENT: u64 = 1;
    pub const NEW_TESTAMENT: u64 = 2;

    pub fn mask(&self) -> Option<u64> {
        match self {
            Section::Mask(bits) => Some(*bits),
            Section::Deuterocanonical => None,
        }
    }
}

// A section is either a number or the literal tag "DC" in the dataset.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawSection {
    Mask(u64),
    Tag(String),
}

impl TryFrom<RawSection> for Section {
    type Error = String;
    fn try_from(raw: RawSection) -> std::result::Result<Self, Self::Error> {
        match raw {
            RawSection::Mask(bits) => Ok(Section::Mask(bits)),
            RawSection::Tag(tag) if tag == "DC" => Ok(Section::Deuterocanonical),
            RawSection::Tag(tag) => Err(format!("unknown section tag '{}'", tag)),
        }
    }
}

impl Serialize for Section {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Section::Mask(bits) => serializer.serialize_u64(*bits),
            Section::Deuterocanonical => serializer.serialize_str("DC"),
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Section::Mask(bits) => write!(f, "{}", bits),
            Section::Deuterocanonical => write!(f, "DC"),
        }
    }
}

// ------------- Book -------------
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookEntry {
    name: String,
    osis: String,
    #[serde(default)]
    paratext: Option<String>,
    #[serde(default)]
    alt: Vec<String>,
    section: Section,
}

impl BookEntry {
    pub fn new(
        name: &str,
        osis: &str,
        paratext: Option<&str>,
        aliases: &[&str],
        section: Section,
    ) -> Self {
        Self {
            name: name.to_owned(),
            osis: osis.to_owned(),
            paratext: paratext.map(str::to_owned),
            alt: aliases.iter().map(|alias| (*alias).to_owned()).collect(),
            section,
        }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn osis(&self) -> &str {
        &self.osis
    }
    pub fn paratext(&self) -> Option<&str> {
        self.paratext.as_deref()
    }
    pub fn aliases(&self) -> &[String] {
        &self.alt
    }
    pub fn section(&self) -> Section {
        self.section
    }
    /// Every spelling that refers to this book: name, OSIS code, then the aliases.
    pub fn forms(&self) -> impl Iterator<Item = &str> {
        [self.name.as_str(), self.osis.as_str()]
            .into_iter()
            .chain(self.alt.iter().map(String::as_str))
    }
}

impl fmt::Display for BookEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

// ------------- Registry -------------
/// Read-only lookup tables over the book dataset. Built once and then shared,
/// every lookup is case-insensitive.
#[derive(Debug)]
pub struct BookRegistry {
    books: Vec<Arc<BookEntry>>,
    names: HashMap<String, String, AliasHasher>,
    entries: HashMap<String, Arc<BookEntry>, AliasHasher>,
    sections: HashMap<String, Section, AliasHasher>,
}

fn fold(form: &str) -> String {
    form.to_lowercase()
}

impl BookRegistry {
    /// Builds the lookup tables. A spelling claimed by two different books,
    /// or a repeated canonical name, is a defect in the dataset.
    pub fn load(dataset: Vec<BookEntry>) -> Result<Self> {
        let mut registry = Self {
            books: Vec::with_capacity(dataset.len()),
            names: HashMap::default(),
            entries: HashMap::default(),
            sections: HashMap::default(),
        };
        for book in dataset {
            let book = Arc::new(book);
            match registry.sections.entry(book.name().to_owned()) {
                Entry::Occupied(_) => {
                    return Err(BiblerefError::DuplicateBook(book.name().to_owned()));
                }
                Entry::Vacant(e) => {
                    e.insert(book.section());
                }
            }
            for form in book.forms() {
                match registry.entries.entry(fold(form)) {
                    Entry::Occupied(e) => {
                        // the same book may well repeat a spelling (name == OSIS code)
                        if e.get().name() != book.name() {
                            return Err(BiblerefError::DuplicateAlias {
                                alias: form.to_owned(),
                                first: e.get().name().to_owned(),
                                second: book.name().to_owned(),
                            });
                        }
                    }
                    Entry::Vacant(e) => {
                        registry
                            .names
                            .insert(e.key().clone(), book.name().to_owned());
                        e.insert(Arc::clone(&book));
                    }
                }
            }
            registry.books.push(book);
        }
        debug!(
            books = registry.books.len(),
            aliases = registry.entries.len(),
            "book registry loaded"
        );
        Ok(registry)
    }
    pub fn from_json(json: &str) -> Result<Self> {
        let dataset: Vec<BookEntry> = serde_json::from_str(json)?;
        Self::load(dataset)
    }
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
    /// The registry over the dataset compiled into the crate.
    pub fn embedded() -> Result<Self> {
        Self::from_json(EMBEDDED_BOOKS)
    }
    pub fn resolve(&self, name_or_alias: &str) -> std::result::Result<&BookEntry, ReferenceError> {
        self.entries
            .get(&fold(name_or_alias))
            .map(|book| book.as_ref())
            .ok_or_else(|| ReferenceError::BookNotUnderstood(name_or_alias.to_owned()))
    }
    pub fn canonical_name(&self, name_or_alias: &str) -> Option<&str> {
        self.names.get(&fold(name_or_alias)).map(String::as_str)
    }
    pub fn section(&self, name: &str) -> Option<Section> {
        self.sections.get(name).copied()
    }
    /// Lists the books selected by a combined section mask, in dataset order.
    ///
    /// The bits `1` and `2` stand for whole divisions and only bring in the
    /// first book of their division. Every other book is matched on its own
    /// bit, except those in the two divisions (already covered) and those
    /// tagged deuterocanonical (never selectable by a mask).
    pub fn expand_section_mask(&self, mask: u64) -> Vec<&BookEntry> {
        let mut books = Vec::new();
        if mask & Section::OLD_TESTAMENT != 0 {
            books.extend(self.first_in(Section::OLD_TESTAMENT));
        }
        if mask & Section::NEW_TESTAMENT != 0 {
            books.extend(self.first_in(Section::NEW_TESTAMENT));
        }
        for book in &self.books {
            match book.section() {
                Section::Mask(bits)
                    if bits != Section::OLD_TESTAMENT && bits != Section::NEW_TESTAMENT =>
                {
                    if mask & bits != 0 {
                        books.push(book.as_ref());
                    }
                }
                _ => (),
            }
        }
        books
    }
    fn first_in(&self, division: u64) -> Option<&BookEntry> {
        self.books
            .iter()
            .find(|book| book.section() == Section::Mask(division))
            .map(|book| book.as_ref())
    }
    pub fn iter(&self) -> impl Iterator<Item = &BookEntry> {
        self.books.iter().map(|book| book.as_ref())
    }
    pub fn len(&self) -> usize {
        self.books.len()
    }
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}
