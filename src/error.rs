use thiserror::Error;

/// The two ways a reference can fail to resolve. Both are recoverable and
/// are handed back to the caller, either directly from the exact parsers or
/// inline in the sequence returned by a scan.
#[derive(Error, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReferenceError {
    #[error("Book not understood: {0}")]
    BookNotUnderstood(String),
    #[error("Reference not understood: {0}")]
    ReferenceNotUnderstood(String),
}

#[derive(Error, Debug)]
pub enum BiblerefError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Dataset error: {0}")]
    Dataset(String),
    #[error("Duplicate alias '{alias}' claimed by both {first} and {second}")]
    DuplicateAlias { alias: String, first: String, second: String },
    #[error("Duplicate book name: {0}")]
    DuplicateBook(String),
    #[error("Grammar error: {0}")]
    Grammar(String),
    #[error("Persistence error: {0}")]
    Persistence(String),
    #[error("Invalid version: {0}")]
    InvalidVersion(String),
    #[error("I/O error: {0}")]
    Io(String),
    #[error(transparent)]
    Reference(#[from] ReferenceError),
}

pub type Result<T> = std::result::Result<T, BiblerefError>;

// Helper conversions
impl From<rusqlite::Error> for BiblerefError {
    fn from(e: rusqlite::Error) -> Self { Self::Persistence(e.to_string()) }
}
impl From<config::ConfigError> for BiblerefError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
impl From<serde_json::Error> for BiblerefError {
    fn from(e: serde_json::Error) -> Self { Self::Dataset(e.to_string()) }
}
impl From<std::io::Error> for BiblerefError {
    fn from(e: std::io::Error) -> Self { Self::Io(e.to_string()) }
}
impl From<regex::Error> for BiblerefError {
    fn from(e: regex::Error) -> Self { Self::Grammar(e.to_string()) }
}

/// Failures reported by a passage or search provider.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Timed out looking up {verses} ({version})")]
    LookupTimeout { version: String, verses: String },
    #[error("Timed out searching for \"{terms}\" ({version})")]
    SearchTimeout { version: String, terms: String },
    #[error("The service response was not understood")]
    DoNotUnderstand,
    #[error("Transport error: {0}")]
    Transport(String),
    #[error(transparent)]
    Reference(#[from] ReferenceError),
}
