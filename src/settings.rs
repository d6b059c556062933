use config::{Config, Environment, File};
use serde::Deserialize;

use crate::book::BookRegistry;
use crate::error::Result;

// looked up in the working directory with any extension `config` supports
const DEFAULT_FILE: &str = "bibleref";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Translation command used when neither the user nor the guild chose one.
    pub default_version: String,
    /// Only pick up references written in brackets when scanning.
    pub only_bracketed: bool,
    /// A book dataset to use instead of the embedded one.
    pub books: Option<String>,
    /// Where the translation preferences are kept.
    pub database: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_version: "esv".to_owned(),
            only_bracketed: false,
            books: None,
            database: None,
        }
    }
}

impl Settings {
    /// Layers defaults, an optional settings file and `BIBLEREF_*` environment
    /// variables, later sources winning. Without a path the file is optional.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let file = match path {
            Some(path) => File::with_name(path).required(true),
            None => File::with_name(DEFAULT_FILE).required(false),
        };
        let settings = Config::builder()
            .set_default("default_version", "esv")?
            .set_default("only_bracketed", false)?
            .add_source(file)
            .add_source(Environment::with_prefix("BIBLEREF"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
    pub fn registry(&self) -> Result<BookRegistry> {
        match &self.books {
            Some(path) => BookRegistry::from_path(path),
            None => BookRegistry::embedded(),
        }
    }
}
