//! Reads text from stdin and prints every reference found in it, one JSON
//! object per line.
//!
//! ```text
//! echo "I love [John 3:16 NASB]" | bibleref [SETTINGS FILE]
//! ```

use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::Arc;

use rusqlite::Connection;
use serde_json::{json, Value};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use bibleref::persist::Persistor;
use bibleref::settings::Settings;
use bibleref::{Resolver, Result};

fn run() -> Result<()> {
    let path = std::env::args().nth(1);
    let settings = Settings::load(path.as_deref())?;
    let registry = settings.registry()?;
    info!(books = registry.len(), only_bracketed = settings.only_bracketed, "starting");
    let resolver = Resolver::new(Arc::new(registry))?;
    // with a translation catalog at hand the output names the translation
    let db = match &settings.database {
        Some(path) => Some(Connection::open(path)?),
        None => None,
    };
    let mut persistor = match &db {
        Some(db) => Some(Persistor::new(db)?),
        None => None,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in io::stdin().lock().lines() {
        let line = line?;
        for scanned in resolver.scan_all(&line, settings.only_bracketed) {
            let record = match scanned {
                Ok(range) => {
                    let code = range.version().unwrap_or(settings.default_version.as_str());
                    let translation = match persistor.as_mut() {
                        Some(persistor) => persistor
                            .version_by_abbr(code)?
                            .map_or(Value::Null, |version| json!(version)),
                        None => Value::Null,
                    };
                    json!({
                        "reference": range.to_string(),
                        "version": code,
                        "translation": translation,
                        "range": range,
                    })
                }
                Err(e) => json!({ "error": e.to_string() }),
            };
            writeln!(out, "{}", record)?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "bibleref failed");
            ExitCode::FAILURE
        }
    }
}
