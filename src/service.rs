//! The boundary to passage and search providers.
//!
//! Providers build their requests from the rendered form of a [`VerseRange`]
//! (`John 3:16-18`) and hand back raw passage text, which this crate passes
//! along without interpreting it.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::ServiceError;
use crate::passage::{Passage, SearchResults};
use crate::reference::{Scanned, VerseRange};
use crate::version::BibleVersion;

/// A passage and search provider. Translations name their provider in
/// [`BibleVersion::service`], so callers usually keep several of these
/// behind `Box<dyn BibleService>`.
#[async_trait]
pub trait BibleService: Send + Sync {
    async fn get_passage(
        &self,
        version: &BibleVersion,
        verses: &VerseRange,
    ) -> Result<Passage, ServiceError>;

    async fn search(
        &self,
        version: &BibleVersion,
        terms: &[String],
        limit: usize,
        offset: usize,
    ) -> Result<SearchResults, ServiceError>;
}

/// Looks up a passage for every scanned reference, in order. References that
/// did not resolve keep their error, and a failed lookup does not stop the
/// ones after it.
pub async fn lookup_all<S: BibleService + ?Sized>(
    service: &S,
    version: &BibleVersion,
    scanned: Vec<Scanned>,
) -> Vec<Result<Passage, ServiceError>> {
    let mut passages = Vec::with_capacity(scanned.len());
    for reference in scanned {
        let passage = match reference {
            Ok(range) => {
                debug!(%range, version = %version.command, "getting passage");
                service.get_passage(version, &range).await
            }
            Err(e) => Err(e.into()),
        };
        if let Err(e) = &passage {
            warn!(error = %e, "passage lookup failed");
        }
        passages.push(passage);
    }
    passages
}
