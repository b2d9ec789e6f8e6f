use crate::extract::{anime, batch, episode, parse_document};
use crate::record::Record;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of detail page a record links to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrichmentKind {
    Anime,
    Episode,
    Batch,
}

impl EnrichmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Anime => "anime",
            Self::Episode => "episode",
            Self::Batch => "batch",
        }
    }

    /// Parses a fetched detail page into the fields to merge
    ///
    /// The document lives only for the duration of this call.
    pub fn patch(&self, body: &str) -> Record {
        let doc = parse_document(body);
        match self {
            Self::Anime => anime::enrichment_patch(&doc),
            Self::Episode => episode::enrichment_patch(&doc),
            Self::Batch => batch::enrichment_patch(&doc),
        }
    }
}

impl fmt::Display for EnrichmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
