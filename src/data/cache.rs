use std::sync::Arc;

use super::error::PipelineError;
use super::loader::{parse_table, UploadedFile};
use super::model::TimeIndexedTable;
use super::options::ParseOptions;
use super::time_index::build_index;

/// Outcome of reading one file under one set of parse options. Failures are
/// cached too: the same bytes and options fail the same way.
pub type ParseOutcome = Result<Arc<TimeIndexedTable>, PipelineError>;

/// Identity of a parse: file content digest plus every parse option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub digest: [u8; 32],
    pub options: ParseOptions,
}

impl CacheKey {
    pub fn new(file: &UploadedFile, options: &ParseOptions) -> Self {
        Self {
            digest: file.digest,
            options: *options,
        }
    }
}

/// Single-slot, content-addressed cache of the parse + index stage.
///
/// Changing any key component (other bytes, delimiter, decimal mark,
/// dayfirst) evicts the slot; downstream options never reach the key.
#[derive(Debug, Default)]
pub struct ParseCache {
    slot: Option<(CacheKey, ParseOutcome)>,
    hits: u64,
    misses: u64,
}

impl ParseCache {
    pub fn get_or_parse(&mut self, file: &UploadedFile, options: &ParseOptions) -> ParseOutcome {
        let key = CacheKey::new(file, options);

        if let Some((cached, outcome)) = &self.slot {
            if *cached == key {
                self.hits += 1;
                log::debug!("Parse cache hit for {}", file.name);
                return outcome.clone();
            }
        }

        self.misses += 1;
        log::info!(
            "Parsing {} ({} bytes, sha256 {}) with {:?}",
            file.name,
            file.bytes.len(),
            &file.digest_hex()[..12],
            options
        );

        let outcome = parse_table(&file.bytes, options)
            .and_then(|raw| build_index(&raw, options.dayfirst))
            .map(Arc::new);
        self.slot = Some((key, outcome.clone()));
        outcome
    }

    pub fn invalidate(&mut self) {
        self.slot = None;
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
