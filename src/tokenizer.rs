//! The tokenizer facade: dictionary + optional connection matrix + config.

use tracing::{debug, debug_span};

use crate::config::TokenizerConfig;
use crate::cost::ConnectionCost;
use crate::dict::connection::ConnectionMatrix;
use crate::dict::Dictionary;
use crate::lattice::build_lattice;
use crate::token::{tokens_from_path, Token};
use crate::viterbi::{select_path, PathError};

/// A per-call tokenization failure.
///
/// These do not occur for a well-formed dictionary — the unknown-word
/// fallback keeps every lattice connected — so any occurrence is a defect.
/// Kept distinct from `Ok(vec![])` so "nothing to tokenize" can never be
/// confused with "tokenizer broke".
#[derive(Debug, thiserror::Error)]
pub enum TokenizeError {
    #[error("internal lattice inconsistency: {0}")]
    Path(#[from] PathError),
}

/// Whole-string Japanese morphological tokenizer.
///
/// Immutable after construction: `tokenize` takes `&self`, builds one
/// lattice per call, and keeps no cross-call state, so one instance can
/// serve any number of concurrent callers.
pub struct Tokenizer<D: Dictionary> {
    dict: D,
    conn: Option<ConnectionMatrix>,
    config: TokenizerConfig,
}

impl<D: Dictionary> Tokenizer<D> {
    pub fn new(dict: D) -> Self {
        Self {
            dict,
            conn: None,
            config: TokenizerConfig::default(),
        }
    }

    /// Attach a connection matrix for POS-pair transition costs. Without
    /// one, scoring is unigram (word costs only).
    pub fn with_connection(mut self, conn: ConnectionMatrix) -> Self {
        self.conn = Some(conn);
        self
    }

    pub fn with_config(mut self, config: TokenizerConfig) -> Self {
        self.config = config;
        self
    }

    /// Tokenize `text` into morphemes, best segmentation first to last.
    ///
    /// Offsets in the returned tokens are char indices into `text`; for
    /// non-empty input the token spans tile `[0, char_count)` exactly.
    /// Empty input yields `Ok(vec![])`.
    pub fn tokenize(&self, text: &str) -> Result<Vec<Token>, TokenizeError> {
        let _span = debug_span!("tokenize", len = text.len()).entered();
        if text.is_empty() {
            return Ok(Vec::new());
        }
        let lattice = build_lattice(&self.dict, text, &self.config);
        let cost_model = ConnectionCost::new(self.conn.as_ref());
        let path = select_path(&lattice, &cost_model)?;
        let tokens = tokens_from_path(&self.dict, &lattice, &path);
        debug!(token_count = tokens.len());
        Ok(tokens)
    }
}
