//! Dictionary and connection-matrix storage.
//!
//! `FstDictionary` stores surface → entries mappings in a serialized FST.
//! `ConnectionMatrix` stores POS-pair transition costs for Viterbi scoring.

pub mod builder;
pub mod connection;
mod connection_io;
mod entry;
mod fst_dict;

pub use entry::{PosTable, WordEntry};
pub use fst_dict::FstDictionary;

use std::io;

/// Unified error type for dictionary and connection-matrix binary I/O.
///
/// Covers loading/saving both `FstDictionary` (WKDX) and
/// `ConnectionMatrix` (WKCX) files.
#[derive(Debug, thiserror::Error)]
pub enum DictError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid header (too short)")]
    InvalidHeader,

    #[error("invalid magic bytes (expected WKDX or WKCX)")]
    InvalidMagic,

    #[error("unsupported version: {0}")]
    UnsupportedVersion(u8),

    #[error("FST error: {0}")]
    Fst(#[from] fst::Error),

    #[error("serialization error: {0}")]
    Serialize(bincode::Error),

    #[error("deserialization error: {0}")]
    Deserialize(bincode::Error),

    #[error("parse error: {0}")]
    Parse(String),
}

/// One prefix match: all entries whose surface equals the first
/// `char_len` characters of the queried input.
pub struct Prefix<'a> {
    /// Matched surface length in chars (the lattice offset unit).
    pub char_len: usize,
    pub entries: &'a [WordEntry],
}

/// Read-only morpheme lookup. Implementations are immutable after
/// construction and safe to share across concurrent tokenizations.
pub trait Dictionary: Send + Sync {
    /// All entries whose surface exactly equals `surface`.
    fn lookup(&self, surface: &str) -> Option<&[WordEntry]>;

    /// All entries whose surface is a prefix of `input`, shortest first.
    ///
    /// Never fails: a position with no matching entry yields an empty Vec
    /// and the lattice builder synthesizes a fallback node there.
    /// Enumeration order is deterministic (key order, then stored entry
    /// order) — it is the Viterbi tie-break source.
    fn prefix_search<'a>(&'a self, input: &str) -> Vec<Prefix<'a>>;

    /// The interned POS path for an entry's `pos_id`.
    fn pos_path(&self, pos_id: u16) -> &[String];
}
