//! Path scoring: per-node emission costs plus transition costs.

use crate::config::CostConfig;
use crate::dict::connection::ConnectionMatrix;
use crate::lattice::LatticeNode;
use crate::unicode::{is_katakana, is_latin};

/// Emission cost for a synthetic unknown-word node covering `ch`.
///
/// Katakana gets a bonus (runs of katakana are usually real words the
/// lexicon merely lacks), Latin/ASCII a penalty so dictionary entries win
/// whenever they overlap an ASCII fragment.
pub fn unknown_word_cost(ch: char, config: &CostConfig) -> i16 {
    let base = config.unknown_word_cost as i64;
    let adjusted = if is_katakana(ch) {
        base - config.katakana_unknown_bonus
    } else if is_latin(ch) {
        base + config.latin_unknown_penalty
    } else {
        base
    };
    adjusted.clamp(i16::MIN as i64, i16::MAX as i64) as i16
}

/// Trait for scoring lattice paths during the best-path search.
///
/// Kept as a seam so dictionary variants with different cost models
/// (POS-pair matrices, constant transition costs) plug in without
/// touching the search itself.
pub trait CostModel: Send + Sync {
    fn word_cost(&self, node: &LatticeNode) -> i64;
    fn transition_cost(&self, prev: &LatticeNode, next: &LatticeNode) -> i64;
    fn bos_cost(&self, node: &LatticeNode) -> i64;
    fn eos_cost(&self, node: &LatticeNode) -> i64;
}

/// Look up connection cost between two IDs, returning 0 if no matrix is provided.
fn conn_cost(conn: Option<&ConnectionMatrix>, left: u16, right: u16) -> i64 {
    conn.map(|c| c.cost(left, right) as i64).unwrap_or(0)
}

/// Default cost model: word costs plus an optional connection matrix.
///
/// Without a matrix all transitions cost 0 and the search degenerates to
/// unigram scoring; connection ID 0 stands in for BOS/EOS.
pub struct ConnectionCost<'a> {
    conn: Option<&'a ConnectionMatrix>,
}

impl<'a> ConnectionCost<'a> {
    pub fn new(conn: Option<&'a ConnectionMatrix>) -> Self {
        Self { conn }
    }
}

impl CostModel for ConnectionCost<'_> {
    fn word_cost(&self, node: &LatticeNode) -> i64 {
        node.cost as i64
    }

    fn transition_cost(&self, prev: &LatticeNode, next: &LatticeNode) -> i64 {
        conn_cost(self.conn, prev.right_id, next.left_id)
    }

    fn bos_cost(&self, node: &LatticeNode) -> i64 {
        conn_cost(self.conn, 0, node.left_id)
    }

    fn eos_cost(&self, node: &LatticeNode) -> i64 {
        conn_cost(self.conn, node.right_id, 0)
    }
}
