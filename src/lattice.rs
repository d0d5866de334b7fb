//! Lattice construction: all candidate segmentations of one input string.

use tracing::{debug, debug_span};

use crate::config::TokenizerConfig;
use crate::cost::unknown_word_cost;
use crate::dict::Dictionary;

/// A candidate morpheme placed at a specific span of the input.
///
/// Offsets are char indices. `surface` is an owned `String` cloned from the
/// input slice; surfaces are short, so clone cost is negligible.
#[derive(Debug, Clone)]
pub struct LatticeNode {
    /// Start position (char index, inclusive)
    pub start: usize,
    /// End position (char index, exclusive)
    pub end: usize,
    /// Surface form as it appears in the input
    pub surface: String,
    /// Emission cost (lower = more preferred)
    pub cost: i16,
    /// Left connection ID
    pub left_id: u16,
    /// Right connection ID
    pub right_id: u16,
    /// POS table index; `None` for unknown-word fallback nodes
    pub pos_id: Option<u16>,
    /// Base form from the dictionary entry, absent for fallback nodes
    pub base_form: Option<String>,
    /// Reading from the dictionary entry, absent for fallback nodes
    pub reading: Option<String>,
}

impl LatticeNode {
    /// Fallback nodes are synthesized, not dictionary-backed.
    pub fn is_unknown(&self) -> bool {
        self.pos_id.is_none()
    }
}

/// The lattice: all candidate morphemes overlaid on one input string.
/// Built fresh per tokenization call and discarded after path selection.
pub struct Lattice {
    /// The original input
    pub input: String,
    /// All nodes in the lattice
    pub nodes: Vec<LatticeNode>,
    /// nodes_by_end[i] = indices of nodes that end at position i
    pub nodes_by_end: Vec<Vec<usize>>,
    /// nodes_by_start[i] = indices of nodes that start at position i
    pub nodes_by_start: Vec<Vec<usize>>,
    /// Number of characters in input
    pub char_count: usize,
}

/// Build a lattice from an input string using dictionary lookups.
///
/// Uses `prefix_search` for efficient traversal: a single dictionary walk
/// per starting position finds all matching surfaces, instead of O(n)
/// individual lookups per position.
/// Adds an unknown-word fallback node (1 char, high cost) wherever no
/// single-char entry exists, so every position keeps an outgoing edge and
/// the lattice is connected end to end regardless of dictionary coverage.
pub fn build_lattice(dict: &dyn Dictionary, text: &str, config: &TokenizerConfig) -> Lattice {
    let char_count = text.chars().count();
    let _span = debug_span!("build_lattice", char_count).entered();
    // Pre-compute byte offsets for each char position so we can slice
    // the original &str directly instead of allocating a new String per position.
    let byte_offsets: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    let mut nodes = Vec::new();
    // nodes_by_end has char_count + 1 slots (position 0 through char_count)
    let mut nodes_by_end: Vec<Vec<usize>> = vec![Vec::new(); char_count + 1];
    let mut nodes_by_start: Vec<Vec<usize>> = vec![Vec::new(); char_count];

    for start in 0..char_count {
        let mut has_single_char_match = false;

        let suffix = &text[byte_offsets[start]..];
        let matches = dict.prefix_search(suffix);

        for m in &matches {
            let end = start + m.char_len;
            let next_offset = byte_offsets
                .get(start + m.char_len)
                .copied()
                .unwrap_or(text.len());
            let surface = &text[byte_offsets[start]..next_offset];
            for entry in m.entries {
                let idx = nodes.len();
                nodes.push(LatticeNode {
                    start,
                    end,
                    surface: surface.to_string(),
                    cost: entry.cost,
                    left_id: entry.left_id,
                    right_id: entry.right_id,
                    pos_id: Some(entry.pos_id),
                    base_form: entry.base_form.clone(),
                    reading: entry.reading.clone(),
                });
                nodes_by_end[end].push(idx);
                nodes_by_start[start].push(idx);
                if m.char_len == 1 {
                    has_single_char_match = true;
                }
            }
        }

        // Add a 1-char fallback node when no dictionary entry covers exactly
        // this single character. This guarantees connectivity: even positions
        // spanned only by longer matches remain reachable via the fallback.
        if !has_single_char_match {
            let next_offset = byte_offsets.get(start + 1).copied().unwrap_or(text.len());
            let surface = &text[byte_offsets[start]..next_offset];
            let ch = surface.chars().next().unwrap_or('\0');
            let idx = nodes.len();
            nodes.push(LatticeNode {
                start,
                end: start + 1,
                surface: surface.to_string(),
                cost: unknown_word_cost(ch, &config.cost),
                left_id: 0,
                right_id: 0,
                pos_id: None,
                base_form: None,
                reading: None,
            });
            nodes_by_end[start + 1].push(idx);
            nodes_by_start[start].push(idx);
        }
    }

    debug!(node_count = nodes.len());
    Lattice {
        input: text.to_string(),
        nodes,
        nodes_by_end,
        nodes_by_start,
        char_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::test_dict;

    #[test]
    fn test_build_lattice_basic() {
        let dict = test_dict();
        let config = TokenizerConfig::default();
        let lattice = build_lattice(&dict, "すもももももも", &config);

        assert!(!lattice.nodes.is_empty());
        assert_eq!(lattice.char_count, 7);

        // "すもも" and the single-char "も" entries both appear
        assert!(lattice.nodes.iter().any(|n| n.surface == "すもも"));
        let mo_nodes: Vec<_> = lattice.nodes.iter().filter(|n| n.surface == "も").collect();
        assert!(!mo_nodes.is_empty());
        assert!(mo_nodes.iter().all(|n| n.end == n.start + 1));
    }

    #[test]
    fn test_unknown_word_fallback() {
        let dict = test_dict();
        let config = TokenizerConfig::default();
        let lattice = build_lattice(&dict, "ぬ", &config);

        assert_eq!(lattice.nodes.len(), 1);
        let unknown = &lattice.nodes[0];
        assert!(unknown.is_unknown());
        assert_eq!(unknown.surface, "ぬ");
        assert_eq!(unknown.cost, config.cost.unknown_word_cost);
        assert_eq!(unknown.base_form, None);
        assert_eq!(unknown.reading, None);
    }

    #[test]
    fn test_empty_input_lattice() {
        let dict = test_dict();
        let config = TokenizerConfig::default();
        let lattice = build_lattice(&dict, "", &config);
        assert_eq!(lattice.char_count, 0);
        assert!(lattice.nodes.is_empty());
    }

    #[test]
    fn test_lattice_connectivity() {
        let dict = test_dict();
        let config = TokenizerConfig::default();
        let lattice = build_lattice(&dict, "東京の٭すもも", &config);

        // Every position should be reachable: nodes_by_end[i] should be
        // non-empty for all i in 1..=char_count
        for pos in 1..=lattice.char_count {
            assert!(
                !lattice.nodes_by_end[pos].is_empty(),
                "no nodes end at position {pos}"
            );
        }
    }

    #[test]
    fn test_nodes_by_start_end_consistency() {
        let dict = test_dict();
        let config = TokenizerConfig::default();
        let lattice = build_lattice(&dict, "東京都にすもも", &config);

        for (idx, node) in lattice.nodes.iter().enumerate() {
            assert!(
                lattice.nodes_by_start[node.start].contains(&idx),
                "node {idx} not in nodes_by_start[{}]",
                node.start
            );
            assert!(
                lattice.nodes_by_end[node.end].contains(&idx),
                "node {idx} not in nodes_by_end[{}]",
                node.end
            );
        }

        for (pos, indices) in lattice.nodes_by_start.iter().enumerate() {
            for &idx in indices {
                assert_eq!(lattice.nodes[idx].start, pos);
            }
        }
        for (pos, indices) in lattice.nodes_by_end.iter().enumerate() {
            for &idx in indices {
                assert_eq!(lattice.nodes[idx].end, pos);
            }
        }
    }

    #[test]
    fn test_multibyte_offsets_are_chars() {
        let dict = test_dict();
        let config = TokenizerConfig::default();
        // "東京" is 6 bytes but 2 chars; offsets must be char-based.
        let lattice = build_lattice(&dict, "東京", &config);
        let tokyo = lattice
            .nodes
            .iter()
            .find(|n| n.surface == "東京")
            .expect("東京 should match");
        assert_eq!(tokyo.start, 0);
        assert_eq!(tokyo.end, 2);
    }
}
