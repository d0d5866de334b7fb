//! Best-path selection over a completed lattice.

use tracing::{debug, debug_span};

use crate::cost::CostModel;
use crate::lattice::Lattice;

/// Internal-consistency failure: the lattice does not reach the end
/// sentinel. The fallback-node rule makes this impossible for a correctly
/// built lattice, so this is a defect indicator, not a user-facing
/// condition — and it is deliberately distinct from the valid empty result.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PathError {
    #[error("lattice disconnected: no node reachable at position {position}")]
    Disconnected { position: usize },
}

/// Best cumulative cost and backpointer for one node.
#[derive(Clone, Copy)]
struct BestEntry {
    cost: i64,
    prev_idx: Option<usize>,
}

/// Find the minimum-cost path from BOS to EOS.
///
/// Forward dynamic-programming sweep over nodes ordered by start offset:
/// each node's best cost is minimized over all nodes ending exactly at its
/// start. Ties keep the first-discovered predecessor (strict `<`), so the
/// result is deterministic given the dictionary's enumeration order.
/// Returns node indices in left-to-right order, sentinels excluded; the
/// empty lattice yields an empty path.
pub fn select_path(lattice: &Lattice, cost_model: &dyn CostModel) -> Result<Vec<usize>, PathError> {
    let char_count = lattice.char_count;
    let _span = debug_span!("select_path", char_count).entered();
    if char_count == 0 {
        return Ok(Vec::new());
    }

    let num_nodes = lattice.nodes.len();
    let mut best: Vec<Option<BestEntry>> = vec![None; num_nodes];

    // Initialize nodes starting at position 0 (BOS transition)
    for &idx in &lattice.nodes_by_start[0] {
        let node = &lattice.nodes[idx];
        let cost = cost_model.word_cost(node) + cost_model.bos_cost(node);
        best[idx] = Some(BestEntry {
            cost,
            prev_idx: None,
        });
    }

    // Forward pass — next_idx loop is outermost so word_cost is computed
    // once per next_node instead of once per (prev, next) pair.
    for pos in 1..char_count {
        for &next_idx in &lattice.nodes_by_start[pos] {
            let next_node = &lattice.nodes[next_idx];
            let word = cost_model.word_cost(next_node);

            for &prev_idx in &lattice.nodes_by_end[pos] {
                let Some(prev_entry) = best[prev_idx] else {
                    continue;
                };
                let prev_node = &lattice.nodes[prev_idx];
                let total =
                    prev_entry.cost + cost_model.transition_cost(prev_node, next_node) + word;

                match best[next_idx] {
                    Some(existing) if existing.cost <= total => {}
                    _ => {
                        best[next_idx] = Some(BestEntry {
                            cost: total,
                            prev_idx: Some(prev_idx),
                        });
                    }
                }
            }

            if best[next_idx].is_none() {
                return Err(PathError::Disconnected { position: pos });
            }
        }
    }

    // EOS transition: pick the best node ending at char_count
    let mut end: Option<(i64, usize)> = None;
    for &node_idx in &lattice.nodes_by_end[char_count] {
        let Some(entry) = best[node_idx] else {
            continue;
        };
        let total = entry.cost + cost_model.eos_cost(&lattice.nodes[node_idx]);
        match end {
            Some((best_cost, _)) if best_cost <= total => {}
            _ => end = Some((total, node_idx)),
        }
    }
    let (best_cost, end_idx) = end.ok_or(PathError::Disconnected {
        position: char_count,
    })?;

    // Backtrace via backpointers
    let mut path = Vec::new();
    let mut cur = Some(end_idx);
    while let Some(idx) = cur {
        path.push(idx);
        cur = best[idx].and_then(|e| e.prev_idx);
    }
    path.reverse();

    debug!(path_len = path.len(), best_cost);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TokenizerConfig;
    use crate::cost::ConnectionCost;
    use crate::lattice::{build_lattice, LatticeNode};
    use crate::testutil::test_dict;

    fn surfaces(lattice: &Lattice, path: &[usize]) -> Vec<String> {
        path.iter()
            .map(|&i| lattice.nodes[i].surface.clone())
            .collect()
    }

    #[test]
    fn test_best_path_prefers_low_cost() {
        let dict = test_dict();
        let config = TokenizerConfig::default();
        // "すもも" as one entry (cost 7546) beats す+も+も (three unknowns
        // would never exist here; も is a real entry, す is unknown).
        let lattice = build_lattice(&dict, "すもも", &config);
        let path = select_path(&lattice, &ConnectionCost::new(None)).unwrap();
        assert_eq!(surfaces(&lattice, &path), vec!["すもも"]);
    }

    #[test]
    fn test_path_is_contiguous() {
        let dict = test_dict();
        let config = TokenizerConfig::default();
        let lattice = build_lattice(&dict, "すもももももももものうち", &config);
        let path = select_path(&lattice, &ConnectionCost::new(None)).unwrap();

        let mut pos = 0;
        for &idx in &path {
            let node = &lattice.nodes[idx];
            assert_eq!(node.start, pos, "gap or overlap at node {idx}");
            pos = node.end;
        }
        assert_eq!(pos, lattice.char_count);
    }

    #[test]
    fn test_empty_lattice_empty_path() {
        let dict = test_dict();
        let config = TokenizerConfig::default();
        let lattice = build_lattice(&dict, "", &config);
        let path = select_path(&lattice, &ConnectionCost::new(None)).unwrap();
        assert!(path.is_empty());
    }

    #[test]
    fn test_deterministic_tie_break() {
        let dict = test_dict();
        let config = TokenizerConfig::default();
        let lattice = build_lattice(&dict, "すもももももも", &config);
        let a = select_path(&lattice, &ConnectionCost::new(None)).unwrap();
        let b = select_path(&lattice, &ConnectionCost::new(None)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_transition_costs_change_the_path() {
        use crate::dict::connection::ConnectionMatrix;

        let dict = test_dict();
        let config = TokenizerConfig::default();
        let lattice = build_lattice(&dict, "あい", &config);

        // Unigram: あ(4000) + い(4000) beats あい(9000).
        let path = select_path(&lattice, &ConnectionCost::new(None)).unwrap();
        assert_eq!(surfaces(&lattice, &path), vec!["あ", "い"]);

        // A particle→noun penalty of 2500 flips the choice.
        let mut costs = vec![0i16; 16];
        costs[2 * 4 + 1] = 2500;
        let conn = ConnectionMatrix::new_owned(4, costs);
        let path = select_path(&lattice, &ConnectionCost::new(Some(&conn))).unwrap();
        assert_eq!(surfaces(&lattice, &path), vec!["あい"]);
    }

    #[test]
    fn test_disconnected_lattice_is_an_error() {
        // Hand-built broken lattice: 2 chars, but no node covers position 1.
        let node = LatticeNode {
            start: 0,
            end: 1,
            surface: "あ".to_string(),
            cost: 0,
            left_id: 0,
            right_id: 0,
            pos_id: None,
            base_form: None,
            reading: None,
        };
        let lattice = Lattice {
            input: "あい".to_string(),
            nodes: vec![node],
            nodes_by_end: vec![vec![], vec![0], vec![]],
            nodes_by_start: vec![vec![0], vec![]],
            char_count: 2,
        };
        let err = select_path(&lattice, &ConnectionCost::new(None)).unwrap_err();
        assert_eq!(err, PathError::Disconnected { position: 2 });
    }
}
