//! Output token records and the path → token formatting step.

use serde::Serialize;

use crate::dict::Dictionary;
use crate::lattice::Lattice;

/// POS-type label for tokens with an empty POS path (unknown-word
/// fallbacks and dictionaries with unclassified entries).
pub const POS_TYPE_OTHER: &str = "other";

/// One morpheme of the winning segmentation.
///
/// `start`/`end` are char offsets into the tokenized input, with
/// `end = start + surface.chars().count()`. `base_form` and `reading` are
/// `None` when the dictionary has no value — never substituted with a
/// placeholder, so callers can tell "absent" from "empty string".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub surface: String,
    /// POS path, coarse→fine. Empty for unknown-word fallbacks.
    pub pos: Vec<String>,
    pub base_form: Option<String>,
    pub reading: Option<String>,
    pub start: usize,
    pub end: usize,
}

impl Token {
    /// The POS path joined for display, e.g. `名詞,固有名詞,地域,一般`.
    pub fn pos_joined(&self) -> String {
        self.pos.join(",")
    }

    /// Coarse POS category: the first POS path element, or
    /// [`POS_TYPE_OTHER`] when the path is empty.
    pub fn pos_type(&self) -> &str {
        self.pos.first().map(String::as_str).unwrap_or(POS_TYPE_OTHER)
    }
}

/// Map the winning path (node indices, sentinels excluded) to tokens.
///
/// Nodes arrive in left-to-right order and carry char offsets already, so
/// this is a straight per-node projection; the POS path is resolved
/// through the dictionary's interned table here, at the formatting
/// boundary, keeping it structured everywhere else.
pub fn tokens_from_path(dict: &dyn Dictionary, lattice: &Lattice, path: &[usize]) -> Vec<Token> {
    path.iter()
        .map(|&idx| {
            let node = &lattice.nodes[idx];
            let pos = match node.pos_id {
                Some(id) => dict.pos_path(id).to_vec(),
                None => Vec::new(),
            };
            Token {
                surface: node.surface.clone(),
                pos,
                base_form: node.base_form.clone(),
                reading: node.reading.clone(),
                start: node.start,
                end: node.end,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(pos: &[&str]) -> Token {
        Token {
            surface: "x".to_string(),
            pos: pos.iter().map(|s| s.to_string()).collect(),
            base_form: None,
            reading: None,
            start: 0,
            end: 1,
        }
    }

    #[test]
    fn test_pos_joined() {
        let t = token(&["名詞", "固有名詞", "地域", "一般"]);
        assert_eq!(t.pos_joined(), "名詞,固有名詞,地域,一般");
        assert_eq!(token(&[]).pos_joined(), "");
    }

    #[test]
    fn test_pos_type_fallback() {
        assert_eq!(token(&["名詞", "一般"]).pos_type(), "名詞");
        assert_eq!(token(&[]).pos_type(), POS_TYPE_OTHER);
    }
}
