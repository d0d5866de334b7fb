use serde::{Deserialize, Serialize};

/// A single morpheme entry. The surface form is the dictionary key and is
/// not duplicated here; many entries share one surface (homographs).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    /// Index into the dictionary's [`PosTable`].
    pub pos_id: u16,
    /// Canonical/lemma form. `None` when the source lexicon has no base
    /// form for this entry (marked `*` in MeCab-style CSV).
    pub base_form: Option<String>,
    /// Phonetic transcription. `None` when absent in the source lexicon.
    pub reading: Option<String>,
    /// Emission cost (lower = more likely).
    pub cost: i16,
    /// Left connection ID for transition-cost lookup.
    pub left_id: u16,
    /// Right connection ID for transition-cost lookup.
    pub right_id: u16,
}

/// Interned part-of-speech paths, indexed by `WordEntry::pos_id`.
///
/// POS paths are ordered coarse→fine (e.g. 名詞, 固有名詞, 地域, 一般) and
/// stay structured until the formatting boundary joins them for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PosTable {
    paths: Vec<Vec<String>>,
}

impl PosTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a POS path, returning its ID. Existing paths are reused.
    pub fn intern(&mut self, path: &[&str]) -> u16 {
        if let Some(idx) = self.paths.iter().position(|p| p.iter().eq(path.iter())) {
            return idx as u16;
        }
        let idx = self.paths.len();
        self.paths.push(path.iter().map(|s| s.to_string()).collect());
        idx as u16
    }

    /// The path for an ID. Out-of-range IDs yield the empty path rather
    /// than panicking, matching the "unknown" formatting fallback.
    pub fn path(&self, pos_id: u16) -> &[String] {
        self.paths
            .get(pos_id as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
