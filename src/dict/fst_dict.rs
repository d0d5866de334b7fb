use std::fs::{self, File};
use std::path::Path;

use fst::raw::Output;
use fst::{Map, MapBuilder};
use memmap2::Mmap;

use super::{DictError, Dictionary, PosTable, Prefix, WordEntry};

const MAGIC: &[u8; 4] = b"WKDX";
const VERSION: u8 = 1;
const HEADER_SIZE: usize = 4 + 1 + 4 + 4; // magic + version + fst_len + values_len = 13

/// FST-backed dictionary store: surface form → morpheme entries.
///
/// Surfaces live in an `fst::Map` whose values index into `entry_sets`;
/// the byte layout of the FST makes "does any entry start with this
/// character" pruning a single failed root transition. Immutable after
/// construction, so lookups need no locking.
pub struct FstDictionary {
    map: Map<Vec<u8>>,
    entry_sets: Vec<Vec<WordEntry>>,
    pos_table: PosTable,
}

impl FstDictionary {
    /// Build from `(surface, entries)` pairs and an interned POS table.
    ///
    /// Duplicate surfaces are merged. Entries for one surface are sorted
    /// by cost at build time so enumeration order (the Viterbi tie-break
    /// source) is fixed by the dictionary content alone.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (String, Vec<WordEntry>)>,
        pos_table: PosTable,
    ) -> Result<Self, DictError> {
        let mut pairs: Vec<(String, Vec<WordEntry>)> = entries.into_iter().collect();
        pairs.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

        // Merge duplicate surfaces: the FST requires strictly increasing keys.
        let mut merged: Vec<(String, Vec<WordEntry>)> = Vec::with_capacity(pairs.len());
        for (surface, candidates) in pairs {
            match merged.last_mut() {
                Some((prev, acc)) if *prev == surface => acc.extend(candidates),
                _ => merged.push((surface, candidates)),
            }
        }
        for (_, candidates) in &mut merged {
            candidates.sort_by_key(|e| e.cost);
        }

        let mut builder = MapBuilder::memory();
        for (idx, (surface, _)) in merged.iter().enumerate() {
            builder.insert(surface.as_bytes(), idx as u64)?;
        }
        let map = Map::new(builder.into_inner()?)?;
        let entry_sets: Vec<Vec<WordEntry>> = merged.into_iter().map(|(_, v)| v).collect();

        Ok(Self {
            map,
            entry_sets,
            pos_table,
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, DictError> {
        let fst_data = self.map.as_fst().as_bytes();
        let values_data = bincode::serialize(&(&self.pos_table, &self.entry_sets))
            .map_err(DictError::Serialize)?;

        let fst_len: u32 = fst_data
            .len()
            .try_into()
            .map_err(|_| DictError::Parse("FST data exceeds u32::MAX".to_string()))?;
        let values_len: u32 = values_data
            .len()
            .try_into()
            .map_err(|_| DictError::Parse("values data exceeds u32::MAX".to_string()))?;

        let mut buf = Vec::with_capacity(HEADER_SIZE + fst_data.len() + values_data.len());
        buf.extend_from_slice(MAGIC);
        buf.push(VERSION);
        buf.extend_from_slice(&fst_len.to_le_bytes());
        buf.extend_from_slice(&values_len.to_le_bytes());
        buf.extend_from_slice(fst_data);
        buf.extend_from_slice(&values_data);

        Ok(buf)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, DictError> {
        if data.len() < 5 {
            return Err(DictError::InvalidHeader);
        }
        if &data[..4] != MAGIC {
            return Err(DictError::InvalidMagic);
        }
        if data[4] != VERSION {
            return Err(DictError::UnsupportedVersion(data[4]));
        }
        if data.len() < HEADER_SIZE {
            return Err(DictError::InvalidHeader);
        }

        let fst_len = u32::from_le_bytes(data[5..9].try_into().unwrap()) as usize;
        let values_len = u32::from_le_bytes(data[9..13].try_into().unwrap()) as usize;

        let expected = HEADER_SIZE + fst_len + values_len;
        if data.len() < expected {
            return Err(DictError::InvalidHeader);
        }

        let fst_start = HEADER_SIZE;
        let values_start = fst_start + fst_len;

        let map = Map::new(data[fst_start..fst_start + fst_len].to_vec())?;
        let (pos_table, entry_sets): (PosTable, Vec<Vec<WordEntry>>) =
            bincode::deserialize(&data[values_start..values_start + values_len])
                .map_err(DictError::Deserialize)?;

        Ok(Self {
            map,
            entry_sets,
            pos_table,
        })
    }

    /// Open a dictionary file, using mmap to avoid doubling peak memory.
    ///
    /// The FST and values are deserialized from the mapped region (avoiding
    /// a separate heap allocation for the raw file bytes), then the mapping
    /// is dropped.
    pub fn open(path: &Path) -> Result<Self, DictError> {
        let file = File::open(path)?;
        // SAFETY: The file is opened read-only and the mapping is immutable.
        // The Mmap is dropped after deserialization completes below.
        let mmap = unsafe { Mmap::map(&file)? };
        Self::from_bytes(&mmap)
    }

    pub fn save(&self, path: &Path) -> Result<(), DictError> {
        Ok(fs::write(path, self.to_bytes()?)?)
    }

    /// Returns (surface_count, entry_count).
    pub fn stats(&self) -> (usize, usize) {
        let surfaces = self.entry_sets.len();
        let entries: usize = self.entry_sets.iter().map(|v| v.len()).sum();
        (surfaces, entries)
    }
}

impl Dictionary for FstDictionary {
    fn lookup(&self, surface: &str) -> Option<&[WordEntry]> {
        self.map
            .get(surface.as_bytes())
            .map(|id| self.entry_sets[id as usize].as_slice())
    }

    fn prefix_search<'a>(&'a self, input: &str) -> Vec<Prefix<'a>> {
        let fst = self.map.as_fst();
        let mut node = fst.root();
        let mut out = Output::zero();
        let mut results = Vec::new();

        for (i, b) in input.bytes().enumerate() {
            node = match node.find_input(b) {
                Some(t) => {
                    let transition = node.transition(t);
                    out = out.cat(transition.out);
                    fst.node(transition.addr)
                }
                None => break,
            };
            if node.is_final() {
                // i + 1 is a char boundary: keys are valid UTF-8 strings
                // that match the input bytes exactly up to here.
                let id = out.cat(node.final_output()).value() as usize;
                results.push(Prefix {
                    char_len: input[..i + 1].chars().count(),
                    entries: self.entry_sets[id].as_slice(),
                });
            }
        }
        results
    }

    fn pos_path(&self, pos_id: u16) -> &[String] {
        self.pos_table.path(pos_id)
    }
}
