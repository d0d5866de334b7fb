use memmap2::Mmap;

pub(super) const MAGIC: &[u8; 4] = b"WKCX";
pub(super) const VERSION: u8 = 1;
/// Fixed header size: magic(4) + version(1) + num_ids(2).
pub(super) const HEADER_SIZE: usize = 4 + 1 + 2;

/// Backing storage for cost data: either owned or memory-mapped.
pub(super) enum CostStorage {
    Owned(Vec<i16>),
    Mapped(Mmap),
}

/// A connection cost matrix mapping (left_id, right_id) → cost.
/// Used by the path selector to score morpheme transitions; ID 0 doubles
/// as the virtual BOS/EOS sentinel on the respective side.
pub struct ConnectionMatrix {
    pub(super) num_ids: u16,
    pub(super) storage: CostStorage,
}

impl ConnectionMatrix {
    /// Create a new owned ConnectionMatrix.
    pub fn new_owned(num_ids: u16, costs: Vec<i16>) -> Self {
        Self {
            num_ids,
            storage: CostStorage::Owned(costs),
        }
    }

    /// Look up the connection cost between two morphemes.
    /// Index: left_id * num_ids + right_id. Out-of-bounds returns 0.
    pub fn cost(&self, left_id: u16, right_id: u16) -> i16 {
        let idx = (left_id as usize)
            .saturating_mul(self.num_ids as usize)
            .saturating_add(right_id as usize);
        match &self.storage {
            CostStorage::Owned(costs) => costs.get(idx).copied().unwrap_or(0),
            CostStorage::Mapped(mmap) => {
                let byte_offset = HEADER_SIZE + idx * 2;
                mmap.get(byte_offset..byte_offset + 2)
                    .map(|b| i16::from_ne_bytes([b[0], b[1]]))
                    .unwrap_or(0)
            }
        }
    }

    /// Number of connection IDs in this matrix.
    pub fn num_ids(&self) -> u16 {
        self.num_ids
    }
}
