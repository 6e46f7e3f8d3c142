use serde::{Deserialize, Serialize};

/// LEB size of the UBI volume mkfs.ubifs was run against
/// (128 KiB physical erase block minus two 2 KiB NAND pages).
pub const DEFAULT_LEB_SIZE: usize = 516096;

/// Geometry of the sparse stream and the flat image it expands into.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MaterializeOpts {
    /// Size of one logical erase block in bytes. Every record payload and
    /// every fill block in the output is exactly this long.
    pub leb_size: usize,
}

impl Default for MaterializeOpts {
    fn default() -> Self {
        MaterializeOpts {
            leb_size: DEFAULT_LEB_SIZE,
        }
    }
}

/// What a single run wrote to the destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Blocks copied from stream records.
    pub data_blocks: u64,
    /// All-0xFF blocks synthesized for skipped indices.
    pub fill_blocks: u64,
}

impl Summary {
    pub fn total_blocks(&self) -> u64 {
        self.data_blocks + self.fill_blocks
    }
}
