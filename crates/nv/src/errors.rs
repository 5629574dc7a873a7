use thiserror::Error;

/// Errors surfaced by the binary (de)serialization path. Every other
/// `NVTable`/`NVRegistry` operation reports failure as a plain boolean or
/// `Option` instead.
#[derive(Debug, Error)]
pub enum NvError {
    #[error("truncated nvtable image: needed {needed} bytes, had {available}")]
    Truncated { needed: usize, available: usize },
    #[error("nvtable image declares size {declared} bytes, exceeding NV_TABLE_MAX_BYTES")]
    SizeTooLarge { declared: usize },
    #[error("nvtable offset {offset} is not 4-byte aligned")]
    Misaligned { offset: u32 },
    #[error("not an nvtable image: bad magic {0:#x}")]
    BadMagic(u32),
    #[error("nvtable image contains an invalid slot tag or value type {0}")]
    InvalidTag(u8),
}
