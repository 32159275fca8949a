//! BSBI indexer: entry/block I/O (C1), the external sorter (C2), and the
//! index builder/store (C3, C4).

pub mod entry;
pub mod sort;
pub mod store;

pub use entry::{DocId, Entry};
pub use sort::{ExternalSorter, DEFAULT_BATCH_SIZE};
pub use store::{build_index, Index, DEFAULT_BLOCK_SIZE};
