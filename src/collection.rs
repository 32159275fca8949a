//! Collection interface (consumed, spec §6) — the external adapter that
//! feeds `(token, doc_id)` pairs to the index builder. Concrete file-format
//! readers (CACM sectioned format, Stanford-style directories) are thin
//! adapters outside this crate's scope; [`VecCollection`] is the in-memory
//! reference implementation used by tests and as a template for real ones.

use crate::index::entry::DocId;
use std::path::{Path, PathBuf};

/// A finite, restartable source of `(token, doc_id)` pairs. Order of
/// emission is unconstrained; tokens must already be normalized
/// (lowercased, stop-words filtered) by the implementor — the index builder
/// assumes this and does no normalization of its own.
pub trait Collection {
    /// Name used to derive the on-disk cache path.
    fn name(&self) -> &str;

    /// The `(token, doc_id)` stream. May be iterated more than once (the
    /// builder only needs a single pass, but re-use is not forbidden).
    fn entries(&self) -> Box<dyn Iterator<Item = (String, DocId)> + '_>;

    /// Where this collection's index artifact would live under `cache_root`.
    fn index_cache_path(&self, cache_root: &Path) -> PathBuf {
        cache_root.join(format!("{}_index.json", self.name()))
    }

    /// Whether an index artifact already exists for this collection.
    fn index_cache_exists(&self, cache_root: &Path) -> bool {
        self.index_cache_path(cache_root).is_file()
    }
}

/// An in-memory collection backed by a fixed vector of pre-tokenized pairs.
#[derive(Debug, Clone)]
pub struct VecCollection {
    name: String,
    pairs: Vec<(String, DocId)>,
}

impl VecCollection {
    pub fn new(name: impl Into<String>, pairs: Vec<(String, DocId)>) -> Self {
        Self { name: name.into(), pairs }
    }
}

impl Collection for VecCollection {
    fn name(&self) -> &str {
        &self.name
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (String, DocId)> + '_> {
        Box::new(self.pairs.iter().cloned())
    }
}
