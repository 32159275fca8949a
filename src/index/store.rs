//! Index builder (C3) and index store (C4).
//!
//! [`Index`] is the persistent, immutable value of spec §3: postings,
//! vocabulary, document set and document frequencies. It is produced exactly
//! once by [`build_index`], cached as a single JSON artifact per collection,
//! and thereafter loaded read-only.

use super::entry::{DocId, Entry};
use super::sort::{ExternalSorter, DEFAULT_BATCH_SIZE};
use crate::collection::Collection;
use crate::error::{Result, SearchError};
use ahash::{AHashMap, AHashSet};
use roaring::RoaringBitmap;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Default number of `(token, doc_id)` pairs buffered per spill block,
/// matching the Python source's `DEFAULT_BLOCK_SIZE`.
pub const DEFAULT_BLOCK_SIZE: usize = 10_000;

/// The four-plus-one fields spec §6 requires the persisted artifact to
/// carry, serialized exactly as named there.
#[derive(Debug, Serialize, Deserialize)]
struct IndexArtifact {
    collection: String,
    postings: AHashMap<String, Vec<DocId>>,
    terms: Vec<String>,
    doc_ids: Vec<DocId>,
    df: AHashMap<String, u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    collection: String,
    postings: AHashMap<String, Vec<DocId>>,
    terms: AHashSet<String>,
    doc_ids: RoaringBitmap,
    df: AHashMap<String, u32>,
}

impl Index {
    /// Posting list for `term`, empty on a missing term — no exception on a
    /// missing-token lookup (spec §3 invariants).
    pub fn postings(&self, term: &str) -> &[DocId] {
        self.postings.get(term).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn terms(&self) -> &AHashSet<String> {
        &self.terms
    }

    pub fn doc_ids(&self) -> &RoaringBitmap {
        &self.doc_ids
    }

    /// Document frequency of `term` (per spec §3, the length of its posting
    /// list — total occurrences, not distinct documents; see §9). `0` on a
    /// missing term.
    pub fn df(&self, term: &str) -> u32 {
        self.df.get(term).copied().unwrap_or(0)
    }

    pub fn num_documents(&self) -> u64 {
        self.doc_ids.len()
    }

    pub fn collection_name(&self) -> &str {
        &self.collection
    }

    /// Test-only helper for other modules' fixtures (boolean engine, vector
    /// ranker) that need an `Index` built straight from a fixed entry list.
    #[cfg(test)]
    pub(crate) fn fold_for_test(entries: Vec<Entry>) -> Self {
        Self::fold("test", entries)
    }

    /// Fold a totally ordered entry stream into an `Index` (spec §4.3).
    fn fold(collection: &str, entries: Vec<Entry>) -> Self {
        let mut postings: AHashMap<String, Vec<DocId>> = AHashMap::new();
        let mut terms: AHashSet<String> = AHashSet::new();
        let mut doc_ids = RoaringBitmap::new();
        let mut df: AHashMap<String, u32> = AHashMap::new();

        for Entry { token, doc_id } in entries {
            postings.entry(token.clone()).or_default().push(doc_id);
            doc_ids.insert(doc_id);
            terms.insert(token.clone());
            *df.entry(token).or_insert(0) += 1;
        }

        Self { collection: collection.to_string(), postings, terms, doc_ids, df }
    }

    fn persist(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let artifact = IndexArtifact {
            collection: self.collection.clone(),
            postings: self.postings.clone(),
            terms: self.terms.iter().cloned().collect(),
            doc_ids: self.doc_ids.iter().collect(),
            df: self.df.clone(),
        };
        let mut out = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut out, &artifact)?;
        Ok(())
    }

    fn load(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let artifact: IndexArtifact = serde_json::from_reader(reader)?;

        let terms: AHashSet<String> = artifact.terms.into_iter().collect();
        let doc_ids: RoaringBitmap = artifact.doc_ids.into_iter().collect();

        if terms.len() != artifact.postings.keys().collect::<AHashSet<_>>().len() {
            return Err(SearchError::MalformedArtifact(format!(
                "{}: terms/postings vocabulary mismatch",
                path.display()
            )));
        }

        Ok(Self {
            collection: artifact.collection,
            postings: artifact.postings,
            terms,
            doc_ids,
            df: artifact.df,
        })
    }
}

/// Build (or load a cached) index for `collection` (spec §4.3).
///
/// If `no_cache` is `false` and an artifact already exists, it is loaded and
/// returned without touching `collection.entries()` at all — an absent
/// artifact is not an error, it just falls through to a fresh build.
pub fn build_index(
    collection: &dyn Collection,
    cache_root: &Path,
    block_size: usize,
    no_cache: bool,
) -> Result<Index> {
    if !no_cache {
        let cache_path = collection.index_cache_path(cache_root);
        if cache_path.is_file() {
            return Index::load(&cache_path);
        }
    }

    let mut sorter = ExternalSorter::open(block_size, std::env::temp_dir())?;
    for (token, doc_id) in collection.entries() {
        sorter.add(Entry::new(token, doc_id))?;
    }
    let sorted = sorter.merge(DEFAULT_BATCH_SIZE)?;

    let index = Index::fold(collection.name(), sorted);
    index.persist(&collection.index_cache_path(cache_root))?;
    Ok(index)
}
