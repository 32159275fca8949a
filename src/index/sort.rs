//! External sorter (C2): bounded-memory BSBI spill-and-merge.
//!
//! [`ExternalSorter`] buffers entries up to `block_size`, spills sorted
//! blocks to a scoped working directory, then hierarchically k-way merges
//! the blocks into one totally ordered sequence. The working directory is a
//! [`tempfile::TempDir`], whose `Drop` impl gives the "guaranteed recursive
//! deletion on all exit paths" the spec asks for — no explicit cleanup call
//! is needed on any path, including panics unwinding through `merge`.

use super::entry::{read_block, Entry};
use crate::error::Result;
use std::fs::File;
use std::io::{BufReader, BufWriter, Lines};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Default number of blocks merged together in one pass of the hierarchical
/// merge, matching the Python source's `merge(batch_size=100)` default.
pub const DEFAULT_BATCH_SIZE: usize = 100;

pub struct ExternalSorter {
    block_size: usize,
    buffer: Vec<Entry>,
    dir: TempDir,
    counter: u64,
    blocks: Vec<PathBuf>,
}

impl ExternalSorter {
    /// Scoped acquisition of a working directory under `parent` (created if
    /// missing). The returned sorter owns that directory exclusively for its
    /// lifetime; dropping it removes the directory tree, best-effort.
    pub fn open(block_size: usize, parent: impl AsRef<Path>) -> Result<Self> {
        std::fs::create_dir_all(parent.as_ref())?;
        let dir = tempfile::Builder::new().prefix("bsbi-").tempdir_in(parent.as_ref())?;
        Ok(Self { block_size, buffer: Vec::new(), dir, counter: 0, blocks: Vec::new() })
    }

    /// Append an entry to the in-memory buffer, spilling first if the
    /// buffer already exceeds `block_size`.
    pub fn add(&mut self, entry: Entry) -> Result<()> {
        if self.buffer.len() > self.block_size {
            self.flush()?;
        }
        self.buffer.push(entry);
        Ok(())
    }

    /// Sort the buffer in place and write it as a fresh spill block. No-op
    /// if the buffer is empty.
    fn flush(&mut self) -> Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        self.buffer.sort();
        self.counter += 1;
        let path = self.dir.path().join(self.counter.to_string());
        let mut out = BufWriter::new(File::create(&path)?);
        for entry in &self.buffer {
            entry.write_line(&mut out)?;
        }
        self.buffer.clear();
        self.blocks.push(path);
        Ok(())
    }

    /// Drain remaining buffered entries to a final spill, then merge every
    /// block into one totally ordered sequence, read fully into memory.
    pub fn merge(&mut self, batch_size: usize) -> Result<Vec<Entry>> {
        self.flush()?;
        self.merge_stage(batch_size, 0)
    }

    fn merge_stage(&mut self, batch_size: usize, stage: u64) -> Result<Vec<Entry>> {
        if self.blocks.len() <= 1 {
            return match self.blocks.pop() {
                Some(path) => {
                    let entries = read_block(BufReader::new(File::open(&path)?))?;
                    let _ = std::fs::remove_file(&path);
                    Ok(entries)
                }
                None => Ok(Vec::new()),
            };
        }

        let current = std::mem::take(&mut self.blocks);
        for (idx, batch) in current.chunks(batch_size).enumerate() {
            let out_path = self.dir.path().join(format!("{stage}-{idx}"));
            k_way_merge(batch, &out_path)?;
            for block in batch {
                std::fs::remove_file(block)?;
            }
            self.blocks.push(out_path);
        }

        self.merge_stage(batch_size, stage + 1)
    }
}

type BlockLines = Lines<BufReader<File>>;

fn next_entry(lines: &mut BlockLines) -> Result<Option<Entry>> {
    match lines.next() {
        Some(line) => Ok(Some(Entry::from_line(&line?)?)),
        None => Ok(None),
    }
}

/// K-way merge a batch of sorted blocks into one new sorted block. All
/// block handles are opened up front and close (via `Drop`) once this
/// function returns, on every path.
fn k_way_merge(block_paths: &[PathBuf], out_path: &Path) -> Result<()> {
    let mut readers: Vec<BlockLines> = block_paths
        .iter()
        .map(|p| Ok(BufReader::new(File::open(p)?).lines()))
        .collect::<Result<_>>()?;

    let mut lookahead: Vec<Option<Entry>> =
        readers.iter_mut().map(next_entry).collect::<Result<_>>()?;

    let mut out = BufWriter::new(File::create(out_path)?);

    loop {
        let smallest = lookahead
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.as_ref().map(|e| (i, e)))
            .min_by(|(ia, a), (ib, b)| a.cmp(b).then(ia.cmp(ib)));

        let Some((idx, _)) = smallest else { break };
        let entry = lookahead[idx].take().expect("index picked from Some lookahead");
        entry.write_line(&mut out)?;
        lookahead[idx] = next_entry(&mut readers[idx])?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_a_small_input() {
        let tmp = tempfile::tempdir().unwrap();
        let mut sorter = ExternalSorter::open(2, tmp.path()).unwrap();
        for (token, doc_id) in [("b", 1), ("a", 2), ("a", 1), ("c", 3)] {
            sorter.add(Entry::new(token, doc_id)).unwrap();
        }
        let sorted = sorter.merge(DEFAULT_BATCH_SIZE).unwrap();
        assert_eq!(
            sorted,
            vec![Entry::new("a", 1), Entry::new("a", 2), Entry::new("b", 1), Entry::new("c", 3)]
        );
    }

    #[test]
    fn sorts_a_large_input_with_small_blocks_and_batches() {
        let tmp = tempfile::tempdir().unwrap();
        let mut sorter = ExternalSorter::open(1000, tmp.path()).unwrap();

        let mut expected = Vec::with_capacity(25_000);
        for i in 0..25_000u32 {
            // A handful of repeated tokens so ties are exercised too.
            let token = format!("tok{:04}", i % 500);
            let doc_id = i % 7919;
            let entry = Entry::new(token, doc_id);
            sorter.add(entry.clone()).unwrap();
            expected.push(entry);
        }
        expected.sort();

        let merged = sorter.merge(4).unwrap();
        assert_eq!(merged.len(), expected.len());
        assert_eq!(merged, expected);
        assert!(merged.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn no_blocks_survive_after_drop() {
        let tmp = tempfile::tempdir().unwrap();
        let dir_path;
        {
            let mut sorter = ExternalSorter::open(4, tmp.path()).unwrap();
            dir_path = sorter.dir.path().to_path_buf();
            for i in 0..20u32 {
                sorter.add(Entry::new("t", i)).unwrap();
            }
            sorter.merge(2).unwrap();
        }
        assert!(!dir_path.exists());
    }

    #[test]
    fn empty_input_merges_to_empty_output() {
        let tmp = tempfile::tempdir().unwrap();
        let mut sorter = ExternalSorter::open(10, tmp.path()).unwrap();
        assert_eq!(sorter.merge(DEFAULT_BATCH_SIZE).unwrap(), Vec::new());
    }
}
