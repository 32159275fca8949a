//! Entry & block I/O (C1).
//!
//! An [`Entry`] is a single `(token, doc_id)` pair produced by a collection.
//! Entries are totally ordered lexicographically on `token`, then
//! numerically on `doc_id`, which is the order the external sorter (§4.2)
//! and the k-way merge rely on.

use crate::error::{Result, SearchError};
use std::io::{BufRead, Write};

/// Document identifier. `u32` comfortably covers any collection this crate
/// is built to index; the spec only requires "an unsigned integer".
pub type DocId = u32;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Entry {
    pub token: String,
    pub doc_id: DocId,
}

impl Entry {
    pub fn new(token: impl Into<String>, doc_id: DocId) -> Self {
        Self { token: token.into(), doc_id }
    }

    /// Serialize to the transient block line format: `"<token> <doc_id>"`.
    /// `token` is assumed to contain no whitespace (enforced upstream by the
    /// collection's normalization).
    pub fn to_line(&self) -> String {
        format!("{} {}", self.token, self.doc_id)
    }

    pub fn write_line<W: Write>(&self, w: &mut W) -> Result<()> {
        writeln!(w, "{} {}", self.token, self.doc_id)?;
        Ok(())
    }

    /// Parse a single block line back into an entry. Malformed lines are a
    /// fatal data-corruption condition (spec §7), surfaced as an error
    /// rather than skipped.
    pub fn from_line(line: &str) -> Result<Self> {
        let mut parts = line.split(' ');
        let token = parts
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| SearchError::MalformedEntry(line.to_string()))?;
        let doc_id = parts
            .next()
            .ok_or_else(|| SearchError::MalformedEntry(line.to_string()))?;
        if parts.next().is_some() {
            return Err(SearchError::MalformedEntry(line.to_string()));
        }
        let doc_id: DocId = doc_id
            .parse()
            .map_err(|_| SearchError::MalformedEntry(line.to_string()))?;
        Ok(Entry::new(token, doc_id))
    }
}

/// Read every entry from an open block file, in the order they appear.
/// A malformed line aborts the read (fatal, per spec §7).
pub fn read_block<R: BufRead>(reader: R) -> Result<Vec<Entry>> {
    reader
        .lines()
        .map(|line| {
            let line = line?;
            Entry::from_line(&line)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_a_line() {
        let entry = Entry::new("algorithm", 42);
        let line = entry.to_line();
        assert_eq!(line, "algorithm 42");
        assert_eq!(Entry::from_line(&line).unwrap(), entry);
    }

    #[test]
    fn orders_by_token_then_doc_id() {
        let mut entries = vec![
            Entry::new("b", 1),
            Entry::new("a", 2),
            Entry::new("a", 1),
        ];
        entries.sort();
        assert_eq!(
            entries,
            vec![Entry::new("a", 1), Entry::new("a", 2), Entry::new("b", 1)]
        );
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(Entry::from_line("onlytoken").is_err());
        assert!(Entry::from_line("token notanumber").is_err());
        assert!(Entry::from_line("token 1 extra").is_err());
    }
}
