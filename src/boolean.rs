//! Boolean query engine (C5): a composable, immutable query tree evaluated
//! against an [`Index`] with sorted-set semantics.
//!
//! Re-specified per spec §9 as an immutable tree rather than the source's
//! mutable operation list — a `Query` is a value, combining or negating one
//! yields a new value, and the same query can be evaluated against any
//! number of indexes without surprises from prior evaluations.

use crate::index::{DocId, Index};
use roaring::RoaringBitmap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Term(String),
    And(Box<Query>, Box<Query>),
    Or(Box<Query>, Box<Query>),
    Not(Box<Query>),
}

impl Query {
    pub fn term(term: impl Into<String>) -> Self {
        Query::Term(term.into())
    }

    pub fn and(self, other: Query) -> Query {
        Query::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Query) -> Query {
        Query::Or(Box::new(self), Box::new(other))
    }

    pub fn not(self) -> Query {
        Query::Not(Box::new(self))
    }

    /// Evaluate the query against `index`, returning docIDs strictly
    /// ascending with no duplicates (unlike raw postings, which repeat).
    /// Unknown terms contribute an empty set rather than an error.
    pub fn evaluate(&self, index: &Index) -> Vec<DocId> {
        self.evaluate_bitmap(index).iter().collect()
    }

    fn evaluate_bitmap(&self, index: &Index) -> RoaringBitmap {
        match self {
            Query::Term(term) => index.postings(term).iter().copied().collect(),
            Query::And(a, b) => a.evaluate_bitmap(index) & b.evaluate_bitmap(index),
            Query::Or(a, b) => a.evaluate_bitmap(index) | b.evaluate_bitmap(index),
            Query::Not(a) => index.doc_ids().clone() - a.evaluate_bitmap(index),
        }
    }
}
