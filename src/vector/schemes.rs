//! Weighting schemes (C6): two TF–IDF variants sharing one capability set
//! (`tf`, `df`, `norm`). Grounded in `original_source/models/vector/schemes.py`
//! (`TfIdfSimple`/`TfIdfComplex`), generalized to the teacher's pattern of a
//! small trait plus a name-keyed registry (cf. teacher's
//! `index/text_types.rs` `Tokenizer` trait and its implementors).
//!
//! `norm` is deliberately *not* part of the per-(term, doc) accumulation: it
//! takes the running sum of per-term weights for a document and is only
//! ever invoked once the whole query has been scored (spec §9 — "compute
//! `norm(d)` after the accumulation loop, not inside it"), which is what
//! [`crate::vector::vector_search`] does.

use crate::index::{DocId, Index};

/// A weighting scheme computes term weights from three independent axes —
/// term frequency, inverse document frequency, and a per-document
/// normalization factor — combined by the ranker as
/// `weight = tf * idf`, with `norm` applied once at the very end.
pub trait WeightingScheme {
    fn name(&self) -> &'static str;

    /// Term frequency of `term` in the indexed document `doc_id` — raw
    /// repetition count in `postings[term]`.
    fn tf_in_doc(&self, term: &str, doc_id: DocId, index: &Index) -> f64;

    /// Term frequency of `term` in an ad-hoc token stream (a tokenized
    /// query string).
    fn tf_in_tokens(&self, term: &str, tokens: &[String]) -> f64;

    /// Inverse-document-frequency factor for `term`.
    fn idf(&self, term: &str, index: &Index) -> f64;

    /// Per-document normalization factor, given the running sum of
    /// per-term weights accumulated for that document over the whole
    /// query.
    fn norm(&self, weight_sum: f64) -> f64;
}

fn raw_tf_in_doc(term: &str, doc_id: DocId, index: &Index) -> f64 {
    index.postings(term).iter().filter(|&&d| d == doc_id).count() as f64
}

fn raw_tf_in_tokens(term: &str, tokens: &[String]) -> f64 {
    tokens.iter().filter(|t| t.as_str() == term).count() as f64
}

/// Variant A: unnormalized raw term-count scoring.
#[derive(Debug, Clone, Copy, Default)]
pub struct TfIdfSimple;

impl WeightingScheme for TfIdfSimple {
    fn name(&self) -> &'static str {
        "simple"
    }

    fn tf_in_doc(&self, term: &str, doc_id: DocId, index: &Index) -> f64 {
        raw_tf_in_doc(term, doc_id, index)
    }

    fn tf_in_tokens(&self, term: &str, tokens: &[String]) -> f64 {
        raw_tf_in_tokens(term, tokens)
    }

    fn idf(&self, _term: &str, _index: &Index) -> f64 {
        1.0
    }

    fn norm(&self, _weight_sum: f64) -> f64 {
        1.0
    }
}

/// Variant B: log-scaled term frequency, inverse raw document frequency,
/// and a document normalization fed by the running per-term weight sum.
#[derive(Debug, Clone, Copy, Default)]
pub struct TfIdfComplex;

impl TfIdfComplex {
    fn log_tf(raw: f64) -> f64 {
        if raw > 0.0 {
            1.0 + raw.log10()
        } else {
            0.0
        }
    }
}

impl WeightingScheme for TfIdfComplex {
    fn name(&self) -> &'static str {
        "complex"
    }

    fn tf_in_doc(&self, term: &str, doc_id: DocId, index: &Index) -> f64 {
        Self::log_tf(raw_tf_in_doc(term, doc_id, index))
    }

    fn tf_in_tokens(&self, term: &str, tokens: &[String]) -> f64 {
        Self::log_tf(raw_tf_in_tokens(term, tokens))
    }

    fn idf(&self, term: &str, index: &Index) -> f64 {
        let df = index.df(term);
        if df > 0 {
            1.0 / df as f64
        } else {
            0.0
        }
    }

    fn norm(&self, weight_sum: f64) -> f64 {
        if weight_sum > 0.0 {
            1.0 / weight_sum.sqrt()
        } else {
            1.0
        }
    }
}

/// Look up a scheme by its `name` (spec §4.6 — "every scheme carries a
/// `name` identifier used for selection").
pub fn scheme_by_name(name: &str) -> Option<Box<dyn WeightingScheme>> {
    match name {
        "simple" => Some(Box::new(TfIdfSimple)),
        "complex" => Some(Box::new(TfIdfComplex)),
        _ => None,
    }
}
