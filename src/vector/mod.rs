//! Vector-space ranker: weighting schemes (C6) and top-k scoring (C7).

pub mod schemes;
pub mod search;

pub use schemes::{scheme_by_name, TfIdfComplex, TfIdfSimple, WeightingScheme};
pub use search::{vector_search, DEFAULT_K};
