//! Offline evaluation measures (C10, supplemental — spec.md §1 names this
//! in scope, just not plotting it). Pure functions over already-ranked
//! results and externally supplied relevance judgments; no file parsing, no
//! plotting (both out of scope per spec.md §1).
//!
//! Grounded in `original_source/evaluation/measures.py` (`f_measure`,
//! `e_measure`) and `original_source/evaluation/evaluation.py`
//! (`precision_recall`) plus the `rprec`/`plot` commands in
//! `original_source/evaluation/cli.py`, whose bodies describe R-precision
//! and interpolated precision without the pack retaining their definitions.

use crate::index::DocId;
use roaring::RoaringBitmap;

/// Precision and recall of a set of `found` results against the `relevant`
/// judgment set. `0.0` (not an error) if either side is empty.
pub fn precision_recall(found: &[DocId], relevant: &RoaringBitmap) -> (f64, f64) {
    let found_relevant = found.iter().filter(|d| relevant.contains(**d)).count() as f64;

    let precision = if found.is_empty() { 0.0 } else { found_relevant / found.len() as f64 };
    let recall = if relevant.is_empty() { 0.0 } else { found_relevant / relevant.len() as f64 };

    (precision, recall)
}

/// R-precision: precision at rank `|relevant|` (spec's `rprec` command).
/// `0.0` if `relevant` is empty.
pub fn r_precision(ranked: &[DocId], relevant: &RoaringBitmap) -> f64 {
    let r = relevant.len() as usize;
    if r == 0 {
        return 0.0;
    }
    let top_r = &ranked[..r.min(ranked.len())];
    let hits = top_r.iter().filter(|d| relevant.contains(**d)).count();
    hits as f64 / r as f64
}

/// E-measure: `1 - 1 / (alpha / precision + (1 - alpha) / recall)`.
/// `0.0` (not a division-by-zero panic) if `precision` or `recall` is zero.
pub fn e_measure(precision: f64, recall: f64, alpha: f64) -> f64 {
    if precision == 0.0 || recall == 0.0 {
        return 0.0;
    }
    1.0 - 1.0 / (alpha / precision + (1.0 - alpha) / recall)
}

/// F-measure: `1 - e_measure`.
pub fn f_measure(precision: f64, recall: f64, alpha: f64) -> f64 {
    if precision == 0.0 || recall == 0.0 {
        return 0.0;
    }
    1.0 - e_measure(precision, recall, alpha)
}

/// Standard `n`-point interpolated precision-recall curve: at each of
/// `recall_levels` evenly spaced recall levels (typically 11: `0.0, 0.1,
/// …, 1.0`), take the maximum measured precision among points whose recall
/// is at least that level (`0.0` if none qualify).
pub fn interpolated_precision(points: &[(f64, f64)], recall_levels: usize) -> Vec<(f64, f64)> {
    let divisor = recall_levels.saturating_sub(1).max(1) as f64;
    (0..recall_levels.max(1))
        .map(|i| {
            let level = i as f64 / divisor;
            let precision = points
                .iter()
                .filter(|(recall, _)| *recall >= level)
                .map(|(_, precision)| *precision)
                .fold(0.0_f64, f64::max);
            (level, precision)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bitmap(ids: &[DocId]) -> RoaringBitmap {
        ids.iter().copied().collect()
    }

    #[test]
    fn precision_recall_of_a_partial_match() {
        let relevant = bitmap(&[1, 2, 3, 4]);
        let (p, r) = precision_recall(&[1, 2, 5, 6], &relevant);
        assert_eq!(p, 0.5);
        assert_eq!(r, 0.5);
    }

    #[test]
    fn precision_recall_handles_empty_sides() {
        let relevant = bitmap(&[1, 2]);
        assert_eq!(precision_recall(&[], &relevant), (0.0, 0.0));
        assert_eq!(precision_recall(&[1], &RoaringBitmap::new()), (1.0, 0.0));
    }

    #[test]
    fn r_precision_looks_at_the_top_r_results() {
        let relevant = bitmap(&[1, 2, 3]);
        // r = 3; top 3 of the ranking are 1, 9, 2 => 2 hits / 3
        assert!((r_precision(&[1, 9, 2, 3], &relevant) - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn r_precision_is_zero_with_no_relevant_documents() {
        assert_eq!(r_precision(&[1, 2, 3], &RoaringBitmap::new()), 0.0);
    }

    #[test]
    fn f_and_e_measure_sum_to_one() {
        let (p, r) = (0.6, 0.4);
        let e = e_measure(p, r, 0.5);
        let f = f_measure(p, r, 0.5);
        assert!((f + e - 1.0).abs() < 1e-12);
    }

    #[test]
    fn f_and_e_measure_guard_degenerate_inputs() {
        assert_eq!(e_measure(0.0, 0.5, 0.5), 0.0);
        assert_eq!(f_measure(0.5, 0.0, 0.5), 0.0);
    }

    #[test]
    fn interpolated_precision_is_a_running_max_from_the_right() {
        let points = [(0.2, 0.8), (0.5, 0.6), (0.9, 0.3)];
        let curve = interpolated_precision(&points, 11);
        assert_eq!(curve.len(), 11);
        assert_eq!(curve[0].0, 0.0);
        assert_eq!(curve.last().unwrap().0, 1.0);
        // Non-increasing as recall level rises (running max from the right).
        assert!(curve.windows(2).all(|w| w[0].1 >= w[1].1));
        // Recall level 0.0 sees every point, so it takes the largest precision.
        assert_eq!(curve[0].1, 0.8);
    }
}
