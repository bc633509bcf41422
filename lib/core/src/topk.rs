//! Top-K selection over a similarity row
//!
//! Candidates are ranked by score descending, then by position ascending,
//! so equal scores always come out in catalog order.

use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Higher is better: larger score first, then smaller position
type RankKey = (OrderedFloat<f32>, Reverse<usize>);

#[inline]
fn rank_key(position: usize, score: f32) -> RankKey {
    (OrderedFloat(score), Reverse(position))
}

/// Heap-based partial selection, O(N log K)
///
/// Returns up to `k` `(position, score)` pairs from `row`, never including
/// `exclude`.
pub fn top_k(row: &[f32], exclude: usize, k: usize) -> Vec<(usize, f32)> {
    if k == 0 {
        return Vec::new();
    }

    // Min-heap holding the current best k; the root is the weakest kept entry
    let mut heap: BinaryHeap<Reverse<RankKey>> = BinaryHeap::with_capacity(k + 1);

    for (position, &score) in row.iter().enumerate() {
        if position == exclude {
            continue;
        }
        let key = rank_key(position, score);
        if heap.len() < k {
            heap.push(Reverse(key));
        } else if let Some(Reverse(weakest)) = heap.peek() {
            if key > *weakest {
                heap.pop();
                heap.push(Reverse(key));
            }
        }
    }

    heap.into_sorted_vec()
        .into_iter()
        .map(|Reverse((score, Reverse(position)))| (position, score.into_inner()))
        .collect()
}

/// Full sort, O(N log N); same output as [`top_k`]
pub fn top_k_by_sort(row: &[f32], exclude: usize, k: usize) -> Vec<(usize, f32)> {
    let mut pairs: Vec<(usize, f32)> = row
        .iter()
        .copied()
        .enumerate()
        .filter(|(position, _)| *position != exclude)
        .collect();

    pairs.sort_by(|a, b| rank_key(b.0, b.1).cmp(&rank_key(a.0, a.1)));
    pairs.truncate(k);
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_tie_break_by_position() {
        let row = [1.0, 0.9, 0.9, 0.1];
        assert_eq!(top_k(&row, 0, 2), vec![(1, 0.9), (2, 0.9)]);
        assert_eq!(top_k_by_sort(&row, 0, 2), vec![(1, 0.9), (2, 0.9)]);
    }

    #[test]
    fn test_excludes_self_even_when_highest() {
        let row = [0.2, 0.5, 0.99, 0.4];
        let result = top_k(&row, 2, 3);
        assert_eq!(result, vec![(1, 0.5), (3, 0.4), (0, 0.2)]);
    }

    #[test]
    fn test_k_larger_than_candidates() {
        let row = [0.0, 0.3, 0.3];
        assert_eq!(top_k(&row, 0, 10), vec![(1, 0.3), (2, 0.3)]);
        assert!(top_k(&row, 0, 0).is_empty());
    }

    #[test]
    fn test_negative_scores() {
        let row = [-0.5, -0.1, -0.9, 0.0];
        assert_eq!(top_k(&row, 3, 2), vec![(1, -0.1), (0, -0.5)]);
    }

    #[test]
    fn test_heap_matches_sort_on_random_rows() {
        let mut rng = rand::rng();
        for _ in 0..50 {
            let n = rng.random_range(2..200);
            // Coarse buckets so ties are common
            let row: Vec<f32> = (0..n).map(|_| rng.random_range(0..10) as f32 / 10.0).collect();
            let exclude = rng.random_range(0..n);
            let k = rng.random_range(1..n);
            assert_eq!(top_k(&row, exclude, k), top_k_by_sort(&row, exclude, k));
        }
    }
}
