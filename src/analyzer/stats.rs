//! Reusable counting and rounding helpers for dashboard analytics.

use std::collections::HashMap;
use std::hash::Hash;

/// Arithmetic mean rounded half-up to the nearest integer.
/// Returns None if the slice is empty.
pub fn rounded_mean(values: &[u32]) -> Option<u32> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as u64;
    let sum: u64 = values.iter().map(|&v| u64::from(v)).sum();
    // round(sum / n) == floor((2 * sum + n) / (2 * n)) for non-negative values
    Some(((2 * sum + n) / (2 * n)) as u32)
}

/// Share of `count` in `total` as a whole percentage, rounded half-up.
/// Returns 0 when `total` is 0.
pub fn rate_percent(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let (count, total) = (count as u64, total as u64);
    ((200 * count + total) / (2 * total)) as u32
}

pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Share of `count` in `total` as a percentage with one decimal.
/// Returns 0.0 when `total` is 0.
pub fn pct(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        round1(count as f64 / total as f64 * 100.0)
    }
}

/// Single-pass grouping: one `(key, count)` per distinct key, in order of
/// first appearance.
pub fn count_by<T, K, F>(items: &[T], key: F) -> Vec<(K, usize)>
where
    K: Eq + Hash + Clone,
    F: Fn(&T) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut counts: Vec<(K, usize)> = Vec::new();
    for item in items {
        let k = key(item);
        match index.get(&k) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(k.clone(), counts.len());
                counts.push((k, 1));
            }
        }
    }
    counts
}

/// Sorts by count descending. The sort is stable, so equal counts keep
/// first-appearance order.
pub fn rank_desc<K>(mut counts: Vec<(K, usize)>) -> Vec<(K, usize)> {
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}
