//! Randomness port
//!
//! Every random decision a session makes (behavior rolls, impersonation
//! targets, shuffles, popular picks) goes through [`RandomSource`] so tests
//! can script them.

pub trait RandomSource: Send {
    /// Uniform draw in `[0, 100)`
    fn roll_percent(&mut self) -> f64;

    /// Uniform index in `0..len`. `len` is never zero.
    fn pick_index(&mut self, len: usize) -> usize;
}

/// Fisher-Yates shuffle driven by `rng`
pub fn shuffle<T>(rng: &mut dyn RandomSource, items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let j = rng.pick_index(i + 1).min(i);
        items.swap(i, j);
    }
}

/// `k` distinct indices from `0..len`, uniformly, in draw order.
///
/// Returns all indices when `k >= len`.
pub fn sample_indices(rng: &mut dyn RandomSource, len: usize, k: usize) -> Vec<usize> {
    let mut remaining: Vec<usize> = (0..len).collect();
    let mut picked = Vec::with_capacity(k.min(len));
    while picked.len() < k && !remaining.is_empty() {
        let at = rng.pick_index(remaining.len()).min(remaining.len() - 1);
        picked.push(remaining.remove(at));
    }
    picked
}
