//! Random subset selection

use rand::Rng;

/// Uniform Fisher–Yates shuffle
pub fn shuffle<T, R: Rng + ?Sized>(mut items: Vec<T>, rng: &mut R) -> Vec<T> {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
    items
}

/// Shuffle `items` and keep the first `limit`
///
/// The feed is large; a fixed prefix would show the same photos on every run
/// with a small limit.
pub fn select_subset<T, R: Rng + ?Sized>(items: Vec<T>, limit: usize, rng: &mut R) -> Vec<T> {
    let mut items = shuffle(items, rng);
    items.truncate(limit);
    items
}
