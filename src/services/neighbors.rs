use std::cmp::Ordering;

/// Default number of neighbors per recommendation list
pub const DEFAULT_TOP_K: usize = 5;

/// A candidate row and its similarity to the query row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub index: usize,
    pub score: f32,
}

/// Picks the `k` best neighbors from one similarity row.
///
/// Entries are ranked by descending score with a stable sort, so ties keep their
/// original index order. The first ranked entry is assumed to be the query row
/// itself and is always dropped, whichever index it carries. NaN ranks below every
/// number. Rows shorter than `k + 1` yield fewer than `k` neighbors.
pub fn top_neighbors(distances: &[f32], k: usize) -> Vec<Neighbor> {
    let mut ranked: Vec<Neighbor> = distances
        .iter()
        .enumerate()
        .map(|(index, &score)| Neighbor { index, score })
        .collect();

    ranked.sort_by(|a, b| descending(a.score, b.score));

    ranked.into_iter().skip(1).take(k).collect()
}

fn descending(a: f32, b: f32) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}
