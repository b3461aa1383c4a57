//! Raw measurements extracted from a board snapshot.
//!
//! Each function reads the board (mostly its column-top profile) and returns a
//! non-negative integer. They are combined into [`BoardFeatures`](super::BoardFeatures).

use heurtris_engine::Board;

/// Sum of all column heights.
///
/// # Raw measurement
///
/// - `raw = Σ top[c]` across all 10 columns
#[must_use]
pub fn aggregate_height(board: &Board) -> u32 {
    board.top_profile().iter().map(|&h| to_u32(h)).sum()
}

/// Height variation between adjacent columns.
///
/// # Raw measurement
///
/// - `raw = Σ |top[c] - top[c + 1]|` for `c` in `0..9`
#[must_use]
pub fn bumpiness(board: &Board) -> u32 {
    board
        .top_profile()
        .windows(2)
        .map(|w| to_u32(w[0].abs_diff(w[1])))
        .sum()
}

/// Number of holes (empty cells with at least one occupied cell above them).
///
/// # Raw measurement
///
/// For each column, every empty cell strictly below the column top is a hole.
/// - `raw = total count of holes across all columns`
#[must_use]
pub fn holes(board: &Board) -> u32 {
    board
        .top_profile()
        .iter()
        .enumerate()
        .map(|(x, &top)| (0..top).filter(|&y| !board.is_occupied(x, y)).count())
        .map(to_u32)
        .sum()
}

/// Cumulative well depth, growing quadratically with depth.
///
/// A well is a column lower than both of its neighbours. Edge columns only have
/// one neighbour and are wells when lower than it.
///
/// # Raw measurement
///
/// For each well of depth `d` (height difference to the lower neighbour):
/// - `raw = Σ d(d + 1) / 2`
#[must_use]
pub fn well_sum(board: &Board) -> u32 {
    let tops = board.top_profile();
    (0..tops.len())
        .map(|x| {
            let left = x.checked_sub(1).map(|l| tops[l]);
            let right = tops.get(x + 1).copied();
            let lower_neighbour = match (left, right) {
                (Some(l), Some(r)) => l.min(r),
                (Some(h), None) | (None, Some(h)) => h,
                (None, None) => return 0,
            };
            let depth = lower_neighbour.saturating_sub(tops[x]);
            to_u32(depth * (depth + 1) / 2)
        })
        .sum()
}

#[expect(clippy::cast_possible_truncation)]
fn to_u32(n: usize) -> u32 {
    // board measurements are bounded by 21 * 10 * 21
    n as u32
}
