use crate::schedule::WeeklyEvent;
use fastrand::Rng;

/// Single-point splice of two event lists.
///
/// The cut is drawn from `[0, len(first))` and clamped to the second parent's
/// length, so children are `first[..cut] + second[cut..]` and the complement.
pub fn single_point(
    rng: &mut Rng,
    first: &[WeeklyEvent],
    second: &[WeeklyEvent],
) -> (Vec<WeeklyEvent>, Vec<WeeklyEvent>) {
    let cut = if first.is_empty() {
        0
    } else {
        rng.usize(..first.len())
    };
    splice(first, second, cut)
}

pub fn splice(
    first: &[WeeklyEvent],
    second: &[WeeklyEvent],
    cut: usize,
) -> (Vec<WeeklyEvent>, Vec<WeeklyEvent>) {
    let a = cut.min(first.len());
    let b = cut.min(second.len());

    let mut left = Vec::with_capacity(a + second.len() - b);
    left.extend_from_slice(&first[..a]);
    left.extend_from_slice(&second[b..]);

    let mut right = Vec::with_capacity(b + first.len() - a);
    right.extend_from_slice(&second[..b]);
    right.extend_from_slice(&first[a..]);

    (left, right)
}
