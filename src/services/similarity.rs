use crate::models::{Rating, RatingVector};

/// Cosine similarity of two users, restricted to the items both have rated.
///
/// Norms are taken over the common support only, so the score reflects
/// agreement on shared items rather than how many items each user rated.
/// Users with no items in common, or whose common ratings are all zero on
/// either side, have similarity 0.
///
/// The result is symmetric bit-for-bit, finite for finite ratings, and lies
/// in `[-1, 1]` (`[0, 1]` when ratings are non-negative).
pub fn cosine_similarity(a: &RatingVector, b: &RatingVector) -> f64 {
    let (smaller, larger, swapped) = if a.len() <= b.len() {
        (a, b, false)
    } else {
        (b, a, true)
    };

    let mut common: Vec<(&str, Rating, Rating)> = smaller
        .iter()
        .filter_map(|(item, rating)| {
            larger.get(item).map(|other| {
                if swapped {
                    (item.as_str(), other, rating)
                } else {
                    (item.as_str(), rating, other)
                }
            })
        })
        .collect();

    if common.is_empty() {
        return 0.0;
    }

    // Fixed summation order keeps similarity(a, b) == similarity(b, a) exactly
    common.sort_unstable_by(|x, y| x.0.cmp(y.0));

    let scale_a = common.iter().fold(0.0_f64, |max, c| max.max(c.1.abs()));
    let scale_b = common.iter().fold(0.0_f64, |max, c| max.max(c.2.abs()));
    if scale_a == 0.0 || scale_b == 0.0 {
        return 0.0;
    }

    // Cosine is scale-invariant; dividing by the largest magnitude keeps the
    // squared sums away from overflow and underflow.
    let mut dot = 0.0;
    let mut sum_a = 0.0;
    let mut sum_b = 0.0;
    for &(_, r1, r2) in &common {
        let x = r1 / scale_a;
        let y = r2 / scale_b;
        dot += x * y;
        sum_a += x * x;
        sum_b += y * y;
    }

    let norm_a = sum_a.sqrt();
    let norm_b = sum_b.sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let similarity = dot / (norm_a * norm_b);
    if similarity.is_finite() {
        similarity.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}
