use rand::Rng;

/// Picks one range uniformly, then one char uniformly inside it.
///
/// A single-char range is returned without drawing from `rng`. Returns
/// `None` for an empty list or a reversed range.
pub fn sample_rune<R: Rng + ?Sized>(rng: &mut R, ranges: &[(char, char)]) -> Option<char> {
    let (lo, hi) = match ranges.len() {
        0 => return None,
        1 => ranges[0],
        n => ranges[rng.gen_range(0..n)],
    };
    if lo == hi {
        return Some(lo);
    }
    if lo > hi {
        return None;
    }
    // uniform over chars, surrogates are skipped
    Some(rng.gen_range(lo..=hi))
}
