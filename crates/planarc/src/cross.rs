//! Crossing predicate over resolved sequence positions.

/// Whether two links, given as position pairs, cross in the linear order.
///
/// Each pair is normalized so the smaller position comes first; the links
/// cross iff exactly one endpoint of one lies strictly inside the open
/// interval spanned by the other (`i1 < i2 < j1 < j2` or
/// `i2 < i1 < j2 < j1`). A degenerate pair (equal endpoints) never crosses
/// anything.
pub fn links_cross(i1: usize, j1: usize, i2: usize, j2: usize) -> bool {
    let (i1, j1) = if i1 <= j1 { (i1, j1) } else { (j1, i1) };
    let (i2, j2) = if i2 <= j2 { (i2, j2) } else { (j2, i2) };

    if i1 == j1 || i2 == j2 {
        return false;
    }

    (i1 < i2 && i2 < j1 && j1 < j2) || (i2 < i1 && i1 < j2 && j2 < j1)
}

/// Pairwise crossing count over a resolved link set.
pub(crate) fn count_crossings(resolved: &[(usize, usize)]) -> usize {
    let mut count = 0;
    for i in 0..resolved.len() {
        for j in (i + 1)..resolved.len() {
            let (i1, j1) = resolved[i];
            let (i2, j2) = resolved[j];
            if links_cross(i1, j1, i2, j2) {
                count += 1;
            }
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::links_cross;

    #[test]
    fn interleaved_links_cross() {
        assert!(links_cross(0, 2, 1, 3));
        assert!(links_cross(1, 3, 0, 2));
    }

    #[test]
    fn nested_and_disjoint_links_do_not_cross() {
        assert!(!links_cross(0, 3, 1, 2));
        assert!(!links_cross(0, 1, 2, 3));
        assert!(!links_cross(0, 1, 1, 2));
    }

    #[test]
    fn predicate_is_direction_independent() {
        for (a, b, c, d) in [(0usize, 2usize, 1usize, 3usize), (0, 3, 1, 2), (0, 1, 2, 3)] {
            let base = links_cross(a, b, c, d);
            assert_eq!(links_cross(b, a, c, d), base);
            assert_eq!(links_cross(a, b, d, c), base);
            assert_eq!(links_cross(b, a, d, c), base);
        }
    }

    #[test]
    fn degenerate_pairs_never_cross() {
        assert!(!links_cross(1, 1, 0, 2));
        assert!(!links_cross(0, 2, 1, 1));
        assert!(!links_cross(1, 1, 1, 1));
    }

    #[test]
    fn shared_endpoints_do_not_cross() {
        assert!(!links_cross(0, 2, 2, 4));
        assert!(!links_cross(0, 2, 0, 3));
    }
}
