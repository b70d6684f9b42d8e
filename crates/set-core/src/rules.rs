//! The SET rule and the exhaustive triple search.

use crate::attributes::CardAttributes;

/// Per-attribute SET rule: three values qualify iff they are all equal or
/// pairwise distinct. Exactly two equal values disqualify the triple.
pub fn check_attribute<T: PartialEq>(a: T, b: T, c: T) -> bool {
    if a == b && b == c {
        return true;
    }
    a != b && b != c && a != c
}

/// Check whether three cards form a SET: every one of the four attributes
/// must pass [`check_attribute`].
pub fn is_a_set(a: &CardAttributes, b: &CardAttributes, c: &CardAttributes) -> bool {
    check_attribute(a.number, b.number, c.number)
        && check_attribute(a.symbol, b.symbol, c.symbol)
        && check_attribute(a.shading, b.shading, c.shading)
        && check_attribute(a.color, b.color, c.color)
}

/// Exhaustive triple enumeration over the field cards.
///
/// Returns the indices of the first SET in enumeration order (i < j < k),
/// or `None` when no SET exists. Pairs with identical attribute sets are
/// skipped: equal cards cannot be part of a genuine SET and would
/// otherwise compare as all-equal across every attribute.
///
/// O(N³) with early exit; N is bounded by the physical field size
/// (typically ≤ 21 cards), a few thousand comparisons at worst.
pub fn find_set(cards: &[CardAttributes]) -> Option<[usize; 3]> {
    for i in 0..cards.len() {
        for j in (i + 1)..cards.len() {
            if cards[i] == cards[j] {
                continue;
            }
            for k in (j + 1)..cards.len() {
                if cards[k] == cards[i] || cards[k] == cards[j] {
                    continue;
                }
                if is_a_set(&cards[i], &cards[j], &cards[k]) {
                    return Some([i, j, k]);
                }
            }
        }
    }
    None
}
