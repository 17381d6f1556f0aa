use atelier_kernel::{SAFE_ALPHABET, safe_nanoid};
use std::collections::HashSet;

#[test]
fn ids_are_twelve_chars_from_the_safe_alphabet() {
    let id = safe_nanoid!();
    assert_eq!(id.len(), 12);
    assert!(id.chars().all(|ch| SAFE_ALPHABET.contains(&ch)), "out-of-alphabet char in {id}");
}

#[test]
fn ambiguous_glyphs_never_appear() {
    for ch in ['0', '1', 'I', 'O', 'i', 'l', 'o'] {
        assert!(!SAFE_ALPHABET.contains(&ch), "{ch} is ambiguous and must stay excluded");
    }
    assert_eq!(SAFE_ALPHABET.len(), 55);
}

#[test]
fn sized_ids_and_collision_smoke() {
    assert_eq!(safe_nanoid!(20).len(), 20);

    let batch: HashSet<String> = (0..512).map(|_| safe_nanoid!()).collect();
    assert_eq!(batch.len(), 512);
}
