//! The masking core: raw-value extraction, mask application, and caret
//! correction. Every function here is a pure, total computation; any
//! string, any caret, any mask (including the empty one) produces a
//! well-defined result.

use super::model::{CompiledMask, EditKind, MaskToken, PatternKind};

pub(super) fn accepts(kind: PatternKind, ch: char) -> bool {
    match kind {
        PatternKind::Digit => ch.is_ascii_digit(),
        PatternKind::Letter => ch.is_ascii_alphabetic(),
        PatternKind::Alnum => ch.is_ascii_alphanumeric(),
        PatternKind::Hex => ch.is_ascii_hexdigit(),
        PatternKind::Any => !ch.is_control(),
        PatternKind::Custom(predicate) => predicate(ch),
    }
}

/// Caret inputs for one edit: the committed caret from before the edit, the
/// caret read from the live selection at edit time, and the edit direction.
#[derive(Debug, Clone, Copy)]
pub(super) struct CaretSeed {
    pub anchor: usize,
    pub live: usize,
    pub kind: EditKind,
}

impl CaretSeed {
    pub fn resync(position: usize) -> Self {
        Self {
            anchor: position,
            live: position,
            kind: EditKind::Unchanged,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct MaskOutcome {
    pub masked: String,
    pub caret: usize,
}

/// Recover the characters the user actually typed from a displayed string.
///
/// A string of exactly mask length is canonical: each index is interpreted
/// by its own token, so literal indexes are dropped and pattern indexes are
/// dropped only when they hold the placeholder. A user-typed character that
/// merely equals a literal used elsewhere in the mask survives.
///
/// A string of any other length is a mid-edit snapshot whose tail is shifted
/// by the pending insertion or deletion; the walk below keeps the mask
/// cursor parked at an unseen literal and falls back to set membership for
/// literals the edit has displaced.
pub(super) fn extract_raw(displayed: &str, mask: &CompiledMask, placeholder: char) -> String {
    let chars: Vec<char> = displayed.chars().collect();
    if chars.len() == mask.len() {
        return extract_aligned(&chars, mask, placeholder);
    }
    extract_shifted(&chars, mask, placeholder)
}

fn extract_aligned(chars: &[char], mask: &CompiledMask, placeholder: char) -> String {
    chars
        .iter()
        .zip(mask.tokens())
        .filter_map(|(ch, token)| match token {
            MaskToken::Literal(_) => None,
            MaskToken::Pattern(_) => (*ch != placeholder).then_some(*ch),
        })
        .collect()
}

fn extract_shifted(chars: &[char], mask: &CompiledMask, placeholder: char) -> String {
    let tokens = mask.tokens();
    let mut out = String::new();
    let mut slot = 0usize;

    for &ch in chars {
        match tokens.get(slot) {
            Some(MaskToken::Literal(lit)) => {
                if ch == *lit {
                    slot += 1;
                } else if ch != placeholder && !mask.is_literal_char(ch) {
                    // a char inserted ahead of a literal the walk has not
                    // reached yet; the mask cursor stays parked on it
                    out.push(ch);
                }
            }
            Some(MaskToken::Pattern(_)) => {
                if ch == placeholder {
                    slot += 1;
                } else if !mask.is_literal_char(ch) {
                    out.push(ch);
                    slot += 1;
                }
                // a displaced literal: dropped, slot held
            }
            None => {
                if ch != placeholder && !mask.is_literal_char(ch) {
                    out.push(ch);
                }
            }
        }
    }

    out
}

/// Apply `raw` to the mask without caret bookkeeping.
pub(super) fn apply_mask(raw: &str, mask: &CompiledMask, placeholder: char) -> String {
    apply_with_caret(raw, mask, placeholder, CaretSeed::resync(0)).masked
}

/// Single left-to-right pass over the mask tokens, consuming raw characters
/// in order and correcting the caret as literals are emitted.
///
/// A pattern slot consumes raw characters until one matches its rule or raw
/// is exhausted; a non-matching character is discarded, never retried at a
/// later slot. Excess raw input beyond the pattern slots is dropped.
///
/// Caret rule: while this is an insertion and unconsumed raw characters
/// remain, each literal emitted inside the half-open window
/// `[seed.anchor, caret)` pushes the caret one further, so the cursor hops
/// over literal runs instead of drifting back into them.
pub(super) fn apply_with_caret(
    raw: &str,
    mask: &CompiledMask,
    placeholder: char,
    seed: CaretSeed,
) -> MaskOutcome {
    let raw: Vec<char> = raw.chars().collect();
    let mut masked = String::with_capacity(mask.len());
    let mut caret = seed.live;
    let mut it = 0usize;

    for (idx, token) in mask.tokens().iter().enumerate() {
        match token {
            MaskToken::Literal(ch) => {
                masked.push(*ch);
                if seed.kind == EditKind::Insertion
                    && it < raw.len()
                    && idx >= seed.anchor
                    && idx < caret
                {
                    caret += 1;
                }
            }
            MaskToken::Pattern(kind) => {
                let mut filled = None;
                while it < raw.len() {
                    let candidate = raw[it];
                    it += 1;
                    if accepts(*kind, candidate) {
                        filled = Some(candidate);
                        break;
                    }
                }
                masked.push(filled.unwrap_or(placeholder));
            }
        }
    }

    MaskOutcome {
        masked,
        caret: caret.min(mask.len()),
    }
}

/// Index of the first unfilled pattern slot, or mask length when every slot
/// is filled. Where the caret goes after a programmatic value set.
pub(super) fn next_edit_position(masked: &str, mask: &CompiledMask, placeholder: char) -> usize {
    masked
        .chars()
        .zip(mask.tokens())
        .position(|(ch, token)| matches!(token, MaskToken::Pattern(_)) && ch == placeholder)
        .unwrap_or(mask.len())
}

/// True when every pattern slot of `masked` holds a real character.
pub(super) fn is_filled(masked: &str, mask: &CompiledMask, placeholder: char) -> bool {
    masked.chars().count() == mask.len()
        && next_edit_position(masked, mask, placeholder) == mask.len()
}

#[cfg(test)]
mod tests {
    use super::{
        CaretSeed, accepts, apply_mask, apply_with_caret, extract_raw, is_filled,
        next_edit_position,
    };
    use crate::widgets::inputs::masked::model::{
        CompiledMask, EditKind, MaskToken, PatternKind,
    };

    fn phone() -> CompiledMask {
        CompiledMask::parse("(###) ###-####")
    }

    fn seed(anchor: usize, live: usize, kind: EditKind) -> CaretSeed {
        CaretSeed { anchor, live, kind }
    }

    // --- mask application -------------------------------------------------

    #[test]
    fn full_raw_value_fills_every_slot() {
        assert_eq!(apply_mask("5551234567", &phone(), '_'), "(555) 123-4567");
    }

    #[test]
    fn partial_raw_value_leaves_placeholders() {
        assert_eq!(apply_mask("555", &phone(), '_'), "(555) ___-____");
    }

    #[test]
    fn empty_raw_value_yields_placeholder_scaffold() {
        assert_eq!(apply_mask("", &phone(), '_'), "(___) ___-____");
    }

    #[test]
    fn mismatched_char_is_discarded_and_later_digits_shift_left() {
        assert_eq!(apply_mask("55a1234567", &phone(), '_'), "(551) 234-567_");
    }

    #[test]
    fn custom_placeholder_char_is_used() {
        assert_eq!(apply_mask("", &phone(), '*'), "(***) ***-****");
    }

    #[test]
    fn excess_raw_input_is_dropped() {
        assert_eq!(
            apply_mask("55512345678888", &phone(), '_'),
            "(555) 123-4567"
        );
    }

    #[test]
    fn output_length_always_equals_mask_length() {
        let mask = phone();
        for raw in ["", "5", "abc", "5551234567", "xxxxxxxxxxxxxxxxxxxx"] {
            assert_eq!(apply_mask(raw, &mask, '_').chars().count(), mask.len());
        }
        let empty = CompiledMask::new(Vec::new());
        assert_eq!(apply_mask("anything", &empty, '_'), "");
    }

    #[test]
    fn literal_slots_survive_any_input() {
        let mask = phone();
        for raw in ["", "999", ")))---", "abcdef"] {
            let masked = apply_mask(raw, &mask, '_');
            let chars: Vec<char> = masked.chars().collect();
            assert_eq!(chars[0], '(');
            assert_eq!(chars[4], ')');
            assert_eq!(chars[5], ' ');
            assert_eq!(chars[9], '-');
        }
    }

    #[test]
    fn reapplication_is_idempotent() {
        let mask = phone();
        for raw in ["", "5", "555123", "5551234567", "55a1234567"] {
            let once = apply_mask(raw, &mask, '_');
            let again = apply_mask(&extract_raw(&once, &mask, '_'), &mask, '_');
            assert_eq!(again, once, "raw input {raw:?}");
        }
    }

    #[test]
    fn custom_matcher_gates_its_slot() {
        fn vowel(ch: char) -> bool {
            matches!(ch, 'a' | 'e' | 'i' | 'o' | 'u')
        }
        let mask = CompiledMask::new(vec![
            MaskToken::Pattern(PatternKind::Custom(vowel)),
            MaskToken::Pattern(PatternKind::Digit),
        ]);
        assert_eq!(apply_mask("e4", &mask, '_'), "e4");
        assert_eq!(apply_mask("x4", &mask, '_'), "_4");
    }

    #[test]
    fn pattern_classes_accept_their_characters() {
        assert!(accepts(PatternKind::Digit, '7'));
        assert!(!accepts(PatternKind::Digit, 'a'));
        assert!(accepts(PatternKind::Letter, 'q'));
        assert!(!accepts(PatternKind::Letter, '7'));
        assert!(accepts(PatternKind::Alnum, '7'));
        assert!(accepts(PatternKind::Hex, 'f'));
        assert!(!accepts(PatternKind::Hex, 'g'));
        assert!(accepts(PatternKind::Any, '-'));
        assert!(!accepts(PatternKind::Any, '\u{7}'));
    }

    // --- raw-value extraction ---------------------------------------------

    #[test]
    fn extraction_strips_literals_and_placeholders() {
        let mask = phone();
        assert_eq!(extract_raw("(555) 123-4567", &mask, '_'), "5551234567");
        assert_eq!(extract_raw("(555) ___-____", &mask, '_'), "555");
        assert_eq!(extract_raw("(___) ___-____", &mask, '_'), "");
    }

    #[test]
    fn extraction_never_returns_placeholder_or_literal_slots() {
        let mask = phone();
        for text in ["(555) 123-4567", "(5__) ___-____", "(___) ___-____"] {
            let raw = extract_raw(text, &mask, '_');
            assert!(!raw.contains('_'), "raw {raw:?} from {text:?}");
            assert!(!raw.contains('('), "raw {raw:?} from {text:?}");
            assert!(!raw.contains(')'), "raw {raw:?} from {text:?}");
            assert!(!raw.contains(' '), "raw {raw:?} from {text:?}");
            assert!(!raw.contains('-'), "raw {raw:?} from {text:?}");
        }
    }

    #[test]
    fn aligned_extraction_keeps_literal_chars_typed_into_open_slots() {
        // "?" accepts '-' even though '-' is also the mask's separator;
        // positional stripping keeps the typed one and drops the separator.
        let mask = CompiledMask::parse("??-??");
        assert_eq!(extract_raw("a--b_", &mask, '_'), "a-b");
    }

    #[test]
    fn shifted_extraction_handles_a_pending_insertion() {
        let mask = phone();
        // '1' typed at the first free slot of "(555) ___-____"
        assert_eq!(extract_raw("(555) 1___-____", &mask, '_'), "5551");
        // '9' typed mid-area, pushing a filled tail over the dash
        assert_eq!(extract_raw("(555) 9123-4567", &mask, '_'), "55591234567");
    }

    #[test]
    fn shifted_extraction_handles_a_pending_deletion() {
        let mask = phone();
        // '1' deleted out of "(555) 123-4567"
        assert_eq!(extract_raw("(555) 23-4567", &mask, '_'), "55234567");
        // ')' deleted: value unchanged once re-masked
        assert_eq!(extract_raw("(555 ___-____", &mask, '_'), "555");
    }

    #[test]
    fn extraction_of_overflow_keeps_trailing_typed_chars() {
        let mask = phone();
        assert_eq!(extract_raw("(555) 123-45678", &mask, '_'), "55512345678");
    }

    #[test]
    fn empty_mask_extracts_nothing_from_its_own_output() {
        let mask = CompiledMask::new(Vec::new());
        assert_eq!(extract_raw("", &mask, '_'), "");
    }

    // --- caret correction -------------------------------------------------

    #[test]
    fn first_keystroke_lands_after_the_leading_literal() {
        // "5" typed into an empty field at position 0
        let outcome = apply_with_caret("5", &phone(), '_', seed(0, 1, EditKind::Insertion));
        assert_eq!(outcome.masked, "(5__) ___-____");
        assert_eq!(outcome.caret, 2);
    }

    #[test]
    fn caret_hops_over_emitted_literal_runs() {
        // 4th digit typed at caret 4 of "(555) ___-____": the caret must
        // clear ") " and land after the digit it produced
        let outcome = apply_with_caret("5551", &phone(), '_', seed(4, 5, EditKind::Insertion));
        assert_eq!(outcome.masked, "(555) 1__-____");
        assert_eq!(outcome.caret, 7);
    }

    #[test]
    fn caret_stays_put_while_raw_is_exhausted() {
        // 3rd digit typed at caret 3: no unconsumed raw remains when ')'
        // is emitted, so the caret rests before the literal run
        let outcome = apply_with_caret("555", &phone(), '_', seed(3, 4, EditKind::Insertion));
        assert_eq!(outcome.masked, "(555) ___-____");
        assert_eq!(outcome.caret, 4);
    }

    #[test]
    fn deletion_never_advances_the_caret() {
        let outcome = apply_with_caret("55234567", &phone(), '_', seed(7, 6, EditKind::Deletion));
        assert_eq!(outcome.masked, "(552) 345-67__");
        assert_eq!(outcome.caret, 6);
    }

    #[test]
    fn caret_is_clamped_to_mask_length() {
        let outcome = apply_with_caret(
            "55512345678",
            &phone(),
            '_',
            seed(14, 15, EditKind::Insertion),
        );
        assert_eq!(outcome.masked, "(555) 123-4567");
        assert_eq!(outcome.caret, 14);
    }

    // --- fill helpers ------------------------------------------------------

    #[test]
    fn next_edit_position_finds_first_open_slot() {
        let mask = phone();
        assert_eq!(next_edit_position("(___) ___-____", &mask, '_'), 1);
        assert_eq!(next_edit_position("(555) ___-____", &mask, '_'), 6);
        assert_eq!(next_edit_position("(555) 123-4567", &mask, '_'), 14);
    }

    #[test]
    fn is_filled_requires_every_slot() {
        let mask = phone();
        assert!(is_filled("(555) 123-4567", &mask, '_'));
        assert!(!is_filled("(555) 123-456_", &mask, '_'));
        assert!(!is_filled("", &mask, '_'));
        assert!(is_filled("", &CompiledMask::new(Vec::new()), '_'));
    }
}
