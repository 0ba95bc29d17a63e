//! Text Sampler
//!
//! Bounds the text sent to the model while keeping its overall shape.
//! Oversized input becomes three equal windows (head, middle, tail) joined
//! by an elision marker. All positions are counted in chars, never bytes.

use std::borrow::Cow;

use crate::constants::sampling::ELISION_MARKER;

/// Sample `text` down to three windows of `max_chars / 3` chars each.
///
/// Text of at most `max_chars` chars is returned borrowed and unchanged.
/// The elision markers are not counted against `max_chars`.
pub fn sample(text: &str, max_chars: usize) -> Cow<'_, str> {
    let total = text.chars().count();
    if total <= max_chars {
        return Cow::Borrowed(text);
    }

    let segment = max_chars / 3;
    let middle_start = (total - segment) / 2;
    let tail_start = total - segment;

    let head = char_slice(text, 0, segment);
    let middle = char_slice(text, middle_start, middle_start + segment);
    let tail = char_slice(text, tail_start, total);

    let mut sampled =
        String::with_capacity(head.len() + middle.len() + tail.len() + 2 * ELISION_MARKER.len());
    sampled.push_str(head);
    sampled.push_str(ELISION_MARKER);
    sampled.push_str(middle);
    sampled.push_str(ELISION_MARKER);
    sampled.push_str(tail);

    Cow::Owned(sampled)
}

/// Substring between two char positions
fn char_slice(text: &str, start: usize, end: usize) -> &str {
    let from = byte_offset(text, start);
    let to = byte_offset(text, end);
    &text[from..to]
}

fn byte_offset(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(offset, _)| offset)
        .unwrap_or(text.len())
}
