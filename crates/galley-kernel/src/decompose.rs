//! Structural decomposition of rewrites.
//!
//! The host document model does not preserve paragraph boundaries: a
//! semicolon list may be placed as one paragraph per item, and two source
//! paragraphs may be merged into one placed paragraph with their layered
//! side notes folded in. These operations reconstruct what the placement
//! step would have committed, so the reconciler can compare like with
//! like.

/// Headings that introduce a layered side-note block after a paragraph's
/// main body.
pub const LAYER_MARKERS: &[&str] = &["Praxis:", "Vertiefung:"];

/// Split a semicolon-list rewrite into the items the placement step may
/// have committed one paragraph each.
///
/// Every item except the last is re-suffixed with `;`; the last keeps a
/// trailing `;` only if the original text ended with one. Empty pieces
/// between separators are dropped.
pub fn split_list_items(text: &str) -> Vec<String> {
    let ends_with_separator = text.trim_end().ends_with(';');
    let pieces: Vec<&str> = text
        .split(';')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect();

    let count = pieces.len();
    pieces
        .into_iter()
        .enumerate()
        .map(|(i, piece)| {
            if i + 1 < count || ends_with_separator {
                format!("{piece};")
            } else {
                piece.to_string()
            }
        })
        .collect()
}

/// Split a rewrite into its main body and its layered side-note tail.
///
/// The tail starts at the earliest occurrence of any marker in
/// [`LAYER_MARKERS`]. A blank line (two consecutive newlines) immediately
/// before the marker belongs to the tail, not the base; the placement
/// step treats the boundary that way and merge reconstruction must match
/// it bit for bit. Text without markers is all base.
pub fn split_layer_blocks(text: &str) -> (&str, &str) {
    let earliest = LAYER_MARKERS
        .iter()
        .filter_map(|marker| text.find(marker))
        .min();

    match earliest {
        None => (text, ""),
        Some(mut at) => {
            if text[..at].ends_with("\n\n") {
                at -= 2;
            }
            (&text[..at], &text[at..])
        }
    }
}

/// Reconstruct the text of two source paragraphs merged into one placed
/// paragraph.
///
/// Segment order is the merge policy's fixed convention: the secondary
/// paragraph's body and side notes are folded in before the primary's
/// side notes. Segments are trimmed and non-empty ones joined with a
/// blank line.
pub fn merge_rewrites(primary: &str, secondary: &str) -> String {
    let (primary_base, primary_tail) = split_layer_blocks(primary);
    let (secondary_base, secondary_tail) = split_layer_blocks(secondary);

    [primary_base, secondary_base, secondary_tail, primary_tail]
        .iter()
        .map(|segment| segment.trim())
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Whether a merge falls outside the convention's verified territory.
///
/// The segment ordering above is only known to be correct when at most
/// one side carries more than one distinct layer marker. A merge where
/// both sides do is reported as a warning instead of silently extending
/// the convention.
pub fn merge_is_uncharted(primary: &str, secondary: &str) -> bool {
    distinct_marker_count(primary) >= 2 && distinct_marker_count(secondary) >= 2
}

fn distinct_marker_count(text: &str) -> usize {
    LAYER_MARKERS
        .iter()
        .filter(|marker| text.contains(*marker))
        .count()
}
