//! Canonical text form shared with the placement step.
//!
//! Both the placement step (which fingerprints the text it commits) and
//! this verifier (which fingerprints the text it expected) normalize
//! through the exact same steps, in the exact same order. Any change here
//! is a breaking protocol change and both sides must update together.
//!
//! The form is aggressive about typographic noise and conservative about
//! content: punctuation, case, and diacritics collapse; words never do.

/// Paired wrapper the authoring format uses to mark bold runs.
///
/// Stripped as a literal string before the punctuation pass: the letter
/// `b` inside the marker must not survive as content.
pub const BOLD_OPEN: &str = "<b>";
pub const BOLD_CLOSE: &str = "</b>";

/// Placeholder left behind by inline anchored objects (images, frames).
const OBJECT_REPLACEMENT: char = '\u{FFFC}';

/// Accented Latin characters folded to unaccented base forms.
///
/// The table is fixed: it is part of the fingerprint contract, applied
/// after lowercasing, so only lowercase entries appear. Multi-char folds
/// keep ligatures and sharp s from collapsing into a neighboring word.
const DIACRITIC_FOLDS: &[(char, &str)] = &[
    ('à', "a"),
    ('á', "a"),
    ('â', "a"),
    ('ã', "a"),
    ('ä', "a"),
    ('å', "a"),
    ('è', "e"),
    ('é', "e"),
    ('ê', "e"),
    ('ë', "e"),
    ('ì', "i"),
    ('í', "i"),
    ('î', "i"),
    ('ï', "i"),
    ('ò', "o"),
    ('ó', "o"),
    ('ô', "o"),
    ('õ', "o"),
    ('ö', "o"),
    ('ø', "o"),
    ('ù', "u"),
    ('ú', "u"),
    ('û', "u"),
    ('ü', "u"),
    ('ý', "y"),
    ('ÿ', "y"),
    ('ñ', "n"),
    ('ç', "c"),
    ('š', "s"),
    ('ž', "z"),
    ('æ', "ae"),
    ('œ', "oe"),
    ('ß', "ss"),
];

/// Canonicalize raw rewritten or observed text.
///
/// Total: any input produces an output, possibly empty. Idempotent:
/// normalizing a normalized string is a no-op.
///
/// Steps, in order:
/// 1. Strip control characters (except whitespace controls, which the
///    whitespace pass handles), the soft hyphen, and zero-width format
///    characters.
/// 2. Strip the paired bold wrappers.
/// 3. Strip object replacement characters.
/// 4. Collapse whitespace runs to single spaces; trim.
/// 5. Lowercase.
/// 6. Fold accented Latin characters.
/// 7. Replace anything outside `[a-z0-9]` and whitespace with a space,
///    then re-collapse.
pub fn normalize(raw: &str) -> String {
    let stripped: String = raw.chars().filter(|c| !is_control_artifact(*c)).collect();
    let stripped = stripped.replace(BOLD_OPEN, "").replace(BOLD_CLOSE, "");
    let stripped: String = stripped.chars().filter(|c| *c != OBJECT_REPLACEMENT).collect();

    let collapsed = collapse_whitespace(&stripped);
    let lowered = collapsed.to_lowercase();
    let folded = fold_diacritics(&lowered);

    let scrubbed: String = folded
        .chars()
        .map(|c| {
            if matches!(c, 'a'..='z' | '0'..='9') || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();
    collapse_whitespace(&scrubbed)
}

/// Device/control artifacts of the authoring format.
///
/// Whitespace controls (tab, newline, carriage return) are excluded: they
/// separate words and must survive until the whitespace collapse.
fn is_control_artifact(c: char) -> bool {
    (c.is_control() && !c.is_whitespace())
        || matches!(c, '\u{00AD}' | '\u{FEFF}' | '\u{200B}' | '\u{200C}' | '\u{200D}')
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn fold_diacritics(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match DIACRITIC_FOLDS.iter().find(|(from, _)| *from == c) {
            Some((_, to)) => out.push_str(to),
            None => out.push(c),
        }
    }
    out
}
