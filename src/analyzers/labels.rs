//! Category label normalization, applied before any counting.

/// How a raw column value becomes a category label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    /// Surrounding whitespace removed, otherwise verbatim.
    Trimmed,
    /// `male`/`female` in any case become `Male`/`Female`.
    Gender,
    /// Free text folded into one camelCase token.
    CamelCase,
}

impl Label {
    pub fn apply(self, raw: &str) -> String {
        match self {
            Label::Trimmed => raw.trim().to_string(),
            Label::Gender => normalize_gender(raw),
            Label::CamelCase => to_camel_case(raw),
        }
    }
}

/// Maps `male`/`female` to `Male`/`Female` after trimming, ignoring ASCII
/// case, so " MALE " and "Female" land in the same buckets as "male" and
/// "female". This is looser than an exact match on the lowercase spellings.
/// Any other value is returned trimmed but otherwise unchanged.
pub fn normalize_gender(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("male") {
        "Male".into()
    } else if trimmed.eq_ignore_ascii_case("female") {
        "Female".into()
    } else {
        trimmed.to_string()
    }
}

/// Lowercases the input, splits on whitespace, `-` and `_`, and joins the
/// words with every word after the first capitalized.
///
/// Only case and separators are folded: "Software Engineer",
/// "software-engineer" and "SOFTWARE_ENGINEER" all become "softwareEngineer".
pub fn to_camel_case(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();
    let mut out = String::with_capacity(lower.len());

    let words = lower
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|w| !w.is_empty());

    for (i, word) in words.enumerate() {
        if i == 0 {
            out.push_str(word);
            continue;
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }

    out
}
