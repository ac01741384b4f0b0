//! Name preparation for roster entries
//!
//! Rule order matters: multi-letter syllables must run before the
//! single-vowel rules or they would never match.

/// Ordered Latin → Arabic substitution rules
const ARABIC_RULES: &[(&str, &str)] = &[
    ("shi", "شي"),
    ("chi", "تشي"),
    ("tsu", "تسو"),
    ("sa", "سا"),
    ("su", "سو"),
    ("ke", "كي"),
    ("ka", "كا"),
    ("ku", "كو"),
    ("na", "نا"),
    ("no", "نو"),
    ("ma", "ما"),
    ("mi", "مي"),
    ("ya", "يا"),
    ("ra", "را"),
    ("ri", "ري"),
    ("ru", "رو"),
    ("a", "ا"),
    ("i", "ي"),
    ("u", "و"),
    ("e", "ي"),
    ("o", "و"),
];

/// Approximate a romanized name in Arabic script.
///
/// Each rule replaces every occurrence before the next one runs; Latin
/// letters left over afterwards are dropped.
pub fn to_arabic(name: &str) -> String {
    let mut out = name.to_lowercase();
    for (from, to) in ARABIC_RULES {
        out = out.replace(from, to);
    }
    out.retain(|c| !c.is_ascii_lowercase());
    out
}

/// Turn "Last, First" into "First Last"; other names are returned as-is.
pub fn fix_name(name: &str) -> String {
    match name.split_once(',') {
        Some((last, first)) => format!("{} {}", first.trim(), last.trim()),
        None => name.to_string(),
    }
}
