//! Toy English to German translator
//!
//! Whole-phrase lookup first, then a crude word-by-word substitution.

const PHRASES: &[(&str, &str)] = &[
    ("good morning", "Guten Morgen"),
    ("have a nice day", "Einen schönen Tag noch"),
    ("sunshine", "Sonnenschein"),
    ("hello", "Hallo"),
    ("hi", "Hallo"),
];

const WORDS: &[(&str, &str)] = &[
    ("good", "gut"),
    ("morning", "Morgen"),
    ("have", "haben"),
    ("a", "ein"),
    ("nice", "schön"),
    ("day", "Tag"),
    ("and", "und"),
    ("then", "dann"),
    ("translate", "übersetzen"),
];

fn lookup(table: &[(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(en, _)| *en == key).map(|(_, de)| *de)
}

/// Translate `text`. Unknown words pass through unchanged.
pub fn translate_en_to_de(text: &str) -> String {
    let key = text.trim().to_lowercase();
    if let Some(phrase) = lookup(PHRASES, &key) {
        return phrase.to_string();
    }

    let out = key
        .split_whitespace()
        .map(|word| lookup(WORDS, word).unwrap_or(word))
        .collect::<Vec<_>>()
        .join(" ");

    capitalize_first(&out)
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
