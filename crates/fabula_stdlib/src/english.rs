//! Base English modifiers.
//!
//! These are heuristics, not a morphology engine: `s` and `ed` look only at
//! the last letters of the text, and `a` only at the first.

use std::sync::Arc;

use fabula_engine::Modifier;

/// Returns every modifier in this module, keyed by the name used in tags.
#[must_use]
pub fn english_modifiers() -> Vec<(&'static str, Modifier)> {
    let table: [(&'static str, fn(&str) -> String); 11] = [
        ("capitalize", capitalize),
        ("capitalizeAll", capitalize_all),
        ("uppercase", uppercase),
        ("lowercase", lowercase),
        ("a", a),
        ("s", s),
        ("firstS", first_s),
        ("ed", ed),
        ("inQuotes", in_quotes),
        ("comma", comma),
        ("beeSpeak", bee_speak),
    ];
    table
        .into_iter()
        .map(|(name, f)| (name, Arc::new(f) as Modifier))
        .collect()
}

fn is_vowel(c: char) -> bool {
    matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Splits off the last character.
fn split_last(text: &str) -> Option<(&str, char)> {
    let last = text.chars().next_back()?;
    Some((&text[..text.len() - last.len_utf8()], last))
}

// =============================================================================
// Case
// =============================================================================

/// Uppercases the first character.
#[must_use]
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Uppercases the first character of every word.
///
/// A word starts after any character that is not alphanumeric.
#[must_use]
pub fn capitalize_all(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = !c.is_alphanumeric();
    }
    out
}

/// Uppercases everything.
#[must_use]
pub fn uppercase(text: &str) -> String {
    text.to_uppercase()
}

/// Lowercases everything.
#[must_use]
pub fn lowercase(text: &str) -> String {
    text.to_lowercase()
}

// =============================================================================
// Articles and Inflection
// =============================================================================

/// Prefixes the indefinite article: `a cat`, `an owl`, `a unicorn`.
#[must_use]
pub fn a(text: &str) -> String {
    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    // "uni..." reads as "you-nee".
    if first.eq_ignore_ascii_case(&'u')
        && chars.nth(1).is_some_and(|c| c.eq_ignore_ascii_case(&'i'))
    {
        return format!("a {text}");
    }
    if is_vowel(first) {
        format!("an {text}")
    } else {
        format!("a {text}")
    }
}

/// Pluralizes: `cat` → `cats`, `fox` → `foxes`, `fly` → `flies`.
#[must_use]
pub fn s(text: &str) -> String {
    let Some((stem, last)) = split_last(text) else {
        return String::new();
    };
    match last {
        's' | 'h' | 'x' => format!("{text}es"),
        'y' => match split_last(stem) {
            Some((_, before)) if !is_vowel(before) => format!("{stem}ies"),
            _ => format!("{text}s"),
        },
        _ => format!("{text}s"),
    }
}

/// Pluralizes the first word only: `cat of doom` → `cats of doom`.
#[must_use]
pub fn first_s(text: &str) -> String {
    match text.split_once(' ') {
        Some((first, rest)) => format!("{} {rest}", s(first)),
        None => s(text),
    }
}

/// Puts a verb in the past tense: `walk` → `walked`, `bake` → `baked`.
#[must_use]
pub fn ed(text: &str) -> String {
    let (word, rest) = match text.split_once(' ') {
        Some((word, rest)) => (word, Some(rest)),
        None => (text, None),
    };
    let Some((stem, last)) = split_last(word) else {
        return text.to_string();
    };
    let past = match last {
        'e' => format!("{word}d"),
        'y' => match split_last(stem) {
            Some((_, before)) if !is_vowel(before) => format!("{stem}ied"),
            _ => format!("{word}ed"),
        },
        _ => format!("{word}ed"),
    };
    match rest {
        Some(rest) => format!("{past} {rest}"),
        None => past,
    }
}

// =============================================================================
// Punctuation and Play
// =============================================================================

/// Wraps the text in double quotes.
#[must_use]
pub fn in_quotes(text: &str) -> String {
    format!("\"{text}\"")
}

/// Appends a comma unless the text already ends in punctuation.
#[must_use]
pub fn comma(text: &str) -> String {
    match text.chars().next_back() {
        Some(',' | '.' | '?' | '!') => text.to_string(),
        _ => format!("{text},"),
    }
}

/// Replaces every `s` with `zzz`.
#[must_use]
pub fn bee_speak(text: &str) -> String {
    text.replace('s', "zzz")
}
