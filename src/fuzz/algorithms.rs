//! Pure per-fuzzer label transforms. Each function receives the
//! registrable `label` only — subdomain and TLD are reattached by the
//! engine (`mod.rs`), except `subdomain` and `various`, which vary the
//! label/TLD boundary themselves and are handled as a structural case in
//! the engine.

use std::collections::HashSet;

use super::data::{ASCII_CONFUSABLES, CYRILLIC, HOMOGLYPHS, KEYBOARDS, VOWELS};

pub fn bitsquatting(label: &str) -> Vec<String> {
    const MASKS: [u8; 8] = [1, 2, 4, 8, 16, 32, 64, 128];
    let chars: Vec<char> = label.chars().collect();
    let mut result = Vec::new();
    for (i, &c) in chars.iter().enumerate() {
        if !c.is_ascii() {
            continue;
        }
        for mask in MASKS {
            let flipped = (c as u8) ^ mask;
            if flipped.is_ascii_alphanumeric() || flipped == b'-' {
                let mut out: String = chars[..i].iter().collect();
                out.push(flipped as char);
                out.extend(&chars[i + 1..]);
                result.push(out);
            }
        }
    }
    result
}

/// Two-pass homoglyph substitution over `glyphs`. `glyphs` is the effective
/// per-TLD table the caller has already resolved.
pub fn homoglyph(label: &str, glyphs: &std::collections::HashMap<&str, Vec<&str>>) -> Vec<String> {
    let pass1 = homoglyph_pass(label, glyphs);
    let mut pass2 = HashSet::new();
    for candidate in &pass1 {
        for out in homoglyph_pass(candidate, glyphs) {
            pass2.insert(out);
        }
    }
    let mut all: HashSet<String> = pass1.into_iter().collect();
    all.extend(pass2);
    all.into_iter().collect()
}

fn homoglyph_pass(label: &str, glyphs: &std::collections::HashMap<&str, Vec<&str>>) -> Vec<String> {
    let chars: Vec<char> = label.chars().collect();
    let len = chars.len();
    let mut result = HashSet::new();
    for ws in 1..len {
        for i in 0..=(len - ws) {
            let window: String = chars[i..i + ws].iter().collect();
            for j in 0..ws {
                let c = chars[i + j];
                let key = c.to_string();
                if let Some(subs) = glyphs.get(key.as_str()) {
                    for g in subs {
                        let replaced = window.replacen(c, g, usize::MAX);
                        let prefix: String = chars[..i].iter().collect();
                        let suffix: String = chars[i + ws..].iter().collect();
                        result.insert(format!("{}{}{}", prefix, replaced, suffix));
                    }
                }
            }
        }
    }
    result.into_iter().collect()
}

pub fn hyphenation(label: &str) -> Vec<String> {
    let chars: Vec<char> = label.chars().collect();
    (1..chars.len())
        .map(|i| {
            let mut out: String = chars[..i].iter().collect();
            out.push('-');
            out.extend(&chars[i..]);
            out
        })
        .collect()
}

pub fn insertion(label: &str) -> Vec<String> {
    let chars: Vec<char> = label.chars().collect();
    let len = chars.len();
    let mut result = HashSet::new();
    if len < 2 {
        return Vec::new();
    }
    for i in 1..len - 1 {
        for kb in KEYBOARDS.iter() {
            if let Some(neighbors) = kb.get(&chars[i]) {
                for c in neighbors.chars() {
                    let mut a: String = chars[..i].iter().collect();
                    a.push(c);
                    a.push(chars[i]);
                    a.extend(&chars[i + 1..]);
                    result.insert(a);

                    let mut b: String = chars[..i].iter().collect();
                    b.push(chars[i]);
                    b.push(c);
                    b.extend(&chars[i + 1..]);
                    result.insert(b);
                }
            }
        }
    }
    result.into_iter().collect()
}

pub fn omission(label: &str) -> Vec<String> {
    let chars: Vec<char> = label.chars().collect();
    let mut result: Vec<String> = (0..chars.len())
        .map(|i| {
            let mut out: String = chars[..i].iter().collect();
            out.extend(&chars[i + 1..]);
            out
        })
        .collect();

    let collapsed = collapse_repeats(label);
    if collapsed != label && !result.contains(&collapsed) {
        result.push(collapsed);
    }
    let unique: HashSet<String> = result.into_iter().collect();
    unique.into_iter().collect()
}

fn collapse_repeats(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut last: Option<char> = None;
    for c in label.chars() {
        if Some(c) != last {
            out.push(c);
        }
        last = Some(c);
    }
    out
}

pub fn repetition(label: &str) -> Vec<String> {
    let chars: Vec<char> = label.chars().collect();
    let mut result = HashSet::new();
    for (i, &c) in chars.iter().enumerate() {
        if c.is_alphabetic() {
            let mut out: String = chars[..i].iter().collect();
            out.push(c);
            out.push(c);
            out.extend(&chars[i + 1..]);
            result.insert(out);
        }
    }
    result.into_iter().collect()
}

pub fn replacement(label: &str) -> Vec<String> {
    let chars: Vec<char> = label.chars().collect();
    let mut result = HashSet::new();
    for (i, &c) in chars.iter().enumerate() {
        for kb in KEYBOARDS.iter() {
            if let Some(neighbors) = kb.get(&c) {
                for n in neighbors.chars() {
                    let mut out: String = chars[..i].iter().collect();
                    out.push(n);
                    out.extend(&chars[i + 1..]);
                    result.insert(out);
                }
            }
        }
    }
    result.into_iter().collect()
}

/// Interior dot-insertion positions, `1..len-1`, restricted to positions
/// where neither neighbor is `-` or `.` (spec §9 adopts `1..len-1` over the
/// older `1..len-3`).
pub fn subdomain(label: &str) -> Vec<String> {
    let chars: Vec<char> = label.chars().collect();
    let len = chars.len();
    if len < 2 {
        return Vec::new();
    }
    let mut result = Vec::new();
    for i in 1..len - 1 {
        if chars[i] != '-' && chars[i] != '.' && chars[i - 1] != '-' && chars[i - 1] != '.' {
            let mut out: String = chars[..i].iter().collect();
            out.push('.');
            out.extend(&chars[i..]);
            result.push(out);
        }
    }
    result
}

pub fn transposition(label: &str) -> Vec<String> {
    let chars: Vec<char> = label.chars().collect();
    let mut result = Vec::new();
    if chars.len() < 2 {
        return result;
    }
    for i in 0..chars.len() - 1 {
        if chars[i + 1] != chars[i] {
            let mut out: String = chars[..i].iter().collect();
            out.push(chars[i + 1]);
            out.push(chars[i]);
            out.extend(&chars[i + 2..]);
            result.push(out);
        }
    }
    result
}

pub fn vowel_swap(label: &str) -> Vec<String> {
    let chars: Vec<char> = label.chars().collect();
    let mut result = HashSet::new();
    for (i, &c) in chars.iter().enumerate() {
        if VOWELS.contains(c) {
            for vowel in VOWELS.chars() {
                let mut out: String = chars[..i].iter().collect();
                out.push(vowel);
                out.extend(&chars[i + 1..]);
                result.insert(out);
            }
        }
    }
    result.into_iter().collect()
}

/// Appends one character from `[0-9a-z]`; additionally, if `label` contains
/// `-`, inserts such a character before each hyphen segment.
pub fn addition(label: &str) -> Vec<String> {
    let alphabet: Vec<char> = ('0'..='9').chain('a'..='z').collect();
    let mut result: Vec<String> = alphabet.iter().map(|c| format!("{}{}", label, c)).collect();

    if label.contains('-') {
        let chars: Vec<char> = label.chars().collect();
        for (i, &c) in chars.iter().enumerate() {
            if c == '-' {
                for &a in &alphabet {
                    let mut out: String = chars[..i].iter().collect();
                    out.push(a);
                    out.extend(&chars[i..]);
                    result.push(out);
                }
            }
        }
    }
    result
}

/// Interior positions `3..len-2`, appending `s` or `es` after `s`/`x`/`z`.
pub fn plural(label: &str) -> Vec<String> {
    let chars: Vec<char> = label.chars().collect();
    let len = chars.len();
    if len < 6 {
        return Vec::new();
    }
    let mut result = Vec::new();
    for i in 3..len - 2 {
        let prefix: String = chars[..=i].iter().collect();
        let suffix: String = chars[i + 1..].iter().collect();
        let suffixed = match chars[i] {
            's' | 'x' | 'z' => format!("{}es{}", prefix, suffix),
            _ => format!("{}s{}", prefix, suffix),
        };
        result.push(suffixed);
    }
    result
}

/// Substitutes every Latin letter with its Cyrillic visual analogue. Emits
/// nothing unless at least one character actually changed.
pub fn cyrillic(label: &str) -> Vec<String> {
    let mut out = String::with_capacity(label.len());
    let mut changed = false;
    for c in label.chars() {
        if let Some(&sub) = CYRILLIC.get(&c) {
            out.push(sub);
            changed = true;
        } else {
            out.push(c);
        }
    }
    if changed {
        vec![out]
    } else {
        Vec::new()
    }
}

/// `label-word`, `labelword`, `word-label`, `wordlabel` for each dictionary
/// word, skipping words that already bookend `label`; plus hyphen-splice
/// variants when `label` contains `-`.
pub fn dictionary(label: &str, words: &[String]) -> Vec<String> {
    let mut result = Vec::new();
    for word in words {
        if label.starts_with(word.as_str()) && label.ends_with(word.as_str()) {
            continue;
        }
        result.push(format!("{}-{}", label, word));
        result.push(format!("{}{}", label, word));
        result.push(format!("{}-{}", word, label));
        result.push(format!("{}{}", word, label));

        if label.contains('-') {
            let mut segments: Vec<&str> = label.split('-').collect();
            if let Some(last) = segments.last_mut() {
                *last = word.as_str();
            }
            result.push(segments.join("-"));

            let mut segments: Vec<&str> = label.split('-').collect();
            if !segments.is_empty() {
                segments[0] = word.as_str();
            }
            result.push(segments.join("-"));
        }
    }
    result
}

/// Confusable ASCII-only homoglyph table, restricted to entries from the
/// full table that stay within `[a-z0-9-]` (used to pre-filter before
/// IDNA encoding when a registry disallows IDN entirely).
pub fn ascii_confusables() -> &'static std::collections::HashMap<&'static str, Vec<&'static str>> {
    &ASCII_CONFUSABLES
}

/// The full Unicode glyph table, exported for the engine to compose with
/// per-TLD overrides.
pub fn full_homoglyph_table() -> &'static std::collections::HashMap<&'static str, Vec<&'static str>> {
    &HOMOGLYPHS
}
