//! Contact extractors: email, phone number and candidate name.

use std::sync::OnceLock;

use regex::Regex;

use super::NOT_FOUND;

/// Lines scanned from the top of the resume when looking for a name.
const NAME_SCAN_LINES: usize = 50;

/// Section headings and contact labels that never belong to a name line.
const HEADING_WORDS: &[&str] = &[
    "resume",
    "curriculum vitae",
    "cv",
    "profile",
    "summary",
    "project",
    "company",
    "experience",
    "education",
    "skills",
    "objective",
    "contact",
    "email",
    "phone",
    "address",
];

fn at_regex() -> &'static Regex {
    static AT: OnceLock<Regex> = OnceLock::new();
    AT.get_or_init(|| Regex::new(r"(?i)\(at\)|\[at\]|\{at\}").expect("at pattern is valid"))
}

/// An address may carry whitespace around `@`, and around a `.` when both
/// sides are spaced (`jane . doe @ corp . com`). The TLD must be followed by
/// something that cannot continue a domain, so `x@startup.company` is not
/// read as `x@startup.com`.
fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        let local = r"[A-Za-z0-9%+_-]+";
        let label = r"[A-Za-z0-9-]+";
        let dot = r"(?:\.|\s+\.\s+)";
        let tld = "(?:com|org|net|edu|gov|info|io|co|in|ai|dev|me|us|uk)";
        let end = r"(?:[^A-Za-z0-9.-]|\.(?:[^A-Za-z0-9]|\z)|\z)";
        Regex::new(&format!(
            r"({local}(?:{dot}{local})*\s*@\s*{label}(?:{dot}{label})*{dot}{tld}){end}"
        ))
        .expect("email pattern is valid")
    })
}

fn phone_regex() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| {
        Regex::new(r"\+?\(?\d[\d \t().-]{8,}\d").expect("phone pattern is valid")
    })
}

/// Returns the first email address in the text, with any whitespace inside it
/// removed.
///
/// Obfuscated `(at)`, `[at]` and `{at}` markers are read as `@`, so
/// `a.b (at) example.com` resolves to `a.b@example.com`. Only a fixed set of
/// TLDs is accepted.
pub fn extract_email(text: &str) -> String {
    let substituted = at_regex().replace_all(text, "@");
    email_regex()
        .captures(&substituted)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().chars().filter(|c| !c.is_whitespace()).collect())
        .unwrap_or_else(|| NOT_FOUND.to_string())
}

/// Returns the longest phone-like run (at least 10 characters of digits and
/// separators on one line) with internal whitespace removed. The first match
/// wins among equally long ones.
pub fn extract_phone(text: &str) -> String {
    phone_regex()
        .find_iter(text)
        .map(|m| m.as_str())
        .reduce(|best, candidate| {
            if candidate.len() > best.len() {
                candidate
            } else {
                best
            }
        })
        .map(|phone| phone.chars().filter(|c| !c.is_whitespace()).collect())
        .unwrap_or_else(|| NOT_FOUND.to_string())
}

/// Returns the first line near the top of the resume that looks like a name:
/// two or three words, each capitalized, none of them a section heading.
/// Falls back to a name derived from the email address.
pub fn extract_name(text: &str) -> String {
    text.lines()
        .take(NAME_SCAN_LINES)
        .find_map(name_from_line)
        .unwrap_or_else(|| name_from_email(&extract_email(text)))
}

fn name_from_line(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lower = trimmed.to_lowercase();
    if HEADING_WORDS.iter().any(|heading| lower.contains(heading)) {
        return None;
    }

    // Apostrophes join (O'Connor), every other non-letter separates.
    let letters_only: String = trimmed
        .chars()
        .filter(|c| !matches!(*c, '\'' | '\u{2019}'))
        .map(|c| if c.is_alphabetic() { c } else { ' ' })
        .collect();
    let words: Vec<&str> = letters_only.split_whitespace().collect();

    let plausible = (2..=3).contains(&words.len())
        && words.iter().all(|word| {
            word.chars().next().is_some_and(char::is_uppercase)
                && !HEADING_WORDS.contains(&word.to_lowercase().as_str())
        });

    plausible.then(|| words.join(" "))
}

/// Derives a display name from an email local part: `jane.doe42@x.com` → `Jane Doe`.
pub fn name_from_email(email: &str) -> String {
    let Some((local, _)) = email.split_once('@') else {
        return NOT_FOUND.to_string();
    };

    let spaced: String = local
        .chars()
        .filter(|c| !c.is_ascii_digit())
        .map(|c| if c == '.' || c == '_' { ' ' } else { c })
        .collect();

    let name = spaced
        .split_whitespace()
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ");

    if name.is_empty() {
        NOT_FOUND.to_string()
    } else {
        name
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
