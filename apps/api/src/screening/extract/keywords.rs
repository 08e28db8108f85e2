//! Keyword extractors for skills and education.
//!
//! Each reference term is matched case-insensitively as a whole word, with any
//! space or hyphen inside the term matching an optional space or hyphen
//! (`Power BI` matches `PowerBI` and `power-bi`). Results follow the order of
//! the reference list, not the order of appearance in the resume.

use std::sync::OnceLock;

use regex::Regex;

use super::{NO_EDUCATION_FOUND, NO_SKILLS_FOUND};
use crate::screening::normalize::normalize_text;

pub const SKILLS: &[&str] = &[
    "Python",
    "SQL",
    "Machine Learning",
    "Deep Learning",
    "Data Analysis",
    "Data Science",
    "Flask",
    "Django",
    "HTML",
    "CSS",
    "JavaScript",
    "React",
    "Git",
    "Power BI",
    "Tableau",
    "Pandas",
    "Numpy",
    "Scikit-learn",
    "TensorFlow",
    "Keras",
];

pub const EDUCATION_KEYWORDS: &[&str] = &[
    "Computer Science",
    "Information Technology",
    "Data Science",
    "Computer Engineering",
    "Bachelor",
    "Master",
    "B.Tech",
    "M.Tech",
    "B.E",
    "M.E",
];

fn skill_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| compile_terms(SKILLS))
}

fn education_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| compile_terms(EDUCATION_KEYWORDS))
}

fn compile_terms(terms: &[&str]) -> Vec<Regex> {
    terms
        .iter()
        .map(|term| Regex::new(&term_pattern(term)).expect("keyword pattern is valid"))
        .collect()
}

fn term_pattern(term: &str) -> String {
    let body = term
        .split([' ', '-'])
        .filter(|part| !part.is_empty())
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"[-\s]?");
    format!(r"(?i)\b{body}\b")
}

fn find_terms(text: &str, terms: &[&str], patterns: &[Regex], sentinel: &str) -> Vec<String> {
    let normalized = normalize_text(text);
    let found: Vec<String> = terms
        .iter()
        .zip(patterns)
        .filter(|(_, pattern)| pattern.is_match(&normalized))
        .map(|(term, _)| term.to_string())
        .collect();

    if found.is_empty() {
        vec![sentinel.to_string()]
    } else {
        found
    }
}

pub fn extract_skills(text: &str) -> Vec<String> {
    find_terms(text, SKILLS, skill_patterns(), NO_SKILLS_FOUND)
}

pub fn extract_education(text: &str) -> Vec<String> {
    find_terms(
        text,
        EDUCATION_KEYWORDS,
        education_patterns(),
        NO_EDUCATION_FOUND,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Keras, tensorflow and scikit learn.\nBuilt dashboards in PowerBI \
                          and Tableau; strong in python/SQL.\nB.Tech in Computer  Science, \
                          pursuing a Master's degree.";

    #[test]
    fn test_skills_follow_reference_order() {
        assert_eq!(
            extract_skills(SAMPLE),
            vec![
                "Python",
                "SQL",
                "Power BI",
                "Tableau",
                "Scikit-learn",
                "TensorFlow",
                "Keras"
            ]
        );
    }

    #[test]
    fn test_education_keywords() {
        assert_eq!(
            extract_education(SAMPLE),
            vec!["Computer Science", "Master", "B.Tech"]
        );
    }

    #[test]
    fn test_whole_word_only() {
        // "Reactive" must not count as React, nor "Gitlab" as Git.
        assert_eq!(
            extract_skills("Reactive systems on Gitlab"),
            vec![NO_SKILLS_FOUND]
        );
    }

    #[test]
    fn test_multi_word_terms_span_line_breaks() {
        assert_eq!(
            extract_skills("Machine\nLearning and deep-learning"),
            vec!["Machine Learning", "Deep Learning"]
        );
    }

    #[test]
    fn test_sentinels_when_nothing_matches() {
        assert_eq!(extract_skills("Gardening"), vec![NO_SKILLS_FOUND]);
        assert_eq!(extract_education(""), vec![NO_EDUCATION_FOUND]);
    }

    #[test]
    fn test_idempotent_under_normalization() {
        let normalized = normalize_text(SAMPLE);
        assert_eq!(extract_skills(&normalized), extract_skills(SAMPLE));
        assert_eq!(extract_education(&normalized), extract_education(SAMPLE));
        assert_eq!(normalize_text(&normalized), normalized);
    }

    #[test]
    fn test_term_pattern_escapes_and_relaxes_separators() {
        assert_eq!(term_pattern("B.Tech"), r"(?i)\bB\.Tech\b");
        assert_eq!(term_pattern("Scikit-learn"), r"(?i)\bScikit[-\s]?learn\b");
        assert_eq!(term_pattern("Power BI"), r"(?i)\bPower[-\s]?BI\b");
    }
}
