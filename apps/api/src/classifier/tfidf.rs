//! TF-IDF vectorizer restored from a JSON export of a fitted scikit-learn
//! `TfidfVectorizer`. Only the transform side is implemented; fitting happens offline.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use super::{FeatureVector, ModelError};

/// Default scikit-learn token pattern: two or more word characters.
fn token_regex() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| Regex::new(r"\b\w\w+\b").expect("token pattern is valid"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    #[serde(default = "default_lowercase")]
    lowercase: bool,
    #[serde(default = "default_ngram_range")]
    ngram_range: (usize, usize),
    #[serde(default)]
    stop_words: HashSet<String>,
    #[serde(default)]
    sublinear_tf: bool,
    #[serde(default = "default_norm")]
    norm: Option<Norm>,
}

fn default_lowercase() -> bool {
    true
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

impl TfidfVectorizer {
    pub fn n_features(&self) -> usize {
        self.idf.len()
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        let (min, max) = self.ngram_range;
        if min == 0 || min > max {
            return Err(ModelError::InvalidNgramRange { min, max });
        }
        if let Some((term, &index)) = self
            .vocabulary
            .iter()
            .find(|&(_, &index)| index >= self.idf.len())
        {
            return Err(ModelError::VocabularyOutOfRange {
                term: term.clone(),
                index,
                len: self.idf.len(),
            });
        }
        Ok(())
    }

    pub fn transform(&self, text: &str) -> FeatureVector {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for term in self.analyze(text) {
            if let Some(&index) = self.vocabulary.get(&term) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(index, tf)| {
                let tf = if self.sublinear_tf { 1.0 + tf.ln() } else { tf };
                (index, tf * self.idf[index])
            })
            .collect();

        let scale = match self.norm {
            Some(Norm::L2) => entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt(),
            Some(Norm::L1) => entries.iter().map(|(_, w)| w.abs()).sum::<f64>(),
            None => 1.0,
        };
        if scale > 0.0 {
            for (_, w) in entries.iter_mut() {
                *w /= scale;
            }
        }

        FeatureVector::from_entries(self.n_features(), entries)
    }

    /// Tokenizes, drops stop words and expands word n-grams.
    fn analyze(&self, text: &str) -> Vec<String> {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        let tokens: Vec<&str> = token_regex()
            .find_iter(&text)
            .map(|m| m.as_str())
            .filter(|t| !self.stop_words.contains(*t))
            .collect();

        let (min, max) = self.ngram_range;
        let mut terms = Vec::new();
        for n in min..=max {
            if n > tokens.len() {
                break;
            }
            terms.extend(tokens.windows(n).map(|w| w.join(" ")));
        }
        terms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vectorizer(value: serde_json::Value) -> TfidfVectorizer {
        let v: TfidfVectorizer = serde_json::from_value(value).unwrap();
        v.validate().unwrap();
        v
    }

    #[test]
    fn test_defaults_are_sklearn_defaults() {
        let v = vectorizer(json!({"vocabulary": {"rust": 0}, "idf": [1.0]}));
        assert!(v.lowercase);
        assert_eq!(v.ngram_range, (1, 1));
        assert_eq!(v.norm, Some(Norm::L2));
        assert!(!v.sublinear_tf);
    }

    #[test]
    fn test_transform_weights_and_l2_normalizes() {
        let v = vectorizer(json!({
            "vocabulary": {"python": 0, "sql": 1, "excel": 2},
            "idf": [1.0, 2.0, 3.0]
        }));
        // python tf=2 → 2.0, sql tf=1 → 2.0; norm = sqrt(8)
        let fv = v.transform("Python python SQL");
        let expected = 2.0 / 8.0_f64.sqrt();
        assert!((fv.get(0) - expected).abs() < 1e-12);
        assert!((fv.get(1) - expected).abs() < 1e-12);
        assert_eq!(fv.get(2), 0.0);
        assert_eq!(fv.dim(), 3);
    }

    #[test]
    fn test_single_character_tokens_are_ignored() {
        let v = vectorizer(json!({"vocabulary": {"c": 0, "go": 1}, "idf": [1.0, 1.0]}));
        let fv = v.transform("C and Go");
        assert_eq!(fv.get(0), 0.0);
        assert!((fv.get(1) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_bigrams_and_stop_words() {
        let v = vectorizer(json!({
            "vocabulary": {"machine learning": 0, "machine": 1, "the": 2},
            "idf": [1.0, 1.0, 1.0],
            "ngram_range": [1, 2],
            "stop_words": ["the"],
            "norm": null
        }));
        let fv = v.transform("the machine learning engineer");
        assert_eq!(fv.get(0), 1.0);
        assert_eq!(fv.get(1), 1.0);
        assert_eq!(fv.get(2), 0.0);
    }

    #[test]
    fn test_sublinear_tf() {
        let v = vectorizer(json!({
            "vocabulary": {"data": 0},
            "idf": [1.0],
            "sublinear_tf": true,
            "norm": null
        }));
        let fv = v.transform("data data data");
        assert!((fv.get(0) - (1.0 + 3.0_f64.ln())).abs() < 1e-12);
    }

    #[test]
    fn test_empty_text_yields_empty_vector() {
        let v = vectorizer(json!({"vocabulary": {"rust": 0}, "idf": [1.0]}));
        assert!(v.transform("").is_empty());
    }

    #[test]
    fn test_validate_rejects_out_of_range_vocabulary() {
        let v: TfidfVectorizer =
            serde_json::from_value(json!({"vocabulary": {"rust": 4}, "idf": [1.0]})).unwrap();
        assert_eq!(
            v.validate(),
            Err(ModelError::VocabularyOutOfRange {
                term: "rust".to_string(),
                index: 4,
                len: 1
            })
        );
    }

    #[test]
    fn test_validate_rejects_bad_ngram_range() {
        let v: TfidfVectorizer = serde_json::from_value(
            json!({"vocabulary": {}, "idf": [], "ngram_range": [2, 1]}),
        )
        .unwrap();
        assert_eq!(
            v.validate(),
            Err(ModelError::InvalidNgramRange { min: 2, max: 1 })
        );
    }
}
