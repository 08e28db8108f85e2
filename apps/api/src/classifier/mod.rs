//! Loads the pre-trained vectorizer/classifier pairs and exposes them
//! behind the `Vectorizer` and `Classifier` traits.
//!
//! Artifacts are JSON exports of the trained models. They are validated once at
//! startup so that prediction itself can never fail: a loaded pair always yields
//! a label.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::info;

pub mod estimator;
pub mod tfidf;

pub use estimator::ClassifierArtifact;
pub use tfidf::TfidfVectorizer;

use crate::screening::normalize::clean_resume;

#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("vocabulary term '{term}' maps to index {index}, but idf has {len} entries")]
    VocabularyOutOfRange {
        term: String,
        index: usize,
        len: usize,
    },

    #[error("invalid ngram_range ({min}, {max})")]
    InvalidNgramRange { min: usize, max: usize },

    #[error("classifier has no classes")]
    NoClasses,

    #[error("tree {tree}: {reason}")]
    MalformedTree { tree: usize, reason: String },

    #[error("linear model: {0}")]
    MalformedLinear(String),

    #[error("classifier reads feature {feature}, but the vectorizer only produces {dim}")]
    FeatureMismatch { feature: usize, dim: usize },
}

// ────────────────────────────────────────────────────────────────────────────
// Feature vectors
// ────────────────────────────────────────────────────────────────────────────

/// Sparse feature vector produced by a `Vectorizer`.
/// Entries are sorted by index; indices not present are zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureVector {
    dim: usize,
    entries: Vec<(usize, f64)>,
}

impl FeatureVector {
    /// Builds a vector from unordered entries. Duplicate indices are summed.
    pub fn from_entries(dim: usize, mut entries: Vec<(usize, f64)>) -> Self {
        entries.sort_by_key(|(idx, _)| *idx);
        let mut merged: Vec<(usize, f64)> = Vec::with_capacity(entries.len());
        for (idx, weight) in entries {
            match merged.last_mut() {
                Some((last, acc)) if *last == idx => *acc += weight,
                _ => merged.push((idx, weight)),
            }
        }
        Self {
            dim,
            entries: merged,
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn get(&self, index: usize) -> f64 {
        self.entries
            .binary_search_by_key(&index, |(idx, _)| *idx)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Traits
// ────────────────────────────────────────────────────────────────────────────

/// Turns cleaned resume text into a feature vector.
pub trait Vectorizer: Send + Sync {
    fn transform(&self, text: &str) -> FeatureVector;
}

/// Maps a feature vector to exactly one label.
pub trait Classifier: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> String;
}

impl Vectorizer for TfidfVectorizer {
    fn transform(&self, text: &str) -> FeatureVector {
        TfidfVectorizer::transform(self, text)
    }
}

impl Classifier for ClassifierArtifact {
    fn predict(&self, features: &FeatureVector) -> String {
        ClassifierArtifact::predict(self, features).to_string()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Model pairs
// ────────────────────────────────────────────────────────────────────────────

/// The two prediction tasks served by the analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Categorization,
    JobRecommendation,
}

impl Task {
    pub fn artifact_stem(self) -> &'static str {
        match self {
            Task::Categorization => "categorization",
            Task::JobRecommendation => "job_recommendation",
        }
    }

    pub fn vectorizer_file(self) -> String {
        format!("tfidf_vectorizer_{}.json", self.artifact_stem())
    }

    pub fn classifier_file(self) -> String {
        format!("rf_classifier_{}.json", self.artifact_stem())
    }
}

/// A vectorizer and the classifier trained on its output.
pub struct ModelPair {
    vectorizer: Box<dyn Vectorizer>,
    classifier: Box<dyn Classifier>,
}

impl ModelPair {
    pub fn new(vectorizer: Box<dyn Vectorizer>, classifier: Box<dyn Classifier>) -> Self {
        Self {
            vectorizer,
            classifier,
        }
    }

    /// Loads the JSON artifacts for `task` from `dir` and checks that the
    /// classifier only reads features the vectorizer produces.
    pub fn load(dir: &Path, task: Task) -> Result<Self> {
        let vectorizer: TfidfVectorizer = read_artifact(&dir.join(task.vectorizer_file()))?;
        vectorizer
            .validate()
            .with_context(|| format!("Invalid vectorizer for {}", task.artifact_stem()))?;

        let classifier: ClassifierArtifact = read_artifact(&dir.join(task.classifier_file()))?;
        classifier
            .validate(vectorizer.n_features())
            .with_context(|| format!("Invalid classifier for {}", task.artifact_stem()))?;

        info!(
            task = task.artifact_stem(),
            features = vectorizer.n_features(),
            classes = classifier.classes().len(),
            "Model pair loaded"
        );

        Ok(Self::new(Box::new(vectorizer), Box::new(classifier)))
    }

    /// Cleans the raw resume text, vectorizes it and returns the predicted label.
    pub fn predict(&self, resume_text: &str) -> String {
        let cleaned = clean_resume(resume_text);
        let features = self.vectorizer.transform(&cleaned);
        self.classifier.predict(&features)
    }
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read model artifact {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse model artifact {}", path.display()))
}
