//! The resume analyzer service: owns both model pairs for the life of the
//! process and runs the classify + extract pass over one resume's text.

use std::path::Path;

use anyhow::Result;

use crate::classifier::{ModelPair, Task};
use crate::models::extraction::ExtractionResult;
use crate::screening::extract::{
    extract_education, extract_email, extract_name, extract_phone, extract_skills,
};

/// Immutable after construction; shared across requests behind an `Arc`.
pub struct ResumeAnalyzer {
    category: ModelPair,
    job: ModelPair,
}

impl ResumeAnalyzer {
    pub fn new(category: ModelPair, job: ModelPair) -> Self {
        Self { category, job }
    }

    /// Loads the categorization and job-recommendation artifacts from `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        Ok(Self::new(
            ModelPair::load(dir, Task::Categorization)?,
            ModelPair::load(dir, Task::JobRecommendation)?,
        ))
    }

    pub fn predict_category(&self, resume_text: &str) -> String {
        self.category.predict(resume_text)
    }

    pub fn recommend_job(&self, resume_text: &str) -> String {
        self.job.predict(resume_text)
    }

    /// CPU-bound; run on the blocking pool from async contexts.
    pub fn analyze(&self, resume_text: &str) -> ExtractionResult {
        ExtractionResult {
            category: self.predict_category(resume_text),
            job: self.recommend_job(resume_text),
            phone: extract_phone(resume_text),
            email: extract_email(resume_text),
            name: extract_name(resume_text),
            skills: extract_skills(resume_text),
            education: extract_education(resume_text),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::ResumeAnalyzer;
    use crate::classifier::{Classifier, FeatureVector, ModelPair, Vectorizer};

    pub struct EmptyVectorizer;

    impl Vectorizer for EmptyVectorizer {
        fn transform(&self, _text: &str) -> FeatureVector {
            FeatureVector::default()
        }
    }

    /// Always predicts the same label and counts how often it was asked.
    pub struct FixedLabel {
        pub label: &'static str,
        pub calls: Arc<AtomicUsize>,
    }

    impl Classifier for FixedLabel {
        fn predict(&self, _features: &FeatureVector) -> String {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.label.to_string()
        }
    }

    /// Analyzer with constant predictions plus a counter of classifier calls.
    pub fn mock_analyzer(
        category: &'static str,
        job: &'static str,
    ) -> (ResumeAnalyzer, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let pair = |label| {
            ModelPair::new(
                Box::new(EmptyVectorizer),
                Box::new(FixedLabel {
                    label,
                    calls: calls.clone(),
                }),
            )
        };
        let analyzer = ResumeAnalyzer::new(pair(category), pair(job));
        (analyzer, calls)
    }
}
