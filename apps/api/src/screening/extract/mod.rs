//! Heuristic field extractors.
//!
//! Every extractor is a pure `&str -> value` scan with no shared state. None of
//! them fail: when nothing matches they return a sentinel that is rendered to
//! the user as-is.

pub mod contact;
pub mod keywords;

pub use contact::{extract_email, extract_name, extract_phone};
pub use keywords::{extract_education, extract_skills};

/// Sentinel for scalar fields (phone, email, name).
pub const NOT_FOUND: &str = "Not Found";
pub const NO_SKILLS_FOUND: &str = "No skills found";
pub const NO_EDUCATION_FOUND: &str = "No education found";
