use serde::{Deserialize, Serialize};

/// Everything the screener reports for one uploaded resume.
/// Heuristic fields carry their sentinel when nothing was found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub category: String,
    pub job: String,
    pub phone: String,
    pub email: String,
    pub name: String,
    pub skills: Vec<String>,
    pub education: Vec<String>,
}
