// Resume screening: text acquisition, normalization, heuristic extraction,
// classification and the HTTP surface around them.
// Acquisition and analysis are CPU-bound and run inside tokio::task::spawn_blocking.

pub mod acquisition;
pub mod analyzer;
pub mod extract;
pub mod handlers;
pub mod normalize;
pub mod views;

pub use analyzer::ResumeAnalyzer;
