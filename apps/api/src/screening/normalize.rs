use std::sync::OnceLock;

use regex::Regex;

struct CleanPatterns {
    url: Regex,
    retweet_cc: Regex,
    hashtag: Regex,
    mention: Regex,
    punctuation: Regex,
    non_ascii: Regex,
    whitespace: Regex,
}

fn clean_patterns() -> &'static CleanPatterns {
    static PATTERNS: OnceLock<CleanPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| CleanPatterns {
        url: Regex::new(r"http\S+\s*").expect("url pattern is valid"),
        retweet_cc: Regex::new(r"\b(?:RT|cc)\b").expect("rt/cc pattern is valid"),
        hashtag: Regex::new(r"#\S+\s*").expect("hashtag pattern is valid"),
        mention: Regex::new(r"@\S+").expect("mention pattern is valid"),
        punctuation: Regex::new(r"[[:punct:]]").expect("punctuation pattern is valid"),
        non_ascii: Regex::new(r"[^\x00-\x7F]").expect("non-ascii pattern is valid"),
        whitespace: Regex::new(r"\s+").expect("whitespace pattern is valid"),
    })
}

/// Aggressive cleaning for classifier input: drops URLs, `RT`/`cc` tokens,
/// hashtags, mentions, ASCII punctuation and non-ASCII characters, then
/// collapses whitespace.
pub fn clean_resume(text: &str) -> String {
    let p = clean_patterns();
    let text = p.url.replace_all(text, " ");
    let text = p.retweet_cc.replace_all(&text, " ");
    let text = p.hashtag.replace_all(&text, " ");
    let text = p.mention.replace_all(&text, " ");
    let text = p.punctuation.replace_all(&text, " ");
    let text = p.non_ascii.replace_all(&text, " ");
    let text = p.whitespace.replace_all(&text, " ");
    text.trim().to_string()
}

/// Light normalization for keyword scans: line breaks become spaces and
/// whitespace runs collapse to one space.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
