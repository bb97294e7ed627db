// Copyright (C) 2020-2026 Andy Kurnia.

use super::error;

// One word per line. Anything after the first whitespace is a comment.

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum InvalidCharPolicy {
    // skip words with a non-alphabetic character and report them.
    #[default]
    Reject,
    // ingest every word verbatim.
    Accept,
}

#[derive(Clone, Debug, Default)]
pub struct LexiconConfig {
    pub invalid_char_policy: InvalidCharPolicy,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RejectedLine {
    pub line: usize, // 1-based
    pub text: String,
    pub reason: String,
}

#[derive(Clone, Debug, Default)]
pub struct LexiconReport {
    pub rejected: Vec<RejectedLine>,
    pub duplicates: usize,
}

pub struct Lexicon {
    pub words: Vec<String>,
    pub report: LexiconReport,
}

pub fn read_words(giant_string: &str, config: &LexiconConfig) -> Lexicon {
    let mut words = Vec::new();
    let mut report = LexiconReport::default();
    for (line_idx, line) in giant_string.lines().enumerate() {
        let raw = line.split(char::is_whitespace).next().unwrap_or("");
        if raw.is_empty() {
            continue;
        }
        if config.invalid_char_policy == InvalidCharPolicy::Reject {
            if let Some(bad) = raw.chars().find(|c| !c.is_alphabetic()) {
                let rejected = RejectedLine {
                    line: line_idx + 1,
                    text: raw.to_string(),
                    reason: format!("non-alphabetic character {:?}", bad),
                };
                tracing::warn!(
                    line = rejected.line,
                    text = %rejected.text,
                    "skipping word: {}",
                    rejected.reason
                );
                report.rejected.push(rejected);
                continue;
            }
        }
        words.push(raw.chars().flat_map(char::to_uppercase).collect::<String>());
    }
    words.sort_unstable();
    let before_dedup = words.len();
    words.dedup();
    report.duplicates = before_dedup - words.len();
    tracing::debug!(
        words = words.len(),
        rejected = report.rejected.len(),
        duplicates = report.duplicates,
        "read lexicon"
    );
    Lexicon { words, report }
}

pub fn read_file(path: &str, config: &LexiconConfig) -> error::Returns<Lexicon> {
    let giant_string = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            return_error!(format!("cannot read {}: {}", path, e));
        }
    };
    Ok(read_words(&giant_string, config))
}
