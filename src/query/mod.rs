//! Free-text question routing over a closed vocabulary.
//!
//! One intent keyword ("summarize"), token-exact subject lookup against the
//! table's distinct countries and indicators. Known limitation, by design:
//! multi-word entity names never match a single token, so fuzzy or
//! multi-token matching is deliberately out of scope.

use serde::Serialize;

use crate::common::types::{IndicatorTable, Scale};
use crate::extract;
use crate::trend;

/// Fixed answer when the table has no rows.
pub const EMPTY_DATASET_ANSWER: &str = "Dataset is empty. Cannot answer the question.";

/// Fixed answer when the question carries no recognized intent.
pub const UNRECOGNIZED_INTENT_ANSWER: &str =
    "I can only summarize data. Please ask to summarize a specific country and indicator.";

/// Fixed answer when no country or indicator token is found.
pub const UNRESOLVED_SUBJECT_ANSWER: &str =
    "Cannot detect country or indicator from your question.";

/// Route a free-text question to the trend summarizer.
///
/// Dispatch: country and indicator both matched -> single-series summary;
/// country only -> one summary per indicator of that country, newline
/// joined in table encounter order; neither -> the unresolved-subject
/// answer. Always returns plain text, never an error.
pub fn route(question: &str, table: &IndicatorTable, scale: &Scale) -> String {
    if table.is_empty() {
        return EMPTY_DATASET_ANSWER.to_string();
    }

    let lowered = question.to_lowercase();
    if !lowered.contains("summarize") {
        return UNRECOGNIZED_INTENT_ANSWER.to_string();
    }

    let cleaned = lowered.replace('?', "");
    let tokens: Vec<&str> = cleaned.split_whitespace().collect();

    let country = extract::countries(table)
        .into_iter()
        .find(|c| tokens.contains(&c.to_lowercase().as_str()));
    let indicator = extract::indicators(table)
        .into_iter()
        .find(|i| tokens.contains(&i.to_lowercase().as_str()));

    match (country, indicator) {
        (Some(country), Some(indicator)) => {
            trend::summary_text(table, &country, &indicator, scale)
        }
        (Some(country), None) => {
            let summaries: Vec<String> = extract::indicators_for(table, &country)
                .iter()
                .map(|indicator| trend::summary_text(table, &country, indicator, scale))
                .collect();
            summaries.join("\n")
        }
        _ => UNRESOLVED_SUBJECT_ANSWER.to_string(),
    }
}

/// One question/answer exchange.
#[derive(Debug, Clone, Serialize)]
pub struct QaEntry {
    pub question: String,
    pub answer: String,
}

/// Append-only, session-scoped record of questions and answers. Nothing is
/// persisted beyond the session.
#[derive(Debug, Default, Serialize)]
pub struct SessionLog {
    entries: Vec<QaEntry>,
}

impl SessionLog {
    pub fn new() -> Self {
        SessionLog::default()
    }

    /// Route the question and record the exchange; returns the answer.
    pub fn ask(&mut self, question: &str, table: &IndicatorTable, scale: &Scale) -> &str {
        let answer = route(question, table, scale);
        self.entries.push(QaEntry {
            question: question.to_string(),
            answer,
        });
        &self.entries[self.entries.len() - 1].answer
    }

    pub fn entries(&self) -> &[QaEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
