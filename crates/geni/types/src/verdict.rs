use serde::{Deserialize, Serialize};

/// Outcome of validating one candidate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "diagnostic")]
pub enum Verdict {
    Pass,
    Fail(String),
}

impl Verdict {
    pub fn fail(diagnostic: impl Into<String>) -> Self {
        Verdict::Fail(diagnostic.into())
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }

    /// The failure diagnostic, if any.
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            Verdict::Pass => None,
            Verdict::Fail(d) => Some(d),
        }
    }

    /// Rewrite a failure diagnostic; a pass is left untouched.
    pub fn map_diagnostic(self, f: impl FnOnce(String) -> String) -> Self {
        match self {
            Verdict::Pass => Verdict::Pass,
            Verdict::Fail(d) => Verdict::Fail(f(d)),
        }
    }
}

/// A stored attempt together with its freshly derived verdict.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedAttempt {
    pub index: u64,
    pub source: String,
    pub verdict: Verdict,
}

impl ValidatedAttempt {
    /// Feedback for the next prompt; `None` for passing attempts.
    pub fn feedback(&self) -> Option<FeedbackRecord> {
        self.verdict
            .diagnostic()
            .map(|d| FeedbackRecord::new(self.source.clone(), d))
    }
}

/// A failed attempt as shown to the model on retry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub source: String,
    pub diagnostic: String,
}

impl FeedbackRecord {
    pub fn new(source: impl Into<String>, diagnostic: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            diagnostic: diagnostic.into(),
        }
    }
}
