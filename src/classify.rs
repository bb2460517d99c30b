use std::collections::HashSet;

use crate::model::{ClassifiedRecord, Record};

/// Status assigned when a record carries none. Never empty, so consumers can
/// key maps without special cases.
pub const UNKNOWN_STATUS: &str = "Unknown";

/// Categorical vocabulary for one tracker domain.
///
/// Passed into `Classifier`/`Aggregator` constructors rather than living in
/// process-wide constants: different trackers can run side by side with their
/// own urgency and outcome vocabularies.
#[derive(Debug, Clone)]
pub struct Vocabulary {
  /// Priority names that count as urgent (case-insensitive).
  pub urgent_priorities: Vec<String>,
  /// Outcome labels enumerated for test artifacts; always emitted, zero-filled.
  pub outcome_labels: Vec<String>,
  /// Type names treated as test artifacts rather than defects (case-insensitive).
  pub test_artifact_types: Vec<String>,
}

impl Default for Vocabulary {
  fn default() -> Self {
    Vocabulary {
      urgent_priorities: ["highest", "urgent", "p1", "high", "blocker"]
        .map(String::from)
        .to_vec(),
      outcome_labels: ["Accepted", "Rejected", "Generated"].map(String::from).to_vec(),
      test_artifact_types: vec!["test case".to_string()],
    }
  }
}

/// Maps raw records to categorical summaries. Pure; never fails — missing
/// fields are sparse data, not errors.
pub struct Classifier {
  urgent: HashSet<String>,
  test_types: HashSet<String>,
}

impl Classifier {
  pub fn new(vocabulary: &Vocabulary) -> Self {
    Classifier {
      urgent: vocabulary.urgent_priorities.iter().map(|s| s.to_lowercase()).collect(),
      test_types: vocabulary
        .test_artifact_types
        .iter()
        .map(|s| s.to_lowercase())
        .collect(),
    }
  }

  pub fn classify(&self, record: Record) -> ClassifiedRecord {
    let status_name = record
      .status_name
      .as_deref()
      .filter(|s| !s.trim().is_empty())
      .unwrap_or(UNKNOWN_STATUS)
      .to_string();

    let is_test_artifact = record
      .type_name
      .as_deref()
      .map(|t| self.test_types.contains(&t.to_lowercase()))
      .unwrap_or(false);

    let is_urgent = record
      .priority_name
      .as_deref()
      .map(|p| self.urgent.contains(&p.to_lowercase()))
      .unwrap_or(false);

    ClassifiedRecord {
      record,
      is_test_artifact,
      is_urgent,
      status_name,
    }
  }
}
