use std::collections::{BTreeMap, HashMap};

use crate::classify::Vocabulary;
use crate::model::{BucketCounters, ClassifiedRecord};

/// Folds classified records into `BucketCounters`.
///
/// The fold is a commutative sum per key, so results are identical for any
/// input ordering; sources do not guarantee stable ordering across pages.
pub struct Aggregator {
  outcome_labels: Vec<String>,
  // lowercased status -> configured label casing
  outcome_lookup: HashMap<String, String>,
}

impl Aggregator {
  pub fn new(vocabulary: &Vocabulary) -> Self {
    let outcome_lookup = vocabulary
      .outcome_labels
      .iter()
      .map(|label| (label.to_lowercase(), label.clone()))
      .collect();

    Aggregator {
      outcome_labels: vocabulary.outcome_labels.clone(),
      outcome_lookup,
    }
  }

  /// Counters with every configured outcome label present at zero. Consumers
  /// never have to special-case a missing key.
  pub fn empty_counters(&self) -> BucketCounters {
    let outcome_counts: BTreeMap<String, u64> =
      self.outcome_labels.iter().map(|l| (l.clone(), 0)).collect();

    BucketCounters {
      status_counts: BTreeMap::new(),
      urgent_count: 0,
      outcome_counts,
    }
  }

  pub fn aggregate<I>(&self, records: I) -> BucketCounters
  where
    I: IntoIterator<Item = ClassifiedRecord>,
  {
    let mut counters = self.empty_counters();

    for classified in records {
      *counters
        .status_counts
        .entry(classified.status_name.clone())
        .or_insert(0) += 1;

      if classified.is_test_artifact {
        // Statuses outside the configured labels still land in the general
        // map above; only the outcome sub-counter ignores them.
        if let Some(label) = self.outcome_lookup.get(&classified.status_name.to_lowercase()) {
          *counters.outcome_counts.entry(label.clone()).or_insert(0) += 1;
        }
      } else if classified.is_urgent {
        counters.urgent_count += 1;
      }
    }

    counters
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::classify::Classifier;
  use crate::model::Record;
  use proptest::prelude::*;

  fn record(id: &str, type_name: &str, priority: Option<&str>, status: &str) -> Record {
    Record {
      id: id.into(),
      status_name: Some(status.into()),
      priority_name: priority.map(String::from),
      type_name: Some(type_name.into()),
      created: None,
      resolved: None,
    }
  }

  fn classify_all(records: Vec<Record>) -> Vec<ClassifiedRecord> {
    let classifier = Classifier::new(&Vocabulary::default());
    records.into_iter().map(|r| classifier.classify(r)).collect()
  }

  #[test]
  fn counts_statuses_urgents_and_outcomes() {
    let records = classify_all(vec![
      record("D-1", "Defect", Some("Blocker"), "Open"),
      record("D-2", "Defect", Some("Low"), "Open"),
      record("D-3", "Defect", Some("Highest"), "Done"),
      record("T-1", "Test Case", Some("Blocker"), "Accepted"),
      record("T-2", "Test Case", None, "Rejected"),
      record("T-3", "Test Case", None, "Drafted"),
    ]);

    let counters = Aggregator::new(&Vocabulary::default()).aggregate(records);

    assert_eq!(counters.status_counts.get("Open"), Some(&2));
    assert_eq!(counters.status_counts.get("Done"), Some(&1));
    // Unmatched test-artifact status still counted in the general map
    assert_eq!(counters.status_counts.get("Drafted"), Some(&1));

    // T-1 is urgent by priority but excluded as a test artifact
    assert_eq!(counters.urgent_count, 2);

    assert_eq!(counters.outcome_counts.get("Accepted"), Some(&1));
    assert_eq!(counters.outcome_counts.get("Rejected"), Some(&1));
    assert_eq!(counters.outcome_counts.get("Generated"), Some(&0));
  }

  #[test]
  fn outcome_labels_are_zero_filled_on_empty_input() {
    let counters = Aggregator::new(&Vocabulary::default()).aggregate(Vec::new());
    assert_eq!(counters.outcome_counts.len(), 3);
    assert!(counters.outcome_counts.values().all(|&n| n == 0));
    assert_eq!(counters.total_records(), 0);
  }

  #[test]
  fn urgent_never_exceeds_non_test_artifacts() {
    let records = classify_all(vec![
      record("D-1", "Defect", Some("Blocker"), "Open"),
      record("T-1", "Test Case", Some("Blocker"), "Accepted"),
      record("T-2", "Test Case", Some("Highest"), "Accepted"),
    ]);
    let non_test = records.iter().filter(|r| !r.is_test_artifact).count() as u64;

    let counters = Aggregator::new(&Vocabulary::default()).aggregate(records);
    assert!(counters.urgent_count <= non_test);
    assert_eq!(counters.urgent_count, 1);
  }

  #[test]
  fn outcome_matching_uses_configured_casing() {
    let records = classify_all(vec![record("T-1", "Test Case", None, "ACCEPTED")]);
    let counters = Aggregator::new(&Vocabulary::default()).aggregate(records);
    assert_eq!(counters.outcome_counts.get("Accepted"), Some(&1));
  }

  fn arbitrary_record() -> impl Strategy<Value = Record> {
    (
      "[A-Z]{1,3}-[0-9]{1,4}",
      prop::sample::select(vec!["Defect", "Task", "Test Case"]),
      prop::option::of(prop::sample::select(vec!["Blocker", "High", "Medium", "Low"])),
      prop::sample::select(vec!["Open", "Done", "Accepted", "Rejected", "Generated"]),
    )
      .prop_map(|(id, type_name, priority, status)| record(&id, type_name, priority, status))
  }

  proptest! {
    #[test]
    fn aggregation_is_order_independent(records in prop::collection::vec(arbitrary_record(), 0..40)) {
      let aggregator = Aggregator::new(&Vocabulary::default());

      let forward = aggregator.aggregate(classify_all(records.clone()));

      let mut reversed = records;
      reversed.reverse();
      let backward = aggregator.aggregate(classify_all(reversed));

      prop_assert_eq!(forward, backward);
    }
  }
}
