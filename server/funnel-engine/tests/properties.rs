//! Property tests for stage classification and the funnel diff.

use std::collections::HashSet;

use funnel_engine::stage::FUNNEL;
use funnel_engine::{classify, diff_by_key, AggregatorRecord};
use proptest::prelude::*;

fn message() -> impl Strategy<Value = String> {
  prop_oneof![
    Just("Consumed".to_string()),
    Just("Read".to_string()),
    Just("Organization whitelisted".to_string()),
    Just("Marshalled".to_string()),
    Just("Time ok".to_string()),
    Just("Stored".to_string()),
    "[A-Za-z ]{0,12}",
  ]
}

fn maybe_empty() -> impl Strategy<Value = String> {
  prop_oneof![Just(String::new()), "[a-z0-9.-]{1,8}"]
}

prop_compose! {
  fn record()(
    message in message(),
    topic in maybe_empty(),
    group in maybe_empty(),
    cluster in maybe_empty(),
    organization in prop_oneof![Just(0i64), 1i64..100],
    offset in 0i64..20,
  ) -> AggregatorRecord {
    AggregatorRecord { message, topic, group, cluster, organization, offset, ..Default::default() }
  }
}

fn keys(records: &[AggregatorRecord]) -> HashSet<i64> {
  records.iter().map(|r| r.offset).collect()
}

proptest! {
  #[test]
  fn record_matches_at_most_one_stage(r in record()) {
    let matching = FUNNEL.iter().filter(|rule| rule.matches(&r)).count();
    prop_assert!(matching <= 1);
    prop_assert_eq!(matching == 1, classify(&r).is_some());
  }

  #[test]
  fn diff_is_subset_without_keys_of_b(
    a in prop::collection::vec(record(), 0..30),
    b in prop::collection::vec(record(), 0..30),
  ) {
    let result = diff_by_key(&a, &b);
    let b_keys = keys(&b);
    prop_assert!(result.iter().all(|r| a.contains(r)));
    prop_assert!(result.iter().all(|r| !b_keys.contains(&r.offset)));

    let shared = a.iter().filter(|r| b_keys.contains(&r.offset)).count();
    prop_assert_eq!(result.len(), a.len() - shared);
  }

  #[test]
  fn diff_identities(a in prop::collection::vec(record(), 0..30)) {
    let empty: Vec<AggregatorRecord> = Vec::new();
    prop_assert!(diff_by_key(&a, &a).is_empty());
    prop_assert_eq!(diff_by_key(&a, &empty), a.clone());
    prop_assert!(diff_by_key(&empty, &a).is_empty());
  }

  #[test]
  fn diff_ignores_order_of_b(
    a in prop::collection::vec(record(), 0..20),
    b in prop::collection::vec(record(), 0..20),
  ) {
    let mut reversed = b.clone();
    reversed.reverse();
    prop_assert_eq!(diff_by_key(&a, &b), diff_by_key(&a, &reversed));
  }
}
