//! Driver workflows
//!
//! End-to-end runs through `quick_check`: success reports, shrunk
//! failure reports, panicking predicates, the event stream, and fatal
//! generator exhaustion.

use rosecheck::*;

pub fn test_passing_workflow_reports_success() {
    let property = for_all(Gen::<Vec<i64>>::vec_of(Gen::<i64>::integer()), |v| {
        let mut reversed: Vec<i64> = v.iter().rev().copied().collect();
        reversed.reverse();
        reversed == *v
    });
    let config = Config::default().with_seed(42).with_max_size(50);
    let report = quick_check(100, &property, &config).unwrap();
    assert_eq!(
        report,
        Report::Passed {
            num_tests: 100,
            seed: 42
        }
    );
    println!("✓ Passing workflow reports success");
}

pub fn test_failing_sum_property_shrinks_to_a_local_minimum() {
    let property = for_all(Gen::<Vec<i64>>::vec_of(Gen::<i64>::integer()), |v| {
        v.iter().sum::<i64>() < 100
    });
    let config = Config::default().with_seed(1).with_max_size(100);
    let report = quick_check(200, &property, &config).unwrap();
    match report {
        Report::Failed { fail, shrunk, .. } => {
            assert!(fail.iter().sum::<i64>() >= 100);
            let smallest = &shrunk.smallest;
            let total: i64 = smallest.iter().sum();
            assert!(total >= 100, "the minimum still fails");
            assert!(!smallest.is_empty());
            // Local minimality: dropping any single element would make
            // the property pass, otherwise the search would have
            // descended further.
            for i in 0..smallest.len() {
                assert!(
                    total - smallest[i] < 100,
                    "element {i} could have been removed"
                );
            }
        }
        other => panic!("expected a failure report, got {other:?}"),
    }
    println!("✓ Failing sum property shrinks to a local minimum");
}

pub fn test_panicking_property_shrinks_like_a_failure() {
    let property = for_all(Gen::<Vec<i64>>::vec_of(Gen::<i64>::integer()), |v| {
        if v.len() >= 3 {
            panic!("too many elements");
        }
        true
    });
    let config = Config::default().with_seed(7).with_max_size(60);
    let report = quick_check(100, &property, &config).unwrap();
    match report {
        Report::Failed { result, shrunk, .. } => {
            assert!(matches!(result, TrialOutcome::Panic(_)));
            assert_eq!(
                shrunk.smallest.len(),
                3,
                "removals stop at the shortest vector that still panics"
            );
            match shrunk.result {
                TrialOutcome::Panic(message) => assert!(message.contains("too many elements")),
                other => panic!("expected a panic at the minimum, got {other:?}"),
            }
        }
        other => panic!("expected a failure report, got {other:?}"),
    }
    println!("✓ Panicking property shrinks like a failure");
}

pub fn test_event_stream_schema() {
    let property = for_all(Gen::<i64>::natural(), |n| *n >= 0);
    let config = Config::default().with_seed(3);
    let mut so_far_values = Vec::new();
    let report = quick_check_with(40, &property, &config, |event| match event {
        Event::Trial { so_far, num_tests } => {
            assert_eq!(*num_tests, 40);
            so_far_values.push(*so_far);
        }
        other => panic!("passing run emitted {other:?}"),
    })
    .unwrap();
    assert!(report.passed());
    assert_eq!(so_far_values, (1..=40).collect::<Vec<usize>>());
    println!("✓ Event stream schema holds");
}

pub fn test_impossible_distinct_collection_is_fatal() {
    let gen = Gen::<std::collections::HashSet<i64>>::set_of(
        Gen::<i64>::choose(0, 1),
        CollectionOpts::exactly(5),
    );
    let property = for_all(gen, |_| true);
    let config = Config::default().with_seed(2);
    let outcome = quick_check(10, &property, &config);
    assert_eq!(
        outcome.unwrap_err(),
        Error::SuchThatExhausted { max_tries: 10 }
    );
    println!("✓ Impossible distinct collections are fatal");
}
