// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Observer hooks and traversal statistics.
#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::cell::RefCell;

use common::{record, seq};
use echo_deep_copy::{
    ConfigError, CopyConfig, CopyObserver, CopyStats, DeepCopier, Strategy, Token,
};
use echo_value::{Category, DateRef, Symbol, Value};

#[derive(Default)]
struct Recorder {
    unsupported: RefCell<Vec<&'static str>>,
    cloned: RefCell<Vec<(u64, Category)>>,
    finished: RefCell<Option<CopyStats>>,
}

impl CopyObserver for Recorder {
    fn unsupported(&self, value: &Value) {
        self.unsupported.borrow_mut().push(value.kind());
    }

    fn node_cloned(&self, token: Token, category: Category) {
        self.cloned.borrow_mut().push((token.get(), category));
    }

    fn finished(&self, stats: &CopyStats) {
        *self.finished.borrow_mut() = Some(*stats);
    }
}

#[test]
fn tokens_are_issued_in_visit_order() {
    let recorder = Recorder::default();
    let input = record(vec![
        ("list", seq(vec![record(vec![])])),
        ("when", Value::Date(DateRef::now())),
    ]);

    for config in [CopyConfig::default(), CopyConfig::iterative()] {
        recorder.cloned.borrow_mut().clear();
        DeepCopier::new(config)
            .unwrap()
            .with_observer(&recorder)
            .copy(&input)
            .unwrap();
        assert_eq!(
            *recorder.cloned.borrow(),
            [
                (1, Category::Record),
                (2, Category::Sequence),
                (3, Category::Record)
            ]
        );
    }
}

#[test]
fn unsupported_values_are_reported_before_the_error() {
    let recorder = Recorder::default();
    let input = seq(vec![Value::from(1), Value::Symbol(Symbol::new(Some("x")))]);

    let result = DeepCopier::default().with_observer(&recorder).copy(&input);

    assert!(result.is_err());
    assert_eq!(*recorder.unsupported.borrow(), ["symbol"]);
    assert!(recorder.finished.borrow().is_none());
}

#[test]
fn stats_describe_the_traversal() {
    let recorder = Recorder::default();
    let shared = record(vec![("d", Value::Date(DateRef::now()))]);
    let input = seq(vec![shared.clone(), shared.clone(), shared]);

    let (_, stats) = DeepCopier::default()
        .with_observer(&recorder)
        .copy_with_stats(&input)
        .unwrap();

    assert_eq!(
        stats,
        CopyStats {
            nodes: 2,
            shared_hits: 2,
            dates: 1,
        }
    );
    assert_eq!(*recorder.finished.borrow(), Some(stats));
}

#[test]
fn copier_reports_its_config() {
    let config = CopyConfig::iterative().with_max_depth(9);
    let copier = DeepCopier::new(config.clone()).unwrap();
    assert_eq!(copier.config(), &config);
}

#[test]
fn copier_rejects_zero_depth_config() {
    let zero = CopyConfig::default().with_max_depth(0);
    let err = DeepCopier::new(zero).err().unwrap();
    assert!(matches!(err, ConfigError::Invalid(_)));

    let literal = CopyConfig {
        strategy: Strategy::Iterative,
        max_depth: 0,
    };
    assert!(DeepCopier::new(literal).is_err());
}
