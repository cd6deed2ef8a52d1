//! Integration tests for tree training.

use rstest::rstest;

use entrotree::data::{Record, Value};
use entrotree::feature::FeatureRegistry;
use entrotree::persist::export_tree;
use entrotree::repr::TreeNode;
use entrotree::testing::data::synthetic_comments;
use entrotree::testing::{labeled, record};
use entrotree::training::{record_entropy, train, TrainError, TreeBuilder, TreeParams, Verbosity};
use entrotree::{FeatureKind, OutcomeKey, SplitArg};

fn params(features: &[&str]) -> TreeParams {
    TreeParams::builder()
        .features(features.iter().map(|s| s.to_string()).collect())
        .min_records(0)
        .build()
        .unwrap()
}

fn only_branch(tree: &TreeNode) -> &entrotree::repr::Branch {
    match tree {
        TreeNode::Branch(b) => b,
        TreeNode::Leaf { label } => panic!("expected a branch, got leaf {label:?}"),
    }
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn threshold_split_into_singletons() {
    let records = vec![
        record(&[("line", Value::Int(10)), ("prevLine", Value::Int(10))], "a"),
        record(&[("line", Value::Int(10)), ("prevLine", Value::Int(5))], "b"),
    ];
    let tree = train(&records, &params(&["deltaLine"]), &FeatureRegistry::standard()).unwrap();

    let branch = only_branch(&tree);
    let SplitArg::Threshold(t) = branch.arg() else {
        panic!("expected threshold, got {}", branch.arg());
    };
    assert!(*t > 0.0 && *t < 5.0, "threshold {t}");
    assert_eq!(branch.children().len(), 2);
    assert!(branch.children().iter().all(|(_, c)| c.is_leaf()));
    assert_eq!(tree.classify(&records[0]).unwrap(), "a");
    assert_eq!(tree.classify(&records[1]).unwrap(), "b");
}

#[test]
fn membership_picks_discriminating_token() {
    let records = vec![
        record(&[("parentTypes", "Block,IfStatement".into())], "a"),
        record(&[("parentTypes", "Block,ForStatement".into())], "b"),
    ];
    let tree = train(&records, &params(&["parentTypesA"]), &FeatureRegistry::standard()).unwrap();

    let branch = only_branch(&tree);
    assert_eq!(branch.feature().kind(), FeatureKind::Membership);
    match branch.arg() {
        SplitArg::Token(t) => assert_ne!(t, "Block"),
        other => panic!("expected token, got {other}"),
    }
    assert_eq!(tree.classify(&records[0]).unwrap(), "a");
    assert_eq!(tree.classify(&records[1]).unwrap(), "b");
}

#[test]
fn constant_quantitative_values_give_a_leaf() {
    let records = vec![
        record(&[("line", Value::Int(3))], "a"),
        record(&[("line", Value::Int(3))], "b"),
        record(&[("line", Value::Int(3))], "a"),
    ];
    let tree = train(&records, &params(&["deltaLine"]), &FeatureRegistry::standard()).unwrap();
    assert_eq!(tree, TreeNode::leaf("a"));
}

#[test]
fn unseen_category_is_unknown_outcome() {
    let records = vec![
        record(&[("type", "Line".into())], "a"),
        record(&[("type", "Block".into())], "b"),
    ];
    let tree = train(&records, &params(&["type"]), &FeatureRegistry::standard()).unwrap();

    let unseen = Record::builder().field("type", "Javadoc").build();
    let err = tree.classify(&unseen).unwrap_err();
    let entrotree::ClassifyError::UnknownOutcome { feature, key } = err;
    assert_eq!(feature, "type");
    assert_eq!(key, OutcomeKey::Category(Some("Javadoc".into())));
}

#[test]
fn high_min_entropy_gives_majority_leaf() {
    // 19 "a" + 1 "b": entropy ≈ 0.286 bits
    let mut records: Vec<_> = (0..19)
        .map(|i| record(&[("line", Value::Int(i))], "a"))
        .collect();
    records.push(record(&[("line", Value::Int(100))], "b"));
    assert!(record_entropy(&labeled(&records)) < 0.5);

    let params = TreeParams::builder()
        .features(vec!["deltaLine".into()])
        .min_records(0)
        .min_entropy(0.5)
        .build()
        .unwrap();
    let tree = train(&records, &params, &FeatureRegistry::standard()).unwrap();
    assert_eq!(tree, TreeNode::leaf("a"));
}

// =============================================================================
// Preconditions
// =============================================================================

#[test]
fn empty_training_set() {
    let err = train(&[], &TreeParams::default(), &FeatureRegistry::standard()).unwrap_err();
    assert!(matches!(err, TrainError::EmptyTrainingSet));
}

#[test]
fn unlabeled_training_record() {
    let records = vec![
        record(&[("type", "Line".into())], "a"),
        Record::builder().field("type", "Block").build(),
    ];
    let err = train(&records, &TreeParams::default(), &FeatureRegistry::standard()).unwrap_err();
    assert!(matches!(err, TrainError::MissingLabel { index: 1 }), "got {err}");
}

#[test]
fn unknown_feature_name() {
    let records = vec![record(&[], "a")];
    let err = train(&records, &params(&["type", "nope"]), &FeatureRegistry::standard()).unwrap_err();
    assert!(matches!(err, TrainError::UnknownFeature(_)), "got {err}");
}

#[test]
fn invalid_params_bypassing_builder() {
    let params = TreeParams {
        min_entropy: -1.0,
        ..TreeParams::default()
    };
    let err = train(&[record(&[], "a")], &params, &FeatureRegistry::standard()).unwrap_err();
    assert!(matches!(err, TrainError::Config(_)), "got {err}");
}

// =============================================================================
// Properties
// =============================================================================

/// Every branch holds strictly fewer records in each child than it received.
fn assert_monotonic(tree: &TreeNode, records: &[Record]) {
    if let TreeNode::Branch(b) = tree {
        for (key, child) in b.children() {
            let routed: Vec<Record> = records
                .iter()
                .filter(|r| &b.feature().ident(b.arg(), r) == key)
                .cloned()
                .collect();
            assert!(!routed.is_empty(), "empty child for {key}");
            assert!(routed.len() < records.len(), "child {key} did not shrink");
            assert_monotonic(child, &routed);
        }
    }
}

#[rstest]
#[case(1, 0.0)]
#[case(7, 0.1)]
#[case(13, 0.3)]
fn children_shrink(#[case] seed: u64, #[case] noise: f64) {
    let records = synthetic_comments(300, seed, noise);
    let params = TreeParams::builder().min_records(2).build().unwrap();
    let tree = train(&records, &params, &FeatureRegistry::standard()).unwrap();
    assert_monotonic(&tree, &records);
}

#[rstest]
#[case(1)]
#[case(0)]
#[case(4)]
fn thread_count_does_not_change_the_tree(#[case] n_threads: usize) {
    let records = synthetic_comments(400, 21, 0.15);
    let registry = FeatureRegistry::standard();

    let sequential = train(&records, &TreeParams::default(), &registry).unwrap();
    let params = TreeParams::builder().n_threads(n_threads).build().unwrap();
    let tree = train(&records, &params, &registry).unwrap();

    assert_eq!(export_tree(&tree), export_tree(&sequential));
}

#[test]
fn training_is_deterministic() {
    let records = synthetic_comments(250, 3, 0.2);
    let registry = FeatureRegistry::standard();
    let a = train(&records, &TreeParams::default(), &registry).unwrap();
    let b = train(&records, &TreeParams::default(), &registry).unwrap();
    assert_eq!(export_tree(&a), export_tree(&b));
}

#[test]
fn noiseless_rules_are_learned() {
    let records = synthetic_comments(500, 11, 0.0);
    let tree = train(&records, &TreeParams::default(), &FeatureRegistry::standard()).unwrap();
    let features = tree.used_features();
    assert!(features.contains(&"type"), "used {features:?}");
    assert!(features.contains(&"deltaLine"), "used {features:?}");

    let acc = entrotree::Classifier::new(&tree).accuracy(&records);
    assert!(acc.ratio() > 0.95, "accuracy {acc}");
    assert_eq!(acc.unknown, 0);
}

#[test]
fn verbose_training_matches_silent() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let records = synthetic_comments(120, 8, 0.1);
    let registry = FeatureRegistry::standard();
    let silent = train(&records, &TreeParams::default(), &registry).unwrap();
    let params = TreeParams::builder()
        .verbosity(Verbosity::Debug)
        .build()
        .unwrap();
    let verbose = train(&records, &params, &registry).unwrap();
    assert_eq!(silent, verbose);
}

#[test]
fn builder_is_reusable() {
    let registry = FeatureRegistry::standard();
    let mut builder = TreeBuilder::new(&TreeParams::default(), &registry).unwrap();
    assert_eq!(builder.features().len(), registry.len());

    let records = synthetic_comments(100, 2, 0.0);
    let a = builder.build(&labeled(&records)).unwrap();
    let b = builder.build(&labeled(&records)).unwrap();
    assert_eq!(a, b);
}
