//! Operation-log replay, closure and serializer round trips.

use proptest::prelude::*;
use spanlab::prelude::*;
use spanlab::{close_labels, save_types_as_ops, save_types_as_ops_to_file};
use spanlab_core::{Span, TextBase};
use std::collections::BTreeMap;
use std::sync::Arc;

fn base(docs: &[(&str, &str)]) -> Arc<TextBase> {
    let mut base = TextBase::new();
    for (id, text) in docs {
        base.add_document(id, *text).unwrap();
    }
    Arc::new(base)
}

fn type_map(labels: &TextLabels) -> BTreeMap<String, Vec<Span>> {
    labels
        .types()
        .map(|t| (t.to_string(), labels.instances(t).cloned().collect()))
        .collect()
}

fn closure_map(labels: &TextLabels) -> BTreeMap<String, Vec<Span>> {
    labels
        .types()
        .map(|t| (t.to_string(), labels.closures(t).cloned().collect()))
        .collect()
}

fn replay(base: &Arc<TextBase>, log: &str) -> Result<TextLabels> {
    let mut labels = TextLabels::new(Arc::clone(base));
    TextLabelsLoader::new().import_ops_str(&mut labels, log, "test.ops")?;
    Ok(labels)
}

// =============================================================================
// Replay scenarios
// =============================================================================

mod scenarios {
    use super::*;

    #[test]
    fn prefix_span() {
        let base = base(&[("d1", "0123456789")]);
        let labels = replay(&base, "addToType d1 0 5 T\n").unwrap();
        assert_eq!(labels.types().collect::<Vec<_>>(), vec!["T"]);
        assert_eq!(
            labels.instances("T").cloned().collect::<Vec<_>>(),
            vec![Span::new("d1", 0, 5)]
        );
    }

    #[test]
    fn whole_document_shortcut() {
        let base = base(&[("d1", "0123456789")]);
        let labels = replay(&base, "addToType d1 0 -1 T\n").unwrap();
        assert_eq!(
            labels.instances("T").cloned().collect::<Vec<_>>(),
            vec![Span::new("d1", 0, 10)]
        );
    }

    #[test]
    fn to_end_of_document() {
        let base = base(&[("d1", "0123456789")]);
        let labels = replay(&base, "addToType d1 4 -1 T\n").unwrap();
        assert!(labels.has_instance(&Span::new("d1", 4, 10), "T"));
    }

    #[test]
    fn unknown_documents_are_skipped() {
        let base = base(&[("d1", "0123456789")]);
        let mut labels = TextLabels::new(Arc::clone(&base));
        let log: String = (0..25)
            .map(|i| format!("addToType ghost{} 0 1 T\n", i))
            .chain(std::iter::once("addToType d1 0 1 T\n".to_string()))
            .collect();
        let stats = TextLabelsLoader::new()
            .with_max_warnings(3)
            .import_ops_str(&mut labels, &log, "ghosts.ops")
            .unwrap();
        assert_eq!(stats.operations, 26);
        assert_eq!(stats.skipped, 25);
        assert_eq!(stats.warnings, 25);
        assert_eq!(labels.instance_count(), 1);
    }

    #[test]
    fn warning_budget_resets_per_import() {
        let base = base(&[("d1", "0123456789")]);
        let loader = TextLabelsLoader::new().with_max_warnings(2);

        let mut first = TextLabels::new(Arc::clone(&base));
        let stats = loader
            .import_ops_str(
                &mut first,
                "addToType ghost1 0 1 T\naddToType ghost2 0 1 T\naddToType ghost3 0 1 T\n",
                "a.ops",
            )
            .unwrap();
        assert_eq!(stats.skipped, 3);
        assert_eq!(stats.warnings, 3);

        let mut second = TextLabels::new(Arc::clone(&base));
        let stats = loader
            .import_ops_str(&mut second, "addToType ghost4 0 1 T\n", "b.ops")
            .unwrap();
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.warnings, 1);
    }

    #[test]
    fn out_of_range_span_fails_with_line() {
        let base = base(&[("d1", "0123456789")]);
        let err = replay(&base, "# header\naddToType d1 8 5 T\n").unwrap_err();
        assert!(matches!(err, Error::Op { line: 2, .. }), "{:?}", err);
    }

    #[test]
    fn set_closure_is_per_replay() {
        let base = base(&[("d1", "0123456789"), ("d2", "abc")]);
        let loader = TextLabelsLoader::new();

        let mut first = TextLabels::new(Arc::clone(&base));
        let stats = loader
            .import_ops_str(
                &mut first,
                "setClosure CLOSE_ALL_TYPES\naddToType d1 0 1 T\n",
                "a.ops",
            )
            .unwrap();
        assert_eq!(stats.policy, ClosurePolicy::CloseAllTypes);
        assert!(first.is_closed("T", "d1"));
        assert!(first.is_closed("T", "d2"));

        let mut second = TextLabels::new(Arc::clone(&base));
        loader
            .import_ops_str(&mut second, "addToType d1 0 1 T\n", "b.ops")
            .unwrap();
        assert_eq!(loader.closure_policy(), ClosurePolicy::CloseByOperation);
        assert!(!second.is_closed("T", "d1"));
    }

    #[test]
    fn close_all_types_sees_final_type_set() {
        let base = base(&[("d1", "0123456789"), ("d2", "abc")]);
        let labels = replay(
            &base,
            "closeAllTypes d1\naddToType d1 0 1 A\naddToType d2 0 1 B\n",
        )
        .unwrap();
        assert!(labels.is_closed("A", "d1"));
        assert!(labels.is_closed("B", "d1"));
        assert!(!labels.is_closed("B", "d2"));
    }

    #[test]
    fn labeled_docs_policy() {
        let base = base(&[("d1", "0123456789"), ("d2", "abc")]);
        let labels = replay(
            &base,
            "setClosure CLOSE_TYPES_IN_LABELED_DOCS\naddToType d1 0 3 T\n",
        )
        .unwrap();
        assert!(labels.is_closed("T", "d1"));
        assert!(!labels.is_closed("T", "d2"));
        assert_eq!(
            labels.label_status(&Span::new("d1", 4, 6), "T"),
            LabelStatus::Negative
        );
        assert_eq!(
            labels.label_status(&Span::new("d2", 0, 1), "T"),
            LabelStatus::Unknown
        );
    }

    #[test]
    fn load_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let docs = dir.path().join("docs");
        std::fs::create_dir(&docs).unwrap();
        std::fs::write(docs.join("a.txt"), "Ada met Bob").unwrap();
        let ops = dir.path().join("gold.ops");
        std::fs::write(&ops, "addToType a.txt 0 3 PER 0.9\ncloseType a.txt PER\n").unwrap();

        let base = Arc::new(TextBase::from_dir(&docs).unwrap());
        let labels = TextLabelsLoader::new().load_ops(Arc::clone(&base), &ops).unwrap();
        let span = Span::new("a.txt", 0, 3);
        assert_eq!(labels.details(&span, "PER"), Some(&Details::new(0.9)));
        assert!(labels.is_closed("PER", "a.txt"));

        let out = dir.path().join("out.ops");
        save_types_as_ops_to_file(&labels, &out).unwrap();
        let reloaded = TextLabelsLoader::new().load_ops(base, &out).unwrap();
        assert_eq!(type_map(&reloaded), type_map(&labels));
        assert_eq!(closure_map(&reloaded), closure_map(&labels));
        assert_eq!(reloaded.details(&span, "PER"), Some(&Details::new(0.9)));
    }
}

// =============================================================================
// Properties
// =============================================================================

fn arb_doc() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-zA-Z0-9.,é]{1,6}", 1..12).prop_map(|words| words.join(" "))
}

/// (doc index, first token, last token, type index) picks, resolved against
/// the generated documents.
fn arb_picks() -> impl Strategy<Value = Vec<(usize, usize, usize, usize)>> {
    prop::collection::vec((0usize..2, 0usize..40, 0usize..40, 0usize..3), 0..15)
}

const TYPES: [&str; 3] = ["PER", "ORG", "LOC"];

fn token_labels(docs: &[String], picks: &[(usize, usize, usize, usize)]) -> TextLabels {
    let ids = ["d0", "d1"];
    let mut base = TextBase::new();
    for (id, text) in ids.iter().zip(docs) {
        base.add_document(id, text.as_str()).unwrap();
    }
    let base = Arc::new(base);
    let mut labels = TextLabels::new(Arc::clone(&base));
    for &(d, a, b, t) in picks {
        let doc = base.document(ids[d]).unwrap();
        let tokens = doc.tokens();
        if tokens.is_empty() {
            continue;
        }
        let (i, j) = (a % tokens.len(), b % tokens.len());
        let (i, j) = (i.min(j), i.max(j));
        let span = Span::new(ids[d], tokens[i].lo, tokens[j].hi);
        labels.add_to_type(span, TYPES[t], None).unwrap();
    }
    labels
}

proptest! {
    #[test]
    fn whole_token_labelings_round_trip(
        docs in prop::collection::vec(arb_doc(), 2),
        picks in arb_picks(),
    ) {
        let labels = token_labels(&docs, &picks);
        let mut out = Vec::new();
        save_types_as_ops(&labels, &mut out).unwrap();
        let log = String::from_utf8(out).unwrap();

        let reloaded = replay(labels.text_base(), &log).unwrap();
        prop_assert_eq!(type_map(&reloaded), type_map(&labels));
    }

    #[test]
    fn closure_is_idempotent(
        docs in prop::collection::vec(arb_doc(), 2),
        picks in arb_picks(),
        policy_idx in 0usize..4,
    ) {
        let policy = ClosurePolicy::ALL[policy_idx];
        let mut once = token_labels(&docs, &picks);
        close_labels(&mut once, policy).unwrap();
        let mut twice = once.clone();
        close_labels(&mut twice, policy).unwrap();
        prop_assert_eq!(closure_map(&once), closure_map(&twice));
        prop_assert_eq!(type_map(&once), type_map(&twice));
    }
}
