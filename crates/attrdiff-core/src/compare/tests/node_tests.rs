use crate::error::CompareError;

use super::*;

#[test]
fn identical_documents_are_fully_correct() {
    let tree = vec![doc(vec![leaf("Field", "X")])];
    let details = compare(&tree, &tree, &no_containers());

    assert_eq!(
        details,
        vec![
            AccuracyDetail::new(AccuracyDetailLabel::Expected, "Doc", 1),
            AccuracyDetail::new(AccuracyDetailLabel::Expected, "Doc/Field", 1),
            AccuracyDetail::new(AccuracyDetailLabel::Correct, "Doc", 1),
            AccuracyDetail::new(AccuracyDetailLabel::Correct, "Doc/Field", 1),
        ]
    );
}

#[test]
fn default_container_is_reported_but_not_counted() {
    let tree = vec![doc(vec![leaf("Field", "X")])];
    let details = compare_default(&tree, &tree);

    assert_eq!(
        details,
        vec![
            AccuracyDetail::new(AccuracyDetailLabel::ContainerOnly, "Doc", 0),
            AccuracyDetail::new(AccuracyDetailLabel::Expected, "Doc/Field", 1),
            AccuracyDetail::new(AccuracyDetailLabel::Correct, "Doc/Field", 1),
        ]
    );
}

#[test]
fn changed_child_value_is_missed_and_incorrect() {
    let expected = vec![doc(vec![leaf("Field", "X")])];
    let found = vec![doc(vec![leaf("Field", "Y")])];
    let options = CompareOptions {
        collect_match_data: true,
        ..no_containers()
    };
    let details = compare(&expected, &found, &options);

    assert_eq!(counts(&details, AccuracyDetailLabel::Correct), [("Doc", 1)]);
    assert_eq!(
        counts(&details, AccuracyDetailLabel::Incorrect),
        [("Doc/Field", 1)]
    );
    assert_eq!(
        instances(&details, AccuracyDetailLabel::Missed),
        [("Doc/Field", r#"{"name":"Field","value":"X"}"#)]
    );
    assert_eq!(
        instances(&details, AccuracyDetailLabel::Incorrect),
        [("Doc/Field", r#"{"name":"Field","value":"Y"}"#)]
    );
    assert_eq!(
        instances(&details, AccuracyDetailLabel::Correct),
        [(
            "Doc",
            r#"{"name":"Doc","value":"","children":[{"name":"Field","value":"Y"}]}"#
        )]
    );
}

#[test]
fn names_types_and_values_compare_case_insensitively() {
    let expected = vec![doc(vec![leaf("Field", "abc").with_type("Code")])];
    let found = vec![doc(vec![leaf("FIELD", "ABC").with_type("code")])];
    let details = compare_default(&expected, &found);

    assert_eq!(
        counts(&details, AccuracyDetailLabel::Correct),
        [("Doc/Field@Code", 1)]
    );
    assert!(counts(&details, AccuracyDetailLabel::Incorrect).is_empty());
}

#[test]
fn correct_instances_snapshot_the_found_node() {
    let expected = vec![doc(vec![leaf("Field", "abc")])];
    let found = vec![doc(vec![leaf("field", "ABC")])];
    let details = compare(&expected, &found, &collecting());

    let correct = instances(&details, AccuracyDetailLabel::Correct);
    assert_eq!(correct, [("Doc/Field", r#"{"name":"field","value":"ABC"}"#)]);
}

#[test]
fn incorrect_rows_share_the_expected_casing() {
    let expected = vec![doc(vec![leaf("Field", "X").with_type("Code")])];
    let found = vec![doc(vec![leaf("field", "Y").with_type("CODE")])];
    let details = compare(&expected, &found, &collecting());

    assert_eq!(
        counts(&details, AccuracyDetailLabel::Incorrect),
        [("Doc/Field@Code", 1)]
    );
    let missed: Vec<&str> = instances(&details, AccuracyDetailLabel::Missed)
        .into_iter()
        .map(|(path, _)| path)
        .collect();
    assert_eq!(missed, ["Doc/Field@Code"]);
}

#[test]
fn differing_types_do_not_match() {
    let expected = vec![doc(vec![leaf("Name", "Smith").with_type("Last")])];
    let found = vec![doc(vec![leaf("Name", "Smith").with_type("First")])];
    let details = compare_default(&expected, &found);

    assert_eq!(
        counts(&details, AccuracyDetailLabel::Expected),
        [("Doc/Name@Last", 1)]
    );
    assert_eq!(
        counts(&details, AccuracyDetailLabel::Incorrect),
        [("Doc/Name@First", 1)]
    );
}

// ── container-only ──────────────────────────────────────────────────────────

fn grouped(value: &str) -> Vec<AttributeNode> {
    vec![doc(vec![leaf("Group", value).with_child(leaf("Leaf", "1"))])]
}

#[test]
fn container_only_nodes_ignore_value() {
    let options = CompareOptions {
        container_pattern: Some("//Group".to_owned()),
        ..CompareOptions::default()
    };
    let details = compare(&grouped("one"), &grouped("two"), &options);

    assert_eq!(
        counts(&details, AccuracyDetailLabel::ContainerOnly),
        [("Doc/Group", 0)]
    );
    assert_eq!(
        counts(&details, AccuracyDetailLabel::Correct),
        [("Doc", 1), ("Doc/Group/Leaf", 1)]
    );
    assert!(
        counts(&details, AccuracyDetailLabel::Expected)
            .iter()
            .all(|(path, _)| *path != "Doc/Group")
    );
    assert!(counts(&details, AccuracyDetailLabel::Incorrect).is_empty());
}

#[test]
fn unmarked_nodes_with_different_values_do_not_match() {
    let details = compare(&grouped("one"), &grouped("two"), &collecting());

    assert!(counts(&details, AccuracyDetailLabel::Correct).is_empty());
    assert_eq!(
        counts(&details, AccuracyDetailLabel::Incorrect),
        [("Doc/Group", 1), ("Doc/Group/Leaf", 1)]
    );
    let missed: Vec<&str> = instances(&details, AccuracyDetailLabel::Missed)
        .into_iter()
        .map(|(path, _)| path)
        .collect();
    assert_eq!(missed, ["Doc/Group", "Doc/Group/Leaf"]);
}

#[test]
fn na_values_are_containers_by_default() {
    let expected = vec![leaf("Vendor", "N/A").with_child(leaf("Name", "Acme"))];
    let found = vec![leaf("Vendor", "").with_child(leaf("Name", "Acme"))];
    let details = compare_default(&expected, &found);

    assert_eq!(
        counts(&details, AccuracyDetailLabel::ContainerOnly),
        [("Vendor", 0)]
    );
    assert_eq!(
        counts(&details, AccuracyDetailLabel::Correct),
        [("Vendor/Name", 1)]
    );
}

#[test]
fn container_paths_come_from_both_trees() {
    let expected = vec![leaf("Header", "").with_child(leaf("Title", "t"))];
    let found = vec![leaf("Footer", "").with_child(leaf("Page", "1"))];
    let details = compare_default(&expected, &found);

    assert_eq!(
        counts(&details, AccuracyDetailLabel::ContainerOnly),
        [("Footer", 0), ("Header", 0)]
    );
    assert_eq!(
        counts(&details, AccuracyDetailLabel::Incorrect),
        [("Footer/Page", 1)]
    );
}

#[test]
fn no_path_is_both_container_and_counted() {
    let expected = vec![doc(vec![
        leaf("Vendor", "N/A").with_child(leaf("Name", "Acme")),
        leaf("Lines", "").with_child(leaf("Line", "1")),
    ])];
    let found = vec![doc(vec![
        leaf("Vendor", "").with_child(leaf("Name", "Acme Corp")),
        leaf("Lines", "").with_child(leaf("Line", "1")),
        leaf("Extra", "").with_child(leaf("Note", "n")),
    ])];
    let details = compare(&expected, &found, &collecting());

    let containers: Vec<&str> = counts(&details, AccuracyDetailLabel::ContainerOnly)
        .into_iter()
        .map(|(path, _)| path)
        .collect();
    assert_eq!(containers, ["Doc", "Doc/Extra", "Doc/Lines", "Doc/Vendor"]);
    assert!(
        details
            .iter()
            .filter(|d| d.label != AccuracyDetailLabel::ContainerOnly)
            .all(|d| !containers.contains(&d.path.as_str())),
        "{details:?}"
    );
}

#[test]
fn mixed_instances_at_one_path_report_both_roles() {
    let tree = vec![doc(vec![
        leaf("Line", "").with_child(leaf("Part", "p")),
        leaf("Line", "x"),
    ])];
    let details = compare_default(&tree, &tree);

    assert_eq!(
        counts(&details, AccuracyDetailLabel::ContainerOnly),
        [("Doc", 0), ("Doc/Line", 0)]
    );
    assert_eq!(
        counts(&details, AccuracyDetailLabel::Expected),
        [("Doc/Line", 1), ("Doc/Line/Part", 1)]
    );
}

// ── ignore pruning ──────────────────────────────────────────────────────────

#[test]
fn ignored_subtrees_never_appear() {
    let expected = vec![doc(vec![
        leaf("Field", "x"),
        leaf("Secret", "s").with_child(leaf("Inner", "i")),
    ])];
    let found = vec![doc(vec![leaf("Field", "x"), leaf("Secret", "different")])];
    let options = CompareOptions {
        ignore_pattern: Some("//Secret".to_owned()),
        collect_match_data: true,
        ..CompareOptions::default()
    };
    let details = compare(&expected, &found, &options);

    assert!(details.iter().all(|d| !d.path.contains("Secret")));
    assert!(
        details
            .iter()
            .filter_map(|d| d.attribute.as_deref())
            .all(|a| !a.contains("Secret"))
    );
    assert!(counts(&details, AccuracyDetailLabel::Incorrect).is_empty());
}

#[test]
fn textless_subtrees_are_ignored_by_default() {
    let expected = vec![doc(vec![
        leaf("Field", "x"),
        leaf("Empty", "").with_child(leaf("AlsoEmpty", "")),
    ])];
    let found = vec![doc(vec![leaf("Field", "x")])];
    let details = compare_default(&expected, &found);

    assert_eq!(
        counts(&details, AccuracyDetailLabel::Expected),
        [("Doc/Field", 1)]
    );
    assert!(details.iter().all(|d| !d.path.contains("Empty")));
}

// ── one side empty ──────────────────────────────────────────────────────────

#[test]
fn empty_found_misses_everything() {
    let expected = vec![doc(vec![leaf("A", "1"), leaf("A", "2")])];
    let details = compare(&expected, &[], &collecting());

    assert_eq!(
        counts(&details, AccuracyDetailLabel::Expected),
        [("Doc/A", 2)]
    );
    assert!(counts(&details, AccuracyDetailLabel::Correct).is_empty());
    assert!(counts(&details, AccuracyDetailLabel::Incorrect).is_empty());
    let missed: Vec<&str> = instances(&details, AccuracyDetailLabel::Missed)
        .into_iter()
        .map(|(path, _)| path)
        .collect();
    assert_eq!(missed, ["Doc/A", "Doc/A"]);
}

#[test]
fn empty_expected_makes_everything_incorrect() {
    let found = vec![doc(vec![leaf("A", "1")])];
    let details = compare(&[], &found, &collecting());

    assert!(counts(&details, AccuracyDetailLabel::Expected).is_empty());
    assert!(counts(&details, AccuracyDetailLabel::Correct).is_empty());
    assert!(instances(&details, AccuracyDetailLabel::Missed).is_empty());
    assert_eq!(
        counts(&details, AccuracyDetailLabel::Incorrect),
        [("Doc/A", 1)]
    );
    assert_eq!(instances(&details, AccuracyDetailLabel::Incorrect).len(), 1);
}

#[test]
fn both_empty_yields_no_rows() {
    assert!(compare_default(&[], &[]).is_empty());
}

// ── output shape ────────────────────────────────────────────────────────────

#[test]
fn rows_are_grouped_by_label_then_sorted_by_path() {
    let expected = vec![doc(vec![leaf("B", "1"), leaf("A", "2"), leaf("D", "4")])];
    let found = vec![doc(vec![leaf("B", "9"), leaf("C", "3"), leaf("D", "4")])];
    let details = compare_default(&expected, &found);

    let labels: Vec<AccuracyDetailLabel> = details.iter().map(|d| d.label).collect();
    assert_eq!(
        labels,
        [
            AccuracyDetailLabel::ContainerOnly,
            AccuracyDetailLabel::Expected,
            AccuracyDetailLabel::Expected,
            AccuracyDetailLabel::Expected,
            AccuracyDetailLabel::Correct,
            AccuracyDetailLabel::Incorrect,
            AccuracyDetailLabel::Incorrect,
        ]
    );
    assert_eq!(
        counts(&details, AccuracyDetailLabel::Expected),
        [("Doc/A", 1), ("Doc/B", 1), ("Doc/D", 1)]
    );
    assert_eq!(
        counts(&details, AccuracyDetailLabel::Incorrect),
        [("Doc/B", 1), ("Doc/C", 1)]
    );
}

#[test]
fn aggregate_rows_carry_no_attribute() {
    let tree = vec![doc(vec![leaf("Field", "X")])];
    let details = compare(&tree, &tree, &collecting());

    let aggregates = details.iter().filter(|d| d.is_aggregate()).count();
    let per_node = details.iter().filter(|d| !d.is_aggregate()).count();
    assert_eq!(aggregates, 3);
    assert_eq!(per_node, 1);
    assert!(
        details
            .iter()
            .filter(|d| !d.is_aggregate())
            .all(|d| d.value == 0 && d.label == AccuracyDetailLabel::Correct)
    );
}

#[test]
fn stats_type_is_copied_to_every_row() {
    let expected = vec![doc(vec![leaf("Field", "X")])];
    let found = vec![doc(vec![leaf("Field", "Y")])];
    let options = CompareOptions {
        stats_type: Some("page-1".to_owned()),
        collect_match_data: true,
        ..CompareOptions::default()
    };
    let details = compare(&expected, &found, &options);

    assert!(!details.is_empty());
    assert!(
        details
            .iter()
            .all(|d| d.stats_type.as_deref() == Some("page-1"))
    );
}

// ── failures ────────────────────────────────────────────────────────────────

#[test]
fn cancelled_token_aborts_the_call() {
    let tree = vec![doc(vec![leaf("Field", "X")])];
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = compare_attributes(&tree, &tree, &CompareOptions::default(), &cancel)
        .expect_err("cancelled");
    assert!(err.is_cancelled());

    let err = compare_attributes(&[], &[], &CompareOptions::default(), &cancel)
        .expect_err("cancelled even without work");
    assert_eq!(err, CompareError::Cancelled);
}

#[test]
fn malformed_pattern_is_reported() {
    let options = CompareOptions {
        ignore_pattern: Some("//[".to_owned()),
        ..CompareOptions::default()
    };
    let err = compare_attributes(&[], &[], &options, &CancellationToken::new())
        .expect_err("bad pattern");
    assert!(matches!(err, CompareError::Pattern(_)), "{err}");
    assert_eq!(err.code(), "ATTR-E004");
}

#[test]
fn precompiled_patterns_take_precedence_over_option_sources() {
    let tree = vec![doc(vec![leaf("Field", "X"), leaf("Scratch", "s")])];
    let options = CompareOptions {
        ignore_pattern: Some("//[".to_owned()),
        ..CompareOptions::default()
    };
    let patterns = ComparePatterns::new(
        "//Scratch".parse().expect("ignore"),
        "//NoSuchNode".parse().expect("container"),
    );
    let details =
        compare_with_patterns(&tree, &tree, &patterns, &options, &CancellationToken::new())
            .expect("compare");

    assert_eq!(
        counts(&details, AccuracyDetailLabel::Correct),
        [("Doc", 1), ("Doc/Field", 1)]
    );
}
