use jump::record::InstanceRecord;
use jump::selector::{self, Action, FuzzyCompleter};

fn record(id: &str, name: &str) -> InstanceRecord {
    InstanceRecord {
        instance_id: id.to_string(),
        name: name.to_string(),
        private_ip: "10.0.0.1".to_string(),
        key_name: "mykey".to_string(),
        target_user: "ec2-user".to_string(),
        platform_details: "Linux/UNIX".to_string(),
        image_id: "ami-123".to_string(),
        image_name: "N/A".to_string(),
    }
}

#[test]
fn test_interpret_commands_case_insensitively() {
    let labels = selector::label_map(&[]);
    assert_eq!(selector::interpret("exit", &labels), Action::Terminate);
    assert_eq!(selector::interpret("quit", &labels), Action::Terminate);
    assert_eq!(selector::interpret("EXIT", &labels), Action::Terminate);
    assert_eq!(selector::interpret(" refresh ", &labels), Action::Refresh);
    assert_eq!(selector::interpret("list", &labels), Action::List);
}

#[test]
fn test_interpret_empty_input_is_noop() {
    let labels = selector::label_map(&[record("i-001", "alpha")]);
    assert_eq!(selector::interpret("", &labels), Action::Noop);
    assert_eq!(selector::interpret("   ", &labels), Action::Noop);
}

#[test]
fn test_interpret_exact_label_selects_record() {
    let records = vec![record("i-001", "alpha"), record("i-002", "beta")];
    let labels = selector::label_map(&records);

    match selector::interpret("[2] beta (i-002)", &labels) {
        Action::Connect(selected) => assert_eq!(selected.instance_id, "i-002"),
        other => panic!("expected Connect, got {:?}", other),
    }
}

#[test]
fn test_interpret_rejects_inexact_label() {
    let records = vec![record("i-001", "alpha")];
    let labels = selector::label_map(&records);

    // Labels must match as displayed; fuzzy matching is completion-only.
    assert_eq!(
        selector::interpret("alpha", &labels),
        Action::Unknown("alpha".to_string())
    );
    assert_eq!(
        selector::interpret("[1] ALPHA (i-001)", &labels),
        Action::Unknown("[1] ALPHA (i-001)".to_string())
    );
}

#[test]
fn test_interpret_unknown_text() {
    let labels = selector::label_map(&[]);
    assert_eq!(
        selector::interpret("frobnicate", &labels),
        Action::Unknown("frobnicate".to_string())
    );
}

#[test]
fn test_labels_are_indexed_in_inventory_order() {
    let records = vec![record("i-001", "alpha"), record("i-002", "beta")];
    let labels = selector::label_map(&records);

    assert_eq!(labels.len(), 2);
    assert!(labels.contains_key("[1] alpha (i-001)"));
    assert!(labels.contains_key("[2] beta (i-002)"));
}

#[test]
fn test_suggestions_are_commands_then_labels() {
    let records = vec![record("i-001", "alpha")];
    let all = selector::suggestions(&records);

    assert_eq!(all[..4], ["exit", "quit", "refresh", "list"]);
    assert_eq!(all[4], "[1] alpha (i-001)");
}

#[test]
fn test_fuzzy_completer_matches_subsequences() {
    let completer = FuzzyCompleter::new(vec![
        "exit".to_string(),
        "refresh".to_string(),
        "[1] web-frontend (i-0abc)".to_string(),
    ]);

    let matches = completer.ranked("web");
    assert_eq!(matches, vec!["[1] web-frontend (i-0abc)".to_string()]);

    // Non-contiguous subsequence still matches.
    let matches = completer.ranked("wfe");
    assert_eq!(matches, vec!["[1] web-frontend (i-0abc)".to_string()]);
}

#[test]
fn test_fuzzy_completer_is_case_insensitive() {
    let completer = FuzzyCompleter::new(vec!["refresh".to_string()]);
    assert_eq!(completer.ranked("REF"), vec!["refresh".to_string()]);
}

#[test]
fn test_fuzzy_completer_ranks_better_matches_first() {
    let completer = FuzzyCompleter::new(vec![
        "[1] alpha (i-0refresh1)".to_string(),
        "refresh".to_string(),
    ]);
    let matches = completer.ranked("refresh");
    assert_eq!(matches[0], "refresh");
}

#[test]
fn test_fuzzy_completer_empty_input_keeps_original_order() {
    let candidates = vec!["exit".to_string(), "quit".to_string(), "list".to_string()];
    let completer = FuzzyCompleter::new(candidates.clone());
    assert_eq!(completer.ranked(""), candidates);
}
