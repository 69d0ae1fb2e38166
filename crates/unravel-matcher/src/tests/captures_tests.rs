use super::*;

#[test]
fn test_latest_entry_wins() {
    let mut captures = Captures::new();
    captures.insert("name", Capture::Str("a".to_string()));
    captures.insert("name", Capture::Str("b".to_string()));
    assert_eq!(captures.string("name"), Some("b"));
}

#[test]
fn test_rollback_discards_later_entries() {
    let mut captures = Captures::new();
    captures.insert("kept", Capture::Number(1.0));
    let checkpoint = captures.checkpoint();
    captures.insert("dropped", Capture::Node(NodeIndex(3)));
    captures.rollback(checkpoint);

    assert_eq!(captures.number("kept"), Some(1.0));
    assert!(captures.get("dropped").is_none());
}

#[test]
fn test_absent_node_capture_reads_as_none() {
    let mut captures = Captures::new();
    captures.insert("slot", Capture::Node(NodeIndex::NONE));
    assert!(captures.get("slot").is_some());
    assert_eq!(captures.node("slot"), None);
}

#[test]
fn test_accessors_check_capture_type() {
    let mut captures = Captures::new();
    captures.insert("list", Capture::List(vec![NodeIndex(0), NodeIndex(1)]));
    assert_eq!(captures.list("list").map(<[NodeIndex]>::len), Some(2));
    assert_eq!(captures.string("list"), None);
    assert_eq!(captures.node("list"), None);

    captures.clear();
    assert!(captures.is_empty());
}
