use super::*;

#[test]
fn test_noop_sink_drops_everything() {
    let mut sink = NoopSink;
    sink.report(Diagnostic::warning("mangle", "ignored"));
}

#[test]
fn test_collecting_sink_keeps_order() {
    let mut sink = CollectingSink::new();
    sink.report(Diagnostic::info("string-array", "first"));
    sink.report(Diagnostic::warning("control-flow-switch", "second"));

    let messages: Vec<_> = sink.messages().collect();
    assert_eq!(messages, vec!["first", "second"]);
    assert!(sink.has_warnings());
}

#[test]
fn test_display_includes_source() {
    let diagnostic = Diagnostic::info("mangle", "renamed 3 bindings");
    assert_eq!(diagnostic.to_string(), "info[mangle]: renamed 3 bindings");
}
