use super::*;
use pretty_assertions::assert_eq;

fn span(start: usize, end: usize) -> Span {
    Span::on_line(PathBuf::from("test.lm"), 1, start, end)
}

#[test]
fn test_diagnostic_json() {
    let diag = Diagnostic::error(error_codes::types::TYPE_MISMATCH)
        .message("specified expression must be assignable to declared type")
        .span(span(10, 20))
        .node(NodeId(7))
        .build();

    let json = diag.to_json();
    assert!(json.contains("E1001"));
    assert!(json.contains("declared type"));
    assert!(json.contains("\"node\":7"));
}

#[test]
fn test_diagnostic_without_node_omits_field() {
    let diag = Diagnostic::error("E1001").message("oops").build();
    assert!(!diag.to_json().contains("node"));
}

#[test]
fn test_span_on_line_columns() {
    let location = span(4, 9);
    assert_eq!(location.start_line, 1);
    assert_eq!(location.end_line, 1);
    assert_eq!((location.start_col, location.end_col), (5, 10));
}

#[test]
fn test_diagnostic_warning() {
    let diag = Diagnostic::warning(error_codes::warnings::UNCHECKED_TYPE_ARGUMENTS)
        .message("type arguments are not checked")
        .build();
    assert!(!diag.is_error());
    assert_eq!(diag.severity, Severity::Warning);
}

#[test]
fn test_diagnostic_human_readable_with_help() {
    let diag = Diagnostic::error(error_codes::declarations::SELF_TYPE_VIOLATION)
        .message("type argument does not satisfy self type constraint")
        .span(span(0, 3))
        .note(Note::new("declared here"))
        .help("try making Foo satisfy Comparable")
        .build();

    let output = diag.to_human_readable("foo");
    assert!(output.contains("error[E4001]"));
    assert!(output.contains("= note: declared here"));
    assert!(output.contains("= help: try making Foo satisfy Comparable"));
}

#[test]
fn test_note_with_span_renders_location() {
    let diag = Diagnostic::error(error_codes::narrowing::NON_DISJOINT_CASES)
        .message("cases are not disjoint: String and String")
        .span(span(0, 3))
        .note(Note::new("both cases match values of type String").with_span(span(4, 9)))
        .build();

    let output = diag.to_human_readable("foo");
    assert!(output.contains("= note: both cases match values of type String (test.lm:1:5)"));
    assert!(diag.to_json().contains("\"start_col\":5"));
}

#[test]
fn test_diagnostic_bag_operations() {
    let mut bag = DiagnosticBag::new();
    assert!(bag.is_empty());

    bag.push(Diagnostic::error("E1001").message("error").node(NodeId(1)).build());
    bag.push(Diagnostic::warning("W0001").message("warning").node(NodeId(2)).build());
    bag.push(Diagnostic::error("E2002").message("missing").node(NodeId(1)).build());

    assert_eq!(bag.len(), 3);
    assert!(bag.has_errors());
    assert!(bag.has_warnings());
    assert_eq!(bag.error_count(), 2);
    assert_eq!(bag.warning_count(), 1);
    assert_eq!(bag.for_node(NodeId(1)).count(), 2);
    assert_eq!(bag.with_code("E2002").count(), 1);
}

#[test]
fn test_diagnostic_bag_json() {
    let mut bag = DiagnosticBag::new();
    bag.push(Diagnostic::error("E3006").message("does not cover").build());

    let json = bag.to_json();
    assert!(json.starts_with('['));
    assert!(json.contains("E3006"));
}

#[test]
fn test_diagnostic_bag_format_text() {
    let mut bag = DiagnosticBag::new();
    bag.push(
        Diagnostic::error("E1002")
            .message("method or attribute does not exist: foo")
            .span(span(0, 3))
            .build(),
    );

    let text = bag.format_text("foo");
    assert!(text.contains("does not exist: foo"));
    assert!(text.contains("^^^"));
}
