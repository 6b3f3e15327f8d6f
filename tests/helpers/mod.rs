use std::collections::HashSet;

use branchgraph::{DefinitionError, ParseResult, parse_and_validate};

// =============================================================================
// Catalog and compile helpers
// =============================================================================

pub fn catalog(streams: &[&str]) -> HashSet<String> {
    streams.iter().map(|s| s.to_string()).collect()
}

pub fn compile(text: &str, streams: &[&str]) -> ParseResult {
    parse_and_validate(text, &catalog(streams))
}

/// Compile a `serde_json::json!` document.
pub fn compile_value(doc: serde_json::Value, streams: &[&str]) -> ParseResult {
    compile(&doc.to_string(), streams)
}

// =============================================================================
// Assertions
// =============================================================================

pub fn assert_has_error(errors: &[DefinitionError], code: &str) {
    assert!(
        errors.iter().any(|e| e.code() == code),
        "Expected error {}, got: {:?}",
        code,
        errors
    );
}

pub fn assert_no_error(errors: &[DefinitionError], code: &str) {
    assert!(
        !errors.iter().any(|e| e.code() == code),
        "Did not expect error {}, but got: {:?}",
        code,
        errors
    );
}

pub fn count_code(errors: &[DefinitionError], code: &str) -> usize {
    errors.iter().filter(|e| e.code() == code).count()
}
