//! Integration tests for streams and cross-references (S001–S004, R001–R012).

#[allow(dead_code)]
mod helpers;

use branchgraph::DefinitionError;
use helpers::*;
use serde_json::json;

#[test]
fn no_depot_anywhere() {
    let result = compile_value(
        json!({"branches": [{"name": "Main"}, {"name": "Dev", "flowsTo": ["MAIN"]}]}),
        &[],
    );
    assert_eq!(
        result.messages(),
        vec![
            "Missing rootPath and no streamDepot defined for branch Main.",
            "Missing rootPath and no streamDepot defined for branch Dev.",
        ]
    );
    assert_no_error(&result.errors, "R006");
    assert!(result.graph.is_none());
}

#[test]
fn branch_depot_overrides_default() {
    let result = compile_value(
        json!({
            "defaultStreamDepot": "Games",
            "branches": [
                {"name": "Main"},
                {"name": "Tools", "streamDepot": "Internal", "streamSubpath": "/Source/..."}
            ]
        }),
        &["//Games/Main"],
    );
    assert_eq!(result.messages(), vec!["Stream //Internal/Tools not found"]);
}

#[test]
fn root_path_skips_catalog_lookup() {
    let result = compile_value(
        json!({"branches": [{"name": "Main", "rootPath": "//Games/Main/..."}]}),
        &[],
    );
    assert!(result.errors.is_empty(), "{:?}", result.errors);
}

#[test]
fn malformed_root_path() {
    let result = compile_value(
        json!({"branches": [{"name": "Main", "rootPath": "//Games/Main"}]}),
        &[],
    );
    assert_eq!(
        result.messages(),
        vec!["Branch rootPath not in '//<something>/...' format: //Games/Main"]
    );
}

#[test]
fn force_flow_requires_flow_even_when_target_exists() {
    let result = compile_value(
        json!({
            "defaultStreamDepot": "Games",
            "branches": [
                {"name": "Main"},
                {"name": "Dev", "forceFlowTo": ["Main"]}
            ]
        }),
        &["//Games/Main", "//Games/Dev"],
    );
    assert_eq!(
        result.errors,
        vec![DefinitionError::ForceFlowWithoutFlow {
            branch: "Dev".into(),
            target: "Main".into(),
        }]
    );
}

#[test]
fn flows_through_aliases() {
    let result = compile_value(
        json!({
            "defaultStreamDepot": "Games",
            "branches": [
                {"name": "Main", "aliases": ["trunk"]},
                {"name": "Dev", "flowsTo": ["TRUNK"], "forceFlowTo": ["main"]}
            ]
        }),
        &["//Games/Main", "//Games/Dev"],
    );
    let (graph, _) = result.into_result().expect("Should be valid");
    assert_eq!(graph.flows_from("dev"), vec!["MAIN"]);
    assert_eq!(graph.force_flows_from("Dev"), vec!["MAIN"]);
    assert_eq!(graph.flows_into("trunk"), vec!["DEV"]);
}

#[test]
fn edges_check_both_ends() {
    let result = compile_value(
        json!({
            "defaultStreamDepot": "Games",
            "branches": [{"name": "Main"}],
            "edges": [{"from": "Nowhere", "to": "Elsewhere"}, 7]
        }),
        &["//Games/Main"],
    );
    assert_eq!(
        result.messages(),
        vec![
            "Unrecognised source node in edge property Nowhere",
            "Unrecognised target node in edge property Elsewhere",
            "Unable to parse edge definition: 7",
        ]
    );
}

#[test]
fn edges_must_be_an_array() {
    let result = compile_value(
        json!({"branches": [], "edges": {"from": "Main"}, "branchspecs": null}),
        &[],
    );
    assert_eq!(result.errors.len(), 1);
    assert_has_error(&result.errors, "R001");
}

#[test]
fn branchspec_with_unknown_ends() {
    let result = compile_value(
        json!({
            "defaultStreamDepot": "Games",
            "branches": [{"name": "Main"}],
            "branchspecs": [{"name": "spec", "from": "Dev", "to": "Release"}]
        }),
        &["//Games/Main"],
    );
    assert_eq!(
        result.messages(),
        vec![
            "From-Branch Dev not found in branchspec spec",
            "To-Branch Release not found in branchspec spec",
        ]
    );
}

#[test]
fn branchspec_missing_both_ends_fires_all_three() {
    let result = compile_value(
        json!({"branches": [], "branchspecs": [{"name": "empty"}]}),
        &[],
    );
    assert_has_error(&result.errors, "R010");
    assert_has_error(&result.errors, "R011");
    assert_has_error(&result.errors, "R012");
}
