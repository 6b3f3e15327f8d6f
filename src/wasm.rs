//! WASM entry points for browser use (e.g. a branch definition editor).

use std::collections::HashSet;

use wasm_bindgen::prelude::*;

use crate::error::DefinitionError;

/// Validate branch definition text against a JSON array of known stream paths.
/// Returns a JSON array of error objects; empty means valid.
#[wasm_bindgen]
pub fn validate_branch_definitions(text: &str, streams_json: &str) -> JsValue {
    let result = validate_inner(text, streams_json);
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

/// Full compile. Returns either `{status: "success", branches, flows}` or
/// `{status: "errors", errors}`.
#[wasm_bindgen]
pub fn compile_branch_definitions(text: &str, streams_json: &str) -> JsValue {
    let result = compile_inner(text, streams_json);
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

fn read_streams(streams_json: &str) -> Result<HashSet<String>, ErrorDto> {
    serde_json::from_str::<Vec<String>>(streams_json)
        .map(|streams| streams.into_iter().collect())
        .map_err(|e| ErrorDto {
            code: "P003".into(),
            phase: "Parse".into(),
            message: format!("Failed to parse stream list JSON: {}", e),
        })
}

fn validate_inner(text: &str, streams_json: &str) -> Vec<ErrorDto> {
    let streams = match read_streams(streams_json) {
        Ok(streams) => streams,
        Err(e) => return vec![e],
    };
    crate::parse_and_validate(text, &streams)
        .errors
        .into_iter()
        .map(ErrorDto::from)
        .collect()
}

fn compile_inner(text: &str, streams_json: &str) -> CompileResult {
    let streams = match read_streams(streams_json) {
        Ok(streams) => streams,
        Err(e) => return CompileResult::Errors { errors: vec![e] },
    };

    let (graph, _config) = match crate::parse_and_validate(text, &streams).into_result() {
        Ok(compiled) => compiled,
        Err(errors) => {
            return CompileResult::Errors {
                errors: errors.into_iter().map(ErrorDto::from).collect(),
            };
        }
    };

    let branches = graph
        .node_indices
        .keys()
        .cloned()
        .collect::<std::collections::BTreeSet<_>>()
        .into_iter()
        .collect::<Vec<_>>();
    let flows = branches
        .iter()
        .flat_map(|from| {
            let force = graph.force_flows_from(from);
            graph
                .flows_from(from)
                .into_iter()
                .map(|to| FlowDto {
                    from: from.clone(),
                    to: to.to_string(),
                    force: force.contains(&to),
                })
                .collect::<Vec<_>>()
        })
        .collect();

    CompileResult::Success { branches, flows }
}

// ---------------------------------------------------------------------------
// DTOs for serialization to JS
// ---------------------------------------------------------------------------

#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct ErrorDto {
    code: String,
    phase: String,
    message: String,
}

impl From<DefinitionError> for ErrorDto {
    fn from(e: DefinitionError) -> Self {
        ErrorDto {
            code: e.code().to_string(),
            phase: e.phase().to_string(),
            message: e.to_string(),
        }
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct FlowDto {
    from: String,
    to: String,
    force: bool,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
#[serde(tag = "status")]
enum CompileResult {
    #[serde(rename = "success")]
    Success {
        branches: Vec<String>,
        flows: Vec<FlowDto>,
    },
    #[serde(rename = "errors")]
    Errors { errors: Vec<ErrorDto> },
}
