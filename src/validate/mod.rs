//! Validation phase: name table construction, stream checks and
//! cross-references.
//!
//! Problems are collected into the caller's list; only the abort class
//! (unknown integration window days) is returned as `Err`.

pub mod names;
pub mod options;
pub mod references;
pub mod streams;

pub use names::{NameTable, check_name};
pub use options::{DayOfWeek, IntegrationMethod};
pub use references::ResolvedFlows;

use serde_json::{Map, Value};

use crate::error::DefinitionError;
use crate::parse::config::BotConfig;
use crate::parse::types::BranchGraphDefinition;
use crate::stream::StreamCatalog;

/// Everything the validation passes produced, whether or not errors were
/// found along the way.
#[derive(Debug, Clone)]
pub struct ValidatedDefinitions {
    pub definition: BranchGraphDefinition,
    pub names: NameTable,
    /// Parallel to `definition.branches`.
    pub flows: Vec<ResolvedFlows>,
}

/// Run every validation pass over a parsed document, in order.
pub fn validate_definitions<C: StreamCatalog + ?Sized>(
    doc: &Map<String, Value>,
    config: &BotConfig,
    catalog: &C,
    errors: &mut Vec<DefinitionError>,
) -> Result<ValidatedDefinitions, DefinitionError> {
    let mut names = NameTable::new();

    let raw_branches = doc
        .get("branches")
        .and_then(Value::as_array)
        .ok_or(DefinitionError::MissingBranches)?;
    let mut branches = names::collect_branches(raw_branches, &mut names, errors);
    names::register_aliases(&mut branches, config, &mut names, errors)?;
    tracing::debug!(
        branches = branches.len(),
        names = names.len(),
        "name table built"
    );

    streams::validate_streams(&branches, config, catalog, errors);

    let raw_edges = collection(doc, "edges", DefinitionError::MalformedEdge, errors);
    let edges = references::validate_edges(raw_edges, &names, errors)?;

    let flows = references::validate_flows(&branches, &names, errors);

    let raw_specs = collection(doc, "branchspecs", DefinitionError::MalformedBranchspec, errors);
    let branchspecs = references::validate_branchspecs(raw_specs, &names, errors);

    Ok(ValidatedDefinitions {
        definition: BranchGraphDefinition {
            branches,
            edges,
            branchspecs,
        },
        names,
        flows,
    })
}

/// An optional top-level array. Absent or null is empty; anything else that is
/// not an array is reported whole.
fn collection<'a>(
    doc: &'a Map<String, Value>,
    key: &str,
    malformed: fn(String) -> DefinitionError,
    errors: &mut Vec<DefinitionError>,
) -> &'a [Value] {
    match doc.get(key) {
        None | Some(Value::Null) => &[],
        Some(Value::Array(entries)) => entries.as_slice(),
        Some(other) => {
            errors.push(malformed(other.to_string()));
            &[]
        }
    }
}
