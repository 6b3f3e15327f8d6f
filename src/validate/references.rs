//! Cross-reference rules: edges, flows and branchspecs may only name known
//! branches or aliases.

use std::collections::HashSet;

use serde_json::Value;

use super::names::NameTable;
use super::options::validate_common_options;
use crate::error::DefinitionError;
use crate::parse::types::{BranchDefinition, BranchSpecDefinition, EdgeDefinition, NameList};

/// Project and check the `edges` array. Unknown integration window days abort.
pub fn validate_edges(
    raw: &[Value],
    names: &NameTable,
    errors: &mut Vec<DefinitionError>,
) -> Result<Vec<EdgeDefinition>, DefinitionError> {
    let mut edges = Vec::with_capacity(raw.len());

    for entry in raw {
        let mut edge = match serde_json::from_value::<EdgeDefinition>(entry.clone()) {
            Ok(edge) => edge,
            Err(_) => {
                errors.push(DefinitionError::MalformedEdge(entry.to_string()));
                continue;
            }
        };

        if !names.contains(&edge.from) {
            errors.push(DefinitionError::UnknownEdgeSource(edge.from.clone()));
        }
        if !names.contains(&edge.to) {
            errors.push(DefinitionError::UnknownEdgeTarget(edge.to.clone()));
        }

        validate_common_options(&mut edge.options)?;
        edges.push(edge);
    }

    Ok(edges)
}

/// Resolved flow targets for one branch, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedFlows {
    pub flows_to: Vec<String>,
    pub force_flow_to: Vec<String>,
}

/// Check `flowsTo` and `forceFlowTo` for every branch.
///
/// Returns the canonical targets per branch, parallel to `branches`.
pub fn validate_flows(
    branches: &[BranchDefinition],
    names: &NameTable,
    errors: &mut Vec<DefinitionError>,
) -> Vec<ResolvedFlows> {
    branches
        .iter()
        .map(|def| resolve_branch_flows(def, names, errors))
        .collect()
}

fn resolve_branch_flows(
    def: &BranchDefinition,
    names: &NameTable,
    errors: &mut Vec<DefinitionError>,
) -> ResolvedFlows {
    let mut resolved = ResolvedFlows::default();
    let mut flow_set = HashSet::new();

    match &def.flows_to {
        None => {}
        Some(NameList::Malformed(_)) => {
            errors.push(DefinitionError::FlowsToNotArray(def.name.clone()));
        }
        Some(NameList::Names(targets)) => {
            for to in targets {
                match names.resolve(to) {
                    Some(canonical) => {
                        if flow_set.insert(canonical.to_string()) {
                            resolved.flows_to.push(canonical.to_string());
                        }
                    }
                    None => errors.push(DefinitionError::UnknownFlowTarget {
                        branch: def.name.clone(),
                        target: to.clone(),
                    }),
                }
            }
        }
    }

    match &def.force_flow_to {
        None => {}
        Some(NameList::Malformed(_)) => {
            errors.push(DefinitionError::ForceFlowToNotArray(def.name.clone()));
        }
        Some(NameList::Names(targets)) => {
            for to in targets {
                match names.resolve(to) {
                    None => errors.push(DefinitionError::UnknownForceFlowTarget {
                        branch: def.name.clone(),
                        target: to.clone(),
                    }),
                    Some(canonical) if !flow_set.contains(canonical) => {
                        errors.push(DefinitionError::ForceFlowWithoutFlow {
                            branch: def.name.clone(),
                            target: to.clone(),
                        })
                    }
                    Some(canonical) => {
                        if !resolved.force_flow_to.iter().any(|f| f == canonical) {
                            resolved.force_flow_to.push(canonical.to_string());
                        }
                    }
                }
            }
        }
    }

    resolved
}

/// Project and check the `branchspecs` array.
///
/// Missing ends and unresolved ends are reported independently.
pub fn validate_branchspecs(
    raw: &[Value],
    names: &NameTable,
    errors: &mut Vec<DefinitionError>,
) -> Vec<BranchSpecDefinition> {
    let mut specs = Vec::with_capacity(raw.len());

    for entry in raw {
        let spec = match serde_json::from_value::<BranchSpecDefinition>(entry.clone()) {
            Ok(spec) => spec,
            Err(_) => {
                errors.push(DefinitionError::MalformedBranchspec(entry.to_string()));
                continue;
            }
        };

        if spec.from.is_empty() || spec.to.is_empty() {
            errors.push(DefinitionError::IncompleteBranchspec(spec.name.clone()));
        }
        if !names.contains(&spec.from) {
            errors.push(DefinitionError::UnknownBranchspecSource {
                from: spec.from.clone(),
                spec: spec.name.clone(),
            });
        }
        if !names.contains(&spec.to) {
            errors.push(DefinitionError::UnknownBranchspecTarget {
                to: spec.to.clone(),
                spec: spec.name.clone(),
            });
        }
        specs.push(spec);
    }

    specs
}
