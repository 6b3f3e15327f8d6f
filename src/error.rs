//! Unified error type for every phase of branch definition compilation.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Parse,
    Config,
    Names,
    Streams,
    References,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Parse => write!(f, "Parse"),
            Phase::Config => write!(f, "Config"),
            Phase::Names => write!(f, "Names"),
            Phase::Streams => write!(f, "Streams"),
            Phase::References => write!(f, "References"),
        }
    }
}

/// A single problem found while loading a branch definition document.
///
/// `Display` renders the operator-facing message. Variants flagged by
/// [`DefinitionError::is_fatal`] stop compilation at the point they occur;
/// everything else is accumulated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    // Parse
    #[error("Failed to parse branch definition document: {0}")]
    Syntax(String),
    #[error("Branch definition document requires a 'branches' array")]
    MissingBranches,

    // Config
    #[error("Invalid macro property: '{0}'")]
    InvalidMacros(String),
    #[error("Invalid value for config property '{key}': {reason}")]
    InvalidConfigValue { key: String, reason: String },
    #[error("Unknown integrationMethod '{method}' in '{context}'")]
    UnknownIntegrationMethod { method: String, context: String },

    // Names
    #[error("Unable to parse branch definition: {0}")]
    UnnamedBranch(String),
    #[error("Unable to parse branch definition '{name}': {reason}")]
    MalformedBranch { name: String, reason: String },
    #[error("Names must be alphanumeric, dash, underscore or dot: '{0}'")]
    InvalidName(String),
    #[error("'{0}' is a reserved branch name")]
    ReservedName(String),
    #[error("Duplicate branch name '{0}'")]
    DuplicateName(String),
    #[error("{0} branch is in branchNamesToIgnore")]
    BranchIgnored(String),
    #[error("{0} alias is in branchNamesToIgnore")]
    AliasIgnored(String),
    #[error("Empty alias for '{0}'")]
    EmptyAlias(String),
    #[error("Duplicate alias '{alias}' for '{existing}' and '{branch}'")]
    DuplicateAlias {
        alias: String,
        existing: String,
        branch: String,
    },
    #[error("Unknown day of the week {0}")]
    UnknownDayOfWeek(String),

    // Streams
    #[error("Missing rootPath and no streamDepot defined for branch {0}.")]
    MissingStreamDepot(String),
    #[error("Branch rootPath not in '//<something>/...' format: {0}")]
    MalformedRootPath(String),
    #[error("Cannot find depotname in {0}")]
    MissingDepotName(String),
    #[error("Stream {0} not found")]
    StreamNotFound(String),

    // References
    #[error("Unable to parse edge definition: {0}")]
    MalformedEdge(String),
    #[error("Unrecognised source node in edge property {0}")]
    UnknownEdgeSource(String),
    #[error("Unrecognised target node in edge property {0}")]
    UnknownEdgeTarget(String),
    #[error("'{0}'.flowsTo is not an array")]
    FlowsToNotArray(String),
    #[error("'{0}'.forceFlowTo is not an array")]
    ForceFlowToNotArray(String),
    #[error("'{branch}' flows to unknown branch/alias '{target}'")]
    UnknownFlowTarget { branch: String, target: String },
    #[error("'{branch}' force flows to unknown branch/alias '{target}'")]
    UnknownForceFlowTarget { branch: String, target: String },
    #[error("'{branch}' force flows but does not flow to '{target}'")]
    ForceFlowWithoutFlow { branch: String, target: String },
    #[error("Unable to parse branchspec definition: {0}")]
    MalformedBranchspec(String),
    #[error("Invalid branchspec {0} (requires both to and from fields)")]
    IncompleteBranchspec(String),
    #[error("From-Branch {from} not found in branchspec {spec}")]
    UnknownBranchspecSource { from: String, spec: String },
    #[error("To-Branch {to} not found in branchspec {spec}")]
    UnknownBranchspecTarget { to: String, spec: String },
}

impl DefinitionError {
    /// Stable identifier for the kind of problem.
    pub fn code(&self) -> &'static str {
        use DefinitionError::*;
        match self {
            Syntax(_) => "P001",
            MissingBranches => "P002",
            InvalidMacros(_) => "C001",
            InvalidConfigValue { .. } => "C002",
            UnknownIntegrationMethod { .. } => "C003",
            UnnamedBranch(_) => "N001",
            MalformedBranch { .. } => "N002",
            InvalidName(_) => "N003",
            ReservedName(_) => "N004",
            DuplicateName(_) => "N005",
            BranchIgnored(_) => "N006",
            AliasIgnored(_) => "N007",
            EmptyAlias(_) => "N008",
            DuplicateAlias { .. } => "N009",
            UnknownDayOfWeek(_) => "N010",
            MissingStreamDepot(_) => "S001",
            MalformedRootPath(_) => "S002",
            MissingDepotName(_) => "S003",
            StreamNotFound(_) => "S004",
            MalformedEdge(_) => "R001",
            UnknownEdgeSource(_) => "R002",
            UnknownEdgeTarget(_) => "R003",
            FlowsToNotArray(_) => "R004",
            ForceFlowToNotArray(_) => "R005",
            UnknownFlowTarget { .. } => "R006",
            UnknownForceFlowTarget { .. } => "R007",
            ForceFlowWithoutFlow { .. } => "R008",
            MalformedBranchspec(_) => "R009",
            IncompleteBranchspec(_) => "R010",
            UnknownBranchspecSource { .. } => "R011",
            UnknownBranchspecTarget { .. } => "R012",
        }
    }

    pub fn phase(&self) -> Phase {
        match self.code().as_bytes()[0] {
            b'P' => Phase::Parse,
            b'C' => Phase::Config,
            b'N' => Phase::Names,
            b'S' => Phase::Streams,
            _ => Phase::References,
        }
    }

    /// Whether this error aborts compilation instead of being collected.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DefinitionError::Syntax(_)
                | DefinitionError::MissingBranches
                | DefinitionError::InvalidMacros(_)
                | DefinitionError::UnknownDayOfWeek(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_follows_code_prefix() {
        assert_eq!(DefinitionError::MissingBranches.phase(), Phase::Parse);
        assert_eq!(
            DefinitionError::StreamNotFound("//a/b".into()).phase(),
            Phase::Streams
        );
        assert_eq!(
            DefinitionError::IncompleteBranchspec("x".into()).phase(),
            Phase::References
        );
    }

    #[test]
    fn only_abort_class_is_fatal() {
        assert!(DefinitionError::UnknownDayOfWeek("funday".into()).is_fatal());
        assert!(DefinitionError::InvalidMacros("3".into()).is_fatal());
        assert!(!DefinitionError::DuplicateName("MAIN".into()).is_fatal());
    }

    #[test]
    fn messages_render_for_operators() {
        let err = DefinitionError::DuplicateAlias {
            alias: "REL".into(),
            existing: "RELEASE-1.0".into(),
            branch: "RELEASE-2.0".into(),
        };
        assert_eq!(
            err.to_string(),
            "Duplicate alias 'REL' for 'RELEASE-1.0' and 'RELEASE-2.0'"
        );
    }
}
