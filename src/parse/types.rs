//! Typed records for the branch definition document.
//!
//! The document is first read into a `serde_json::Value` tree; the records in
//! this module are the projection targets for individual entries of the
//! `branches`, `edges` and `branchspecs` arrays. Keys are camelCase, as
//! operators write them.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Treat an explicit `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// SHARED SHAPES
// =============================================================================

/// Either a single tag or a list of tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Visibility {
    Tags(Vec<String>),
    Single(String),
}

impl Default for Visibility {
    fn default() -> Self {
        Visibility::Tags(vec!["fte".to_string()])
    }
}

/// `lastGoodCLPath` is either a changelist number or a path to read one from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChangelistRef {
    Number(u64),
    Path(String),
}

/// A list of branch names or aliases, as written in `flowsTo` / `forceFlowTo`.
///
/// Anything that is not an array of strings is kept verbatim so the flow
/// validator can report it instead of the whole branch failing to load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NameList {
    Names(Vec<String>),
    Malformed(Value),
}

impl NameList {
    pub fn names(&self) -> Option<&[String]> {
        match self {
            NameList::Names(names) => Some(names),
            NameList::Malformed(_) => None,
        }
    }
}

// =============================================================================
// INTEGRATION WINDOWS
// =============================================================================

/// A recurring time range. No days means every day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationWindowPane {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_of_the_week: Option<Vec<String>>,
    #[serde(rename = "startHourUTC")]
    pub start_hour_utc: u32,
    pub duration_hours: u32,
}

/// Options shared by branches and edges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonOptions {
    #[serde(default, rename = "lastGoodCLPath", skip_serializing_if = "Option::is_none")]
    pub last_good_cl_path: Option<ChangelistRef>,
    #[serde(default, rename = "pauseCISUnlessAtGate", deserialize_with = "null_as_default")]
    pub pause_cis_unless_at_gate: bool,
    #[serde(default, rename = "initialCL", skip_serializing_if = "Option::is_none")]
    pub initial_cl: Option<u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub force_pause: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub disallow_skip: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub incognito_mode: bool,
    /// Completely overrides the bot-wide list when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_authors: Option<Vec<String>>,
    /// By default the windows allow gate catch-ups; inverted, they forbid them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integration_window: Option<Vec<IntegrationWindowPane>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub invert_integration_window: bool,
}

// =============================================================================
// BRANCHES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchDefinition {
    pub name: String,

    // Stream location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_depot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_subpath: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_name_override: Option<String>,

    // Naming and flow
    #[serde(default, deserialize_with = "null_as_default")]
    pub aliases: Vec<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub flows_to: Option<NameList>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub force_flow_to: Option<NameList>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub default_flow: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub block_asset_flow: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub disallow_deadend: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ignore_branchspecs: bool,

    // Behaviour
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integration_method: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub disabled: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub force_all: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_default_bot: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolver: Option<String>,

    // Notification and presentation
    /// Completely overrides the bot-wide setting when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_on_blockage: Option<bool>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notify: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub whitelist: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_slack_channel_for_blockages: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph_node_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge_project: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge_url_override: Option<String>,

    #[serde(flatten)]
    pub options: CommonOptions,
}

impl BranchDefinition {
    /// The name this branch is registered under in the name table.
    pub fn upper_name(&self) -> String {
        self.name.to_uppercase()
    }

    /// The stream name used when synthesizing the branch's stream path.
    pub fn stream_leaf(&self) -> &str {
        match self.stream_name.as_deref() {
            Some(stream) if !stream.is_empty() => stream,
            _ => &self.name,
        }
    }
}

// =============================================================================
// EDGES AND BRANCHSPECS
// =============================================================================

/// Per-pair override record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeDefinition {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_slack_channel: Option<String>,
    /// Changes go along terminal edges but no further.
    #[serde(default, deserialize_with = "null_as_default")]
    pub terminal: bool,
    #[serde(flatten)]
    pub options: CommonOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BranchSpecDefinition {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub from: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub to: String,
}

/// The three top-level collections of a definition document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BranchGraphDefinition {
    pub branches: Vec<BranchDefinition>,
    #[serde(default)]
    pub edges: Vec<EdgeDefinition>,
    #[serde(default)]
    pub branchspecs: Vec<BranchSpecDefinition>,
}
