//! Bot-wide configuration and its merge from the definition document.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::types::Visibility;
use crate::error::DefinitionError;
use crate::validate::options::check_integration_method;

/// Document keys that are copied onto [`BotConfig`].
pub const CONFIG_KEYS: &[&str] = &[
    "defaultStreamDepot",
    "defaultIntegrationMethod",
    "isDefaultBot",
    "noStreamAliases",
    "globalNotify",
    "emailOnBlockage",
    "checkIntervalSecs",
    "excludeAuthors",
    "visibility",
    "slackChannel",
    "reportToBuildHealth",
    "mirrorPath",
    "alias",
    "emailDomainWhitelist",
    "branchNamesToIgnore",
    "macros",
    "badgeUrlOverride",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotConfig {
    pub default_stream_depot: Option<String>,
    pub default_integration_method: Option<String>,
    pub is_default_bot: bool,
    pub no_stream_aliases: bool,
    pub global_notify: Vec<String>,
    pub email_on_blockage: bool,
    pub check_interval_secs: f64,
    pub exclude_authors: Vec<String>,
    pub visibility: Visibility,
    pub slack_channel: String,
    pub report_to_build_health: bool,
    pub mirror_path: Vec<String>,
    /// Masks the bot's name in commands.
    pub alias: String,
    pub email_domain_whitelist: Vec<String>,
    /// Upper-cased once merged.
    pub branch_names_to_ignore: Vec<String>,
    /// Lower-cased macro name to its lines.
    pub macros: BTreeMap<String, Vec<String>>,
    pub badge_url_override: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        BotConfig {
            default_stream_depot: None,
            default_integration_method: None,
            is_default_bot: false,
            no_stream_aliases: false,
            global_notify: vec![],
            email_on_blockage: true,
            check_interval_secs: 30.0,
            exclude_authors: vec![],
            visibility: Visibility::default(),
            slack_channel: String::new(),
            report_to_build_health: false,
            mirror_path: vec![],
            alias: String::new(),
            email_domain_whitelist: vec![],
            branch_names_to_ignore: vec![],
            macros: BTreeMap::new(),
            badge_url_override: String::new(),
        }
    }
}

impl BotConfig {
    /// Copy every recognised key present in `doc` onto this config.
    ///
    /// Values of the wrong type are reported and leave the default in place.
    /// A malformed `macros` value is the one fatal case and is returned as
    /// `Err`.
    pub fn merge_document(
        &mut self,
        doc: &Map<String, Value>,
    ) -> Result<Vec<DefinitionError>, DefinitionError> {
        let mut errors = Vec::new();

        for &key in CONFIG_KEYS {
            let Some(value) = doc.get(key) else { continue };
            if key == "macros" {
                self.macros = parse_macros(value)?;
                continue;
            }
            if let Err(reason) = self.set(key, value) {
                errors.push(DefinitionError::InvalidConfigValue {
                    key: key.to_string(),
                    reason,
                });
            }
        }

        self.branch_names_to_ignore = self
            .branch_names_to_ignore
            .iter()
            .map(|name| name.to_uppercase())
            .collect();

        if let Some(method) = self.default_integration_method.as_deref().filter(|m| !m.is_empty()) {
            check_integration_method(method, "config", &mut errors);
        }

        Ok(errors)
    }

    /// Whether an upper-cased name appears in `branchNamesToIgnore`.
    pub fn is_ignored(&self, upper_name: &str) -> bool {
        self.branch_names_to_ignore.iter().any(|n| n == upper_name)
    }

    fn set(&mut self, key: &str, value: &Value) -> Result<(), String> {
        match key {
            "defaultStreamDepot" => self.default_stream_depot = project(value)?,
            "defaultIntegrationMethod" => self.default_integration_method = project(value)?,
            "isDefaultBot" => self.is_default_bot = project(value)?,
            "noStreamAliases" => self.no_stream_aliases = project(value)?,
            "globalNotify" => self.global_notify = project(value)?,
            "emailOnBlockage" => self.email_on_blockage = project(value)?,
            "checkIntervalSecs" => self.check_interval_secs = project(value)?,
            "excludeAuthors" => self.exclude_authors = project(value)?,
            "visibility" => self.visibility = project(value)?,
            "slackChannel" => self.slack_channel = project(value)?,
            "reportToBuildHealth" => self.report_to_build_health = project(value)?,
            "mirrorPath" => self.mirror_path = project(value)?,
            "alias" => self.alias = project(value)?,
            "emailDomainWhitelist" => self.email_domain_whitelist = project(value)?,
            "branchNamesToIgnore" => self.branch_names_to_ignore = project(value)?,
            "badgeUrlOverride" => self.badge_url_override = project(value)?,
            _ => {}
        }
        Ok(())
    }
}

fn project<T: DeserializeOwned>(value: &Value) -> Result<T, String> {
    T::deserialize(value).map_err(|e| e.to_string())
}

/// Lower-case macro names, accepting only a map of string arrays.
pub fn parse_macros(value: &Value) -> Result<BTreeMap<String, Vec<String>>, DefinitionError> {
    let invalid = || DefinitionError::InvalidMacros(value.to_string());

    let Value::Object(entries) = value else {
        return Err(invalid());
    };

    let mut macros = BTreeMap::new();
    for (name, lines) in entries {
        let Value::Array(lines) = lines else {
            return Err(invalid());
        };
        let lines = lines
            .iter()
            .map(|line| line.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(invalid)?;
        macros.insert(name.to_lowercase(), lines);
    }
    Ok(macros)
}

/// Build the bot config for a document.
///
/// On a malformed `macros` value the returned error is fatal and the caller
/// should fall back to `BotConfig::default()`.
pub fn extract_config(
    doc: &Map<String, Value>,
) -> Result<(BotConfig, Vec<DefinitionError>), DefinitionError> {
    let mut config = BotConfig::default();
    let errors = config.merge_document(doc)?;
    Ok((config, errors))
}
