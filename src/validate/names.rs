//! Branch name rules and the case-insensitive name/alias table.

use std::collections::{BTreeMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use super::options::{check_integration_method, validate_common_options};
use crate::error::DefinitionError;
use crate::parse::config::BotConfig;
use crate::parse::types::BranchDefinition;

const RESERVED_BRANCH_NAMES: [&str; 5] = ["NONE", "DEFAULT", "IGNORE", "DEADEND", ""];

fn branch_name_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^[-a-zA-Z0-9_.]+$").expect("branch name regex must compile"))
}

/// Check a branch name or alias against the naming rules.
pub fn check_name(name: &str) -> Result<(), DefinitionError> {
    if !branch_name_regex().is_match(name) {
        // The empty string never matches, so it is reported as reserved below.
        if !name.is_empty() {
            return Err(DefinitionError::InvalidName(name.to_string()));
        }
    }

    let upper = name.to_uppercase();
    if RESERVED_BRANCH_NAMES.contains(&upper.as_str()) {
        return Err(DefinitionError::ReservedName(name.to_string()));
    }
    Ok(())
}

/// Upper-cased name or alias → upper-cased canonical branch name.
///
/// The first registration of a key wins; later attempts never overwrite it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameTable {
    entries: BTreeMap<String, String>,
}

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a name or alias in any case to its canonical branch name.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.entries.get(&name.to_uppercase()).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names and aliases in sorted order, with their canonical names.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Every key that maps to `canonical`, excluding the canonical name itself.
    pub fn aliases_of<'a>(&'a self, canonical: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |(k, v)| v.as_str() == canonical && k.as_str() != canonical)
            .map(|(k, _)| k.as_str())
    }

    /// Register `key` unless it is already present. Returns the canonical name
    /// the key maps to after the call.
    fn register(&mut self, key: String, canonical: &str) -> &str {
        self.entries
            .entry(key)
            .or_insert_with(|| canonical.to_string())
            .as_str()
    }
}

/// First pass: project raw branch entries into typed definitions and register
/// their names.
///
/// Entries that cannot be read at all are dropped. Entries with a bad name are
/// kept but not registered. Case-only duplicates are reported once per
/// repeat and keep the first registration.
pub fn collect_branches(
    raw: &[Value],
    names: &mut NameTable,
    errors: &mut Vec<DefinitionError>,
) -> Vec<BranchDefinition> {
    let mut branches = Vec::with_capacity(raw.len());

    for entry in raw {
        let Some(name) = entry
            .get("name")
            .and_then(Value::as_str)
            .filter(|n| !n.is_empty())
        else {
            errors.push(DefinitionError::UnnamedBranch(entry.to_string()));
            continue;
        };

        let def = match serde_json::from_value::<BranchDefinition>(entry.clone()) {
            Ok(def) => def,
            Err(e) => {
                errors.push(DefinitionError::MalformedBranch {
                    name: name.to_string(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        if let Err(e) = check_name(&def.name) {
            errors.push(e);
            branches.push(def);
            continue;
        }

        let upper = def.upper_name();
        if names.contains(&upper) {
            errors.push(DefinitionError::DuplicateName(upper));
        } else {
            names.register(upper.clone(), &upper);
        }
        branches.push(def);
    }

    branches
}

/// Second pass: register aliases (and stream names, unless suppressed) for
/// every validly named branch, then check per-branch options for every
/// branch in the list.
///
/// The ignore list is checked once per canonical name, against the record
/// that won registration. Alias problems are collected; an unknown
/// integration window day aborts.
pub fn register_aliases(
    branches: &mut [BranchDefinition],
    config: &BotConfig,
    names: &mut NameTable,
    errors: &mut Vec<DefinitionError>,
) -> Result<(), DefinitionError> {
    let mut seen = HashSet::new();

    for def in branches.iter_mut() {
        if check_name(&def.name).is_ok() {
            let upper = def.upper_name();

            if seen.insert(upper.clone()) && config.is_ignored(&upper) {
                errors.push(DefinitionError::BranchIgnored(upper.clone()));
            }

            for alias in &def.aliases {
                add_alias(&upper, alias.to_uppercase(), config, names, errors);
            }

            if let Some(stream) = def.stream_name.as_deref() {
                if !stream.is_empty() && !config.no_stream_aliases {
                    add_alias(&upper, stream.to_uppercase(), config, names, errors);
                }
            }
        }

        if let Some(method) = def.integration_method.as_deref() {
            check_integration_method(method, &def.name, errors);
        }

        validate_common_options(&mut def.options)?;
    }
    Ok(())
}

fn add_alias(
    upper_branch: &str,
    upper_alias: String,
    config: &BotConfig,
    names: &mut NameTable,
    errors: &mut Vec<DefinitionError>,
) {
    if config.is_ignored(&upper_alias) {
        errors.push(DefinitionError::AliasIgnored(upper_alias.clone()));
    }

    if upper_alias.is_empty() {
        errors.push(DefinitionError::EmptyAlias(upper_branch.to_string()));
        return;
    }

    if let Err(e) = check_name(&upper_alias) {
        errors.push(e);
        return;
    }

    let existing = names.register(upper_alias.clone(), upper_branch);
    if existing != upper_branch {
        errors.push(DefinitionError::DuplicateAlias {
            existing: existing.to_string(),
            alias: upper_alias,
            branch: upper_branch.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> Vec<Value> {
        value.as_array().cloned().unwrap_or_default()
    }

    #[test]
    fn names_that_pass() {
        for name in ["Main", "Release-5.0", "dev_engine", "a.b.c", "NONEOFTHEABOVE"] {
            assert_eq!(check_name(name), Ok(()), "{}", name);
        }
    }

    #[test]
    fn reserved_names_any_case() {
        for name in ["none", "Default", "IGNORE", "deadEnd", ""] {
            assert!(
                matches!(check_name(name), Err(DefinitionError::ReservedName(_))),
                "{}",
                name
            );
        }
    }

    #[test]
    fn badly_formed_names() {
        for name in ["Dev Main", "Main/Sub", "dev+1"] {
            assert_eq!(
                check_name(name),
                Err(DefinitionError::InvalidName(name.to_string()))
            );
        }
    }

    #[test]
    fn unnamed_entries_are_dropped() {
        let mut names = NameTable::new();
        let mut errors = vec![];
        let branches = collect_branches(
            &raw(json!([{"rootPath": "//a/b/..."}, {"name": "Main"}])),
            &mut names,
            &mut errors,
        );
        assert_eq!(branches.len(), 1);
        assert_eq!(
            errors[0].to_string(),
            r#"Unable to parse branch definition: {"rootPath":"//a/b/..."}"#
        );
    }

    #[test]
    fn invalid_name_is_kept_but_not_registered() {
        let mut names = NameTable::new();
        let mut errors = vec![];
        let branches = collect_branches(&raw(json!([{"name": "Bad Name"}])), &mut names, &mut errors);
        assert_eq!(branches.len(), 1);
        assert!(names.is_empty());
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn duplicate_names_keep_first() {
        let mut names = NameTable::new();
        let mut errors = vec![];
        let branches = collect_branches(
            &raw(json!([{"name": "Main"}, {"name": "MAIN"}])),
            &mut names,
            &mut errors,
        );
        assert_eq!(branches.len(), 2);
        assert_eq!(errors, vec![DefinitionError::DuplicateName("MAIN".into())]);
        assert_eq!(names.resolve("main"), Some("MAIN"));
        assert_eq!(names.len(), 1);
    }

    #[test]
    fn aliases_resolve_and_collide() {
        let config = BotConfig::default();
        let mut names = NameTable::new();
        let mut errors = vec![];
        let mut branches = collect_branches(
            &raw(json!([
                {"name": "Main", "aliases": ["trunk", "main"]},
                {"name": "Dev", "aliases": ["Trunk"]}
            ])),
            &mut names,
            &mut errors,
        );
        register_aliases(&mut branches, &config, &mut names, &mut errors).unwrap();

        assert_eq!(names.resolve("Trunk"), Some("MAIN"));
        assert_eq!(names.aliases_of("MAIN").collect::<Vec<_>>(), vec!["TRUNK"]);
        assert_eq!(
            errors,
            vec![DefinitionError::DuplicateAlias {
                alias: "TRUNK".into(),
                existing: "MAIN".into(),
                branch: "DEV".into(),
            }]
        );
    }

    #[test]
    fn stream_name_is_an_implicit_alias() {
        let mut config = BotConfig::default();
        let mut names = NameTable::new();
        let mut errors = vec![];
        let mut branches = collect_branches(
            &raw(json!([{"name": "Main", "streamName": "Main-Stream"}])),
            &mut names,
            &mut errors,
        );
        register_aliases(&mut branches, &config, &mut names, &mut errors).unwrap();
        assert_eq!(names.resolve("main-stream"), Some("MAIN"));

        config.no_stream_aliases = true;
        let mut names = NameTable::new();
        collect_branches(
            &raw(json!([{"name": "Main", "streamName": "Main-Stream"}])),
            &mut names,
            &mut errors,
        );
        register_aliases(&mut branches, &config, &mut names, &mut errors).unwrap();
        assert_eq!(names.resolve("main-stream"), None);
        assert!(errors.is_empty());
    }

    #[test]
    fn options_checked_for_badly_named_branches() {
        let config = BotConfig::default();
        let mut names = NameTable::new();
        let mut errors = vec![];
        let mut branches = collect_branches(
            &raw(json!([{
                "name": "Bad Name",
                "integrationMethod": "bogus",
                "integrationWindow": [{"daysOfTheWeek": ["Friday"], "startHourUTC": 1, "durationHours": 2}]
            }])),
            &mut names,
            &mut errors,
        );
        register_aliases(&mut branches, &config, &mut names, &mut errors).unwrap();
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            vec![
                "Names must be alphanumeric, dash, underscore or dot: 'Bad Name'",
                "Unknown integrationMethod 'bogus' in 'Bad Name'",
            ]
        );
        let days = branches[0].options.integration_window.as_ref().unwrap()[0]
            .days_of_the_week
            .clone();
        assert_eq!(days, Some(vec!["fri".to_string()]));
    }

    #[test]
    fn unknown_day_on_badly_named_branch_aborts() {
        let mut names = NameTable::new();
        let mut errors = vec![];
        let mut branches = collect_branches(
            &raw(json!([{
                "name": "Bad Name",
                "integrationWindow": [{"daysOfTheWeek": ["Funday"], "startHourUTC": 1, "durationHours": 2}]
            }])),
            &mut names,
            &mut errors,
        );
        let err = register_aliases(&mut branches, &BotConfig::default(), &mut names, &mut errors)
            .unwrap_err();
        assert_eq!(err, DefinitionError::UnknownDayOfWeek("Funday".into()));
    }

    #[test]
    fn ignored_duplicate_reported_once() {
        let config = BotConfig {
            branch_names_to_ignore: vec!["LEGACY".into()],
            ..Default::default()
        };
        let mut names = NameTable::new();
        let mut errors = vec![];
        let mut branches = collect_branches(
            &raw(json!([{"name": "Legacy"}, {"name": "LEGACY"}])),
            &mut names,
            &mut errors,
        );
        register_aliases(&mut branches, &config, &mut names, &mut errors).unwrap();
        assert_eq!(
            errors,
            vec![
                DefinitionError::DuplicateName("LEGACY".into()),
                DefinitionError::BranchIgnored("LEGACY".into()),
            ]
        );
    }

    #[test]
    fn alias_problems() {
        let config = BotConfig {
            branch_names_to_ignore: vec!["OLD".into()],
            ..Default::default()
        };
        let mut names = NameTable::new();
        let mut errors = vec![];
        let mut branches = collect_branches(
            &raw(json!([{"name": "Main", "aliases": ["old", "", "has space"]}])),
            &mut names,
            &mut errors,
        );
        register_aliases(&mut branches, &config, &mut names, &mut errors).unwrap();
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            vec![
                "OLD alias is in branchNamesToIgnore",
                "Empty alias for 'MAIN'",
                "Names must be alphanumeric, dash, underscore or dot: 'HAS SPACE'",
            ]
        );
    }
}
