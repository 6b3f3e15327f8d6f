//! Check that every branch's stream can be located and exists.

use crate::error::DefinitionError;
use crate::parse::config::BotConfig;
use crate::parse::types::BranchDefinition;
use crate::stream::{StreamCatalog, resolve_stream};

pub fn validate_streams<C: StreamCatalog + ?Sized>(
    branches: &[BranchDefinition],
    config: &BotConfig,
    catalog: &C,
    errors: &mut Vec<DefinitionError>,
) {
    for def in branches {
        if super::names::check_name(&def.name).is_err() {
            continue;
        }

        let depot = def
            .stream_depot
            .as_deref()
            .filter(|d| !d.is_empty())
            .or(config.default_stream_depot.as_deref());

        match resolve_stream(
            def.stream_leaf(),
            def.root_path.as_deref(),
            depot,
            def.stream_subpath.as_deref(),
        ) {
            Ok(result) => {
                if let Some(stream) = result.stream {
                    if !catalog.has(&stream) {
                        errors.push(DefinitionError::StreamNotFound(stream));
                    }
                }
            }
            Err(e) => errors.push(e),
        }
    }
}
