//! Branch graph definition compiler for a multi-stream integration bot.
//!
//! A definition document declares branches, flows between them, per-edge
//! overrides, branchspecs and bot-wide defaults. [`parse_and_validate`] reads
//! it leniently, merges the defaults, resolves names and aliases, locates
//! each branch's stream and checks every cross-reference, reporting all
//! problems it can find in one pass.

pub mod error;
pub mod graph;
pub mod parse;
pub mod stream;
pub mod validate;
pub mod wasm;

pub use error::{DefinitionError, Phase};
pub use graph::{BranchGraph, FlowKind};
pub use parse::{BotConfig, BranchGraphDefinition};
pub use stream::{FnCatalog, StreamCatalog, StreamResult, resolve_stream};

/// Outcome of compiling one definition document.
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// `None` whenever `errors` is non-empty.
    pub graph: Option<BranchGraph>,
    /// Best-effort config. After a malformed `macros` value or a syntax error
    /// this is the default config.
    pub config: BotConfig,
    /// Every problem, in discovery order.
    pub errors: Vec<DefinitionError>,
}

impl ParseResult {
    fn rejected(config: BotConfig, errors: Vec<DefinitionError>) -> Self {
        ParseResult {
            graph: None,
            config,
            errors,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.graph.is_some()
    }

    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    pub fn into_result(self) -> Result<(BranchGraph, BotConfig), Vec<DefinitionError>> {
        match self.graph {
            Some(graph) if self.errors.is_empty() => Ok((graph, self.config)),
            _ => Err(self.errors),
        }
    }
}

/// Compile a branch definition document against a stream catalog.
pub fn parse_and_validate<C: StreamCatalog + ?Sized>(text: &str, catalog: &C) -> ParseResult {
    let doc = match parse::parse_document(text) {
        Ok(doc) => doc,
        Err(e) => return ParseResult::rejected(BotConfig::default(), vec![e]),
    };

    let (config, mut errors) = match parse::extract_config(&doc) {
        Ok(merged) => merged,
        Err(e) => return ParseResult::rejected(BotConfig::default(), vec![e]),
    };

    let validated = match validate::validate_definitions(&doc, &config, catalog, &mut errors) {
        Ok(validated) => validated,
        Err(fatal) => {
            errors.push(fatal);
            tracing::warn!(errors = errors.len(), "branch definitions aborted");
            return ParseResult::rejected(config, errors);
        }
    };

    if !errors.is_empty() {
        for e in &errors {
            tracing::debug!(code = e.code(), phase = %e.phase(), "{}", e);
        }
        tracing::warn!(errors = errors.len(), "branch definitions rejected");
        return ParseResult::rejected(config, errors);
    }

    let graph = BranchGraph::build(validated);
    tracing::debug!(
        branches = graph.node_indices.len(),
        flows = graph.graph.edge_count(),
        "branch definitions validated"
    );
    ParseResult {
        graph: Some(graph),
        config,
        errors,
    }
}

/// Like [`parse_and_validate`], but appends rendered messages to a
/// caller-owned list instead of returning typed errors.
pub fn parse_and_validate_into<C: StreamCatalog + ?Sized>(
    out_errors: &mut Vec<String>,
    text: &str,
    catalog: &C,
) -> (Option<BranchGraph>, BotConfig) {
    let result = parse_and_validate(text, catalog);
    out_errors.extend(result.messages());
    (result.graph, result.config)
}
