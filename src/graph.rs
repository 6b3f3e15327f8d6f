//! petgraph-based view of a validated branch graph.

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Bfs, EdgeRef};

use crate::parse::types::{BranchDefinition, BranchGraphDefinition, BranchSpecDefinition, EdgeDefinition};
use crate::validate::{NameTable, ValidatedDefinitions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowKind {
    /// Changes may integrate along this edge.
    Flow,
    /// Changes integrate along this edge unconditionally.
    ForceFlow,
}

/// A fully validated branch graph, ready for the bot runtime.
///
/// Nodes are canonical (upper-cased) branch names.
#[derive(Debug, Clone)]
pub struct BranchGraph {
    pub definition: BranchGraphDefinition,
    pub names: NameTable,
    pub graph: DiGraph<String, FlowKind>,
    pub node_indices: HashMap<String, NodeIndex>,
    branch_rows: HashMap<String, usize>,
}

impl BranchGraph {
    pub fn build(validated: ValidatedDefinitions) -> Self {
        let ValidatedDefinitions {
            definition,
            names,
            flows,
        } = validated;

        let mut graph = DiGraph::new();
        let mut node_indices = HashMap::new();
        let mut branch_rows = HashMap::new();

        for (row, def) in definition.branches.iter().enumerate() {
            let upper = def.upper_name();
            if !node_indices.contains_key(&upper) {
                node_indices.insert(upper.clone(), graph.add_node(upper.clone()));
                branch_rows.insert(upper, row);
            }
        }

        for (def, resolved) in definition.branches.iter().zip(&flows) {
            let Some(&from) = node_indices.get(&def.upper_name()) else {
                continue;
            };
            for target in &resolved.flows_to {
                let Some(&to) = node_indices.get(target) else {
                    continue;
                };
                let kind = if resolved.force_flow_to.contains(target) {
                    FlowKind::ForceFlow
                } else {
                    FlowKind::Flow
                };
                graph.add_edge(from, to, kind);
            }
        }

        BranchGraph {
            definition,
            names,
            graph,
            node_indices,
            branch_rows,
        }
    }

    /// Canonical name for a branch name or alias, in any case.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.names.resolve(name)
    }

    pub fn branch(&self, name: &str) -> Option<&BranchDefinition> {
        let canonical = self.resolve(name)?;
        let &row = self.branch_rows.get(canonical)?;
        self.definition.branches.get(row)
    }

    pub fn branches(&self) -> &[BranchDefinition] {
        &self.definition.branches
    }

    /// Every branch `name` flows to, in declaration order.
    pub fn flows_from(&self, name: &str) -> Vec<&str> {
        self.targets(name, |_| true)
    }

    /// The subset of [`Self::flows_from`] that is force-flowed.
    pub fn force_flows_from(&self, name: &str) -> Vec<&str> {
        self.targets(name, |kind| kind == FlowKind::ForceFlow)
    }

    /// Every branch that flows into `name`.
    pub fn flows_into(&self, name: &str) -> Vec<&str> {
        let Some(idx) = self.index_of(name) else {
            return vec![];
        };
        let mut edges: Vec<_> = self.graph.edges_directed(idx, Direction::Incoming).collect();
        edges.sort_by_key(|e| e.id());
        edges
            .into_iter()
            .map(|e| self.graph[e.source()].as_str())
            .collect()
    }

    /// All branches reachable from `name` by following flows, excluding itself.
    pub fn downstream(&self, name: &str) -> Vec<&str> {
        let Some(start) = self.index_of(name) else {
            return vec![];
        };
        let mut reached = Vec::new();
        let mut bfs = Bfs::new(&self.graph, start);
        while let Some(nx) = bfs.next(&self.graph) {
            if nx != start {
                reached.push(self.graph[nx].as_str());
            }
        }
        reached
    }

    /// The edge override record for a pair, if one was declared.
    pub fn edge_between(&self, from: &str, to: &str) -> Option<&EdgeDefinition> {
        let from = self.resolve(from)?;
        let to = self.resolve(to)?;
        self.definition.edges.iter().find(|edge| {
            self.resolve(&edge.from) == Some(from) && self.resolve(&edge.to) == Some(to)
        })
    }

    pub fn branchspec(&self, name: &str) -> Option<&BranchSpecDefinition> {
        self.definition
            .branchspecs
            .iter()
            .find(|spec| spec.name.eq_ignore_ascii_case(name))
    }

    fn index_of(&self, name: &str) -> Option<NodeIndex> {
        self.node_indices.get(self.resolve(name)?).copied()
    }

    fn targets(&self, name: &str, keep: impl Fn(FlowKind) -> bool) -> Vec<&str> {
        let Some(idx) = self.index_of(name) else {
            return vec![];
        };
        let mut edges: Vec<_> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .filter(|e| keep(*e.weight()))
            .collect();
        edges.sort_by_key(|e| e.id());
        edges
            .into_iter()
            .map(|e| self.graph[e.target()].as_str())
            .collect()
    }
}
