use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{AnalysisError, Result};

use super::{Argument, Relation, RelationType};

/// One node in node-link form, carrying the full argument record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphNode {
    pub id: usize,
    pub argument: Argument,
}

/// One directed edge in node-link form
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphLink {
    pub source: usize,
    pub target: usize,
    #[serde(rename = "type")]
    pub relation_type: RelationType,
}

/// Directed argument graph in node-link form.
///
/// Node ids are exactly the dense argument ids 0..n-1. Edges are not
/// deduplicated: a duplicate or self-referential relation is accepted with a
/// warning, while an out-of-range endpoint fails assembly outright.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArgumentGraph {
    pub directed: bool,
    pub multigraph: bool,
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

impl ArgumentGraph {
    pub fn new() -> Self {
        Self {
            directed: true,
            multigraph: false,
            nodes: Vec::new(),
            links: Vec::new(),
        }
    }

    /// Add a node keyed by the argument's id
    pub fn add_node(&mut self, argument: Argument) {
        self.nodes.push(GraphNode {
            id: argument.id,
            argument,
        });
    }

    /// Add a directed edge, validating that both endpoints resolve to
    /// existing nodes. An out-of-range endpoint is a contract violation, not
    /// something to silently skip.
    pub fn add_edge(&mut self, relation: &Relation) -> Result<()> {
        for endpoint in [relation.source, relation.target] {
            if !self.nodes.iter().any(|n| n.id == endpoint) {
                return Err(AnalysisError::Integrity(format!(
                    "relation {} -> {} references unknown argument id {} ({} nodes present)",
                    relation.source,
                    relation.target,
                    endpoint,
                    self.nodes.len()
                )));
            }
        }

        if relation.source == relation.target {
            warn!(
                "self-referential relation on argument {}",
                relation.source
            );
        }
        if self.has_edge(relation.source, relation.target, relation.relation_type) {
            warn!(
                "duplicate {} relation {} -> {}",
                relation.relation_type, relation.source, relation.target
            );
        }

        self.links.push(GraphLink {
            source: relation.source,
            target: relation.target,
            relation_type: relation.relation_type,
        });
        Ok(())
    }

    pub fn has_edge(&self, source: usize, target: usize, relation_type: RelationType) -> bool {
        self.links
            .iter()
            .any(|l| l.source == source && l.target == target && l.relation_type == relation_type)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.links.len()
    }
}

impl Default for ArgumentGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// The full persisted artifact for one input fingerprint. Created once,
/// read-only afterward, retrieved verbatim on repeat requests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Analysis {
    pub arguments: Vec<Argument>,
    pub graph: ArgumentGraph,
}
