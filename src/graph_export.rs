//! Graph export for visualizing container wiring.
//!
//! A [`GraphSnapshot`] captures the registered objects and the edges between
//! them: fields already injected point at the object they received, fields not
//! yet wired point at the object their requested name refers to. Snapshots
//! render to Graphviz DOT, Mermaid, JSON and YAML.

use std::collections::BTreeMap;
use std::fmt::Write as _;

#[cfg(feature = "graph-export")]
use serde::{Deserialize, Serialize};

use crate::container::build_graph;
use crate::error::DiResult;
use crate::registration::{ObjectRecord, Registry};
use crate::strategy::StrategyRegistry;
use crate::Container;

const FORMAT_VERSION: &str = "1.0.0";

/// A registered object.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "graph-export", derive(Serialize, Deserialize))]
pub struct GraphNode {
    /// Registration name
    pub id: String,
    pub type_name: String,
    /// Registration order
    pub order: usize,
    /// Fully wired and after-inject hook succeeded
    pub complete: bool,
    /// Capability types beyond the concrete one
    pub capabilities: Vec<String>,
    pub metadata: BTreeMap<String, String>,
}

/// A field of `from` referencing `to`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "graph-export", derive(Serialize, Deserialize))]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    pub field: String,
    pub dependency_type: DependencyType,
    /// The field was assigned by an injection pass
    pub wired: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "graph-export", derive(Serialize, Deserialize))]
pub enum DependencyType {
    Required,
    Optional,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "graph-export", derive(Serialize, Deserialize))]
pub struct GraphMetadata {
    pub object_count: usize,
    pub edge_count: usize,
    pub has_cycle: bool,
    pub exported_at: String,
    pub version: String,
}

/// Export formats supported for snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// JSON for tooling
    Json,
    /// YAML for humans
    Yaml,
    /// DOT for Graphviz
    Dot,
    /// Mermaid for documentation
    Mermaid,
}

/// Point-in-time view of a container's objects and their dependencies.
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::graph_export::{ExportFormat, GraphSnapshot};
/// use ferrous_inject::{Container, Declarations, Inject, Injectable};
/// use std::sync::Arc;
///
/// struct Config;
/// impl Injectable for Config {}
///
/// #[derive(Default)]
/// struct Server {
///     config: Inject<Config>,
/// }
/// impl Injectable for Server {
///     fn declare(decl: &mut Declarations<Self>) {
///         decl.field("config", |s| &s.config).named("config");
///     }
/// }
///
/// let container = Container::new();
/// container.register("config", Arc::new(Config)).unwrap();
/// container.register("server", Arc::new(Server::default())).unwrap();
///
/// let snapshot = GraphSnapshot::capture(&container);
/// assert_eq!(snapshot.nodes.len(), 2);
/// assert_eq!(snapshot.edges[0].from, "server");
/// assert_eq!(snapshot.edges[0].to, "config");
///
/// let dot = snapshot.export(ExportFormat::Dot).unwrap();
/// assert!(dot.contains("\"server\" -> \"config\""));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "graph-export", derive(Serialize, Deserialize))]
pub struct GraphSnapshot {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub metadata: GraphMetadata,
}

impl GraphSnapshot {
    /// Captures the current state of `container`.
    pub fn capture(container: &Container) -> Self {
        let strategies = container.strategies();
        container.with_registry(|registry| Self::from_registry(registry, strategies))
    }

    pub(crate) fn from_registry(registry: &Registry, strategies: &StrategyRegistry) -> Self {
        let nodes: Vec<GraphNode> = registry.iter().map(node_of).collect();

        let mut edges = Vec::new();
        for record in registry.iter() {
            for field in record.descriptor().fields() {
                let (target, wired) = match field.resolved().and_then(|order| registry.by_order(order)) {
                    Some(target) => (Some(target), true),
                    None if strategies.get(field.strategy()).consults_names() => {
                        (registry.get(field.requested_name()), false)
                    }
                    None => (None, false),
                };
                let Some(target) = target else { continue };
                edges.push(GraphEdge {
                    from: record.name().to_string(),
                    to: target.name().to_string(),
                    field: field.field_name().to_string(),
                    dependency_type: if field.is_required() {
                        DependencyType::Required
                    } else {
                        DependencyType::Optional
                    },
                    wired,
                });
            }
        }

        let metadata = GraphMetadata {
            object_count: nodes.len(),
            edge_count: edges.len(),
            has_cycle: build_graph(registry, strategies).topological_order().is_err(),
            exported_at: timestamp(),
            version: FORMAT_VERSION.to_string(),
        };

        Self { nodes, edges, metadata }
    }

    /// Renders the snapshot in `format`.
    pub fn export(&self, format: ExportFormat) -> DiResult<String> {
        match format {
            ExportFormat::Json => self.to_json(),
            ExportFormat::Yaml => self.to_yaml(),
            ExportFormat::Dot => Ok(self.to_dot()),
            ExportFormat::Mermaid => Ok(self.to_mermaid()),
        }
    }

    fn to_json(&self) -> DiResult<String> {
        #[cfg(feature = "graph-export")]
        {
            serde_json::to_string_pretty(self).map_err(|e| crate::DiError::Export(e.to_string()))
        }
        #[cfg(not(feature = "graph-export"))]
        {
            let mut json = String::from("{\n  \"nodes\": [");
            for (i, node) in self.nodes.iter().enumerate() {
                json.push_str(if i == 0 { "\n" } else { ",\n" });
                let _ = write!(
                    json,
                    "    {{\"id\": {}, \"type_name\": {}, \"order\": {}, \"complete\": {}}}",
                    quote(&node.id),
                    quote(&node.type_name),
                    node.order,
                    node.complete
                );
            }
            json.push_str("\n  ],\n  \"edges\": [");
            for (i, edge) in self.edges.iter().enumerate() {
                json.push_str(if i == 0 { "\n" } else { ",\n" });
                let _ = write!(
                    json,
                    "    {{\"from\": {}, \"to\": {}, \"field\": {}, \"dependency_type\": \"{:?}\", \"wired\": {}}}",
                    quote(&edge.from),
                    quote(&edge.to),
                    quote(&edge.field),
                    edge.dependency_type,
                    edge.wired
                );
            }
            let _ = write!(
                json,
                "\n  ],\n  \"metadata\": {{\"object_count\": {}, \"edge_count\": {}, \"has_cycle\": {}, \"exported_at\": {}, \"version\": {}}}\n}}",
                self.metadata.object_count,
                self.metadata.edge_count,
                self.metadata.has_cycle,
                quote(&self.metadata.exported_at),
                quote(&self.metadata.version)
            );
            Ok(json)
        }
    }

    fn to_yaml(&self) -> DiResult<String> {
        #[cfg(feature = "graph-export")]
        {
            serde_yaml::to_string(self).map_err(|e| crate::DiError::Export(e.to_string()))
        }
        #[cfg(not(feature = "graph-export"))]
        {
            let mut yaml = String::from("nodes:\n");
            for node in &self.nodes {
                let _ = writeln!(yaml, "- id: {}", quote(&node.id));
                let _ = writeln!(yaml, "  type_name: {}", quote(&node.type_name));
                let _ = writeln!(yaml, "  order: {}", node.order);
                let _ = writeln!(yaml, "  complete: {}", node.complete);
            }
            yaml.push_str("edges:\n");
            for edge in &self.edges {
                let _ = writeln!(yaml, "- from: {}", quote(&edge.from));
                let _ = writeln!(yaml, "  to: {}", quote(&edge.to));
                let _ = writeln!(yaml, "  field: {}", quote(&edge.field));
                let _ = writeln!(yaml, "  dependency_type: {:?}", edge.dependency_type);
                let _ = writeln!(yaml, "  wired: {}", edge.wired);
            }
            yaml.push_str("metadata:\n");
            let _ = writeln!(yaml, "  object_count: {}", self.metadata.object_count);
            let _ = writeln!(yaml, "  edge_count: {}", self.metadata.edge_count);
            let _ = writeln!(yaml, "  has_cycle: {}", self.metadata.has_cycle);
            let _ = writeln!(yaml, "  exported_at: {}", quote(&self.metadata.exported_at));
            let _ = writeln!(yaml, "  version: {}", quote(&self.metadata.version));
            Ok(yaml)
        }
    }

    fn to_dot(&self) -> String {
        let mut out = String::from("digraph Container {\n  rankdir=LR;\n  node [shape=box];\n\n");
        for node in &self.nodes {
            let fill = if node.complete { "lightgreen" } else { "white" };
            let _ = writeln!(
                out,
                "  {} [label={}, fillcolor={}, style=filled];",
                quote(&node.id),
                quote(&format!("{}\n{}", node.id, short_type(&node.type_name))),
                fill
            );
        }
        out.push('\n');
        for edge in &self.edges {
            let style = match edge.dependency_type {
                DependencyType::Required => "solid",
                DependencyType::Optional => "dashed",
            };
            let _ = writeln!(
                out,
                "  {} -> {} [label={}, style={}];",
                quote(&edge.from),
                quote(&edge.to),
                quote(&edge.field),
                style
            );
        }
        out.push_str("}\n");
        out
    }

    // Mermaid ids are restricted, so nodes are keyed by registration order.
    fn to_mermaid(&self) -> String {
        let mut out = String::from("graph TD\n");
        let id_of = |name: &str| {
            self.nodes
                .iter()
                .find(|n| n.id == name)
                .map(|n| format!("n{}", n.order))
                .unwrap_or_default()
        };

        for node in &self.nodes {
            let _ = writeln!(out, "  n{}[\"{}\"]", node.order, node.id.replace('"', "#quot;"));
        }
        for edge in &self.edges {
            let arrow = match edge.dependency_type {
                DependencyType::Required => "-->",
                DependencyType::Optional => "-.->",
            };
            let _ = writeln!(
                out,
                "  {} {}|{}| {}",
                id_of(&edge.from),
                arrow,
                edge.field,
                id_of(&edge.to)
            );
        }

        out.push_str("\n  classDef complete fill:#e8f5e8\n");
        for node in self.nodes.iter().filter(|n| n.complete) {
            let _ = writeln!(out, "  class n{} complete", node.order);
        }
        out
    }
}

impl Container {
    /// Captures a [`GraphSnapshot`] and renders it in `format`.
    pub fn export_graph(&self, format: ExportFormat) -> DiResult<String> {
        GraphSnapshot::capture(self).export(format)
    }
}

fn node_of(record: &ObjectRecord) -> GraphNode {
    let descriptor = record.descriptor();
    let mut metadata = BTreeMap::new();
    metadata.insert("fields".to_string(), descriptor.fields().len().to_string());
    if descriptor.has_before_hook() {
        metadata.insert("before_inject".to_string(), "true".to_string());
    }
    if descriptor.has_after_hook() {
        metadata.insert("after_inject".to_string(), "true".to_string());
    }

    GraphNode {
        id: record.name().to_string(),
        type_name: descriptor.type_key().display_name().to_string(),
        order: record.order(),
        complete: record.is_complete(),
        capabilities: descriptor
            .capabilities()
            .skip(1)
            .map(|key| key.display_name().to_string())
            .collect(),
        metadata,
    }
}

// Last path segment of each type in `name`: `app::db::Pool` becomes `Pool`.
fn short_type(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut segment = String::new();
    for c in name.chars() {
        if c.is_alphanumeric() || c == '_' || c == ':' {
            segment.push(c);
        } else {
            out.push_str(segment.rsplit("::").next().unwrap_or(&segment));
            segment.clear();
            out.push(c);
        }
    }
    out.push_str(segment.rsplit("::").next().unwrap_or(&segment));
    out
}

// Double-quoted string with backslash escapes, valid in JSON, YAML and DOT.
fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn timestamp() -> String {
    #[cfg(feature = "graph-export")]
    {
        chrono::Utc::now().to_rfc3339()
    }
    #[cfg(not(feature = "graph-export"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_type_keeps_generics_readable() {
        assert_eq!(short_type("app::db::Pool"), "Pool");
        assert_eq!(short_type("dyn app::Greeter"), "dyn Greeter");
        assert_eq!(short_type("alloc::vec::Vec<app::User>"), "Vec<User>");
    }

    #[test]
    fn quote_escapes_control_characters() {
        assert_eq!(quote("a\"b"), "\"a\\\"b\"");
        assert_eq!(quote("line\nnext"), "\"line\\nnext\"");
        assert_eq!(quote("\u{1}"), "\"\\u0001\"");
    }
}
