//! Class Graph - arena storage for class declarations and inheritance edges.
//!
//! Uses `petgraph::DiGraph` with:
//! - Nodes: [`ClassDecl`] (immutable once registered)
//! - Edges: [`BaseEdge`] from a derived class to each of its direct bases
//!
//! Nodes are addressed by `NodeIndex`, never by pointers, so a hierarchy
//! with diamonds is still a plain DAG. Traversal state (visiting sets,
//! seen-virtual sets) always lives in the caller's stack frame, which keeps
//! concurrent read-only walks independent.

use hierarch_core::{ClassDecl, LookupError, RegistrationError};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::{FxHashMap, FxHashSet};

/// Edge from a derived class to one of its direct bases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseEdge {
    /// Whether the base is inherited virtually.
    pub is_virtual: bool,
    /// Position of the base in the derived class's base list.
    pub position: usize,
}

/// One inheritance edge reachable from a class, by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InheritanceEdge {
    pub derived: String,
    pub base: String,
    pub is_virtual: bool,
}

/// The transitive closure of inheritance edges reachable from one class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InheritanceClosure {
    /// The class the closure was computed for.
    pub root: String,
    /// Every reachable edge exactly once, in pre-order.
    pub edges: Vec<InheritanceEdge>,
    /// Every proper ancestor exactly once, in pre-order of first reach.
    pub ancestors: Vec<String>,
}

impl InheritanceClosure {
    /// Whether `name` is a proper ancestor of the root.
    pub fn contains(&self, name: &str) -> bool {
        self.ancestors.iter().any(|a| a == name)
    }

    /// Edges that point at `base`.
    pub fn edges_to<'a>(&'a self, base: &'a str) -> impl Iterator<Item = &'a InheritanceEdge> + 'a {
        self.edges.iter().filter(move |e| e.base == base)
    }
}

/// Walk state for closure computation.
#[derive(Default)]
struct ClosureWalk {
    visiting: FxHashSet<NodeIndex>,
    done: FxHashSet<NodeIndex>,
    stack: Vec<NodeIndex>,
    edges: Vec<InheritanceEdge>,
    ancestors: Vec<String>,
}

/// The inheritance graph - a pure fact base of registered classes.
#[derive(Debug, Default, Clone)]
pub struct ClassGraph {
    /// Directed graph, derived -> base.
    graph: DiGraph<ClassDecl, BaseEdge>,
    /// Name -> node.
    index: FxHashMap<String, NodeIndex>,
}

impl ClassGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Register a class. Its bases must already be registered.
    ///
    /// Fails with `DuplicateClass` if the name exists, `DuplicateBase` if the
    /// base list repeats a class, and `UnknownBase` if a base is missing.
    /// On failure the graph is unchanged.
    pub fn register(&mut self, decl: ClassDecl) -> Result<NodeIndex, RegistrationError> {
        if self.index.contains_key(&decl.name) {
            return Err(RegistrationError::DuplicateClass(decl.name));
        }
        check_distinct_bases(&decl)?;

        let mut base_nodes = Vec::with_capacity(decl.bases.len());
        for base in &decl.bases {
            let node = self
                .index
                .get(&base.name)
                .copied()
                .ok_or_else(|| RegistrationError::UnknownBase {
                    class: decl.name.clone(),
                    base: base.name.clone(),
                })?;
            base_nodes.push((node, base.is_virtual));
        }

        tracing::debug!(
            class = %decl.name,
            bases = decl.bases.len(),
            members = decl.members.len(),
            "registered class"
        );

        let name = decl.name.clone();
        let node = self.graph.add_node(decl);
        for (position, (base, is_virtual)) in base_nodes.into_iter().enumerate() {
            let edge = BaseEdge {
                is_virtual,
                position,
            };
            self.graph.add_edge(node, base, edge);
        }
        self.index.insert(name, node);
        Ok(node)
    }

    /// Register a batch of classes given in any order.
    ///
    /// The whole batch is validated first (duplicates, unknown bases,
    /// cycles); nothing is inserted unless every declaration is valid.
    /// Classes are then inserted base-before-derived.
    pub fn register_all(
        &mut self,
        decls: impl IntoIterator<Item = ClassDecl>,
    ) -> Result<Vec<NodeIndex>, RegistrationError> {
        let mut batch: FxHashMap<String, ClassDecl> = FxHashMap::default();
        let mut order_in: Vec<String> = Vec::new();

        for decl in decls {
            if self.index.contains_key(&decl.name) || batch.contains_key(&decl.name) {
                return Err(RegistrationError::DuplicateClass(decl.name));
            }
            check_distinct_bases(&decl)?;
            order_in.push(decl.name.clone());
            batch.insert(decl.name.clone(), decl);
        }

        for name in &order_in {
            let decl = &batch[name];
            if let Some(base) = decl
                .bases
                .iter()
                .find(|b| !self.index.contains_key(&b.name) && !batch.contains_key(&b.name))
            {
                return Err(RegistrationError::UnknownBase {
                    class: decl.name.clone(),
                    base: base.name.clone(),
                });
            }
        }

        let mut sorted = Vec::with_capacity(order_in.len());
        let mut visiting: Vec<String> = Vec::new();
        let mut done: FxHashSet<String> = FxHashSet::default();
        for name in &order_in {
            topo_visit(name, &batch, &mut visiting, &mut done, &mut sorted)?;
        }

        let mut nodes = Vec::with_capacity(sorted.len());
        for name in sorted {
            if let Some(decl) = batch.remove(&name) {
                nodes.push(self.register(decl)?);
            }
        }
        Ok(nodes)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Node for a class name.
    pub fn node(&self, name: &str) -> Option<NodeIndex> {
        self.index.get(name).copied()
    }

    /// Declaration for a class name.
    pub fn get(&self, name: &str) -> Option<&ClassDecl> {
        self.node(name).map(|n| &self.graph[n])
    }

    /// Declaration for a node.
    ///
    /// # Panics
    ///
    /// Panics if `node` was not produced by this graph.
    pub fn decl(&self, node: NodeIndex) -> &ClassDecl {
        &self.graph[node]
    }

    /// Check if a class is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Number of registered classes.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// Whether no class is registered.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// All registered classes in registration order.
    pub fn classes(&self) -> impl Iterator<Item = &ClassDecl> {
        self.graph.node_weights()
    }

    /// Direct bases of a class, in base-list order.
    pub fn bases(&self, node: NodeIndex) -> Vec<(NodeIndex, BaseEdge)> {
        let mut bases: Vec<_> = self
            .graph
            .edges(node)
            .map(|edge| (edge.target(), *edge.weight()))
            .collect();
        bases.sort_by_key(|(_, edge)| edge.position);
        bases
    }

    /// Transitive closure of inheritance edges reachable from `name`.
    ///
    /// Fails with `UnknownClass` if `name` is not registered and with
    /// `CyclicInheritance` if a walked edge returns to a class that is still
    /// being visited.
    pub fn graph_of(&self, name: &str) -> Result<InheritanceClosure, LookupError> {
        let root = self
            .node(name)
            .ok_or_else(|| LookupError::UnknownClass(name.to_string()))?;

        let mut walk = ClosureWalk::default();
        self.walk_closure(root, &mut walk)?;

        Ok(InheritanceClosure {
            root: name.to_string(),
            edges: walk.edges,
            ancestors: walk.ancestors,
        })
    }

    /// Whether `ancestor` is a proper base (direct or indirect) of `derived`.
    pub fn is_base_of(&self, ancestor: &str, derived: &str) -> Result<bool, LookupError> {
        Ok(self.graph_of(derived)?.contains(ancestor))
    }

    fn walk_closure(&self, node: NodeIndex, walk: &mut ClosureWalk) -> Result<(), LookupError> {
        walk.visiting.insert(node);
        walk.stack.push(node);

        for (base, edge) in self.bases(node) {
            walk.edges.push(InheritanceEdge {
                derived: self.graph[node].name.clone(),
                base: self.graph[base].name.clone(),
                is_virtual: edge.is_virtual,
            });

            if walk.visiting.contains(&base) {
                return Err(LookupError::CyclicInheritance {
                    path: self.cycle_path(&walk.stack, base),
                });
            }
            if !walk.done.contains(&base) {
                walk.ancestors.push(self.graph[base].name.clone());
                self.walk_closure(base, walk)?;
            }
        }

        walk.stack.pop();
        walk.visiting.remove(&node);
        walk.done.insert(node);
        Ok(())
    }

    fn cycle_path(&self, stack: &[NodeIndex], back_to: NodeIndex) -> Vec<String> {
        let start = stack.iter().position(|&n| n == back_to).unwrap_or(0);
        stack[start..]
            .iter()
            .chain(std::iter::once(&back_to))
            .map(|&n| self.graph[n].name.clone())
            .collect()
    }
}

fn check_distinct_bases(decl: &ClassDecl) -> Result<(), RegistrationError> {
    let mut seen = FxHashSet::default();
    for base in &decl.bases {
        if !seen.insert(base.name.as_str()) {
            return Err(RegistrationError::DuplicateBase {
                class: decl.name.clone(),
                base: base.name.clone(),
            });
        }
    }
    Ok(())
}

/// Depth-first topological visit over a pending batch. Bases outside the
/// batch are already registered and end the walk.
fn topo_visit(
    name: &str,
    batch: &FxHashMap<String, ClassDecl>,
    visiting: &mut Vec<String>,
    done: &mut FxHashSet<String>,
    sorted: &mut Vec<String>,
) -> Result<(), RegistrationError> {
    if done.contains(name) {
        return Ok(());
    }
    if let Some(start) = visiting.iter().position(|v| v == name) {
        let mut path = visiting[start..].to_vec();
        path.push(name.to_string());
        return Err(RegistrationError::CyclicInheritance { path });
    }
    let Some(decl) = batch.get(name) else {
        return Ok(());
    };

    visiting.push(name.to_string());
    for base in &decl.bases {
        topo_visit(&base.name, batch, visiting, done, sorted)?;
    }
    visiting.pop();

    done.insert(name.to_string());
    sorted.push(name.to_string());
    Ok(())
}
