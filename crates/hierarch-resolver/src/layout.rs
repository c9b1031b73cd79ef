//! Object layout resolution.
//!
//! Computes, for a most-derived class, the base sub-objects its objects
//! contain. Every non-virtual base edge materializes its own sub-object.
//! Every virtual base edge to the same class shares one sub-object across
//! the whole hierarchy.
//!
//! ## Algorithm
//!
//! 1. Materialize the complete object as instance 0.
//! 2. Walk the inheritance graph pre-order in base-list order.
//! 3. A virtual edge to a class already materialized as virtual links the
//!    existing instance and does not descend again.
//! 4. Any other edge materializes a new instance and descends into it.
//! 5. Depths are recomputed breadth-first so each instance records its
//!    shortest distance from the complete object.

use std::collections::VecDeque;
use std::fmt;

use hierarch_core::LookupError;
use hierarch_registry::{ClassGraph, NodeIndex};
use rustc_hash::FxHashMap;

/// Index of an instance within its [`Layout`].
pub type InstanceId = usize;

/// One materialized copy of a class inside a complete object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutInstance {
    /// Position in the layout; 0 is the complete object.
    pub id: InstanceId,
    /// Class this sub-object is an instance of.
    pub class: String,
    /// Graph node of the class.
    pub node: NodeIndex,
    /// Whether this is the shared instance of a virtual base.
    pub is_virtual: bool,
    /// Instance this one was first reached from.
    pub parent: Option<InstanceId>,
    /// Shortest number of inheritance edges from the complete object.
    pub depth: usize,
}

impl fmt::Display for LayoutInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_virtual {
            write!(f, "virtual ")?;
        }
        write!(f, "{}#{}", self.class, self.id)
    }
}

/// The sub-object layout of one most-derived class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    instances: Vec<LayoutInstance>,
    /// Direct sub-objects of each instance, in base-list order. A shared
    /// virtual instance appears under every instance that names it.
    children: Vec<Vec<InstanceId>>,
}

struct LayoutBuilder<'g> {
    graph: &'g ClassGraph,
    instances: Vec<LayoutInstance>,
    children: Vec<Vec<InstanceId>>,
    shared_virtual_seen: FxHashMap<NodeIndex, InstanceId>,
}

impl LayoutBuilder<'_> {
    fn materialize(
        &mut self,
        node: NodeIndex,
        is_virtual: bool,
        parent: Option<InstanceId>,
    ) -> InstanceId {
        let id = self.instances.len();
        let depth = parent.map_or(0, |p| self.instances[p].depth + 1);
        self.instances.push(LayoutInstance {
            id,
            class: self.graph.decl(node).name.clone(),
            node,
            is_virtual,
            parent,
            depth,
        });
        self.children.push(Vec::new());
        id
    }

    fn expand(&mut self, id: InstanceId, node: NodeIndex) {
        for (base, edge) in self.graph.bases(node) {
            if edge.is_virtual {
                if let Some(&shared) = self.shared_virtual_seen.get(&base) {
                    tracing::trace!(
                        from = %self.instances[id],
                        base = %self.instances[shared],
                        "virtual base already materialized"
                    );
                    self.children[id].push(shared);
                    continue;
                }
                let shared = self.materialize(base, true, Some(id));
                self.shared_virtual_seen.insert(base, shared);
                self.children[id].push(shared);
                self.expand(shared, base);
            } else {
                let inst = self.materialize(base, false, Some(id));
                self.children[id].push(inst);
                self.expand(inst, base);
            }
        }
    }

    fn finish(mut self) -> Layout {
        let mut depth = vec![usize::MAX; self.instances.len()];
        let mut queue = VecDeque::from([0]);
        depth[0] = 0;
        while let Some(id) = queue.pop_front() {
            for &child in &self.children[id] {
                if depth[child] == usize::MAX {
                    depth[child] = depth[id] + 1;
                    queue.push_back(child);
                }
            }
        }
        for (inst, d) in self.instances.iter_mut().zip(depth) {
            inst.depth = d;
        }

        Layout {
            instances: self.instances,
            children: self.children,
        }
    }
}

impl Layout {
    /// Compute the layout of `class`.
    ///
    /// Fails with `UnknownClass` for unregistered classes and with
    /// `CyclicInheritance` if the graph is not a DAG.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compute(graph: &ClassGraph, class: &str) -> Result<Self, LookupError> {
        // Validates the class and rules out cycles before the unguarded walk.
        graph.graph_of(class)?;
        let root = graph
            .node(class)
            .ok_or_else(|| LookupError::UnknownClass(class.to_string()))?;

        let mut builder = LayoutBuilder {
            graph,
            instances: Vec::new(),
            children: Vec::new(),
            shared_virtual_seen: FxHashMap::default(),
        };
        let complete = builder.materialize(root, false, None);
        builder.expand(complete, root);
        let layout = builder.finish();

        tracing::debug!(
            class,
            instances = layout.instances.len(),
            "computed layout"
        );
        Ok(layout)
    }

    /// The most-derived class.
    pub fn class(&self) -> &str {
        &self.instances[0].class
    }

    /// The complete object (instance 0).
    pub fn complete_object(&self) -> &LayoutInstance {
        &self.instances[0]
    }

    /// Every instance, complete object first, then bases in pre-order.
    pub fn instances(&self) -> &[LayoutInstance] {
        &self.instances
    }

    /// Base sub-objects only.
    pub fn base_instances(&self) -> &[LayoutInstance] {
        &self.instances[1..]
    }

    /// Get an instance by id.
    pub fn get(&self, id: InstanceId) -> Option<&LayoutInstance> {
        self.instances.get(id)
    }

    /// Every instance of `class`, in layout order.
    pub fn instances_of<'a>(
        &'a self,
        class: &'a str,
    ) -> impl Iterator<Item = &'a LayoutInstance> + 'a {
        self.instances.iter().filter(move |i| i.class == class)
    }

    /// Number of sub-objects of `class` (the complete object counts for its own class).
    pub fn count_of(&self, class: &str) -> usize {
        self.instances_of(class).count()
    }

    /// Direct sub-objects of an instance.
    pub fn direct_bases(&self, id: InstanceId) -> &[InstanceId] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `id` and every sub-object it contains, each once, in pre-order.
    pub fn subtree(&self, id: InstanceId) -> Vec<InstanceId> {
        let mut seen = vec![false; self.instances.len()];
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if current >= seen.len() || seen[current] {
                continue;
            }
            seen[current] = true;
            out.push(current);
            stack.extend(self.direct_bases(current).iter().rev());
        }
        out
    }

    /// Whether `inner` is a proper sub-object of `outer`.
    pub fn contains(&self, outer: InstanceId, inner: InstanceId) -> bool {
        outer != inner && self.subtree(outer).contains(&inner)
    }
}
