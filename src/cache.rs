//! Shared cache of computed layouts.

use std::sync::Arc;

use hierarch_core::LookupError;
use hierarch_registry::ClassGraph;
use hierarch_resolver::Layout;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// Layouts keyed by most-derived class, computed on first use.
///
/// Every caller asking for the same class receives the same `Arc<Layout>`.
/// Entries are never evicted: registering a class never changes the layout
/// of one already registered.
#[derive(Debug, Default)]
pub struct LayoutCache {
    layouts: RwLock<FxHashMap<String, Arc<Layout>>>,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached layout of `class`, if one was computed.
    pub fn get(&self, class: &str) -> Option<Arc<Layout>> {
        self.layouts.read().get(class).cloned()
    }

    /// The layout of `class` in `graph`, computed and cached on a miss.
    ///
    /// When two threads miss at once, both compute and the first insert
    /// wins; both callers get the winning `Arc`.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn get_or_compute(
        &self,
        graph: &ClassGraph,
        class: &str,
    ) -> Result<Arc<Layout>, LookupError> {
        if let Some(layout) = self.get(class) {
            return Ok(layout);
        }

        let layout = Arc::new(Layout::compute(graph, class)?);
        let mut layouts = self.layouts.write();
        Ok(Arc::clone(layouts.entry(class.to_string()).or_insert(layout)))
    }

    /// Number of cached layouts.
    pub fn len(&self) -> usize {
        self.layouts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
