//! Conversion rules aware of the class hierarchy.

use hierarch_registry::ClassGraph;
use hierarch_resolver::{ConversionKind, ConversionRules, StandardConversions};

use crate::cache::LayoutCache;

/// Standard conversions plus derived-to-base.
///
/// A derived class converts to a base only when the base sub-object is
/// unambiguous, i.e. the derived class's layout holds exactly one instance
/// of it. Layouts come from, and land in, the shared [`LayoutCache`].
#[derive(Debug, Clone, Copy)]
pub struct HierarchyConversions<'g> {
    graph: &'g ClassGraph,
    layouts: &'g LayoutCache,
}

impl<'g> HierarchyConversions<'g> {
    pub fn new(graph: &'g ClassGraph, layouts: &'g LayoutCache) -> Self {
        Self { graph, layouts }
    }

    fn derived_to_base(&self, from: &str, to: &str) -> Option<ConversionKind> {
        if !self.graph.is_base_of(to, from).ok()? {
            return None;
        }
        let layout = self.layouts.get_or_compute(self.graph, from).ok()?;
        (layout.count_of(to) == 1).then_some(ConversionKind::DerivedToBase)
    }
}

impl ConversionRules for HierarchyConversions<'_> {
    fn convert(&self, from: &str, to: &str) -> Option<ConversionKind> {
        StandardConversions
            .convert(from, to)
            .or_else(|| self.derived_to_base(from, to))
    }
}
