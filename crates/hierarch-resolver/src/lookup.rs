//! Member name lookup over an object layout.
//!
//! ## Policy
//!
//! 1. Collect every sub-object of the layout whose class declares the name.
//! 2. Drop each declaration that sits inside another declaring sub-object.
//!    The enclosing declaration shadows it on every path.
//! 3. One survivor is the answer (`Hidden` if step 2 dropped anything,
//!    `Unique` otherwise). Several survivors are `Ambiguous`, even when
//!    their signatures are identical. A name collision is enough.
//!
//! Because a virtual base is one shared sub-object, reaching it through
//! several paths does not by itself make a lookup ambiguous.

use std::fmt;

use hierarch_core::{LookupError, ResolutionVerdict};
use hierarch_registry::ClassGraph;

use crate::layout::{InstanceId, Layout, LayoutInstance};

/// A member name as declared in one sub-object.
///
/// For functions this denotes the whole overload set the declaring class
/// declares under that name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberRef {
    /// The sub-object the declaration belongs to.
    pub instance: InstanceId,
    /// Declaring class.
    pub class: String,
    /// Member name.
    pub member: String,
}

impl fmt::Display for MemberRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.class, self.member)
    }
}

fn member_ref(instance: &LayoutInstance, member: &str) -> MemberRef {
    MemberRef {
        instance: instance.id,
        class: instance.class.clone(),
        member: member.to_string(),
    }
}

/// Declaring sub-objects among `scope`, in layout order.
fn declaring<'l>(
    graph: &ClassGraph,
    layout: &'l Layout,
    scope: &[InstanceId],
    member: &str,
) -> Vec<&'l LayoutInstance> {
    let mut found: Vec<_> = scope
        .iter()
        .filter_map(|&id| layout.get(id))
        .filter(|inst| graph.decl(inst.node).declares(member))
        .collect();
    found.sort_by_key(|inst| inst.id);
    found
}

/// Split declarations into those not contained in another declaring
/// sub-object and those that are.
fn partition_dominance<'l>(
    layout: &Layout,
    found: &[&'l LayoutInstance],
) -> (Vec<&'l LayoutInstance>, Vec<&'l LayoutInstance>) {
    found.iter().copied().partition(|candidate| {
        !found
            .iter()
            .any(|other| layout.contains(other.id, candidate.id))
    })
}

/// Unqualified lookup of `member` in the class `layout` was computed for.
///
/// Fails with `UnknownMember` when no class in the hierarchy declares the
/// name. Ambiguity is a verdict, not an error.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn lookup(
    graph: &ClassGraph,
    layout: &Layout,
    member: &str,
) -> Result<ResolutionVerdict<MemberRef>, LookupError> {
    let scope: Vec<_> = (0..layout.instances().len()).collect();
    let found = declaring(graph, layout, &scope, member);
    if found.is_empty() {
        return Err(LookupError::UnknownMember {
            class: layout.class().to_string(),
            member: member.to_string(),
        });
    }

    let (survivors, shadowed) = partition_dominance(layout, &found);
    let verdict = match survivors.as_slice() {
        [winner] if shadowed.is_empty() => ResolutionVerdict::Unique(member_ref(winner, member)),
        [winner] => ResolutionVerdict::Hidden {
            winner: member_ref(winner, member),
            shadowed: shadowed.iter().map(|i| member_ref(i, member)).collect(),
        },
        _ => {
            let candidates = survivors.iter().map(|i| member_ref(i, member)).collect();
            ResolutionVerdict::Ambiguous(candidates)
        }
    };

    tracing::debug!(class = layout.class(), member, %verdict, "member lookup");
    Ok(verdict)
}

/// Lookup of `qualifier::member` in the class `layout` was computed for.
///
/// The qualifier pins the search to the first sub-object of that class in
/// layout order, and to what it contains. Never ambiguous. When several
/// declarations in the pinned subtree survive dominance, the first in layout
/// order is chosen.
///
/// Fails with `NotABase` when the qualifier is neither the class itself nor
/// one of its bases, and with `UnknownMember` when nothing in the pinned
/// subtree declares the name.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn lookup_qualified(
    graph: &ClassGraph,
    layout: &Layout,
    qualifier: &str,
    member: &str,
) -> Result<ResolutionVerdict<MemberRef>, LookupError> {
    let Some(pinned) = layout.instances_of(qualifier).next() else {
        return Err(LookupError::NotABase {
            class: layout.class().to_string(),
            qualifier: qualifier.to_string(),
        });
    };

    let scope = layout.subtree(pinned.id);
    let found = declaring(graph, layout, &scope, member);
    let (survivors, _) = partition_dominance(layout, &found);

    let Some(winner) = survivors.first() else {
        return Err(LookupError::UnknownMember {
            class: qualifier.to_string(),
            member: member.to_string(),
        });
    };

    let verdict = ResolutionVerdict::Unique(member_ref(winner, member));
    tracing::debug!(class = layout.class(), qualifier, member, %verdict, "qualified member lookup");
    Ok(verdict)
}
