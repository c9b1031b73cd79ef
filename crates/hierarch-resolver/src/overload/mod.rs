//! Overload resolution for function and constructor calls.
//!
//! Selects the best matching callable from a candidate set based on the
//! reference category of each parameter, the value category of each
//! argument, and the conversions the arguments need.
//!
//! ## Algorithm
//!
//! 1. Drop non-callables, and `explicit` candidates when the call is not a
//!    direct initialization
//! 2. Filter candidates by argument count
//! 3. Rank each parameter/argument pair; an illegal binding eliminates the
//!    whole candidate
//! 4. Sum the per-parameter costs and select the strictly cheapest candidate
//! 5. Report ties as ambiguous and an empty viable set as no match
//!
//! ## Binding ranks
//!
//! | Parameter   | lvalue argument              | xvalue / prvalue argument |
//! |-------------|------------------------------|---------------------------|
//! | `T&&`       | illegal                      | 0                         |
//! | `T&`        | 0                            | 1 if `const T&`, else illegal |
//! | `T`         | 2                            | 2                         |

mod ranking;

pub use ranking::find_best_match;

use std::fmt;

use hierarch_core::{
    Argument, CallSite, MemberDecl, ParamSpec, RefCategory, ResolutionVerdict, TypeHash,
};

use crate::conversion::{ConversionKind, ConversionRules};

/// Rank of a reference binding directly to an argument of matching category.
pub const RANK_EXACT_BINDING: u32 = 0;
/// Rank of a `const T&` binding a temporary.
pub const RANK_CONST_REF_TEMPORARY: u32 = 1;
/// Rank of a by-value parameter.
pub const RANK_BY_VALUE: u32 = 2;

/// How one argument binds to its parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgBinding {
    /// Reference-category rank.
    pub rank: u32,
    /// Type conversion applied to the argument.
    pub conversion: ConversionKind,
    /// Rank plus conversion cost.
    pub cost: u32,
}

/// A viable candidate with its binding costs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverloadMatch {
    /// The matched declaration.
    pub candidate: MemberDecl,
    /// Identity of the matched declaration.
    pub func_hash: TypeHash,
    /// One binding per argument, in call order.
    pub arg_bindings: Vec<ArgBinding>,
    /// Total cost (lower is better).
    pub total_cost: u32,
}

impl fmt::Display for OverloadMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.candidate)
    }
}

/// Resolve a call against a candidate set.
///
/// The verdict does not depend on the order of `candidates`.
///
/// # Arguments
///
/// * `candidates` - Declarations sharing the called name
/// * `call` - Arguments and initialization context at the call site
/// * `rules` - Conversions allowed between differing types
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn resolve_overload<R: ConversionRules + ?Sized>(
    candidates: &[MemberDecl],
    call: &CallSite,
    rules: &R,
) -> ResolutionVerdict<OverloadMatch> {
    let viable: Vec<_> = candidates
        .iter()
        .filter(|c| c.is_callable())
        .filter(|c| call.direct || !c.is_explicit())
        .filter(|c| c.arity() == call.arity())
        .filter_map(|c| try_match_candidate(c, &call.args, rules))
        .collect();

    let verdict = find_best_match(viable);
    tracing::debug!(
        call = %call,
        candidates = candidates.len(),
        %verdict,
        "overload resolution"
    );
    verdict
}

/// Try to match arguments against a candidate.
///
/// Returns `None` if any argument cannot bind to its parameter.
fn try_match_candidate<R: ConversionRules + ?Sized>(
    candidate: &MemberDecl,
    args: &[Argument],
    rules: &R,
) -> Option<OverloadMatch> {
    let mut arg_bindings = Vec::with_capacity(args.len());
    let mut total_cost = 0u32;

    for (param, arg) in candidate.params.iter().zip(args) {
        let Some(binding) = bind_argument(param, arg, rules) else {
            tracing::trace!(candidate = %candidate, param = %param, arg = %arg, "illegal binding");
            return None;
        };
        total_cost += binding.cost;
        arg_bindings.push(binding);
    }

    tracing::trace!(candidate = %candidate, total_cost, "viable candidate");
    Some(OverloadMatch {
        candidate: candidate.clone(),
        func_hash: candidate.hash(),
        arg_bindings,
        total_cost,
    })
}

/// Rank a single parameter/argument pair.
fn bind_argument<R: ConversionRules + ?Sized>(
    param: &ParamSpec,
    arg: &Argument,
    rules: &R,
) -> Option<ArgBinding> {
    let conversion = rules.convert(&arg.type_name, &param.type_name)?;
    let rvalue = arg.category.is_rvalue();

    let rank = match param.ref_category {
        // An rvalue reference never binds an lvalue.
        RefCategory::RValueRef if !rvalue => return None,
        RefCategory::RValueRef => RANK_EXACT_BINDING,
        RefCategory::LValueRef if !rvalue && conversion.binds_reference_directly() => {
            RANK_EXACT_BINDING
        }
        // Anything else needs a temporary, which only `const T&` accepts.
        RefCategory::LValueRef if param.is_const => RANK_CONST_REF_TEMPORARY,
        RefCategory::LValueRef => return None,
        RefCategory::ByValue => RANK_BY_VALUE,
    };

    Some(ArgBinding {
        rank,
        conversion,
        cost: rank + conversion.cost(),
    })
}
