//! Resolution verdicts.
//!
//! Ambiguity and no-match are expected outcomes of name lookup and overload
//! resolution, so they are returned as data rather than as errors. The
//! caller decides what an ambiguous access means for its program.

use std::fmt;

/// Outcome of a member lookup or overload resolution query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionVerdict<T> {
    /// Exactly one declaration matched.
    Unique(T),
    /// Several declarations matched and none is preferred.
    /// Listed in a deterministic order.
    Ambiguous(Vec<T>),
    /// One declaration matched and it hides same-named declarations in bases.
    Hidden {
        /// The declaration that wins.
        winner: T,
        /// The declarations it hides.
        shadowed: Vec<T>,
    },
    /// Nothing matched.
    NoMatch,
}

impl<T> ResolutionVerdict<T> {
    /// Check if resolution found exactly one match with nothing hidden.
    pub fn is_unique(&self) -> bool {
        matches!(self, ResolutionVerdict::Unique(_))
    }

    /// Check if resolution was ambiguous.
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, ResolutionVerdict::Ambiguous(_))
    }

    /// Check if the winner hides base declarations.
    pub fn is_hidden(&self) -> bool {
        matches!(self, ResolutionVerdict::Hidden { .. })
    }

    /// Check if nothing matched.
    pub fn is_no_match(&self) -> bool {
        matches!(self, ResolutionVerdict::NoMatch)
    }

    /// The selected declaration for `Unique` and `Hidden`.
    pub fn winner(&self) -> Option<&T> {
        match self {
            ResolutionVerdict::Unique(v) | ResolutionVerdict::Hidden { winner: v, .. } => Some(v),
            _ => None,
        }
    }

    /// Convert to Option, returning the selected declaration if there is one.
    pub fn ok(self) -> Option<T> {
        match self {
            ResolutionVerdict::Unique(v) | ResolutionVerdict::Hidden { winner: v, .. } => Some(v),
            _ => None,
        }
    }

    /// The competing declarations of an ambiguous verdict; empty otherwise.
    pub fn candidates(&self) -> &[T] {
        match self {
            ResolutionVerdict::Ambiguous(v) => v,
            _ => &[],
        }
    }

    /// Map every carried declaration.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> ResolutionVerdict<U> {
        match self {
            ResolutionVerdict::Unique(v) => ResolutionVerdict::Unique(f(v)),
            ResolutionVerdict::Ambiguous(v) => {
                ResolutionVerdict::Ambiguous(v.into_iter().map(f).collect())
            }
            ResolutionVerdict::Hidden { winner, shadowed } => ResolutionVerdict::Hidden {
                winner: f(winner),
                shadowed: shadowed.into_iter().map(f).collect(),
            },
            ResolutionVerdict::NoMatch => ResolutionVerdict::NoMatch,
        }
    }
}

impl<T: fmt::Display> fmt::Display for ResolutionVerdict<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |items: &[T]| {
            items
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };
        match self {
            ResolutionVerdict::Unique(v) => write!(f, "unique: {v}"),
            ResolutionVerdict::Ambiguous(v) => write!(f, "ambiguous: {}", join(v)),
            ResolutionVerdict::Hidden { winner, shadowed } => {
                write!(f, "hidden: {winner} hides {}", join(shadowed))
            }
            ResolutionVerdict::NoMatch => write!(f, "no match"),
        }
    }
}
