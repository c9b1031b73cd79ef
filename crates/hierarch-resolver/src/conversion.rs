//! Type conversion rules consulted by overload resolution.
//!
//! Overload resolution only needs to know whether an argument of one type
//! can initialize a parameter of another, and whether a reference can bind
//! the argument directly. [`ConversionRules`] answers both.
//!
//! ## Conversion Priority
//!
//! 1. Identity (same type name)
//! 2. Arithmetic (between built-in arithmetic types)
//! 3. Derived to base (provided by rules that know the class graph)

use std::fmt;

/// Extra cost added to a parameter's rank when its argument needs a
/// non-identity conversion.
pub const COST_CONVERSION: u32 = 3;

/// Built-in arithmetic types.
const ARITHMETIC_TYPES: &[&str] = &[
    "bool",
    "char",
    "signed char",
    "unsigned char",
    "short",
    "unsigned short",
    "int",
    "unsigned",
    "unsigned int",
    "long",
    "unsigned long",
    "long long",
    "unsigned long long",
    "float",
    "double",
    "long double",
];

/// The kind of conversion an argument undergoes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversionKind {
    /// No conversion needed (exact match).
    Identity,
    /// Arithmetic promotion or conversion (`int` -> `double`).
    Arithmetic,
    /// Derived class to an unambiguous base class.
    DerivedToBase,
}

impl ConversionKind {
    /// Whether a reference to the target type can bind the source object
    /// itself, without materializing a temporary.
    #[inline]
    pub const fn binds_reference_directly(self) -> bool {
        matches!(
            self,
            ConversionKind::Identity | ConversionKind::DerivedToBase
        )
    }

    /// Cost added on top of the reference-category rank.
    #[inline]
    pub const fn cost(self) -> u32 {
        match self {
            ConversionKind::Identity => 0,
            ConversionKind::Arithmetic | ConversionKind::DerivedToBase => COST_CONVERSION,
        }
    }
}

impl fmt::Display for ConversionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionKind::Identity => write!(f, "identity"),
            ConversionKind::Arithmetic => write!(f, "arithmetic"),
            ConversionKind::DerivedToBase => write!(f, "derived-to-base"),
        }
    }
}

/// Decides whether a value of type `from` can initialize a `to`.
pub trait ConversionRules {
    /// The implicit conversion from `from` to `to`, if one exists.
    fn convert(&self, from: &str, to: &str) -> Option<ConversionKind>;
}

impl<T: ConversionRules + ?Sized> ConversionRules for &T {
    fn convert(&self, from: &str, to: &str) -> Option<ConversionKind> {
        (**self).convert(from, to)
    }
}

impl<T: ConversionRules + ?Sized> ConversionRules for Box<T> {
    fn convert(&self, from: &str, to: &str) -> Option<ConversionKind> {
        (**self).convert(from, to)
    }
}

/// Check if a type name is a built-in arithmetic type.
pub fn is_arithmetic(type_name: &str) -> bool {
    ARITHMETIC_TYPES.contains(&type_name)
}

/// Identity plus conversions among the built-in arithmetic types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StandardConversions;

impl ConversionRules for StandardConversions {
    fn convert(&self, from: &str, to: &str) -> Option<ConversionKind> {
        if from == to {
            Some(ConversionKind::Identity)
        } else if is_arithmetic(from) && is_arithmetic(to) {
            Some(ConversionKind::Arithmetic)
        } else {
            None
        }
    }
}

/// Identity only. Every type mismatch eliminates the candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExactConversions;

impl ConversionRules for ExactConversions {
    fn convert(&self, from: &str, to: &str) -> Option<ConversionKind> {
        (from == to).then_some(ConversionKind::Identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_for_any_type() {
        let identity = Some(ConversionKind::Identity);
        assert_eq!(StandardConversions.convert("A", "A"), identity);
        assert_eq!(StandardConversions.convert("int", "int"), identity);
    }

    #[test]
    fn arithmetic_conversions() {
        let arithmetic = Some(ConversionKind::Arithmetic);
        assert_eq!(StandardConversions.convert("int", "double"), arithmetic);
        assert_eq!(
            StandardConversions.convert("char", "unsigned long long"),
            arithmetic
        );
        assert_eq!(StandardConversions.convert("int", "A"), None);
        assert_eq!(StandardConversions.convert("A", "B"), None);
    }

    #[test]
    fn exact_rules_reject_mismatch() {
        assert_eq!(ExactConversions.convert("int", "double"), None);
        let identity = Some(ConversionKind::Identity);
        assert_eq!(ExactConversions.convert("A", "A"), identity);
    }

    #[test]
    fn reference_binding_and_cost() {
        assert!(ConversionKind::Identity.binds_reference_directly());
        assert!(ConversionKind::DerivedToBase.binds_reference_directly());
        assert!(!ConversionKind::Arithmetic.binds_reference_directly());

        assert_eq!(ConversionKind::Identity.cost(), 0);
        assert_eq!(ConversionKind::Arithmetic.cost(), COST_CONVERSION);
    }

    #[test]
    fn rules_through_references() {
        fn short_to_long<R: ConversionRules>(rules: R) -> Option<ConversionKind> {
            rules.convert("short", "long")
        }
        let boxed: Box<dyn ConversionRules> = Box::new(StandardConversions);
        let arithmetic = Some(ConversionKind::Arithmetic);
        assert_eq!(short_to_long(&StandardConversions), arithmetic);
        assert_eq!(short_to_long(&boxed), arithmetic);
    }
}
