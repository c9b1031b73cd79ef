//! Parameter and argument typing.
//!
//! A [`ParamSpec`] is what a callable declares it accepts: a type plus the
//! reference category it binds through. An [`Argument`] is what a call site
//! supplies: a type plus the value category of the expression.
//!
//! # Example
//!
//! ```
//! use hierarch_core::{Argument, ParamSpec, RefCategory, ValueCategory};
//!
//! // void foo(int &&i)
//! let param = ParamSpec::rvalue_ref("int");
//! assert_eq!(param.ref_category, RefCategory::RValueRef);
//! assert_eq!(param.to_string(), "int&&");
//!
//! // foo(2)
//! let arg = Argument::prvalue("int");
//! assert!(arg.category.is_rvalue());
//! ```

use std::fmt::{self, Display, Formatter};

use crate::TypeHash;

/// How a parameter binds its argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RefCategory {
    /// `T` - the argument is copied or moved into the parameter.
    #[default]
    ByValue,
    /// `T&` - binds a persistent object (or a temporary, if const).
    LValueRef,
    /// `T&&` - binds an expiring or temporary object only.
    RValueRef,
}

impl RefCategory {
    /// Stable discriminant used in signature hashing.
    const fn signature_bits(self) -> u64 {
        match self {
            RefCategory::ByValue => 0x0,
            RefCategory::LValueRef => 0x10,
            RefCategory::RValueRef => 0x20,
        }
    }
}

impl Display for RefCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            RefCategory::ByValue => Ok(()),
            RefCategory::LValueRef => write!(f, "&"),
            RefCategory::RValueRef => write!(f, "&&"),
        }
    }
}

/// Value category of an argument expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueCategory {
    /// Names a persistent object (`a`).
    LValue,
    /// An expiring object eligible for move (`std::move(a)`).
    XValue,
    /// A temporary (`2`, `A()`).
    PRValue,
}

impl ValueCategory {
    /// `xvalue` and `prvalue` are both rvalues.
    #[inline]
    pub const fn is_rvalue(self) -> bool {
        matches!(self, ValueCategory::XValue | ValueCategory::PRValue)
    }
}

impl Display for ValueCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ValueCategory::LValue => write!(f, "lvalue"),
            ValueCategory::XValue => write!(f, "xvalue"),
            ValueCategory::PRValue => write!(f, "prvalue"),
        }
    }
}

/// A declared parameter: its type and the reference category it accepts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParamSpec {
    /// Declared type name (`int`, `A`).
    pub type_name: String,
    /// Whether the referred-to type is const-qualified (`const T&`).
    pub is_const: bool,
    /// Reference category.
    pub ref_category: RefCategory,
}

impl ParamSpec {
    /// Create a parameter spec.
    pub fn new(type_name: impl Into<String>, is_const: bool, ref_category: RefCategory) -> Self {
        Self {
            type_name: type_name.into(),
            is_const,
            ref_category,
        }
    }

    /// `T`
    pub fn by_value(type_name: impl Into<String>) -> Self {
        Self::new(type_name, false, RefCategory::ByValue)
    }

    /// `T&`
    pub fn lvalue_ref(type_name: impl Into<String>) -> Self {
        Self::new(type_name, false, RefCategory::LValueRef)
    }

    /// `const T&`
    pub fn const_lvalue_ref(type_name: impl Into<String>) -> Self {
        Self::new(type_name, true, RefCategory::LValueRef)
    }

    /// `T&&`
    pub fn rvalue_ref(type_name: impl Into<String>) -> Self {
        Self::new(type_name, false, RefCategory::RValueRef)
    }

    /// Hash of the full parameter type, including constness and reference category.
    ///
    /// `int&` and `int&&` hash differently so they can coexist as overloads.
    pub fn signature_hash(&self) -> TypeHash {
        let const_bit = if self.is_const { 0x1 } else { 0x0 };
        let base = TypeHash::from_name(&self.type_name);
        TypeHash(base.0 ^ const_bit ^ self.ref_category.signature_bits())
    }
}

impl Display for ParamSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_const {
            write!(f, "const ")?;
        }
        write!(f, "{}{}", self.type_name, self.ref_category)
    }
}

/// An argument supplied at a call site.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Argument {
    /// Type of the argument expression.
    pub type_name: String,
    /// Value category of the argument expression.
    pub category: ValueCategory,
}

impl Argument {
    pub fn new(type_name: impl Into<String>, category: ValueCategory) -> Self {
        Self {
            type_name: type_name.into(),
            category,
        }
    }

    /// A named variable.
    pub fn lvalue(type_name: impl Into<String>) -> Self {
        Self::new(type_name, ValueCategory::LValue)
    }

    /// A moved-from value.
    pub fn xvalue(type_name: impl Into<String>) -> Self {
        Self::new(type_name, ValueCategory::XValue)
    }

    /// A literal or temporary.
    pub fn prvalue(type_name: impl Into<String>) -> Self {
        Self::new(type_name, ValueCategory::PRValue)
    }
}

impl Display for Argument {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.category, self.type_name)
    }
}

/// A call to be resolved against a candidate set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallSite {
    /// Name of the callee (function name, or class name for constructions).
    pub callee: String,
    /// Arguments in call order.
    pub args: Vec<Argument>,
    /// `true` for direct initialization (`B b(a)`), `false` for an
    /// implicit-conversion context such as copy-initialization (`B b = a`).
    pub direct: bool,
}

impl CallSite {
    /// A direct call. Ordinary function calls are always direct.
    pub fn new(callee: impl Into<String>, args: Vec<Argument>) -> Self {
        Self {
            callee: callee.into(),
            args,
            direct: true,
        }
    }

    /// A construction in an implicit-conversion context.
    pub fn implicit(callee: impl Into<String>, args: Vec<Argument>) -> Self {
        Self {
            direct: false,
            ..Self::new(callee, args)
        }
    }

    /// Number of arguments.
    #[inline]
    pub fn arity(&self) -> usize {
        self.args.len()
    }
}

impl Display for CallSite {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let args: Vec<_> = self.args.iter().map(ToString::to_string).collect();
        write!(f, "{}({})", self.callee, args.join(", "))
    }
}
