//! Member and function declarations.

use std::fmt;

use bitflags::bitflags;

use crate::{ParamSpec, TypeHash};

/// What a declared member is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// A data member (`int i;`).
    Data,
    /// A member function, or a free function when it has no owner.
    Function,
    /// A constructor of its owning class.
    Constructor,
}

bitflags! {
    /// Declaration modifiers on callables.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FunctionTraits: u8 {
        /// `explicit` - excluded from implicit-conversion contexts.
        const EXPLICIT = 1 << 0;
        /// `const` member function.
        const CONST = 1 << 1;
    }
}

/// A declared member or free function.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberDecl {
    /// Member name. Constructors carry their class's name.
    pub name: String,
    /// Declaring class; `None` for free functions.
    pub owner: Option<String>,
    /// Data, function or constructor.
    pub kind: MemberKind,
    /// Ordered parameters; empty for data members.
    pub params: Vec<ParamSpec>,
    /// Modifiers.
    pub traits: FunctionTraits,
}

impl MemberDecl {
    /// A data member.
    pub fn data(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owner: None,
            kind: MemberKind::Data,
            params: Vec::new(),
            traits: FunctionTraits::empty(),
        }
    }

    /// A function. Becomes a member function once attached to a class.
    pub fn function(name: impl Into<String>, params: Vec<ParamSpec>) -> Self {
        Self {
            kind: MemberKind::Function,
            params,
            ..Self::data(name)
        }
    }

    /// A constructor of `class_name`.
    pub fn constructor(class_name: impl Into<String>, params: Vec<ParamSpec>) -> Self {
        let class_name = class_name.into();
        Self {
            owner: Some(class_name.clone()),
            kind: MemberKind::Constructor,
            ..Self::function(class_name, params)
        }
    }

    /// Mark as `explicit`.
    pub fn explicit(mut self) -> Self {
        self.traits |= FunctionTraits::EXPLICIT;
        self
    }

    /// Mark as a `const` member function.
    pub fn const_qualified(mut self) -> Self {
        self.traits |= FunctionTraits::CONST;
        self
    }

    /// Set the declaring class.
    pub fn owned_by(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    #[inline]
    pub fn is_explicit(&self) -> bool {
        self.traits.contains(FunctionTraits::EXPLICIT)
    }

    #[inline]
    pub fn is_const(&self) -> bool {
        self.traits.contains(FunctionTraits::CONST)
    }

    #[inline]
    pub fn is_constructor(&self) -> bool {
        self.kind == MemberKind::Constructor
    }

    /// Functions and constructors can take part in overload resolution.
    #[inline]
    pub fn is_callable(&self) -> bool {
        matches!(self.kind, MemberKind::Function | MemberKind::Constructor)
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Identity of this declaration. Two overloads with the same signature
    /// hash identically.
    pub fn hash(&self) -> TypeHash {
        let params: Vec<TypeHash> = self.params.iter().map(ParamSpec::signature_hash).collect();
        let owner = self.owner.as_deref().map(TypeHash::from_name);
        match (self.kind, owner) {
            (MemberKind::Data, Some(owner)) => TypeHash::from_field(owner, &self.name),
            (MemberKind::Data, None) => TypeHash::from_name(&self.name),
            (MemberKind::Function, Some(owner)) => {
                TypeHash::from_method(owner, &self.name, &params, self.is_const())
            }
            (MemberKind::Function, None) => TypeHash::from_function(&self.name, &params),
            (MemberKind::Constructor, owner) => TypeHash::from_constructor(
                owner.unwrap_or_else(|| TypeHash::from_name(&self.name)),
                &params,
            ),
        }
    }

    /// `Owner::name`, or just `name` for free functions.
    pub fn qualified_name(&self) -> String {
        match &self.owner {
            Some(owner) => format!("{}::{}", owner, self.name),
            None => self.name.clone(),
        }
    }

    /// Qualified name followed by the parameter list, e.g. `Base1::foo(int)`.
    pub fn signature(&self) -> String {
        let params: Vec<_> = self.params.iter().map(ToString::to_string).collect();
        format!("{}({})", self.qualified_name(), params.join(", "))
    }
}

impl fmt::Display for MemberDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            MemberKind::Data => write!(f, "{}", self.qualified_name()),
            MemberKind::Function | MemberKind::Constructor => {
                if self.is_explicit() {
                    write!(f, "explicit ")?;
                }
                write!(f, "{}", self.signature())?;
                if self.is_const() {
                    write!(f, " const")?;
                }
                Ok(())
            }
        }
    }
}
