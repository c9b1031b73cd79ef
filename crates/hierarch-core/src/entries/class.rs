//! Class declarations.

use std::fmt;

use crate::{MemberDecl, ParamSpec, TypeHash};

/// One entry of a class's base list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BaseRef {
    /// Name of the base class.
    pub name: String,
    /// Identity of the base class.
    pub type_hash: TypeHash,
    /// `virtual public Base` vs `public Base`.
    pub is_virtual: bool,
}

impl BaseRef {
    /// A non-virtual base.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let type_hash = TypeHash::from_name(&name);
        Self {
            name,
            type_hash,
            is_virtual: false,
        }
    }

    /// A virtual base.
    pub fn virtual_base(name: impl Into<String>) -> Self {
        Self {
            is_virtual: true,
            ..Self::new(name)
        }
    }
}

impl fmt::Display for BaseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_virtual {
            write!(f, "virtual ")?;
        }
        write!(f, "public {}", self.name)
    }
}

/// A class declaration: identity, ordered base list, ordered members.
///
/// Built with the `with_*` methods, which also stamp each member with this
/// class as its declaring class.
///
/// ```
/// use hierarch_core::{ClassDecl, ParamSpec};
///
/// let derived = ClassDecl::new("Derived")
///     .with_virtual_base("Base1")
///     .with_virtual_base("Base2")
///     .with_field("i");
///
/// assert_eq!(derived.bases.len(), 2);
/// assert!(derived.declares("i"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDecl {
    /// Class name; unique within a registry.
    pub name: String,
    /// Identity derived from the name.
    pub type_hash: TypeHash,
    /// Direct bases in declaration order.
    pub bases: Vec<BaseRef>,
    /// Members in declaration order.
    pub members: Vec<MemberDecl>,
}

impl ClassDecl {
    /// Create a class with no bases and no members.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let type_hash = TypeHash::from_name(&name);
        Self {
            name,
            type_hash,
            bases: Vec::new(),
            members: Vec::new(),
        }
    }

    // === Builder Methods ===

    /// Append a base list entry.
    pub fn with_base_ref(mut self, base: BaseRef) -> Self {
        self.bases.push(base);
        self
    }

    /// Append a non-virtual base.
    pub fn with_base(self, name: impl Into<String>) -> Self {
        self.with_base_ref(BaseRef::new(name))
    }

    /// Append a virtual base.
    pub fn with_virtual_base(self, name: impl Into<String>) -> Self {
        self.with_base_ref(BaseRef::virtual_base(name))
    }

    /// Append a member, taking ownership of it as its declaring class.
    pub fn with_member(mut self, member: MemberDecl) -> Self {
        self.members.push(member.owned_by(&self.name));
        self
    }

    /// Append a data member.
    pub fn with_field(self, name: impl Into<String>) -> Self {
        self.with_member(MemberDecl::data(name))
    }

    /// Append a member function.
    pub fn with_method(self, name: impl Into<String>, params: Vec<ParamSpec>) -> Self {
        self.with_member(MemberDecl::function(name, params))
    }

    /// Append a constructor.
    pub fn with_constructor(self, params: Vec<ParamSpec>) -> Self {
        let ctor = MemberDecl::constructor(&self.name, params);
        self.with_member(ctor)
    }

    /// Append an `explicit` constructor.
    pub fn with_explicit_constructor(self, params: Vec<ParamSpec>) -> Self {
        let ctor = MemberDecl::constructor(&self.name, params).explicit();
        self.with_member(ctor)
    }

    // === Query Methods ===

    /// Members found by name lookup under `name`. Constructors are never found
    /// by member name lookup.
    pub fn members_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a MemberDecl> + 'a {
        self.members
            .iter()
            .filter(move |m| !m.is_constructor() && m.name == name)
    }

    /// Whether this class itself declares a member called `name`.
    pub fn declares(&self, name: &str) -> bool {
        self.members_named(name).next().is_some()
    }

    /// Declared constructors.
    pub fn constructors(&self) -> impl Iterator<Item = &MemberDecl> {
        self.members.iter().filter(|m| m.is_constructor())
    }

    /// Whether the class has no bases.
    pub fn is_root(&self) -> bool {
        self.bases.is_empty()
    }
}

impl fmt::Display for ClassDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class {}", self.name)?;
        if !self.bases.is_empty() {
            let bases: Vec<_> = self.bases.iter().map(ToString::to_string).collect();
            write!(f, " : {}", bases.join(", "))?;
        }
        Ok(())
    }
}
