//! Declaration entries.
//!
//! - [`ClassDecl`] - a class with its ordered base list and members
//! - [`BaseRef`] - one entry of a base list, tagged virtual or not
//! - [`MemberDecl`] - a data member, member function, constructor or free function
//!
//! Entries are built once from declaration input and never mutated after
//! registration.

mod class;
mod member;

pub use class::{BaseRef, ClassDecl};
pub use member::{FunctionTraits, MemberDecl, MemberKind};
