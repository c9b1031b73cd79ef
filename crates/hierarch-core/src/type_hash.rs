//! Deterministic hash-based identity for classes and callables.
//!
//! [`TypeHash`] is a 64-bit hash computed from a class name or from a
//! callable's owner, name and parameter signature. Because the hash only
//! depends on its inputs, a declaration can be referred to before it is
//! registered, and two declarations with the same signature always collide
//! (which is how duplicate overloads are detected).
//!
//! # Examples
//!
//! ```
//! use hierarch_core::TypeHash;
//!
//! let a = TypeHash::from_name("Base1");
//! assert_eq!(a, TypeHash::from_name("Base1"));
//!
//! let int = TypeHash::from_name("int");
//! let float = TypeHash::from_name("float");
//! assert_ne!(
//!     TypeHash::from_function("foo", &[int]),
//!     TypeHash::from_function("foo", &[float]),
//! );
//! ```

use std::fmt;
use xxhash_rust::xxh64::xxh64;

/// Domain-specific mixing constants.
///
/// Different entity kinds hash into different domains, so a class named
/// `foo` never collides with a free function named `foo`.
pub mod hash_constants {
    /// Separator constant used when folding parameters into a hash.
    pub const SEP: u64 = 0x4bc94d6bd06053ad;

    /// Domain marker for class and type names.
    pub const TYPE: u64 = 0x2fac10b63a6cc57c;

    /// Domain marker for free functions.
    pub const FUNCTION: u64 = 0x5ea77ffbcdf5f302;

    /// Domain marker for member functions.
    pub const METHOD: u64 = 0x7d3c8b4a92e15f6d;

    /// Domain marker for constructors.
    pub const CONSTRUCTOR: u64 = 0x9a7f3d5e2b8c4601;

    /// Domain marker for data members.
    pub const FIELD: u64 = 0x1a095090689d4647;

    /// Parameter position markers; position `i` uses `PARAM_MARKERS[i]`.
    pub const PARAM_MARKERS: [u64; 16] = [
        0x9e3779b97f4a7c15,
        0xbf58476d1ce4e5b9,
        0x94d049bb133111eb,
        0xd6e8feb86659fd93,
        0xe7037ed1a0b428db,
        0xc6a4a7935bd1e995,
        0x8648dbbc94d49b8d,
        0xa2b48b2c69e0d657,
        0x7c3e9f2a5b8d1403,
        0x5d8c7b4a3e9f2106,
        0x3f1e9d8c7b5a4203,
        0x1a2b3c4d5e6f7089,
        0x9f8e7d6c5b4a3210,
        0x2468ace013579bdf,
        0xfdb97531eca86420,
        0x123456789abcdef0,
    ];
}

/// A deterministic 64-bit identity for a class, function, constructor or field.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeHash(pub u64);

impl TypeHash {
    /// Hash a class or type name.
    #[inline]
    pub fn from_name(name: &str) -> Self {
        TypeHash(hash_constants::TYPE ^ xxh64(name.as_bytes(), 0))
    }

    /// Hash a free function from its name and parameter signature hashes.
    ///
    /// Parameter order matters: `(int, float)` and `(float, int)` differ.
    #[inline]
    pub fn from_function(name: &str, param_hashes: &[TypeHash]) -> Self {
        let seed = hash_constants::FUNCTION ^ xxh64(name.as_bytes(), 0);
        TypeHash(fold_params(seed, param_hashes))
    }

    /// Hash a member function from its owner, name, parameters and constness.
    #[inline]
    pub fn from_method(
        owner: TypeHash,
        name: &str,
        param_hashes: &[TypeHash],
        is_const: bool,
    ) -> Self {
        let const_modifier = if is_const { 0x1 } else { 0x0 };
        let seed = hash_constants::METHOD ^ owner.0 ^ xxh64(name.as_bytes(), 0) ^ const_modifier;
        TypeHash(fold_params(seed, param_hashes))
    }

    /// Hash a constructor. Constructors are identified by owner and parameters.
    #[inline]
    pub fn from_constructor(owner: TypeHash, param_hashes: &[TypeHash]) -> Self {
        let seed = hash_constants::CONSTRUCTOR ^ owner.0;
        TypeHash(fold_params(seed, param_hashes))
    }

    /// Hash a data member from its owner and name.
    #[inline]
    pub fn from_field(owner: TypeHash, name: &str) -> Self {
        TypeHash(hash_constants::FIELD ^ owner.0 ^ xxh64(name.as_bytes(), 0))
    }
}

fn fold_params(seed: u64, param_hashes: &[TypeHash]) -> u64 {
    let mut hash = seed;
    for (i, param) in param_hashes.iter().enumerate() {
        let marker = hash_constants::PARAM_MARKERS
            .get(i)
            .copied()
            .unwrap_or_else(|| hash_constants::PARAM_MARKERS[0].wrapping_add(i as u64));
        // wrapping_mul keeps the fold order-sensitive, unlike a plain XOR
        hash = hash
            .wrapping_mul(hash_constants::SEP)
            .wrapping_add(marker ^ param.0);
    }
    hash
}

impl fmt::Debug for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHash({:#018x})", self.0)
    }
}

impl fmt::Display for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}
