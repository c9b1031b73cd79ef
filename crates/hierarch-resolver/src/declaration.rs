//! Declaration disambiguation for `T name(...)` statements.
//!
//! A statement of the form `B b(A());` reads either as a variable `b` of
//! type `B` initialized with a temporary `A`, or as a function `b` returning
//! `B` that takes an unnamed parameter of type "function returning `A`".
//! The grammar always picks the function declaration. [`classify`] applies
//! that rule as a pure function of the statement's shape, and
//! [`suggest_disambiguation`] offers the rewrites that force the variable
//! reading.
//!
//! # Example
//!
//! ```
//! use hierarch_resolver::declaration::{InitExpr, Initializer, StatementShape};
//! use hierarch_resolver::{classify, suggest_disambiguation};
//!
//! let shape = StatementShape::new("B", "b", Initializer::Parens(InitExpr::construct("A")));
//! assert!(classify(&shape).is_function_declaration());
//!
//! let fixed = suggest_disambiguation(&shape).brace_init;
//! assert_eq!(fixed.to_string(), "B b{A()};");
//! assert!(classify(&fixed).is_value_construction());
//! ```

use std::fmt;

use hierarch_core::{Argument, CallSite};

/// An expression inside an initializer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InitExpr {
    /// `T()` - looks like a nullary construction.
    ParenConstruct(String),
    /// `T{}` - a nullary construction that cannot be read as a type.
    BraceConstruct(String),
    /// A named variable of a known type.
    Variable { name: String, type_name: String },
    /// `(expr)` - an extra parenthesis group.
    Grouped(Box<InitExpr>),
}

impl InitExpr {
    /// `T()`
    pub fn construct(type_name: impl Into<String>) -> Self {
        InitExpr::ParenConstruct(type_name.into())
    }

    /// `T{}`
    pub fn brace_construct(type_name: impl Into<String>) -> Self {
        InitExpr::BraceConstruct(type_name.into())
    }

    pub fn variable(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        InitExpr::Variable {
            name: name.into(),
            type_name: type_name.into(),
        }
    }

    /// `(self)`
    pub fn grouped(self) -> Self {
        InitExpr::Grouped(Box::new(self))
    }

    /// The expression with every parenthesis group removed.
    pub fn innermost(&self) -> &InitExpr {
        match self {
            InitExpr::Grouped(inner) => inner.innermost(),
            other => other,
        }
    }

    /// The argument this expression supplies to a constructor.
    pub fn as_argument(&self) -> Argument {
        match self {
            InitExpr::ParenConstruct(t) | InitExpr::BraceConstruct(t) => {
                Argument::prvalue(t.clone())
            }
            InitExpr::Variable { type_name, .. } => Argument::lvalue(type_name.clone()),
            InitExpr::Grouped(inner) => inner.as_argument(),
        }
    }
}

impl fmt::Display for InitExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitExpr::ParenConstruct(t) => write!(f, "{t}()"),
            InitExpr::BraceConstruct(t) => write!(f, "{t}{{}}"),
            InitExpr::Variable { name, .. } => write!(f, "{name}"),
            InitExpr::Grouped(inner) => write!(f, "({inner})"),
        }
    }
}

/// What follows the declarator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Initializer {
    /// `()`
    EmptyParens,
    /// `(expr)`
    Parens(InitExpr),
    /// `{expr}`
    Braces(InitExpr),
    /// `{}`
    EmptyBraces,
}

impl Initializer {
    /// The expression inside the delimiters, if any.
    pub fn expr(&self) -> Option<&InitExpr> {
        match self {
            Initializer::Parens(e) | Initializer::Braces(e) => Some(e),
            Initializer::EmptyParens | Initializer::EmptyBraces => None,
        }
    }

    pub fn is_brace(&self) -> bool {
        matches!(self, Initializer::Braces(_) | Initializer::EmptyBraces)
    }
}

impl fmt::Display for Initializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Initializer::EmptyParens => write!(f, "()"),
            Initializer::Parens(e) => write!(f, "({e})"),
            Initializer::Braces(e) => write!(f, "{{{e}}}"),
            Initializer::EmptyBraces => write!(f, "{{}}"),
        }
    }
}

/// The shape of a `Type name initializer;` statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StatementShape {
    /// The leading type name.
    pub type_name: String,
    /// The declared name.
    pub declarator: String,
    pub initializer: Initializer,
}

impl StatementShape {
    pub fn new(
        type_name: impl Into<String>,
        declarator: impl Into<String>,
        initializer: Initializer,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            declarator: declarator.into(),
            initializer,
        }
    }

    fn with_initializer(&self, initializer: Initializer) -> Self {
        Self {
            initializer,
            ..self.clone()
        }
    }

    /// The direct-initialization call this statement performs, or `None`
    /// when the statement declares a function.
    pub fn construction_call(&self) -> Option<CallSite> {
        match classify(self) {
            Declaration::FunctionDeclaration(_) => None,
            Declaration::ValueConstruction(_) => {
                let args = self.initializer.expr().map(InitExpr::as_argument);
                Some(CallSite::new(self.type_name.clone(), args.into_iter().collect()))
            }
        }
    }
}

impl fmt::Display for StatementShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}{};",
            self.type_name, self.declarator, self.initializer
        )
    }
}

/// The unnamed parameter of a function declaration: a function returning
/// `returns`, adjusted to a pointer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionParam {
    pub returns: String,
}

impl fmt::Display for FunctionParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (*)()", self.returns)
    }
}

/// A function declared by a statement that looked like a variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionDeclarator {
    pub name: String,
    pub return_type: String,
    /// `None` for `T f();`.
    pub parameter: Option<FunctionParam>,
}

impl fmt::Display for FunctionDeclarator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}(", self.return_type, self.name)?;
        if let Some(param) = &self.parameter {
            write!(f, "{param}")?;
        }
        write!(f, ")")
    }
}

/// A variable definition with its initializer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValueConstruction {
    pub variable: String,
    pub type_name: String,
    /// `None` for `T x{};`.
    pub argument: Option<InitExpr>,
    /// Whether braces were used.
    pub brace: bool,
}

/// How a statement is read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Declaration {
    FunctionDeclaration(FunctionDeclarator),
    ValueConstruction(ValueConstruction),
}

impl Declaration {
    pub fn is_function_declaration(&self) -> bool {
        matches!(self, Declaration::FunctionDeclaration(_))
    }

    pub fn is_value_construction(&self) -> bool {
        matches!(self, Declaration::ValueConstruction(_))
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Declaration::FunctionDeclaration(decl) => write!(f, "function declaration: {decl}"),
            Declaration::ValueConstruction(v) => {
                write!(f, "variable: {} {}", v.type_name, v.variable)
            }
        }
    }
}

/// Classify a statement shape.
///
/// Anything that can be read as a function declaration is one: `T x();` and
/// `T x(U());` both declare functions. Extra parentheses, braces, and named
/// variables force a variable definition.
pub fn classify(shape: &StatementShape) -> Declaration {
    let function = |parameter| {
        Declaration::FunctionDeclaration(FunctionDeclarator {
            name: shape.declarator.clone(),
            return_type: shape.type_name.clone(),
            parameter,
        })
    };

    let declaration = match &shape.initializer {
        Initializer::EmptyParens => function(None),
        Initializer::Parens(InitExpr::ParenConstruct(returns)) => {
            let returns = returns.clone();
            function(Some(FunctionParam { returns }))
        }
        init => Declaration::ValueConstruction(ValueConstruction {
            variable: shape.declarator.clone(),
            type_name: shape.type_name.clone(),
            argument: init.expr().cloned(),
            brace: init.is_brace(),
        }),
    };

    tracing::debug!(statement = %shape, %declaration, "classified statement");
    declaration
}

/// Rewrites that force the variable reading of a statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Disambiguation {
    /// `T x((expr));` - absent when there is no expression to wrap.
    pub extra_parens: Option<StatementShape>,
    /// `T x{expr};`
    pub brace_init: StatementShape,
}

/// Suggest rewrites of `shape` that classify as value constructions.
pub fn suggest_disambiguation(shape: &StatementShape) -> Disambiguation {
    let Some(expr) = shape.initializer.expr() else {
        return Disambiguation {
            extra_parens: None,
            brace_init: shape.with_initializer(Initializer::EmptyBraces),
        };
    };

    let grouped = Initializer::Parens(expr.clone().grouped());
    Disambiguation {
        extra_parens: Some(shape.with_initializer(grouped)),
        brace_init: shape.with_initializer(Initializer::Braces(expr.clone())),
    }
}
