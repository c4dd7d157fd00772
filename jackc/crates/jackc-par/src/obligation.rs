//! Deferred cross-unit obligations.
//!
//! The parser cannot check references whose target class, subroutine, or
//! field may live in a translation unit that has not been parsed yet.
//! Instead it records each such check as an [`Obligation`] on a single
//! program-wide work-list, and the resolver consumes the list once all
//! units are in.
//!
//! The expression payloads (`expr`, `args`) are flat typing records: type
//! names interleaved with the operator lexemes `* / + - < > =` in parse
//! order, plus the `ArrayEntry` tag for subscript results. Subroutine names
//! appear in place of their return types until the resolver substitutes
//! them.

use jackc_util::Symbol;

/// One deferred check, positioned at the declaration that produced it.
#[derive(Clone, Debug)]
pub struct Obligation {
    /// Source file stem, for diagnostics.
    pub file: Symbol,

    /// 1-based source line, for diagnostics.
    pub line: u32,

    pub kind: ObligationKind,
}

/// What the resolver must do with an obligation.
#[derive(Clone, Debug)]
pub enum ObligationKind {
    /// A variable, field, parameter, or return type that names a class.
    UnresolvedType { ty: Symbol, resolved: bool },

    /// A subroutine call. `ctor` carries the class name for `C.new(...)`
    /// constructor calls and is `None` for function and method calls.
    Call {
        name: Symbol,
        ctor: Option<Symbol>,
        args: Vec<Symbol>,
        resolved: bool,
        args_match: bool,
    },

    /// A `let` statement: declared left-hand type against the folded
    /// right-hand expression type.
    Assignment {
        lhs: Symbol,
        expr: Vec<Symbol>,
        compatible: bool,
    },

    /// A `return` statement: declared subroutine type against the folded
    /// return expression type (empty record for a bare `return;`).
    Return {
        declared: Symbol,
        expr: Vec<Symbol>,
        compatible: bool,
    },

    /// A `let` statement's array subscript, which must fold to a numeric
    /// type.
    ArrayIndex { expr: Vec<Symbol> },
}

impl Obligation {
    pub fn new(file: Symbol, line: u32, kind: ObligationKind) -> Self {
        Self { file, line, kind }
    }
}
