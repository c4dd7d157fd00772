//! jackc-par - Recursive-descent parser with interleaved code generation.
//!
//! One method per grammar production. Each production checks the grammar
//! and, as tokens are consumed, writes VM instructions straight into the
//! current translation unit's buffer; there is no separate AST. Checks that
//! need another translation unit (class types, subroutine calls, assignment
//! and return typing, array-index typing) are recorded as obligations on
//! the program-wide work-list for the resolver.
//!
//! Any grammar violation is fatal and is returned as a positioned
//! [`Diagnostic`] naming the offending token.
//!
//! This crate also owns the data model the parser writes into: the symbol
//! tables and scope stack ([`symbols`]), the deferred work-list
//! ([`obligation`]), the structured VM IR ([`vm`]), and the whole-program
//! state threaded through every unit ([`program`]).

pub mod obligation;
pub mod program;
pub mod symbols;
pub mod vm;

mod expr;
mod items;
mod stmt;

use jackc_lex::{Token, TokenKind, TokenStream};
use jackc_util::{Diagnostic, Handler, Symbol};

use obligation::{Obligation, ObligationKind};
use program::Program;
use vm::Instr;

pub type ParseResult<T> = Result<T, Diagnostic>;

/// Which flavour of subroutine is being parsed; decides the prologue and
/// the implicit `this` argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubroutineKind {
    Constructor,
    Function,
    Method,
}

/// Parser for one translation unit.
///
/// Create one per source file with the whole-program [`Program`] threaded
/// through, then call [`Parser::parse_class`].
pub struct Parser<'a> {
    /// Token stream of the current unit.
    tokens: TokenStream,

    /// Whole-program state: scopes, obligations, output buffers.
    program: &'a mut Program,

    /// Warning sink.
    handler: &'a mut Handler,

    /// Class currently being compiled.
    current_class: Symbol,

    /// Subroutine currently being compiled.
    subroutine_name: Symbol,

    /// Declared type of the current subroutine (`void` included).
    subroutine_type: Symbol,

    /// Yields `l0, l1, ...`; reset at the start of each class so IR stays
    /// diff-friendly across runs.
    label_counter: u32,

    /// Set when an `if` block contains a top-level `return`, for the
    /// all-paths-return check. Reset per subroutine body.
    found_if_return: bool,

    /// Same, for `else` blocks.
    found_else_return: bool,

    /// Stack of flat expression-typing records. Each expression context
    /// pushes a frame; operands and operators append to the innermost one,
    /// so the argument record of a nested call never bleeds into the
    /// enclosing expression's record.
    frames: Vec<Vec<Symbol>>,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: TokenStream, program: &'a mut Program, handler: &'a mut Handler) -> Self {
        let none = Symbol::intern("");
        Self {
            tokens,
            program,
            handler,
            current_class: none,
            subroutine_name: none,
            subroutine_type: none,
            label_counter: 0,
            found_if_return: false,
            found_else_return: false,
            frames: Vec::new(),
        }
    }

    // =========================================================================
    // Token plumbing
    // =========================================================================

    fn peek(&self) -> Token {
        self.tokens.peek()
    }

    fn next(&mut self) -> Token {
        self.tokens.next()
    }

    /// Consumes the next token, requiring the given kind.
    fn expect(&mut self, kind: TokenKind, message: &str) -> ParseResult<Token> {
        let token = self.next();
        if token.kind == kind {
            Ok(token)
        } else {
            Err(self.error(&token, message))
        }
    }

    /// Consumes the next token, requiring an identifier.
    fn expect_ident(&mut self, message: &str) -> ParseResult<(Symbol, Token)> {
        let token = self.next();
        match token.kind {
            TokenKind::Ident(name) => Ok((name, token)),
            _ => Err(self.error(&token, message)),
        }
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    fn file(&self) -> Symbol {
        self.program.current_unit()
    }

    /// A fatal, positioned error naming the offending token.
    fn error(&self, token: &Token, message: impl Into<String>) -> Diagnostic {
        Diagnostic::error(
            self.file().as_str(),
            token.line,
            Some(token.lexeme()),
            message,
        )
    }

    /// A positioned warning naming the token; compilation continues.
    fn warn(&mut self, token: &Token, message: impl Into<String>) {
        let diagnostic = Diagnostic::warning(
            self.file().as_str(),
            token.line,
            Some(token.lexeme()),
            message,
        );
        self.handler.emit(diagnostic);
    }

    // =========================================================================
    // Emission and obligations
    // =========================================================================

    fn emit(&mut self, instr: Instr) {
        self.program.emit(instr);
    }

    /// Records an obligation at the given line; returns its work-list
    /// index so call sites can fill in their argument records later.
    fn obligate(&mut self, line: u32, kind: ObligationKind) -> usize {
        let obligation = Obligation::new(self.file(), line, kind);
        self.program.obligations.push(obligation);
        self.program.obligations.len() - 1
    }

    /// A fresh `l<n>` label.
    fn label(&mut self) -> String {
        let label = format!("l{}", self.label_counter);
        self.label_counter += 1;
        label
    }

    // =========================================================================
    // Expression typing records
    // =========================================================================

    fn push_frame(&mut self) {
        self.frames.push(Vec::new());
    }

    fn pop_frame(&mut self) -> Vec<Symbol> {
        self.frames.pop().unwrap_or_default()
    }

    /// Appends a type name or operator lexeme to the innermost record.
    fn record(&mut self, entry: Symbol) {
        if let Some(frame) = self.frames.last_mut() {
            frame.push(entry);
        }
    }

    /// Replaces the innermost record's last entry; used when an operand
    /// turns out to be an array subscript after its base was recorded.
    fn replace_last_record(&mut self, entry: Symbol) {
        if let Some(frame) = self.frames.last_mut() {
            frame.pop();
            frame.push(entry);
        }
    }
}

/// Derives a call's argument count from its flat typing record: one slot
/// per entry, minus two for each folding operator and one for each
/// `ArrayEntry` tag (a subscript contributes the tag plus its index
/// expression's entries but passes a single value).
pub fn argument_count(record: &[Symbol]) -> u32 {
    let mut count = record.len() as i64;
    for entry in record {
        match entry.as_str() {
            "*" | "/" | "+" | "-" | "<" | ">" | "=" => count -= 2,
            "ArrayEntry" => count -= 1,
            _ => {},
        }
    }
    count.max(0) as u32
}
