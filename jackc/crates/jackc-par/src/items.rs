//! Class-level productions: class header, member declarations, subroutine
//! declarations, parameter lists, and subroutine bodies.

use jackc_lex::TokenKind;
use jackc_util::Symbol;

use crate::obligation::ObligationKind;
use crate::symbols::{Binding, BindingKind};
use crate::vm::{Instr, Segment};
use crate::{ParseResult, Parser, SubroutineKind};

impl<'a> Parser<'a> {
    /// Parses one translation unit: `"class" IDENT "{" member* "}"`.
    ///
    /// Registers the class in program scope, pushes the class scope for the
    /// members, and pops it when the closing brace is consumed. Tokens
    /// after the closing brace are ignored; a translation unit is one
    /// class.
    pub fn parse_class(&mut self) -> ParseResult<()> {
        self.label_counter = 0;

        let token = self.next();
        if token.kind != TokenKind::Class {
            return Err(self.error(&token, "Expected keyword 'class'."));
        }

        let (name, name_token) = self.expect_ident("Expected an identifier.")?;
        if self.program.scopes.program().contains(name) {
            return Err(self.error(&name_token, "Redeclaration of identifier."));
        }
        self.current_class = name;
        self.program
            .scopes
            .program_mut()
            .insert(Binding::new(name, name, BindingKind::ClassName));

        self.program.scopes.push();

        self.expect(TokenKind::LBrace, "Expected a '{'.")?;
        while self.peek().kind != TokenKind::RBrace {
            self.member_declar()?;
        }
        self.next(); // consume the '}'

        self.program.scopes.pop();
        Ok(())
    }

    /// Dispatches a class member: variable declaration or subroutine.
    fn member_declar(&mut self) -> ParseResult<()> {
        match self.peek().kind {
            TokenKind::Field | TokenKind::Static => self.class_var_declar(),
            TokenKind::Method | TokenKind::Function | TokenKind::Constructor => {
                self.subroutine_declar()
            },
            _ => {
                let token = self.peek();
                Err(self.error(
                    &token,
                    "Expected a class variable or subroutine declaration.",
                ))
            },
        }
    }

    /// `("field"|"static") type IDENT ("," IDENT)* ";"`
    ///
    /// Each name goes into both the class scope (for code generation) and
    /// the program scope (so `C.x` resolves like a subroutine reference).
    fn class_var_declar(&mut self) -> ParseResult<()> {
        let token = self.next();
        let kind = match token.kind {
            TokenKind::Static => BindingKind::Static,
            TokenKind::Field => BindingKind::Field,
            _ => return Err(self.error(&token, "Expected keyword 'field' or 'static'.")),
        };

        let ty = self.parse_type()?;

        loop {
            let (name, name_token) = self.expect_ident("Expected an identifier.")?;
            if self.program.scopes.top().contains(name) {
                return Err(self.error(&name_token, "Redeclaration of identifier."));
            }
            let mut binding = Binding::new(name, ty, kind);
            binding.initialised = true;
            self.program.scopes.top_mut().insert(binding.clone());
            self.program.scopes.program_mut().insert(binding);

            if self.peek().kind == TokenKind::Comma {
                self.next();
            } else {
                break;
            }
        }

        self.expect(TokenKind::Semicolon, "Expected a ';'.")?;
        Ok(())
    }

    /// `type := "int" | "char" | "boolean" | IDENT`
    ///
    /// A class-name type cannot be validated locally, so it is recorded as
    /// an unresolved-type obligation for the resolver.
    pub(crate) fn parse_type(&mut self) -> ParseResult<Symbol> {
        let token = self.next();
        match token.kind {
            TokenKind::Int => Ok(Symbol::intern("int")),
            TokenKind::Char => Ok(Symbol::intern("char")),
            TokenKind::Boolean => Ok(Symbol::intern("boolean")),
            TokenKind::Ident(name) => {
                self.obligate(
                    token.line,
                    ObligationKind::UnresolvedType {
                        ty: name,
                        resolved: false,
                    },
                );
                Ok(name)
            },
            _ => Err(self.error(&token, "Unknown type.")),
        }
    }

    /// `("method"|"function"|"constructor") (type|"void") IDENT "(" params? ")" body`
    fn subroutine_declar(&mut self) -> ParseResult<()> {
        // Fields declared so far decide the constructor's allocation size.
        let fields_so_far = self.program.scopes.top().fields_count();

        self.program.scopes.push();

        let token = self.next();
        let kind = match token.kind {
            TokenKind::Method => SubroutineKind::Method,
            TokenKind::Function => SubroutineKind::Function,
            TokenKind::Constructor => SubroutineKind::Constructor,
            _ => {
                return Err(self.error(
                    &token,
                    "Expected keyword 'method', 'function' or 'constructor'.",
                ));
            },
        };

        if kind == SubroutineKind::Method {
            // The receiver is argument 0.
            let mut this = Binding::new(
                Symbol::intern("this"),
                self.current_class,
                BindingKind::Argument,
            );
            this.initialised = true;
            self.program.scopes.top_mut().insert(this);
        }

        let ty = if self.peek().kind == TokenKind::Void {
            self.next();
            Symbol::intern("void")
        } else {
            self.parse_type()?
        };

        let (name, _) = self.expect_ident("Expected an identifier.")?;
        self.subroutine_name = name;
        self.subroutine_type = ty;

        self.expect(TokenKind::LParen, "Expected a '('.")?;
        let params = self.param_list()?;
        self.expect(TokenKind::RParen, "Expected a ')'.")?;

        // Program-scope entry carrying the declared parameter types, for
        // cross-unit call checking.
        let mut entry = Binding::new(name, ty, BindingKind::Subroutine);
        entry.params = params;
        self.program.scopes.program_mut().insert(entry);

        let header = self.program.out().code.len();
        self.emit(Instr::Function {
            class: self.current_class,
            routine: name,
            locals: 0,
        });
        match kind {
            SubroutineKind::Constructor => {
                self.emit(Instr::Push(Segment::Constant, fields_so_far));
                self.emit(Instr::call(
                    Symbol::intern("Memory"),
                    Symbol::intern("alloc"),
                    1,
                ));
                self.emit(Instr::Pop(Segment::Pointer, 0));
            },
            SubroutineKind::Method => {
                self.emit(Instr::Push(Segment::Argument, 0));
                self.emit(Instr::Pop(Segment::Pointer, 0));
            },
            SubroutineKind::Function => {},
        }

        self.subroutine_body()?;

        let locals = self.program.scopes.top().locals_count();
        self.program.out().patch_function_locals(header, locals);

        self.program.scopes.pop();
        Ok(())
    }

    /// `params := type IDENT ("," type IDENT)*` (possibly empty).
    ///
    /// Arguments are created initialised. Returns the declared types in
    /// order for the subroutine's program-scope entry.
    fn param_list(&mut self) -> ParseResult<Vec<Symbol>> {
        let mut params = Vec::new();
        if self.peek().kind == TokenKind::RParen {
            return Ok(params);
        }

        loop {
            let ty = self.parse_type()?;
            params.push(ty);

            let (name, _) = self.expect_ident("Expected an identifier.")?;
            let mut binding = Binding::new(name, ty, BindingKind::Argument);
            binding.initialised = true;
            self.program.scopes.top_mut().insert(binding);

            if self.peek().kind == TokenKind::Comma {
                self.next();
            } else {
                return Ok(params);
            }
        }
    }

    /// `body := "{" statement* "}"` plus the return checks.
    ///
    /// A void subroutine with no `return` gets `push constant 0; return`
    /// appended. A non-void subroutine must contain a top-level `return`,
    /// or an `if` and an `else` block that each contain one.
    fn subroutine_body(&mut self) -> ParseResult<()> {
        self.expect(TokenKind::LBrace, "Expected a '{'.")?;

        let mut found_return = false;
        self.found_if_return = false;
        self.found_else_return = false;

        while self.peek().kind != TokenKind::RBrace {
            if self.peek().kind == TokenKind::Return {
                found_return = true;
            }
            self.statement()?;
        }
        let brace = self.next(); // consume the '}'

        if self.subroutine_type.as_str() == "void" && !found_return {
            self.emit(Instr::Push(Segment::Constant, 0));
            self.emit(Instr::Return);
            return Ok(());
        }

        if !found_return && !(self.found_if_return && self.found_else_return) {
            return Err(self.error(
                &brace,
                format!(
                    "Not all code paths return a value in subroutine '{}'.",
                    self.subroutine_name
                ),
            ));
        }
        Ok(())
    }
}
