//! Statement productions: `var`, `let`, `if`, `while`, `do`, `return`.

use jackc_lex::TokenKind;
use jackc_util::Symbol;

use crate::obligation::ObligationKind;
use crate::symbols::{Binding, BindingKind};
use crate::vm::{Instr, Segment};
use crate::{argument_count, ParseResult, Parser};

impl<'a> Parser<'a> {
    /// Dispatches one statement on the leading keyword.
    pub(crate) fn statement(&mut self) -> ParseResult<()> {
        match self.peek().kind {
            TokenKind::Var => self.var_declar_statement(),
            TokenKind::Let => self.let_statement(),
            TokenKind::If => self.if_statement(),
            TokenKind::While => self.while_statement(),
            TokenKind::Do => self.do_statement(),
            TokenKind::Return => self.return_statement(),
            _ => {
                let token = self.peek();
                Err(self.error(&token, "Unknown keyword."))
            },
        }
    }

    /// `var type IDENT ("," IDENT)* ";"`
    ///
    /// Locals start uninitialised; a later `let` marks them.
    fn var_declar_statement(&mut self) -> ParseResult<()> {
        self.next(); // consume 'var'

        let ty = self.parse_type()?;

        loop {
            let (name, name_token) = self.expect_ident("Expected an identifier.")?;
            if self.program.scopes.top().contains(name) {
                return Err(self.error(&name_token, "Redeclaration of identifier."));
            }
            self.program
                .scopes
                .top_mut()
                .insert(Binding::new(name, ty, BindingKind::Local));

            if self.peek().kind == TokenKind::Comma {
                self.next();
            } else {
                break;
            }
        }

        self.expect(TokenKind::Semicolon, "Expected a ';'.")?;
        Ok(())
    }

    /// `let IDENT ("[" expr "]")? "=" expr ";"`
    fn let_statement(&mut self) -> ParseResult<()> {
        let let_token = self.next(); // consume 'let'

        let (name, name_token) = self.expect_ident("Expected an identifier.")?;
        let mut lhs = match self.program.scopes.lookup(name) {
            Some(binding) => binding.ty,
            None => {
                return Err(self.error(
                    &name_token,
                    "Variable must be declared before being used.",
                ));
            },
        };
        // The target counts as initialised from here on, so `let x = x + 1;`
        // does not warn about the right-hand use.
        if let Some(binding) = self.program.scopes.lookup_mut(name) {
            binding.initialised = true;
        }

        let mut array_entry = false;
        if self.peek().kind == TokenKind::LBracket {
            array_entry = true;
            lhs = Symbol::intern("ArrayEntry");
            let bracket = self.next(); // consume '['

            self.push_variable(name);

            self.push_frame();
            self.expression()?;
            let index_record = self.pop_frame();
            self.obligate(
                bracket.line,
                ObligationKind::ArrayIndex { expr: index_record },
            );

            self.expect(TokenKind::RBracket, "Expected a ']'.")?;
            self.emit(Instr::Add);
        }

        self.expect(TokenKind::Eq, "Expected a '='.")?;

        self.push_frame();
        self.expression()?;
        let rhs_record = self.pop_frame();
        self.obligate(
            let_token.line,
            ObligationKind::Assignment {
                lhs,
                expr: rhs_record,
                compatible: false,
            },
        );

        if array_entry {
            self.emit(Instr::Pop(Segment::Temp, 0));
            self.emit(Instr::Pop(Segment::Pointer, 1));
            self.emit(Instr::Push(Segment::Temp, 0));
            self.emit(Instr::Pop(Segment::That, 0));
        }

        self.expect(TokenKind::Semicolon, "Expected a ';'.")?;

        if !array_entry {
            let storage = self.program.scopes.lookup(name).and_then(|b| b.storage());
            if let Some((segment, offset)) = storage {
                self.emit(Instr::Pop(segment, offset));
            }
        }
        Ok(())
    }

    /// `if "(" expr ")" "{" statement* "}" ("else" "{" statement* "}")?`
    ///
    /// Condition false jumps past the then-block. Top-level `return`s in
    /// the branches feed the all-paths-return check.
    fn if_statement(&mut self) -> ParseResult<()> {
        self.next(); // consume 'if'
        self.expect(TokenKind::LParen, "Expected a '('.")?;

        // Condition types are not checked; parse into a discarded frame.
        self.push_frame();
        self.expression()?;
        self.pop_frame();

        self.expect(TokenKind::RParen, "Expected a ')'.")?;
        let else_label = self.label();
        self.emit(Instr::Not);
        self.emit(Instr::IfGoto(else_label.clone()));

        self.expect(TokenKind::LBrace, "Expected a '{'.")?;
        while self.peek().kind != TokenKind::RBrace {
            if self.peek().kind == TokenKind::Return {
                self.found_if_return = true;
            }
            self.statement()?;
        }
        self.next(); // consume the '}'

        let end_label = self.label();
        self.emit(Instr::Goto(end_label.clone()));
        self.emit(Instr::Label(else_label));

        if self.peek().kind == TokenKind::Else {
            self.next(); // consume 'else'
            self.expect(TokenKind::LBrace, "Expected a '{'.")?;
            while self.peek().kind != TokenKind::RBrace {
                if self.peek().kind == TokenKind::Return {
                    self.found_else_return = true;
                }
                self.statement()?;
            }
            self.next(); // consume the '}'
        }

        self.emit(Instr::Label(end_label));
        Ok(())
    }

    /// `while "(" expr ")" "{" statement* "}"`
    fn while_statement(&mut self) -> ParseResult<()> {
        self.next(); // consume 'while'
        let start_label = self.label();
        self.emit(Instr::Label(start_label.clone()));

        self.expect(TokenKind::LParen, "Expected a '('.")?;

        self.push_frame();
        self.expression()?;
        self.pop_frame();

        self.expect(TokenKind::RParen, "Expected a ')'.")?;
        let end_label = self.label();
        self.emit(Instr::Not);
        self.emit(Instr::IfGoto(end_label.clone()));

        self.expect(TokenKind::LBrace, "Expected a '{'.")?;
        while self.peek().kind != TokenKind::RBrace {
            self.statement()?;
        }
        self.next(); // consume the '}'

        self.emit(Instr::Goto(start_label));
        self.emit(Instr::Label(end_label));
        Ok(())
    }

    /// `do call ";"`
    fn do_statement(&mut self) -> ParseResult<()> {
        self.next(); // consume 'do'
        self.do_call()
    }

    /// `call := IDENT ("." IDENT)? "(" (expr ("," expr)*)? ")" ";"`
    ///
    /// The emitted call carries a patch marker with the bare callee name;
    /// the trailing `pop temp 0` discards a void callee's return value, and
    /// the resolver strips it once the callee turns out non-void.
    fn do_call(&mut self) -> ParseResult<()> {
        let (first, first_token) = self.expect_ident("Expected an identifier.")?;

        // An object receiver is pushed before the arguments.
        self.push_variable(first);

        let mut second = None;
        if self.peek().kind == TokenKind::Dot {
            self.next(); // consume '.'
            let (name, _) = self.expect_ident("Expected an identifier.")?;
            second = Some(name);
        }

        self.expect(TokenKind::LParen, "Expected a '('.")?;

        let callee = second.unwrap_or(first);
        let ctor = match second {
            Some(s) if s.as_str() == "new" => Some(first),
            _ => None,
        };
        let obligation = self.obligate(
            first_token.line,
            ObligationKind::Call {
                name: callee,
                ctor,
                args: Vec::new(),
                resolved: false,
                args_match: false,
            },
        );

        self.push_frame();
        self.expression_list()?;
        let record = self.pop_frame();
        let count = argument_count(&record);
        if let ObligationKind::Call { args, .. } = &mut self.program.obligations[obligation].kind {
            *args = record;
        }

        self.expect(TokenKind::RParen, "Expected a ')'.")?;
        self.expect(TokenKind::Semicolon, "Expected a ';'.")?;

        let receiver_type = self.program.scopes.lookup(first).map(|b| b.ty);
        match (second, receiver_type) {
            (None, _) => {
                // Bare name: a method call on `this`.
                self.emit(Instr::Push(Segment::Pointer, 0));
                self.emit(Instr::Call {
                    class: self.current_class,
                    routine: first,
                    args: count + 1,
                    marker: Some(first),
                });
            },
            (Some(routine), None) => {
                // The receiver is a class name.
                self.emit(Instr::Call {
                    class: first,
                    routine,
                    args: count,
                    marker: Some(routine),
                });
            },
            (Some(routine), Some(ty)) => {
                // The receiver is an object; dispatch on its type.
                self.emit(Instr::Call {
                    class: ty,
                    routine,
                    args: count + 1,
                    marker: Some(routine),
                });
            },
        }
        self.emit(Instr::Pop(Segment::Temp, 0));
        Ok(())
    }

    /// `return expr? ";"` plus the unreachable-code check.
    fn return_statement(&mut self) -> ParseResult<()> {
        let return_token = self.next(); // consume 'return'

        self.push_frame();
        let mut has_expression = false;
        if self.peek().kind != TokenKind::Semicolon {
            self.expression()?;
            has_expression = true;
        }
        let record = self.pop_frame();
        self.obligate(
            return_token.line,
            ObligationKind::Return {
                declared: self.subroutine_type,
                expr: record,
                compatible: false,
            },
        );

        self.expect(TokenKind::Semicolon, "Expected a ';'.")?;

        // Nothing may follow a return inside its block.
        let after = self.peek();
        if after.kind != TokenKind::RBrace {
            return Err(self.error(&after, "Unreachable code."));
        }

        if self.subroutine_type.as_str() == "void" && !has_expression {
            self.emit(Instr::Push(Segment::Constant, 0));
        }
        self.emit(Instr::Return);
        Ok(())
    }

    /// Pushes a variable's value if the name is in scope; class names
    /// resolve to nothing and push nothing.
    pub(crate) fn push_variable(&mut self, name: Symbol) {
        let storage = self.program.scopes.lookup(name).and_then(|b| b.storage());
        if let Some((segment, offset)) = storage {
            self.emit(Instr::Push(segment, offset));
        }
    }
}
