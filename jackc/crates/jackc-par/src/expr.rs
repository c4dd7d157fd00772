//! Expression productions.
//!
//! The precedence ladder is encoded in the call chain:
//! `expression` (`&` `|`) → `relational` (`=` `<` `>`) → `arithmetic`
//! (`+` `-`) → `term` (`*` `/`) → `factor` (unary `-` `~`) → `operand`.
//!
//! Besides emitting code, the ladder appends to the innermost typing
//! record: operand type names and the lexemes of the folding operators.
//! `&` and `|` emit code but are never recorded, so the resolver does not
//! fold across them.

use jackc_lex::TokenKind;
use jackc_util::Symbol;

use crate::obligation::ObligationKind;
use crate::vm::{Instr, Segment};
use crate::{argument_count, ParseResult, Parser};

impl<'a> Parser<'a> {
    /// `expr := rel (("&"|"|") rel)*`
    pub(crate) fn expression(&mut self) -> ParseResult<()> {
        self.relational_expression()?;

        loop {
            match self.peek().kind {
                TokenKind::And => {
                    self.next();
                    self.relational_expression()?;
                    self.emit(Instr::And);
                },
                TokenKind::Or => {
                    self.next();
                    self.relational_expression()?;
                    self.emit(Instr::Or);
                },
                _ => return Ok(()),
            }
        }
    }

    /// `rel := arith (("="|"<"|">") arith)*`
    fn relational_expression(&mut self) -> ParseResult<()> {
        self.arithmetic_expression()?;

        loop {
            let op = self.peek().kind;
            let instr = match op {
                TokenKind::Eq => Instr::Eq,
                TokenKind::Lt => Instr::Lt,
                TokenKind::Gt => Instr::Gt,
                _ => return Ok(()),
            };
            self.record(Symbol::intern(&op.to_string()));
            self.next();
            self.arithmetic_expression()?;
            self.emit(instr);
        }
    }

    /// `arith := term (("+"|"-") term)*`
    fn arithmetic_expression(&mut self) -> ParseResult<()> {
        self.term()?;

        loop {
            let op = self.peek().kind;
            let instr = match op {
                TokenKind::Plus => Instr::Add,
                TokenKind::Minus => Instr::Sub,
                _ => return Ok(()),
            };
            self.record(Symbol::intern(&op.to_string()));
            self.next();
            self.term()?;
            self.emit(instr);
        }
    }

    /// `term := factor (("*"|"/") factor)*`
    ///
    /// The VM has no multiply or divide; both lower to OS calls.
    fn term(&mut self) -> ParseResult<()> {
        self.factor()?;

        loop {
            let op = self.peek().kind;
            let routine = match op {
                TokenKind::Star => "multiply",
                TokenKind::Slash => "divide",
                _ => return Ok(()),
            };
            self.record(Symbol::intern(&op.to_string()));
            self.next();
            self.factor()?;
            self.emit(Instr::call(
                Symbol::intern("Math"),
                Symbol::intern(routine),
                2,
            ));
        }
    }

    /// `factor := ("-"|"~")? operand`
    fn factor(&mut self) -> ParseResult<()> {
        match self.peek().kind {
            TokenKind::Minus => {
                self.next();
                self.operand()?;
                self.emit(Instr::Neg);
            },
            TokenKind::Tilde => {
                self.next();
                self.operand()?;
                self.emit(Instr::Not);
            },
            _ => self.operand()?,
        }
        Ok(())
    }

    /// `operand := INT | STRING | "true" | "false" | "null" | "this"
    ///           | "(" expr ")" | IDENT ("." IDENT)? ("[" expr "]" | "(" args? ")")?`
    fn operand(&mut self) -> ParseResult<()> {
        let token = self.next();
        match token.kind {
            TokenKind::IntConst(value) => {
                self.record(Symbol::intern("int"));
                self.emit(Instr::Push(Segment::Constant, value));
            },
            TokenKind::StrConst(text) => {
                self.record(Symbol::intern("String"));
                let content = text.as_str();
                self.emit(Instr::Push(Segment::Constant, content.chars().count() as u32));
                self.emit(Instr::call(Symbol::intern("String"), Symbol::intern("new"), 1));
                for c in content.chars() {
                    self.emit(Instr::Push(Segment::Constant, c as u32));
                    self.emit(Instr::call(
                        Symbol::intern("String"),
                        Symbol::intern("appendChar"),
                        2,
                    ));
                }
            },
            TokenKind::True => {
                // All bits set.
                self.record(Symbol::intern("boolean"));
                self.emit(Instr::Push(Segment::Constant, 1));
                self.emit(Instr::Neg);
            },
            TokenKind::False => {
                self.record(Symbol::intern("boolean"));
                self.emit(Instr::Push(Segment::Constant, 0));
            },
            TokenKind::Null => {
                self.record(Symbol::intern("null"));
                self.emit(Instr::Push(Segment::Constant, 0));
            },
            TokenKind::This => {
                self.record(self.current_class);
                self.emit(Instr::Push(Segment::Pointer, 0));
            },
            TokenKind::LParen => {
                self.expression()?;
                self.expect(TokenKind::RParen, "Expected a ')'.")?;
            },
            TokenKind::Ident(name) => {
                self.ident_operand(name, token)?;
            },
            _ => return Err(self.error(&token, "Unknown constant or variable.")),
        }
        Ok(())
    }

    /// An identifier operand: a variable use, an array read, a call, or a
    /// dotted member reference.
    fn ident_operand(&mut self, first: Symbol, first_token: jackc_lex::Token) -> ParseResult<()> {
        let dotted = self.peek().kind == TokenKind::Dot;

        let base = self
            .program
            .scopes
            .lookup(first)
            .map(|b| (b.ty, b.storage(), b.initialised));

        if !dotted {
            // A bare identifier must be a declared variable; record its
            // declared type for the typing pass.
            match base {
                Some((ty, _, _)) => self.record(ty),
                None => {
                    return Err(self.error(
                        &first_token,
                        "Variable must be declared before being used.",
                    ));
                },
            }
        }

        // Push the base value when the name is an object or scalar in
        // scope; a class name pushes nothing.
        if let Some((_, storage, initialised)) = base {
            if let Some((segment, offset)) = storage {
                self.emit(Instr::Push(segment, offset));
            }
            if !initialised {
                self.warn(&first_token, "Variable not initialised before being used.");
            }
        }

        let mut second = None;
        let mut call_obligation = None;
        if dotted {
            self.next(); // consume '.'
            let (member, member_token) = self.expect_ident("Expected an identifier.")?;
            second = Some(member);

            // `C.new` is a constructor reference: the record carries the
            // constructed class. Anything else carries the member name
            // until the resolver substitutes its type.
            let ctor = if member.as_str() == "new" {
                self.record(first);
                Some(first)
            } else {
                self.record(member);
                None
            };
            call_obligation = Some(self.obligate(
                member_token.line,
                ObligationKind::Call {
                    name: member,
                    ctor,
                    args: Vec::new(),
                    resolved: false,
                    args_match: false,
                },
            ));
        }

        match self.peek().kind {
            TokenKind::LBracket => {
                self.next(); // consume '['

                // The operand turned out to be a subscript; its record
                // entry becomes the ArrayEntry tag and the index expression
                // extends the same record.
                self.replace_last_record(Symbol::intern("ArrayEntry"));

                self.expression()?;
                self.expect(TokenKind::RBracket, "Expected a ']'.")?;
                self.emit(Instr::Add);
                self.emit(Instr::Pop(Segment::Pointer, 1));
                self.emit(Instr::Push(Segment::That, 0));
            },
            TokenKind::LParen => {
                self.next(); // consume '('

                self.push_frame();
                self.expression_list()?;
                let record = self.pop_frame();
                let count = argument_count(&record);
                if let Some(index) = call_obligation {
                    if let ObligationKind::Call { args, .. } =
                        &mut self.program.obligations[index].kind
                    {
                        *args = record;
                    }
                }

                self.expect(TokenKind::RParen, "Expected a ')'.")?;

                let receiver_type = self.program.scopes.lookup(first).map(|b| b.ty);
                match (second, receiver_type) {
                    (None, _) => {
                        self.emit(Instr::Push(Segment::Pointer, 0));
                        self.emit(Instr::call(self.current_class, first, count + 1));
                    },
                    (Some(routine), None) => {
                        self.emit(Instr::call(first, routine, count));
                    },
                    (Some(routine), Some(ty)) => {
                        self.emit(Instr::call(ty, routine, count + 1));
                    },
                }
            },
            _ => {},
        }
        Ok(())
    }

    /// `args := expr ("," expr)*` (possibly empty), all appended to the
    /// innermost typing record.
    pub(crate) fn expression_list(&mut self) -> ParseResult<()> {
        if self.peek().kind == TokenKind::RParen {
            return Ok(());
        }

        self.expression()?;
        while self.peek().kind == TokenKind::Comma {
            self.next();
            self.expression()?;
        }
        Ok(())
    }
}
