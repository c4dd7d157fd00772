//! String literal lexing.

use jackc_util::{Diagnostic, Symbol};

use crate::token::TokenKind;
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes a string literal.
    ///
    /// The literal runs from the opening `"` to the closing `"` and may
    /// contain any character except a newline. Jack has no escape
    /// sequences. The enclosing quotes are not part of the lexeme.
    pub(crate) fn lex_string(&mut self) -> Result<TokenKind, Diagnostic> {
        let line = self.cursor.line();
        self.cursor.advance();

        let content_start = self.cursor.position();
        loop {
            if self.cursor.is_at_end() {
                return Err(
                    self.error_at(line, "String literal missing closing '\"'.")
                );
            }

            match self.cursor.current() {
                '"' => break,
                '\n' => {
                    return Err(
                        self.error_at(line, "Newline character in string literal.")
                    );
                },
                _ => self.cursor.advance(),
            }
        }

        let content = self.cursor.slice_from(content_start);
        self.cursor.advance(); // closing '"'

        Ok(TokenKind::StrConst(Symbol::intern(content)))
    }
}
