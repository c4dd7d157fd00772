//! Integer constant lexing.

use jackc_util::Diagnostic;

use crate::token::TokenKind;
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes a run of decimal digits into an integer constant.
    pub(crate) fn lex_number(&mut self) -> Result<TokenKind, Diagnostic> {
        let line = self.cursor.line();
        while self.cursor.current().is_ascii_digit() {
            self.cursor.advance();
        }

        let text = self.cursor.slice_from(self.token_start);
        match text.parse::<u32>() {
            Ok(value) => Ok(TokenKind::IntConst(value)),
            Err(_) => Err(self.error_at(line, "Integer constant too large.")),
        }
    }
}
