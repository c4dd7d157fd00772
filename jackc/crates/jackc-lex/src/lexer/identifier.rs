//! Identifier and keyword lexing.

use jackc_util::Symbol;

use crate::token::{keyword_from_ident, TokenKind};
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes an identifier or keyword.
    ///
    /// An identifier starts with a letter or `_` followed by any run of
    /// letters or digits. Underscores are not recognized after the first
    /// character, so `foo_bar` lexes as `foo` and the `_bar` tail starts a
    /// new token.
    pub(crate) fn lex_identifier(&mut self) -> TokenKind {
        self.cursor.advance();
        while self.cursor.current().is_ascii_alphanumeric() {
            self.cursor.advance();
        }

        let text = self.cursor.slice_from(self.token_start);

        keyword_from_ident(text).unwrap_or_else(|| TokenKind::Ident(Symbol::intern(text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_ident(source: &str) -> TokenKind {
        let mut lexer = Lexer::new(source, "Test");
        lexer.lex_identifier()
    }

    #[test]
    fn test_simple_identifier() {
        assert_eq!(lex_ident("counter"), TokenKind::Ident(Symbol::intern("counter")));
    }

    #[test]
    fn test_leading_underscore() {
        assert_eq!(lex_ident("_x"), TokenKind::Ident(Symbol::intern("_x")));
    }

    #[test]
    fn test_digits_in_identifier() {
        assert_eq!(lex_ident("x2y"), TokenKind::Ident(Symbol::intern("x2y")));
    }

    #[test]
    fn test_interior_underscore_stops_identifier() {
        assert_eq!(lex_ident("foo_bar"), TokenKind::Ident(Symbol::intern("foo")));
    }

    #[test]
    fn test_keywords() {
        assert_eq!(lex_ident("class"), TokenKind::Class);
        assert_eq!(lex_ident("constructor"), TokenKind::Constructor);
        assert_eq!(lex_ident("boolean"), TokenKind::Boolean);
        assert_eq!(lex_ident("this"), TokenKind::This);
    }

    #[test]
    fn test_keyword_prefix_is_identifier() {
        assert_eq!(lex_ident("classX"), TokenKind::Ident(Symbol::intern("classX")));
        assert_eq!(lex_ident("returns"), TokenKind::Ident(Symbol::intern("returns")));
    }
}
