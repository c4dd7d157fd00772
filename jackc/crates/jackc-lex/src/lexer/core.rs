//! Core lexer: the `Lexer` struct and per-character dispatch.

use jackc_util::Diagnostic;

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};

/// Lexer for Jack source code.
///
/// Skips whitespace and comments, then dispatches on the first character of
/// each token. All errors are fatal and name the file and line.
pub struct Lexer<'a> {
    /// Character cursor over the source.
    pub(crate) cursor: Cursor<'a>,

    /// Source file stem, used in diagnostics.
    pub(crate) file: &'a str,

    /// Byte offset where the current token starts.
    pub(crate) token_start: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer over `source`; `file` is the file stem for
    /// diagnostics.
    pub fn new(source: &'a str, file: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
            file,
            token_start: 0,
        }
    }

    /// Returns the next token, or the first fatal lexical error.
    pub fn next_token(&mut self) -> Result<Token, Diagnostic> {
        self.skip_whitespace_and_comments()?;

        self.token_start = self.cursor.position();
        let line = self.cursor.line();

        if self.cursor.is_at_end() {
            return Ok(Token::new(TokenKind::Eof, line));
        }

        let kind = match self.cursor.current() {
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            '[' => self.single(TokenKind::LBracket),
            ']' => self.single(TokenKind::RBracket),
            '{' => self.single(TokenKind::LBrace),
            '}' => self.single(TokenKind::RBrace),
            ',' => self.single(TokenKind::Comma),
            ';' => self.single(TokenKind::Semicolon),
            '=' => self.single(TokenKind::Eq),
            '.' => self.single(TokenKind::Dot),
            '+' => self.single(TokenKind::Plus),
            '-' => self.single(TokenKind::Minus),
            '*' => self.single(TokenKind::Star),
            '/' => self.single(TokenKind::Slash),
            '&' => self.single(TokenKind::And),
            '|' => self.single(TokenKind::Or),
            '~' => self.single(TokenKind::Tilde),
            '<' => self.single(TokenKind::Lt),
            '>' => self.single(TokenKind::Gt),
            '"' => self.lex_string()?,
            c if c.is_ascii_digit() => self.lex_number()?,
            c if c.is_ascii_alphabetic() || c == '_' => self.lex_identifier(),
            c => {
                return Err(self.error_at(line, format!("Invalid symbol '{}'.", c)));
            },
        };

        Ok(Token::new(kind, line))
    }

    /// Consumes one character and returns the given kind.
    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.cursor.advance();
        kind
    }

    /// Builds a fatal lexical error at the given line.
    pub(crate) fn error_at(&self, line: u32, message: impl Into<String>) -> Diagnostic {
        Diagnostic::error(self.file, line, None, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jackc_util::Symbol;

    fn lex_all(source: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(source, "Test");
        let mut kinds = Vec::new();
        loop {
            let token = lexer.next_token().unwrap();
            if token.kind == TokenKind::Eof {
                return kinds;
            }
            kinds.push(token.kind);
        }
    }

    #[test]
    fn test_symbols() {
        assert_eq!(
            lex_all("( ) [ ] { } , ; = . + - * / & | ~ < >"),
            vec![
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::LBracket,
                TokenKind::RBracket,
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::Comma,
                TokenKind::Semicolon,
                TokenKind::Eq,
                TokenKind::Dot,
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::And,
                TokenKind::Or,
                TokenKind::Tilde,
                TokenKind::Lt,
                TokenKind::Gt,
            ]
        );
    }

    #[test]
    fn test_let_statement() {
        assert_eq!(
            lex_all("let x = 42;"),
            vec![
                TokenKind::Let,
                TokenKind::Ident(Symbol::intern("x")),
                TokenKind::Eq,
                TokenKind::IntConst(42),
                TokenKind::Semicolon,
            ]
        );
    }

    #[test]
    fn test_no_space_between_tokens() {
        assert_eq!(
            lex_all("a[i]=b.f(1,2);"),
            vec![
                TokenKind::Ident(Symbol::intern("a")),
                TokenKind::LBracket,
                TokenKind::Ident(Symbol::intern("i")),
                TokenKind::RBracket,
                TokenKind::Eq,
                TokenKind::Ident(Symbol::intern("b")),
                TokenKind::Dot,
                TokenKind::Ident(Symbol::intern("f")),
                TokenKind::LParen,
                TokenKind::IntConst(1),
                TokenKind::Comma,
                TokenKind::IntConst(2),
                TokenKind::RParen,
                TokenKind::Semicolon,
            ]
        );
    }

    #[test]
    fn test_invalid_symbol() {
        let mut lexer = Lexer::new("?", "Bad");
        let err = lexer.next_token().unwrap_err();
        assert_eq!(err.to_string(), "Bad.jack: Error, line 1, Invalid symbol '?'.");
    }
}
