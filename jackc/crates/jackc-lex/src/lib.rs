//! jackc-lex - Lexical analysis for the Jack language.
//!
//! Transforms a source byte stream into a [`TokenStream`] of line-tagged
//! tokens. Comments and whitespace are discarded (newlines still advance
//! the line counter), string literals lose their enclosing quotes, and a
//! sentinel end-of-input token terminates every stream.
//!
//! Lexical errors are fatal: [`tokenize`] stops at the first one and
//! returns it as a [`Diagnostic`](jackc_util::Diagnostic) naming the file
//! and line.
//!
//! # Example
//!
//! ```
//! use jackc_lex::{tokenize, TokenKind};
//!
//! let mut tokens = tokenize("class Main { }", "Main").unwrap();
//! assert_eq!(tokens.next().kind, TokenKind::Class);
//! ```

pub mod cursor;
mod lexer;
pub mod token;

pub use cursor::Cursor;
pub use lexer::Lexer;
pub use token::{Token, TokenKind, TokenStream};

use jackc_util::Diagnostic;

/// Tokenizes an entire source file.
///
/// `file` is the source file stem used in diagnostics. The whole file is
/// tokenized up front so the parser can peek without re-entering the lexer.
pub fn tokenize(source: &str, file: &str) -> Result<TokenStream, Diagnostic> {
    let mut lexer = Lexer::new(source, file);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return Ok(TokenStream::new(tokens));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jackc_util::Symbol;

    #[test]
    fn test_tokenize_small_class() {
        let mut tokens = tokenize("class Main { }", "Main").unwrap();
        assert_eq!(tokens.next().kind, TokenKind::Class);
        assert_eq!(
            tokens.next().kind,
            TokenKind::Ident(Symbol::intern("Main"))
        );
        assert_eq!(tokens.next().kind, TokenKind::LBrace);
        assert_eq!(tokens.next().kind, TokenKind::RBrace);
        assert_eq!(tokens.next().kind, TokenKind::Eof);
    }

    #[test]
    fn test_line_numbers_survive_comments() {
        let source = "class A {\n// comment\n/* block\ncomment */\nfield int x;\n}";
        let mut tokens = tokenize(source, "A").unwrap();
        tokens.next(); // class
        tokens.next(); // A
        tokens.next(); // {
        let field = tokens.next();
        assert_eq!(field.kind, TokenKind::Field);
        assert_eq!(field.line, 5);
    }

    #[test]
    fn test_eof_token_always_last() {
        let mut tokens = tokenize("", "Empty").unwrap();
        assert_eq!(tokens.peek().kind, TokenKind::Eof);
        assert_eq!(tokens.next().kind, TokenKind::Eof);
        // Draining past the end keeps yielding the sentinel.
        assert_eq!(tokens.next().kind, TokenKind::Eof);
    }

    #[test]
    fn test_invalid_symbol_is_fatal() {
        let err = tokenize("class A { ? }", "A").unwrap_err();
        assert_eq!(err.to_string(), "A.jack: Error, line 1, Invalid symbol '?'.");
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn digit_runs_lex_to_their_value(value in 0u32..=65535) {
                let source = value.to_string();
                let mut tokens = tokenize(&source, "P").unwrap();
                prop_assert_eq!(tokens.next().kind, TokenKind::IntConst(value));
                prop_assert_eq!(tokens.next().kind, TokenKind::Eof);
            }

            #[test]
            fn identifiers_round_trip(name in "[A-Za-z][A-Za-z0-9]{0,11}") {
                prop_assume!(crate::token::keyword_from_ident(&name).is_none());
                let mut tokens = tokenize(&name, "P").unwrap();
                prop_assert_eq!(
                    tokens.next().kind,
                    TokenKind::Ident(Symbol::intern(&name))
                );
            }

            #[test]
            fn whitespace_never_changes_tokens(pad in "[ \t\n\r]{0,8}") {
                let source = format!("{}return{}", pad, pad);
                let mut tokens = tokenize(&source, "P").unwrap();
                prop_assert_eq!(tokens.next().kind, TokenKind::Return);
                prop_assert_eq!(tokens.next().kind, TokenKind::Eof);
            }
        }
    }
}
