//! Whitespace and comment skipping.

use jackc_util::Diagnostic;

use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Skips whitespace and comments before the next token.
    ///
    /// Line comments run to the next newline or end of input. Multi-line
    /// comments (`/* */`, including `/** */` doc comments) do not nest.
    /// Newlines inside comments still advance the line counter.
    pub(crate) fn skip_whitespace_and_comments(&mut self) -> Result<(), Diagnostic> {
        loop {
            match self.cursor.current() {
                c if c.is_ascii_whitespace() => self.cursor.advance(),
                '/' if self.cursor.peek(1) == '/' => self.skip_line_comment(),
                '/' if self.cursor.peek(1) == '*' => self.skip_block_comment()?,
                _ => return Ok(()),
            }

            if self.cursor.is_at_end() {
                return Ok(());
            }
        }
    }

    /// Skips from `//` to the end of the line.
    fn skip_line_comment(&mut self) {
        self.cursor.advance();
        self.cursor.advance();

        while !self.cursor.is_at_end() && self.cursor.current() != '\n' {
            self.cursor.advance();
        }
    }

    /// Skips a multi-line comment.
    ///
    /// Consumes until the current char is `/` and the previous char is `*`,
    /// with the previous-char state seeded by the opening `*` (so `/*/` is
    /// a complete comment). An unterminated comment is fatal, reported at
    /// the line the comment opened.
    fn skip_block_comment(&mut self) -> Result<(), Diagnostic> {
        let comment_line = self.cursor.line();
        self.cursor.advance(); // '/'
        self.cursor.advance(); // '*'

        let mut previous = '*';
        loop {
            if self.cursor.is_at_end() {
                return Err(self.error_at(
                    comment_line,
                    "Multi-line comment missing closing '*/'.",
                ));
            }

            let current = self.cursor.current();
            if current == '/' && previous == '*' {
                self.cursor.advance();
                return Ok(());
            }

            previous = current;
            self.cursor.advance();
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::token::TokenKind;
    use crate::Lexer;

    fn first_kind(source: &str) -> TokenKind {
        let mut lexer = Lexer::new(source, "Test");
        lexer.next_token().unwrap().kind
    }

    #[test]
    fn test_line_comment_skipped() {
        assert_eq!(first_kind("// nothing here\nreturn"), TokenKind::Return);
    }

    #[test]
    fn test_line_comment_at_eof() {
        assert_eq!(first_kind("// trailing"), TokenKind::Eof);
    }

    #[test]
    fn test_block_comment_skipped() {
        assert_eq!(first_kind("/* a */ let"), TokenKind::Let);
    }

    #[test]
    fn test_doc_comment_skipped() {
        assert_eq!(first_kind("/** docs */ var"), TokenKind::Var);
    }

    #[test]
    fn test_multiline_comment_advances_lines() {
        let mut lexer = Lexer::new("/* one\ntwo\nthree */ do", "Test");
        let token = lexer.next_token().unwrap();
        assert_eq!(token.kind, TokenKind::Do);
        assert_eq!(token.line, 3);
    }

    #[test]
    fn test_slash_star_slash_closes() {
        // The opening '*' doubles as the closer's first half.
        assert_eq!(first_kind("/*/ if"), TokenKind::If);
    }

    #[test]
    fn test_no_nesting() {
        // The first "*/" ends the comment, leaving the rest as tokens.
        let mut lexer = Lexer::new("/* outer /* inner */ x", "Test");
        assert_eq!(
            lexer.next_token().unwrap().kind,
            TokenKind::Ident(jackc_util::Symbol::intern("x"))
        );
    }

    #[test]
    fn test_unterminated_block_comment() {
        let mut lexer = Lexer::new("\n/* never closed\n\n", "Test");
        let err = lexer.next_token().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Test.jack: Error, line 2, Multi-line comment missing closing '*/'."
        );
    }

    #[test]
    fn test_division_not_a_comment() {
        assert_eq!(first_kind("/ 2"), TokenKind::Slash);
    }
}
