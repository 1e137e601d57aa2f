//! Lexical analyzer for Verilog design text.
//!
//! Produces the token stream the structural scanner walks. Whitespace,
//! comments and known compiler directives are skipped. Any other backtick
//! name becomes a [`TokenKind::MacroUsage`] token so that macro-valued
//! widths show up as unresolved rather than vanishing. Attribute delimiters
//! `(*` and `*)` are lexed as their own tokens, except for the `@(*)`
//! sensitivity wildcard.
//!
//! Lexical problems are warnings: the design text still passes through
//! emission unchanged, so the scanner only needs a best-effort token stream.

use crate::errors::warn_malformed_token;
use crate::token::{lookup_keyword, Token, TokenKind};
use umbra_diagnostics::DiagnosticSink;
use umbra_source::{FileId, Span};

/// Directives skipped up to the end of their line.
const LINE_DIRECTIVES: &[&str] = &[
    "define",
    "undef",
    "undefineall",
    "include",
    "timescale",
    "ifdef",
    "ifndef",
    "elsif",
    "else",
    "endif",
    "resetall",
    "default_nettype",
    "celldefine",
    "endcelldefine",
    "unconnected_drive",
    "nounconnected_drive",
    "line",
    "pragma",
    "begin_keywords",
    "end_keywords",
];

/// Lexes design text into tokens.
///
/// The returned vector always ends with a [`TokenKind::Eof`] token.
pub fn lex(source: &str, file: FileId, sink: &DiagnosticSink) -> Vec<Token> {
    let mut lexer = Lexer {
        source: source.as_bytes(),
        pos: 0,
        file,
        sink,
        attr_depth: 0,
    };
    lexer.lex_all()
}

struct Lexer<'a> {
    source: &'a [u8],
    pos: usize,
    file: FileId,
    sink: &'a DiagnosticSink,
    attr_depth: u32,
}

impl Lexer<'_> {
    fn lex_all(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            self.skip_trivia();
            if self.pos >= self.source.len() {
                tokens.push(Token {
                    kind: TokenKind::Eof,
                    span: Span::new(self.file, self.pos as u32, self.pos as u32),
                });
                break;
            }
            tokens.push(self.next_token());
        }
        tokens
    }

    fn peek(&self) -> u8 {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> u8 {
        self.source.get(self.pos + offset).copied().unwrap_or(0)
    }

    /// Returns `true` if the `*` at the cursor is closed by `)` with only
    /// whitespace between, as in `@(*)` or `@( * )`.
    fn wildcard_follows(&self) -> bool {
        let mut offset = 1;
        while self.peek_at(offset).is_ascii_whitespace() {
            offset += 1;
        }
        self.peek_at(offset) == b')'
    }

    fn at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(self.file, start as u32, self.pos as u32)
    }

    fn token(&self, kind: TokenKind, start: usize) -> Token {
        Token {
            kind,
            span: self.span_from(start),
        }
    }

    fn skip_trivia(&mut self) {
        loop {
            while !self.at_end() && self.peek().is_ascii_whitespace() {
                self.pos += 1;
            }
            if self.at_end() {
                return;
            }
            if self.peek() == b'/' && self.peek_at(1) == b'/' {
                self.skip_to_eol();
                continue;
            }
            if self.peek() == b'/' && self.peek_at(1) == b'*' {
                let start = self.pos;
                self.pos += 2;
                loop {
                    if self.at_end() {
                        self.sink.emit(warn_malformed_token(
                            "unterminated block comment",
                            self.span_from(start),
                        ));
                        break;
                    }
                    if self.peek() == b'*' && self.peek_at(1) == b'/' {
                        self.pos += 2;
                        break;
                    }
                    self.pos += 1;
                }
                continue;
            }
            if self.peek() == b'`' && self.is_line_directive() {
                self.skip_directive();
                continue;
            }
            break;
        }
    }

    fn skip_to_eol(&mut self) {
        while !self.at_end() && self.peek() != b'\n' {
            self.pos += 1;
        }
    }

    fn directive_name(&self) -> &[u8] {
        let start = self.pos + 1;
        let mut end = start;
        while end < self.source.len() && is_ident_char(self.source[end]) {
            end += 1;
        }
        &self.source[start..end]
    }

    fn is_line_directive(&self) -> bool {
        let name = self.directive_name();
        LINE_DIRECTIVES.iter().any(|d| d.as_bytes() == name)
    }

    /// Skips a directive line. Macro bodies continue across backslash-newlines.
    fn skip_directive(&mut self) {
        loop {
            self.skip_to_eol();
            let line = &self.source[..self.pos];
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            let continued = line.last() == Some(&b'\\') && !self.at_end();
            if !continued {
                break;
            }
            self.pos += 1;
        }
    }

    fn next_token(&mut self) -> Token {
        let start = self.pos;
        let b = self.peek();

        if is_ident_start(b) {
            return self.lex_identifier_or_keyword(start);
        }
        if b == b'\\' {
            return self.lex_escaped_identifier(start);
        }
        if b == b'$' {
            return self.lex_system_identifier(start);
        }
        if b == b'`' {
            return self.lex_macro_usage(start);
        }
        if b.is_ascii_digit() {
            return self.lex_number(start);
        }
        if b == b'\''
            && matches!(
                self.peek_at(1).to_ascii_lowercase(),
                b'b' | b'o' | b'd' | b'h' | b's'
            )
        {
            return self.lex_unsized_based_literal(start);
        }
        if b == b'"' {
            return self.lex_string(start);
        }
        self.lex_operator(start)
    }

    fn lex_identifier_or_keyword(&mut self, start: usize) -> Token {
        while !self.at_end() && is_ident_char(self.peek()) {
            self.pos += 1;
        }
        let text = std::str::from_utf8(&self.source[start..self.pos]).unwrap_or("");
        let kind = match lookup_keyword(text) {
            Some(kw) => TokenKind::Keyword(kw),
            None => TokenKind::Identifier,
        };
        self.token(kind, start)
    }

    fn lex_escaped_identifier(&mut self, start: usize) -> Token {
        self.pos += 1;
        while !self.at_end() && !self.peek().is_ascii_whitespace() {
            self.pos += 1;
        }
        if self.pos == start + 1 {
            self.sink.emit(warn_malformed_token(
                "empty escaped identifier",
                self.span_from(start),
            ));
            return self.token(TokenKind::Operator, start);
        }
        self.token(TokenKind::EscapedIdentifier, start)
    }

    fn lex_system_identifier(&mut self, start: usize) -> Token {
        self.pos += 1;
        while !self.at_end() && is_ident_char(self.peek()) {
            self.pos += 1;
        }
        self.token(TokenKind::SystemIdentifier, start)
    }

    fn lex_macro_usage(&mut self, start: usize) -> Token {
        self.pos += 1;
        while !self.at_end() && is_ident_char(self.peek()) {
            self.pos += 1;
        }
        self.token(TokenKind::MacroUsage, start)
    }

    fn lex_number(&mut self, start: usize) -> Token {
        self.eat_decimal_digits();

        // Size prefix, e.g. 8'hFF. Whitespace between size and tick is legal.
        let mut ahead = self.pos;
        while ahead < self.source.len() && matches!(self.source[ahead], b' ' | b'\t') {
            ahead += 1;
        }
        if self.source.get(ahead) == Some(&b'\'') {
            let mut base_at = ahead + 1;
            if matches!(self.source.get(base_at), Some(b's' | b'S')) {
                base_at += 1;
            }
            let base = self
                .source
                .get(base_at)
                .map(|b| b.to_ascii_lowercase())
                .unwrap_or(0);
            if matches!(base, b'b' | b'o' | b'd' | b'h') {
                self.pos = base_at + 1;
                self.eat_based_digits(base);
                return self.token(TokenKind::SizedLiteral, start);
            }
        }

        if self.peek() == b'.' && self.peek_at(1).is_ascii_digit() {
            self.pos += 1;
            self.eat_decimal_digits();
            self.eat_exponent();
            return self.token(TokenKind::RealLiteral, start);
        }

        if matches!(self.peek(), b'e' | b'E') {
            self.eat_exponent();
            return self.token(TokenKind::RealLiteral, start);
        }

        self.token(TokenKind::IntLiteral, start)
    }

    fn lex_unsized_based_literal(&mut self, start: usize) -> Token {
        self.pos += 1;
        if matches!(self.peek(), b's' | b'S') {
            self.pos += 1;
        }
        let base = self.peek().to_ascii_lowercase();
        if matches!(base, b'b' | b'o' | b'd' | b'h') {
            self.pos += 1;
            self.eat_based_digits(base);
        }
        self.token(TokenKind::SizedLiteral, start)
    }

    fn eat_decimal_digits(&mut self) {
        while !self.at_end() && (self.peek().is_ascii_digit() || self.peek() == b'_') {
            self.pos += 1;
        }
    }

    fn eat_based_digits(&mut self, base: u8) {
        while !self.at_end() && matches!(self.peek(), b' ' | b'\t') {
            self.pos += 1;
        }
        while !self.at_end() {
            let ch = self.peek().to_ascii_lowercase();
            let valid = match base {
                b'b' => matches!(ch, b'0' | b'1' | b'x' | b'z' | b'?' | b'_'),
                b'o' => matches!(ch, b'0'..=b'7' | b'x' | b'z' | b'?' | b'_'),
                b'd' => ch.is_ascii_digit() || matches!(ch, b'x' | b'z' | b'?' | b'_'),
                b'h' => ch.is_ascii_hexdigit() || matches!(ch, b'x' | b'z' | b'?' | b'_'),
                _ => false,
            };
            if !valid {
                break;
            }
            self.pos += 1;
        }
    }

    fn eat_exponent(&mut self) {
        if matches!(self.peek(), b'e' | b'E') {
            self.pos += 1;
            if matches!(self.peek(), b'+' | b'-') {
                self.pos += 1;
            }
            self.eat_decimal_digits();
        }
    }

    fn lex_string(&mut self, start: usize) -> Token {
        self.pos += 1;
        loop {
            if self.at_end() || self.peek() == b'\n' {
                self.sink.emit(warn_malformed_token(
                    "unterminated string literal",
                    self.span_from(start),
                ));
                return self.token(TokenKind::StringLiteral, start);
            }
            match self.peek() {
                b'\\' => self.pos = (self.pos + 2).min(self.source.len()),
                b'"' => {
                    self.pos += 1;
                    return self.token(TokenKind::StringLiteral, start);
                }
                _ => self.pos += 1,
            }
        }
    }

    fn lex_operator(&mut self, start: usize) -> Token {
        let b = self.peek();
        self.pos += 1;
        let kind = match b {
            b'(' => {
                if self.peek() == b'*' && !self.wildcard_follows() {
                    self.pos += 1;
                    self.attr_depth += 1;
                    TokenKind::AttrOpen
                } else {
                    TokenKind::LeftParen
                }
            }
            b'*' if self.attr_depth > 0 && self.peek() == b')' => {
                self.pos += 1;
                self.attr_depth -= 1;
                TokenKind::AttrClose
            }
            b')' => TokenKind::RightParen,
            b'[' => TokenKind::LeftBracket,
            b']' => TokenKind::RightBracket,
            b'{' => TokenKind::LeftBrace,
            b'}' => TokenKind::RightBrace,
            b',' => TokenKind::Comma,
            b';' => {
                self.attr_depth = 0;
                TokenKind::Semicolon
            }
            b':' => {
                if self.peek() == b':' {
                    self.pos += 1;
                    TokenKind::Operator
                } else {
                    TokenKind::Colon
                }
            }
            b'.' => TokenKind::Dot,
            b'#' => TokenKind::Hash,
            b'+' => TokenKind::Plus,
            b'-' => TokenKind::Minus,
            b'=' => {
                if self.peek() == b'=' {
                    while self.peek() == b'=' || self.peek() == b'?' {
                        self.pos += 1;
                    }
                    TokenKind::Operator
                } else {
                    TokenKind::Equals
                }
            }
            b'<' | b'>' | b'!' => {
                while matches!(self.peek(), b'=' | b'<' | b'>') {
                    self.pos += 1;
                }
                TokenKind::Operator
            }
            b if b.is_ascii() => TokenKind::Operator,
            _ => {
                // Consume the rest of a multi-byte UTF-8 sequence.
                while !self.at_end() && (self.peek() & 0xC0) == 0x80 {
                    self.pos += 1;
                }
                TokenKind::Operator
            }
        };
        self.token(kind, start)
    }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Keyword;
    use umbra_diagnostics::Diagnostic;

    fn lex_with_diagnostics(source: &str) -> (Vec<Token>, Vec<Diagnostic>) {
        let sink = DiagnosticSink::new();
        let tokens = lex(source, FileId::from_raw(0), &sink);
        (tokens, sink.take_all())
    }

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex_with_diagnostics(source)
            .0
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn texts(source: &str) -> Vec<String> {
        lex_with_diagnostics(source)
            .0
            .iter()
            .filter(|t| t.kind != TokenKind::Eof)
            .map(|t| t.text(source).to_string())
            .collect()
    }

    #[test]
    fn empty_input() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
        assert_eq!(kinds("  \n\t "), vec![TokenKind::Eof]);
    }

    #[test]
    fn module_header() {
        assert_eq!(
            kinds("module top(input a);"),
            vec![
                TokenKind::Keyword(Keyword::Module),
                TokenKind::Identifier,
                TokenKind::LeftParen,
                TokenKind::Keyword(Keyword::Input),
                TokenKind::Identifier,
                TokenKind::RightParen,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn escaped_and_system_identifiers() {
        let src = "\\bus[0] $clog2";
        assert_eq!(
            kinds(src),
            vec![
                TokenKind::EscapedIdentifier,
                TokenKind::SystemIdentifier,
                TokenKind::Eof
            ]
        );
        assert_eq!(texts(src), vec!["\\bus[0]", "$clog2"]);
    }

    #[test]
    fn sized_literals() {
        assert_eq!(
            texts("8'hFF 4'b10x1 16 'd5 3'sb101"),
            vec!["8'hFF", "4'b10x1", "16 'd5", "3'sb101"]
        );
        assert_eq!(
            kinds("8'hFF 'b0 12"),
            vec![
                TokenKind::SizedLiteral,
                TokenKind::SizedLiteral,
                TokenKind::IntLiteral,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn real_literals() {
        assert_eq!(
            kinds("1.5 2e3"),
            vec![TokenKind::RealLiteral, TokenKind::RealLiteral, TokenKind::Eof]
        );
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(texts("a // b c\n/* d\ne */ f"), vec!["a", "f"]);
    }

    #[test]
    fn attribute_delimiters() {
        assert_eq!(
            kinds("(* blackbox *)"),
            vec![
                TokenKind::AttrOpen,
                TokenKind::Identifier,
                TokenKind::AttrClose,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn sensitivity_wildcard_is_not_an_attribute() {
        for src in ["@(*) a * b", "@(* ) a", "@(*\n) a"] {
            let k = kinds(src);
            assert!(!k.contains(&TokenKind::AttrOpen), "{src}");
            assert!(!k.contains(&TokenKind::AttrClose), "{src}");
        }
    }

    #[test]
    fn directives_are_skipped() {
        let src = "`timescale 1ns/1ps\n`define W \\\n  8\nmodule m; endmodule";
        assert_eq!(texts(src), vec!["module", "m", ";", "endmodule"]);
    }

    #[test]
    fn macro_usage_is_a_token() {
        let src = "wire [`W-1:0] x;";
        assert!(kinds(src).contains(&TokenKind::MacroUsage));
        assert!(texts(src).contains(&"`W".to_string()));
    }

    #[test]
    fn comparison_operators_do_not_split() {
        assert_eq!(texts("a <= b == c"), vec!["a", "<=", "b", "==", "c"]);
        assert_eq!(
            kinds("= =="),
            vec![TokenKind::Equals, TokenKind::Operator, TokenKind::Eof]
        );
    }

    #[test]
    fn string_with_escape() {
        assert_eq!(texts(r#""a\"b" c"#), vec![r#""a\"b""#, "c"]);
    }

    #[test]
    fn unterminated_comment_warns() {
        let (tokens, diags) = lex_with_diagnostics("a /* never closed");
        assert_eq!(tokens.len(), 2);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code.to_string(), "P100");
    }

    #[test]
    fn spans_cover_token_text() {
        let src = "leaf u0 (.a(sig));";
        let (tokens, _) = lex_with_diagnostics(src);
        assert_eq!(tokens[1].span.start, 5);
        assert_eq!(tokens[1].span.end, 7);
        assert_eq!(tokens[1].text(src), "u0");
    }
}
