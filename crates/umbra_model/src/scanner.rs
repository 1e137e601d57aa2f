//! Structural scanner: builds a [`DesignModel`] from the token stream.
//!
//! The scanner recognizes module headers (ANSI and non-ANSI), port and net
//! declarations, instantiations and their connections, and the attributes
//! immediately preceding a module. Everything else is stepped over token by
//! token. Malformed elements are reported through the [`DiagnosticSink`] and
//! skipped; the scan always runs to the end of the text.

use umbra_common::Direction;
use umbra_diagnostics::DiagnosticSink;
use umbra_source::{FileId, Span};

use crate::errors;
use crate::lexer::lex;
use crate::model::{positional_formal, Connection, DesignModel, Instantiation, Module, Port};
use crate::token::{Keyword, Token, TokenKind};
use crate::width::{actual_width, dimension_width, matching_close, split_depth0};

/// Scans `source` and returns the structural model.
///
/// Diagnostics for skipped or defaulted elements go to `sink`.
pub fn scan(source: &str, file: FileId, sink: &DiagnosticSink) -> DesignModel {
    let tokens = lex(source, file, sink);
    let mut scanner = Scanner {
        source,
        tokens: &tokens,
        pos: 0,
        sink,
        model: DesignModel::new(),
    };
    scanner.scan_all();
    scanner.model
}

/// How a module body scan ended.
enum BodyEnd {
    /// `endmodule` consumed.
    Closed(Span),
    /// Hit another `module` keyword or the end of input.
    Unterminated,
}

struct Scanner<'a> {
    source: &'a str,
    tokens: &'a [Token],
    pos: usize,
    sink: &'a DiagnosticSink,
    model: DesignModel,
}

impl<'a> Scanner<'a> {
    fn scan_all(&mut self) {
        let mut attributes = Vec::new();
        loop {
            match self.kind() {
                TokenKind::Eof => break,
                TokenKind::AttrOpen => {
                    if let Some(text) = self.attribute() {
                        attributes.push(text);
                    }
                }
                TokenKind::Keyword(Keyword::Module) => {
                    let attrs = std::mem::take(&mut attributes);
                    self.module(attrs);
                }
                TokenKind::Keyword(Keyword::Primitive) => {
                    attributes.clear();
                    self.primitive();
                }
                _ => {
                    attributes.clear();
                    self.pos += 1;
                }
            }
        }
    }

    // ---- token helpers ----

    fn tok(&self) -> Token {
        self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn kind(&self) -> TokenKind {
        self.tok().kind
    }

    fn kind_at(&self, idx: usize) -> TokenKind {
        self.tokens[idx.min(self.tokens.len() - 1)].kind
    }

    fn text(&self, tok: Token) -> &'a str {
        tok.text(self.source)
    }

    /// Text between the start of `first` and the end of `last`.
    fn slice(&self, tokens: &[Token]) -> &'a str {
        match (tokens.first(), tokens.last()) {
            (Some(first), Some(last)) => {
                &self.source[first.span.start as usize..last.span.end as usize]
            }
            _ => "",
        }
    }

    fn span_between(&self, from: usize, to: usize) -> Span {
        let start = self.tokens[from].span;
        let end = self.tokens[to.min(self.tokens.len() - 1)].span;
        Span::new(start.file, start.start, end.end)
    }

    /// Index of the token closing the group opened at `from`, stopping at
    /// `;`, `module`, `endmodule` or end of input.
    fn find_close(&self, from: usize, open: TokenKind, close: TokenKind) -> Result<usize, usize> {
        let mut depth = 0usize;
        let mut i = from;
        loop {
            let kind = self.kind_at(i);
            match kind {
                TokenKind::Eof
                | TokenKind::Semicolon
                | TokenKind::Keyword(Keyword::Module | Keyword::Endmodule) => return Err(i),
                k if k == open => depth += 1,
                k if k == close => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(i);
                    }
                }
                _ => {}
            }
            i += 1;
        }
    }

    /// Skips forward to the next `;` (consumed) without crossing a module
    /// boundary.
    fn skip_statement(&mut self) {
        loop {
            match self.kind() {
                TokenKind::Eof | TokenKind::Keyword(Keyword::Module | Keyword::Endmodule) => {
                    return
                }
                TokenKind::Semicolon => {
                    self.pos += 1;
                    return;
                }
                _ => self.pos += 1,
            }
        }
    }

    /// Consumes `(* ... *)` and returns its trimmed contents.
    ///
    /// An attribute that reaches `;`, `module`, `endmodule` or end of input
    /// before its `*)` is dropped and scanning resumes at that token.
    fn attribute(&mut self) -> Option<String> {
        let open = self.pos;
        let mut i = open + 1;
        loop {
            match self.kind_at(i) {
                TokenKind::AttrClose => break,
                TokenKind::Eof
                | TokenKind::Semicolon
                | TokenKind::Keyword(Keyword::Module | Keyword::Endmodule) => {
                    self.sink.emit(errors::warn_malformed_token(
                        "unterminated attribute",
                        self.span_between(open, open),
                    ));
                    self.pos = i;
                    return None;
                }
                _ => i += 1,
            }
        }
        let inner = &self.tokens[open + 1..i];
        self.pos = i + 1;
        Some(self.slice(inner).trim().to_string())
    }

    // ---- modules ----

    fn primitive(&mut self) {
        self.pos += 1;
        if self.kind().is_name() {
            let name = self.text(self.tok()).to_string();
            self.model.add_primitive(name);
        }
        while !matches!(
            self.kind(),
            TokenKind::Eof | TokenKind::Keyword(Keyword::Endprimitive)
        ) {
            self.pos += 1;
        }
        if self.kind() != TokenKind::Eof {
            self.pos += 1;
        }
    }

    fn module(&mut self, attributes: Vec<String>) {
        let start = self.pos;
        self.pos += 1;
        if !self.kind().is_name() {
            self.sink.emit(errors::warn_unterminated_header(
                "<unnamed>",
                self.span_between(start, self.pos),
            ));
            self.skip_module_body();
            return;
        }
        let name = self.text(self.tok()).to_string();
        let name_pos = self.pos;
        self.pos += 1;

        let mut module = Module::new(name.clone(), self.tokens[start].span);
        module.attributes = attributes;

        if self.header(&mut module).is_err() {
            self.sink.emit(errors::warn_unterminated_header(
                &name,
                self.span_between(start, self.pos),
            ));
            self.skip_module_body();
            return;
        }

        match self.body(&mut module) {
            BodyEnd::Closed(end) => {
                module.span = Some(Span::new(end.file, self.tokens[start].span.start, end.end));
            }
            BodyEnd::Unterminated => {
                self.sink.emit(errors::warn_missing_endmodule(
                    &name,
                    self.span_between(start, name_pos),
                ));
                return;
            }
        }

        for port in &mut module.ports {
            if port.direction == Direction::Unknown {
                self.sink.emit(errors::warn_undeclared_direction(
                    &name,
                    &port.name,
                    self.tokens[name_pos].span,
                ));
                port.direction = Direction::Input;
            }
        }

        tracing::trace!(
            module = %name,
            ports = module.ports.len(),
            instances = module.instantiations.len(),
            "scanned module"
        );

        if let Err(dup) = self.model.insert(module) {
            let prev = self
                .model
                .get(&dup.name)
                .and_then(|m| m.span)
                .unwrap_or(Span::DUMMY);
            self.sink.emit(errors::warn_duplicate_module(
                &dup.name,
                self.span_between(start, name_pos),
                prev,
            ));
        }
    }

    /// Skips to just past the next `endmodule`, or to the next `module`.
    fn skip_module_body(&mut self) {
        loop {
            match self.kind() {
                TokenKind::Eof | TokenKind::Keyword(Keyword::Module) => return,
                TokenKind::Keyword(Keyword::Endmodule) => {
                    self.pos += 1;
                    return;
                }
                _ => self.pos += 1,
            }
        }
    }

    /// Parses `[#(...)] [(ports)] ;`. On `Err` the position is left where
    /// the header stopped making sense.
    fn header(&mut self, module: &mut Module) -> Result<(), ()> {
        // Package imports between the name and the parameter list.
        while self.text(self.tok()) == "import" {
            self.skip_statement();
        }
        if self.kind() == TokenKind::Hash {
            self.pos += 1;
            if self.kind() != TokenKind::LeftParen {
                return Err(());
            }
            self.pos = self.close_group(self.pos)? + 1;
        }
        if self.kind() == TokenKind::LeftParen {
            let open = self.pos;
            let close = self.close_group(open)?;
            self.port_list(module, &self.tokens[open + 1..close]);
            self.pos = close + 1;
        }
        if self.kind() != TokenKind::Semicolon {
            return Err(());
        }
        self.pos += 1;
        Ok(())
    }

    /// Finds the `)` matching the `(` at `open`, moving to the stop point
    /// if there is none.
    fn close_group(&mut self, open: usize) -> Result<usize, ()> {
        match self.find_close(open, TokenKind::LeftParen, TokenKind::RightParen) {
            Ok(close) => Ok(close),
            Err(stop) => {
                self.pos = stop;
                Err(())
            }
        }
    }

    fn port_list(&self, module: &mut Module, tokens: &[Token]) {
        if tokens.is_empty() {
            return;
        }
        let mut direction = Direction::Unknown;
        let mut width: Option<u32> = Some(1);
        for piece in split_depth0(tokens, TokenKind::Comma) {
            let piece = skip_attributes(piece);
            let Some(first) = piece.first() else { continue };
            let explicit_dir = direction_of(first.kind);
            if let Some(dir) = explicit_dir {
                direction = dir;
            }
            let typed = explicit_dir.is_some()
                || matches!(
                    first.kind,
                    TokenKind::Keyword(Keyword::Net | Keyword::Integer | Keyword::Signedness)
                );
            if typed {
                width = self.packed_width(piece);
            }
            let Some(name) = self.declared_name(piece) else { continue };
            if direction == Direction::Unknown {
                // Non-ANSI header: the body supplies direction and width.
                module.ports.push(Port::new(name, Direction::Unknown, 1));
                continue;
            }
            module.nets.insert(name.to_string(), width);
            module.ports.push(Port::new(name, direction, width.unwrap_or(1)));
        }
    }

    /// Width from the packed dimensions before the declared name.
    fn packed_width(&self, decl: &[Token]) -> Option<u32> {
        let mut width: u32 = 1;
        let mut i = 0;
        while i < decl.len() {
            match decl[i].kind {
                TokenKind::Keyword(Keyword::Integer) => width = 32,
                TokenKind::LeftBracket => {
                    let close = matching_close(
                        &decl[i..],
                        TokenKind::LeftBracket,
                        TokenKind::RightBracket,
                    )?;
                    let dim = dimension_width(&decl[i + 1..i + close], self.source)?;
                    width = width.checked_mul(dim)?;
                    i += close;
                }
                kind if kind.is_name() => {
                    // A user type name is followed by the declared name; the
                    // width of such types is unknown.
                    let next = decl.get(i + 1);
                    let user_type = next.is_some_and(|t| {
                        t.kind.is_name() || self.text(*t) == "::"
                    });
                    return if user_type { None } else { Some(width) };
                }
                TokenKind::MacroUsage => return None,
                _ => {}
            }
            i += 1;
        }
        Some(width)
    }

    /// The last name before any initializer, outside brackets.
    fn declared_name(&self, decl: &[Token]) -> Option<&'a str> {
        let mut depth = 0i32;
        let mut name = None;
        for tok in decl {
            match tok.kind {
                TokenKind::LeftBracket | TokenKind::LeftParen | TokenKind::LeftBrace => depth += 1,
                TokenKind::RightBracket | TokenKind::RightParen | TokenKind::RightBrace => {
                    depth -= 1
                }
                TokenKind::Equals if depth == 0 => break,
                TokenKind::Dot if depth == 0 => return None,
                kind if kind.is_name() && depth == 0 => name = Some(self.text(*tok)),
                _ => {}
            }
        }
        name
    }

    fn body(&mut self, module: &mut Module) -> BodyEnd {
        loop {
            let tok = self.tok();
            match tok.kind {
                TokenKind::Eof | TokenKind::Keyword(Keyword::Module) => {
                    return BodyEnd::Unterminated
                }
                TokenKind::Keyword(Keyword::Endmodule) => {
                    self.pos += 1;
                    return BodyEnd::Closed(tok.span);
                }
                TokenKind::AttrOpen => {
                    let _ = self.attribute();
                }
                TokenKind::Keyword(Keyword::Input | Keyword::Output | Keyword::Inout) => {
                    self.declaration(module, direction_of(tok.kind));
                }
                TokenKind::Keyword(Keyword::Net | Keyword::Integer) => {
                    self.declaration(module, None);
                }
                TokenKind::Keyword(Keyword::Function) => self.skip_until(Keyword::Endfunction),
                TokenKind::Keyword(Keyword::Task) => self.skip_until(Keyword::Endtask),
                TokenKind::Identifier | TokenKind::EscapedIdentifier
                    if self.pos == 0 || self.kind_at(self.pos - 1) != TokenKind::Dot =>
                {
                    if !self.instantiation(module) {
                        self.pos += 1;
                    }
                }
                _ => self.pos += 1,
            }
        }
    }

    fn skip_until(&mut self, end: Keyword) {
        while !matches!(
            self.kind(),
            TokenKind::Eof | TokenKind::Keyword(Keyword::Endmodule | Keyword::Module)
        ) {
            let done = self.kind() == TokenKind::Keyword(end);
            self.pos += 1;
            if done {
                return;
            }
        }
    }

    /// A body declaration: `input [7:0] a, b;`, `wire [3:0] x = y;`, ...
    fn declaration(&mut self, module: &mut Module, direction: Option<Direction>) {
        let start = self.pos;
        self.skip_statement();
        let end = if self.tokens[self.pos - 1].kind == TokenKind::Semicolon {
            self.pos - 1
        } else {
            self.pos
        };
        let decl = &self.tokens[start..end];
        let pieces = split_depth0(decl, TokenKind::Comma);
        let width = pieces.first().and_then(|p| self.packed_width(p));
        for piece in pieces {
            let Some(name) = self.declared_name(piece) else { continue };
            module.nets.insert(name.to_string(), width);
            let Some(dir) = direction else { continue };
            if let Some(port) = module.ports.iter_mut().find(|p| p.name == name) {
                if port.direction == Direction::Unknown {
                    port.direction = dir;
                    port.width = width.unwrap_or(1).max(1);
                }
            }
        }
    }

    /// Tries to read `TYPE [#(...)] INST [dims] (conns) {, INST (conns)} ;`
    /// at the current position. Returns `false` without consuming anything
    /// if the tokens do not form an instantiation.
    fn instantiation(&mut self, module: &mut Module) -> bool {
        let start = self.pos;
        let target = self.text(self.tok()).to_string();
        let mut i = start + 1;

        if self.kind_at(i) == TokenKind::Hash {
            i += 1;
            if self.kind_at(i) == TokenKind::LeftParen {
                match self.find_close(i, TokenKind::LeftParen, TokenKind::RightParen) {
                    Ok(close) => i = close + 1,
                    Err(stop) => {
                        self.sink.emit(errors::warn_unbalanced_instantiation(
                            &target,
                            "<unnamed>",
                            self.span_between(start, stop),
                        ));
                        self.pos = stop;
                        self.skip_statement();
                        return true;
                    }
                }
            } else {
                // #5 or #WIDTH
                i += 1;
            }
        }

        if !self.kind_at(i).is_name() {
            return false;
        }
        let mut j = i + 1;
        while self.kind_at(j) == TokenKind::LeftBracket {
            match self.find_close(j, TokenKind::LeftBracket, TokenKind::RightBracket) {
                Ok(close) => j = close + 1,
                Err(_) => return false,
            }
        }
        if self.kind_at(j) != TokenKind::LeftParen {
            return false;
        }

        let mut instances = Vec::new();
        let mut cursor = i;
        loop {
            let inst_name = self.text(self.tokens[cursor]).to_string();
            let mut open = cursor + 1;
            while self.kind_at(open) == TokenKind::LeftBracket {
                match self.find_close(open, TokenKind::LeftBracket, TokenKind::RightBracket) {
                    Ok(close) => open = close + 1,
                    Err(_) => break,
                }
            }
            let close = if self.kind_at(open) == TokenKind::LeftParen {
                self.find_close(open, TokenKind::LeftParen, TokenKind::RightParen)
            } else {
                Err(open)
            };
            let close = match close {
                Ok(close) => close,
                Err(stop) => {
                    self.sink.emit(errors::warn_unbalanced_instantiation(
                        &target,
                        &inst_name,
                        self.span_between(start, stop),
                    ));
                    self.pos = stop;
                    self.skip_statement();
                    return true;
                }
            };
            let connections = self.connections(module, &self.tokens[open + 1..close]);
            instances.push(Instantiation {
                target_module: target.clone(),
                instance_name: inst_name,
                connections,
                span: self.span_between(start, close),
            });
            match self.kind_at(close + 1) {
                TokenKind::Semicolon => {
                    self.pos = close + 2;
                    break;
                }
                TokenKind::Comma if self.kind_at(close + 2).is_name() => cursor = close + 2,
                _ => {
                    self.sink.emit(errors::warn_unbalanced_instantiation(
                        &target,
                        self.text(self.tokens[cursor]),
                        self.span_between(start, close + 1),
                    ));
                    self.pos = close + 1;
                    self.skip_statement();
                    return true;
                }
            }
        }
        module.instantiations.extend(instances);
        true
    }

    fn connections(&self, module: &Module, tokens: &[Token]) -> Vec<Connection> {
        let mut connections = Vec::new();
        if tokens.is_empty() {
            return connections;
        }
        let pieces = split_depth0(tokens, TokenKind::Comma);
        for (index, piece) in pieces.into_iter().enumerate() {
            let piece = skip_attributes(piece);
            let span = match (piece.first(), piece.last()) {
                (Some(f), Some(l)) => Span::new(f.span.file, f.span.start, l.span.end),
                _ => Span::DUMMY,
            };
            if piece.first().map(|t| t.kind) == Some(TokenKind::Dot) {
                let Some(formal_tok) = piece.get(1) else { continue };
                if !formal_tok.kind.is_name() {
                    // .* wildcard
                    continue;
                }
                let formal = self.text(*formal_tok).to_string();
                let actual = match piece.get(2).map(|t| t.kind) {
                    Some(TokenKind::LeftParen) => {
                        let end = piece.len() - 1;
                        if end > 2 && piece[end].kind == TokenKind::RightParen {
                            &piece[3..end]
                        } else {
                            &piece[piece.len()..]
                        }
                    }
                    // Implicit .name connection.
                    _ => &piece[1..2],
                };
                connections.push(self.connection(module, formal, actual, span));
            } else {
                connections.push(self.connection(module, positional_formal(index), piece, span));
            }
        }
        connections
    }

    fn connection(
        &self,
        module: &Module,
        formal: String,
        actual: &[Token],
        span: Span,
    ) -> Connection {
        let text = self.slice(actual);
        Connection {
            formal,
            actual: (!text.is_empty()).then(|| text.to_string()),
            width: actual_width(actual, self.source, &module.nets),
            span,
        }
    }
}

fn direction_of(kind: TokenKind) -> Option<Direction> {
    match kind {
        TokenKind::Keyword(Keyword::Input) => Some(Direction::Input),
        TokenKind::Keyword(Keyword::Output) => Some(Direction::Output),
        TokenKind::Keyword(Keyword::Inout) => Some(Direction::Inout),
        _ => None,
    }
}

/// Drops leading `(* ... *)` groups from a declaration or connection.
fn skip_attributes(mut tokens: &[Token]) -> &[Token] {
    while tokens.first().map(|t| t.kind) == Some(TokenKind::AttrOpen) {
        match tokens.iter().position(|t| t.kind == TokenKind::AttrClose) {
            Some(close) => tokens = &tokens[close + 1..],
            None => return &[],
        }
    }
    tokens
}
