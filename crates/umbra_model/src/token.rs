//! Token types for the structural scanner.
//!
//! Only the keywords that shape module structure get their own [`Keyword`]
//! variant; every other reserved word is [`Keyword::Other`]. Token text is
//! never stored; it is sliced out of the design text through the span.

use serde::{Deserialize, Serialize};
use umbra_source::Span;

/// Reserved words the scanner distinguishes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Keyword {
    /// `module` or `macromodule`
    Module,
    /// `endmodule`
    Endmodule,
    /// `primitive`
    Primitive,
    /// `endprimitive`
    Endprimitive,
    /// `function`
    Function,
    /// `endfunction`
    Endfunction,
    /// `task`
    Task,
    /// `endtask`
    Endtask,
    /// `input`
    Input,
    /// `output`
    Output,
    /// `inout`
    Inout,
    /// A net or variable type: `wire`, `reg`, `logic`, `tri`, ...
    Net,
    /// `integer` (32 bits wide)
    Integer,
    /// `signed` / `unsigned`
    Signedness,
    /// Any other reserved word.
    Other,
}

/// The kind of a lexed token.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum TokenKind {
    /// A plain identifier.
    Identifier,
    /// `\escaped.name` (terminated by whitespace).
    EscapedIdentifier,
    /// `$display`, `$clog2`, ...
    SystemIdentifier,
    /// A macro usage such as `` `WIDTH``.
    MacroUsage,
    /// A reserved word.
    Keyword(Keyword),
    /// Unsized decimal literal: `42`.
    IntLiteral,
    /// Based literal: `8'hFF`, `'b0`.
    SizedLiteral,
    /// Real literal: `1.5`, `2e3`.
    RealLiteral,
    /// `"text"`
    StringLiteral,
    /// `(*`
    AttrOpen,
    /// `*)`
    AttrClose,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `:`
    Colon,
    /// `.`
    Dot,
    /// `#`
    Hash,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `=`
    Equals,
    /// Any other operator byte.
    Operator,
    /// End of input.
    Eof,
}

impl TokenKind {
    /// Returns `true` for identifiers usable as module, instance or port names.
    pub fn is_name(self) -> bool {
        matches!(self, TokenKind::Identifier | TokenKind::EscapedIdentifier)
    }

    /// Returns `true` for `input`, `output` and `inout`.
    pub fn is_direction(self) -> bool {
        matches!(
            self,
            TokenKind::Keyword(Keyword::Input | Keyword::Output | Keyword::Inout)
        )
    }
}

/// A token and where it came from.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Token {
    /// The kind.
    pub kind: TokenKind,
    /// Location in the design text.
    pub span: Span,
}

impl Token {
    /// Returns the token's text.
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.span.start as usize..self.span.end as usize]
    }
}

/// Classifies a reserved word. Returns `None` for ordinary identifiers.
pub fn lookup_keyword(s: &str) -> Option<Keyword> {
    let kw = match s {
        "module" | "macromodule" => Keyword::Module,
        "endmodule" => Keyword::Endmodule,
        "primitive" => Keyword::Primitive,
        "endprimitive" => Keyword::Endprimitive,
        "function" => Keyword::Function,
        "endfunction" => Keyword::Endfunction,
        "task" => Keyword::Task,
        "endtask" => Keyword::Endtask,
        "input" => Keyword::Input,
        "output" => Keyword::Output,
        "inout" => Keyword::Inout,
        "wire" | "reg" | "logic" | "bit" | "tri" | "tri0" | "tri1" | "triand" | "trior"
        | "trireg" | "wand" | "wor" | "supply0" | "supply1" | "uwire" | "var" => Keyword::Net,
        "integer" => Keyword::Integer,
        "signed" | "unsigned" => Keyword::Signedness,
        "always" | "always_comb" | "always_ff" | "always_latch" | "and" | "assert"
        | "assign" | "assume" | "automatic" | "begin" | "buf" | "bufif0" | "bufif1"
        | "byte" | "case" | "casex" | "casez" | "cmos" | "const" | "cover" | "deassign"
        | "default" | "defparam" | "disable" | "do" | "edge" | "else" | "end" | "endcase"
        | "endgenerate" | "endspecify" | "endtable" | "enum" | "event" | "final" | "for"
        | "force" | "forever" | "fork" | "generate" | "genvar" | "if" | "import"
        | "initial" | "int" | "join" | "localparam" | "longint" | "nand" | "negedge"
        | "nmos" | "nor" | "not" | "notif0" | "notif1" | "or" | "parameter" | "pmos"
        | "posedge" | "property" | "pulldown" | "pullup" | "rcmos" | "real" | "realtime"
        | "release" | "repeat" | "return" | "rnmos" | "rpmos" | "rtran" | "rtranif0"
        | "rtranif1" | "scalared" | "shortint" | "specify" | "specparam" | "static"
        | "string" | "struct" | "table" | "time" | "tran" | "tranif0" | "tranif1"
        | "typedef" | "unique" | "vectored" | "void" | "wait" | "while" | "xnor" | "xor" => {
            Keyword::Other
        }
        _ => return None,
    };
    Some(kw)
}
