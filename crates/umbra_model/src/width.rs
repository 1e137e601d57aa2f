//! Width inference for connection actuals and declaration ranges.
//!
//! Only literal arithmetic is understood. Parameters, macros and operators
//! leave a width unresolved instead of guessing.

use std::collections::BTreeMap;

use crate::model::ActualWidth;
use crate::token::{Token, TokenKind};

/// Resolves the width of the actual expression in `tokens`.
///
/// `nets` holds the declared widths of the enclosing module.
pub fn actual_width(
    tokens: &[Token],
    source: &str,
    nets: &BTreeMap<String, Option<u32>>,
) -> ActualWidth {
    if tokens.is_empty() {
        return ActualWidth::Unconnected;
    }
    match resolve(tokens, source, nets) {
        Some(w) => ActualWidth::Resolved(w),
        None => ActualWidth::Unresolved,
    }
}

fn resolve(tokens: &[Token], source: &str, nets: &BTreeMap<String, Option<u32>>) -> Option<u32> {
    let tokens = strip_parens(tokens);
    let first = tokens.first()?;
    match first.kind {
        TokenKind::SizedLiteral if tokens.len() == 1 => literal_size(first.text(source)),
        TokenKind::LeftBrace => {
            let inner = enclosed(tokens, TokenKind::LeftBrace, TokenKind::RightBrace)?;
            braced_width(inner, source, nets)
        }
        kind if kind.is_name() => {
            let name = first.text(source);
            if tokens.len() == 1 {
                return match nets.get(name) {
                    Some(declared) => *declared,
                    None => Some(1),
                };
            }
            last_select_width(&tokens[1..], source)
        }
        _ => None,
    }
}

/// Width of a trailing `[...]` select chain such as `[3][7:0]`.
fn last_select_width(tokens: &[Token], source: &str) -> Option<u32> {
    let mut rest = tokens;
    let mut last = None;
    while !rest.is_empty() {
        if rest[0].kind != TokenKind::LeftBracket {
            return None;
        }
        let close = matching_close(rest, TokenKind::LeftBracket, TokenKind::RightBracket)?;
        last = Some(&rest[1..close]);
        rest = &rest[close + 1..];
    }
    select_width(last?, source)
}

/// Width selected by the inside of one `[...]`.
fn select_width(inner: &[Token], source: &str) -> Option<u32> {
    match split_depth0(inner, TokenKind::Colon).as_slice() {
        [_index] => Some(1),
        [lhs, rhs] => {
            if let Some(last) = lhs.last() {
                if matches!(last.kind, TokenKind::Plus | TokenKind::Minus) {
                    return constant(rhs, source).filter(|&w| w > 0);
                }
            }
            range_width(lhs, rhs, source)
        }
        _ => None,
    }
}

/// Width of a `[hi:lo]` range with literal bounds. Ranges wider than
/// `u32::MAX` bits are unresolved.
pub fn range_width(hi: &[Token], lo: &[Token], source: &str) -> Option<u32> {
    let hi = constant(hi, source)?;
    let lo = constant(lo, source)?;
    hi.abs_diff(lo).checked_add(1)
}

/// Width of the inside of a packed dimension list such as `[7:0]`.
pub fn dimension_width(inner: &[Token], source: &str) -> Option<u32> {
    match split_depth0(inner, TokenKind::Colon).as_slice() {
        [hi, lo] => range_width(hi, lo, source),
        _ => None,
    }
}

fn braced_width(
    inner: &[Token],
    source: &str,
    nets: &BTreeMap<String, Option<u32>>,
) -> Option<u32> {
    // Replication: {n{x}}
    if let Some(open) = inner.iter().position(|t| t.kind == TokenKind::LeftBrace) {
        let count_tokens = &inner[..open];
        if open > 0 && !count_tokens.iter().any(|t| t.kind == TokenKind::Comma) {
            let close = matching_close(&inner[open..], TokenKind::LeftBrace, TokenKind::RightBrace)?;
            if open + close + 1 != inner.len() {
                return None;
            }
            let count = constant(count_tokens, source)?;
            let body = braced_width(&inner[open + 1..open + close], source, nets)?;
            return count.checked_mul(body);
        }
    }
    let mut total: u32 = 0;
    for part in split_depth0(inner, TokenKind::Comma) {
        if part.is_empty() {
            return None;
        }
        total = total.checked_add(resolve(part, source, nets)?)?;
    }
    Some(total)
}

/// Size prefix of a sized literal: `8'hFF` is 8 bits. Unsized literals
/// (`'b0`) have no width.
pub fn literal_size(text: &str) -> Option<u32> {
    let (size, _) = text.split_once('\'')?;
    let digits: String = size.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok().filter(|&n| n > 0)
}

/// Evaluates a single unsized decimal literal.
fn constant(tokens: &[Token], source: &str) -> Option<u32> {
    match strip_parens(tokens) {
        [tok] if tok.kind == TokenKind::IntLiteral => tok.text(source).replace('_', "").parse().ok(),
        _ => None,
    }
}

/// Removes redundant enclosing parentheses: `((x))` is `x`.
fn strip_parens(mut tokens: &[Token]) -> &[Token] {
    while let Some(inner) = enclosed(tokens, TokenKind::LeftParen, TokenKind::RightParen) {
        tokens = inner;
    }
    tokens
}

/// Returns the inside of `tokens` if the whole slice is one `open ... close` group.
fn enclosed(tokens: &[Token], open: TokenKind, close: TokenKind) -> Option<&[Token]> {
    if tokens.first()?.kind != open {
        return None;
    }
    let end = matching_close(tokens, open, close)?;
    (end == tokens.len() - 1).then(|| &tokens[1..end])
}

/// Index of the token closing the group opened at `tokens[0]`.
pub(crate) fn matching_close(tokens: &[Token], open: TokenKind, close: TokenKind) -> Option<usize> {
    let mut depth = 0usize;
    for (i, tok) in tokens.iter().enumerate() {
        if tok.kind == open {
            depth += 1;
        } else if tok.kind == close {
            depth = depth.checked_sub(1)?;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

/// Splits at `sep` tokens not nested in any bracket pair.
pub(crate) fn split_depth0(tokens: &[Token], sep: TokenKind) -> Vec<&[Token]> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, tok) in tokens.iter().enumerate() {
        match tok.kind {
            TokenKind::LeftParen
            | TokenKind::LeftBracket
            | TokenKind::LeftBrace
            | TokenKind::AttrOpen => depth += 1,
            TokenKind::RightParen
            | TokenKind::RightBracket
            | TokenKind::RightBrace
            | TokenKind::AttrClose => depth -= 1,
            kind if kind == sep && depth == 0 => {
                parts.push(&tokens[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&tokens[start..]);
    parts
}
