//! Template-list discovery.
//!
//! WGSL cannot tell `a < b` from the start of `vec4<f32>` with one token of
//! lookahead, so `<` and `>` are disambiguated over the whole token stream
//! before parsing: a `<` that follows an identifier is a candidate, and it
//! becomes a template start if a `>` at the same nesting depth closes it
//! before an expression terminator does.

use wgslx_ast::Span;

use crate::token::{Token, TokenKind};

#[derive(Clone, Copy)]
struct Pending {
    /// Index of the candidate `<` token.
    index: usize,
    depth: usize,
}

/// Rewrites matched `<`/`>` pairs into [`TokenKind::TemplateStart`] and
/// [`TokenKind::TemplateEnd`], splitting `>>`, `>=` and `>>=` when their
/// first character closes a list.
pub fn discover_templates(tokens: &mut Vec<Token>) {
    let mut pending: Vec<Pending> = Vec::new();
    let mut depth = 0usize;
    let mut i = 0;

    while i < tokens.len() {
        match tokens[i].kind {
            TokenKind::Ident(_) => {
                if tokens.get(i + 1).is_some_and(|t| t.kind == TokenKind::Less) {
                    pending.push(Pending {
                        index: i + 1,
                        depth,
                    });
                    i += 1;
                }
            }
            TokenKind::Greater
            | TokenKind::GreaterEqual
            | TokenKind::ShiftRight
            | TokenKind::ShiftRightEqual => {
                if let Some(top) = pending.last().copied() {
                    if top.depth == depth {
                        pending.pop();
                        tokens[top.index].kind = TokenKind::TemplateStart;
                        split_template_end(tokens, i);
                    }
                }
            }
            TokenKind::LParen | TokenKind::LBracket => depth += 1,
            TokenKind::RParen | TokenKind::RBracket => {
                while pending.last().is_some_and(|p| p.depth >= depth) {
                    pending.pop();
                }
                depth = depth.saturating_sub(1);
            }
            TokenKind::AndAnd | TokenKind::OrOr => {
                while pending.last().is_some_and(|p| p.depth == depth) {
                    pending.pop();
                }
            }
            TokenKind::Semicolon
            | TokenKind::LBrace
            | TokenKind::Colon
            | TokenKind::Equal
            | TokenKind::PlusEqual
            | TokenKind::MinusEqual
            | TokenKind::StarEqual
            | TokenKind::SlashEqual
            | TokenKind::PercentEqual
            | TokenKind::AndEqual
            | TokenKind::OrEqual
            | TokenKind::XorEqual
            | TokenKind::ShiftLeftEqual => {
                depth = 0;
                pending.clear();
            }
            _ => {}
        }
        i += 1;
    }
}

/// Turns the `>`-led token at `index` into a template end, inserting what
/// is left of it as a separate token right after.
fn split_template_end(tokens: &mut Vec<Token>, index: usize) {
    let rest = match tokens[index].kind {
        TokenKind::GreaterEqual => Some(TokenKind::Equal),
        TokenKind::ShiftRight => Some(TokenKind::Greater),
        TokenKind::ShiftRightEqual => Some(TokenKind::GreaterEqual),
        _ => None,
    };
    let span = tokens[index].span;
    tokens[index] = Token::new(
        TokenKind::TemplateEnd,
        Span {
            len: 1,
            ..span
        },
    );
    if let Some(kind) = rest {
        let rest_span = Span {
            offset: span.offset + 1,
            len: span.len.saturating_sub(1),
            line: span.line,
            col: span.col + 1,
        };
        tokens.insert(index + 1, Token::new(kind, rest_span));
    }
}
