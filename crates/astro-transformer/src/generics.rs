//! Type parameter clause extraction.
//!
//! Given the tokens that follow a `Props` type name, finds the `<...>` clause
//! and its parameter names. Nesting is tracked with one stack that records
//! which opener each level came from, so a `>` only closes an angle bracket
//! and `{ [key: string]: any }` or a conditional type inside a constraint can
//! never end the clause early.

use astro_parser::{Token, TokenKind};
use smol_str::SmolStr;

/// A type parameter clause as written on a `Props` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericClause {
    /// The exact clause text, angle brackets included.
    pub raw: String,
    /// The parameter names, without modifiers, constraints or defaults.
    pub params: Vec<SmolStr>,
}

impl GenericClause {
    /// The clause as type arguments: `<T, P>`.
    pub fn usage(&self) -> String {
        format!("<{}>", self.params.join(", "))
    }
}

/// Extracts the clause starting at the first significant token of `tokens`.
///
/// `source` is the text the token spans point into. Returns `None` when the
/// next token is not `<`, when a closer does not match its opener, or when
/// the tokens run out before the clause closes.
pub fn extract_generic_clause(source: &str, tokens: &[Token]) -> Option<GenericClause> {
    let mut tokens = tokens
        .iter()
        .filter(|t| t.kind != TokenKind::Newline && !t.kind.is_trivia());

    let open = tokens.next()?;
    if open.kind != TokenKind::LAngle {
        return None;
    }

    let mut stack = vec![TokenKind::LAngle];
    let mut params = Vec::new();
    let mut current: Option<SmolStr> = None;
    let mut name_done = false;

    for token in tokens {
        match token.kind {
            TokenKind::LAngle | TokenKind::LBrace | TokenKind::LParen | TokenKind::LBracket => {
                stack.push(token.kind);
            }
            kind if kind.is_closer() => {
                let opener = stack.pop()?;
                if opener.closer() != Some(kind) {
                    return None;
                }
                if stack.is_empty() {
                    params.extend(current.take());
                    let start = usize::from(open.span.start);
                    let end = usize::from(token.span.end);
                    return Some(GenericClause {
                        raw: source.get(start..end)?.to_string(),
                        params,
                    });
                }
            }
            TokenKind::Comma if stack.len() == 1 => {
                params.extend(current.take());
                name_done = false;
            }
            TokenKind::Eq if stack.len() == 1 => name_done = true,
            TokenKind::Ident if stack.len() == 1 && !name_done => {
                let text = token.text(source);
                if text == "extends" {
                    name_done = true;
                } else {
                    current = Some(SmolStr::new(text));
                }
            }
            TokenKind::Eof => return None,
            _ => {}
        }
    }

    None
}
