//! TypeScript lexer for the frontmatter preamble, using logos.
//!
//! The lexer only needs to be precise about what affects bracket nesting and
//! statement boundaries:
//! - strings, template literals, comments and regex literals are single
//!   opaque tokens, so brackets inside them never count
//! - every `>` is its own token (`>>` closes two type argument lists)
//! - `=>` is one token, so arrow types never close an angle bracket
//! - newlines are tokens, because they may end a statement

use logos::Logos;
use source_map::Span;
use text_size::TextSize;

/// A token produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    /// The token's text in `source`.
    #[inline]
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        self.span.slice(source)
    }
}

/// Token kinds for TypeScript source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Logos, Default)]
#[logos(skip r"[ \t\r\f\v]+")]
pub enum TokenKind {
    /// A line break
    #[token("\n")]
    Newline,

    /// `// ...`
    #[regex(r"//[^\n]*", allow_greedy = true)]
    LineComment,

    /// `/* ... */`
    #[token("/*", block_comment)]
    BlockComment,

    /// `'...'` or `"..."`
    #[token("'", |lex| quoted_string(lex, b'\''))]
    #[token("\"", |lex| quoted_string(lex, b'"'))]
    String,

    /// `` `...` ``, including `${}` substitutions
    #[token("`", template_literal)]
    Template,

    /// `/.../flags`; produced by [`Lexer`] where an operand is expected
    Regex,

    /// An identifier or keyword
    #[regex(r"([A-Za-z_$]|[^\x00-\x7F])([A-Za-z0-9_$]|[^\x00-\x7F])*")]
    Ident,

    /// A numeric literal
    #[regex(r"[0-9][0-9A-Za-z_]*(\.[0-9A-Za-z_]*)?")]
    Number,

    /// `<`
    #[token("<")]
    LAngle,

    /// `>`
    #[token(">")]
    RAngle,

    /// `{`
    #[token("{")]
    LBrace,

    /// `}`
    #[token("}")]
    RBrace,

    /// `(`
    #[token("(")]
    LParen,

    /// `)`
    #[token(")")]
    RParen,

    /// `[`
    #[token("[")]
    LBracket,

    /// `]`
    #[token("]")]
    RBracket,

    /// `,`
    #[token(",")]
    Comma,

    /// `;`
    #[token(";")]
    Semicolon,

    /// `:`
    #[token(":")]
    Colon,

    /// `?`
    #[token("?")]
    Question,

    /// `=`
    #[token("=")]
    Eq,

    /// `=>`
    #[token("=>")]
    Arrow,

    /// `.`
    #[token(".")]
    Dot,

    /// `/`
    #[token("/")]
    Slash,

    /// `|`
    #[token("|")]
    Pipe,

    /// `&`
    #[token("&")]
    Amp,

    /// `*`
    #[token("*")]
    Star,

    /// Any other operator character
    #[regex(r"[-+%!~^@#]")]
    Operator,

    /// End of file
    Eof,

    /// Invalid/unknown character
    #[default]
    Error,
}

impl TokenKind {
    /// Comments carry no syntax.
    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(self, TokenKind::LineComment | TokenKind::BlockComment)
    }

    /// The closer matching this opener, for `<`, `{`, `(` and `[`.
    pub fn closer(self) -> Option<TokenKind> {
        match self {
            TokenKind::LAngle => Some(TokenKind::RAngle),
            TokenKind::LBrace => Some(TokenKind::RBrace),
            TokenKind::LParen => Some(TokenKind::RParen),
            TokenKind::LBracket => Some(TokenKind::RBracket),
            _ => None,
        }
    }

    /// True for `>`, `}`, `)` and `]`.
    #[inline]
    pub fn is_closer(self) -> bool {
        matches!(
            self,
            TokenKind::RAngle | TokenKind::RBrace | TokenKind::RParen | TokenKind::RBracket
        )
    }

    /// Returns a human-readable name for this token kind.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Newline => "newline",
            TokenKind::LineComment => "line comment",
            TokenKind::BlockComment => "block comment",
            TokenKind::String => "string",
            TokenKind::Template => "template literal",
            TokenKind::Regex => "regular expression",
            TokenKind::Ident => "identifier",
            TokenKind::Number => "number",
            TokenKind::LAngle => "'<'",
            TokenKind::RAngle => "'>'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::Comma => "','",
            TokenKind::Semicolon => "';'",
            TokenKind::Colon => "':'",
            TokenKind::Question => "'?'",
            TokenKind::Eq => "'='",
            TokenKind::Arrow => "'=>'",
            TokenKind::Dot => "'.'",
            TokenKind::Slash => "'/'",
            TokenKind::Pipe => "'|'",
            TokenKind::Amp => "'&'",
            TokenKind::Star => "'*'",
            TokenKind::Operator => "operator",
            TokenKind::Eof => "end of file",
            TokenKind::Error => "invalid token",
        }
    }
}

fn block_comment(lex: &mut logos::Lexer<TokenKind>) -> bool {
    let rest = lex.remainder();
    let len = rest.find("*/").map_or(rest.len(), |end| end + 2);
    lex.bump(len);
    true
}

/// Consumes a quoted string body. An unterminated string stops before the
/// line break.
fn quoted_string(lex: &mut logos::Lexer<TokenKind>, quote: u8) -> bool {
    let rest = lex.remainder();
    let bytes = rest.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if bytes.get(i + 1) == Some(&b'\r') => i += 3,
            b'\\' => i += 2,
            b'\n' => break,
            b if b == quote => {
                lex.bump(i + 1);
                return true;
            }
            _ => i += 1,
        }
    }
    lex.bump(char_boundary(rest, i));
    true
}

fn template_literal(lex: &mut logos::Lexer<TokenKind>) -> bool {
    let rest = lex.remainder();
    let len = template_body_len(rest.as_bytes());
    lex.bump(char_boundary(rest, len));
    true
}

/// Length of a template body through its closing backtick, or of all of
/// `bytes` when unterminated.
fn template_body_len(bytes: &[u8]) -> usize {
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'`' => return i + 1,
            b'$' if bytes.get(i + 1) == Some(&b'{') => i = substitution_end(bytes, i + 2),
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Index just past the `}` closing a `${` substitution that starts at `i`.
/// Strings, comments and nested templates inside it are skipped whole.
fn substitution_end(bytes: &[u8], mut i: usize) -> usize {
    let mut depth = 1usize;
    while i < bytes.len() {
        match bytes[i] {
            quote @ (b'\'' | b'"') => i = string_end(bytes, i + 1, quote),
            b'`' => i += 1 + template_body_len(&bytes[i + 1..]),
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                i = bytes[i..]
                    .iter()
                    .position(|&b| b == b'\n')
                    .map_or(bytes.len(), |n| i + n);
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = bytes[i + 2..]
                    .windows(2)
                    .position(|w| w == b"*/")
                    .map_or(bytes.len(), |n| i + 2 + n + 2);
            }
            b'{' => {
                depth += 1;
                i += 1;
            }
            b'}' => {
                depth -= 1;
                i += 1;
                if depth == 0 {
                    return i;
                }
            }
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Index just past the closing `quote`, or of the line break that ends an
/// unterminated string.
fn string_end(bytes: &[u8], mut i: usize, quote: u8) -> usize {
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' => return i,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Rounds `i` down to a char boundary of `s`, clamped to its length.
fn char_boundary(s: &str, mut i: usize) -> usize {
    i = i.min(s.len());
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Measures a regex literal body after its opening `/`, flags included.
/// Returns `None` if the line ends first, meaning the `/` was a division.
fn regex_literal_len(rest: &str) -> Option<usize> {
    let mut in_class = false;
    let mut chars = rest.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '\n' | '\r' => return None,
            '[' => in_class = true,
            ']' => in_class = false,
            '/' if !in_class => {
                let after = &rest[i + 1..];
                let flags = after
                    .find(|c: char| !c.is_ascii_alphabetic())
                    .unwrap_or(after.len());
                return Some(i + 1 + flags);
            }
            _ => {}
        }
    }
    None
}

/// Whether a `/` following a token of this kind starts a regex literal
/// rather than a division.
fn operand_expected_after(kind: TokenKind, text: &str) -> bool {
    match kind {
        TokenKind::Ident => matches!(
            text,
            "return"
                | "typeof"
                | "instanceof"
                | "in"
                | "of"
                | "new"
                | "delete"
                | "void"
                | "throw"
                | "case"
                | "do"
                | "else"
                | "yield"
                | "await"
        ),
        TokenKind::Number
        | TokenKind::String
        | TokenKind::Template
        | TokenKind::Regex
        | TokenKind::RParen
        | TokenKind::RBracket => false,
        _ => true,
    }
}

/// A lexer for TypeScript preamble source.
pub struct Lexer<'src> {
    inner: logos::Lexer<'src, TokenKind>,
    source: &'src str,
    finished: bool,
    operand_expected: bool,
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source.
    pub fn new(source: &'src str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
            source,
            finished: false,
            operand_expected: true,
        }
    }

    /// Returns the source string being lexed.
    pub fn source(&self) -> &'src str {
        self.source
    }

    fn current_span(&self) -> Span {
        let span = self.inner.span();
        Span::new(
            TextSize::from(span.start as u32),
            TextSize::from(span.end as u32),
        )
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let mut kind = match self.inner.next() {
            Some(Ok(kind)) => kind,
            Some(Err(())) => TokenKind::Error,
            None => {
                self.finished = true;
                let end = TextSize::from(self.source.len() as u32);
                return Some(Token {
                    kind: TokenKind::Eof,
                    span: Span::new(end, end),
                });
            }
        };

        if kind == TokenKind::Slash && self.operand_expected {
            if let Some(len) = regex_literal_len(self.inner.remainder()) {
                self.inner.bump(len);
                kind = TokenKind::Regex;
            }
        }

        if !kind.is_trivia() && kind != TokenKind::Newline {
            self.operand_expected = operand_expected_after(kind, self.inner.slice());
        }

        Some(Token {
            kind,
            span: self.current_span(),
        })
    }
}

/// Lexes `source` completely. The last token is always [`TokenKind::Eof`].
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .map(|t| t.kind)
            .filter(|k| *k != TokenKind::Eof)
            .collect()
    }

    #[test]
    fn test_interface_header() {
        assert_eq!(
            kinds("interface Props<T> {}"),
            vec![
                TokenKind::Ident,
                TokenKind::Ident,
                TokenKind::LAngle,
                TokenKind::Ident,
                TokenKind::RAngle,
                TokenKind::LBrace,
                TokenKind::RBrace,
            ]
        );
    }

    #[test]
    fn test_closing_angles_are_split() {
        assert_eq!(
            kinds("A<B<C>>"),
            vec![
                TokenKind::Ident,
                TokenKind::LAngle,
                TokenKind::Ident,
                TokenKind::LAngle,
                TokenKind::Ident,
                TokenKind::RAngle,
                TokenKind::RAngle,
            ]
        );
    }

    #[test]
    fn test_arrow_is_one_token() {
        assert_eq!(
            kinds("() => void"),
            vec![
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::Arrow,
                TokenKind::Ident,
            ]
        );
    }

    #[test]
    fn test_strings_are_opaque() {
        let source = r#"const a = "{<(" + 'it\'s }' + `x ${ {a: 1}.a } >`;"#;
        let tokens = tokenize(source);
        let strings: Vec<&str> = tokens
            .iter()
            .filter(|t| matches!(t.kind, TokenKind::String | TokenKind::Template))
            .map(|t| t.text(source))
            .collect();
        assert_eq!(
            strings,
            vec![r#""{<(""#, r"'it\'s }'", "`x ${ {a: 1}.a } >`"]
        );
    }

    #[test]
    fn test_template_substitutions_skip_strings() {
        let source = "const s = `${ '{' }`;\nconst t = `a ${ `b ${c}` } d`;\nconst u = `${ /* } */ x }`;\ninterface Props {}";
        let tokens = tokenize(source);
        let templates: Vec<&str> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Template)
            .map(|t| t.text(source))
            .collect();
        assert_eq!(
            templates,
            vec!["`${ '{' }`", "`a ${ `b ${c}` } d`", "`${ /* } */ x }`"]
        );
        assert!(tokens.iter().any(|t| t.text(source) == "interface"));
    }

    #[test]
    fn test_comments() {
        let source = "// interface Props {}\n/* type Props = {} */ a";
        let tokens = tokenize(source);
        assert_eq!(tokens[0].kind, TokenKind::LineComment);
        assert_eq!(tokens[0].text(source), "// interface Props {}");
        assert_eq!(tokens[1].kind, TokenKind::Newline);
        assert_eq!(tokens[2].kind, TokenKind::BlockComment);
        assert_eq!(tokens[2].text(source), "/* type Props = {} */");
        assert!(tokens[2].kind.is_trivia());
    }

    #[test]
    fn test_regex_literal_versus_division() {
        let source = "const re = /[}{]/g; const half = total / 2 / 1;";
        let tokens = tokenize(source);
        let regex: Vec<&str> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Regex)
            .map(|t| t.text(source))
            .collect();
        assert_eq!(regex, vec!["/[}{]/g"]);
        assert_eq!(
            tokens.iter().filter(|t| t.kind == TokenKind::Slash).count(),
            2
        );
    }

    #[test]
    fn test_unterminated_string_stops_at_line_end() {
        let source = "const a = 'oops\ninterface Props {}";
        let tokens = tokenize(source);
        let string = tokens.iter().find(|t| t.kind == TokenKind::String).unwrap();
        assert_eq!(string.text(source), "'oops");
        assert!(tokens.iter().any(|t| t.text(source) == "interface"));
    }

    #[test]
    fn test_ends_with_eof() {
        let tokens = tokenize("a");
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
        assert_eq!(tokens.last().map(|t| t.span), Some(Span::new(1u32, 1u32)));
    }
}
