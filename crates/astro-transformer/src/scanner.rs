//! Top-level statement scanning for `Props` declarations.
//!
//! The preamble is lexed, split into top-level statements, and each statement
//! is matched against the few shapes that can bind the type name `Props`:
//! an interface, a type alias, or an import specifier. Everything else is
//! [`DeclarationCandidate::Irrelevant`], including function parameters and
//! variables that happen to be called `Props`.

use crate::generics::{extract_generic_clause, GenericClause};
use astro_parser::{Lexer, Token, TokenKind};
use smol_str::SmolStr;
use source_map::Span;
use std::ops::Range;

/// The name a declaration must bind to describe the component's props.
pub const PROPS_NAME: &str = "Props";

/// Keywords that start a new statement after a closing `}`.
const STATEMENT_KEYWORDS: &[&str] = &[
    "interface",
    "type",
    "import",
    "export",
    "function",
    "const",
    "let",
    "var",
    "class",
    "enum",
    "declare",
    "abstract",
    "async",
    "namespace",
    "if",
    "for",
    "while",
    "do",
    "switch",
    "try",
    "return",
    "throw",
];

/// An import specifier whose local binding is `Props`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBinding {
    /// The local name, always `Props`.
    pub exposed_name: SmolStr,
    /// The module specifier, without quotes.
    pub source_module: SmolStr,
    /// The name the binding refers to in the module when it differs from the
    /// local name: the exported name for `{ X as Props }`, `default` for a
    /// default import, `*` for a namespace import or `import = require()`.
    pub is_alias_of: Option<SmolStr>,
    /// Whether the binding came from `import type` or a `type` specifier.
    pub is_type_only: bool,
}

/// How a top-level statement relates to the `Props` type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclarationCandidate {
    /// `interface Props<...> { ... }`
    LocalInterface { generic_clause: Option<GenericClause> },
    /// `type Props<...> = ...`
    LocalTypeAlias { generic_clause: Option<GenericClause> },
    /// An import that binds `Props`.
    ImportBinding(ImportBinding),
    /// Any other statement.
    Irrelevant,
}

impl DeclarationCandidate {
    /// True for every shape that binds `Props`.
    #[inline]
    pub fn binds_props(&self) -> bool {
        !matches!(self, DeclarationCandidate::Irrelevant)
    }
}

/// A classified statement and where it sits in the preamble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub candidate: DeclarationCandidate,
    pub span: Span,
}

/// Classifies every top-level statement of `preamble`, in source order.
pub fn scan_declarations(preamble: &str) -> Vec<Declaration> {
    let tokens: Vec<Token> = Lexer::new(preamble)
        .filter(|t| !t.kind.is_trivia())
        .collect();

    split_statements(preamble, &tokens)
        .into_iter()
        .filter_map(|range| {
            let statement: Vec<usize> = range
                .filter(|&i| tokens[i].kind != TokenKind::Newline)
                .collect();
            let (&first, &last) = (statement.first()?, statement.last()?);
            let candidate = classify_statement(preamble, &tokens, &statement);
            let span = tokens[first].span.cover(tokens[last].span);
            tracing::trace!(?candidate, text = span.slice(preamble), "classified statement");
            Some(Declaration { candidate, span })
        })
        .collect()
}

/// Splits the token stream into top-level statements.
///
/// A statement ends at `;` or at a line break outside brackets, unless the
/// line break sits inside an expression that obviously continues. A `}` that
/// returns to the top level also ends a statement when a statement keyword
/// follows it on the same line. Only `{ ( [` count as brackets: `<` is also
/// the less-than operator in value code.
fn split_statements(source: &str, tokens: &[Token]) -> Vec<Range<usize>> {
    let mut statements = Vec::new();
    let mut start = 0;
    let mut depth = 0usize;

    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::LBrace | TokenKind::LParen | TokenKind::LBracket => depth += 1,
            TokenKind::RBrace | TokenKind::RParen | TokenKind::RBracket => {
                depth = depth.saturating_sub(1);
                if depth == 0
                    && token.kind == TokenKind::RBrace
                    && tokens
                        .get(i + 1)
                        .is_some_and(|next| is_statement_keyword(source, next))
                {
                    statements.push(start..i + 1);
                    start = i + 1;
                }
            }
            TokenKind::Semicolon if depth == 0 => {
                statements.push(start..i + 1);
                start = i + 1;
            }
            TokenKind::Newline if depth == 0 => {
                let previous = tokens[start..i]
                    .iter()
                    .rev()
                    .find(|t| t.kind != TokenKind::Newline);
                let next = tokens[i + 1..]
                    .iter()
                    .find(|t| t.kind != TokenKind::Newline);
                let continues = previous.is_some_and(|t| continues_after(source, t))
                    || next.is_some_and(|t| continues_before(source, t))
                    || (next.is_some_and(|t| t.kind == TokenKind::LBrace)
                        && awaits_interface_body(source, &tokens[start..i]));
                if !continues {
                    statements.push(start..i);
                    start = i + 1;
                }
            }
            TokenKind::Eof => {
                statements.push(start..i);
                start = i;
            }
            _ => {}
        }
    }

    statements
}

/// Whether `pending` is an interface header whose body has not started, so
/// a `{` on the next line still belongs to it.
fn awaits_interface_body(source: &str, pending: &[Token]) -> bool {
    let mut words = pending
        .iter()
        .filter(|t| t.kind != TokenKind::Newline)
        .skip_while(|t| {
            t.kind == TokenKind::Ident && matches!(t.text(source), "export" | "declare" | "default")
        });
    words
        .next()
        .is_some_and(|t| t.kind == TokenKind::Ident && t.text(source) == "interface")
        && !body_opened(pending)
}

/// Whether a `{` outside the generic clause appears in `header`.
fn body_opened(header: &[Token]) -> bool {
    let mut angles = 0usize;
    header.iter().any(|t| {
        match t.kind {
            TokenKind::LAngle => angles += 1,
            TokenKind::RAngle => angles = angles.saturating_sub(1),
            TokenKind::LBrace if angles == 0 => return true,
            _ => {}
        }
        false
    })
}

fn is_statement_keyword(source: &str, token: &Token) -> bool {
    token.kind == TokenKind::Ident && STATEMENT_KEYWORDS.contains(&token.text(source))
}

/// A line ending with this token continues on the next line.
fn continues_after(source: &str, token: &Token) -> bool {
    match token.kind {
        TokenKind::Comma
        | TokenKind::Dot
        | TokenKind::Eq
        | TokenKind::Arrow
        | TokenKind::LAngle
        | TokenKind::Question
        | TokenKind::Colon
        | TokenKind::Pipe
        | TokenKind::Amp
        | TokenKind::Star
        | TokenKind::Slash => true,
        TokenKind::Ident => matches!(
            token.text(source),
            "extends" | "keyof" | "typeof" | "as" | "satisfies" | "implements"
        ),
        _ => false,
    }
}

/// A line starting with this token continues the previous line.
fn continues_before(source: &str, token: &Token) -> bool {
    match token.kind {
        TokenKind::Comma
        | TokenKind::Dot
        | TokenKind::Eq
        | TokenKind::Arrow
        | TokenKind::RAngle
        | TokenKind::Question
        | TokenKind::Colon
        | TokenKind::Pipe
        | TokenKind::Amp => true,
        TokenKind::Ident => matches!(
            token.text(source),
            "extends" | "as" | "satisfies" | "implements"
        ),
        _ => false,
    }
}

/// Classifies one statement. `statement` holds indices into `tokens`, line
/// breaks already removed.
fn classify_statement(source: &str, tokens: &[Token], statement: &[usize]) -> DeclarationCandidate {
    let text = |n: usize| statement.get(n).map(|&i| tokens[i].text(source));
    let is_ident = |n: usize| {
        statement
            .get(n)
            .is_some_and(|&i| tokens[i].kind == TokenKind::Ident)
    };

    let mut n = 0;
    let mut default_export = false;
    loop {
        let prefix = match text(n) {
            Some("export" | "declare") => true,
            Some("default") if n > 0 && text(n - 1) == Some("export") => {
                default_export = true;
                true
            }
            _ => false,
        };
        if !(prefix && is_ident(n + 1)) {
            break;
        }
        n += 1;
    }

    if !is_ident(n) {
        return DeclarationCandidate::Irrelevant;
    }

    match text(n) {
        Some("interface") if text(n + 1) == Some(PROPS_NAME) && is_ident(n + 1) => {
            // `{`, `<` or `extends` must follow the name.
            let follows = statement.get(n + 2).map(|&i| &tokens[i]);
            let well_formed = follows.is_some_and(|t| {
                matches!(t.kind, TokenKind::LAngle | TokenKind::LBrace)
                    || (t.kind == TokenKind::Ident && t.text(source) == "extends")
            });
            if !well_formed {
                return DeclarationCandidate::Irrelevant;
            }
            DeclarationCandidate::LocalInterface {
                generic_clause: clause_after(source, tokens, statement[n + 1]),
            }
        }
        Some("type") if !default_export && text(n + 1) == Some(PROPS_NAME) && is_ident(n + 1) => {
            let follows = statement.get(n + 2).map(|&i| tokens[i].kind);
            if !matches!(follows, Some(TokenKind::LAngle | TokenKind::Eq)) {
                return DeclarationCandidate::Irrelevant;
            }
            DeclarationCandidate::LocalTypeAlias {
                generic_clause: clause_after(source, tokens, statement[n + 1]),
            }
        }
        Some("import") if !default_export => {
            let rest: Vec<Token> = statement[n + 1..].iter().map(|&i| tokens[i]).collect();
            classify_import(source, &rest)
                .map(DeclarationCandidate::ImportBinding)
                .unwrap_or(DeclarationCandidate::Irrelevant)
        }
        _ => DeclarationCandidate::Irrelevant,
    }
}

fn clause_after(source: &str, tokens: &[Token], name_index: usize) -> Option<GenericClause> {
    extract_generic_clause(source, &tokens[name_index + 1..])
}

/// Walks the tokens of one statement.
struct Cursor<'a> {
    source: &'a str,
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn peek_at(&self, n: usize) -> Option<&'a Token> {
        self.tokens.get(self.pos + n)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek_at(0).is_some_and(|t| t.kind == kind)
    }

    fn at_word(&self, n: usize, word: &str) -> bool {
        self.peek_at(n)
            .is_some_and(|t| t.kind == TokenKind::Ident && t.text(self.source) == word)
    }

    fn bump(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_word(&mut self, word: &str) -> bool {
        if self.at_word(0, word) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// An identifier or, for `{ "a-b" as X }`, a string literal.
    fn eat_name(&mut self) -> Option<SmolStr> {
        let token = self.peek_at(0)?;
        let name = match token.kind {
            TokenKind::Ident => SmolStr::new(token.text(self.source)),
            TokenKind::String => unquote(token.text(self.source)),
            _ => return None,
        };
        self.pos += 1;
        Some(name)
    }

    fn eat_ident(&mut self) -> Option<SmolStr> {
        if self.at(TokenKind::Ident) {
            self.eat_name()
        } else {
            None
        }
    }
}

/// One name introduced by an import statement.
struct ImportedName {
    local: SmolStr,
    imported: Option<SmolStr>,
    type_only: bool,
}

/// Reads the bindings of an import statement, given the tokens after
/// `import`, and returns the one named `Props`, if any.
fn classify_import(source: &str, tokens: &[Token]) -> Option<ImportBinding> {
    let mut cursor = Cursor {
        source,
        tokens,
        pos: 0,
    };

    // `type` is the statement modifier unless it is itself the default
    // binding, as in `import type from 'x'` or `import type, { a } from 'x'`.
    let type_only = cursor.at_word(0, "type")
        && !cursor.at_word(1, "from")
        && !cursor.peek_at(1).is_some_and(|t| t.kind == TokenKind::Comma)
        && !cursor.peek_at(1).is_some_and(|t| t.kind == TokenKind::Eq);
    if type_only {
        cursor.bump();
    }

    let mut names = Vec::new();

    if cursor.at(TokenKind::Ident) {
        let local = cursor.eat_ident()?;
        if cursor.eat(TokenKind::Eq) {
            return import_equals(&mut cursor, local, type_only);
        }
        names.push(ImportedName {
            local,
            imported: Some(SmolStr::new_static("default")),
            type_only,
        });
        cursor.eat(TokenKind::Comma);
    }

    if cursor.eat(TokenKind::Star) {
        if !cursor.eat_word("as") {
            return None;
        }
        names.push(ImportedName {
            local: cursor.eat_ident()?,
            imported: Some(SmolStr::new_static("*")),
            type_only,
        });
    } else if cursor.eat(TokenKind::LBrace) {
        while !cursor.eat(TokenKind::RBrace) {
            let specifier_type = cursor.at_word(0, "type")
                && cursor
                    .peek_at(1)
                    .is_some_and(|t| matches!(t.kind, TokenKind::Ident | TokenKind::String))
                && !cursor.at_word(1, "as");
            if specifier_type {
                cursor.bump();
            }
            let imported = cursor.eat_name()?;
            let local = if cursor.eat_word("as") {
                cursor.eat_name()?
            } else {
                imported.clone()
            };
            names.push(ImportedName {
                imported: (imported != local).then_some(imported),
                local,
                type_only: type_only || specifier_type,
            });
            if !cursor.eat(TokenKind::Comma) && !cursor.at(TokenKind::RBrace) {
                return None;
            }
        }
    }

    let binding = names.into_iter().find(|name| name.local == PROPS_NAME)?;
    let source_module = if cursor.eat_word("from") {
        cursor
            .bump()
            .filter(|t| t.kind == TokenKind::String)
            .map(|t| unquote(t.text(source)))
            .unwrap_or_default()
    } else {
        SmolStr::default()
    };

    Some(ImportBinding {
        exposed_name: binding.local,
        source_module,
        is_alias_of: binding.imported,
        is_type_only: binding.type_only,
    })
}

/// `import Props = require('module')` or `import Props = Namespace.Member`.
fn import_equals(cursor: &mut Cursor<'_>, local: SmolStr, type_only: bool) -> Option<ImportBinding> {
    if local != PROPS_NAME {
        return None;
    }

    let (source_module, is_alias_of) = if cursor.at_word(0, "require") {
        cursor.bump();
        cursor.eat(TokenKind::LParen);
        let module = cursor
            .bump()
            .filter(|t| t.kind == TokenKind::String)
            .map(|t| unquote(t.text(cursor.source)))
            .unwrap_or_default();
        (module, Some(SmolStr::new_static("*")))
    } else {
        let mut path = String::new();
        while let Some(token) = cursor.bump() {
            if !matches!(token.kind, TokenKind::Ident | TokenKind::Dot) {
                break;
            }
            path.push_str(token.text(cursor.source));
        }
        (SmolStr::new(path), None)
    };

    Some(ImportBinding {
        exposed_name: local,
        source_module,
        is_alias_of,
        is_type_only: type_only,
    })
}

fn unquote(literal: &str) -> SmolStr {
    let is_quote = |c: char| c == '"' || c == '\'';
    let inner = literal.strip_prefix(is_quote).unwrap_or(literal);
    let inner = inner.strip_suffix(is_quote).unwrap_or(inner);
    SmolStr::new(inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn candidates(preamble: &str) -> Vec<DeclarationCandidate> {
        scan_declarations(preamble)
            .into_iter()
            .map(|d| d.candidate)
            .collect()
    }

    fn first_props(preamble: &str) -> Option<DeclarationCandidate> {
        candidates(preamble).into_iter().find(|c| c.binds_props())
    }

    fn import(preamble: &str) -> ImportBinding {
        match first_props(preamble) {
            Some(DeclarationCandidate::ImportBinding(binding)) => binding,
            other => panic!("expected an import binding, got {other:?}"),
        }
    }

    fn clause_raw(candidate: Option<DeclarationCandidate>) -> Option<String> {
        match candidate {
            Some(DeclarationCandidate::LocalInterface { generic_clause })
            | Some(DeclarationCandidate::LocalTypeAlias { generic_clause }) => {
                generic_clause.map(|c| c.raw)
            }
            _ => None,
        }
    }

    #[test]
    fn test_statements_in_order() {
        let preamble = "\nimport a from 'a';\nconst b = 1\ninterface Props {}\n";
        let declarations = scan_declarations(preamble);
        let texts: Vec<&str> = declarations.iter().map(|d| d.span.slice(preamble)).collect();
        assert_eq!(
            texts,
            vec!["import a from 'a';", "const b = 1", "interface Props {}"]
        );
        assert_eq!(
            declarations[2].candidate,
            DeclarationCandidate::LocalInterface {
                generic_clause: None
            }
        );
    }

    #[test]
    fn test_local_interface_forms() {
        for preamble in [
            "interface Props {}",
            "export interface Props { a: string }",
            "declare interface Props {}",
            "interface Props extends Base { a: string }",
            "interface Props\n  extends Base {\n}",
        ] {
            assert_eq!(
                first_props(preamble),
                Some(DeclarationCandidate::LocalInterface {
                    generic_clause: None
                }),
                "{preamble}"
            );
        }
    }

    #[test]
    fn test_interface_body_on_next_line() {
        assert_eq!(
            first_props("\ninterface Props\n{\n  a: string;\n}\n"),
            Some(DeclarationCandidate::LocalInterface {
                generic_clause: None
            })
        );
        assert_eq!(
            clause_raw(first_props("export interface Props<T>\n{\n  value: T;\n}")),
            Some("<T>".to_string())
        );
        assert_eq!(
            clause_raw(first_props("interface Props<T>\n  extends Base<T>\n{}")),
            Some("<T>".to_string())
        );
        assert_eq!(
            clause_raw(first_props("interface Props<T extends { id: string }>\n{\n  item: T;\n}")),
            Some("<T extends { id: string }>".to_string())
        );

        let preamble = "interface Props\n{}\nconst a = 1\n{ a }";
        let texts: Vec<&str> = scan_declarations(preamble)
            .iter()
            .map(|d| d.span.slice(preamble))
            .collect();
        assert_eq!(texts, vec!["interface Props\n{}", "const a = 1", "{ a }"]);
    }

    #[test]
    fn test_export_default_interface() {
        assert_eq!(
            first_props("export default interface Props { a: string }"),
            Some(DeclarationCandidate::LocalInterface {
                generic_clause: None
            })
        );
        assert_eq!(first_props("export default Props;"), None);
        assert_eq!(first_props("default interface Props {}"), None);
    }

    #[test]
    fn test_local_type_alias_forms() {
        for preamble in [
            "type Props = {}",
            "export type Props = { a: string };",
            "type Props =\n  | { a: string }\n  | { b: number }",
        ] {
            assert_eq!(
                first_props(preamble),
                Some(DeclarationCandidate::LocalTypeAlias {
                    generic_clause: None
                }),
                "{preamble}"
            );
        }
    }

    #[test]
    fn test_generic_clauses_are_attached() {
        assert_eq!(
            clause_raw(first_props("interface Props<T> {}")),
            Some("<T>".to_string())
        );
        assert_eq!(
            clause_raw(first_props("type Props<T = string> = { value: T }")),
            Some("<T = string>".to_string())
        );
        assert_eq!(
            clause_raw(first_props(
                "interface Props<Tag extends keyof JSX.IntrinsicElements> extends HTMLAttributes<Tag> {\n  as?: Tag;\n}"
            )),
            Some("<Tag extends keyof JSX.IntrinsicElements>".to_string())
        );
    }

    #[test]
    fn test_named_imports() {
        let binding = import("import { Props } from './somewhere';");
        assert_eq!(
            binding,
            ImportBinding {
                exposed_name: "Props".into(),
                source_module: "./somewhere".into(),
                is_alias_of: None,
                is_type_only: false,
            }
        );

        let binding = import("import { MyComponent as Props } from './somewhere';");
        assert_eq!(binding.is_alias_of, Some("MyComponent".into()));

        let binding = import("import type { Props } from \"./types\"");
        assert!(binding.is_type_only);
        assert_eq!(binding.source_module, "./types");

        let binding = import("import { a, type Props, b } from './types';");
        assert!(binding.is_type_only);
        assert_eq!(binding.is_alias_of, None);

        let binding = import("import { 'odd-name' as Props } from './types';");
        assert_eq!(binding.is_alias_of, Some("odd-name".into()));
    }

    #[test]
    fn test_default_and_namespace_imports() {
        let binding = import("import Props from './props';");
        assert_eq!(binding.is_alias_of, Some("default".into()));

        let binding = import("import * as Props from './props';");
        assert_eq!(binding.is_alias_of, Some("*".into()));

        let binding = import("import Layout, { type Props as Props } from './Layout.astro';");
        assert_eq!(binding.source_module, "./Layout.astro");
        assert!(binding.is_type_only);

        let binding = import("import { default as Props } from './props';");
        assert_eq!(binding.is_alias_of, Some("default".into()));
    }

    #[test]
    fn test_multiline_import() {
        let binding = import("import {\n  Other,\n  Props,\n} from './somewhere'\nconst x = 1");
        assert_eq!(binding.source_module, "./somewhere");
    }

    #[test]
    fn test_import_equals() {
        let binding = import("import Props = require('./props');");
        assert_eq!(binding.source_module, "./props");
        assert_eq!(binding.is_alias_of, Some("*".into()));

        let binding = import("import Props = Types.Card.Props;");
        assert_eq!(binding.source_module, "Types.Card.Props");
        assert_eq!(binding.is_alias_of, None);
    }

    #[test]
    fn test_lookalikes_are_irrelevant() {
        for preamble in [
            "function DoTheThing(Props) {}",
            "const Props = {};",
            "let { Props } = Astro.props;",
            "import SvelteOptionalProps from './SvelteOptionalProps.svelte';",
            "import { Props as Other } from './x';",
            "import type { PropsWithChildren } from 'react';",
            "interface MyProps {}",
            "type PropsLike = Props;",
            "class Props {}",
            "// interface Props {}",
            "/* type Props = {} */",
            "const s = 'interface Props {}';",
            "const t = `\ninterface Props {}\n`;",
            "export type { Props } from './x';",
            "import('./Props');",
            "if (x) { interface Props {} }",
        ] {
            assert_eq!(first_props(preamble), None, "{preamble}");
        }
    }

    #[test]
    fn test_first_match_wins() {
        let preamble = "import { Props } from './a';\ninterface Props<T> {}\n";
        assert!(matches!(
            first_props(preamble),
            Some(DeclarationCandidate::ImportBinding(_))
        ));
    }

    #[test]
    fn test_statement_after_closing_brace_on_same_line() {
        let preamble = "function f() { return 1 } interface Props { a: string }";
        let declarations = scan_declarations(preamble);
        assert_eq!(declarations.len(), 2);
        assert!(declarations[1].candidate.binds_props());
    }

    #[test]
    fn test_regex_with_braces_does_not_hide_props() {
        let preamble = "const re = /[{(]/;\ntype Props = { a: string };";
        assert!(matches!(
            first_props(preamble),
            Some(DeclarationCandidate::LocalTypeAlias { .. })
        ));
    }

    #[test]
    fn test_template_substitution_with_brace_string() {
        let preamble = "\nconst s = `${ '{' }`;\ninterface Props {}\n";
        assert_eq!(
            first_props(preamble),
            Some(DeclarationCandidate::LocalInterface {
                generic_clause: None
            })
        );
    }

    #[test]
    fn test_empty_preamble() {
        assert!(scan_declarations("").is_empty());
        assert!(scan_declarations("\n\n  \n").is_empty());
    }
}
