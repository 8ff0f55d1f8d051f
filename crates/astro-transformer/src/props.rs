//! Props resolution.
//!
//! Picks the declaration that describes the component's props and turns it
//! into the values the synthesizer needs.

use crate::generics::GenericClause;
use crate::scanner::{scan_declarations, Declaration, DeclarationCandidate, ImportBinding};

/// Type of `_props` when the preamble declares `Props`.
pub const PROPS_TYPE: &str = "Props";

/// Type of `_props` when it does not.
pub const FALLBACK_PROPS_TYPE: &str = "Record<string, any>";

/// Where the `Props` type came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropsSource {
    None,
    LocalInterface,
    LocalTypeAlias,
    Import(ImportBinding),
}

impl PropsSource {
    /// A short name for reports.
    pub fn kind_name(&self) -> &'static str {
        match self {
            PropsSource::None => "none",
            PropsSource::LocalInterface => "interface",
            PropsSource::LocalTypeAlias => "type",
            PropsSource::Import(_) => "import",
        }
    }
}

/// The resolved props type, with everything the synthesizer derives from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropsResolution {
    pub source: PropsSource,
    /// `Props` or `Record<string, any>`.
    pub type_expression: &'static str,
    /// The type parameters of a local declaration. Imports never have one.
    pub generic_clause: Option<GenericClause>,
    /// Whether `"";` must separate the preamble from the markup.
    ///
    /// A local declaration can end in a way that would otherwise let the
    /// following `<Fragment>` parse as a type argument list or comparison.
    pub requires_statement_padding: bool,
    /// Whether the `Astro` global declaration follows the component function.
    pub emit_ambient_declaration: bool,
}

impl Default for PropsResolution {
    fn default() -> Self {
        Self::none()
    }
}

impl PropsResolution {
    /// The fallback used when nothing declares `Props`.
    pub fn none() -> Self {
        Self {
            source: PropsSource::None,
            type_expression: FALLBACK_PROPS_TYPE,
            generic_clause: None,
            requires_statement_padding: false,
            emit_ambient_declaration: false,
        }
    }

    fn local(source: PropsSource, generic_clause: Option<GenericClause>) -> Self {
        Self {
            source,
            type_expression: PROPS_TYPE,
            generic_clause,
            requires_statement_padding: true,
            emit_ambient_declaration: true,
        }
    }

    fn import(binding: ImportBinding) -> Self {
        Self {
            source: PropsSource::Import(binding),
            type_expression: PROPS_TYPE,
            generic_clause: None,
            requires_statement_padding: false,
            emit_ambient_declaration: true,
        }
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        self.source == PropsSource::None
    }

    /// The raw type parameter clause, or an empty string.
    pub fn declaration_clause(&self) -> &str {
        self.generic_clause
            .as_ref()
            .map_or("", |clause| clause.raw.as_str())
    }

    /// The `_props` parameter type, with type arguments for generic
    /// declarations: `Props<T, P>`.
    pub fn parameter_type(&self) -> String {
        match &self.generic_clause {
            Some(clause) => format!("{}{}", self.type_expression, clause.usage()),
            None => self.type_expression.to_string(),
        }
    }
}

/// Resolves the props type from already scanned declarations.
///
/// The first declaration that binds `Props` wins; later ones are ignored.
pub fn resolve_props(declarations: &[Declaration]) -> PropsResolution {
    let Some(declaration) = declarations.iter().find(|d| d.candidate.binds_props()) else {
        tracing::debug!("no Props declaration found");
        return PropsResolution::none();
    };

    let resolution = match &declaration.candidate {
        DeclarationCandidate::LocalInterface { generic_clause } => {
            PropsResolution::local(PropsSource::LocalInterface, generic_clause.clone())
        }
        DeclarationCandidate::LocalTypeAlias { generic_clause } => {
            PropsResolution::local(PropsSource::LocalTypeAlias, generic_clause.clone())
        }
        DeclarationCandidate::ImportBinding(binding) => PropsResolution::import(binding.clone()),
        DeclarationCandidate::Irrelevant => PropsResolution::none(),
    };

    tracing::debug!(
        source = resolution.source.kind_name(),
        generics = resolution.declaration_clause(),
        "resolved Props declaration"
    );
    resolution
}

/// Scans `preamble` and resolves its props type. A component without a
/// preamble resolves to the fallback.
pub fn resolve_props_from_preamble(preamble: Option<&str>) -> PropsResolution {
    match preamble {
        Some(preamble) => resolve_props(&scan_declarations(preamble)),
        None => PropsResolution::none(),
    }
}
