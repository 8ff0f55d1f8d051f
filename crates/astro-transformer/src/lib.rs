//! Astro to TSX transformation for type-checking.
//!
//! This crate turns an Astro component into a TSX document that editors and
//! type-checkers can read. It handles:
//! - Scanning the frontmatter for the declaration that names `Props`
//! - Extracting the type parameters of a generic `Props` declaration
//! - Typing the default-exported component function with the props
//! - Declaring the `Astro` global when the component declares its props
//! - Building source maps for position mapping
//!
//! # Example
//!
//! ```
//! use astro_parser::parse;
//! use astro_transformer::{transform, TransformOptions};
//!
//! let source = r#"---
//! interface Props<T> {
//!     items: T[];
//! }
//! ---
//!
//! <ul>{Astro.props.items.map((item) => <li>{item}</li>)}</ul>
//! "#;
//!
//! let parsed = parse(source);
//! let result = transform(&parsed.document, TransformOptions::default());
//! assert!(result
//!     .tsx_code
//!     .contains("export default function __AstroComponent_<T>(_props: Props<T>): any {}"));
//! ```

mod convert;
mod generics;
mod markup;
mod props;
mod scanner;
mod transform;
mod types;

pub use convert::{convert_to_tsx, ConvertError, ConvertOptions, ConvertResult, SourceMapMode};
pub use generics::{extract_generic_clause, GenericClause};
pub use markup::{LoweredMarkup, MarkupLowering, MarkupMapping, PassthroughLowering};
pub use props::{
    resolve_props, resolve_props_from_preamble, PropsResolution, PropsSource,
    FALLBACK_PROPS_TYPE, PROPS_TYPE,
};
pub use scanner::{scan_declarations, Declaration, DeclarationCandidate, ImportBinding, PROPS_NAME};
pub use transform::{
    transform, transform_with_lowering, TransformOptions, TransformResult,
    ASTRO_GLOBAL_DECLARATION,
};
pub use types::{component_name_from_path, STDIN_FILENAME};
