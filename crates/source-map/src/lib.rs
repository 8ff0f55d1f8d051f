//! Source position tracking and mapping for astro-tsx.
//!
//! The synthesizer copies the component preamble and the lowered markup into a
//! TSX document and surrounds them with generated glue. This crate records
//! which generated ranges came from which source ranges, answers lookups in
//! both directions, and serializes the result as a Source Map v3 artifact.

mod builder;
mod line_index;
mod span;
mod v3;

pub use builder::{Mapping, SourceMap, SourceMapBuilder};
pub use line_index::{LineCol, LineIndex};
pub use span::{ByteOffset, Span};
pub use v3::{SourceMapV3, V3Error};
