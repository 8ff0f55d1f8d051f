//! Source Map revision 3 artifacts.

pub use swc_sourcemap::Error as V3Error;

/// A Source Map v3 artifact, as consumed by editors and `tsc`.
#[derive(Debug, Clone)]
pub struct SourceMapV3 {
    inner: swc_sourcemap::SourceMap,
}

impl SourceMapV3 {
    pub(crate) fn new(inner: swc_sourcemap::SourceMap) -> Self {
        Self { inner }
    }

    /// Serializes the map as compact JSON.
    pub fn to_json(&self) -> Result<String, V3Error> {
        let mut out = Vec::new();
        self.inner.to_writer(&mut out)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    /// Original (line, column) of a generated position, both 0-indexed with
    /// UTF-16 columns. Positions between segments resolve to the segment
    /// before them on the same line.
    pub fn lookup(&self, line: u32, col: u32) -> Option<(u32, u32)> {
        self.inner
            .lookup_token(line, col)
            .filter(|token| token.get_dst_line() == line)
            .map(|token| (token.get_src_line(), token.get_src_col()))
    }

    /// The underlying `swc_sourcemap` map.
    pub fn as_inner(&self) -> &swc_sourcemap::SourceMap {
        &self.inner
    }
}
