//! Typed configuration tree.
//!
//! The parser front-ends produce a [`ConfigNode`] tree: a tagged union of
//! mappings, sequences and scalars mirroring the shape HCL blocks decompose
//! into. Mapping nodes may carry a [`LineSpan`] recording the source lines
//! of the block they came from; the both-or-neither rule for line metadata
//! is enforced here, at the input boundary, so the rest of the crate never
//! has to reason about half-present positions.
//!
//! The tree is built once per file and read-only afterwards.

use crate::error::Result;
use indexmap::IndexMap;

/// Reserved prefix for metadata keys in pre-parsed trees.
///
/// Keys starting with this prefix are never treated as configuration
/// entries: they are consumed by [`ConfigNode::from_annotated_json`] and
/// skipped during traversal.
pub const META_PREFIX: &str = "__";

/// Metadata key holding the 1-based first line of a block.
pub const START_LINE_KEY: &str = "__start_line__";

/// Metadata key holding the 1-based last line of a block.
pub const END_LINE_KEY: &str = "__end_line__";

/// A 1-based, inclusive source line range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSpan {
    /// First line of the block
    pub start: usize,
    /// Last line of the block
    pub end: usize,
}

impl LineSpan {
    /// Create a new span.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

impl std::fmt::Display for LineSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// A scalar leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// HCL `null`
    Null,
    /// Boolean literal
    Bool(bool),
    /// Integer literal
    Int(i64),
    /// Floating point literal
    Float(f64),
    /// String literal, or the raw text of an unevaluated expression
    String(String),
}

/// A node in the parsed configuration tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigNode {
    /// Key/value entries, optionally annotated with a source line span
    Mapping(ConfigMapping),
    /// An ordered list of nodes (block repetitions, HCL arrays)
    Sequence(Vec<ConfigNode>),
    /// A leaf value
    Scalar(Scalar),
}

/// An insertion-ordered mapping with an optional source line span.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigMapping {
    entries: IndexMap<String, ConfigNode>,
    span: Option<LineSpan>,
}

impl ConfigMapping {
    /// Create an empty mapping without a span.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a span, builder-style.
    #[must_use]
    pub fn with_span(mut self, span: LineSpan) -> Self {
        self.span = Some(span);
        self
    }

    /// Insert an entry, replacing any previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, node: ConfigNode) {
        self.entries.insert(key.into(), node);
    }

    /// Look up an entry by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ConfigNode> {
        self.entries.get(key)
    }

    /// Look up an entry by key, mutably.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut ConfigNode> {
        self.entries.get_mut(key)
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigNode)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The source line span of the block this mapping came from, if known.
    #[must_use]
    pub const fn span(&self) -> Option<LineSpan> {
        self.span
    }

    /// Set or clear the span.
    pub fn set_span(&mut self, span: Option<LineSpan>) {
        self.span = span;
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the mapping has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ConfigNode {
    /// View this node as a mapping.
    #[must_use]
    pub const fn as_mapping(&self) -> Option<&ConfigMapping> {
        match self {
            Self::Mapping(m) => Some(m),
            _ => None,
        }
    }

    /// View this node as a sequence.
    #[must_use]
    pub fn as_sequence(&self) -> Option<&[ConfigNode]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// View this node as a string scalar.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    /// View this node as an integer scalar.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Scalar(Scalar::Int(i)) => Some(*i),
            _ => None,
        }
    }

    /// Convenience constructor for a string scalar.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::Scalar(Scalar::String(value.into()))
    }

    /// Convenience constructor for an integer scalar.
    #[must_use]
    pub const fn int(value: i64) -> Self {
        Self::Scalar(Scalar::Int(value))
    }

    /// Convert a pre-parsed JSON tree into a typed [`ConfigNode`].
    ///
    /// Accepts the representation produced by line-annotating HCL parsers:
    /// blocks become objects whose `__start_line__`/`__end_line__` entries
    /// hold the block's line range. Metadata keys are consumed here and do
    /// not appear as mapping entries. A span is attached only when *both*
    /// line keys are present; a lone key is treated as no position.
    ///
    /// # Errors
    ///
    /// Returns a `TreeShape` error if a metadata key holds a non-integer
    /// value.
    pub fn from_annotated_json(value: &serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::Object(entries) => {
                let start = meta_line(entries, START_LINE_KEY)?;
                let end = meta_line(entries, END_LINE_KEY)?;
                let mut mapping = ConfigMapping::new();
                if let (Some(start), Some(end)) = (start, end) {
                    mapping.set_span(Some(LineSpan::new(start, end)));
                }
                for (key, child) in entries {
                    if key.starts_with(META_PREFIX) {
                        continue;
                    }
                    mapping.insert(key.clone(), Self::from_annotated_json(child)?);
                }
                Ok(Self::Mapping(mapping))
            }
            serde_json::Value::Array(items) => Ok(Self::Sequence(
                items
                    .iter()
                    .map(Self::from_annotated_json)
                    .collect::<Result<Vec<_>>>()?,
            )),
            serde_json::Value::Null => Ok(Self::Scalar(Scalar::Null)),
            serde_json::Value::Bool(b) => Ok(Self::Scalar(Scalar::Bool(*b))),
            serde_json::Value::Number(n) => Ok(Self::Scalar(n.as_i64().map_or_else(
                || Scalar::Float(n.as_f64().unwrap_or_default()),
                Scalar::Int,
            ))),
            serde_json::Value::String(s) => Ok(Self::Scalar(Scalar::String(s.clone()))),
        }
    }
}

/// Read a metadata line number from a JSON object.
fn meta_line(
    entries: &serde_json::Map<String, serde_json::Value>,
    key: &str,
) -> Result<Option<usize>> {
    match entries.get(key) {
        None => Ok(None),
        Some(value) => match value.as_u64() {
            Some(line) => Ok(Some(line as usize)),
            None => Err(crate::err!(TreeShape {
                message: format!("metadata key '{key}' holds a non-integer value: {value}"),
            })),
        },
    }
}
