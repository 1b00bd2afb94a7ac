//! Textual interchange export
//!
//! Records map themselves onto an ordered [`ExportNode`] tree whose keys are the
//! engine's own field names. The tree serializes through `serde`, so any document
//! writer (JSON here, YAML downstream) can render it without knowing the records.

mod driver;
mod options;

use indexmap::IndexMap;
use serde::Serialize;

pub use driver::{ExportDocument, export_asset, export_file};
pub use options::{ExportContainer, ExportOptions};

/// Value in the export tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExportNode {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f32),
    String(String),
    Sequence(Vec<ExportNode>),
    Mapping(ExportMapping),
}

impl ExportNode {
    /// Lowercase hexadecimal rendering of a byte blob.
    pub fn hex(bytes: &[u8]) -> Self {
        ExportNode::String(bytes.iter().map(|b| format!("{b:02x}")).collect())
    }

    pub fn as_mapping(&self) -> Option<&ExportMapping> {
        match self {
            ExportNode::Mapping(mapping) => Some(mapping),
            _ => None,
        }
    }

    /// Look up a key when this node is a mapping.
    pub fn get(&self, key: &str) -> Option<&ExportNode> {
        self.as_mapping().and_then(|mapping| mapping.get(key))
    }
}

/// Ordered key/value mapping; keys keep their insertion order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct ExportMapping {
    entries: IndexMap<String, ExportNode>,
}

impl ExportMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: &str, value: impl Into<ExportNode>) -> &mut Self {
        self.entries.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&ExportNode> {
        self.entries.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A record that maps onto the export tree.
pub trait Exportable {
    fn export(&self, container: &ExportContainer) -> ExportNode;
}

macro_rules! node_from {
    ($variant:ident as $target:ty: $($ty:ty),+) => {
        $(impl From<$ty> for ExportNode {
            fn from(value: $ty) -> Self {
                ExportNode::$variant(<$target>::from(value))
            }
        })+
    };
}

node_from!(Int as i64: i8, i16, i32, i64);
node_from!(UInt as u64: u8, u16, u32, u64);

impl From<bool> for ExportNode {
    fn from(value: bool) -> Self {
        ExportNode::Bool(value)
    }
}

impl From<f32> for ExportNode {
    fn from(value: f32) -> Self {
        ExportNode::Float(value)
    }
}

impl From<usize> for ExportNode {
    fn from(value: usize) -> Self {
        ExportNode::UInt(value as u64)
    }
}

impl From<&str> for ExportNode {
    fn from(value: &str) -> Self {
        ExportNode::String(value.to_string())
    }
}

impl From<String> for ExportNode {
    fn from(value: String) -> Self {
        ExportNode::String(value)
    }
}

impl From<ExportMapping> for ExportNode {
    fn from(value: ExportMapping) -> Self {
        ExportNode::Mapping(value)
    }
}

impl From<Vec<ExportNode>> for ExportNode {
    fn from(value: Vec<ExportNode>) -> Self {
        ExportNode::Sequence(value)
    }
}

impl From<glam::Vec4> for ExportNode {
    fn from(value: glam::Vec4) -> Self {
        let mut node = ExportMapping::new();
        node.add("x", value.x);
        node.add("y", value.y);
        node.add("z", value.z);
        node.add("w", value.w);
        node.into()
    }
}
