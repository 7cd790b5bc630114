//! # Content Blocks
//!
//! The unit of editable content on a page.
//!
//! A block is persisted in an open record shape:
//!
//! ```text
//! { "id": "hero-title", "type": "text", "value": "...", "label": "...",
//!   "metadata": { "group": "Hero", "link": "/pricing", ... } }
//! ```
//!
//! In memory the metadata is typed per block type ([`KindMetadata`]), with
//! the handful of shared attributes lifted into [`BlockMetadata`]. Keys
//! that have no typed home are kept verbatim in `extra` so that a
//! load/save cycle never drops data written by other tools.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::EditorError;

/// Group used for blocks that do not name one
pub const DEFAULT_GROUP: &str = "General";

/// Stable block key, unique within a page
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random id keyed to the block type, e.g. `custom-image-3fa85f64`
    pub fn generate(block_type: BlockType) -> Self {
        let suffix = Uuid::new_v4().simple().to_string();
        Self(format!("custom-{}-{}", block_type.as_str(), &suffix[..8]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for BlockId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl PartialEq<str> for BlockId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for BlockId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Block variants. Determines how `value` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockType {
    /// Literal text
    #[serde(rename = "text")]
    Text,
    /// Image URL
    #[serde(rename = "image")]
    Image,
    /// HTML markup
    #[serde(rename = "richtext")]
    RichText,
    /// JSON-encoded [`crate::PricingPlan`]
    #[serde(rename = "pricing-plan")]
    PricingPlan,
    /// JSON-encoded [`crate::FaqItem`]
    #[serde(rename = "faq")]
    Faq,
}

impl BlockType {
    pub const ALL: [BlockType; 5] = [
        BlockType::Text,
        BlockType::Image,
        BlockType::RichText,
        BlockType::PricingPlan,
        BlockType::Faq,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Text => "text",
            BlockType::Image => "image",
            BlockType::RichText => "richtext",
            BlockType::PricingPlan => "pricing-plan",
            BlockType::Faq => "faq",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockType {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| EditorError::UnknownBlockType(s.to_string()))
    }
}

/// Metadata fields that only exist for some block types
#[derive(Debug, Clone, PartialEq)]
pub enum KindMetadata {
    Text { link: Option<String> },
    Image { alt: Option<String>, link: Option<String> },
    RichText,
    PricingPlan,
    Faq,
}

impl KindMetadata {
    /// Empty metadata for a block type
    pub fn empty(block_type: BlockType) -> Self {
        match block_type {
            BlockType::Text => KindMetadata::Text { link: None },
            BlockType::Image => KindMetadata::Image { alt: None, link: None },
            BlockType::RichText => KindMetadata::RichText,
            BlockType::PricingPlan => KindMetadata::PricingPlan,
            BlockType::Faq => KindMetadata::Faq,
        }
    }

    pub fn block_type(&self) -> BlockType {
        match self {
            KindMetadata::Text { .. } => BlockType::Text,
            KindMetadata::Image { .. } => BlockType::Image,
            KindMetadata::RichText => BlockType::RichText,
            KindMetadata::PricingPlan => BlockType::PricingPlan,
            KindMetadata::Faq => BlockType::Faq,
        }
    }
}

/// Block metadata: shared attributes, per-type fields, and passthrough keys
#[derive(Debug, Clone, PartialEq)]
pub struct BlockMetadata {
    /// Sidebar bucket name
    pub group: Option<String>,
    pub editable: Option<bool>,
    pub highlighted: Option<bool>,
    pub kind: KindMetadata,
    /// Keys with no typed home, preserved as written
    pub extra: Map<String, Value>,
}

impl BlockMetadata {
    pub fn new(block_type: BlockType) -> Self {
        Self {
            group: None,
            editable: None,
            highlighted: None,
            kind: KindMetadata::empty(block_type),
            extra: Map::new(),
        }
    }

    pub fn block_type(&self) -> BlockType {
        self.kind.block_type()
    }

    /// Group name, falling back to [`DEFAULT_GROUP`]
    pub fn group_or_default(&self) -> &str {
        self.group.as_deref().unwrap_or(DEFAULT_GROUP)
    }

    pub fn link(&self) -> Option<&str> {
        match &self.kind {
            KindMetadata::Text { link } | KindMetadata::Image { link, .. } => link.as_deref(),
            _ => None,
        }
    }

    pub fn alt(&self) -> Option<&str> {
        match &self.kind {
            KindMetadata::Image { alt, .. } => alt.as_deref(),
            _ => None,
        }
    }

    /// Shallow-merge a patch. Fields absent from the patch are kept.
    pub fn apply(&mut self, patch: MetadataPatch) {
        if let Some(group) = patch.group {
            self.set_raw("group".to_string(), Value::String(group));
        }
        if let Some(editable) = patch.editable {
            self.set_raw("editable".to_string(), Value::Bool(editable));
        }
        if let Some(highlighted) = patch.highlighted {
            self.set_raw("highlighted".to_string(), Value::Bool(highlighted));
        }
        if let Some(link) = patch.link {
            self.set_raw("link".to_string(), Value::String(link));
        }
        if let Some(alt) = patch.alt {
            self.set_raw("alt".to_string(), Value::String(alt));
        }
        for (key, value) in patch.extra {
            self.set_raw(key, value);
        }
    }

    /// Set one key from the open record shape.
    ///
    /// Known keys with the expected JSON type land in their typed field.
    /// An explicit `null` clears the typed field and is kept in `extra` so it
    /// is written back as it was read. Anything else goes to `extra`.
    pub fn set_raw(&mut self, key: String, value: Value) {
        let typed = match (key.as_str(), value) {
            ("group", Value::String(s)) => {
                self.group = Some(s);
                None
            }
            ("group", Value::Null) => {
                self.group = None;
                Some(Value::Null)
            }
            ("editable", Value::Bool(b)) => {
                self.editable = Some(b);
                None
            }
            ("highlighted", Value::Bool(b)) => {
                self.highlighted = Some(b);
                None
            }
            ("link", value @ (Value::String(_) | Value::Null)) => match &mut self.kind {
                KindMetadata::Text { link } | KindMetadata::Image { link, .. } => {
                    *link = value.as_str().map(str::to_string);
                    value.is_null().then_some(value)
                }
                _ => Some(value),
            },
            ("alt", value @ (Value::String(_) | Value::Null)) => match &mut self.kind {
                KindMetadata::Image { alt, .. } => {
                    *alt = value.as_str().map(str::to_string);
                    value.is_null().then_some(value)
                }
                _ => Some(value),
            },
            (_, value) => Some(value),
        };

        match typed {
            Some(value) => {
                self.extra.insert(key, value);
            }
            None => {
                self.extra.remove(&key);
            }
        }
    }

    fn from_raw(block_type: BlockType, raw: Map<String, Value>) -> Self {
        let mut metadata = Self::new(block_type);
        for (key, value) in raw {
            metadata.set_raw(key, value);
        }
        metadata
    }

    fn to_raw(&self) -> Map<String, Value> {
        let mut raw = self.extra.clone();
        if let Some(group) = &self.group {
            raw.insert("group".to_string(), Value::String(group.clone()));
        }
        if let Some(editable) = self.editable {
            raw.insert("editable".to_string(), Value::Bool(editable));
        }
        if let Some(highlighted) = self.highlighted {
            raw.insert("highlighted".to_string(), Value::Bool(highlighted));
        }
        if let Some(link) = self.link() {
            raw.insert("link".to_string(), Value::String(link.to_string()));
        }
        if let Some(alt) = self.alt() {
            raw.insert("alt".to_string(), Value::String(alt.to_string()));
        }
        raw
    }
}

/// Partial metadata update for [`crate::PageBlockStore::update_block_value`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataPatch {
    pub group: Option<String>,
    pub link: Option<String>,
    pub alt: Option<String>,
    pub editable: Option<bool>,
    pub highlighted: Option<bool>,
    pub extra: Map<String, Value>,
}

impl MetadataPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = Some(alt.into());
        self
    }

    pub fn editable(mut self, editable: bool) -> Self {
        self.editable = Some(editable);
        self
    }

    pub fn highlighted(mut self, highlighted: bool) -> Self {
        self.highlighted = Some(highlighted);
        self
    }

    pub fn field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A typed, labeled unit of page content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBlock", into = "RawBlock")]
pub struct ContentBlock {
    pub id: BlockId,
    /// Admin-facing caption, independent of `value`
    pub label: String,
    pub value: String,
    pub metadata: BlockMetadata,
}

impl ContentBlock {
    pub fn new(
        id: impl Into<BlockId>,
        block_type: BlockType,
        label: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            value: value.into(),
            metadata: BlockMetadata::new(block_type),
        }
    }

    pub fn with_metadata(mut self, patch: MetadataPatch) -> Self {
        self.metadata.apply(patch);
        self
    }

    pub fn with_group(self, group: impl Into<String>) -> Self {
        self.with_metadata(MetadataPatch::new().group(group))
    }

    pub fn block_type(&self) -> BlockType {
        self.metadata.block_type()
    }

    pub fn group(&self) -> &str {
        self.metadata.group_or_default()
    }
}

/// Persisted record shape
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawBlock {
    id: String,
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    value: String,
    #[serde(default)]
    label: String,
    #[serde(default)]
    metadata: Map<String, Value>,
}

impl TryFrom<RawBlock> for ContentBlock {
    type Error = EditorError;

    fn try_from(raw: RawBlock) -> Result<Self, Self::Error> {
        let block_type: BlockType = raw.block_type.parse()?;
        Ok(Self {
            id: BlockId(raw.id),
            label: raw.label,
            value: raw.value,
            metadata: BlockMetadata::from_raw(block_type, raw.metadata),
        })
    }
}

impl From<ContentBlock> for RawBlock {
    fn from(block: ContentBlock) -> Self {
        Self {
            block_type: block.block_type().as_str().to_string(),
            metadata: block.metadata.to_raw(),
            id: block.id.0,
            value: block.value,
            label: block.label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_block_type_round_trips_through_str() {
        for block_type in BlockType::ALL {
            assert_eq!(block_type.as_str().parse::<BlockType>().unwrap(), block_type);
        }
        assert!(matches!(
            "video".parse::<BlockType>(),
            Err(EditorError::UnknownBlockType(t)) if t == "video"
        ));
    }

    #[test]
    fn test_generated_id_is_keyed_to_type() {
        let id = BlockId::generate(BlockType::Image);
        assert!(id.as_str().starts_with("custom-image-"));
        assert_eq!(id.as_str().len(), "custom-image-".len() + 8);
        assert_ne!(id, BlockId::generate(BlockType::Image));
    }

    #[test]
    fn test_decode_types_known_metadata() {
        let block: ContentBlock = serde_json::from_value(json!({
            "id": "hero-image",
            "type": "image",
            "value": "https://example.com/a.png",
            "label": "Hero Image",
            "metadata": {
                "group": "Hero",
                "alt": "Office",
                "link": "/about",
                "editable": true,
                "focalPoint": "center"
            }
        }))
        .unwrap();

        assert_eq!(block.block_type(), BlockType::Image);
        assert_eq!(block.group(), "Hero");
        assert_eq!(block.metadata.alt(), Some("Office"));
        assert_eq!(block.metadata.link(), Some("/about"));
        assert_eq!(block.metadata.editable, Some(true));
        assert_eq!(block.metadata.extra.get("focalPoint"), Some(&json!("center")));
        assert!(!block.metadata.extra.contains_key("alt"));
    }

    #[test]
    fn test_untyped_keys_survive_round_trip() {
        let original = json!({
            "id": "faq-1",
            "type": "faq",
            "value": "{}",
            "label": "FAQ",
            "metadata": { "alt": "not for faq", "group": 7, "order": 3 }
        });
        let block: ContentBlock = serde_json::from_value(original.clone()).unwrap();

        // alt has no typed home on an FAQ block, group is the wrong JSON type
        assert_eq!(block.metadata.alt(), None);
        assert_eq!(block.group(), DEFAULT_GROUP);
        assert_eq!(block.metadata.extra.len(), 3);

        assert_eq!(serde_json::to_value(&block).unwrap(), original);
    }

    #[test]
    fn test_unknown_type_fails_to_decode() {
        let result = serde_json::from_value::<ContentBlock>(json!({
            "id": "x", "type": "carousel", "value": ""
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_patch_merges_shallowly() {
        let mut metadata = BlockMetadata::new(BlockType::Text);
        metadata.apply(MetadataPatch::new().group("Hero").link("/start"));
        metadata.apply(MetadataPatch::new().highlighted(true));

        assert_eq!(metadata.group.as_deref(), Some("Hero"));
        assert_eq!(metadata.link(), Some("/start"));
        assert_eq!(metadata.highlighted, Some(true));
    }

    #[test]
    fn test_patch_keeps_alt_on_text_block_as_extra() {
        let mut metadata = BlockMetadata::new(BlockType::Text);
        metadata.apply(MetadataPatch::new().alt("ignored by text"));

        assert_eq!(metadata.alt(), None);
        assert_eq!(metadata.extra.get("alt"), Some(&json!("ignored by text")));
    }

    #[test]
    fn test_null_clears_typed_field() {
        let mut metadata = BlockMetadata::new(BlockType::Image);
        metadata.apply(MetadataPatch::new().alt("A"));
        metadata.set_raw("alt".to_string(), Value::Null);
        assert_eq!(metadata.alt(), None);
        assert_eq!(metadata.to_raw().get("alt"), Some(&Value::Null));

        metadata.apply(MetadataPatch::new().alt("B"));
        assert_eq!(metadata.alt(), Some("B"));
        assert!(metadata.extra.is_empty());
    }

    #[test]
    fn test_explicit_nulls_survive_round_trip() {
        let original = json!({
            "id": "hero-link",
            "type": "text",
            "value": "Read more",
            "label": "Hero Link",
            "metadata": { "group": null, "link": null, "editable": null }
        });
        let block: ContentBlock = serde_json::from_value(original.clone()).unwrap();

        assert_eq!(block.group(), DEFAULT_GROUP);
        assert_eq!(block.metadata.link(), None);
        assert_eq!(serde_json::to_value(&block).unwrap(), original);
    }
}
