//! Typed interpretation of block values and the templates used for new blocks.
//!
//! Structured blocks store their record as a JSON string in `value`. Reading
//! never fails: a value that is not a JSON object degrades to a fixed
//! fallback and the stored string is left untouched. No schema is enforced
//! on the fields of an object.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::{BlockType, ContentBlock};

/// Group assigned to blocks created in the editor
pub const CUSTOM_GROUP: &str = "Custom";

pub const DEFAULT_TEXT_VALUE: &str = "New text content";
pub const DEFAULT_IMAGE_VALUE: &str =
    "https://images.unsplash.com/photo-1497366216548-37526070297c?w=1200";
pub const DEFAULT_RICH_TEXT_VALUE: &str = "<p>New rich text content paragraph...</p>";
pub const DEFAULT_PRICING_PLAN_VALUE: &str =
    r#"{"name":"New Plan","price":"$0","period":"/month","features":["Feature one"]}"#;
pub const DEFAULT_FAQ_VALUE: &str =
    r#"{"question":"New question?","answer":"Answer goes here."}"#;

/// A pricing-plan block's record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingPlan {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlighted: Option<bool>,
}

impl PricingPlan {
    /// Display value for a plan that failed to parse
    pub fn fallback() -> Self {
        Self {
            name: "Plan".to_string(),
            price: "$TBD".to_string(),
            period: None,
            description: None,
            features: Vec::new(),
            cta_label: None,
            cta_link: None,
            highlighted: None,
        }
    }

    /// Read a plan from a block value.
    ///
    /// Only a value that is not a JSON object falls back. Fields are read
    /// leniently: scalars are stringified, `null` and mistyped entries take
    /// their default.
    pub fn parse_or_fallback(value: &str) -> Self {
        let Some(record) = parse_record(value, "pricing plan") else {
            return Self::fallback();
        };

        Self {
            name: text_field(&record, "name").unwrap_or_default(),
            price: text_field(&record, "price").unwrap_or_default(),
            period: text_field(&record, "period"),
            description: text_field(&record, "description"),
            features: record
                .get("features")
                .and_then(Value::as_array)
                .map(|features| {
                    features
                        .iter()
                        .filter_map(|f| f.as_str().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default(),
            cta_label: text_field(&record, "ctaLabel"),
            cta_link: text_field(&record, "ctaLink"),
            highlighted: match record.get("highlighted") {
                Some(Value::Bool(b)) => Some(*b),
                Some(Value::String(s)) => s.parse().ok(),
                _ => None,
            },
        }
    }

    /// Serialize back into a block value
    pub fn to_value(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// An FAQ block's question/answer pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqItem {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
}

impl FaqItem {
    pub fn fallback() -> Self {
        Self {
            question: "Question".to_string(),
            answer: String::new(),
        }
    }

    pub fn parse_or_fallback(value: &str) -> Self {
        let Some(record) = parse_record(value, "FAQ") else {
            return Self::fallback();
        };

        Self {
            question: text_field(&record, "question").unwrap_or_default(),
            answer: text_field(&record, "answer").unwrap_or_default(),
        }
    }

    pub fn to_value(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Parse a structured value, logging when it is not a JSON object
fn parse_record(value: &str, kind: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(value) {
        Ok(Value::Object(record)) => Some(record),
        Ok(other) => {
            warn!(kind, found = %other, "Structured value is not an object, using fallback");
            None
        }
        Err(e) => {
            warn!(kind, error = %e, "Malformed structured value, using fallback");
            None
        }
    }
}

fn text_field(record: &Map<String, Value>, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl ContentBlock {
    /// Pricing plan record, if this is a pricing-plan block
    pub fn pricing_plan(&self) -> Option<PricingPlan> {
        (self.block_type() == BlockType::PricingPlan)
            .then(|| PricingPlan::parse_or_fallback(&self.value))
    }

    /// FAQ record, if this is an FAQ block
    pub fn faq_item(&self) -> Option<FaqItem> {
        (self.block_type() == BlockType::Faq).then(|| FaqItem::parse_or_fallback(&self.value))
    }
}

/// Defaults for a block created in the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockTemplate {
    pub block_type: BlockType,
    pub label: &'static str,
    pub value: &'static str,
    pub group: &'static str,
}

impl BlockTemplate {
    pub fn for_type(block_type: BlockType) -> Self {
        let (label, value) = match block_type {
            BlockType::Text => ("Text", DEFAULT_TEXT_VALUE),
            BlockType::Image => ("Image", DEFAULT_IMAGE_VALUE),
            BlockType::RichText => ("Rich Text", DEFAULT_RICH_TEXT_VALUE),
            BlockType::PricingPlan => ("Pricing Plan", DEFAULT_PRICING_PLAN_VALUE),
            BlockType::Faq => ("FAQ Item", DEFAULT_FAQ_VALUE),
        };

        Self {
            block_type,
            label,
            value,
            group: CUSTOM_GROUP,
        }
    }

    pub fn instantiate(&self, id: impl Into<crate::BlockId>) -> ContentBlock {
        ContentBlock::new(id, self.block_type, self.label, self.value).with_group(self.group)
    }
}
