//! Page records and the pages every site must have.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{BlockType, ContentBlock, EditorError, MetadataPatch};

/// Publication status of a page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    #[default]
    Draft,
    Published,
    Private,
}

impl PageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageStatus::Draft => "draft",
            PageStatus::Published => "published",
            PageStatus::Private => "private",
        }
    }
}

impl fmt::Display for PageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageStatus {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PageStatus::Draft),
            "published" => Ok(PageStatus::Published),
            "private" => Ok(PageStatus::Private),
            other => Err(EditorError::UnknownPageStatus(other.to_string())),
        }
    }
}

/// A page's top-level record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageData {
    pub id: String,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub status: PageStatus,
    pub updated_at: DateTime<Utc>,

    /// Incremented on every save; used to detect concurrent edits
    #[serde(default)]
    pub version: u64,

    /// Rendering order on the live page
    #[serde(default)]
    pub blocks: Vec<ContentBlock>,
}

impl PageData {
    pub fn new(id: impl Into<String>, title: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            slug: slug.into(),
            status: PageStatus::Draft,
            updated_at: Utc::now(),
            version: 0,
            blocks: Vec::new(),
        }
    }

    pub fn with_status(mut self, status: PageStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_blocks(mut self, blocks: Vec<ContentBlock>) -> Self {
        self.blocks = blocks;
        self
    }

    /// Block with exactly this id
    pub fn block(&self, id: &str) -> Option<&ContentBlock> {
        self.blocks.iter().find(|b| b.id == id)
    }

    /// First block whose id contains `fragment`
    pub fn block_containing(&self, fragment: &str) -> Option<&ContentBlock> {
        self.blocks.iter().find(|b| b.id.as_str().contains(fragment))
    }
}

/// Pages seeded into an empty store on first run
pub fn required_pages() -> Vec<PageData> {
    vec![home_page(), pricing_page(), blog_page(), help_page()]
}

fn home_page() -> PageData {
    PageData::new("home", "Home", "/")
        .with_status(PageStatus::Published)
        .with_blocks(vec![
            ContentBlock::new(
                "hero-title",
                BlockType::Text,
                "Hero Title",
                "Grow your business with SprouX",
            )
            .with_group("Hero"),
            ContentBlock::new(
                "hero-subtitle",
                BlockType::Text,
                "Hero Subtitle",
                "Everything you need to launch, market and scale in one place.",
            )
            .with_group("Hero"),
            ContentBlock::new("hero-cta", BlockType::Text, "Hero Button", "Get started")
                .with_metadata(MetadataPatch::new().group("Hero").link("/pricing")),
            ContentBlock::new(
                "hero-image",
                BlockType::Image,
                "Hero Image",
                crate::values::DEFAULT_IMAGE_VALUE,
            )
            .with_metadata(MetadataPatch::new().group("Hero").alt("Team working together")),
            ContentBlock::new(
                "features-title",
                BlockType::Text,
                "Features Title",
                "Why teams choose SprouX",
            )
            .with_group("Features"),
            ContentBlock::new(
                "features-body",
                BlockType::RichText,
                "Features Body",
                "<p>Fast pages, simple editing and analytics built in.</p>",
            )
            .with_group("Features"),
        ])
}

fn pricing_page() -> PageData {
    let plan = |id: &str, name: &str, price: &str, features: &[&str], highlighted: bool| {
        let value = serde_json::json!({
            "name": name,
            "price": price,
            "period": "/month",
            "features": features,
            "ctaLabel": "Choose plan",
            "ctaLink": "/signup",
            "highlighted": highlighted,
        })
        .to_string();
        ContentBlock::new(id, BlockType::PricingPlan, name, value)
            .with_metadata(MetadataPatch::new().group("Plans").highlighted(highlighted))
    };

    PageData::new("pricing", "Pricing", "/pricing")
        .with_status(PageStatus::Published)
        .with_blocks(vec![
            ContentBlock::new(
                "pricing-title",
                BlockType::Text,
                "Pricing Title",
                "Simple, transparent pricing",
            )
            .with_group("Header"),
            plan("plan-starter", "Starter", "$0", &["1 site", "Community support"], false),
            plan("plan-pro", "Pro", "$29", &["10 sites", "Priority support", "Analytics"], true),
            plan(
                "plan-business",
                "Business",
                "$99",
                &["Unlimited sites", "Dedicated manager"],
                false,
            ),
        ])
}

fn blog_page() -> PageData {
    PageData::new("blog", "Blog", "/blog")
        .with_status(PageStatus::Published)
        .with_blocks(vec![
            ContentBlock::new("blog-title", BlockType::Text, "Blog Title", "SprouX Blog")
                .with_group("Header"),
            ContentBlock::new(
                "blog-subtitle",
                BlockType::Text,
                "Blog Subtitle",
                "Guides, product news and growth stories.",
            )
            .with_group("Header"),
        ])
}

fn help_page() -> PageData {
    let faq = |id: &str, question: &str, answer: &str| {
        let value = serde_json::json!({ "question": question, "answer": answer }).to_string();
        ContentBlock::new(id, BlockType::Faq, "FAQ Item", value).with_group("FAQ")
    };

    PageData::new("help", "Help Center", "/help")
        .with_status(PageStatus::Published)
        .with_blocks(vec![
            ContentBlock::new("help-title", BlockType::Text, "Help Title", "How can we help?")
                .with_group("Header"),
            faq(
                "faq-getting-started",
                "How do I get started?",
                "Create an account and pick a plan that fits your team.",
            ),
            faq(
                "faq-cancel",
                "Can I cancel anytime?",
                "Yes. Plans are billed monthly and can be cancelled at any time.",
            ),
        ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required_pages_are_stable() {
        let ids: Vec<_> = required_pages().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["home", "pricing", "blog", "help"]);
    }

    #[test]
    fn test_required_block_ids_are_unique_per_page() {
        for page in required_pages() {
            let mut ids: Vec<_> = page.blocks.iter().map(|b| b.id.clone()).collect();
            ids.sort();
            ids.dedup();
            assert_eq!(ids.len(), page.blocks.len(), "duplicate ids on {}", page.id);
        }
    }

    #[test]
    fn test_seeded_pricing_plans_parse() {
        let pricing = pricing_page();
        let pro = pricing.block("plan-pro").unwrap().pricing_plan().unwrap();
        assert_eq!(pro.price, "$29");
        assert_eq!(pro.highlighted, Some(true));
        assert_eq!(pro.features.len(), 3);
    }

    #[test]
    fn test_block_lookup_by_fragment() {
        let home = home_page();
        assert_eq!(home.block_containing("title").unwrap().id, "hero-title");
        assert!(home.block("title").is_none());
    }

    #[test]
    fn test_page_decodes_without_version() {
        let page: PageData = serde_json::from_value(json!({
            "id": "about",
            "title": "About",
            "slug": "/about",
            "status": "private",
            "updatedAt": "2024-05-01T10:00:00Z",
            "blocks": []
        }))
        .unwrap();
        assert_eq!(page.version, 0);
        assert_eq!(page.status, PageStatus::Private);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("published".parse::<PageStatus>().unwrap(), PageStatus::Published);
        assert!("archived".parse::<PageStatus>().is_err());
    }
}
