//! Block edits from the command line.
//!
//! Each command opens an edit session on one page, applies a single
//! operation to the draft and saves it. Nothing is written when the
//! operation turns out to be a no-op.

use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;
use sproux_editor::{BlockType, Direction, MetadataPatch, PageBlockStore, PageStatus};
use tracing::debug;

#[derive(Debug, Args)]
pub struct AddBlockArgs {
    /// Page id
    pub page: String,

    /// Block type (text, image, richtext, pricing-plan, faq)
    pub block_type: String,
}

#[derive(Debug, Args)]
pub struct SetValueArgs {
    /// Page id
    pub page: String,

    /// Block id
    pub block: String,

    /// New block value
    pub value: String,

    /// New admin-facing label
    #[arg(long)]
    pub label: Option<String>,

    /// Sidebar group
    #[arg(long)]
    pub group: Option<String>,

    /// Navigation target (text and image blocks)
    #[arg(long)]
    pub link: Option<String>,

    /// Alt text (image blocks)
    #[arg(long)]
    pub alt: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MoveDirection {
    Up,
    Down,
}

impl From<MoveDirection> for Direction {
    fn from(direction: MoveDirection) -> Self {
        match direction {
            MoveDirection::Up => Direction::Up,
            MoveDirection::Down => Direction::Down,
        }
    }
}

#[derive(Debug, Args)]
pub struct MoveArgs {
    /// Page id
    pub page: String,

    /// Block id
    pub block: String,

    #[arg(value_enum)]
    pub direction: MoveDirection,
}

#[derive(Debug, Args)]
pub struct RemoveArgs {
    /// Page id
    pub page: String,

    /// Block id
    pub block: String,

    /// Confirm the removal
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Debug, Args)]
pub struct StatusArgs {
    /// Page id
    pub page: String,

    /// draft, published or private
    pub status: String,
}

/// Open a session on `page_id`, run `edit`, and save if the draft changed
async fn edit_page<F>(cwd: &str, page_id: &str, edit: F) -> Result<()>
where
    F: FnOnce(&mut PageBlockStore) -> Result<()>,
{
    let repo = Config::load(cwd)?.repository(cwd);
    let page = repo
        .find_page(page_id)
        .await?
        .ok_or_else(|| anyhow!("Page not found: {page_id}"))?;

    let mut session = PageBlockStore::open(&page);
    edit(&mut session)?;

    if !session.is_dirty() {
        debug!(page = page_id, "Draft unchanged, discarding");
        session.discard();
        println!("{} Nothing to save", "•".dimmed());
        return Ok(());
    }

    let committed = session.save(&repo).await?;
    println!(
        "{} Saved {} (version {})",
        "✓".green(),
        committed.id.bright_white(),
        committed.version
    );
    Ok(())
}

pub async fn add_block(args: AddBlockArgs, cwd: &str) -> Result<()> {
    let block_type: BlockType = args.block_type.parse()?;
    edit_page(cwd, &args.page, |session| {
        let id = session
            .add_block(block_type)
            .ok_or_else(|| anyhow!("Edit session is closed"))?;
        println!("  {} Added {}", "+".green(), id.to_string().bright_white());
        Ok(())
    })
    .await
}

pub async fn set_value(args: SetValueArgs, cwd: &str) -> Result<()> {
    let SetValueArgs {
        page,
        block,
        value,
        label,
        group,
        link,
        alt,
    } = args;

    let patch = MetadataPatch {
        group,
        link,
        alt,
        ..MetadataPatch::default()
    };
    let patch = (!patch.is_empty()).then_some(patch);

    edit_page(cwd, &page, |session| {
        if !session.update_block_value(&block, value, patch, label) {
            return Err(anyhow!("Block not found: {block}"));
        }
        Ok(())
    })
    .await
}

pub async fn move_block(args: MoveArgs, cwd: &str) -> Result<()> {
    edit_page(cwd, &args.page, |session| {
        if session.block(&args.block).is_none() {
            return Err(anyhow!("Block not found: {}", args.block));
        }
        if !session.move_block(&args.block, args.direction.into()) {
            println!("  {} {} is already at the edge", "•".dimmed(), args.block);
        }
        Ok(())
    })
    .await
}

pub async fn remove(args: RemoveArgs, cwd: &str) -> Result<()> {
    edit_page(cwd, &args.page, |session| {
        if !session.request_removal(&args.block) {
            return Err(anyhow!("Block not found: {}", args.block));
        }

        if !args.yes {
            let staged = session.cancel_removal();
            println!(
                "{} Would remove {}. Re-run with --yes to confirm.",
                "⚠️".yellow(),
                staged.map(|id| id.to_string()).unwrap_or_default()
            );
            return Ok(());
        }

        if let Some(removed) = session.confirm_removal() {
            println!("  {} Removed {} ({})", "-".red(), removed.id, removed.label);
        }
        Ok(())
    })
    .await
}

pub async fn set_status(args: StatusArgs, cwd: &str) -> Result<()> {
    let status: PageStatus = args.status.parse()?;
    edit_page(cwd, &args.page, |session| {
        session.set_status(status);
        Ok(())
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use sproux_editor::PageData;

    async fn site() -> (tempfile::TempDir, String) {
        let dir = tempfile::TempDir::new().unwrap();
        let cwd = dir.path().display().to_string();
        Config::default().repository(&cwd).seed_required_pages().await.unwrap();
        (dir, cwd)
    }

    async fn page(cwd: &str, id: &str) -> PageData {
        Config::load(cwd)
            .unwrap()
            .repository(cwd)
            .find_page(id)
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn test_add_block_saves_new_version() {
        let (_dir, cwd) = site().await;
        let before = page(&cwd, "blog").await;

        add_block(
            AddBlockArgs {
                page: "blog".to_string(),
                block_type: "faq".to_string(),
            },
            &cwd,
        )
        .await
        .unwrap();

        let after = page(&cwd, "blog").await;
        assert_eq!(after.version, before.version + 1);
        assert_eq!(after.blocks.len(), before.blocks.len() + 1);
        assert_eq!(after.blocks.last().unwrap().block_type(), BlockType::Faq);
    }

    #[tokio::test]
    async fn test_unknown_block_type_is_rejected() {
        let (_dir, cwd) = site().await;
        let result = add_block(
            AddBlockArgs {
                page: "blog".to_string(),
                block_type: "video".to_string(),
            },
            &cwd,
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_set_value_with_metadata() {
        let (_dir, cwd) = site().await;
        set_value(
            SetValueArgs {
                page: "home".to_string(),
                block: "hero-cta".to_string(),
                value: "Try it free".to_string(),
                label: None,
                group: Some("Call to action".to_string()),
                link: Some("/signup".to_string()),
                alt: None,
            },
            &cwd,
        )
        .await
        .unwrap();

        let home = page(&cwd, "home").await;
        let cta = home.block("hero-cta").unwrap();
        assert_eq!(cta.value, "Try it free");
        assert_eq!(cta.group(), "Call to action");
        assert_eq!(cta.metadata.link(), Some("/signup"));
        assert_eq!(cta.label, "Hero Button");
    }

    #[tokio::test]
    async fn test_remove_requires_confirmation() {
        let (_dir, cwd) = site().await;
        let args = |yes| RemoveArgs {
            page: "help".to_string(),
            block: "faq-cancel".to_string(),
            yes,
        };

        remove(args(false), &cwd).await.unwrap();
        let help = page(&cwd, "help").await;
        assert!(help.block("faq-cancel").is_some());
        assert_eq!(help.version, 0);

        remove(args(true), &cwd).await.unwrap();
        assert!(page(&cwd, "help").await.block("faq-cancel").is_none());
    }

    #[tokio::test]
    async fn test_boundary_move_writes_nothing() {
        let (_dir, cwd) = site().await;
        move_block(
            MoveArgs {
                page: "home".to_string(),
                block: "hero-title".to_string(),
                direction: MoveDirection::Up,
            },
            &cwd,
        )
        .await
        .unwrap();
        assert_eq!(page(&cwd, "home").await.version, 0);
    }

    #[tokio::test]
    async fn test_set_status() {
        let (_dir, cwd) = site().await;
        set_status(
            StatusArgs {
                page: "pricing".to_string(),
                status: "draft".to_string(),
            },
            &cwd,
        )
        .await
        .unwrap();
        assert_eq!(page(&cwd, "pricing").await.status, PageStatus::Draft);
    }
}
