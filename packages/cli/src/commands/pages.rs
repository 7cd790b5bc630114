use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use sproux_editor::{BlockType, ContentBlock, PageBlockStore, PageStatus};

#[derive(Debug, Args)]
pub struct BlocksArgs {
    /// Page id (e.g. home, pricing)
    pub page: String,
}

/// Write any missing required pages into the store
pub async fn seed(cwd: &str) -> Result<()> {
    let repo = Config::load(cwd)?.repository(cwd);
    let added = repo.seed_required_pages().await?;

    if added == 0 {
        println!("{} All required pages already exist", "✓".green());
    } else {
        println!("{} Seeded {} page(s)", "✓".green(), added);
    }
    Ok(())
}

pub async fn pages(cwd: &str) -> Result<()> {
    let repo = Config::load(cwd)?.repository(cwd);
    let pages = repo.load_pages().await?;

    if pages.is_empty() {
        println!("No pages yet. Run: sproux seed");
        return Ok(());
    }

    for page in pages {
        println!(
            "{:<12} {:<20} {:<12} {:<10} v{:<4} {} block(s)",
            page.id.bright_white().bold(),
            page.title,
            page.slug,
            status_label(page.status),
            page.version,
            page.blocks.len()
        );
    }
    Ok(())
}

/// Show a page's blocks the way the editor sidebar groups them
pub async fn blocks(args: BlocksArgs, cwd: &str) -> Result<()> {
    let repo = Config::load(cwd)?.repository(cwd);
    let page = repo
        .find_page(&args.page)
        .await?
        .ok_or_else(|| anyhow!("Page not found: {}", args.page))?;

    println!(
        "{} {} ({})",
        "📄".bright_blue(),
        page.title.bright_white().bold(),
        status_label(page.status)
    );

    let session = PageBlockStore::open(&page);
    for (group, blocks) in session.group_blocks().iter() {
        println!();
        println!("  {}", group.bright_blue().bold());
        for block in blocks {
            println!(
                "    {:<28} {:<13} {}",
                block.id.to_string().bright_white(),
                block.block_type().as_str().dimmed(),
                summary(block)
            );
        }
    }
    Ok(())
}

fn status_label(status: PageStatus) -> colored::ColoredString {
    match status {
        PageStatus::Published => status.as_str().green(),
        PageStatus::Draft => status.as_str().yellow(),
        PageStatus::Private => status.as_str().red(),
    }
}

fn summary(block: &ContentBlock) -> String {
    let text = match block.block_type() {
        BlockType::PricingPlan => block
            .pricing_plan()
            .map(|plan| format!("{} {}", plan.name, plan.price))
            .unwrap_or_default(),
        BlockType::Faq => block
            .faq_item()
            .map(|faq| faq.question)
            .unwrap_or_default(),
        _ => block.value.clone(),
    };
    truncate(&text, 60)
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{cut}…")
}
