mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    add_block, blocks, init, move_block, pages, remove, seed, set_status, set_value,
    AddBlockArgs, BlocksArgs, InitArgs, MoveArgs, RemoveArgs, SetValueArgs, StatusArgs,
};
use tracing_subscriber::EnvFilter;

/// SprouX CLI - edit site pages block by block
#[derive(Parser, Debug)]
#[command(name = "sproux")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a sproux.config.json in the current directory
    Init(InitArgs),

    /// Create any required page that is missing
    Seed,

    /// List pages
    Pages,

    /// Show a page's blocks by group
    Blocks(BlocksArgs),

    /// Append a new block to a page
    AddBlock(AddBlockArgs),

    /// Set a block's value, label and metadata
    SetValue(SetValueArgs),

    /// Move a block up or down
    Move(MoveArgs),

    /// Remove a block (asks for --yes)
    Remove(RemoveArgs),

    /// Change a page's publication status
    Status(StatusArgs),
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir.display().to_string(),
        Err(err) => {
            eprintln!("{} Cannot get current directory: {}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Seed => seed(&cwd).await,
        Command::Pages => pages(&cwd).await,
        Command::Blocks(args) => blocks(args, &cwd).await,
        Command::AddBlock(args) => add_block(args, &cwd).await,
        Command::SetValue(args) => set_value(args, &cwd).await,
        Command::Move(args) => move_block(args, &cwd).await,
        Command::Remove(args) => remove(args, &cwd).await,
        Command::Status(args) => set_status(args, &cwd).await,
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
