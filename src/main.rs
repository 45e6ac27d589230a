//! memoir-rag CLI application
//!
//! Command-line interface for the memoir-rag library.

use clap::Parser;
use memoir_rag::{MemoirIngestor, MemoirRetriever, chat_with_memoir};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "memoir-rag")]
#[command(about = "Retrieval-augmented Q&A over a personal memoir")]
#[command(version)]
struct Cli {
    /// Save a new memoir to the database
    #[arg(long)]
    save: bool,

    /// Title of the memoir
    #[arg(long)]
    title: Option<String>,

    /// Author of the memoir
    #[arg(long)]
    author: Option<String>,

    /// Path to the text file of the memoir content (required for --save)
    #[arg(long)]
    content: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::init();

    let cli = Cli::parse();

    if cli.save {
        let (Some(title), Some(author), Some(content)) = (cli.title, cli.author, cli.content)
        else {
            eprintln!("To save a memoir, please provide --title, --author, and --content.");
            return Ok(());
        };
        save_command(title, author, content).await?;
    } else {
        let (Some(title), Some(author)) = (cli.title, cli.author) else {
            eprintln!("To start a Q&A session, please provide both --title and --author.");
            return Ok(());
        };
        qa_command(title, author).await?;
    }

    Ok(())
}

async fn save_command(
    title: String,
    author: String,
    content: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    if !content.exists() {
        eprintln!("Content file not found: {}", content.display());
        return Ok(());
    }

    let text = std::fs::read_to_string(&content)?;

    println!("Saving memoir '{}' by {}...", title, author);

    let mut ingestor = MemoirIngestor::new(None)?;
    let stats = ingestor.save_memoir(&title, &author, &text).await?;

    println!("Memoir '{}' by {} has been saved to the database.", title, author);
    println!("   Chapters:    {}", stats.total_chunks);
    println!("   Illustrated: {}", stats.illustrated_chunks);
    println!("   Time:        {:.2}s", stats.processing_time);

    Ok(())
}

async fn qa_command(title: String, author: String) -> Result<(), Box<dyn std::error::Error>> {
    match MemoirRetriever::open(None, &title, &author)? {
        Some(retriever) => {
            chat_with_memoir(&retriever).await?;
        }
        None => {
            eprintln!("Memoir '{}' by {} not found in the database.", title, author);
        }
    }

    Ok(())
}
