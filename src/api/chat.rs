//! Interactive Q&A session
//!
//! This module provides the interactive loop for asking questions about a
//! stored memoir. It includes special commands like 'help', 'stats' and a
//! raw 'search' mode.

use crate::api::MemoirRetriever;
use crate::error::Result;
use crate::utils::format_file_size;
use std::io::{self, Write};

/// Interactive Q&A session over a loaded memoir
///
/// Reads questions line by line until the user types 'exit' or 'quit'.
/// Special commands:
/// * `help` - list commands
/// * `stats` - show memoir statistics
/// * `search <query>` - show raw ranked search results
pub async fn chat_with_memoir(retriever: &MemoirRetriever) -> Result<()> {
    let memoir = retriever.memoir();

    println!(
        "Memoir '{}' by {} loaded successfully.",
        memoir.title, memoir.author
    );
    if let Ok(stats) = retriever.get_stats() {
        println!(
            "   {} chapters, {} illustrated",
            stats.total_chunks, stats.illustrated_chunks
        );
    }
    println!("\nType 'help' for commands, 'exit' to quit");
    println!("{}", "-".repeat(50));

    loop {
        print!("\nAsk a question about the memoir: ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            // stdin closed
            println!("\nExiting Q&A session.");
            break;
        }
        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        match input.to_lowercase().as_str() {
            "exit" | "quit" | "q" => {
                println!("Exiting Q&A session.");
                break;
            }
            "help" => {
                println!("\nCommands:");
                println!("  search <query> - Show raw search results");
                println!("  stats          - Show memoir statistics");
                println!("  help           - Show this help");
                println!("  exit/quit      - End session");
                continue;
            }
            "stats" => {
                match retriever.get_stats() {
                    Ok(stats) => {
                        println!("\nMemoir Statistics:");
                        println!("  Total chapters: {}", stats.total_chunks);
                        println!("  Illustrated:    {}", stats.illustrated_chunks);
                        println!(
                            "  Database size:  {}",
                            format_file_size(stats.database_size_bytes as u64)
                        );
                    }
                    Err(e) => println!("Error getting stats: {}", e),
                }
                continue;
            }
            _ => {
                if input.to_lowercase().starts_with("search ") {
                    let query = &input[7..];
                    println!("\nSearching: '{}'", query);

                    match retriever.search(query, 5) {
                        Ok(results) if results.is_empty() => {
                            println!("No matches.");
                        }
                        Ok(results) => {
                            for (i, (rank, text)) in results.iter().enumerate() {
                                let preview = text.chars().take(100).collect::<String>();
                                println!("{}. [rank {:.3}] {}", i + 1, rank, preview);
                            }
                        }
                        Err(e) => println!("Search error: {}", e),
                    }
                    continue;
                }

                let start_time = std::time::Instant::now();
                let response = retriever.answer(input).await?;
                let elapsed = start_time.elapsed();

                println!("\nResponse:\n{}", response);
                println!("[{:.1}s]", elapsed.as_secs_f64());
            }
        }
    }

    Ok(())
}
