//! `taskcheck extract` - show the structured messages in captured build output

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

use crate::verify::{collect_messages, StructuredMessage};

/// Read captured stdout from `file` (stdin when `None`) and print its messages
pub fn execute(file: Option<&Path>, json: bool) -> Result<()> {
    let input = match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    let messages = collect_messages(input.lines());

    if json {
        let texts: Vec<&str> = messages.iter().map(StructuredMessage::as_str).collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&texts).context("Failed to serialize messages")?
        );
        return Ok(());
    }

    if messages.is_empty() {
        println!("{}", "No structured messages found".dimmed());
        return Ok(());
    }

    for (index, message) in messages.iter().enumerate() {
        println!("{}", format!("Message {}:", index + 1).bold());
        for line in message.as_str().lines() {
            println!("  {line}");
        }
    }

    Ok(())
}
