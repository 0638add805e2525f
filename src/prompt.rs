//! Interactive fallbacks for generator flags omitted on the command line.
//!
//! Binaries resolve their full configuration (flags, then prompts) before any
//! pipeline runs; nothing below this module ever reads stdin.

use std::io::{self, Write};

use anyhow::{bail, Context, Result};

/// Prompts until a non-empty line is entered.
pub fn prompt_line(message: &str) -> Result<String> {
    loop {
        print!("{message}");
        io::stdout().flush()?;
        let mut line = String::new();
        let n = io::stdin()
            .read_line(&mut line)
            .context("reading stdin")?;
        if n == 0 {
            bail!("stdin closed before a value was entered");
        }
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            return Ok(trimmed.to_owned());
        }
    }
}

/// Prompts until a positive integer is entered.
pub fn prompt_count(message: &str) -> Result<u64> {
    loop {
        let line = prompt_line(message)?;
        match line.parse::<u64>() {
            Ok(value) if value > 0 => return Ok(value),
            _ => println!("please enter a positive number"),
        }
    }
}
