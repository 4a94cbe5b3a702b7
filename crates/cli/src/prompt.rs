//! Line-oriented prompts for the interactive flows.

use anyhow::Result;
use std::io::{self, Write};

/// Print `query` and return the trimmed reply.
pub fn question(query: &str) -> Result<String> {
    print!("{query}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Use the preset from a flag when given, otherwise ask.
pub fn field(label: &str, preset: Option<String>) -> Result<String> {
    match preset {
        Some(value) => Ok(value),
        None => question(&format!("{label}: ")),
    }
}

/// Like [`field`], but an empty reply keeps the current value.
pub fn field_with_default(label: &str, preset: Option<String>, current: String) -> Result<String> {
    match preset {
        Some(value) => Ok(value),
        None => {
            let reply = question(&format!("{label}: "))?;
            if reply.is_empty() {
                Ok(current)
            } else {
                Ok(reply)
            }
        }
    }
}

/// Only a literal "yes" (any case) confirms.
pub fn confirm(query: &str) -> Result<bool> {
    Ok(question(query)?.eq_ignore_ascii_case("yes"))
}
