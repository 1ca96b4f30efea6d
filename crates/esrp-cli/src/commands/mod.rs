//! Subcommand implementations.

use std::io::{self, Read};

pub mod canonicalize;
pub mod hash;
pub mod payload;
pub mod uri;
pub mod validate;
pub mod verify;

/// Reads JSON text from a file argument, or stdin when none was given.
pub fn read_input(input: Option<String>) -> Result<String, Box<dyn std::error::Error>> {
    match input {
        Some(path) => std::fs::read_to_string(&path)
            .map_err(|e| format!("failed to read file {}: {}", path, e).into()),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}
