//! Canonicalize command implementation.

use super::read_input;

pub fn run(input: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let text = read_input(input)?;
    let bytes = esrp_canonical::canonicalize(&text)?;
    // Canonical bytes are always valid UTF-8.
    println!("{}", String::from_utf8_lossy(&bytes));
    Ok(())
}
