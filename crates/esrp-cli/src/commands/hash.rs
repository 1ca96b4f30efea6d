//! Hash command implementation.

use super::read_input;

pub fn run(input: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let text = read_input(input)?;
    println!("{}", esrp_canonical::hash_json(&text)?);
    Ok(())
}
