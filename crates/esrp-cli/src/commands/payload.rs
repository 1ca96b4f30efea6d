//! Payload-hash command implementation.

use super::read_input;
use esrp_envelope::derive_payload_hash;

pub fn run(input: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let text = read_input(input)?;
    println!("{}", derive_payload_hash(&text)?);
    Ok(())
}
