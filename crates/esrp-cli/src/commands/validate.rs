//! Validate command implementation.

use super::read_input;
use esrp_envelope::{validate_request, validate_response};

pub fn run(response: bool, input: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let text = read_input(input)?;
    if response {
        validate_response(&text)?;
        println!("valid response envelope");
    } else {
        validate_request(&text)?;
        println!("valid request envelope");
    }
    Ok(())
}
