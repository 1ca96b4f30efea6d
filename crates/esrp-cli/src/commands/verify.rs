//! Verify command implementation.

use super::read_input;

pub fn run(digest: String, input: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let text = read_input(input)?;
    if esrp_canonical::verify_json(&text, &digest)? {
        println!("ok");
        Ok(())
    } else {
        Err("digest mismatch".into())
    }
}
