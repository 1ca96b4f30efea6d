//! Uri command implementation.

use esrp_workspace::parse_workspace_uri;

pub fn run(uri: String) -> Result<(), Box<dyn std::error::Error>> {
    let (namespace, path) = parse_workspace_uri(&uri)?;
    println!("namespace: {}", namespace);
    println!("path: {}", path);
    Ok(())
}
