//! ESRP CLI - canonicalization, hashing, and envelope validation from the shell.

use clap::{Parser, Subcommand};

mod commands;

use commands::{canonicalize, hash, payload, uri, validate, verify};

#[derive(Parser)]
#[command(name = "esrp")]
#[command(about = "ESRP integrity-core operations over files or stdin")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show canonical bytes for input JSON
    Canonicalize {
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
    },
    /// Hash canonical JSON (SHA-256, 64 lowercase hex chars)
    Hash {
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
    },
    /// Verify a hex digest against canonical JSON; exits 1 on mismatch
    Verify {
        /// Candidate digest, any case
        digest: String,
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
    },
    /// Validate a request (default) or response envelope
    Validate {
        /// Treat the input as a response envelope
        #[arg(long)]
        response: bool,
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
    },
    /// Derive the payload hash of a request envelope
    PayloadHash {
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
    },
    /// Parse a workspace URI into namespace and path
    Uri {
        /// A workspace:// URI
        uri: String,
    },
    /// Print the protocol version this build speaks
    Version,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Canonicalize { input } => canonicalize::run(input),
        Commands::Hash { input } => hash::run(input),
        Commands::Verify { digest, input } => verify::run(digest, input),
        Commands::Validate { response, input } => validate::run(response, input),
        Commands::PayloadHash { input } => payload::run(input),
        Commands::Uri { uri } => uri::run(uri),
        Commands::Version => {
            println!("{}", esrp_envelope::current_version());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
