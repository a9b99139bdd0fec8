use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hashnest::{Cost, DEFAULT_COST, EncodedDigest, Hasher, HasherConfig, Version};
use serde::Serialize;
use std::process::ExitCode;
mod auth;

#[derive(Debug, clap::Args)]
struct HashArgs {
    /// bcrypt cost factor, 4..=31 (default: 10)
    #[arg(long, env = "HASHNEST_COST")]
    cost: Option<u32>,

    /// Version tag written to the digest: 2a, 2b or 2y (default: 2b)
    #[arg(long, env = "HASHNEST_VERSION", value_parser = parse_version)]
    tag: Option<Version>,

    /// Refuse passwords longer than 72 bytes instead of truncating them
    #[arg(long, env = "HASHNEST_STRICT")]
    strict: bool,
}

impl HashArgs {
    fn to_config(&self) -> Result<HasherConfig> {
        let config = HasherConfig::default()
            .with_default_cost(self.cost.unwrap_or(DEFAULT_COST))?
            .with_version(self.tag.unwrap_or_default())
            .with_reject_truncation(self.strict);
        Ok(config)
    }
}

fn parse_version(tag: &str) -> Result<Version, hashnest::HashError> {
    tag.parse()
}

#[derive(Debug, Parser)]
#[command(name = "hashnest")]
#[command(version, about = "Salted, versioned bcrypt password hashing.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Hashes a password and prints the encoded digest
    Hash {
        #[command(flatten)]
        args: HashArgs,
    },

    /// Checks a password against an encoded digest
    #[command(arg_required_else_help = true)]
    Verify { digest: String },

    /// Shows the version, cost and salt of an encoded digest
    #[command(arg_required_else_help = true)]
    Inspect {
        digest: String,

        /// Print as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[derive(Debug, Serialize)]
struct DigestInfo {
    version: Version,
    cost: Cost,
    salt: String,
}

impl From<&EncodedDigest> for DigestInfo {
    fn from(digest: &EncodedDigest) -> Self {
        Self {
            version: digest.version(),
            cost: digest.cost(),
            salt: digest.encoded_salt(),
        }
    }
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("HASHNEST_LOG", "warn"))
        .init();
}

fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    init_logging();

    let args = Cli::parse();
    match args.command {
        Commands::Hash { args } => {
            let config = args.to_config()?;
            let hasher = Hasher::with_config(config)?;
            let password = auth::read_new_password_with_confirmation()?;
            let digest = hasher
                .hash_default(password.as_bytes())
                .context("failed to hash password")?;
            println!("{digest}");
        }
        Commands::Verify { digest } => {
            let digest: EncodedDigest = digest.parse().context("cannot verify")?;
            let password = auth::read_password()?;
            if Hasher::new().verify_digest(password.as_bytes(), &digest) {
                println!("valid");
            } else {
                println!("invalid");
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Inspect { digest, json } => {
            let digest: EncodedDigest = digest.parse().context("cannot inspect")?;
            let info = DigestInfo::from(&digest);
            if json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("version  {}", info.version);
                println!("cost     {}", info.cost.get());
                println!("salt     {}", info.salt);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
