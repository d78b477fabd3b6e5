mod clipboard;
mod prompt;

use crate::clipboard::copy_to_clipboard;
use crate::prompt::prompt_secret;
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use totp::{
    DEFAULT_ALGORITHM, DEFAULT_DIGITS, DEFAULT_PERIOD, Enrollment, Error, Store, generate,
    now_unix, render,
};

#[derive(Parser, Debug)]
#[command(name = "totp", version, about = "Generate TOTP.")]
struct Cli {
    /// Path of the enrollment file (defaults to ~/.totp/config.json)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print current codes for every registered enrollment (default)
    List,

    /// Register a new enrollment
    ///
    /// Examples:
    ///   totp add --issuer GitHub --identifier octocat --secret JBSWY3DPEHPK3PXP
    ///   totp add --uri 'otpauth://totp/GitHub:octocat?secret=JBSWY3DPEHPK3PXP'
    Add {
        #[arg(long, default_value = "", conflicts_with = "uri")]
        issuer: String,
        #[arg(long, default_value = "", conflicts_with = "uri")]
        identifier: String,
        /// Base32 secret; prompted for (hidden) when neither --secret nor --uri is given
        #[arg(long, conflicts_with = "uri")]
        secret: Option<String>,
        /// otpauth://totp/... provisioning URI
        #[arg(long)]
        uri: Option<String>,
        #[arg(long, default_value = DEFAULT_ALGORITHM, conflicts_with = "uri")]
        algorithm: String,
        #[arg(long, default_value_t = DEFAULT_DIGITS, conflicts_with = "uri")]
        digits: u32,
        #[arg(long, default_value_t = DEFAULT_PERIOD, conflicts_with = "uri")]
        period: u64,
    },

    /// Delete registered totp definition
    Delete {
        /// Position shown in the "No" column
        #[arg(allow_negative_numbers = true)]
        index: i64,
    },

    /// Copy the current code of one enrollment to the clipboard
    Clip {
        /// Position shown in the "No" column
        #[arg(allow_negative_numbers = true)]
        index: i64,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let store = match cli.config {
        Some(path) => Store::new(path),
        None => Store::open_default()?,
    };

    match cli.command.unwrap_or(Commands::List) {
        Commands::List => cmd_list(&store)?,
        Commands::Add {
            issuer,
            identifier,
            secret,
            uri,
            algorithm,
            digits,
            period,
        } => {
            let enrollment = match uri {
                Some(uri) => Enrollment::from_otpauth_uri(&uri)?,
                None => {
                    let secret = match secret {
                        Some(s) => s,
                        None => prompt_secret("Secret (base32): ")?,
                    };
                    Enrollment {
                        issuer,
                        identifier,
                        algorithm,
                        digits,
                        period,
                        secret,
                    }
                    .normalized()
                }
            };
            cmd_add(&store, enrollment)?
        }
        Commands::Delete { index } => cmd_delete(&store, index)?,
        Commands::Clip { index } => cmd_clip(&store, index)?,
    }

    Ok(())
}

fn cmd_list(store: &Store) -> anyhow::Result<()> {
    let now = now_unix()?;
    let mut stdout = std::io::stdout().lock();
    match totp::print_listing(store, now, &mut stdout) {
        Err(Error::StoreNotFound(_)) => render::render_table(&mut stdout, &[])?,
        other => other.context("an error occurred while reading entries")?,
    }
    Ok(())
}

fn cmd_add(store: &Store, enrollment: Enrollment) -> anyhow::Result<()> {
    let label = display_label(&enrollment.issuer, &enrollment.identifier);
    totp::add_enrollment(store, enrollment)?;
    println!("Added {label}");
    Ok(())
}

fn cmd_delete(store: &Store, index: i64) -> anyhow::Result<()> {
    let removed = totp::delete_enrollment(store, index)?;
    println!(
        "Deleted {}",
        display_label(&removed.issuer, &removed.identifier)
    );
    Ok(())
}

fn cmd_clip(store: &Store, index: i64) -> anyhow::Result<()> {
    let list = store.list()?;
    let enrollment = usize::try_from(index)
        .ok()
        .and_then(|i| list.get(i))
        .ok_or(Error::IndexOutOfRange {
            index,
            len: list.len(),
        })?;

    let result = generate(enrollment, now_unix()?)?;
    copy_to_clipboard(&result.code)?;
    println!(
        "Code for {} copied to clipboard ({}s remaining).",
        display_label(&result.issuer, &result.identifier),
        result.remaining
    );
    Ok(())
}

fn display_label(issuer: &str, identifier: &str) -> String {
    match (issuer.is_empty(), identifier.is_empty()) {
        (false, false) => format!("{issuer} ({identifier})"),
        (false, true) => issuer.to_string(),
        (true, false) => identifier.to_string(),
        (true, true) => "<unnamed>".to_string(),
    }
}
