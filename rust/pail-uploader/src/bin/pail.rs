use anyhow::{Context, Result};
use clap::Parser;
use pail_policy::Credentials;
use pail_uploader::cli::{Command, PailCli, policy_output};
use pail_uploader::{UploadOptions, configure, render};

fn main() -> Result<()> {
    // stdout carries the payload, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = PailCli::parse();
    let credentials = Credentials::from(cli.credentials);

    match cli.command {
        Command::Script(args) => {
            let script = render(&UploadOptions::from(args), &credentials)
                .context("failed to render uploader script")?;
            println!("{}", script);
        }
        Command::Policy(args) => {
            let config = configure(&UploadOptions::from(args), &credentials)
                .context("failed to issue upload policy")?;
            println!("{}", serde_json::to_string_pretty(&policy_output(&config))?);
        }
    }

    Ok(())
}
