mod cli;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use log::info;
use tokio::fs;

use cli::{Cli, Invocation};
use ghdl::{
    download_raw_file, parse_repo_url, Config, GhdlError, GitHubSource, TreeDownloader,
};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let invocation = cli.invocation();
    if invocation == Invocation::Help {
        if let Err(e) = cli::write_help(&mut std::io::stdout()) {
            eprintln!("failed to print help: {}", e);
        }
        return;
    }

    match run(&cli, invocation).await {
        Ok(()) => println!("Content downloaded successfully!"),
        Err(e) => {
            println!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

async fn run(cli: &Cli, invocation: Invocation) -> Result<()> {
    let config = Config::new().with_api_base(&cli.api_url)?;

    match invocation {
        Invocation::Help => Ok(()),
        Invocation::Tree { url, output_dir } => download_tree(&config, &url, &output_dir).await,
        Invocation::Raw { output_file, url } => download_raw(&config, &url, &output_file).await,
    }
}

async fn download_tree(config: &Config, url: &str, output_dir: &Path) -> Result<()> {
    let location = parse_repo_url(url)?;
    create_dir(output_dir).await?;

    let source = GitHubSource::from_location(config, &location);
    let summary = TreeDownloader::new(Arc::new(source))
        .download(&location.path, output_dir)
        .await?;

    info!(
        "{} file(s), {} directories, {} bytes written to {}",
        summary.files_written.len(),
        summary.directories_created.len(),
        summary.total_bytes,
        output_dir.display()
    );
    Ok(())
}

async fn download_raw(config: &Config, url: &str, output_file: &Path) -> Result<()> {
    let written = download_raw_file(config, url, output_file).await?;

    info!("{} bytes written to {}", written, output_file.display());
    Ok(())
}

async fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .await
        .map_err(|source| GhdlError::CreateDirectory {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(())
}
