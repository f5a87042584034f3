#![deny(clippy::all)]
use chandl::cli::extra::{load_servers, select_server};
use chandl::cli::Cli;
use chandl::progress_bars::IndicatifProgressHandler;
use chandl_core::queue::summary::DownloadSummary;
use chandl_core::queue::Queue;
use chandl_extractors::extractor::ExtractorRegistry;
use chandl_extractors::extractor_config::ServerConfig;
use chandl_extractors::imageboards::fourchan::ThreadReference;
use clap::Parser;
use color_eyre::eyre::{bail, Result};
use dialoguer::Confirm;
use futures::TryStreamExt;
use owo_colors::OwoColorize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    env_logger::builder().format_timestamp(None).init();
    color_eyre::install()?;

    let servers = load_servers(args.config.as_deref())?;

    let server = select_server(&servers, &args.server)?;
    let registry = ExtractorRegistry::with_defaults(server.clone())?;

    if args.servers {
        print_servers(&servers, &registry);
        return Ok(());
    }

    if args.list {
        return list_contents(&registry, &args.urls).await;
    }

    let mut summary = DownloadSummary::default();

    for url in &args.urls {
        let extractor = registry.resolve(url)?;
        let thread = ThreadReference::parse(url)?;
        let dirname = args.generate_save_path(&thread)?;

        if !args.overwrite && !confirm_output(&dirname)? {
            println!("{} {}", "Skipping".bold().blue(), url.blue().italic());
            continue;
        }

        let progress_handler = Arc::new(IndicatifProgressHandler::default());

        let qw = Queue::new(
            &server,
            args.simultaneous_downloads,
            Some(extractor.client()),
            args.queue_opts(),
            Some(progress_handler),
        )?;

        summary.merge(qw.download(extractor, url, &dirname).await?);
    }

    print_results(&summary);

    if !summary.is_success() {
        bail!("{} files failed to download", summary.failed.len());
    }

    Ok(())
}

/// Asks before writing into a path that already has something in it.
fn confirm_output(dirname: &Path) -> Result<bool> {
    if !dirname.exists() || (dirname.is_dir() && dirname.read_dir()?.next().is_none()) {
        return Ok(true);
    }

    let confirmed = Confirm::new()
        .with_prompt(format!(
            "The path {} is not empty or already exists. Do you want to continue?",
            dirname.display().bold().blue().italic()
        ))
        .wait_for_newline(true)
        .interact()?;

    Ok(confirmed)
}

async fn list_contents(registry: &ExtractorRegistry, urls: &[String]) -> Result<()> {
    for url in urls {
        let extractor = registry.resolve(url)?;
        let mut contents = extractor.iter_content(url)?;

        while let Some(content) = contents.try_next().await? {
            println!("{}", serde_json::to_string(&content)?);
        }
    }

    Ok(())
}

fn print_results(summary: &DownloadSummary) {
    println!(
        "{} {} {}",
        summary.downloaded.len().to_string().bold().blue(),
        "files".bold().blue(),
        "downloaded".bold()
    );

    if !summary.skipped.is_empty() {
        println!(
            "{} {}",
            summary.skipped.len().to_string().bold().green(),
            "files were already present and skipped.".bold().green()
        );
    }

    for (id, error) in &summary.failed {
        println!("{} {}", id.bold().red(), error.red());
    }
}

fn print_servers(servers: &HashMap<String, ServerConfig>, registry: &ExtractorRegistry) {
    println!(
        "{}\n----------------",
        "Available Servers:".underline().bold().blue()
    );

    let mut names: Vec<&String> = servers.keys().collect();
    names.sort();

    for name in names {
        let data = &servers[name];
        println!(
            "{:<16} - {}:\n - {} {}\n - {} {}\n",
            format!("[{}]", name),
            data.pretty_name.bold().green(),
            "API URL:".bold().blue(),
            data.api_url.bold().purple().underline(),
            "Image URL:".bold().blue(),
            data.image_url.bold().purple().underline(),
        );
    }

    println!(
        "{}\n----------------",
        "Available Extractors:".underline().bold().blue()
    );

    for extractor in registry.extractors() {
        println!(
            "{} - {}",
            extractor.name().bold().green(),
            extractor.domains().join(", ")
        );
    }
}
