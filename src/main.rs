mod browser;
mod config;
mod error;
mod layers;
mod shell;

use crate::browser::Browser;
use crate::config::{Cli, Command, Settings};
use crate::layers::fetch::ResourceClient;
use crate::layers::render::{render_details, render_html, statistics_text};
use crate::layers::upload::UploadForm;
use anyhow::{anyhow, Result};
use clap::Parser;
use dotenvy::dotenv;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 0. Load Configuration
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("resource_hub=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::resolve(&cli)?;
    tracing::info!("API endpoint: {}", settings.endpoint);

    let client = ResourceClient::new(settings.endpoint.clone());
    let mut browser = Browser::new(client, settings.refresh_delay);

    match cli.command {
        Command::List { filter, html } => {
            if let Err(e) = browser.load().await {
                eprintln!("❌ Failed to load resources. Error: {}", e);
            }
            browser.set_criteria(filter.into());
            let view = browser.view();
            print!("{}", view.to_text());

            if let Some(path) = html {
                let page = render_html(&view, &browser.statistics(), browser.filtered());
                tokio::fs::write(&path, page).await?;
                println!("Wrote {}", path.display());
            }
        }
        Command::Stats => {
            browser.load().await?;
            println!("{}", statistics_text(&browser.statistics()));
        }
        Command::Subjects => {
            browser.load().await?;
            for subject in browser.subject_options() {
                println!("{}", subject);
            }
        }
        Command::Details { id, remote: true } => {
            let resource = browser
                .client()
                .get(id)
                .await?
                .ok_or_else(|| anyhow!("No resource with id {}", id))?;
            print!("{}", render_details(&resource));
        }
        Command::Details { id, remote: false } => {
            browser.load().await?;
            let resource = browser
                .details(id)
                .ok_or_else(|| anyhow!("No resource with id {}", id))?;
            print!("{}", render_details(resource));
        }
        Command::Download { id } => {
            browser.load().await?;
            let title = browser
                .details(id)
                .map(|r| r.title.clone())
                .ok_or_else(|| anyhow!("No resource with id {}", id))?;
            println!("✅ Downloading \"{}\"...", title);
            let outcome = browser.download(id, &settings.download_dir).await?;
            println!("✅ Saved to {}", outcome.saved.display());
            if let Err(e) = outcome.refresh {
                eprintln!("❌ Failed to load resources. Error: {}", e);
            }
        }
        Command::Upload(args) => {
            let form = UploadForm {
                file: args.file,
                title: args.title,
                subject: args.subject,
                semester: args.semester,
                kind: args.kind,
                uploader_name: args.uploader,
            };
            let resource = browser.client().upload(&form).await?;
            println!("✅ Uploaded \"{}\" (id {})", resource.title, resource.id);
        }
        Command::Browse => {
            shell::run(&mut browser, &settings.download_dir).await?;
        }
        Command::Ping => {
            println!("{}", browser.client().ping().await?);
        }
    }

    Ok(())
}
