use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use titlecraft::{
    config::Config,
    service::{DEFAULT_TITLES, TitleService},
    telemetry,
};

/// Suggest SEO-friendly blog titles for a web page.
#[derive(Parser)]
#[command(name = "titlecraft", version)]
struct Cli {
    /// Page to read, e.g. https://example.com/blog/post
    url: String,

    /// Number of titles to ask for
    #[arg(short = 'n', long, default_value_t = DEFAULT_TITLES)]
    count: usize,

    /// Print the titles as a JSON array instead of a numbered list
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // A missing .env file is fine; real environment variables still apply
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = Config::from_env()?;
    telemetry::init_tracing(config.log_format(), "warn");

    let service = TitleService::from_config(&config)?;

    match service.generate_titles_from_url(&cli.url, cli.count).await {
        Ok(titles) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&titles)?);
            } else {
                for (i, title) in titles.iter().enumerate() {
                    println!("{}. {}", i + 1, title);
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("error [{}]: {}", err.kind(), err);
            Ok(ExitCode::FAILURE)
        }
    }
}
