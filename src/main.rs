use clap::Parser;
use tracing_subscriber::EnvFilter;

mod ai;
mod cli;
mod config;
mod console;
mod error;
mod git;
mod processing;
mod template;
mod tools;

#[cfg(test)]
mod testing;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli::default_log_directive(cli.verbose)));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = cli::run(cli).await {
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }
}
