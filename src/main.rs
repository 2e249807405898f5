use clap::Parser;
use colored::Colorize;

use snaplink::cli::{Cli, Commands};
use snaplink::config::{StaticConfig, init_config};
use snaplink::errors::SnaplinkError;
use snaplink::runtime::modes::{run_server, run_sweep};
use snaplink::system::init_logging;

const SAMPLE_CONFIG_PATH: &str = "config.example.toml";

#[actix_web::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = run(&cli).await {
        match e.downcast_ref::<SnaplinkError>() {
            Some(err) => eprintln!("{}", err.format_colored()),
            None => eprintln!("{} {:#}", "[ERROR]".red().bold(), e),
        }
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    // 生成配置不需要日志和存储
    if let Commands::GenerateConfig { path } = cli.command() {
        let path = path.as_deref().unwrap_or(SAMPLE_CONFIG_PATH);
        StaticConfig::default()
            .save_to_file(path)
            .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", path, e))?;
        println!("{} {}", "Sample configuration written to".green(), path);
        return Ok(());
    }

    let config = init_config(cli.config.as_deref());
    let _log_guard = init_logging(&config.logging)?;

    match cli.command() {
        Commands::Serve => run_server(config).await,
        Commands::Sweep => run_sweep(config).await.map(|_| ()),
        Commands::GenerateConfig { .. } => Ok(()),
    }
}
