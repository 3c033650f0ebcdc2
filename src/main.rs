use anyhow::Result;
use ask_cli::api_client::AnswerClient;
use ask_cli::config::config::{Config, ENDPOINT_ENV_VAR};
use ask_cli::utils::app_paths::AppPaths;
use ask_cli::utils::logging;
use crossterm::style::Stylize;

fn print_help() {
    println!("{}", "ask-cli - Web Intelligence Agent client".blue().bold());
    println!();
    println!("{}", "Usage:".yellow());
    println!("  ask-cli [OPTIONS]");
    println!();
    println!("{}", "Options:".yellow());
    println!("  {} - Answer service endpoint", "--url <URL>".green());
    println!(
        "  {} - Write a config file with defaults",
        "--generate-config".green()
    );
    println!("  {}           - Show this help", "--help".green());
    println!();
    println!("{}", "Environment:".yellow());
    println!(
        "  {} - Endpoint override (below --url)",
        ENDPOINT_ENV_VAR.green()
    );
    println!("  {}    - Log filter, e.g. debug", "RUST_LOG".green());
    println!();
    println!("{}", "Keys:".yellow());
    println!("  {}     - Submit the question", "Enter".green());
    println!("  {} - Scroll the summary", "Up/Down/PgUp/PgDn".green());
    println!("  {} - Summary top/bottom", "Ctrl+Home/Ctrl+End".green());
    println!("  {}        - Toggle the log view", "F5".green());
    println!("  {}  - Exit", "Esc/Ctrl+C".green());
    println!();
}

fn generate_config() -> Result<()> {
    let path = AppPaths::config_file()?;
    Config::write_default(&path)?;
    println!("Configuration file created at: {}", path.display());
    println!("Edit this file to point ask-cli at your answer service.");
    Ok(())
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        print_help();
        return Ok(());
    }

    if args.iter().any(|arg| arg == "--generate-config") {
        return generate_config();
    }

    let log = logging::init_logging(AppPaths::log_dir().ok().as_deref())?;
    if let Some(path) = log.log_path() {
        eprintln!("📝 Logs will be written to: {}", path.display());
    }

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config, using defaults: {}", e);
            tracing::warn!(target: "config", "Falling back to defaults: {}", e);
            Config::default()
        }
    };

    let url_flag = args
        .iter()
        .position(|arg| arg == "--url")
        .and_then(|pos| args.get(pos + 1))
        .map(String::as_str);
    let endpoint = config.resolve_endpoint(url_flag, std::env::var(ENDPOINT_ENV_VAR).ok());

    let client = AnswerClient::new(&endpoint, config.api.request_timeout())?;

    // Requests run on the runtime while the UI loop stays on this thread
    let runtime = tokio::runtime::Runtime::new()?;
    let _guard = runtime.enter();

    ask_cli::ui::run_ask_tui(client, &config, Some(log.buffer()))
}
