use crossterm::style::Stylize;
use phone_tracker::app::AppContext;
use phone_tracker::config::Config;
use phone_tracker::ui::TrackerTui;
use std::process;

fn print_help() {
    println!("{}", "Phone Tracker - look up where a number is from".blue().bold());
    println!();
    println!("{}", "Usage:".yellow());
    println!("  phone-tracker [OPTIONS]");
    println!();
    println!("{}", "Options:".yellow());
    println!(
        "  {}      - Country selected at startup (ISO code, e.g. ID)",
        "--region XX".green()
    );
    println!(
        "  {} - Generate config file with defaults",
        "--generate-config".green()
    );
    println!("  {}             - Show this help", "--help".green());
    println!();
    println!("{}", "Keys:".yellow());
    println!("  {}  - Track the number", "Enter".green());
    println!("  {}     - Choose the country", "F2".green());
    println!("  {}    - Switch Basic/Advanced info", "Tab".green());
    println!("  {} - View on map", "Ctrl+O".green());
    println!("  {} - Copy the E.164 number", "Ctrl+Y".green());
    println!("  {}     - Help inside the application", "F1".green());
    println!("  {} - Quit", "Ctrl+Q".green());
    println!();
}

fn generate_config() {
    match Config::get_config_path() {
        Ok(path) => {
            if let Some(parent) = path.parent() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    eprintln!("Error creating config directory: {}", e);
                    process::exit(1);
                }
            }
            if let Err(e) = std::fs::write(&path, Config::create_default_with_comments()) {
                eprintln!("Error writing config file: {}", e);
                process::exit(1);
            }
            println!("Configuration file created at: {:?}", path);
        }
        Err(e) => {
            eprintln!("Error determining config path: {}", e);
            process::exit(1);
        }
    }
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return;
    }

    if args.contains(&"--generate-config".to_string()) {
        generate_config();
        return;
    }

    let log_buffer = phone_tracker::utils::logging::init_tracing_with_dual_logging();

    let mut config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config, using defaults: {}", e);
            tracing::warn!(target: "phone_tracker", "Config load failed: {:#}", e);
            Config::default()
        }
    };

    if let Some(region) = args
        .iter()
        .position(|arg| arg == "--region")
        .and_then(|pos| args.get(pos + 1))
    {
        config.lookup.default_region = region.trim().to_uppercase();
    }

    let context = match AppContext::new(config) {
        Ok(context) => context,
        Err(e) => {
            eprintln!("Failed to start: {:#}", e);
            process::exit(1);
        }
    };

    let result = TrackerTui::from_context(&context, Some(log_buffer)).run();
    drop(context);

    if let Some(dual_logger) = phone_tracker::utils::dual_logging::get_dual_logger() {
        eprintln!("Log written to {}", dual_logger.log_path().display());
    }

    if let Err(e) = result {
        eprintln!("TUI Error: {:#}", e);
        process::exit(1);
    }
}
