//! hostalert - threshold alerting for monitored hosts
//!
//! A command-line tool that evaluates host snapshots against alert rules and
//! delivers notifications through push services and mail.

use clap::Parser;
use hostalert::cli::args::{generate_completions, Cli, Commands};
use hostalert::commands::{run_channels, run_evaluate, run_rules, run_test_send};
use hostalert::config::{Config, ConfigBuilder};
use hostalert::error::{AppError, ConfigError};

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Set log level based on verbose flag
    if cli.verbose {
        log::set_max_level(log::LevelFilter::Debug);
    }

    // Run the appropriate command
    let result = run(&cli);

    if let Err(e) = result {
        log::error!("{}", e);
        print_error(&e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), AppError> {
    if let Commands::Completions { shell } = &cli.command {
        generate_completions(*shell);
        return Ok(());
    }

    let config = load_config(cli)?;

    match &cli.command {
        Commands::Evaluate(args) => run_evaluate(args, &config, cli.format),

        Commands::TestSend { url } => run_test_send(url, &config, cli.format),

        Commands::Channels => run_channels(&config, cli.format),

        Commands::Rules { rules } => run_rules(rules.as_deref(), &config, cli.format),

        Commands::Completions { .. } => Ok(()),
    }
}

fn load_config(cli: &Cli) -> Result<Config, AppError> {
    let config = ConfigBuilder::new()
        .with_file(cli.config.as_deref())?
        .with_notify_urls(cli.notify_urls.clone())
        .with_app_url(cli.app_url.clone())
        .with_timeout(cli.timeout)
        .with_dry_run(cli.dry_run.then_some(true))
        .build()?;

    Ok(config)
}

fn print_error(err: &AppError) {
    eprintln!("Error: {}", err);

    // Print helpful hints for common errors
    match err {
        AppError::Config(ConfigError::FileNotFound(_)) => {
            eprintln!();
            eprintln!("Hint: Pass --config or --rules, or create the file at its default path.");
            eprintln!("      Run 'hostalert rules' to see which rule file is used.");
        }
        AppError::Config(ConfigError::InvalidDestination { .. }) => {
            eprintln!();
            eprintln!("Hint: Destinations look like ntfy://ntfy.sh/topic");
            eprintln!("      or mailto:ops@example.com.");
        }
        AppError::DeliveryFailed { .. } => {
            eprintln!();
            eprintln!("Hint: Check each channel with 'hostalert test-send URL'.");
        }
        _ => {}
    }
}
