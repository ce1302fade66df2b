use nwdi_sonar::cli::commands::{CliArgs, Commands};
use nwdi_sonar::cli::handlers::{handle_installations, handle_render, handle_run};
use nwdi_sonar::config::SonarConfig;
use nwdi_sonar::util::logging::{init_logging, parse_level, LoggingConfig};
use nwdi_sonar::VERSION;

use clap::Parser;
use std::env;
use tracing::{debug, Level};

fn main() {
    let args = CliArgs::parse();

    let config = match SonarConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    init_logging_from_args(&args, &config);

    debug!("nwdi-sonar v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Run(run_args) => handle_run(run_args, config, args.quiet),
        Commands::Render(render_args) => handle_render(render_args, config),
        Commands::Installations(installations_args) => {
            handle_installations(installations_args, config)
        }
    };

    std::process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs, config: &SonarConfig) {
    let level = if let Some(level_str) = &args.log_level {
        parse_level(level_str)
    } else if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        parse_level(&config.log_level)
    };

    let use_json = env::var("NWDI_SONAR_LOG_JSON")
        .ok()
        .and_then(|v| v.parse::<bool>().ok())
        .unwrap_or(false);

    init_logging(LoggingConfig {
        level,
        use_json,
        ..Default::default()
    });
}
