use std::process;
use log::{error, LevelFilter};

use featurekit::cli::build_cli;
use featurekit::commands::{CommandFactory, FeaturekitCommandFactory};
use featurekit::config::Settings;
use featurekit::utils::logger::Logger;

fn main() {
    let matches = build_cli().get_matches();

    let level = if matches.get_flag("verbose") { LevelFilter::Debug } else { LevelFilter::Info };

    // The log file may come from the flag or from the settings file
    let log_file = match matches.get_one::<String>("log-file") {
        Some(path) => Some(path.clone()),
        None => Settings::load_or_default(matches.get_one::<String>("config").map(String::as_str))
            .ok()
            .and_then(|settings| settings.log_file),
    };

    let logger = match &log_file {
        Some(path) => match Logger::new(path) {
            Ok(l) => {
                let l = l.with_level(level);
                l.init_global_logger();
                l
            }
            Err(e) => {
                eprintln!("Error initializing logger: {}", e);
                process::exit(1);
            }
        },
        None => {
            env_logger::Builder::new()
                .filter_level(level)
                .parse_default_env()
                .init();
            Logger::console()
        }
    };

    let factory = FeaturekitCommandFactory::new();

    let command_result = factory.create_command(&matches, &logger);
    match command_result {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        }
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
}
