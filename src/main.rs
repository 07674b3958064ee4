use clap::Parser;
use jot::cli::commands::Cli;
use jot::cli::handlers;
use jot::io::{config_io, logging};

fn main() {
    let cli = Cli::parse();
    let data_dir = config_io::resolve_data_dir(cli.data_dir.as_deref());

    if let Err(e) = logging::init_logging(&data_dir, cli.verbose) {
        eprintln!("warning: logging disabled: {}", e);
    }

    let config = match config_io::read_config(&data_dir) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = handlers::dispatch(cli, &data_dir, &config) {
        tracing::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
