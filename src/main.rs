//! voice-consult CLI entry point

use std::process::ExitCode;

use clap::Parser;

use voice_consult::cli::{
    app::{cli_config, load_merged_config, run_consultation, validate_config},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    presenter::Presenter,
    ConsultOptions, EXIT_ERROR, EXIT_USAGE_ERROR,
};
use voice_consult::infrastructure::{init_tracing, XdgConfigStore};

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let presenter = Presenter::new();

    if let Some(Commands::Config { action }) = cli.command {
        let store = XdgConfigStore::new();
        if let Err(e) = handle_config_command(action, &store, &presenter).await {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
        return ExitCode::SUCCESS;
    }

    // clap enforces --audio whenever no subcommand is given
    let Some(audio) = cli.audio.clone() else {
        presenter.error("Missing --audio <PATH>");
        return ExitCode::from(EXIT_USAGE_ERROR);
    };

    let config = load_merged_config(cli_config(&cli)).await;
    if let Err(e) = validate_config(&config) {
        presenter.error(&e.to_string());
        return ExitCode::from(EXIT_USAGE_ERROR);
    }

    let options = ConsultOptions {
        audio,
        image: cli.image.clone(),
        json: cli.json,
    };

    run_consultation(options, &config).await
}
