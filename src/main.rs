//! Voice recorder CLI entry point

use std::process::ExitCode;

use clap::Parser;

use voice_recorder::cli::{
    app::{load_merged_config, run_session, SessionOptions, EXIT_ERROR, EXIT_USAGE_ERROR},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    logging,
    presenter::Presenter,
};
use voice_recorder::domain::config::AppConfig;
use voice_recorder::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let presenter = Presenter::new();

    if let Some(Commands::Config { action }) = cli.command {
        let store = XdgConfigStore::new();
        if let Err(e) = handle_config_command(action, &store, &presenter).await {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
        return ExitCode::SUCCESS;
    }

    // Build CLI config from args
    let cli_config = AppConfig {
        backend: cli.backend.map(|b| b.as_str().to_string()),
        recordings_dir: cli.recordings_dir.clone(),
        max_duration: cli.max_duration.clone(),
        audio_cues: if cli.no_cues { Some(false) } else { None },
        ..AppConfig::empty()
    };

    let config = load_merged_config(cli_config).await;

    let options = match SessionOptions::from_config(&config) {
        Ok(options) => options,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    run_session(options).await
}
