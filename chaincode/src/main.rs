#![cfg_attr(not(test), deny(clippy::unwrap_used))]
use std::io::Write;
use std::process::ExitCode;

use chaincode::config::HostConfig;
use chaincode::{FileState, SmartContract};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "usage: chaincode <function> [args...]\n       chaincode init";

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chaincode=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration from environment variables
    let config = match HostConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        eprintln!("{USAGE}");
        return ExitCode::from(2);
    }

    tracing::debug!(
        "Loaded configuration: state_file={}, strict_decoding={}, reindex_on_update={}",
        config.state_file.display(),
        config.contract.strict_decoding,
        config.contract.reindex_on_update
    );

    let mut state = match FileState::open(&config.state_file) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(
                "Failed to open state log {}: {e}",
                config.state_file.display()
            );
            return ExitCode::FAILURE;
        }
    };

    let contract = SmartContract::new(config.contract);
    let response = if args.len() == 1 && args[0] == "init" {
        contract.init(&mut state)
    } else {
        contract.invoke_args(&mut state, args)
    };

    if !response.is_ok() {
        eprintln!("Error: {}", response.message);
        return ExitCode::FAILURE;
    }

    let mut stdout = std::io::stdout().lock();
    if !response.payload.is_empty() {
        let written = stdout
            .write_all(&response.payload)
            .and_then(|()| stdout.write_all(b"\n"))
            .and_then(|()| stdout.flush());
        if let Err(e) = written {
            tracing::error!("Failed to write payload: {e}");
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}
