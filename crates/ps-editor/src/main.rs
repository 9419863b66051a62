//! polysphere: settle the camera on a map and print a JSON snapshot

use std::process::ExitCode;

use clap::Parser;

use ps_editor::cli::{self, Options};

fn main() -> ExitCode {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ps_editor=info,ps_camera=info,ps_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let options = Options::parse();
    let result = cli::run(&options).and_then(|snapshot| snapshot.to_json());

    match result {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
