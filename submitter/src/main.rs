mod config;
mod errors;
mod models;
mod submission;

use crate::config::SubmitConfig;
use crate::errors::SubmitError;
use rand::rngs::OsRng;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), SubmitError> {
    // Logs go to stderr so stdout carries only the JSON bundle.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let mut rng = OsRng;

    match std::env::args().nth(1).as_deref() {
        Some("keygen") => {
            let pair = submission::keygen(&mut rng)?;
            println!("{}", serde_json::to_string_pretty(&pair)?);
        }
        None | Some("submit") => {
            let config = SubmitConfig::from_env()?;
            let bundle = submission::run(&mut rng, &config)?;
            submission::write_bundle(&bundle, config.output_path.as_deref())?;
        }
        Some(other) => {
            return Err(SubmitError::Config(format!(
                "unknown command {other:?}, expected `submit` or `keygen`"
            )));
        }
    }

    Ok(())
}
