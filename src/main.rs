//! macapp - build, bundle, and package a Swift macOS app.
//!
//! Maps the outcome of the requested command to the process exit code.

use env_logger::Env;
use std::process;

#[tokio::main]
async fn main() {
    // RUST_LOG overrides; step-level detail is opt-in.
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let exit_code = match macapp_packager::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}
