//! Interactive mode for the server.
//!
//! Prompts the user for bind address and port before starting the server.

use dialoguer::{Confirm, Input};

use crate::{ServerConfig, ServerError, run_server};

/// Runs the server in interactive mode, prompting for configuration.
///
/// Starts from [`ServerConfig::from_env`] and lets the user override the
/// bind address and port before delegating to [`run_server`].
///
/// # Errors
///
/// Returns [`ServerError`] if the underlying server fails to start.
#[allow(clippy::future_not_send)]
pub async fn run() -> Result<(), ServerError> {
    println!("Stray Map Server");
    println!();

    let mut config = ServerConfig::from_env();

    config.bind_addr = Input::new()
        .with_prompt("Bind address")
        .default(config.bind_addr.clone())
        .interact_text()
        .unwrap_or(config.bind_addr);

    config.port = Input::new()
        .with_prompt("Port")
        .default(config.port)
        .interact_text()
        .unwrap_or(config.port);

    if !Confirm::new()
        .with_prompt(format!(
            "Start server on {}:{} (public: {}, dist: {})?",
            config.bind_addr,
            config.port,
            config.public_dir.display(),
            config.dist_dir.display()
        ))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        println!("Cancelled.");
        return Ok(());
    }

    run_server(config).await
}
