#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Stray map server binary.
//!
//! ```text
//! stray_map_server                # configured from the environment
//! stray_map_server --interactive  # prompts for bind address and port
//! ```

use stray_map_server::{ServerConfig, ServerError, interactive, run_server};

#[actix_web::main]
async fn main() -> Result<(), ServerError> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    if std::env::args().skip(1).any(|a| a == "--interactive" || a == "-i") {
        return interactive::run().await;
    }

    run_server(ServerConfig::from_env()).await
}
