//! Static file serving for the web client.
//!
//! `/dist/` is served from the bundle directory and every other path from
//! the public directory, with `/` mapped to `index.html`. A path with no
//! file behind it gets a plain-text `404 Not found`.

use std::path::Path;

use actix_files::Files;
use actix_web::dev::{ServiceRequest, ServiceResponse, fn_service};
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, web};

const INDEX_FILE: &str = "index.html";

/// Mounts the bundle directory under `/dist` and the public directory at
/// `/`. The root mount matches every path, so register it after the API.
pub fn mount(cfg: &mut web::ServiceConfig, public_dir: &Path, dist_dir: &Path) {
    cfg.service(Files::new("/dist", dist_dir).default_handler(fn_service(not_found)))
        .service(
            Files::new("/", public_dir)
                .index_file(INDEX_FILE)
                .default_handler(fn_service(not_found)),
        );
}

async fn not_found(req: ServiceRequest) -> Result<ServiceResponse, actix_web::Error> {
    log::debug!("No asset at {}", req.path());
    let response = HttpResponse::NotFound()
        .content_type(ContentType::plaintext())
        .body("Not found");
    Ok(req.into_response(response))
}
