//! HTTP surface of the tweetsheet service.
//!
//! Two routes: `GET /` describes the API, `POST /post_tweet` runs the whole
//! fetch–generate–publish loop before responding. The post endpoint accepts
//! requests from any origin.

pub mod config;
pub mod error;
pub mod handlers;

use actix_cors::Cors;
use actix_web::{web, HttpResponse};

/// Route table shared by the binary and the endpoint tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(web::resource("/").route(web::get().to(handlers::index)))
        .service(
            web::scope("/post_tweet")
                .wrap(Cors::permissive())
                .route("", web::post().to(handlers::post_tweets)),
        );
}

/// Malformed or incomplete JSON bodies answer in the same `{"error": ...}`
/// shape as every other failure.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        actix_web::error::InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(serde_json::json!({ "error": message })),
        )
        .into()
    })
}
