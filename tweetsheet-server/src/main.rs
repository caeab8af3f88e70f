use actix_web::{middleware, web, App, HttpServer};
use anyhow::Result;
use tweetsheet_common::observability::{init_logging, LogConfig};
use tweetsheet_server::config::ServerConfig;

#[actix_web::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    init_logging(LogConfig {
        app_name: "tweetsheet-server",
        emit_stderr: true,
        ..LogConfig::default()
    })?;

    let config = ServerConfig::from_env()?;
    let bind_addr = config.bind_addr.clone();
    tracing::info!(%bind_addr, model = %config.gemini_model, "tweetsheet server starting");

    let data = web::Data::new(config);
    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .wrap(middleware::Logger::default())
            .configure(tweetsheet_server::configure)
    })
    .bind(&bind_addr)?
    .run()
    .await?;

    Ok(())
}
