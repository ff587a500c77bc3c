use actix_web::middleware::{Condition, Logger};
use actix_web::{App, HttpServer};
use dotenv::dotenv;
use log::{info, warn};

use rust_mps::config::Settings;
use rust_mps::routes;

// ---------- Server bootstrap ----------
fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::from_env();

    let sentry_guard = settings.sentry_dsn.as_deref().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });
    let sentry_enabled = sentry_guard.is_some();

    if settings.protect && settings.api_key.is_none() {
        warn!("PROTECT is enabled but API_KEY is not set; every conversion request will be rejected");
    }

    let port = settings.port;
    info!("Starting server on http://127.0.0.1:{}", port);

    actix_web::rt::System::new().block_on(async move {
        HttpServer::new(move || {
            App::new()
                .wrap(Condition::new(sentry_enabled, sentry_actix::Sentry::new()))
                .wrap(Logger::default())
                .configure(routes::configure(settings.clone()))
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    })
}
