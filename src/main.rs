use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use tracing::info;
use tracing_actix_web::TracingLogger;

use tourney::config::AppConfig;
use tourney::{configure_routes, connect_and_migrate, init_tracing, load_dotenv};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();
    init_tracing();

    let config = AppConfig::from_env();
    info!("Starting tourney backend server...");

    let db = connect_and_migrate(&config.database_url).await?;

    let bind_addr = (config.host.clone(), config.port);
    let shared_config = web::Data::new(config.clone());
    let frontend_origin = config.cors_allowed_origin.clone();

    info!(host = %bind_addr.0, port = bind_addr.1, "Listening");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&frontend_origin)
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec![http::header::AUTHORIZATION, http::header::ACCEPT])
            .allowed_header(http::header::CONTENT_TYPE)
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(cors)
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(db.clone()))
            .app_data(shared_config.clone())
            .configure(configure_routes)
    })
    .bind(bind_addr)?
    .run()
    .await?;

    Ok(())
}
