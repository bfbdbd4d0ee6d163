use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use quizforge::{
    app_state::AppState, config::Config, graphql::create_schema, handlers,
    middleware::RequestIdMiddleware,
};

const LOG_FORMAT: &str = "%a \"%r\" %s %b %Dms rid=%{x-request-id}o";

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();
    if let Err(e) = config.validate_for_production() {
        log::error!("Invalid configuration: {}", e);
        return Err(std::io::Error::other(e.to_string()));
    }

    let host = config.web_server_host.clone();
    let port = config.web_server_port;

    let state = AppState::new(config).await.map_err(|e| {
        log::error!("Failed to initialise application state: {}", e);
        std::io::Error::other(e.to_string())
    })?;
    let schema = create_schema(state.clone());

    log::info!("Starting HTTP server on {}:{}", host, port);
    log::info!("GraphiQL playground: http://{}:{}/graphiql", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(schema.clone()))
            .wrap(RequestIdMiddleware)
            .wrap(Logger::new(LOG_FORMAT))
            .wrap(Cors::permissive())
            .configure(handlers::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
