use habit_api::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;

    init_tracing(&config)?;

    let state = AppState::new(config.clone())?;
    let app = habit_api::server::app(state);

    let result = Server::new(config).serve(app).await;

    shutdown_tracing();

    result
}
