use lambda_http::{run, service_fn, Error};
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use sitelog::handlers::{self, app_state};
use sitelog::Config;

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env automatically only in debug builds to reduce manual setup
    if cfg!(debug_assertions) {
        let _ = dotenv::dotenv();
    }
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    let config = Config::from_env()?;
    info!("create-post handler starting (table: {})", config.table_name);
    let state = app_state(config).await;

    run(service_fn(|event| handlers::create::handle(&state, event))).await
}
