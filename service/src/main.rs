use storyflow_common::database::connect;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::domain::workflow::WorkflowEngine;
use crate::infrastructure::AppStateImpl;
use crate::infrastructure::http::{HttpServer, HttpServerConfig};
use crate::infrastructure::notification::LoggingNotifier;
use crate::infrastructure::persistence::PostgresSubmissionRepository;
use crate::infrastructure::settings::Settings;

mod domain;
mod infrastructure;
#[cfg(test)]
mod test_utils;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database = connect(&settings.database).await?;
    tracing::info!("connected to {}", settings.database.db);

    let repository = PostgresSubmissionRepository::new(database);
    let workflow = WorkflowEngine::new(repository, LoggingNotifier, settings.workflow);
    let state = AppStateImpl::new(workflow);

    let server_config = HttpServerConfig {
        port: &settings.server_port,
    };
    let http_server = HttpServer::new(state, server_config).await?;
    http_server.run().await
}
