use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use mlnano_console::MlnanoCli;

#[tokio::main]
async fn main() {
    init_log();
    let cli = MlnanoCli::parse();
    mlnano_console::run(cli).await
}

fn init_log() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .with_env_var("MLNANO_LOG")
                .from_env_lossy(),
        )
        .init();
}
