use andon_infra::StackProps;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "andon_infra=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let props = match StackProps::from_env() {
        Ok(props) => props,
        Err(e) => {
            tracing::error!(error = %e, "Stack parameters incomplete");
            return Err(e.into());
        }
    };

    tracing::info!(
        stack = props.stack_name,
        version = %props.solution_version,
        "Stack properties resolved"
    );
    println!("{}", serde_json::to_string_pretty(&props)?);
    Ok(())
}
