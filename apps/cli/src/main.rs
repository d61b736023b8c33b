use contract_resolver::{ContractResolver, ResolverConfig};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing() {
    let log_format = std::env::var("RESOLVER_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so stdout stays valid JSON.
    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let config = ResolverConfig::from_env();

    let names: Vec<String> = std::env::args().skip(1).collect();
    if names.is_empty() {
        tracing::warn!("No names given, nothing to resolve");
    }

    let resolver = ContractResolver::new(config)?;
    let outcome = resolver.resolve_contracts_batch(&names).await;

    println!("{}", serde_json::to_string_pretty(&outcome)?);

    let metrics = resolver.metrics();
    tracing::info!(
        "Requests: {}, cache hit rate: {:.2}, errors: {}",
        metrics.requests,
        metrics.cache_hit_rate,
        metrics.errors
    );
    Ok(())
}
