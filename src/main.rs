#[tokio::main]
async fn main() {
    if let Err(err) = customer_registry::axum().await {
        tracing::error!("{}", err);
        std::process::exit(1);
    }
}
