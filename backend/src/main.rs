use tracing::error;

#[tokio::main]
async fn main() {
    if let Err(e) = protip_server::start_server().await {
        error!("Server error: {e}");
        std::process::exit(1);
    }
}
