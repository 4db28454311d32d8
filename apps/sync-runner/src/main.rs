//! Goodlink sync runner entry point.

#[tokio::main]
async fn main() {
    if let Err(e) = goodlink_runner_lib::run().await {
        eprintln!("goodlink-sync-runner: {}", e);
        std::process::exit(1);
    }
}
