use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    waypoint_cli::cli::app::run().await
}
