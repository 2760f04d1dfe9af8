use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    pitchdeck_cli::run_cli().await
}
