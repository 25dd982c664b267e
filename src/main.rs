use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    currency_cli::app::run().await?;
    Ok(())
}
