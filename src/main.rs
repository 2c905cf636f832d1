use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    apipass::app::run().await
}
