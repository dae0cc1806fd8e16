use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    urbix_backend::run().await
}
