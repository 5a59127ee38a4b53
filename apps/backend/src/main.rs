#[tokio::main]
async fn main() -> anyhow::Result<()> {
    minddeck_backend::run().await
}
