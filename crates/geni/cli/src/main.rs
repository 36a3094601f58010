#[tokio::main]
async fn main() -> anyhow::Result<()> {
    geni_cli::run().await
}
