use apilog_exporter::app;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    app::run().await
}
