use apilog_ingest::IngestError;

#[tokio::main]
async fn main() -> Result<(), IngestError> {
    apilog_ingest::app::run().await
}
