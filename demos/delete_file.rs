//! Delete a stored file by path
//!
//! Run with: TANKOBON_TOKEN=... cargo run --example delete_file -- series/abc/banner.png

use tankobon_client::{Config, UploadClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let endpoint = std::env::var("TANKOBON_UPLOAD_URL")
        .unwrap_or_else(|_| "http://localhost:8787".to_string());
    let token = std::env::var("TANKOBON_TOKEN")?;
    let path = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: delete_file <path>"))?;

    let client = UploadClient::new(Config::new(endpoint).with_token(token))?;
    client.delete_file(&path).await?;
    println!("deleted {}", path);

    Ok(())
}
