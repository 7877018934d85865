//! Upload the pages of one chapter through the upload gateway
//!
//! Run with:
//! TANKOBON_UPLOAD_URL=... TANKOBON_TOKEN=... cargo run --example upload_chapter -- <series-id> <chapter> <page files...>

use tankobon_client::{paths, Config, UploadClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let endpoint = std::env::var("TANKOBON_UPLOAD_URL")
        .unwrap_or_else(|_| "http://localhost:8787".to_string());
    let token = std::env::var("TANKOBON_TOKEN")?;

    let mut args = std::env::args().skip(1);
    let series_id = args.next().ok_or_else(|| anyhow::anyhow!("missing series id"))?;
    let chapter: u32 = args
        .next()
        .ok_or_else(|| anyhow::anyhow!("missing chapter number"))?
        .parse()?;
    let pages: Vec<String> = args.collect();

    let client = UploadClient::new(Config::new(endpoint).with_token(token))?;

    for (index, file) in pages.iter().enumerate() {
        let data = tokio::fs::read(file).await?;
        let ext = file.rsplit('.').next().unwrap_or("jpg");
        let content_type = match ext {
            "png" => "image/png",
            "webp" => "image/webp",
            "gif" => "image/gif",
            _ => "image/jpeg",
        };
        let path = paths::chapter_page_path(&series_id, chapter, index as u32 + 1, ext);

        let uploaded = client
            .upload_file(bytes::Bytes::from(data), file, content_type, &path)
            .await?;
        println!("page {} -> {}", index + 1, uploaded.url);
        if let Some(region) = uploaded.detected_region {
            println!("  stored via region {}", region);
        }
    }

    Ok(())
}
