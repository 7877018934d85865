//! # Tankobon Client
//!
//! Client SDK for the Tankobon upload gateway, used by admin tooling to push
//! covers, banners and chapter pages to storage.
//!
//! ## Example
//!
//! ```rust,ignore
//! use tankobon_client::{paths, Config, UploadClient};
//!
//! let client = UploadClient::new(
//!     Config::new("https://project.functions.example.com/upload").with_token(token),
//! )?;
//! let path = paths::chapter_page_path("one-piece", 1100, 1, "webp");
//! let uploaded = client.upload_file(data, "001.webp", "image/webp", &path).await?;
//! println!("{}", uploaded.url);
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod paths;
pub mod types;

pub use client::UploadClient;
pub use config::Config;
pub use error::{ClientError, Result};
pub use types::UploadedFile;
