//! Storage key layout
//!
//! Every series owns `series/{id}/`; chapter pages live under
//! `series/{id}/chapters/{chapter}/`.

/// Extension of a file name (the text after the last `.`)
///
/// A name without a dot is returned whole.
fn extension(file_name: &str) -> &str {
    file_name.rsplit('.').next().unwrap_or(file_name)
}

/// Unique key `<folder>[/<prefix>]/<unix-millis>.<ext>`
pub fn generate_file_path(folder: &str, file_name: &str, prefix: Option<&str>) -> String {
    generate_file_path_at(
        folder,
        file_name,
        prefix,
        chrono::Utc::now().timestamp_millis(),
    )
}

/// [`generate_file_path`] with an explicit timestamp
pub fn generate_file_path_at(
    folder: &str,
    file_name: &str,
    prefix: Option<&str>,
    timestamp_millis: i64,
) -> String {
    let base = match prefix {
        Some(prefix) if !prefix.is_empty() => format!("{}/{}", folder, prefix),
        _ => folder.to_string(),
    };
    format!("{}/{}.{}", base, timestamp_millis, extension(file_name))
}

/// `series/{id}/chapters/{chapter}/{page}.{ext}`
pub fn chapter_page_path(series_id: &str, chapter_number: u32, page_number: u32, ext: &str) -> String {
    format!(
        "series/{}/chapters/{}/{}.{}",
        series_id, chapter_number, page_number, ext
    )
}

pub fn cover_path(series_id: &str, ext: &str) -> String {
    format!("series/{}/cover.{}", series_id, ext)
}

pub fn banner_path(series_id: &str, ext: &str) -> String {
    format!("series/{}/banner.{}", series_id, ext)
}

/// `series/{id}/chapters/{chapter}/chapter.pdf`
pub fn chapter_pdf_path(series_id: &str, chapter_number: u32) -> String {
    format!("series/{}/chapters/{}/chapter.pdf", series_id, chapter_number)
}
