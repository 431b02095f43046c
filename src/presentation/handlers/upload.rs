use axum::body::Bytes;
use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;

/// A file part pulled out of a multipart body.
pub struct Upload {
    pub filename: Option<String>,
    pub data: Bytes,
}

/// Reads parts until one named `field_name` is found. Other parts are
/// skipped.
pub async fn find_file_field(
    multipart: &mut Multipart,
    field_name: &str,
) -> Result<Option<Upload>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(field_name) {
            continue;
        }

        let filename = field.file_name().map(str::to_string);
        let data = field.bytes().await?;

        tracing::debug!(field = field_name, filename = ?filename, bytes = data.len(), "File part received");

        return Ok(Some(Upload { filename, data }));
    }

    Ok(None)
}
