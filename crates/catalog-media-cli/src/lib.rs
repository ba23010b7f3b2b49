use std::path::Path;

use anyhow::Context;
use catalog_media_core::{
    BatchUploadResponse, ErrorResponse, RawFile, UploadResponse, UrlResolver,
};
use catalog_media_processing::UploadPipeline;

/// Declared MIME type for a local file, from its extension.
pub fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Read a local file as if it had been uploaded.
pub async fn read_raw_file(path: &Path) -> anyhow::Result<RawFile> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload")
        .to_string();

    Ok(RawFile::new(filename, content_type_for(path), data))
}

/// JSON body plus whether the upload counts as successful.
#[derive(Debug)]
pub struct UploadReport {
    pub body: serde_json::Value,
    pub success: bool,
}

/// One file uses single-upload semantics, several use batch semantics.
pub async fn upload_files(
    pipeline: &UploadPipeline,
    resolver: &UrlResolver,
    mut files: Vec<RawFile>,
) -> anyhow::Result<UploadReport> {
    if files.len() <= 1 {
        return match pipeline.process_single(files.pop()).await {
            Ok(image) => Ok(UploadReport {
                body: serde_json::to_value(UploadResponse::from_processed(&image, resolver))?,
                success: true,
            }),
            Err(error) => Ok(UploadReport {
                body: serde_json::to_value(ErrorResponse::from(&error))?,
                success: false,
            }),
        };
    }

    let result = match pipeline.process_batch(files).await {
        Ok(result) => result,
        Err(error) => {
            return Ok(UploadReport {
                body: serde_json::to_value(ErrorResponse::from(&error))?,
                success: false,
            })
        }
    };
    let response = BatchUploadResponse::from_result(&result, resolver);
    Ok(UploadReport {
        success: response.success,
        body: serde_json::to_value(response)?,
    })
}

/// Initialize tracing for the CLI.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("catalog_media=info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_media_core::{MediaConfig, StorageConfig};
    use catalog_media_storage::{LocalStorage, Storage};
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn write_png(dir: &Path, name: &str) -> std::path::PathBuf {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 64, Rgb([200, 10, 10])));
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .unwrap();
        let path = dir.join(name);
        std::fs::write(&path, buffer).unwrap();
        path
    }

    async fn pipeline(root: &Path) -> UploadPipeline {
        let config = MediaConfig {
            storage: StorageConfig::new(root, "http://localhost:3000"),
            ..MediaConfig::default()
        };
        let storage = LocalStorage::new(&config.storage);
        storage.init().await.unwrap();
        UploadPipeline::new(&config, Arc::new(storage))
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for(Path::new("a/b/shoe.JPG")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("hat.webp")), "image/webp");
        assert_eq!(
            content_type_for(Path::new("manual.pdf")),
            "application/octet-stream"
        );
        assert_eq!(content_type_for(Path::new("README")), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_read_raw_file() {
        let dir = TempDir::new().unwrap();
        let path = write_png(dir.path(), "logo.png");

        let file = read_raw_file(&path).await.unwrap();
        assert_eq!(file.filename, "logo.png");
        assert_eq!(file.content_type, "image/png");
        assert!(file.size() > 0);

        assert!(read_raw_file(&dir.path().join("missing.png")).await.is_err());
    }

    #[tokio::test]
    async fn test_upload_single_file() {
        let dir = TempDir::new().unwrap();
        let pipeline = pipeline(&dir.path().join("uploads")).await;
        let file = read_raw_file(&write_png(dir.path(), "logo.png")).await.unwrap();

        let report = upload_files(&pipeline, &UrlResolver::default(), vec![file])
            .await
            .unwrap();

        assert!(report.success);
        assert_eq!(report.body["width"], 64);
        assert!(report.body["thumbnailUrl"]
            .as_str()
            .unwrap()
            .starts_with("http://localhost:3000/uploads/thumbnails/thumb-"));
    }

    #[tokio::test]
    async fn test_upload_single_failure_reports_error_body() {
        let dir = TempDir::new().unwrap();
        let pipeline = pipeline(&dir.path().join("uploads")).await;

        let report = upload_files(&pipeline, &UrlResolver::default(), Vec::new())
            .await
            .unwrap();

        assert!(!report.success);
        assert_eq!(report.body["code"], "NO_FILE_PROVIDED");
    }

    #[tokio::test]
    async fn test_upload_batch() {
        let dir = TempDir::new().unwrap();
        let pipeline = pipeline(&dir.path().join("uploads")).await;
        let files = vec![
            read_raw_file(&write_png(dir.path(), "a.png")).await.unwrap(),
            RawFile::new("notes.txt", "text/plain", b"hello".to_vec()),
        ];

        let report = upload_files(&pipeline, &UrlResolver::default(), files)
            .await
            .unwrap();

        assert!(report.success);
        assert_eq!(report.body["images"].as_array().unwrap().len(), 1);
        assert_eq!(report.body["failed"][0], "notes.txt");
    }
}
