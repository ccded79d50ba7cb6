use async_trait::async_trait;
use rainforge_core::{error::SourceError, resolver::archive::ArchiveFetcher};
use rainforge_schemas::environment::Coordinates;
use std::path::PathBuf;

/// Serves a previously downloaded archive payload from disk. The coordinate is
/// checked against the payload by the parser, not here.
pub struct FileArchiveFetcher {
    path: PathBuf,
}

impl FileArchiveFetcher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ArchiveFetcher for FileArchiveFetcher {
    async fn fetch(&self, _coords: Coordinates) -> Result<String, SourceError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| SourceError::Unavailable(format!("{}: {}", self.path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = FileArchiveFetcher::new(dir.path().join("absent.json"));
        let err = fetcher.fetch(Coordinates::new(0.0, 0.0)).await.unwrap_err();
        assert!(matches!(err, SourceError::Unavailable(_)));
    }

    #[tokio::test]
    async fn reads_payload_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("archive.json");
        std::fs::write(&path, "{\"daily\": {}}").unwrap();
        let body = FileArchiveFetcher::new(&path).fetch(Coordinates::new(0.0, 0.0)).await.unwrap();
        assert_eq!(body, "{\"daily\": {}}");
    }
}
