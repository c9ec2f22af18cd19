use crate::error::{PagecapError, Result};
use crate::model::{DocumentKind, PageArtifact};
use image::{DynamicImage, ImageFormat};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Каталог со страницами одной сессии: `<root>/<stem><suffix>/<stem>_page_NNN.<ext>`
pub struct PageArtifactStore {
    directory: PathBuf,
    prefix: String,
    format: ImageFormat,
    extension: &'static str,
}

impl PageArtifactStore {
    /// Создать каталог сессии. Страницы прошлого запуска с тем же именем удаляются,
    /// чтобы в каталоге оставались только страницы этой сессии.
    pub fn prepare(output_root: &Path, document: &Path, kind: DocumentKind, image_format: &str) -> Result<Self> {
        let prefix = document
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                PagecapError::DocumentOpen(format!("у файла {} нет имени", document.display()))
            })?
            .to_string();

        let (format, extension) = match image_format {
            "jpg" | "jpeg" => (ImageFormat::Jpeg, "jpg"),
            "png" => (ImageFormat::Png, "png"),
            other => {
                return Err(PagecapError::Internal(format!("неизвестный формат изображений '{}'", other)))
            }
        };

        let directory = output_root.join(format!("{}{}", prefix, kind.output_suffix()));
        fs::create_dir_all(&directory)?;
        info!("Каталог страниц: {}", directory.display());

        let store = Self {
            directory,
            prefix,
            format,
            extension,
        };

        let stale = store.list()?;
        if !stale.is_empty() {
            warn!("В {} найдено {} страниц прошлого запуска, удаляем", store.directory.display(), stale.len());
            for artifact in &stale {
                store.discard(artifact)?;
            }
        }

        Ok(store)
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn path_for(&self, index: usize) -> PathBuf {
        self.directory
            .join(PageArtifact::file_name(&self.prefix, index, self.extension))
    }

    pub fn persist(&self, index: usize, image: &DynamicImage) -> Result<PageArtifact> {
        let path = self.path_for(index);

        match self.format {
            // JPEG без альфа-канала
            ImageFormat::Jpeg => DynamicImage::ImageRgb8(image.to_rgb8()).save_with_format(&path, self.format)?,
            _ => image.save_with_format(&path, self.format)?,
        }

        debug!("Страница {} сохранена в {}", index, path.display());
        Ok(PageArtifact { index, path })
    }

    pub fn discard(&self, artifact: &PageArtifact) -> Result<()> {
        fs::remove_file(&artifact.path)?;
        debug!("Удалена страница {}", artifact);
        Ok(())
    }

    /// Страницы этой сессии в каталоге, по возрастанию номера
    pub fn list(&self) -> Result<Vec<PageArtifact>> {
        let mut artifacts = Vec::new();

        for entry in fs::read_dir(&self.directory)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
            if !matches!(extension, "png" | "jpg") {
                continue;
            }
            if let Some(index) = PageArtifact::parse_index(&path, &self.prefix) {
                artifacts.push(PageArtifact { index, path });
            }
        }

        artifacts.sort_by_key(|a| a.index);
        Ok(artifacts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::fakes::frame;

    #[test]
    fn test_directory_suffix_per_kind() {
        let root = tempfile::tempdir().unwrap();
        let doc = Path::new("/docs/Quarterly Report.docx");

        let store = PageArtifactStore::prepare(root.path(), doc, DocumentKind::Word, "png").unwrap();
        assert_eq!(store.directory(), root.path().join("Quarterly Report_Word"));
        assert!(store.directory().is_dir());

        let store = PageArtifactStore::prepare(root.path(), Path::new("deck.pptx"), DocumentKind::Slides, "png").unwrap();
        assert_eq!(store.directory(), root.path().join("deck"));
        assert_eq!(
            store.path_for(7),
            root.path().join("deck").join("deck_page_007.png")
        );
    }

    #[test]
    fn test_persist_list_discard() {
        let root = tempfile::tempdir().unwrap();
        let store = PageArtifactStore::prepare(root.path(), Path::new("book.xlsx"), DocumentKind::Sheets, "png").unwrap();

        let first = store.persist(1, &frame(10)).unwrap();
        let second = store.persist(2, &frame(20)).unwrap();
        assert!(first.path.exists());

        let listed: Vec<usize> = store.list().unwrap().iter().map(|a| a.index).collect();
        assert_eq!(listed, vec![1, 2]);

        store.discard(&second).unwrap();
        assert!(!second.path.exists());
        assert_eq!(store.list().unwrap(), vec![first]);
    }

    #[test]
    fn test_jpeg_output_decodes() {
        let root = tempfile::tempdir().unwrap();
        let store = PageArtifactStore::prepare(root.path(), Path::new("a.pdf"), DocumentKind::Pdf, "jpg").unwrap();

        let artifact = store.persist(1, &frame(99)).unwrap();
        assert_eq!(artifact.path.extension().unwrap(), "jpg");
        let decoded = image::open(&artifact.path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 6));
    }

    #[test]
    fn test_prepare_removes_stale_pages_only() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("report_PDF");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("report_page_001.png"), b"old").unwrap();
        fs::write(dir.join("report_page_009.png"), b"old").unwrap();
        fs::write(dir.join("notes.txt"), b"keep").unwrap();

        let store = PageArtifactStore::prepare(root.path(), Path::new("report.pdf"), DocumentKind::Pdf, "png").unwrap();

        assert!(store.list().unwrap().is_empty());
        assert!(dir.join("notes.txt").exists());
    }

    #[test]
    fn test_discard_missing_file_is_io_error() {
        let root = tempfile::tempdir().unwrap();
        let store = PageArtifactStore::prepare(root.path(), Path::new("a.docx"), DocumentKind::Word, "png").unwrap();
        let ghost = PageArtifact {
            index: 3,
            path: store.path_for(3),
        };
        assert!(matches!(store.discard(&ghost), Err(PagecapError::Io(_))));
    }
}
