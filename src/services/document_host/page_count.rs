use crate::error::Result;
use crate::model::DocumentKind;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Количество слайдов или листов, прочитанное из архива документа.
///
/// `None` для потоковых форматов и для старых двоичных файлов (.ppt, .xls),
/// у которых архива нет.
pub fn count_pages(path: &Path, kind: DocumentKind) -> Result<Option<usize>> {
    if !kind.is_indexed() {
        return Ok(None);
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let count = match (kind, extension.as_str()) {
        (DocumentKind::Slides, "pptx") => count_entries(path, "ppt/slides/slide")?,
        (DocumentKind::Sheets, "xlsx") => count_entries(path, "xl/worksheets/sheet")?,
        (DocumentKind::Slides, "odp") => count_in_content(path, "<draw:page ")?,
        (DocumentKind::Sheets, "ods") => count_in_content(path, "<table:table ")?,
        _ => return Ok(None),
    };

    debug!("{}: {} страниц по данным архива", path.display(), count);
    Ok(Some(count))
}

/// Записи вида `<prefix>N.xml` (без `_rels` и прочих вложенных каталогов)
fn count_entries(path: &Path, prefix: &str) -> Result<usize> {
    let archive = zip::ZipArchive::new(File::open(path)?)?;
    Ok(archive
        .file_names()
        .filter(|name| is_numbered_entry(name, prefix))
        .count())
}

fn is_numbered_entry(name: &str, prefix: &str) -> bool {
    name.strip_prefix(prefix)
        .and_then(|rest| rest.strip_suffix(".xml"))
        .map(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
        .unwrap_or(false)
}

/// ODF хранит все страницы в одном content.xml
fn count_in_content(path: &Path, marker: &str) -> Result<usize> {
    let mut archive = zip::ZipArchive::new(File::open(path)?)?;
    let mut content = String::new();
    archive.by_name("content.xml")?.read_to_string(&mut content)?;
    Ok(content.matches(marker).count())
}
