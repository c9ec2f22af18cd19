use crate::error::Result;
use crate::model::Fingerprint;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

/// Детерминированный отпечаток сохранённого изображения страницы
pub trait Fingerprinter: Send + Sync {
    fn fingerprint(&self, path: &Path) -> Result<Fingerprint>;
}

/// SHA-256 от байтов файла.
///
/// Совпадение отпечатков считается совпадением страниц; коллизии не обрабатываются.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256Fingerprinter;

impl Sha256Fingerprinter {
    pub fn new() -> Self {
        Self
    }

    pub fn hash_bytes(data: &[u8]) -> Fingerprint {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Fingerprint::new(hex::encode(hasher.finalize()))
    }
}

impl Fingerprinter for Sha256Fingerprinter {
    fn fingerprint(&self, path: &Path) -> Result<Fingerprint> {
        // Снимок окна целиком помещается в память
        let data = fs::read(path)?;
        Ok(Self::hash_bytes(&data))
    }
}
