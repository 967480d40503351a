use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use sha2::{Digest, Sha256};

use crate::error::Error;

pub const PUBLIC_PREFIX: &str = "/uploads";

pub trait FileStorer: 'static {
    /// Stores the bytes and returns the public path they are served from.
    fn write(&self, bytes: &Bytes, extension: &str) -> Result<String, Error>;
}

/// Content-addressed files under one directory: the name is the sha256 of
/// the content, so re-uploading the same photo reuses the file.
pub struct LocalStorer {
    path: PathBuf,
}

impl LocalStorer {
    pub fn new(path: &str) -> Result<Self, Error> {
        fs::create_dir_all(path)?;
        Ok(Self { path: PathBuf::from(path) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FileStorer for LocalStorer {
    fn write(&self, bytes: &Bytes, extension: &str) -> Result<String, Error> {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        let name = format!("{:x}.{}", hasher.finalize(), extension);
        let target = self.path.join(&name);
        if !target.exists() {
            let mut file = File::create(&target)?;
            file.write_all(bytes)?;
        }
        Ok(format!("{}/{}", PUBLIC_PREFIX, name))
    }
}
