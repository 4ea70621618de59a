use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMetadata {
    pub filename: String,
    pub basename: String,
    pub extension: String,
    pub date_taken: Option<NaiveDateTime>,
    pub camera_maker: Option<String>,
    pub camera_model: Option<String>,
}

impl ImageMetadata {
    pub fn from_filename(filename: &str) -> Self {
        let (basename, extension) = split_extension(filename);
        Self {
            filename: filename.to_string(),
            basename: basename.to_string(),
            extension: extension.to_string(),
            date_taken: None,
            camera_maker: None,
            camera_model: None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.file_name()
            .map(|name| Self::from_filename(&name.to_string_lossy()))
    }

    pub fn comparable_filename(&self) -> String {
        format!("{}{}", strip_copy_suffix(&self.basename), self.extension)
    }
}

pub(crate) fn split_extension(filename: &str) -> (&str, &str) {
    match filename.rfind('.') {
        Some(pos) => filename.split_at(pos),
        None => (filename, ""),
    }
}

pub fn strip_copy_suffix(basename: &str) -> &str {
    match basename.rsplit_once('-') {
        Some((head, tail))
            if !head.is_empty() && !tail.is_empty() && tail.chars().all(|c| c.is_ascii_digit()) =>
        {
            head
        }
        _ => basename,
    }
}
