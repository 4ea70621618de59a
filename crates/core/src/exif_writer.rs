use crate::metadata::split_extension;
use anyhow::{anyhow, Context, Result};
use chrono::NaiveDateTime;
use little_exif::exif_tag::ExifTag;
use little_exif::metadata::Metadata;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const EXIF_DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Disposal {
    Trash,
    Delete,
}

pub fn write_date_taken(path: &Path, date_taken: NaiveDateTime) -> Result<()> {
    let value = date_taken.format(EXIF_DATETIME_FORMAT).to_string();

    let mut metadata = Metadata::new_from_path(path).map_err(|err| {
        anyhow!(
            "EXIF書き込み対象を開けませんでした: {}: {}",
            path.display(),
            err
        )
    })?;
    metadata.set_tag(ExifTag::DateTimeOriginal(value.clone()));
    metadata.set_tag(ExifTag::CreateDate(value.clone()));
    metadata.set_tag(ExifTag::ModifyDate(value));
    metadata.write_to_file(path).map_err(|err| {
        anyhow!(
            "撮影日時を書き込めませんでした: {}: {}",
            path.display(),
            err
        )
    })
}

pub fn save_as(path: &Path, new_filename: &str, disposal: Disposal) -> Result<PathBuf> {
    let parent = path
        .parent()
        .context("親ディレクトリを取得できませんでした")?;
    let target = resolve_available_target(parent, new_filename);

    fs::copy(path, &target).with_context(|| {
        format!(
            "リネーム先を書き込めませんでした: {} -> {}",
            path.display(),
            target.display()
        )
    })?;
    dispose_original(path, disposal)?;
    Ok(target)
}

fn dispose_original(path: &Path, disposal: Disposal) -> Result<()> {
    match disposal {
        Disposal::Trash => trash::delete(path).map_err(|err| {
            anyhow!(
                "元ファイルをゴミ箱へ移動できませんでした: {}: {}",
                path.display(),
                err
            )
        }),
        Disposal::Delete => fs::remove_file(path)
            .with_context(|| format!("元ファイルを削除できませんでした: {}", path.display())),
    }
}

fn resolve_available_target(parent: &Path, new_filename: &str) -> PathBuf {
    let candidate = parent.join(new_filename);
    if !candidate.exists() {
        return candidate;
    }

    let (basename, extension) = split_extension(new_filename);
    let mut n = 1usize;
    loop {
        let next = parent.join(format!("{}-{}{}", basename, n, extension));
        if !next.exists() {
            return next;
        }
        n += 1;
    }
}
