use crate::convert::{convert_image, Conversion};
use crate::date_rule::DateRule;
use crate::exif_reader::read_metadata;
use crate::metadata::ImageMetadata;
use crate::template::parse_template;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct PlanOptions {
    pub input: PathBuf,
    pub recursive: bool,
    pub include_hidden: bool,
    pub template: String,
    pub date_rule: DateRule,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            recursive: false,
            include_hidden: false,
            template: crate::DEFAULT_TEMPLATE.to_string(),
            date_rule: DateRule::Unchanged,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanItem {
    pub path: PathBuf,
    pub metadata: ImageMetadata,
    pub conversion: Conversion,
}

impl PlanItem {
    pub fn target_filename(&self) -> &str {
        self.conversion
            .new_filename
            .as_deref()
            .unwrap_or(&self.metadata.filename)
    }

    pub fn is_effective_change(&self) -> bool {
        if self.conversion.new_date_taken.is_some() {
            return true;
        }
        match self.conversion.new_filename.as_deref() {
            Some(new_name) => {
                new_name != self.metadata.filename
                    && new_name != self.metadata.comparable_filename()
            }
            None => false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanFailure {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanStats {
    pub scanned_files: usize,
    pub jpg_files: usize,
    pub skipped_non_jpg: usize,
    pub skipped_hidden: usize,
    pub planned: usize,
    pub unchanged: usize,
    pub unreadable: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModifyPlan {
    pub template: String,
    pub date_rule: DateRule,
    pub items: Vec<PlanItem>,
    pub failures: Vec<PlanFailure>,
    pub stats: PlanStats,
}

pub fn generate_plan(options: &PlanOptions) -> Result<ModifyPlan> {
    if !options.input.exists() {
        anyhow::bail!("対象フォルダが存在しません: {}", options.input.display());
    }

    let parts = parse_template(&options.template)?;
    let mut stats = PlanStats::default();
    let files = collect_image_files(
        &options.input,
        options.recursive,
        options.include_hidden,
        &mut stats,
    )?;

    let mut items = Vec::with_capacity(files.len());
    let mut failures = Vec::new();
    for path in files {
        let metadata = match read_metadata(&path) {
            Ok(metadata) => metadata,
            Err(err) => {
                stats.unreadable += 1;
                failures.push(PlanFailure {
                    path,
                    reason: err.to_string(),
                });
                continue;
            }
        };

        let conversion = convert_image(&metadata, &parts, &options.date_rule);
        let item = PlanItem {
            path,
            metadata,
            conversion,
        };
        stats.planned += 1;
        if !item.is_effective_change() {
            stats.unchanged += 1;
        }
        items.push(item);
    }

    Ok(ModifyPlan {
        template: options.template.clone(),
        date_rule: options.date_rule,
        items,
        failures,
        stats,
    })
}

pub fn collect_image_files(
    root: &Path,
    recursive: bool,
    include_hidden: bool,
    stats: &mut PlanStats,
) -> Result<Vec<PathBuf>> {
    let mut walker = WalkDir::new(root).sort_by_file_name();
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut out = Vec::new();
    for entry in walker {
        let entry =
            entry.with_context(|| format!("フォルダ走査に失敗しました: {}", root.display()))?;
        let path = entry.path();
        if path.is_dir() {
            continue;
        }
        stats.scanned_files += 1;

        if is_hidden(path) && !include_hidden {
            stats.skipped_hidden += 1;
            continue;
        }

        if is_jpeg(path) {
            stats.jpg_files += 1;
            out.push(path.to_path_buf());
        } else {
            stats.skipped_non_jpg += 1;
        }
    }

    Ok(out)
}

fn is_jpeg(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy();
            ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg")
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}
