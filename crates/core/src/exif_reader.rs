use crate::metadata::ImageMetadata;
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use exif::{Exif, In, Reader, Tag, Value};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExifDetails {
    pub metadata: ImageMetadata,
    pub lens_model: Option<String>,
    pub f_stop: Option<f64>,
    pub exposure_time: Option<f64>,
    pub iso: Option<u32>,
    pub focal_length: Option<f64>,
    pub resolution: Option<(u32, u32)>,
    pub filesize_bytes: u64,
}

impl ExifDetails {
    pub fn f_stop_display(&self) -> Option<String> {
        self.f_stop.map(|v| format!("f/{}", v))
    }

    pub fn exposure_display(&self) -> Option<String> {
        self.exposure_time
            .filter(|v| *v > 0.0)
            .map(|v| format!("1/{} s", (1.0 / v).round() as i64))
    }

    pub fn focal_length_display(&self) -> Option<String> {
        self.focal_length.map(|v| format!("{:.1} mm", v))
    }

    pub fn resolution_display(&self) -> Option<String> {
        self.resolution.map(|(w, h)| format!("{} x {}", w, h))
    }

    pub fn filesize_display(&self) -> String {
        let bytes = self.filesize_bytes as f64;
        if self.filesize_bytes < (1 << 20) {
            format!("{:.2} kB", bytes / f64::from(1 << 10))
        } else {
            format!("{:.2} MB", bytes / f64::from(1 << 20))
        }
    }
}

pub fn read_metadata(path: &Path) -> Result<ImageMetadata> {
    let mut metadata = ImageMetadata::from_path(path)
        .with_context(|| format!("ファイル名を取得できませんでした: {}", path.display()))?;

    if let Some(exif) = open_exif(path)? {
        metadata.date_taken = read_date_taken(&exif);
        metadata.camera_maker = field_string(&exif, &[Tag::Make]);
        metadata.camera_model = field_string(&exif, &[Tag::Model]);
    }

    Ok(metadata)
}

pub fn read_details(path: &Path) -> Result<ExifDetails> {
    let metadata = read_metadata(path)?;
    let filesize_bytes = fs::metadata(path)
        .with_context(|| format!("ファイル情報を取得できませんでした: {}", path.display()))?
        .len();

    let exif = open_exif(path)?;
    let details = match exif {
        Some(exif) => ExifDetails {
            metadata,
            lens_model: field_string(&exif, &[Tag::LensModel]),
            f_stop: field_f64(&exif, Tag::FNumber),
            exposure_time: field_f64(&exif, Tag::ExposureTime),
            iso: field_u32(&exif, Tag::PhotographicSensitivity),
            focal_length: field_f64(&exif, Tag::FocalLength),
            resolution: read_resolution(&exif),
            filesize_bytes,
        },
        None => ExifDetails {
            metadata,
            lens_model: None,
            f_stop: None,
            exposure_time: None,
            iso: None,
            focal_length: None,
            resolution: None,
            filesize_bytes,
        },
    };
    Ok(details)
}

fn open_exif(path: &Path) -> Result<Option<Exif>> {
    let file = File::open(path)
        .with_context(|| format!("EXIF読み込み対象を開けませんでした: {}", path.display()))?;
    let mut buf = BufReader::new(file);
    Ok(Reader::new().read_from_container(&mut buf).ok())
}

fn read_date_taken(exif: &Exif) -> Option<NaiveDateTime> {
    field_string(
        exif,
        &[Tag::DateTimeOriginal, Tag::DateTimeDigitized, Tag::DateTime],
    )
    .as_deref()
    .and_then(parse_exif_date)
}

fn read_resolution(exif: &Exif) -> Option<(u32, u32)> {
    let width = field_u32(exif, Tag::PixelXDimension).or_else(|| field_u32(exif, Tag::ImageWidth));
    let height =
        field_u32(exif, Tag::PixelYDimension).or_else(|| field_u32(exif, Tag::ImageLength));
    width.zip(height)
}

fn field_string(exif: &Exif, tags: &[Tag]) -> Option<String> {
    tags.iter().find_map(|tag| {
        let field = exif.get_field(*tag, In::PRIMARY)?;
        let value = match &field.value {
            Value::Ascii(vec) => vec
                .first()
                .map(|bytes| String::from_utf8_lossy(bytes).to_string())?,
            _ => field.display_value().to_string(),
        };
        let value = value.trim().to_string();
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    })
}

fn field_f64(exif: &Exif, tag: Tag) -> Option<f64> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    match &field.value {
        Value::Rational(v) => v.first().map(|r| r.to_f64()),
        Value::Short(v) => v.first().map(|&n| f64::from(n)),
        Value::Long(v) => v.first().map(|&n| f64::from(n)),
        _ => None,
    }
}

fn field_u32(exif: &Exif, tag: Tag) -> Option<u32> {
    exif.get_field(tag, In::PRIMARY)
        .and_then(|field| field.value.get_uint(0))
}

pub fn parse_exif_date(input: &str) -> Option<NaiveDateTime> {
    let normalized = input.trim();

    let candidates = [
        "%Y:%m:%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
    ];

    candidates
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(normalized, fmt).ok())
}
