use crate::date_rule::{apply_date_rule, DateRule};
use crate::metadata::ImageMetadata;
use crate::render::compile_filename;
use crate::template::TemplatePart;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversion {
    pub new_filename: Option<String>,
    pub new_date_taken: Option<NaiveDateTime>,
}

impl Conversion {
    pub fn is_noop(&self) -> bool {
        self.new_filename.is_none() && self.new_date_taken.is_none()
    }
}

pub fn convert_image(
    image: &ImageMetadata,
    parts: &[TemplatePart],
    rule: &DateRule,
) -> Conversion {
    let effective = apply_date_rule(rule, image.date_taken);
    let new_filename = compile_filename(parts, image, effective);
    let new_date_taken = if effective == image.date_taken {
        None
    } else {
        effective
    };
    Conversion {
        new_filename,
        new_date_taken,
    }
}

pub fn convert_all(
    images: &[ImageMetadata],
    parts: &[TemplatePart],
    rule: &DateRule,
) -> Vec<Conversion> {
    images
        .iter()
        .map(|image| convert_image(image, parts, rule))
        .collect()
}
