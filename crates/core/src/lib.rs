mod apply;
mod config;
mod convert;
mod date_rule;
mod exif_reader;
mod exif_writer;
mod metadata;
mod planner;
mod render;
mod template;

pub use apply::{apply_plan, ApplyFailure, ApplyOutcome};
pub use config::{app_paths, load_config, save_config, AppConfig, AppPaths};
pub use convert::{convert_all, convert_image, Conversion};
pub use date_rule::{apply_date_rule, DateRule, RelativeOffset};
pub use exif_reader::{read_details, read_metadata, ExifDetails};
pub use exif_writer::{save_as, write_date_taken, Disposal, EXIF_DATETIME_FORMAT};
pub use metadata::ImageMetadata;
pub use planner::{
    collect_image_files, generate_plan, ModifyPlan, PlanFailure, PlanItem, PlanOptions, PlanStats,
};
pub use render::{compile_filename, resolve_arg_token, resolve_token};
pub use template::{
    parse_template, validate_template, ArgToken, TemplateError, TemplatePart, Token, TAG_REFERENCE,
};

pub const DEFAULT_TEMPLATE: &str = "[YYYY][MM][DD]-[hh][mm][ss]_[ORG]";
