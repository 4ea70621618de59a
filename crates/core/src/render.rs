use crate::metadata::ImageMetadata;
use crate::template::{ArgToken, TemplatePart, Token};
use chrono::{Datelike, NaiveDateTime, Timelike};

pub fn resolve_token(
    token: Token,
    image: &ImageMetadata,
    effective_date: Option<NaiveDateTime>,
) -> Option<String> {
    match token {
        Token::Original => Some(image.basename.clone()),
        Token::Year => effective_date.map(|dt| format!("{:04}", dt.year())),
        Token::Month => effective_date.map(|dt| format!("{:02}", dt.month())),
        Token::Day => effective_date.map(|dt| format!("{:02}", dt.day())),
        Token::Hour => effective_date.map(|dt| format!("{:02}", dt.hour())),
        Token::Minute => effective_date.map(|dt| format!("{:02}", dt.minute())),
        Token::Second => effective_date.map(|dt| format!("{:02}", dt.second())),
        Token::CameraMaker => image.camera_maker.as_deref().map(fix_string),
        Token::CameraModel => image.camera_model.as_deref().map(fix_string),
    }
}

pub fn resolve_arg_token(token: ArgToken, image: &ImageMetadata, arg: &str) -> Option<String> {
    let basename = &image.basename;
    let pos = basename.find(arg)?;
    let value = match token {
        ArgToken::UpTo => &basename[..pos],
        ArgToken::UpToInclusive => &basename[..pos + arg.len()],
        ArgToken::From => &basename[pos + arg.len()..],
        ArgToken::FromInclusive => &basename[pos..],
    };
    Some(value.to_string())
}

pub fn compile_filename(
    parts: &[TemplatePart],
    image: &ImageMetadata,
    effective_date: Option<NaiveDateTime>,
) -> Option<String> {
    if parts.is_empty() {
        return None;
    }

    let mut assembled = String::new();
    let mut placeholders = 0usize;
    let mut resolved = 0usize;

    for part in parts {
        match part {
            TemplatePart::Literal(text) => assembled.push_str(text),
            TemplatePart::Token(token) => {
                placeholders += 1;
                if let Some(value) = resolve_token(*token, image, effective_date) {
                    resolved += 1;
                    assembled.push_str(&value);
                }
            }
            TemplatePart::ArgToken(token, arg) => {
                placeholders += 1;
                if let Some(value) = resolve_arg_token(*token, image, arg) {
                    resolved += 1;
                    assembled.push_str(&value);
                }
            }
        }
    }

    if placeholders > 0 && resolved == 0 {
        return None;
    }
    if !assembled.chars().any(char::is_alphanumeric) {
        return None;
    }

    Some(format!("{}{}", assembled, image.extension))
}

fn fix_string(text: &str) -> String {
    text.chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' {
                ch
            } else {
                '-'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::parse_template;
    use chrono::NaiveDate;

    fn image() -> ImageMetadata {
        let mut meta = ImageMetadata::from_filename("IMG_20230101_beach.jpg");
        meta.date_taken = NaiveDate::from_ymd_opt(2023, 1, 1).and_then(|d| d.and_hms_opt(9, 5, 7));
        meta.camera_maker = Some("NIKON CORPORATION".to_string());
        meta.camera_model = Some("Z 6_2".to_string());
        meta
    }

    #[test]
    fn resolve_substring_tokens_around_needle() {
        let meta = image();
        assert_eq!(
            resolve_arg_token(ArgToken::UpTo, &meta, "beach").as_deref(),
            Some("IMG_20230101_")
        );
        assert_eq!(
            resolve_arg_token(ArgToken::UpToInclusive, &meta, "beach").as_deref(),
            Some("IMG_20230101_beach")
        );
        assert_eq!(
            resolve_arg_token(ArgToken::From, &meta, "beach").as_deref(),
            Some("")
        );
        assert_eq!(
            resolve_arg_token(ArgToken::FromInclusive, &meta, "beach").as_deref(),
            Some("beach")
        );
    }

    #[test]
    fn resolve_substring_token_misses_when_needle_absent() {
        let meta = image();
        assert_eq!(resolve_arg_token(ArgToken::UpTo, &meta, "zzz"), None);
        assert_eq!(resolve_arg_token(ArgToken::FromInclusive, &meta, "zzz"), None);
    }

    #[test]
    fn resolve_substring_search_is_case_sensitive_and_leftmost() {
        let meta = ImageMetadata::from_filename("abcXabc.jpg");
        assert_eq!(resolve_arg_token(ArgToken::UpTo, &meta, "ABC"), None);
        assert_eq!(
            resolve_arg_token(ArgToken::From, &meta, "abc").as_deref(),
            Some("Xabc")
        );
    }

    #[test]
    fn resolve_date_tokens_use_effective_date() {
        let meta = image();
        let shifted = NaiveDate::from_ymd_opt(2024, 12, 31)
            .and_then(|d| d.and_hms_opt(23, 59, 58))
            .expect("valid datetime");

        assert_eq!(
            resolve_token(Token::Year, &meta, Some(shifted)).as_deref(),
            Some("2024")
        );
        assert_eq!(
            resolve_token(Token::Month, &meta, Some(shifted)).as_deref(),
            Some("12")
        );
        assert_eq!(
            resolve_token(Token::Second, &meta, Some(shifted)).as_deref(),
            Some("58")
        );
        assert_eq!(resolve_token(Token::Year, &meta, None), None);
    }

    #[test]
    fn resolve_camera_tokens_replace_unsafe_characters() {
        let meta = image();
        assert_eq!(
            resolve_token(Token::CameraMaker, &meta, None).as_deref(),
            Some("NIKON-CORPORATION")
        );
        assert_eq!(
            resolve_token(Token::CameraModel, &meta, None).as_deref(),
            Some("Z-6_2")
        );

        let plain = ImageMetadata::from_filename("IMG_0001.jpg");
        assert_eq!(resolve_token(Token::CameraMaker, &plain, None), None);
    }

    #[test]
    fn resolve_empty_camera_maker_is_present_but_empty() {
        let mut meta = ImageMetadata::from_filename("IMG_0001.jpg");
        meta.camera_maker = Some(String::new());
        assert_eq!(
            resolve_token(Token::CameraMaker, &meta, None).as_deref(),
            Some("")
        );
    }

    #[test]
    fn compile_empty_template_yields_no_rename() {
        let meta = image();
        assert_eq!(compile_filename(&[], &meta, meta.date_taken), None);
    }

    #[test]
    fn compile_returns_none_when_no_placeholder_resolves() {
        let meta = ImageMetadata::from_filename("IMG_0001.jpg");
        let parts = parse_template("[YYYY][MM]").expect("must parse");
        assert_eq!(compile_filename(&parts, &meta, None), None);
    }

    #[test]
    fn compile_substitutes_empty_for_partial_misses() {
        let mut meta = image();
        meta.camera_maker = None;
        let parts = parse_template("[MAK]_[ORG]").expect("must parse");
        assert_eq!(
            compile_filename(&parts, &meta, meta.date_taken).as_deref(),
            Some("_IMG_20230101_beach.jpg")
        );
    }

    #[test]
    fn compile_rejects_result_without_alphanumeric() {
        let meta = image();
        let parts = parse_template("---").expect("must parse");
        assert_eq!(compile_filename(&parts, &meta, meta.date_taken), None);
    }

    #[test]
    fn compile_appends_original_extension() {
        let mut meta = ImageMetadata::from_filename("IMG_1234.jpg");
        meta.date_taken = NaiveDate::from_ymd_opt(2022, 5, 6).and_then(|d| d.and_hms_opt(10, 0, 0));
        let parts = parse_template("[YYYY]-[MM]-[DD]_[ORG]").expect("must parse");
        assert_eq!(
            compile_filename(&parts, &meta, meta.date_taken).as_deref(),
            Some("2022-05-06_IMG_1234.jpg")
        );
    }

    #[test]
    fn compile_treats_empty_resolution_as_resolved() {
        let meta = image();
        let parts = parse_template("[FRM:beach]_ok").expect("must parse");
        assert_eq!(
            compile_filename(&parts, &meta, meta.date_taken).as_deref(),
            Some("_ok.jpg")
        );
    }

    #[test]
    fn compile_is_deterministic() {
        let meta = image();
        let parts = parse_template("[YYYY][MM][DD]-[hh][mm][ss]_[ORG]").expect("must parse");
        let first = compile_filename(&parts, &meta, meta.date_taken);
        let second = compile_filename(&parts, &meta, meta.date_taken);
        assert_eq!(first, second);
        assert_eq!(first.as_deref(), Some("20230101-090507_IMG_20230101_beach.jpg"));
    }
}
