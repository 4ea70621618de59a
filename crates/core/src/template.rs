use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplatePart {
    Literal(String),
    Token(Token),
    ArgToken(ArgToken, String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Original,
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    CameraMaker,
    CameraModel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgToken {
    UpTo,
    UpToInclusive,
    From,
    FromInclusive,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("テンプレートに使用できない文字が含まれています: '{0}'")]
    InvalidCharacter(char),
    #[error("角括弧の対応が不正です")]
    UnbalancedBrackets,
    #[error("未対応タグです: [{0}]")]
    UnknownTag(String),
}

pub const TAG_REFERENCE: &[(&str, &str)] = &[
    ("ORG", "元のファイル名"),
    ("YYYY", "年 (4桁)"),
    ("MM", "月 (2桁)"),
    ("DD", "日 (2桁)"),
    ("hh", "時 (2桁)"),
    ("mm", "分 (2桁)"),
    ("ss", "秒 (2桁)"),
    ("MAK", "カメラメーカー"),
    ("MOD", "カメラ機種"),
    ("UPT:", "指定文字列の直前まで"),
    ("UPTI:", "指定文字列を含むところまで"),
    ("FRM:", "指定文字列の直後から"),
    ("FRMI:", "指定文字列を含むところから"),
];

pub fn validate_template(input: &str) -> Result<(), TemplateError> {
    parse_template(input).map(|_| ())
}

pub fn parse_template(input: &str) -> Result<Vec<TemplatePart>, TemplateError> {
    let mut parts = Vec::new();
    let mut literal = String::new();
    let mut chars = input.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '[' => {
                if !literal.is_empty() {
                    parts.push(TemplatePart::Literal(std::mem::take(&mut literal)));
                }
                let mut tag = String::new();
                let mut closed = false;
                for next in chars.by_ref() {
                    if next == ']' {
                        closed = true;
                        break;
                    }
                    if next == '[' {
                        return Err(TemplateError::UnbalancedBrackets);
                    }
                    tag.push(next);
                }
                if !closed {
                    return Err(TemplateError::UnbalancedBrackets);
                }
                parts.push(parse_tag(&tag)?);
            }
            ']' => return Err(TemplateError::UnbalancedBrackets),
            ch if is_literal_char(ch) => literal.push(ch),
            other => return Err(TemplateError::InvalidCharacter(other)),
        }
    }

    if !literal.is_empty() {
        parts.push(TemplatePart::Literal(literal));
    }

    Ok(parts)
}

fn parse_tag(tag: &str) -> Result<TemplatePart, TemplateError> {
    if let Some((name, arg)) = tag.split_once(':') {
        let token = match name {
            "UPT" => ArgToken::UpTo,
            "UPTI" => ArgToken::UpToInclusive,
            "FRM" => ArgToken::From,
            "FRMI" => ArgToken::FromInclusive,
            other => return Err(TemplateError::UnknownTag(format!("{other}:"))),
        };
        return Ok(TemplatePart::ArgToken(token, arg.to_string()));
    }

    let token = match tag {
        "ORG" => Token::Original,
        "YYYY" => Token::Year,
        "MM" => Token::Month,
        "DD" => Token::Day,
        "hh" => Token::Hour,
        "mm" => Token::Minute,
        "ss" => Token::Second,
        "MAK" => Token::CameraMaker,
        "MOD" => Token::CameraModel,
        other => return Err(TemplateError::UnknownTag(other.to_string())),
    };
    Ok(TemplatePart::Token(token))
}

fn is_literal_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.')
}
