use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateRule {
    Unchanged,
    Relative(RelativeOffset),
    Specific(NaiveDateTime),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelativeOffset {
    pub negative: bool,
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl RelativeOffset {
    pub fn from_total_seconds(total: i64) -> Self {
        let mut rest = total.unsigned_abs();
        let days = (rest / 86_400) as u32;
        rest %= 86_400;
        let hours = (rest / 3_600) as u32;
        rest %= 3_600;
        Self {
            negative: total < 0,
            days,
            hours,
            minutes: (rest / 60) as u32,
            seconds: (rest % 60) as u32,
        }
    }

    pub fn total_seconds(&self) -> i64 {
        let total = i64::from(self.days) * 86_400
            + i64::from(self.hours) * 3_600
            + i64::from(self.minutes) * 60
            + i64::from(self.seconds);
        if self.negative {
            -total
        } else {
            total
        }
    }

    fn signed_duration(&self) -> Duration {
        let magnitude = Duration::days(i64::from(self.days))
            + Duration::hours(i64::from(self.hours))
            + Duration::minutes(i64::from(self.minutes))
            + Duration::seconds(i64::from(self.seconds));
        if self.negative {
            -magnitude
        } else {
            magnitude
        }
    }
}

pub fn apply_date_rule(rule: &DateRule, original: Option<NaiveDateTime>) -> Option<NaiveDateTime> {
    match rule {
        DateRule::Unchanged => original,
        DateRule::Specific(ts) => Some(*ts),
        DateRule::Relative(offset) => original.map(|dt| dt + offset.signed_duration()),
    }
}

#[cfg(test)]
mod tests {
    use super::{apply_date_rule, DateRule, RelativeOffset};
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .and_then(|date| date.and_hms_opt(h, mi, s))
            .expect("valid datetime")
    }

    #[test]
    fn unchanged_passes_original_through() {
        let original = at(2023, 1, 2, 0, 0, 0);
        let rule = DateRule::Unchanged;
        assert_eq!(apply_date_rule(&rule, Some(original)), Some(original));
        assert_eq!(apply_date_rule(&rule, None), None);
    }

    #[test]
    fn specific_overrides_even_without_original() {
        let target = at(2020, 6, 15, 12, 30, 0);
        let rule = DateRule::Specific(target);
        assert_eq!(apply_date_rule(&rule, None), Some(target));
        assert_eq!(
            apply_date_rule(&rule, Some(at(1999, 1, 1, 0, 0, 0))),
            Some(target)
        );
    }

    #[test]
    fn relative_subtracts_one_day() {
        let rule = DateRule::Relative(RelativeOffset {
            negative: true,
            days: 1,
            ..RelativeOffset::default()
        });
        assert_eq!(
            apply_date_rule(&rule, Some(at(2023, 1, 2, 0, 0, 0))),
            Some(at(2023, 1, 1, 0, 0, 0))
        );
    }

    #[test]
    fn relative_sign_flips_whole_offset() {
        let rule = DateRule::Relative(RelativeOffset {
            negative: true,
            days: 1,
            hours: 2,
            ..RelativeOffset::default()
        });
        assert_eq!(
            apply_date_rule(&rule, Some(at(2023, 3, 10, 12, 0, 0))),
            Some(at(2023, 3, 9, 10, 0, 0))
        );
    }

    #[test]
    fn relative_rolls_over_month_boundary() {
        let rule = DateRule::Relative(RelativeOffset {
            negative: false,
            days: 1,
            hours: 1,
            ..RelativeOffset::default()
        });
        assert_eq!(
            apply_date_rule(&rule, Some(at(2023, 1, 31, 23, 30, 0))),
            Some(at(2023, 2, 2, 0, 30, 0))
        );
    }

    #[test]
    fn relative_without_original_yields_no_change() {
        let rule = DateRule::Relative(RelativeOffset {
            days: 3,
            ..RelativeOffset::default()
        });
        assert_eq!(apply_date_rule(&rule, None), None);
    }

    #[test]
    fn total_seconds_round_trips() {
        let offset = RelativeOffset {
            negative: true,
            days: 2,
            hours: 3,
            minutes: 4,
            seconds: 5,
        };
        let total = offset.total_seconds();
        assert_eq!(total, -(2 * 86_400 + 3 * 3_600 + 4 * 60 + 5));
        assert_eq!(RelativeOffset::from_total_seconds(total), offset);
        assert_eq!(RelativeOffset::from_total_seconds(0), RelativeOffset::default());
    }
}
