//! 日時表現
//!
//! バックエンドは日時を2通りで返す:
//! - `[2024, 3, 5, 14, 7, 30]` のような整数配列（秒・ナノ秒は省略されることがある）
//! - ISO 8601 文字列
//!
//! どちらも [`Timestamp`] に読み込み、[`Timestamp::to_datetime`] で一本化して変換する。

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::de::{self, Error as _, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// 表示できない日時の代替文字列
pub const DATE_UNAVAILABLE: &str = "Date unavailable";

/// 年月日時分秒
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateParts {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

/// サーバーから受け取る日時
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Timestamp {
    Components(DateParts),
    Iso8601(String),
}

impl Timestamp {
    /// 日時へ変換（不正な値はNone）
    pub fn to_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Timestamp::Components(p) => NaiveDate::from_ymd_opt(p.year, p.month, p.day)
                .and_then(|d| d.and_hms_opt(p.hour, p.minute, p.second)),
            Timestamp::Iso8601(s) => parse_iso8601(s),
        }
    }

    /// 一覧表示用の書式（例: "Mar 5, 2024, 02:07 PM"）
    pub fn display(&self) -> String {
        self.to_datetime()
            .map(|dt| dt.format("%b %-d, %Y, %I:%M %p").to_string())
            .unwrap_or_else(|| DATE_UNAVAILABLE.to_string())
    }
}

fn parse_iso8601(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// 省略可能な日時フィールドの表示
pub fn display_optional(ts: Option<&Timestamp>) -> String {
    ts.map(Timestamp::display)
        .unwrap_or_else(|| DATE_UNAVAILABLE.to_string())
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Timestamp::Components(p) => {
                let mut seq = serializer.serialize_seq(Some(6))?;
                seq.serialize_element(&p.year)?;
                seq.serialize_element(&p.month)?;
                seq.serialize_element(&p.day)?;
                seq.serialize_element(&p.hour)?;
                seq.serialize_element(&p.minute)?;
                seq.serialize_element(&p.second)?;
                seq.end()
            }
            Timestamp::Iso8601(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TimestampVisitor)
    }
}

struct TimestampVisitor;

impl<'de> Visitor<'de> for TimestampVisitor {
    type Value = Timestamp;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an ISO 8601 string or an array of 3 to 7 integers")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Timestamp, E> {
        Ok(Timestamp::Iso8601(v.to_string()))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Timestamp, A::Error> {
        let mut values: Vec<i64> = Vec::with_capacity(7);
        while let Some(v) = seq.next_element::<i64>()? {
            values.push(v);
        }
        if !(3..=7).contains(&values.len()) {
            return Err(A::Error::invalid_length(values.len(), &self));
        }
        // 7番目（ナノ秒）は捨てる
        let part = |i: usize| values.get(i).copied().unwrap_or(0);
        let unsigned = |i: usize| {
            u32::try_from(part(i))
                .map_err(|_| A::Error::custom(format!("negative date part: {}", part(i))))
        };
        Ok(Timestamp::Components(DateParts {
            year: i32::try_from(part(0)).map_err(A::Error::custom)?,
            month: unsigned(1)?,
            day: unsigned(2)?,
            hour: unsigned(3)?,
            minute: unsigned(4)?,
            second: unsigned(5)?,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_components_from_array() {
        let ts: Timestamp = serde_json::from_str("[2024, 3, 5, 14, 7, 30]").unwrap();
        assert_eq!(
            ts,
            Timestamp::Components(DateParts { year: 2024, month: 3, day: 5, hour: 14, minute: 7, second: 30 })
        );
        assert_eq!(ts.display(), "Mar 5, 2024, 02:07 PM");
    }

    #[test]
    fn test_components_missing_seconds_and_nanos() {
        // 秒が0のときサーバーは5要素で返す
        let short: Timestamp = serde_json::from_str("[2023, 12, 1, 9, 0]").unwrap();
        assert_eq!(short.display(), "Dec 1, 2023, 09:00 AM");

        let long: Timestamp = serde_json::from_str("[2023, 12, 1, 9, 0, 5, 123000000]").unwrap();
        let dt = long.to_datetime().unwrap();
        assert_eq!(dt.format("%S").to_string(), "05");
    }

    #[test]
    fn test_iso_string() {
        let ts: Timestamp = serde_json::from_str("\"2024-03-05T14:07:30.123\"").unwrap();
        assert!(matches!(ts, Timestamp::Iso8601(_)));
        assert_eq!(ts.display(), "Mar 5, 2024, 02:07 PM");

        let zoned = Timestamp::Iso8601("2024-03-05T14:07:30+09:00".to_string());
        assert_eq!(zoned.display(), "Mar 5, 2024, 02:07 PM");
    }

    #[test]
    fn test_unavailable() {
        assert_eq!(Timestamp::Iso8601("yesterday".into()).display(), DATE_UNAVAILABLE);
        let bad_month: Timestamp = serde_json::from_str("[2024, 13, 1]").unwrap();
        assert_eq!(bad_month.display(), DATE_UNAVAILABLE);
        assert_eq!(display_optional(None), DATE_UNAVAILABLE);
    }

    #[test]
    fn test_rejects_short_array() {
        assert!(serde_json::from_str::<Timestamp>("[2024, 3]").is_err());
    }

    #[test]
    fn test_serialize_keeps_shape() {
        let ts: Timestamp = serde_json::from_str("[2024, 3, 5, 14, 7, 30]").unwrap();
        assert_eq!(serde_json::to_string(&ts).unwrap(), "[2024,3,5,14,7,30]");
        let iso = Timestamp::Iso8601("2024-03-05".into());
        assert_eq!(serde_json::to_string(&iso).unwrap(), "\"2024-03-05\"");
    }
}
