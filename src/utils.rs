use chrono::{DateTime, NaiveDate};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Reads a birth date as `YYYY-MM-DD`, or takes the date part of an RFC 3339
/// timestamp such as `2000-05-01T00:00:00Z`.
pub fn parse_date(value: &str) -> Result<NaiveDate, chrono::ParseError> {
    let value = value.trim();

    match NaiveDate::parse_from_str(value, DATE_FORMAT) {
        Ok(date) => Ok(date),
        Err(err) => DateTime::parse_from_rfc3339(value)
            .map(|timestamp| timestamp.date_naive())
            .map_err(|_| err),
    }
}

pub mod birth_date_format {
    use chrono::NaiveDate;
    use serde::{self, Deserialize, Deserializer, Serializer};

    use super::{parse_date, DATE_FORMAT};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = format!("{}", date.format(DATE_FORMAT));
        serializer.serialize_str(&s)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;

        parse_date(&s).map_err(|err| {
            serde::de::Error::custom(format!("invalid birth date {:?}: {}", s, err))
        })
    }
}
