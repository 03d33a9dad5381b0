//! Lenient serde adapters for backend date, time and number fields.

/// `fecha`: `YYYY-MM-DD` or a full ISO timestamp, of which only the date is kept.
pub mod date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_str(&d.format("%Y-%m-%d").to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        Ok(raw.as_deref().and_then(parse))
    }

    pub fn parse(raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        let day = raw.get(..10).unwrap_or(raw);
        match NaiveDate::parse_from_str(day, "%Y-%m-%d") {
            Ok(d) => Some(d),
            Err(_) => {
                tracing::warn!("Ignoring unparseable date: {:?}", raw);
                None
            }
        }
    }
}

/// `horaInicio` / `horaFin`: `HH:MM` or `HH:MM:SS`.
pub mod time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<NaiveTime>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(t) => s.serialize_str(&t.format("%H:%M").to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        Ok(raw.as_deref().and_then(parse))
    }

    pub fn parse(raw: &str) -> Option<NaiveTime> {
        let raw = raw.trim();
        let parsed = NaiveTime::parse_from_str(raw, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"));
        match parsed {
            Ok(t) => Some(t),
            Err(_) => {
                tracing::warn!("Ignoring unparseable time: {:?}", raw);
                None
            }
        }
    }
}

/// Small integers the backend sends either as numbers or numeric strings.
pub mod lenient_u16 {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(u16),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u16>, D::Error> {
        let raw: Option<NumberOrString> = Option::deserialize(d)?;
        Ok(match raw {
            Some(NumberOrString::Number(n)) => Some(n),
            Some(NumberOrString::Text(s)) => s.trim().parse().ok(),
            None => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    #[test]
    fn test_parse_date_variants() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 1);
        assert_eq!(date::parse("2025-03-01"), expected);
        assert_eq!(date::parse("2025-03-01T05:00:00.000Z"), expected);
        assert_eq!(date::parse("01/03/2025"), None);
        assert_eq!(date::parse(""), None);
    }

    #[test]
    fn test_parse_time_variants() {
        assert_eq!(time::parse("08:30"), NaiveTime::from_hms_opt(8, 30, 0));
        assert_eq!(time::parse("08:30:15"), NaiveTime::from_hms_opt(8, 30, 15));
        assert_eq!(time::parse("8h30"), None);
    }
}
