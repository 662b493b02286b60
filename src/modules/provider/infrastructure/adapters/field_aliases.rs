//! Field probing for loosely-typed upstream payloads
//!
//! Episode and stream sources name the same field differently (and change
//! names between versions). Each adapter declares ordered alias lists; the
//! first alias holding a non-null value wins.

use serde_json::Value;

use crate::modules::provider::domain::entities::raw_episode::RawEpisode;

/// Ordered candidate names for each episode field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldAliases {
    pub id: &'static [&'static str],
    pub number: &'static [&'static str],
    pub title: &'static [&'static str],
    pub air_date: &'static [&'static str],
}

impl FieldAliases {
    /// Aliases seen across the primary episode source's sub-providers
    pub const ANIFY: FieldAliases = FieldAliases {
        id: &["id", "episodeId", "episode_id"],
        number: &["number", "episode", "episodeNumber", "episode_number", "mal_id"],
        title: &["title", "name"],
        air_date: &["airDate", "air_date", "aired", "airdate", "createdAt", "releaseDate"],
    };

    pub const JIKAN: FieldAliases = FieldAliases {
        id: &["mal_id"],
        number: &["mal_id", "episode", "number"],
        title: &["title", "title_romanji"],
        air_date: &["aired"],
    };

    /// Read one episode object. `position` is its 1-based index in the list,
    /// used when no number field is present at all.
    pub fn raw_episode(&self, value: &Value, position: usize) -> RawEpisode {
        let number = match first_field(value, self.number) {
            Some(raw) => coerce_episode_number(raw),
            None => u32::try_from(position).unwrap_or(0),
        };

        RawEpisode {
            id: first_string(value, self.id),
            number,
            title: first_string(value, self.title),
            air_date: first_string(value, self.air_date),
        }
    }

    pub fn raw_episodes(&self, values: &[Value]) -> Vec<RawEpisode> {
        values
            .iter()
            .enumerate()
            .map(|(index, value)| self.raw_episode(value, index + 1))
            .collect()
    }
}

/// First alias present on `value` with a non-null value
pub fn first_field<'a>(value: &'a Value, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|alias| value.get(*alias))
        .find(|field| !field.is_null())
}

/// First alias holding a non-blank string; numbers are rendered as text
pub fn first_string(value: &Value, aliases: &[&str]) -> Option<String> {
    aliases.iter().find_map(|alias| match value.get(*alias)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

pub fn first_bool(value: &Value, aliases: &[&str]) -> Option<bool> {
    aliases
        .iter()
        .find_map(|alias| value.get(*alias).and_then(Value::as_bool))
}

/// First alias holding an array
pub fn first_array<'a>(value: &'a Value, aliases: &[&str]) -> Option<&'a Vec<Value>> {
    aliases
        .iter()
        .find_map(|alias| value.get(*alias).and_then(Value::as_array))
}

/// Positive integral episode number, or 0 when the value is not one
pub fn coerce_episode_number(raw: &Value) -> u32 {
    let parsed = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(n) if n.is_finite() && n >= 1.0 && n.fract() == 0.0 && n <= u32::MAX as f64 => {
            n as u32
        }
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_field_skips_null_and_missing() {
        let value = json!({ "number": null, "episode": 4 });
        let found = first_field(&value, &["episodeNumber", "number", "episode"]);
        assert_eq!(found, Some(&json!(4)));
    }

    #[test]
    fn test_first_string_renders_numbers() {
        let value = json!({ "id": 123, "title": "  " , "name": "Pilot" });
        assert_eq!(first_string(&value, &["id"]).as_deref(), Some("123"));
        assert_eq!(first_string(&value, &["title", "name"]).as_deref(), Some("Pilot"));
        assert_eq!(first_string(&value, &["missing"]), None);
    }

    #[test]
    fn test_coerce_episode_number() {
        assert_eq!(coerce_episode_number(&json!(3)), 3);
        assert_eq!(coerce_episode_number(&json!("12")), 12);
        assert_eq!(coerce_episode_number(&json!(" 7 ")), 7);
        assert_eq!(coerce_episode_number(&json!(2.0)), 2);
        assert_eq!(coerce_episode_number(&json!(2.5)), 0);
        assert_eq!(coerce_episode_number(&json!("special")), 0);
        assert_eq!(coerce_episode_number(&json!(0)), 0);
        assert_eq!(coerce_episode_number(&json!(-1)), 0);
        assert_eq!(coerce_episode_number(&json!(true)), 0);
    }

    #[test]
    fn test_missing_number_falls_back_to_position() {
        let episodes = vec![
            json!({ "episodeId": "x-1", "name": "One" }),
            json!({ "episodeId": "x-2", "number": "OVA" }),
            json!({ "episode_id": "x-3", "episode_number": "3", "air_date": "2024-01-01" }),
        ];
        let raw = FieldAliases::ANIFY.raw_episodes(&episodes);

        assert_eq!(raw[0].number, 1);
        assert_eq!(raw[0].id.as_deref(), Some("x-1"));
        assert_eq!(raw[0].title.as_deref(), Some("One"));
        assert_eq!(raw[1].number, 0);
        assert_eq!(raw[2].number, 3);
        assert_eq!(raw[2].air_date.as_deref(), Some("2024-01-01"));
    }

    #[test]
    fn test_jikan_aliases() {
        let episode = json!({ "mal_id": 5, "title": "Five", "aired": "2013-05-05T00:00:00+00:00" });
        let raw = FieldAliases::JIKAN.raw_episode(&episode, 1);
        assert_eq!(raw.number, 5);
        assert_eq!(raw.id.as_deref(), Some("5"));
        assert_eq!(raw.air_date.as_deref(), Some("2013-05-05T00:00:00+00:00"));
    }
}
