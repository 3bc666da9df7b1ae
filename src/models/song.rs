use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `GET /count`.
#[derive(Deserialize, Serialize, Debug)]
pub struct SongCount {
    pub count: u64,
}

/// Body of `GET /song`. Documents are opaque to the API, so they stay
/// untyped JSON.
#[derive(Deserialize, Serialize, Debug)]
pub struct SongList {
    pub songs: Vec<Value>,
}

/// Body of a successful `POST /song`. The key carries a space for
/// compatibility with existing clients.
#[derive(Deserialize, Serialize, Debug)]
pub struct InsertedSong {
    #[serde(rename = "inserted id")]
    pub inserted_id: Value,
}

/// Parses a client-supplied song id out of a JSON value. Accepts an integer
/// or a string holding one; everything else is rejected.
pub fn song_id_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integer_ids_parse() {
        assert_eq!(song_id_from_value(&json!(7)), Some(7));
    }

    #[test]
    fn numeric_strings_parse() {
        assert_eq!(song_id_from_value(&json!(" 42 ")), Some(42));
    }

    #[test]
    fn non_integers_are_rejected() {
        assert_eq!(song_id_from_value(&json!("seven")), None);
        assert_eq!(song_id_from_value(&json!(3.5)), None);
        assert_eq!(song_id_from_value(&json!(null)), None);
        assert_eq!(song_id_from_value(&json!([7])), None);
    }
}
