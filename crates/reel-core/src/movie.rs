use crate::movie_id::MovieId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const GENRE: &str = "genre";

/// A movie payload as stored in the document store.
///
/// Only a string `genre` is interpreted; every other field, including a
/// `genre` of any other type, is carried through untouched in `fields`.
/// The payload does not necessarily contain its own key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct MovieRecord {
    pub genre: Option<String>,
    pub fields: Map<String, Value>,
}

impl From<Map<String, Value>> for MovieRecord {
    fn from(mut fields: Map<String, Value>) -> Self {
        let genre = match fields.remove(GENRE) {
            Some(Value::String(genre)) => Some(genre),
            Some(other) => {
                fields.insert(GENRE.to_string(), other);
                None
            }
            None => None,
        };
        Self { genre, fields }
    }
}

impl From<MovieRecord> for Map<String, Value> {
    fn from(record: MovieRecord) -> Self {
        let mut map = record.fields;
        if let Some(genre) = record.genre {
            map.insert(GENRE.to_string(), Value::String(genre));
        }
        map
    }
}

impl MovieRecord {
    pub fn new(genre: impl Into<String>) -> Self {
        Self {
            genre: Some(genre.into()),
            fields: Map::new(),
        }
    }

    /// Adds a descriptive field, replacing any previous value.
    ///
    /// A string `genre` replaces the typed genre; a `genre` of any other
    /// type clears it and is kept as an opaque field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        let value = value.into();
        if key == GENRE {
            self.fields.remove(GENRE);
            self.genre = None;
            match value {
                Value::String(genre) => self.genre = Some(genre),
                other => {
                    self.fields.insert(key, other);
                }
            }
        } else {
            self.fields.insert(key, value);
        }
        self
    }

    /// Attaches the key the record was read from.
    ///
    /// Any `id` field inside the payload is dropped: the lookup key is the
    /// only identifier callers ever see.
    pub fn into_movie(mut self, id: MovieId) -> Movie {
        self.fields.remove("id");
        Movie { id, record: self }
    }
}

/// A movie record together with the key it is stored under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    #[serde(flatten)]
    pub record: MovieRecord,
}

impl Movie {
    pub fn genre(&self) -> Option<&str> {
        self.record.genre.as_deref()
    }
}
