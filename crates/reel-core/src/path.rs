use crate::movie_id::MovieId;
use std::fmt::Display;

/// Name of the collection holding movie records.
pub const MOVIES: &str = "movies";

/// A slash-separated location in the document store.
///
/// Paths are built from validated segments, so a `DbPath` never contains
/// empty segments or characters the store would reject.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DbPath(Vec<String>);

impl DbPath {
    /// The root of the store.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// The `movies` collection root.
    pub fn movies() -> Self {
        Self(vec![MOVIES.to_owned()])
    }

    /// The location of a single movie record, `movies/{id}`.
    pub fn movie(id: &MovieId) -> Self {
        Self::movies().child(id)
    }

    /// Returns a new path with `segment` appended.
    pub fn child(&self, segment: &MovieId) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.as_str().to_owned());
        Self(segments)
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for DbPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}
