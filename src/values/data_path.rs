use crate::imports::*;

/*
    DataPath - Address of a node in the DataStore, e.g. "Image/Cell Data/Phases"

    The empty path is the store root. Segments are never empty and never contain
    the separator, so parse(to_string(p)) == p holds for every constructed path.
*/
pub const PATH_SEPARATOR: char = '/';

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DataPath {
    segments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataPathError {
    #[error("data path '{path}' contains an empty segment at position {position}")]
    EmptySegment { path: String, position: usize },
    #[error("segment '{segment}' is not a valid data object name: {reason}")]
    InvalidSegment { segment: String, reason: String },
}

impl DataPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_segments<I, S>(segments: I) -> std::result::Result<Self, DataPathError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments = segments
            .into_iter()
            .map(Into::into)
            .collect::<Vec<String>>();
        for segment in &segments {
            check_segment(segment)?;
        }
        Ok(DataPath { segments })
    }

    pub fn parse(text: &str) -> std::result::Result<Self, DataPathError> {
        if text.is_empty() {
            return Ok(Self::root());
        }
        let mut segments = Vec::new();
        for (position, segment) in text.split(PATH_SEPARATOR).enumerate() {
            if segment.is_empty() {
                return Err(DataPathError::EmptySegment {
                    path: text.to_string(),
                    position,
                });
            }
            check_segment(segment)?;
            segments.push(segment.to_string());
        }
        Ok(DataPath { segments })
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Last segment, `None` for the root.
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Parent path, `None` for the root.
    pub fn parent(&self) -> Option<DataPath> {
        if self.is_root() {
            return None;
        }
        Some(DataPath {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    pub fn child(&self, segment: impl Into<String>) -> std::result::Result<Self, DataPathError> {
        let segment = segment.into();
        check_segment(&segment)?;
        let mut path = self.clone();
        path.segments.push(segment);
        Ok(path)
    }

    /// Same parent, different last segment.
    pub fn with_name(&self, name: impl Into<String>) -> std::result::Result<Self, DataPathError> {
        match self.parent() {
            Some(parent) => parent.child(name),
            None => Self::root().child(name),
        }
    }

    pub fn starts_with(&self, other: &DataPath) -> bool {
        self.segments.len() >= other.segments.len()
            && self
                .segments
                .iter()
                .zip(other.segments.iter())
                .all(|(a, b)| a == b)
    }
}

fn check_segment(segment: &str) -> std::result::Result<(), DataPathError> {
    DATA_OBJECT_NAME_POLICY
        .check(segment)
        .map_err(|reason| DataPathError::InvalidSegment {
            segment: segment.to_string(),
            reason,
        })
}

impl std::fmt::Display for DataPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for segment in &self.segments {
            if !first {
                write!(f, "{}", PATH_SEPARATOR)?;
            }
            write!(f, "{}", segment)?;
            first = false;
        }
        Ok(())
    }
}

impl std::str::FromStr for DataPath {
    type Err = DataPathError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        DataPath::parse(s)
    }
}

impl TryFrom<String> for DataPath {
    type Error = DataPathError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        DataPath::parse(&value)
    }
}

impl TryFrom<&str> for DataPath {
    type Error = DataPathError;

    fn try_from(value: &str) -> std::result::Result<Self, Self::Error> {
        DataPath::parse(value)
    }
}

impl From<DataPath> for String {
    fn from(path: DataPath) -> Self {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_is_root() {
        let path = DataPath::parse("").unwrap();
        assert!(path.is_root());
        assert_eq!(path.parent(), None);
        assert_eq!(path.to_string(), "");
    }

    #[test]
    fn parse_display_round_trip() {
        for text in ["a", "Image/Cell Data", "Image/Cell Data/Phases", "x/y/z/w"] {
            let parsed = DataPath::parse(text).unwrap();
            assert_eq!(parsed.to_string(), text);
            assert_eq!(DataPath::parse(&parsed.to_string()).unwrap(), parsed);
        }
    }

    #[test]
    fn empty_segments_rejected() {
        assert!(matches!(
            DataPath::parse("a//b"),
            Err(DataPathError::EmptySegment { position: 1, .. })
        ));
        assert!(DataPath::parse("/a").is_err());
        assert!(DataPath::parse("a/").is_err());
        assert!(DataPath::root().child("").is_err());
    }

    #[test]
    fn child_and_parent_compose() {
        let group = DataPath::parse("Image").unwrap();
        let array = group.child("Phases").unwrap();
        assert_eq!(array.to_string(), "Image/Phases");
        assert_eq!(array.parent(), Some(group));
        assert_eq!(array.name(), Some("Phases"));
        assert_eq!(array.depth(), 2);
    }

    #[test]
    fn child_rejects_separator() {
        let err = DataPath::root().child("a/b").unwrap_err();
        assert!(matches!(err, DataPathError::InvalidSegment { .. }));
    }

    #[test]
    fn with_name_replaces_last_segment() {
        let path = DataPath::parse("a/b/c").unwrap();
        assert_eq!(path.with_name("d").unwrap().to_string(), "a/b/d");
        let top = DataPath::parse("a").unwrap();
        assert_eq!(top.with_name("z").unwrap().to_string(), "z");
    }

    #[test]
    fn equality_and_hash_follow_segments() {
        let mut set = HashSet::new();
        set.insert(DataPath::parse("a/b").unwrap());
        assert!(set.contains(&DataPath::from_segments(["a", "b"]).unwrap()));
        assert!(!set.contains(&DataPath::parse("a").unwrap()));
    }

    #[test]
    fn starts_with_prefix() {
        let path = DataPath::parse("a/b/c").unwrap();
        assert!(path.starts_with(&DataPath::parse("a/b").unwrap()));
        assert!(path.starts_with(&DataPath::root()));
        assert!(!path.starts_with(&DataPath::parse("a/c").unwrap()));
    }

    #[test]
    fn serde_uses_string_form() {
        let path = DataPath::parse("Group/Array").unwrap();
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, "\"Group/Array\"");
        let back: DataPath = serde_json::from_str(&json).unwrap();
        assert_eq!(back, path);
        assert!(serde_json::from_str::<DataPath>("\"a//b\"").is_err());
    }
}
