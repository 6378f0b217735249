//! Bug and contributor records.
//!
//! [`BugRecord`] mirrors one entry of `Bug.json` exactly as published.
//! [`BugSnapshot`] is the normalized form a view holds: it can only be built
//! through [`BugSnapshot::normalize`], so every image and photo path it
//! exposes is either the placeholder or absolute-rooted.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};
use crate::id::BugId;
use crate::paths::{normalize_asset_paths, normalize_photo_path};

/// One entry of the published bug list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BugRecord {
    /// Identifier; non-string ids are kept as `None` and never match.
    #[serde(default, deserialize_with = "string_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// ISO-8601 date or date-time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Markdown body, preferred over `description`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Screenshot paths in display order.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub images: Vec<String>,
    /// Contributors in display order.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub students: Vec<ContributorRecord>,
}

/// A contributor as published in `Bug.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContributorRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
}

fn string_id<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(id)) => Some(id),
        _ => None,
    })
}

fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl BugRecord {
    /// Decode one list entry.
    pub fn from_value(value: &serde_json::Value) -> Result<Self> {
        Ok(Self::deserialize(value)?)
    }
}

/// The published bug list.
///
/// Only the array shape is checked up front. Entries stay undecoded until
/// asked for, so a wrongly typed field in one bug never affects another.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BugList {
    entries: Vec<serde_json::Value>,
}

impl BugList {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// String id of every entry, in order; `None` when absent or not a string.
    pub fn ids(&self) -> impl Iterator<Item = Option<&str>> + '_ {
        self.entries.iter().map(entry_id)
    }

    /// Decode the first entry whose id equals `id`.
    ///
    /// `None` when no entry matches. Only the matched entry is decoded.
    pub fn find(&self, id: &BugId) -> Option<Result<BugRecord>> {
        self.entries
            .iter()
            .find(|entry| id.matches(entry_id(entry)))
            .map(BugRecord::from_value)
    }

    /// Decode every entry independently, in order.
    pub fn records(&self) -> impl Iterator<Item = Result<BugRecord>> + '_ {
        self.entries.iter().map(BugRecord::from_value)
    }
}

fn entry_id(entry: &serde_json::Value) -> Option<&str> {
    entry.get("id").and_then(serde_json::Value::as_str)
}

/// Parse a response body as a bug list. Anything but a JSON array is an error.
pub fn parse_bug_list(body: &str) -> Result<BugList> {
    Ok(BugList {
        entries: serde_json::from_str(body)?,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// A contributor after normalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contributor {
    name: Option<String>,
    photo: String,
    linkedin: Option<String>,
}

impl Contributor {
    fn normalize(record: ContributorRecord) -> Self {
        Self {
            photo: normalize_photo_path(record.photo.as_deref()),
            name: non_empty(record.name),
            linkedin: non_empty(record.linkedin),
        }
    }

    /// Contributor name, if one was published.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Normalized photo path (placeholder when none was published).
    pub fn photo(&self) -> &str {
        &self.photo
    }

    /// LinkedIn profile URL, if one was published.
    pub fn linkedin(&self) -> Option<&str> {
        self.linkedin.as_deref()
    }
}

/// Immutable, normalized view of one bug.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BugSnapshot {
    id: BugId,
    title: Option<String>,
    date: Option<String>,
    content: Option<String>,
    description: Option<String>,
    images: Vec<String>,
    contributors: Vec<Contributor>,
}

impl BugSnapshot {
    /// Normalize a record into a displayable snapshot.
    ///
    /// Image paths are rooted, missing photos become the placeholder and
    /// empty strings are treated as absent.
    pub fn normalize(record: BugRecord) -> Result<Self> {
        let id = record.id.map(BugId::from).ok_or(Error::MissingId)?;
        Ok(Self {
            id,
            title: non_empty(record.title),
            date: non_empty(record.date),
            content: non_empty(record.content),
            description: non_empty(record.description),
            images: normalize_asset_paths(&record.images),
            contributors: record
                .students
                .into_iter()
                .map(Contributor::normalize)
                .collect(),
        })
    }

    pub fn id(&self) -> &BugId {
        &self.id
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Normalized screenshot paths in display order.
    pub fn images(&self) -> &[String] {
        &self.images
    }

    /// Normalized contributors in display order.
    pub fn contributors(&self) -> &[Contributor] {
        &self.contributors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::PLACEHOLDER_PATH;

    fn find(body: &str, id: &str) -> Option<Result<BugRecord>> {
        parse_bug_list(body).unwrap().find(&BugId::from(id))
    }

    #[test]
    fn test_minimal_record_parses() {
        let record = find(r#"[{"id":"1","title":"T"}]"#, "1").unwrap().unwrap();
        assert_eq!(record.id.as_deref(), Some("1"));
        assert_eq!(record.title.as_deref(), Some("T"));
        assert!(record.images.is_empty());
        assert!(record.students.is_empty());
    }

    #[test]
    fn test_null_collections_are_empty() {
        let record = find(r#"[{"id":"1","images":null,"students":null}]"#, "1")
            .unwrap()
            .unwrap();
        assert!(record.images.is_empty());
        assert!(record.students.is_empty());
    }

    #[test]
    fn test_numeric_id_never_matches() {
        let list = parse_bug_list(r#"[{"id":1,"title":"numeric"},{"title":"none"}]"#).unwrap();
        assert_eq!(list.ids().collect::<Vec<_>>(), vec![None, None]);
        assert!(list.find(&BugId::from("1")).is_none());
        let decoded = list.records().next().unwrap().unwrap();
        assert_eq!(decoded.id, None);
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let record = find(r#"[{"id":"a","severity":"high","tags":["x"]}]"#, "a")
            .unwrap()
            .unwrap();
        assert_eq!(record.id.as_deref(), Some("a"));
    }

    #[test]
    fn test_non_array_body_is_error() {
        assert!(parse_bug_list(r#"{"id":"1"}"#).is_err());
        assert!(parse_bug_list("not json").is_err());
        assert!(parse_bug_list("null").is_err());
    }

    #[test]
    fn test_bad_field_in_other_entry_is_ignored() {
        let bodies = [
            r#"[{"id":"1","title":"T"},{"id":"2","date":20240105}]"#,
            r#"[{"id":"2","title":5},{"id":"1","title":"T"}]"#,
            r#"[{"id":"1","title":"T"},{"id":"2","images":[null]}]"#,
            r#"[{"id":"1","title":"T"},{"id":"2","students":[null]},"junk",7]"#,
        ];
        for body in bodies {
            let record = find(body, "1").unwrap().unwrap();
            assert_eq!(record.title.as_deref(), Some("T"), "{body}");
        }
    }

    #[test]
    fn test_bad_field_in_selected_entry_is_error() {
        let found = find(r#"[{"id":"1","images":[3]}]"#, "1").unwrap();
        assert!(matches!(found, Err(Error::Json(_))));
    }

    #[test]
    fn test_find_returns_first_match() {
        let found = find(r#"[{"id":"1","title":"first"},{"id":"1","title":"second"}]"#, "1")
            .unwrap()
            .unwrap();
        assert_eq!(found.title.as_deref(), Some("first"));
    }

    #[test]
    fn test_snapshot_normalizes_paths() {
        let record = BugRecord {
            id: Some("7".to_string()),
            images: vec!["./a.png".into(), "b.png".into(), "/c.png".into()],
            students: vec![
                ContributorRecord {
                    name: Some("Ada".into()),
                    photo: Some("img/ada.jpg".into()),
                    linkedin: Some("https://linkedin.com/in/ada".into()),
                },
                ContributorRecord::default(),
            ],
            ..Default::default()
        };
        let snapshot = BugSnapshot::normalize(record).unwrap();
        assert_eq!(snapshot.images(), ["/a.png", "/b.png", "/c.png"]);
        assert_eq!(snapshot.contributors()[0].photo(), "/img/ada.jpg");
        assert_eq!(snapshot.contributors()[1].photo(), PLACEHOLDER_PATH);
        assert_eq!(snapshot.contributors()[1].name(), None);
    }

    #[test]
    fn test_snapshot_treats_empty_strings_as_absent() {
        let record = BugRecord {
            id: Some("1".into()),
            title: Some(String::new()),
            content: Some(String::new()),
            description: Some("plain".into()),
            ..Default::default()
        };
        let snapshot = BugSnapshot::normalize(record).unwrap();
        assert_eq!(snapshot.title(), None);
        assert_eq!(snapshot.content(), None);
        assert_eq!(snapshot.description(), Some("plain"));
    }

    #[test]
    fn test_snapshot_requires_id() {
        let err = BugSnapshot::normalize(BugRecord::default()).unwrap_err();
        assert!(matches!(err, Error::MissingId));
    }
}
