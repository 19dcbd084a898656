use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub const ANONYMOUS: &str = "Anonymous";

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: i64,
    pub title: String,
    pub subject: String,
    pub semester: i32,
    #[serde(rename = "type")]
    pub kind: ResourceType,
    pub file_name: String,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(deserialize_with = "deserialize_upload_date")]
    pub upload_date: DateTime<Utc>,
    #[serde(default)]
    pub download_count: Option<u64>,
    #[serde(default)]
    pub uploader_name: Option<String>,
}

impl Resource {
    /// Uploader name, or "Anonymous" when absent or blank.
    pub fn uploader(&self) -> &str {
        match self.uploader_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => ANONYMOUS,
        }
    }

    pub fn downloads(&self) -> u64 {
        self.download_count.unwrap_or(0)
    }
}

/// Resource category tag. Tags the client does not know are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResourceType {
    Notes,
    Papers,
    Books,
    Other,
    Unknown(String),
}

impl ResourceType {
    pub fn as_str(&self) -> &str {
        match self {
            ResourceType::Notes => "notes",
            ResourceType::Papers => "papers",
            ResourceType::Books => "books",
            ResourceType::Other => "other",
            ResourceType::Unknown(tag) => tag,
        }
    }
}

impl From<String> for ResourceType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "notes" => ResourceType::Notes,
            "papers" => ResourceType::Papers,
            "books" => ResourceType::Books,
            "other" => ResourceType::Other,
            _ => ResourceType::Unknown(tag),
        }
    }
}

impl From<ResourceType> for String {
    fn from(kind: ResourceType) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses RFC 3339 timestamps, or the backend's zone-less `LocalDateTime` form read as UTC.
pub fn parse_upload_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

fn deserialize_upload_date<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_upload_date(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid uploadDate: {raw}")))
}

pub mod download;
pub mod fetch;
pub mod filter;
pub mod format;
pub mod render;
pub mod stats;
pub mod upload;


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_backend_record() {
        let json = r#"{
            "id": 7,
            "title": "Compiler Design",
            "subject": "CD",
            "semester": 6,
            "type": "notes",
            "fileName": "cd.pdf",
            "filePath": "uploads/1700000000_cd.pdf",
            "fileSize": 4096,
            "uploadDate": "2026-10-18T09:30:15.123456",
            "downloadCount": 3,
            "uploaderName": null
        }"#;
        let resource: Resource = serde_json::from_str(json).unwrap();
        assert_eq!(resource.kind, ResourceType::Notes);
        assert_eq!(resource.file_size, Some(4096));
        assert_eq!(resource.uploader(), ANONYMOUS);
        assert_eq!(resource.upload_date.to_rfc3339(), "2026-10-18T09:30:15.123456+00:00");
    }

    #[test]
    fn test_unknown_type_tag_is_preserved() {
        let kind = ResourceType::from("unknown_tag".to_string());
        assert_eq!(kind, ResourceType::Unknown("unknown_tag".to_string()));
        assert_eq!(kind.as_str(), "unknown_tag");
    }

    #[test]
    fn test_missing_title_is_rejected() {
        let json = r#"{"id": 1, "subject": "OS", "semester": 1, "type": "notes",
            "fileName": "a.pdf", "uploadDate": "2026-10-18T09:30:15"}"#;
        assert!(serde_json::from_str::<Resource>(json).is_err());
    }

    #[test]
    fn test_parse_upload_date_rfc3339() {
        let dt = parse_upload_date("2026-10-18T09:30:15+02:00").unwrap();
        assert_eq!(dt.to_rfc3339(), "2026-10-18T07:30:15+00:00");
        assert!(parse_upload_date("yesterday").is_none());
    }
}
