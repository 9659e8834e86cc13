//! YAML output
//!
//! Same structure as the JSON output, laid out for people to read.

use crate::output::traits::{RecordSerializer, SerializeResult};
use crate::record::PageRecord;

#[derive(Debug, Clone, Copy, Default)]
pub struct YamlSerializer;

impl RecordSerializer for YamlSerializer {
    fn extension(&self) -> &str {
        "yaml"
    }

    fn serialize(&self, record: &PageRecord) -> SerializeResult<Vec<u8>> {
        Ok(serde_yaml::to_string(record)?.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::User;
    use chrono::{TimeZone, Utc};

    fn sample_user() -> PageRecord {
        PageRecord::User(User {
            user_id: 12,
            user_name: "bob".to_string(),
            reg_time: Utc.with_ymd_and_hms(2020, 1, 1, 16, 0, 0).unwrap(),
            avatar: "data:image/gif;base64,R0lGOD".to_string(),
            url: Some("https://bob.example.com".to_string()),
            about: None,
        })
    }

    #[test]
    fn test_yaml_decodes_to_same_record() {
        let record = sample_user();
        let bytes = YamlSerializer.serialize(&record).unwrap();
        let decoded: PageRecord = serde_yaml::from_slice(&bytes).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_yaml_uses_archive_field_names() {
        let bytes = YamlSerializer.serialize(&sample_user()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("userID: 12"));
        assert!(text.contains("userName: bob"));
    }
}
