//! Wire types for the Yummy backend
//!
//! The backend serializes missing profile strings as `null`; every text
//! field here deserializes `null` and absence to an empty string.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::avatar::StagedFile;
use crate::error::Result;

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn empty_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.is_empty()))
}

/// Accepts RFC 3339 timestamps and naive ones (read as UTC).
fn flexible_timestamp<'de, D>(deserializer: D) -> std::result::Result<DateTime<FixedOffset>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(ts);
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc().fixed_offset())
        .map_err(|e| serde::de::Error::custom(format!("invalid timestamp {}: {}", raw, e)))
}

/// Body of `GET` and `PATCH` on the my-profile endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileResponse {
    /// First name
    #[serde(default, deserialize_with = "null_as_empty")]
    pub first_name: String,
    /// Last name
    #[serde(default, deserialize_with = "null_as_empty")]
    pub last_name: String,
    /// Phone number
    #[serde(default, deserialize_with = "null_as_empty")]
    pub phone_number: String,
    /// Avatar URL or path; may point at the backend's default image
    #[serde(default, deserialize_with = "empty_as_none")]
    pub image: Option<String>,
}

/// Body of `GET` on the basic account profile endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountProfile {
    /// First name
    #[serde(default, deserialize_with = "null_as_empty")]
    pub first_name: String,
    /// Last name
    #[serde(default, deserialize_with = "null_as_empty")]
    pub last_name: String,
    /// Login email
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    /// Phone number
    #[serde(default, deserialize_with = "null_as_empty")]
    pub phone_number: String,
}

/// One of the user's reservations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    /// Backend identifier
    pub id: i64,
    /// Reserved day
    pub date: NaiveDate,
    /// Reserved time of day
    pub time: NaiveTime,
    /// Party size
    pub people: u32,
    /// When the reservation was made
    #[serde(deserialize_with = "flexible_timestamp")]
    pub created_date: DateTime<FixedOffset>,
    /// Contact email
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    /// Contact phone, when the profile had one
    #[serde(default, deserialize_with = "empty_as_none")]
    pub phone: Option<String>,
}

/// What the `image` part of a profile update carries
#[derive(Debug, Clone, Default)]
pub enum ImageField {
    /// No `image` part; the backend keeps the current avatar
    #[default]
    Omit,
    /// Empty `image` part; the backend removes the avatar
    Clear,
    /// Binary `image` part with the staged file
    Upload(StagedFile),
}

/// Multipart body of a profile `PATCH`
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    /// First name, sent even when empty
    pub first_name: String,
    /// Last name, sent even when empty
    pub last_name: String,
    /// Phone number, sent even when empty
    pub phone_number: String,
    /// Avatar part
    pub image: ImageField,
}

impl ProfileUpdate {
    /// Names of the multipart parts this update will send, in order.
    pub fn part_names(&self) -> Vec<&'static str> {
        let mut names = vec!["first_name", "last_name", "phone_number"];
        if !matches!(self.image, ImageField::Omit) {
            names.push("image");
        }
        names
    }

    /// Builds the multipart form.
    ///
    /// # Errors
    ///
    /// Returns an error if the staged file carries an invalid MIME type.
    pub fn into_form(self) -> Result<reqwest::multipart::Form> {
        let form = reqwest::multipart::Form::new()
            .text("first_name", self.first_name)
            .text("last_name", self.last_name)
            .text("phone_number", self.phone_number);

        let form = match self.image {
            ImageField::Omit => form,
            ImageField::Clear => form.text("image", ""),
            ImageField::Upload(file) => {
                let part = reqwest::multipart::Part::bytes(file.bytes.to_vec())
                    .file_name(file.file_name)
                    .mime_str(&file.mime)?;
                form.part("image", part)
            }
        };
        Ok(form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn test_profile_response_nulls_become_empty() {
        let json = r#"{"first_name": null, "last_name": "Rossi", "phone_number": null, "image": null}"#;
        let profile: ProfileResponse = serde_json::from_str(json).unwrap();
        assert_eq!(profile.first_name, "");
        assert_eq!(profile.last_name, "Rossi");
        assert_eq!(profile.phone_number, "");
        assert!(profile.image.is_none());
    }

    #[test]
    fn test_profile_response_missing_fields_default() {
        let profile: ProfileResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(profile, ProfileResponse::default());
    }

    #[test]
    fn test_account_profile_parses() {
        let json = r#"{"first_name":"Ana","last_name":"","email":"ana@example.com","phone_number":"0912"}"#;
        let account: AccountProfile = serde_json::from_str(json).unwrap();
        assert_eq!(account.email, "ana@example.com");
        assert_eq!(account.phone_number, "0912");
    }

    #[test]
    fn test_reservation_parses_backend_shape() {
        let json = r#"{
            "id": 7,
            "date": "2025-03-01",
            "time": "13:00:00",
            "people": 2,
            "created_date": "2025-02-20T09:15:30.123456Z",
            "email": "customer@example.com",
            "phone": "09123456789"
        }"#;
        let r: Reservation = serde_json::from_str(json).unwrap();
        assert_eq!(r.id, 7);
        assert_eq!(r.date, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(r.time, NaiveTime::from_hms_opt(13, 0, 0).unwrap());
        assert_eq!(r.people, 2);
        assert_eq!(r.phone.as_deref(), Some("09123456789"));
    }

    #[test]
    fn test_reservation_accepts_naive_timestamp_and_missing_phone() {
        let json = r#"{
            "id": 1,
            "date": "2025-03-01",
            "time": "18:30:00",
            "people": 4,
            "created_date": "2025-02-20T09:15:30",
            "email": "customer@example.com"
        }"#;
        let r: Reservation = serde_json::from_str(json).unwrap();
        assert_eq!(r.created_date.offset().local_minus_utc(), 0);
        assert!(r.phone.is_none());
    }

    #[test]
    fn test_reservation_empty_phone_is_none() {
        let json = r#"{"id":1,"date":"2025-03-01","time":"18:30:00","people":4,
            "created_date":"2025-02-20T09:15:30+03:30","email":"a@b.c","phone":""}"#;
        let r: Reservation = serde_json::from_str(json).unwrap();
        assert!(r.phone.is_none());
        assert_eq!(r.created_date.offset().local_minus_utc(), 3 * 3600 + 1800);
    }

    #[test]
    fn test_update_without_image_omits_part() {
        let update = ProfileUpdate {
            phone_number: "09120000000".to_string(),
            ..ProfileUpdate::default()
        };
        assert_eq!(
            update.part_names(),
            vec!["first_name", "last_name", "phone_number"]
        );
        assert!(update.into_form().is_ok());
    }

    #[test]
    fn test_update_with_clear_or_upload_has_image_part() {
        let clear = ProfileUpdate {
            image: ImageField::Clear,
            ..ProfileUpdate::default()
        };
        assert!(clear.part_names().contains(&"image"));

        let upload = ProfileUpdate {
            image: ImageField::Upload(StagedFile::new(
                "me.png",
                "image/png",
                Bytes::from_static(b"\x89PNG"),
            )),
            ..ProfileUpdate::default()
        };
        assert!(upload.part_names().contains(&"image"));
        assert!(upload.into_form().is_ok());
    }
}
