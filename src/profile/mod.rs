//! User profile: domain types, shared cache and the editing state machine
//!
//! - [`store::ProfileStore`] -- one in-memory profile per session, shared
//!   by the header and the dashboard
//! - [`sync::ProfileSync`] -- the dashboard's load/edit/save state machine

use std::fmt;
use std::str::FromStr;

use crate::api::ProfileResponse;
use crate::avatar::is_default_image;
use crate::error::YummyError;

pub mod store;
pub mod sync;

pub use store::ProfileStore;
pub use sync::{Acknowledgment, ProfileSync, SyncState};

/// Editable text fields of a profile
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileFields {
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Phone number
    pub phone_number: String,
}

impl ProfileFields {
    /// Value of one field.
    pub fn get(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::FirstName => &self.first_name,
            ProfileField::LastName => &self.last_name,
            ProfileField::PhoneNumber => &self.phone_number,
        }
    }

    /// Replaces one field, leaving the others untouched.
    pub fn set(&mut self, field: ProfileField, value: impl Into<String>) {
        let slot = match field {
            ProfileField::FirstName => &mut self.first_name,
            ProfileField::LastName => &mut self.last_name,
            ProfileField::PhoneNumber => &mut self.phone_number,
        };
        *slot = value.into();
    }
}

/// Name of an editable profile field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    /// `first_name`
    FirstName,
    /// `last_name`
    LastName,
    /// `phone_number`
    PhoneNumber,
}

impl ProfileField {
    /// Wire name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileField::FirstName => "first_name",
            ProfileField::LastName => "last_name",
            ProfileField::PhoneNumber => "phone_number",
        }
    }

    /// All fields in form order.
    pub fn all() -> [ProfileField; 3] {
        [
            ProfileField::FirstName,
            ProfileField::LastName,
            ProfileField::PhoneNumber,
        ]
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileField {
    type Err = YummyError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "first_name" | "first" | "firstname" => Ok(ProfileField::FirstName),
            "last_name" | "last" | "lastname" => Ok(ProfileField::LastName),
            "phone_number" | "phone" => Ok(ProfileField::PhoneNumber),
            other => Err(YummyError::Config(format!(
                "Unknown profile field: {}. Must be one of: first_name, last_name, phone_number",
                other
            ))),
        }
    }
}

/// Profile as confirmed by the backend
///
/// `image` has already been normalized: the backend's default image is
/// stored as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    /// Text fields
    pub fields: ProfileFields,
    /// Avatar URL, absent when the user has none
    pub image: Option<String>,
}

impl Profile {
    /// Builds a profile from a backend response.
    pub fn from_response(response: ProfileResponse, sentinel: &str) -> Self {
        let image = response
            .image
            .filter(|image| !image.is_empty() && !is_default_image(image, sentinel));
        Self {
            fields: ProfileFields {
                first_name: response.first_name,
                last_name: response.last_name,
                phone_number: response.phone_number,
            },
            image,
        }
    }
}
