//! # Profile Entity
//!
//! A profile is keyed by the stable user identifier (a name key, not an
//! allocated id) and owns the registration and wishlist key lists.

use serde::{Deserialize, Serialize};

use super::{optional_str, str_list};
use crate::datastore::{DatastoreResult, Document, Key, PropertyValue, Record};

/// T-shirt size choices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TeeShirtSize {
    #[default]
    #[serde(rename = "NOT_SPECIFIED")]
    NotSpecified,
    #[serde(rename = "XS_M")]
    XsM,
    #[serde(rename = "XS_W")]
    XsW,
    #[serde(rename = "S_M")]
    SM,
    #[serde(rename = "S_W")]
    SW,
    #[serde(rename = "M_M")]
    MM,
    #[serde(rename = "M_W")]
    MW,
    #[serde(rename = "L_M")]
    LM,
    #[serde(rename = "L_W")]
    LW,
    #[serde(rename = "XL_M")]
    XlM,
    #[serde(rename = "XL_W")]
    XlW,
    #[serde(rename = "XXL_M")]
    XxlM,
    #[serde(rename = "XXL_W")]
    XxlW,
    #[serde(rename = "XXXL_M")]
    XxxlM,
    #[serde(rename = "XXXL_W")]
    XxxlW,
}

impl TeeShirtSize {
    /// Stored string form
    pub fn as_str(&self) -> &'static str {
        match self {
            TeeShirtSize::NotSpecified => "NOT_SPECIFIED",
            TeeShirtSize::XsM => "XS_M",
            TeeShirtSize::XsW => "XS_W",
            TeeShirtSize::SM => "S_M",
            TeeShirtSize::SW => "S_W",
            TeeShirtSize::MM => "M_M",
            TeeShirtSize::MW => "M_W",
            TeeShirtSize::LM => "L_M",
            TeeShirtSize::LW => "L_W",
            TeeShirtSize::XlM => "XL_M",
            TeeShirtSize::XlW => "XL_W",
            TeeShirtSize::XxlM => "XXL_M",
            TeeShirtSize::XxlW => "XXL_W",
            TeeShirtSize::XxxlM => "XXXL_M",
            TeeShirtSize::XxxlW => "XXXL_W",
        }
    }

    /// Parses the stored string form, defaulting when unrecognized
    pub fn parse_or_default(value: &str) -> Self {
        match value {
            "XS_M" => TeeShirtSize::XsM,
            "XS_W" => TeeShirtSize::XsW,
            "S_M" => TeeShirtSize::SM,
            "S_W" => TeeShirtSize::SW,
            "M_M" => TeeShirtSize::MM,
            "M_W" => TeeShirtSize::MW,
            "L_M" => TeeShirtSize::LM,
            "L_W" => TeeShirtSize::LW,
            "XL_M" => TeeShirtSize::XlM,
            "XL_W" => TeeShirtSize::XlW,
            "XXL_M" => TeeShirtSize::XxlM,
            "XXL_W" => TeeShirtSize::XxlW,
            "XXXL_M" => TeeShirtSize::XxxlM,
            "XXXL_W" => TeeShirtSize::XxxlW,
            _ => TeeShirtSize::NotSpecified,
        }
    }
}

/// Persisted user profile
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub key: Key,
    pub display_name: String,
    pub main_email: String,
    pub tee_shirt_size: TeeShirtSize,
    pub conference_keys_to_attend: Vec<String>,
    pub session_keys_in_wishlist: Vec<String>,
}

impl Profile {
    pub const KIND: &'static str = "Profile";

    /// Profile key for a user id
    pub fn key_for(user_id: &str) -> Key {
        Key::with_name(Self::KIND, user_id)
    }

    /// Converts to the stored document representation
    pub fn to_document(&self) -> Document {
        let mut document = Document::new();
        document.insert(
            "displayName".into(),
            PropertyValue::Str(self.display_name.clone()),
        );
        document.insert(
            "mainEmail".into(),
            PropertyValue::Str(self.main_email.clone()),
        );
        document.insert(
            "teeShirtSize".into(),
            PropertyValue::Str(self.tee_shirt_size.as_str().to_string()),
        );
        document.insert(
            "conferenceKeysToAttend".into(),
            PropertyValue::StrList(self.conference_keys_to_attend.clone()),
        );
        document.insert(
            "sessionKeysInWishlist".into(),
            PropertyValue::StrList(self.session_keys_in_wishlist.clone()),
        );
        document
    }

    /// Rebuilds the entity from a fetched record
    pub fn from_record(record: &Record) -> DatastoreResult<Self> {
        let document = &record.properties;
        Ok(Self {
            key: record.key.clone(),
            display_name: optional_str(document, "displayName").unwrap_or_default(),
            main_email: optional_str(document, "mainEmail").unwrap_or_default(),
            tee_shirt_size: optional_str(document, "teeShirtSize")
                .map(|s| TeeShirtSize::parse_or_default(&s))
                .unwrap_or_default(),
            conference_keys_to_attend: str_list(document, "conferenceKeysToAttend"),
            session_keys_in_wishlist: str_list(document, "sessionKeysInWishlist"),
        })
    }

    /// Outbound form
    pub fn to_form(&self) -> ProfileForm {
        ProfileForm {
            display_name: Some(self.display_name.clone()),
            main_email: Some(self.main_email.clone()),
            tee_shirt_size: Some(self.tee_shirt_size),
            conference_keys_to_attend: self.conference_keys_to_attend.clone(),
        }
    }
}

/// Profile wire form (outbound)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tee_shirt_size: Option<TeeShirtSize>,
    pub conference_keys_to_attend: Vec<String>,
}

/// Profile update form: only the user-modifiable fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileMiniForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tee_shirt_size: Option<TeeShirtSize>,
}
