//! # Profile Service
//!
//! Get-or-create semantics: the first authenticated touch of any profile
//! endpoint materializes the profile with defaults derived from the
//! caller's identity.

use std::sync::Arc;

use super::errors::ServiceResult;
use crate::auth::AuthUser;
use crate::datastore::{Datastore, Record};
use crate::models::{Profile, ProfileMiniForm, TeeShirtSize};

/// Profile CRUD operations
pub struct ProfileService {
    store: Arc<Datastore>,
}

impl ProfileService {
    pub fn new(store: Arc<Datastore>) -> Self {
        Self { store }
    }

    /// Fetches the caller's profile, creating it on first contact
    pub fn get_or_create(&self, user: &AuthUser) -> ServiceResult<Profile> {
        let key = Profile::key_for(&user.user_id);
        if let Some(properties) = self.store.get(&key)? {
            return Ok(Profile::from_record(&Record {
                key,
                properties,
            })?);
        }

        let profile = Profile {
            key: key.clone(),
            display_name: user.nickname().to_string(),
            main_email: user.email.clone(),
            tee_shirt_size: TeeShirtSize::NotSpecified,
            conference_keys_to_attend: Vec::new(),
            session_keys_in_wishlist: Vec::new(),
        };
        self.store.put(key, profile.to_document())?;
        Ok(profile)
    }

    /// Updates the user-modifiable fields and returns the saved profile
    pub fn save(&self, user: &AuthUser, form: &ProfileMiniForm) -> ServiceResult<Profile> {
        let mut profile = self.get_or_create(user)?;
        if let Some(display_name) = form
            .display_name
            .as_ref()
            .filter(|name| !name.is_empty())
        {
            profile.display_name = display_name.clone();
        }
        if let Some(size) = form.tee_shirt_size {
            profile.tee_shirt_size = size;
        }
        self.store.put(profile.key.clone(), profile.to_document())?;
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> AuthUser {
        AuthUser {
            user_id: "test1@test.com".into(),
            email: "test1@test.com".into(),
        }
    }

    #[test]
    fn test_first_touch_creates_profile() {
        let service = ProfileService::new(Arc::new(Datastore::new()));
        let profile = service.get_or_create(&user()).unwrap();
        assert_eq!(profile.display_name, "test1");
        assert_eq!(profile.main_email, "test1@test.com");
        assert_eq!(profile.tee_shirt_size, TeeShirtSize::NotSpecified);
        assert!(profile.conference_keys_to_attend.is_empty());
    }

    #[test]
    fn test_second_touch_returns_same_profile() {
        let service = ProfileService::new(Arc::new(Datastore::new()));
        let first = service.get_or_create(&user()).unwrap();
        let second = service.get_or_create(&user()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_save_updates_modifiable_fields() {
        let service = ProfileService::new(Arc::new(Datastore::new()));
        let form = ProfileMiniForm {
            display_name: Some("Luiz".into()),
            tee_shirt_size: Some(TeeShirtSize::LM),
        };
        let saved = service.save(&user(), &form).unwrap();
        assert_eq!(saved.display_name, "Luiz");
        assert_eq!(saved.tee_shirt_size, TeeShirtSize::LM);

        // Empty display name is ignored, size persists.
        let form = ProfileMiniForm {
            display_name: Some(String::new()),
            tee_shirt_size: None,
        };
        let saved = service.save(&user(), &form).unwrap();
        assert_eq!(saved.display_name, "Luiz");
        assert_eq!(saved.tee_shirt_size, TeeShirtSize::LM);
    }
}
