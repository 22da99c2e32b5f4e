use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::user::User;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PreferencesPayload {
    pub categories: Option<Vec<Uuid>>,
    pub job_types: Option<Vec<String>>,
    pub locations: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfilePayload {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub profile_image: Option<String>,
    #[serde(default)]
    pub preferences: Option<PreferencesPayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub categories: Vec<Uuid>,
    pub job_types: Vec<String>,
    pub locations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: Uuid,
    pub external_id: String,
    pub name: String,
    pub email: Option<String>,
    pub role: String,
    pub profile_image: Option<String>,
    pub preferences: Preferences,
}

impl From<User> for ProfileResponse {
    fn from(value: User) -> Self {
        Self {
            id: value.id,
            external_id: value.external_id,
            name: value.name,
            email: value.email,
            role: value.role,
            profile_image: value.profile_image,
            preferences: Preferences {
                categories: value.preferred_categories,
                job_types: value.preferred_job_types,
                locations: value.preferred_locations,
            },
        }
    }
}
