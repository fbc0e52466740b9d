use chrono::{DateTime, Utc};

/// The application-specific user record, keyed by the identity id.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub join_date: DateTime<Utc>,
}

/// Partial update for a profile. Only supplied fields are sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.avatar.is_none()
            && self.phone.is_none()
            && self.location.is_none()
            && self.bio.is_none()
    }
}

/// Profile fields collected by the sign-up form. The identity id and join
/// date are filled in when the `users` row is created.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignupProfile {
    pub name: String,
    pub avatar: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
}
