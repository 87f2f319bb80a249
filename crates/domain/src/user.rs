use crate::shared::entity::{Entity, ID};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// An account in the directory service. The directory owns account state;
/// this engine only reads it to resolve reminder audiences and to format
/// messages in the recipient's timezone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: ID,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub confirmed: bool,
    pub deleted: bool,
    pub suspended: bool,
    /// The anonymous/guest account, never a reminder recipient.
    pub guest: bool,
    /// Preferred timezone; the site default applies when unset.
    pub timezone: Option<Tz>,
}

impl User {
    pub fn new(email: &str) -> Self {
        Self {
            id: Default::default(),
            email: email.to_string(),
            first_name: Default::default(),
            last_name: Default::default(),
            confirmed: true,
            deleted: false,
            suspended: false,
            guest: false,
            timezone: None,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Whether this account may receive site-wide reminders at all.
    pub fn is_active_recipient(&self) -> bool {
        self.confirmed && !self.deleted && !self.suspended && !self.guest
    }
}

impl Entity for User {
    fn id(&self) -> &ID {
        &self.id
    }
}
