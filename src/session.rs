//! Session context handed to every component that talks to a collaborator

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    clinic: String,
    user: Option<String>,
}

impl Session {
    pub fn new(clinic: impl Into<String>) -> Self {
        Self {
            clinic: clinic.into(),
            user: None,
        }
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Partition key sent with every collaborator request
    pub fn scope_key(&self) -> &str {
        &self.clinic
    }

    pub fn clinic(&self) -> &str {
        &self.clinic
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clinic_is_the_scope_key() {
        let session = Session::new("Uptown");
        assert_eq!(session.scope_key(), "Uptown");
        assert_eq!(session.user(), None);
    }

    #[test]
    fn user_does_not_change_the_scope() {
        let session = Session::new("Downtown").with_user("reception-2");
        assert_eq!(session.user(), Some("reception-2"));
        assert_eq!(session.scope_key(), "Downtown");
    }
}
