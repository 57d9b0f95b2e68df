use hero_core::HeroError;
use hero_types::{Account, Registration, Role, ValidationReason};

use crate::authority::RemoteAuthority;

pub struct AuthService {
    authority: RemoteAuthority,
}

impl AuthService {
    pub fn new(authority: RemoteAuthority) -> Self {
        Self { authority }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<Account, HeroError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(HeroError::validation(ValidationReason::MissingCredentials));
        }

        let account = self.authority.login_user(username, password).await?;
        tracing::info!(user_id = %account.id, role = ?account.role, "Logged in");
        Ok(account)
    }

    /// Registers a student account and returns it with the generated id.
    pub async fn register(&self, registration: Registration) -> Result<Account, HeroError> {
        if registration.username.trim().is_empty() || registration.password.is_empty() {
            return Err(HeroError::validation(ValidationReason::MissingCredentials));
        }
        if registration.display_name.trim().is_empty() {
            return Err(HeroError::validation(ValidationReason::MissingField {
                field: "display name".to_string(),
            }));
        }

        let id = self.authority.register_user(&registration).await?;
        tracing::info!(user_id = %id, "Registered new student");
        Ok(Account {
            id,
            username: registration.username,
            display_name: registration.display_name,
            role: Role::Student,
            cohort: registration.cohort,
            room: registration.room,
            number: registration.number,
            gender: registration.gender,
            created_at: String::new(),
        })
    }

    /// Confirms the authority is reachable before showing the login form.
    pub async fn check_connection(&self) -> bool {
        self.authority.ping().await
    }
}
