use crate::entity_keys::{EntityKeyDeriver, EMAIL_INDEX_ROW_KEY, USER_ROW_KEY};
use crate::error::{require_non_blank, CoreError};
use crate::types::MAX_VERIFICATION_CODE_LENGTH;

/// Default verification code length (digits).
pub const DEFAULT_VERIFICATION_CODE_LENGTH: usize = 6;

/// Default table holding user records.
pub const DEFAULT_USER_TABLE: &str = "Users";

/// Default table holding the email index.
pub const DEFAULT_EMAIL_TABLE: &str = "UserEmails";

/// Store and token settings.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityConfig {
    pub user_table: String,
    pub email_table: String,
    pub user_row_key: String,
    pub email_row_key: String,
    pub verification_code_length: usize,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            user_table: DEFAULT_USER_TABLE.to_string(),
            email_table: DEFAULT_EMAIL_TABLE.to_string(),
            user_row_key: USER_ROW_KEY.to_string(),
            email_row_key: EMAIL_INDEX_ROW_KEY.to_string(),
            verification_code_length: DEFAULT_VERIFICATION_CODE_LENGTH,
        }
    }
}

impl IdentityConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                             | Default      |
    /// |-------------------------------------|--------------|
    /// | `IDENTITY_USER_TABLE`               | `Users`      |
    /// | `IDENTITY_EMAIL_TABLE`              | `UserEmails` |
    /// | `IDENTITY_USER_ROW_KEY`             | `User`       |
    /// | `IDENTITY_EMAIL_ROW_KEY`            | `EmailIndex` |
    /// | `IDENTITY_VERIFICATION_CODE_LENGTH` | `6`          |
    ///
    /// The code length must lie in `1..=32`.
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let string_var = |name: &str, default: String| -> Result<String, CoreError> {
            match lookup(name) {
                Some(v) if v.trim().is_empty() => {
                    Err(CoreError::Config(format!("{name} must not be empty")))
                }
                Some(v) => Ok(v.trim().to_string()),
                None => Ok(default),
            }
        };

        let verification_code_length = match lookup("IDENTITY_VERIFICATION_CODE_LENGTH") {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if (1..=MAX_VERIFICATION_CODE_LENGTH).contains(&n) => n,
                _ => {
                    return Err(CoreError::Config(format!(
                        "IDENTITY_VERIFICATION_CODE_LENGTH must be an integer between 1 and \
                         {MAX_VERIFICATION_CODE_LENGTH}, got '{raw}'"
                    )))
                }
            },
            None => defaults.verification_code_length,
        };

        Ok(Self {
            user_table: string_var("IDENTITY_USER_TABLE", defaults.user_table)?,
            email_table: string_var("IDENTITY_EMAIL_TABLE", defaults.email_table)?,
            user_row_key: string_var("IDENTITY_USER_ROW_KEY", defaults.user_row_key)?,
            email_row_key: string_var("IDENTITY_EMAIL_ROW_KEY", defaults.email_row_key)?,
            verification_code_length,
        })
    }

    pub fn user_keys(&self) -> Result<EntityKeyDeriver, CoreError> {
        EntityKeyDeriver::new(self.user_row_key.clone())
    }

    pub fn email_keys(&self) -> Result<EntityKeyDeriver, CoreError> {
        EntityKeyDeriver::new(self.email_row_key.clone())
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        require_non_blank("table", &self.user_table)?;
        require_non_blank("table", &self.email_table)?;
        require_non_blank("row_key", &self.user_row_key)?;
        require_non_blank("row_key", &self.email_row_key)?;
        Ok(())
    }
}
