//! Single-use token payload construction.
//!
//! A token is `{prefix}-{user_key}-{code}` joined with a literal hyphen.
//! Parts are not escaped, so a hyphen inside the user key or code makes the
//! string ambiguous to split. Consumers must look tokens up whole rather than
//! parse them back into parts.

use crate::error::{require_non_blank, CoreError};
use crate::types::{SingleUseToken, UserKey, VerificationCode};

/// Separator placed between the three token parts.
pub const SEPARATOR: char = '-';

/// Well-known token purposes used as prefixes.
pub mod purposes {
    pub const RESET_PASSWORD: &str = "reset-password";
    pub const CONFIRM_EMAIL: &str = "confirm-email";
    pub const CHANGE_EMAIL: &str = "change-email";
}

/// Builds single-use token payloads. Stateless.
#[derive(Debug, Default, Clone, Copy)]
pub struct SingleUseTokenFactory;

impl SingleUseTokenFactory {
    pub fn new() -> Self {
        Self
    }

    /// Compose a token for `prefix` from an already validated key and code.
    pub fn create(
        &self,
        prefix: &str,
        user_key: &UserKey,
        code: &VerificationCode,
    ) -> Result<SingleUseToken, CoreError> {
        require_non_blank("prefix", prefix)?;
        Ok(compose(prefix, user_key.value(), code.value()))
    }

    /// Like [`Self::create`] but for callers holding unvalidated strings.
    ///
    /// Parameters are checked in order `prefix`, `user_key`, `code`.
    pub fn create_from_parts(
        &self,
        prefix: &str,
        user_key: &str,
        code: &str,
    ) -> Result<SingleUseToken, CoreError> {
        require_non_blank("prefix", prefix)?;
        let user_key = UserKey::new(user_key)?;
        let code = VerificationCode::new(code)?;
        self.create(prefix, &user_key, &code)
    }
}

fn compose(prefix: &str, user_key: &str, code: &str) -> SingleUseToken {
    SingleUseToken::from_composed(format!("{prefix}{SEPARATOR}{user_key}{SEPARATOR}{code}"))
}
