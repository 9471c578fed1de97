use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{require_non_blank, CoreError};

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Longest verification code [`VerificationCode::generate`] will produce.
pub const MAX_VERIFICATION_CODE_LENGTH: usize = 32;

// ---------------------------------------------------------------------------
// UserKey
// ---------------------------------------------------------------------------

/// Stable, storage-independent identifier of a user. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserKey(String);

impl UserKey {
    pub fn new(value: impl Into<String>) -> Result<Self, CoreError> {
        let value = value.into();
        require_non_blank("user_key", &value)?;
        Ok(Self(value))
    }

    /// Mint a fresh random key (UUID v4, hyphenated).
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserKey {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserKey> for String {
    fn from(key: UserKey) -> Self {
        key.0
    }
}

impl fmt::Display for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// VerificationCode
// ---------------------------------------------------------------------------

/// One-time code embedded in a single-use token. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VerificationCode(String);

impl VerificationCode {
    pub fn new(value: impl Into<String>) -> Result<Self, CoreError> {
        let value = value.into();
        require_non_blank("code", &value)?;
        Ok(Self(value))
    }

    /// Generate a numeric code of `len` digits from the supplied generator.
    ///
    /// The generator is passed in by the caller so that tests can seed it and
    /// no process-wide RNG is shared between flows.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Result<Self, CoreError> {
        if len == 0 || len > MAX_VERIFICATION_CODE_LENGTH {
            return Err(CoreError::InvalidArgument {
                param: "len",
                reason: format!(
                    "verification code length must be between 1 and {MAX_VERIFICATION_CODE_LENGTH}"
                ),
            });
        }
        let code: String = (0..len)
            .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
            .collect();
        Ok(Self(code))
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VerificationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// SingleUseToken
// ---------------------------------------------------------------------------

/// Textual payload of a single-use token, `{prefix}-{user_key}-{code}`.
///
/// Only [`crate::token::SingleUseTokenFactory`] builds these.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SingleUseToken(String);

impl SingleUseToken {
    pub(crate) fn from_composed(value: String) -> Self {
        Self(value)
    }

    pub fn value(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for SingleUseToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
