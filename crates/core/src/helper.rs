//! Coordinating service handed to the identity host.

use std::sync::Arc;

use rand::Rng;

use crate::clock::Clock;
use crate::config::{IdentityConfig, DEFAULT_VERIFICATION_CODE_LENGTH};
use crate::error::CoreError;
use crate::last_login::{HasLastLogin, LastLoginSetter};
use crate::token::SingleUseTokenFactory;
use crate::types::{SingleUseToken, Timestamp, UserKey, VerificationCode};

/// Bundles the last-login setter and the token factory behind one handle.
#[derive(Debug, Clone)]
pub struct UserHelper {
    last_login: LastLoginSetter,
    tokens: SingleUseTokenFactory,
    code_length: usize,
}

impl UserHelper {
    pub fn new(last_login: LastLoginSetter, tokens: SingleUseTokenFactory) -> Self {
        Self {
            last_login,
            tokens,
            code_length: DEFAULT_VERIFICATION_CODE_LENGTH,
        }
    }

    /// Helper reading `clock` with the code length from `config`.
    pub fn from_config(clock: Arc<dyn Clock>, config: &IdentityConfig) -> Self {
        Self::new(LastLoginSetter::new(clock), SingleUseTokenFactory)
            .with_code_length(config.verification_code_length)
    }

    pub fn with_code_length(mut self, code_length: usize) -> Self {
        self.code_length = code_length;
        self
    }

    pub fn last_login_setter(&self) -> &LastLoginSetter {
        &self.last_login
    }

    /// Stamp a successful login on `user`.
    pub fn record_login<U>(&self, user: &mut U) -> Timestamp
    where
        U: HasLastLogin + ?Sized,
    {
        self.last_login.set_last_login(user)
    }

    pub fn create_single_use_token(
        &self,
        prefix: &str,
        user_key: &UserKey,
        code: &VerificationCode,
    ) -> Result<SingleUseToken, CoreError> {
        self.tokens.create(prefix, user_key, code)
    }

    /// Generate a fresh code and the token embedding it.
    ///
    /// The prefix is validated before any randomness is drawn.
    pub fn issue_single_use_token<R: Rng + ?Sized>(
        &self,
        prefix: &str,
        user_key: &UserKey,
        rng: &mut R,
    ) -> Result<(VerificationCode, SingleUseToken), CoreError> {
        crate::error::require_non_blank("prefix", prefix)?;
        let code = VerificationCode::generate(rng, self.code_length)?;
        let token = self.tokens.create(prefix, user_key, &code)?;
        tracing::debug!(prefix, user_key = %user_key, "Issued single-use token");
        Ok((code, token))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::clock::FixedClock;
    use crate::token::purposes;

    struct Account {
        seen: Option<Timestamp>,
    }

    impl HasLastLogin for Account {
        fn last_login(&self) -> Option<Timestamp> {
            self.seen
        }

        fn set_last_login(&mut self, at: Timestamp) {
            self.seen = Some(at);
        }
    }

    fn helper() -> (UserHelper, Timestamp) {
        let t = chrono::Utc.with_ymd_and_hms(2022, 2, 22, 22, 22, 22).unwrap();
        let setter = LastLoginSetter::new(Arc::new(FixedClock::new(t)));
        (UserHelper::new(setter, SingleUseTokenFactory), t)
    }

    #[test]
    fn record_login_delegates_to_setter() {
        let (helper, t) = helper();
        let mut account = Account { seen: None };
        helper.record_login(&mut account);
        assert_eq!(account.last_login(), Some(t));
    }

    #[test]
    fn issued_token_embeds_generated_code() {
        let (helper, _) = helper();
        let key = UserKey::new("u1").unwrap();
        let mut rng = StdRng::seed_from_u64(3);

        let (code, token) = helper
            .issue_single_use_token(purposes::RESET_PASSWORD, &key, &mut rng)
            .unwrap();

        assert_eq!(code.value().len(), DEFAULT_VERIFICATION_CODE_LENGTH);
        assert_eq!(token.value(), format!("reset-password-u1-{code}"));
    }

    #[test]
    fn code_length_is_configurable() {
        let (helper, _) = helper();
        let helper = helper.with_code_length(10);
        let key = UserKey::new("u1").unwrap();
        let (code, _) = helper
            .issue_single_use_token("p", &key, &mut StdRng::seed_from_u64(0))
            .unwrap();
        assert_eq!(code.value().len(), 10);
    }

    #[test]
    fn from_config_uses_configured_length() {
        let config = IdentityConfig {
            verification_code_length: 4,
            ..IdentityConfig::default()
        };
        let helper = UserHelper::from_config(Arc::new(crate::clock::SystemClock), &config);
        let key = UserKey::new("u1").unwrap();
        let (code, _) = helper
            .issue_single_use_token("p", &key, &mut StdRng::seed_from_u64(9))
            .unwrap();
        assert_eq!(code.value().len(), 4);
    }

    #[test]
    fn blank_prefix_fails_before_generation() {
        let (helper, _) = helper();
        let key = UserKey::new("u1").unwrap();
        let err = helper
            .issue_single_use_token("", &key, &mut StdRng::seed_from_u64(0))
            .unwrap_err();
        assert_eq!(err.param(), Some("prefix"));
    }
}
