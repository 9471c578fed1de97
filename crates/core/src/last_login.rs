//! Last-login stamping.
//!
//! The host owns the user type and its persistence; this module only needs
//! the capability to read and write one timestamp on it.

use std::sync::Arc;

use crate::clock::Clock;
use crate::types::Timestamp;

/// A user entity with a mutable "last successful login" timestamp.
pub trait HasLastLogin {
    fn last_login(&self) -> Option<Timestamp>;
    fn set_last_login(&mut self, at: Timestamp);
}

/// Records the moment a user last authenticated successfully.
#[derive(Clone)]
pub struct LastLoginSetter {
    clock: Arc<dyn Clock>,
}

impl LastLoginSetter {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Set `user`'s last login to the clock's current time and return it.
    ///
    /// Nothing is persisted; the caller saves the user afterwards.
    pub fn set_last_login<U>(&self, user: &mut U) -> Timestamp
    where
        U: HasLastLogin + ?Sized,
    {
        let now = self.clock.now_utc();
        user.set_last_login(now);
        tracing::debug!(last_login = %now, "Stamped last login");
        now
    }
}

impl std::fmt::Debug for LastLoginSetter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LastLoginSetter").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::clock::FixedClock;

    #[derive(Default)]
    struct TestUser {
        last_login: Option<Timestamp>,
    }

    impl HasLastLogin for TestUser {
        fn last_login(&self) -> Option<Timestamp> {
            self.last_login
        }

        fn set_last_login(&mut self, at: Timestamp) {
            self.last_login = Some(at);
        }
    }

    #[test]
    fn stamps_clock_time() {
        let t = chrono::Utc.with_ymd_and_hms(2023, 1, 2, 3, 4, 5).unwrap();
        let setter = LastLoginSetter::new(Arc::new(FixedClock::new(t)));
        let mut user = TestUser::default();

        let stamped = setter.set_last_login(&mut user);

        assert_eq!(stamped, t);
        assert_eq!(user.last_login(), Some(t));
    }

    #[test]
    fn later_login_overwrites_earlier() {
        let t = chrono::Utc.with_ymd_and_hms(2023, 1, 2, 3, 4, 5).unwrap();
        let clock = Arc::new(FixedClock::new(t));
        let setter = LastLoginSetter::new(clock.clone());
        let mut user = TestUser::default();

        setter.set_last_login(&mut user);
        clock.advance(chrono::Duration::hours(1));
        setter.set_last_login(&mut user);

        assert_eq!(user.last_login(), Some(t + chrono::Duration::hours(1)));
    }

    #[test]
    fn works_through_trait_object() {
        let t = chrono::Utc.with_ymd_and_hms(2020, 6, 1, 0, 0, 0).unwrap();
        let setter = LastLoginSetter::new(Arc::new(FixedClock::new(t)));
        let mut user = TestUser::default();
        let dyn_user: &mut dyn HasLastLogin = &mut user;

        setter.set_last_login(dyn_user);

        assert_eq!(user.last_login, Some(t));
    }
}
