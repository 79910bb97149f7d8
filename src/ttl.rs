//! Session time-to-live policy.

use std::fmt;
use std::sync::Arc;

use crate::data::SessionData;
use crate::store::SessionStore;

/// Default session lifetime: one day, in seconds.
pub const DEFAULT_TTL_SECS: i64 = 86_400;

/// A per-call TTL computation.
///
/// Invoked with the store, the session data being written, and the session
/// id when one is available (`set` passes it, `touch` does not).
pub type TtlFn = Arc<dyn Fn(&SessionStore, &SessionData, Option<&str>) -> i64 + Send + Sync>;

/// Configured TTL policy for `set` and `touch`.
///
/// When no policy is configured, the store falls back to the session
/// cookie's `maxAge` and then to [`DEFAULT_TTL_SECS`].
///
/// # Examples
///
/// ```
/// use orm_session_store::Ttl;
///
/// let fixed = Ttl::Fixed(3600);
/// let computed = Ttl::computed(|_store, _data, _id| 3600);
/// ```
#[derive(Clone)]
pub enum Ttl {
    /// A fixed number of seconds, used verbatim for every session.
    Fixed(i64),
    /// A function computing the seconds per call.
    Computed(TtlFn),
}

impl Ttl {
    /// Wraps a closure as a computed TTL policy.
    pub fn computed(
        f: impl Fn(&SessionStore, &SessionData, Option<&str>) -> i64 + Send + Sync + 'static,
    ) -> Self {
        Self::Computed(Arc::new(f))
    }
}

impl From<i64> for Ttl {
    fn from(seconds: i64) -> Self {
        Self::Fixed(seconds)
    }
}

impl fmt::Debug for Ttl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(seconds) => f.debug_tuple("Fixed").field(seconds).finish(),
            Self::Computed(_) => f.debug_tuple("Computed").field(&"..").finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_ttl_from_seconds() {
        assert!(matches!(Ttl::from(60), Ttl::Fixed(60)));
    }

    #[test]
    fn debug_does_not_render_the_closure() {
        let ttl = Ttl::computed(|_, _, _| 1);
        assert_eq!(format!("{ttl:?}"), r#"Computed("..")"#);
    }
}
