use std::borrow::Cow;
use std::fmt::Debug;

/// Outcome of one health probe check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeStatus {
    Healthy,
    Unhealthy(Cow<'static, str>),
}

impl ProbeStatus {
    /// Unhealthy status with an operator-facing message.
    pub fn unhealthy(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Unhealthy(message.into())
    }

    #[must_use]
    pub const fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }
}

/// A health probe contributed through the dependency graph and registered
/// with the [`Environment`](crate::Environment).
///
/// Probes run on the request path of the health endpoint; `check` must not
/// block on anything slower than in-process state.
pub trait HealthProbe: Send + Sync {
    /// Stable name used in health reports.
    fn name(&self) -> &str;

    fn check(&self) -> ProbeStatus;
}
