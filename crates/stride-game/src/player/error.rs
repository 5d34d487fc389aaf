/// Errors raised while assembling a player controller.
///
/// Per-step operations never fail; everything here is caught at construction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LocomotionError {
    #[error("player controller needs a character motor")]
    MissingMotor,

    #[error("player controller needs an animator sink")]
    MissingAnimator,

    #[error("invalid movement config: {field} {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },
}

impl LocomotionError {
    pub(crate) fn invalid(field: &'static str, reason: &'static str) -> Self {
        Self::InvalidConfig { field, reason }
    }
}
