//! Reduced-motion policy.
//!
//! A persisted user choice wins over the platform preference; with no user
//! choice the platform signal decides.

/// Combined reduced-motion preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MotionPolicy {
    /// Explicit user setting, if one was ever saved.
    pub user_preference: Option<bool>,
    /// Platform-level "prefers reduced motion" signal.
    pub system_prefers_reduced: bool,
}

impl MotionPolicy {
    pub fn new(user_preference: Option<bool>, system_prefers_reduced: bool) -> Self {
        Self {
            user_preference,
            system_prefers_reduced,
        }
    }

    /// Whether the animation subsystem must stay inert.
    pub fn is_reduced(&self) -> bool {
        self.user_preference.unwrap_or(self.system_prefers_reduced)
    }

    pub fn allows_motion(&self) -> bool {
        !self.is_reduced()
    }
}
