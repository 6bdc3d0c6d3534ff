//! Outward-facing side effects of the controller

use crate::types::CelebrationTier;

/// Celebration trigger fired after every committed draw
#[cfg_attr(test, mockall::automock)]
pub trait Celebration {
    /// Celebrate a winner of the given tier
    fn celebrate(&self, tier: CelebrationTier);
}

/// No celebration at all
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Celebration for Silent {
    fn celebrate(&self, _tier: CelebrationTier) {}
}

/// Operator confirmation gate for destructive actions
#[cfg_attr(test, mockall::automock)]
pub trait Confirmation {
    /// Ask the operator; `true` means go ahead
    fn confirm(&self, prompt: &str) -> bool;
}

/// Confirms everything (`--yes`)
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl Confirmation for AlwaysConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Declines everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverConfirm;

impl Confirmation for NeverConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        false
    }
}
