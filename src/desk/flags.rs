//! Feature flag seam.

use std::collections::BTreeSet;

/// Flag gating ticket operations.
pub const FEATURE_TASKS: &str = "desk365-tasks";
/// Flag gating department/admin operations.
pub const FEATURE_ADMIN: &str = "desk365-admin";

/// Source of feature flag decisions, queried synchronously before every
/// facade operation.
pub trait FeatureFlags: Send + Sync {
  fn is_enabled(&self, feature: &str) -> bool;
}

/// Flags from a fixed set of enabled feature names.
#[derive(Debug, Clone, Default)]
pub struct StaticFlags {
  enabled: BTreeSet<String>,
}

impl StaticFlags {
  pub fn new<I, S>(enabled: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      enabled: enabled.into_iter().map(Into::into).collect(),
    }
  }

  /// Everything on; convenient for tests and local development.
  pub fn all_enabled() -> Self {
    Self::new([FEATURE_TASKS, FEATURE_ADMIN])
  }
}

impl FeatureFlags for StaticFlags {
  fn is_enabled(&self, feature: &str) -> bool {
    self.enabled.contains(feature)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_static_flags() {
    let flags = StaticFlags::new([FEATURE_TASKS]);
    assert!(flags.is_enabled(FEATURE_TASKS));
    assert!(!flags.is_enabled(FEATURE_ADMIN));
    assert!(!flags.is_enabled("unknown-feature"));
  }
}
