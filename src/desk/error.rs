//! Facade error taxonomy.

use thiserror::Error;

use super::client::ApiError;

/// Errors surfaced by the facades. Callers branch on the variant to decide
/// on user messaging; none of these are retried or cached.
#[derive(Debug, Clone, Error)]
pub enum FacadeError {
  /// The requested capability is turned off.
  #[error("feature '{0}' is disabled")]
  FeatureFlagDisabled(String),

  /// The remote API reported that the entity does not exist. A failed
  /// lookup is never written to the cache as a "null" result.
  #[error("not found: {0}")]
  EntityNotFound(String),

  /// The remote API rejected our credentials.
  #[error("authentication failed: {0}")]
  Authentication(String),

  /// Any other remote failure, original message preserved.
  #[error("remote api error: {0}")]
  RemoteApi(String),
}

/// Classification is a pure function of the error shape and applies
/// uniformly whether or not caching is active.
impl From<ApiError> for FacadeError {
  fn from(e: ApiError) -> Self {
    match e.status {
      Some(404) => FacadeError::EntityNotFound(e.message),
      Some(401) | Some(403) => FacadeError::Authentication(e.message),
      _ => FacadeError::RemoteApi(e.message),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_404_is_not_found() {
    let err = FacadeError::from(ApiError::status(404, "no such ticket"));
    assert!(matches!(err, FacadeError::EntityNotFound(m) if m == "no such ticket"));
  }

  #[test]
  fn test_401_and_403_are_authentication() {
    for status in [401, 403] {
      let err = FacadeError::from(ApiError::status(status, "bad token"));
      assert!(matches!(err, FacadeError::Authentication(_)));
    }
  }

  #[test]
  fn test_other_statuses_are_remote_api_errors() {
    for status in [400, 429, 500, 503] {
      let err = FacadeError::from(ApiError::status(status, "boom"));
      assert!(matches!(err, FacadeError::RemoteApi(m) if m == "boom"));
    }
  }

  #[test]
  fn test_transport_error_is_remote_api_error() {
    let err = FacadeError::from(ApiError::transport("connection reset"));
    assert!(matches!(err, FacadeError::RemoteApi(m) if m == "connection reset"));
  }
}
