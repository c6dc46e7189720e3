use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::geometry::Pose;

/// Platform identifier of a spatial anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnchorId(pub Uuid);

impl AnchorId {
  pub fn new_v4() -> Self {
    Self(Uuid::new_v4())
  }

  pub fn from_u128(value: u128) -> Self {
    Self(Uuid::from_u128(value))
  }

  /// Parses the string form stored in mappings. Returns `None` for anything
  /// that is not a uuid.
  pub fn parse(value: &str) -> Option<Self> {
    Uuid::parse_str(value.trim()).ok().map(Self)
  }
}

impl FromStr for AnchorId {
  type Err = uuid::Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Uuid::parse_str(s.trim()).map(Self)
  }
}

impl fmt::Display for AnchorId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.hyphenated().fmt(f)
  }
}

/// Numeric status code reported by the anchor platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnchorStatus(pub i32);

impl AnchorStatus {
  pub const SUCCESS: AnchorStatus = AnchorStatus(0);
  pub const FAILURE: AnchorStatus = AnchorStatus(-1000);
  pub const NOT_FOUND: AnchorStatus = AnchorStatus(-1002);
  pub const TIMED_OUT: AnchorStatus = AnchorStatus(-1006);
  pub const STORAGE_FAILURE: AnchorStatus = AnchorStatus(-2000);

  pub fn name(self) -> &'static str {
    match self {
      Self::SUCCESS => "success",
      Self::FAILURE => "failure",
      Self::NOT_FOUND => "not_found",
      Self::TIMED_OUT => "timed_out",
      Self::STORAGE_FAILURE => "storage_failure",
      _ => "unknown",
    }
  }
}

impl fmt::Display for AnchorStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} ({})", self.name(), self.0)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorOperation {
  CreateAndSave,
  LoadUnbound,
  Erase,
}

impl fmt::Display for AnchorOperation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Self::CreateAndSave => "create_and_save",
      Self::LoadUnbound => "load_unbound",
      Self::Erase => "erase",
    };
    f.write_str(name)
  }
}

/// A failed anchor-service call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("anchor {operation} failed with status {status}")]
pub struct AnchorError {
  pub operation: AnchorOperation,
  pub status: AnchorStatus,
}

impl AnchorError {
  pub fn new(operation: AnchorOperation, status: AnchorStatus) -> Self {
    Self { operation, status }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingState {
  Unbound,
  Bound,
  Erased,
}

/// This side's view of a platform anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorHandle {
  pub id: AnchorId,
  pub state: BindingState,
}

impl AnchorHandle {
  pub fn new(id: AnchorId, state: BindingState) -> Self {
    Self { id, state }
  }

  pub fn is_bound(&self) -> bool {
    self.state == BindingState::Bound
  }
}

/// An anchor loaded from the platform store but not yet attached to an object.
#[derive(Debug, Clone, PartialEq)]
pub struct UnboundAnchor {
  pub id: AnchorId,
  /// World pose, known once the anchor has been localized.
  pub pose: Option<Pose>,
}

impl UnboundAnchor {
  pub fn new(id: AnchorId) -> Self {
    Self { id, pose: None }
  }

  pub fn is_localized(&self) -> bool {
    self.pose.is_some()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_accepts_uuid_strings_only() {
    let id = AnchorId::from_u128(0x0b7e_8c1a_2f43_4c55_9a4e_3f1d_2c6b_8a90);
    assert_eq!(AnchorId::parse(&id.to_string()), Some(id));
    assert_eq!(AnchorId::parse(" 0b7e8c1a-2f43-4c55-9a4e-3f1d2c6b8a90 "), Some(id));
    assert_eq!(AnchorId::parse("uuid-1"), None);
    assert_eq!(AnchorId::parse(""), None);
  }

  #[test]
  fn error_message_names_operation_and_status() {
    let err = AnchorError::new(AnchorOperation::CreateAndSave, AnchorStatus::STORAGE_FAILURE);
    assert_eq!(
      err.to_string(),
      "anchor create_and_save failed with status storage_failure (-2000)"
    );
    assert_eq!(AnchorStatus(-42).name(), "unknown");
  }
}
