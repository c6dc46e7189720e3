//! Minimal world-space value types.
//!
//! Only what placement needs: points, directions, orientations, rays and
//! raycast hits. The coordinate frame is the host's (Y up, Z forward).

pub use glam::{Quat, Vec2, Vec3};

use glam::Mat3;
use serde::{Deserialize, Serialize};

/// Integer pixel coordinates on the camera image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pixel {
  pub x: i32,
  pub y: i32,
}

impl Pixel {
  pub fn new(x: i32, y: i32) -> Self {
    Self { x, y }
  }
}

/// Camera image resolution in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
  pub width: u32,
  pub height: u32,
}

impl Resolution {
  pub fn new(width: u32, height: u32) -> Self {
    Self { width, height }
  }

  /// Maps a normalized image coordinate to the nearest pixel, halves to even.
  pub fn to_pixel(&self, uv: Vec2) -> Pixel {
    Pixel::new(
      (uv.x * self.width as f32).round_ties_even() as i32,
      (uv.y * self.height as f32).round_ties_even() as i32,
    )
  }
}

/// Orientation whose local Z axis points along `forward` with Y as close to
/// `up` as possible.
///
/// A zero `forward` yields the identity. When `forward` is parallel to `up`,
/// world -Z (or Y, for forward along Z) stands in for `up`.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Quat {
  let Some(f) = forward.try_normalize() else {
    return Quat::IDENTITY;
  };
  let r = match up.cross(f).try_normalize() {
    Some(r) => r,
    None => {
      let alt_up = if f.dot(Vec3::Z).abs() < 0.9 { Vec3::NEG_Z } else { Vec3::Y };
      alt_up.cross(f).try_normalize().unwrap_or(Vec3::X)
    }
  };
  let u = f.cross(r);
  Quat::from_mat3(&Mat3::from_cols(r, u, f))
}

/// Position plus orientation in world space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
  pub position: Vec3,
  pub rotation: Quat,
}

impl Pose {
  pub const IDENTITY: Pose = Pose {
    position: Vec3::ZERO,
    rotation: Quat::IDENTITY,
  };

  pub fn new(position: Vec3, rotation: Quat) -> Self {
    Self { position, rotation }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
  pub origin: Vec3,
  pub direction: Vec3,
}

/// Result of an environment raycast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RaycastHit {
  pub point: Vec3,
  pub normal: Vec3,
}

impl RaycastHit {
  /// Pose at the hit point, facing along the surface normal.
  pub fn spawn_pose(&self) -> Pose {
    Pose::new(self.point, look_rotation(self.normal, Vec3::Y))
  }
}

/// Mean of the corners' image-plane coordinates.
///
/// Returns `None` when there are no corners.
pub fn center_uv(corners: &[Vec3]) -> Option<Vec2> {
  if corners.is_empty() {
    return None;
  }
  let sum = corners.iter().fold(Vec2::ZERO, |acc, c| acc + Vec2::new(c.x, c.y));
  Some(sum / corners.len() as f32)
}

#[cfg(test)]
mod tests {
  use super::*;

  const TOL: f32 = 1e-4;

  #[test]
  fn look_rotation_forward_is_identity() {
    let q = look_rotation(Vec3::Z, Vec3::Y);
    assert!(q.abs_diff_eq(Quat::IDENTITY, TOL));
  }

  #[test]
  fn look_rotation_points_z_along_forward() {
    let normal = Vec3::new(1.0, 0.0, 0.0);
    let q = look_rotation(normal, Vec3::Y);
    assert!(q.mul_vec3(Vec3::Z).abs_diff_eq(normal, TOL));
    assert!(q.mul_vec3(Vec3::Y).abs_diff_eq(Vec3::Y, TOL));
  }

  #[test]
  fn look_rotation_handles_forward_parallel_to_up() {
    let q = look_rotation(Vec3::Y, Vec3::Y);
    assert!(q.mul_vec3(Vec3::Z).abs_diff_eq(Vec3::Y, TOL));
    assert!(q.is_normalized());
  }

  #[test]
  fn look_rotation_of_zero_is_identity() {
    assert_eq!(look_rotation(Vec3::ZERO, Vec3::Y), Quat::IDENTITY);
  }

  #[test]
  fn spawn_pose_faces_along_normal() {
    let hit = RaycastHit {
      point: Vec3::new(0.5, 1.0, 2.0),
      normal: Vec3::NEG_Z,
    };
    let pose = hit.spawn_pose();
    assert_eq!(pose.position, hit.point);
    assert!(pose.rotation.mul_vec3(Vec3::Z).abs_diff_eq(Vec3::NEG_Z, TOL));
  }

  #[test]
  fn center_uv_averages_corners() {
    let corners = [
      Vec3::new(0.2, 0.2, 0.0),
      Vec3::new(0.4, 0.2, 0.0),
      Vec3::new(0.4, 0.6, 0.0),
      Vec3::new(0.2, 0.6, 0.0),
    ];
    let center = center_uv(&corners).unwrap();
    assert!(center.abs_diff_eq(Vec2::new(0.3, 0.4), TOL));
    assert_eq!(center_uv(&[]), None);
  }

  #[test]
  fn resolution_rounds_to_nearest_pixel() {
    let res = Resolution::new(1280, 960);
    assert_eq!(res.to_pixel(Vec2::new(0.5, 0.25)), Pixel::new(640, 240));
    assert_eq!(res.to_pixel(Vec2::new(0.0004, 0.9996)), Pixel::new(1, 960));
  }

  #[test]
  fn resolution_rounds_half_pixels_to_even() {
    let res = Resolution::new(1281, 961);
    assert_eq!(res.to_pixel(Vec2::new(0.5, 0.5)), Pixel::new(640, 480));

    let res = Resolution::new(3, 5);
    assert_eq!(res.to_pixel(Vec2::new(0.5, 0.5)), Pixel::new(2, 2));
  }
}
