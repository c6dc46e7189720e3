//! Collaborators driven by pre-recorded input instead of a live camera.

use std::collections::VecDeque;

use async_trait::async_trait;

use crate::geometry::{Pixel, Ray, RaycastHit, Resolution, Vec3};

use super::{CameraProjector, QrDetection, QrScanner, Raycaster, ScanError};

/// Replays queued frames, then reports empty frames forever.
#[derive(Debug, Default)]
pub struct ScriptedScanner {
  frames: VecDeque<Result<Vec<QrDetection>, ScanError>>,
}

impl ScriptedScanner {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_frames(frames: impl IntoIterator<Item = Vec<QrDetection>>) -> Self {
    Self {
      frames: frames.into_iter().map(Ok).collect(),
    }
  }

  pub fn push_error(&mut self, error: ScanError) {
    self.frames.push_back(Err(error));
  }
}

#[async_trait]
impl QrScanner for ScriptedScanner {
  async fn scan_frame(&mut self) -> Result<Vec<QrDetection>, ScanError> {
    self.frames.pop_front().unwrap_or_else(|| Ok(Vec::new()))
  }
}

/// A camera at the origin looking down +Z. Pixels map linearly onto a unit
/// image plane one meter ahead.
#[derive(Debug, Clone, Copy)]
pub struct ForwardProjector {
  resolution: Resolution,
}

impl ForwardProjector {
  pub fn new(resolution: Resolution) -> Self {
    Self { resolution }
  }
}

impl CameraProjector for ForwardProjector {
  fn resolution(&self) -> Resolution {
    self.resolution
  }

  fn screen_point_to_ray(&self, pixel: Pixel) -> Ray {
    let u = pixel.x as f32 / self.resolution.width.max(1) as f32 - 0.5;
    let v = pixel.y as f32 / self.resolution.height.max(1) as f32 - 0.5;
    let direction = Vec3::new(u, v, 1.0).try_normalize().unwrap_or(Vec3::Z);
    Ray {
      origin: Vec3::ZERO,
      direction,
    }
  }
}

/// Returns the same hit (or miss) for every ray.
#[derive(Debug, Clone, Copy)]
pub struct FixedRaycaster {
  hit: Option<RaycastHit>,
}

impl FixedRaycaster {
  pub fn hit(point: Vec3, normal: Vec3) -> Self {
    Self {
      hit: Some(RaycastHit { point, normal }),
    }
  }

  pub fn miss() -> Self {
    Self { hit: None }
  }
}

impl Raycaster for FixedRaycaster {
  fn raycast(&self, _ray: &Ray) -> Option<RaycastHit> {
    self.hit
  }
}
