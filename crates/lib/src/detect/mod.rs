//! Detection input boundary.
//!
//! QR decoding, the camera pipeline and the environment raycaster are all
//! external. Each frame the scanner yields zero or more detections in
//! normalized camera-image coordinates; the projector turns an image pixel
//! into a world ray, and the raycaster finds where that ray meets the room.

mod scripted;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{Pixel, Ray, RaycastHit, Resolution, Vec3};

pub use scripted::{FixedRaycaster, ForwardProjector, ScriptedScanner};

/// One decoded QR code in a camera frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QrDetection {
  pub text: String,
  /// Corner points in camera-frame coordinates; only x and y are used.
  pub corners: Vec<Vec3>,
}

impl QrDetection {
  pub fn new(text: impl Into<String>, corners: Vec<Vec3>) -> Self {
    Self {
      text: text.into(),
      corners,
    }
  }

  /// A square code of side `size` centered on `(u, v)`.
  pub fn square(text: impl Into<String>, u: f32, v: f32, size: f32) -> Self {
    let h = size / 2.0;
    Self::new(
      text,
      vec![
        Vec3::new(u - h, v - h, 0.0),
        Vec3::new(u + h, v - h, 0.0),
        Vec3::new(u + h, v + h, 0.0),
        Vec3::new(u - h, v + h, 0.0),
      ],
    )
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
  #[error("camera frame unavailable")]
  FrameUnavailable,

  #[error("qr decoder failed: {0}")]
  Decoder(String),
}

#[async_trait]
pub trait QrScanner: Send {
  /// Scan the current camera frame.
  async fn scan_frame(&mut self) -> Result<Vec<QrDetection>, ScanError>;
}

pub trait CameraProjector: Send {
  fn resolution(&self) -> Resolution;

  fn screen_point_to_ray(&self, pixel: Pixel) -> Ray;
}

pub trait Raycaster: Send {
  fn raycast(&self, ray: &Ray) -> Option<RaycastHit>;
}

/// The collaborators one detection pass reads from.
pub struct DetectionInputs {
  pub scanner: Box<dyn QrScanner>,
  pub projector: Box<dyn CameraProjector>,
  pub raycaster: Box<dyn Raycaster>,
}

impl DetectionInputs {
  pub fn new(
    scanner: impl QrScanner + 'static,
    projector: impl CameraProjector + 'static,
    raycaster: impl Raycaster + 'static,
  ) -> Self {
    Self {
      scanner: Box::new(scanner),
      projector: Box::new(projector),
      raycaster: Box::new(raycaster),
    }
  }
}
