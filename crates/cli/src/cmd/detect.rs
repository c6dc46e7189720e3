//! Implementation of the `qranchor detect` command.
//!
//! Replays a single synthetic camera frame containing one QR code through a
//! session that has already restored its saved anchors.

use anyhow::Result;
use qranchor_lib::detect::{FixedRaycaster, QrDetection, ScriptedScanner};
use qranchor_lib::geometry::Vec3;
use serde::Serialize;

use crate::output::{print_info, print_json, print_stat, print_success, print_warning};
use crate::session::{Context, runtime};

pub struct DetectArgs {
  pub text: String,
  pub hit: Vec3,
  pub normal: Vec3,
  pub corners: usize,
  pub miss: bool,
  pub fail_save: bool,
}

#[derive(Serialize)]
struct DetectOutput {
  restored: Vec<String>,
  tick: qranchor_lib::manager::TickReport,
  state: qranchor_lib::manager::DetectionState,
}

pub fn cmd_detect(ctx: &Context, args: DetectArgs) -> Result<()> {
  let mut detection = QrDetection::square(&args.text, 0.5, 0.5, 0.2);
  detection.corners = detection.corners.iter().copied().cycle().take(args.corners).collect();

  let raycaster = if args.miss {
    FixedRaycaster::miss()
  } else {
    FixedRaycaster::hit(args.hit, args.normal)
  };

  let anchors = ctx.open_anchors()?;
  let mut session = ctx.session(anchors.clone(), ScriptedScanner::with_frames([vec![detection]]), raycaster)?;

  let output = runtime()?.block_on(async {
    let restored = session.reconcile().await.bound;
    anchors.set_fail_save(args.fail_save);
    let tick = session.tick().await;
    DetectOutput {
      restored,
      tick,
      state: session.detection_state(&args.text),
    }
  });

  if ctx.format.is_json() {
    return print_json(&output);
  }

  let tick = &output.tick;
  if tick.skipped_malformed > 0 {
    print_warning(&format!("Detection '{}' is malformed, skipped.", args.text));
  } else if tick.skipped_miss > 0 {
    print_warning(&format!("Raycast missed for '{}', nothing placed.", args.text));
  } else if tick.skipped_known > 0 {
    print_info(&format!("'{}' is already placed.", args.text));
  } else if !tick.anchored.is_empty() {
    print_success(&format!("Placed and anchored '{}'", args.text));
  } else if tick.save_failures > 0 {
    print_warning(&format!("Placed '{}' but the anchor save failed.", args.text));
  }

  print_stat("Restored", &output.restored.len().to_string());
  print_stat("State", &format!("{:?}", output.state));

  Ok(())
}
