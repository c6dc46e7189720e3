//! Implementation of the `qranchor reconcile` command.

use anyhow::{Result, bail};
use qranchor_lib::anchor::AnchorId;
use qranchor_lib::detect::{FixedRaycaster, ScriptedScanner};

use crate::output::{print_error, print_json, print_stat, print_success};
use crate::session::{Context, runtime};

/// Run the startup loader against the saved mappings and anchors.
///
/// `fail_load` makes the bulk load fail; every uuid in `unlocalizable`
/// fails localization.
pub fn cmd_reconcile(ctx: &Context, fail_load: bool, unlocalizable: &[String]) -> Result<()> {
  let anchors = ctx.open_anchors()?;
  anchors.set_fail_load(fail_load);
  for raw in unlocalizable {
    let Some(id) = AnchorId::parse(raw) else {
      bail!("'{}' is not a valid anchor uuid", raw);
    };
    anchors.set_unlocalizable(id);
  }

  let mut session = ctx.session(anchors, ScriptedScanner::new(), FixedRaycaster::miss())?;
  let report = runtime()?.block_on(session.reconcile());

  if ctx.format.is_json() {
    return print_json(&report);
  }

  if report.load_failed {
    print_error("Failed to load saved anchors.");
  } else if report.bound.is_empty() {
    println!("Nothing restored.");
  } else {
    print_success(&format!("Restored {} object(s)", report.bound.len()));
    for qr_text in &report.bound {
      println!("  {}", qr_text);
    }
  }

  print_stat("Saved mappings", &report.persisted.to_string());
  print_stat("Valid uuids", &report.parsed.to_string());
  print_stat("Anchors loaded", &report.loaded.to_string());
  if report.localization_failures > 0 {
    print_stat("Localization failures", &report.localization_failures.to_string());
  }

  Ok(())
}
