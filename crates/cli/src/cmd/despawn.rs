//! Implementation of the `qranchor despawn` command.

use anyhow::Result;
use qranchor_lib::anchor::BindingState;
use qranchor_lib::detect::{FixedRaycaster, ScriptedScanner};
use serde::Serialize;

use crate::output::{print_info, print_json, print_success};
use crate::session::{Context, runtime};

#[derive(Serialize)]
struct DespawnOutput<'a> {
  qr_text: &'a str,
  despawned: bool,
  /// `erased` once the erase is confirmed, `unbound` while unconfirmed.
  anchor_state: Option<BindingState>,
}

/// Restore saved anchors, then remove the object placed for `text` and
/// erase its anchor. The saved mapping is kept.
pub fn cmd_despawn(ctx: &Context, text: &str) -> Result<()> {
  let mut session = ctx.session(ctx.open_anchors()?, ScriptedScanner::new(), FixedRaycaster::miss())?;

  let removed = runtime()?.block_on(async {
    session.reconcile().await;
    let removed = session.despawn(text).await;
    session.drain_background().await;
    removed
  });
  let anchor_state = removed.as_ref().and_then(|r| r.anchor.as_ref()).map(|a| a.state);

  if ctx.format.is_json() {
    return print_json(&DespawnOutput {
      qr_text: text,
      despawned: removed.is_some(),
      anchor_state,
    });
  }

  if removed.is_some() {
    print_success(&format!("Despawned '{}'", text));
  } else {
    print_info(&format!("Nothing placed for '{}'.", text));
  }

  Ok(())
}
