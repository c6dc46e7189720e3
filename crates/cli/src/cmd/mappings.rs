//! Implementation of the `qranchor mappings` command.

use anyhow::Result;
use qranchor_lib::anchor::AnchorId;

use crate::output::{print_info, print_json, print_warning, symbols, truncate_uuid};
use crate::session::Context;

/// List every persisted QR-text to anchor mapping in insertion order.
///
/// Entries whose uuid does not parse are shown with a warning marker; the
/// startup loader ignores them.
pub fn cmd_mappings(ctx: &Context) -> Result<()> {
  let list = ctx.open_mappings()?.load();

  if ctx.format.is_json() {
    return print_json(&list);
  }

  if list.is_empty() {
    print_info("No saved mappings.");
    return Ok(());
  }

  println!("Saved mappings ({}):", list.len());
  for entry in &list.mappings {
    if let Some(id) = AnchorId::parse(&entry.uuid) {
      println!("  {} {} {}", entry.qr_text, symbols::ARROW, truncate_uuid(&id.to_string()));
    } else {
      print_warning(&format!("{} {} '{}' (not a valid uuid)", entry.qr_text, symbols::ARROW, entry.uuid));
    }
  }

  Ok(())
}
