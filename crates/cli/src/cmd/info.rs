use anyhow::Result;
use qranchor_lib::platform::paths::{anchors_path, prefs_path};
use serde::Serialize;

use crate::output::{print_json, print_stat};
use crate::session::Context;

#[derive(Serialize)]
struct InfoOutput {
  version: &'static str,
  config_path: String,
  data_dir: String,
  prefs_path: String,
  anchors_path: String,
  erase_mode: qranchor_lib::manager::EraseMode,
  operation_timeout_ms: Option<u64>,
  camera: String,
}

pub fn cmd_info(ctx: &Context) -> Result<()> {
  let info = InfoOutput {
    version: env!("CARGO_PKG_VERSION"),
    config_path: ctx.config_path.display().to_string(),
    data_dir: ctx.data_dir.display().to_string(),
    prefs_path: prefs_path(&ctx.data_dir).display().to_string(),
    anchors_path: anchors_path(&ctx.data_dir).display().to_string(),
    erase_mode: ctx.config.erase_mode,
    operation_timeout_ms: ctx.config.operation_timeout_ms,
    camera: format!("{}x{}", ctx.config.camera.width, ctx.config.camera.height),
  };

  if ctx.format.is_json() {
    return print_json(&info);
  }

  println!("qranchor {}", info.version);
  print_stat("Config", &info.config_path);
  print_stat("Data dir", &info.data_dir);
  print_stat("Prefs", &info.prefs_path);
  print_stat("Anchors", &info.anchors_path);
  print_stat("Erase mode", &format!("{:?}", info.erase_mode));
  match info.operation_timeout_ms {
    Some(ms) => print_stat("Operation timeout", &format!("{}ms", ms)),
    None => print_stat("Operation timeout", "none"),
  }
  print_stat("Camera", &info.camera);

  Ok(())
}
