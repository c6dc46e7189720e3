mod despawn;
mod detect;
mod info;
mod mappings;
mod reconcile;

pub use despawn::cmd_despawn;
pub use detect::{DetectArgs, cmd_detect};
pub use info::cmd_info;
pub use mappings::cmd_mappings;
pub use reconcile::cmd_reconcile;

use qranchor_lib::geometry::Vec3;

/// Parse an `X,Y,Z` triple.
pub fn parse_vec3(s: &str) -> Result<Vec3, String> {
  let parts: Vec<&str> = s.split(',').map(str::trim).collect();
  let &[x, y, z] = parts.as_slice() else {
    return Err(format!("expected X,Y,Z, got '{}'", s));
  };
  let component = |v: &str| v.parse::<f32>().map_err(|e| format!("invalid component '{}': {}", v, e));
  Ok(Vec3::new(component(x)?, component(y)?, component(z)?))
}
