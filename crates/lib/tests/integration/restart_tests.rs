//! Sessions that end and start again on the same device.

use qranchor_lib::manager::DetectionState;

use crate::common::{Device, seen};

#[tokio::test]
async fn placed_object_is_restored_after_restart() {
  let device = Device::new();

  let (mut first, _) = device.start(vec![vec![seen("engineA")]]);
  first.reconcile().await;
  let report = first.tick().await;
  assert_eq!(report.anchored, vec!["engineA".to_string()]);
  let original_pose = {
    let spawned = first.registry().get("engineA").unwrap();
    first.world().pose(spawned.object).unwrap()
  };
  drop(first);

  let (mut second, anchors) = device.start(vec![vec![seen("engineA")]]);
  let restored = second.reconcile().await;
  assert_eq!(restored.bound, vec!["engineA".to_string()]);
  assert_eq!(second.detection_state("engineA"), DetectionState::SeenBound);

  let spawned = second.registry().get("engineA").unwrap();
  assert_eq!(second.world().pose(spawned.object), Some(original_pose));
  let anchor_id = spawned.anchor.as_ref().unwrap().id;
  assert_eq!(anchors.bound_object(&anchor_id), Some(spawned.object));

  let tick = second.tick().await;
  assert!(tick.spawned.is_empty());
  assert_eq!(second.world().instantiated_count(), 1);
}

#[tokio::test]
async fn despawned_mapping_is_retried_on_restart_but_finds_no_anchor() {
  let device = Device::new();

  let (mut first, _) = device.start(vec![vec![seen("engineA")]]);
  first.tick().await;
  assert!(first.despawn("engineA").await.is_some());
  first.drain_background().await;
  drop(first);

  let (mut second, _) = device.start(Vec::new());
  let report = second.reconcile().await;

  assert_eq!(report.persisted, 1);
  assert_eq!(report.parsed, 1);
  assert_eq!(report.loaded, 0);
  assert!(second.registry().is_empty());
}

#[tokio::test]
async fn corrupt_prefs_start_clean() {
  let device = Device::new();
  std::fs::create_dir_all(device.data_dir()).unwrap();
  std::fs::write(device.data_dir().join("prefs.json"), "{{{{").unwrap();

  let (mut session, _) = device.start(vec![vec![seen("engineA")]]);
  let report = session.reconcile().await;
  assert_eq!(report.persisted, 0);

  session.tick().await;
  assert_eq!(session.mappings().load().len(), 1);
}
