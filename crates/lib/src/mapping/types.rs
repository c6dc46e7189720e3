use serde::{Deserialize, Serialize};

/// One persisted binding of a QR payload to an anchor uuid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
  #[serde(rename = "qrText", default)]
  pub qr_text: String,
  /// String-encoded anchor uuid. Not validated on write.
  #[serde(default)]
  pub uuid: String,
}

impl MappingEntry {
  pub fn new(qr_text: impl Into<String>, uuid: impl Into<String>) -> Self {
    Self {
      qr_text: qr_text.into(),
      uuid: uuid.into(),
    }
  }
}

/// The whole persisted record, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingList {
  #[serde(default)]
  pub mappings: Vec<MappingEntry>,
}

impl MappingList {
  pub fn is_empty(&self) -> bool {
    self.mappings.is_empty()
  }

  pub fn len(&self) -> usize {
    self.mappings.len()
  }

  pub fn find(&self, qr_text: &str) -> Option<&MappingEntry> {
    self.mappings.iter().find(|entry| entry.qr_text == qr_text)
  }

  /// Overwrites the uuid of an existing entry or appends a new one.
  ///
  /// Returns `true` when an existing entry was overwritten.
  pub fn upsert(&mut self, qr_text: &str, uuid: &str) -> bool {
    match self.mappings.iter_mut().find(|entry| entry.qr_text == qr_text) {
      Some(existing) => {
        existing.uuid = uuid.to_string();
        true
      }
      None => {
        self.mappings.push(MappingEntry::new(qr_text, uuid));
        false
      }
    }
  }
}
