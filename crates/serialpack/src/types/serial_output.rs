use serialpack_common::{ModuleId, SerialAsset};

#[derive(Debug)]
pub struct SerialOutput {
  /// The main chunk's assets come first, followed by async chunks in discovery order.
  pub assets: Vec<SerialAsset>,
  pub warnings: Vec<anyhow::Error>,
  pub entry_module_id: ModuleId,
}

impl SerialOutput {
  pub fn asset(&self, filename: &str) -> Option<&SerialAsset> {
    self.assets.iter().find(|asset| asset.filename() == filename)
  }
}
