//! JSON dump of the primitive stream, for debugging and interchange.

use anyhow::{Context, Result};
use seqlogo_core::Drawing;

use crate::Backend;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBackend;

impl Backend for JsonBackend {
    fn render(&self, drawing: &Drawing) -> Result<Vec<u8>> {
        let mut bytes = serde_json::to_vec_pretty(drawing).context("failed to serialize drawing")?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}
