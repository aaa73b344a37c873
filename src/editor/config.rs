use log::Level;

use super::quantize::Quantizer;

/// Settings for one editor instance.
#[derive(Clone, Debug, PartialEq)]
pub struct EditorConfig {
	/// Decimal digits kept when merging coincident vertices. Values above
	/// [`Quantizer::MAX_PRECISION`] are clamped.
	pub precision: u32,
	/// Threshold passed to the console logger.
	pub log_level: Level,
}

impl Default for EditorConfig {
	fn default() -> Self {
		Self {
			precision: Quantizer::DEFAULT_PRECISION,
			log_level: Level::Debug,
		}
	}
}

impl EditorConfig {
	/// Quantizer for [`Self::precision`].
	pub fn quantizer(&self) -> Quantizer {
		Quantizer::new(self.precision)
	}
}
