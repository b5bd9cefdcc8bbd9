//! Decoder behaviour configuration.

use poly_core::{DecodeOptions, ShapePolicy};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DecodeConfig {
    /// What to do with input whose shape no union alternative accepts
    /// (`"ignore"` leaves the field unset, `"reject"` fails the decode).
    #[serde(default)]
    pub unknown_shape: ShapePolicy,
}

impl DecodeConfig {
    #[must_use]
    pub const fn options(&self) -> DecodeOptions {
        DecodeOptions {
            unknown_shape: self.unknown_shape,
        }
    }
}
