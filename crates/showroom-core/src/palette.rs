//! Model names and body colors offered by the "change vehicle" action

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ShowroomError;

/// 24-bit sRGB color, stored as `0xRRGGBB`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(u32);

impl Color {
    pub const WHITE: Color = Color(0xffffff);

    pub const fn from_hex(hex: u32) -> Self {
        Self(hex & 0x00ff_ffff)
    }

    pub const fn rgb_u8(self) -> [u8; 3] {
        [(self.0 >> 16) as u8, (self.0 >> 8) as u8, self.0 as u8]
    }

    /// Channels in 0.0..=1.0, still sRGB encoded
    pub fn rgb_f32(self) -> [f32; 3] {
        let [r, g, b] = self.rgb_u8();
        [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

impl FromStr for Color {
    type Err = ShowroomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .trim()
            .strip_prefix('#')
            .or_else(|| s.trim().strip_prefix("0x"))
            .unwrap_or(s.trim());
        if digits.len() != 6 {
            return Err(ShowroomError::InvalidColor(s.to_string()));
        }
        u32::from_str_radix(digits, 16)
            .map(Color::from_hex)
            .map_err(|_| ShowroomError::InvalidColor(s.to_string()))
    }
}

impl TryFrom<String> for Color {
    type Error = ShowroomError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Vehicle model names. Every model currently shares the same geometry;
/// only the body color changes between rebuilds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ModelName {
    #[default]
    Model3,
    ModelY,
    ModelS,
    ModelX,
}

impl ModelName {
    pub const ALL: [ModelName; 4] = [
        ModelName::Model3,
        ModelName::ModelY,
        ModelName::ModelS,
        ModelName::ModelX,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            ModelName::Model3 => "model-3",
            ModelName::ModelY => "model-y",
            ModelName::ModelS => "model-s",
            ModelName::ModelX => "model-x",
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        *Self::ALL.choose(rng).unwrap_or(&ModelName::Model3)
    }
}

impl fmt::Display for ModelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for ModelName {
    type Err = ShowroomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.slug().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ShowroomError::UnknownModel(s.to_string()))
    }
}

impl TryFrom<String> for ModelName {
    type Error = ShowroomError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ModelName> for String {
    fn from(model: ModelName) -> Self {
        model.slug().to_string()
    }
}

/// A named entry in the body color palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyColor {
    pub name: &'static str,
    pub color: Color,
}

pub const BODY_COLORS: [BodyColor; 6] = [
    BodyColor { name: "Blue", color: Color::from_hex(0x1a3a6c) },
    BodyColor { name: "Red", color: Color::from_hex(0xe63946) },
    BodyColor { name: "Teal", color: Color::from_hex(0x006d77) },
    BodyColor { name: "Purple", color: Color::from_hex(0x8338ec) },
    BodyColor { name: "Orange", color: Color::from_hex(0xff9e00) },
    BodyColor { name: "Green", color: Color::from_hex(0x2a9d8f) },
];

impl BodyColor {
    /// Default body paint, also the first palette entry
    pub const DEFAULT: BodyColor = BODY_COLORS[0];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        *BODY_COLORS.choose(rng).unwrap_or(&Self::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_color_parse_and_display() {
        let c: Color = "#F0F0F0".parse().unwrap();
        assert_eq!(c, Color::from_hex(0xf0f0f0));
        assert_eq!(c.to_string(), "#f0f0f0");
        assert_eq!("0x1a3a6c".parse::<Color>().unwrap(), Color::from_hex(0x1a3a6c));
        assert!("#fff".parse::<Color>().is_err());
        assert!("#gggggg".parse::<Color>().is_err());
    }

    #[test]
    fn test_color_channels() {
        let c = Color::from_hex(0xff9e00);
        assert_eq!(c.rgb_u8(), [0xff, 0x9e, 0x00]);
        let [r, g, b] = c.rgb_f32();
        assert_eq!(r, 1.0);
        assert!((g - 158.0 / 255.0).abs() < 1e-6);
        assert_eq!(b, 0.0);
    }

    #[test]
    fn test_model_names() {
        assert_eq!(ModelName::default().slug(), "model-3");
        assert_eq!("Model-Y".parse::<ModelName>().unwrap(), ModelName::ModelY);
        assert!(matches!(
            "cybertruck".parse::<ModelName>(),
            Err(ShowroomError::UnknownModel(_))
        ));
    }

    #[test]
    fn test_random_choices_cover_palette() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut models = HashSet::new();
        let mut colors = HashSet::new();
        for _ in 0..500 {
            models.insert(ModelName::random(&mut rng));
            colors.insert(BodyColor::random(&mut rng).color);
        }
        assert_eq!(models.len(), ModelName::ALL.len());
        assert_eq!(colors.len(), BODY_COLORS.len());
    }
}
