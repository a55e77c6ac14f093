//! RGBA colors and their storable record form.
//!
//! A color is four normalized sRGB components. On disk it is the record
//! `{"red", "green", "blue", "opacity"}`; [`encode`] and [`decode`] convert
//! between the two without loss.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{CorruptDataError, ValidationError};

/// Tolerance used when comparing decoded components.
pub const EPSILON: f64 = 1e-6;

/// An sRGB color with each component normalized to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ColorRecord", into = "ColorRecord")]
pub struct Rgba {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub opacity: f64,
}

/// The storable four-field record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorRecord {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub opacity: f64,
}

impl Rgba {
    pub const BLUE: Rgba = Rgba::new(0.0, 0.0, 1.0, 1.0);
    pub const CLEAR: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);

    /// Color given to a new class, and to a stored class whose color is unreadable.
    pub const DEFAULT_CLASS: Rgba = Rgba::BLUE;
    /// Color rendered for a task without a (resolvable) class.
    pub const UNASSIGNED: Rgba = Rgba::CLEAR;

    pub const fn new(red: f64, green: f64, blue: f64, opacity: f64) -> Self {
        Rgba { red, green, blue, opacity }
    }

    /// Build from 8-bit channels.
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        let n = |c: u8| f64::from(c) / 255.0;
        Rgba::new(n(r), n(g), n(b), n(a))
    }

    /// Component-wise comparison within [`EPSILON`].
    pub fn approx_eq(&self, other: &Rgba) -> bool {
        (self.red - other.red).abs() <= EPSILON
            && (self.green - other.green).abs() <= EPSILON
            && (self.blue - other.blue).abs() <= EPSILON
            && (self.opacity - other.opacity).abs() <= EPSILON
    }

    /// `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(&self) -> String {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        let rgb = format!("#{:02X}{:02X}{:02X}", q(self.red), q(self.green), q(self.blue));
        if q(self.opacity) == 255 {
            rgb
        } else {
            format!("{rgb}{:02X}", q(self.opacity))
        }
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Rgba::DEFAULT_CLASS
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Convert a color into its storable record.
pub fn encode(color: Rgba) -> ColorRecord {
    ColorRecord {
        red: color.red,
        green: color.green,
        blue: color.blue,
        opacity: color.opacity,
    }
}

/// Convert a record back into a color, rejecting non-finite or out-of-range components.
pub fn decode(record: ColorRecord) -> Result<Rgba, CorruptDataError> {
    let check = |field: &'static str, value: f64| {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Ok(value)
        } else {
            Err(CorruptDataError::ColorComponent { field, value })
        }
    };
    Ok(Rgba::new(
        check("red", record.red)?,
        check("green", record.green)?,
        check("blue", record.blue)?,
        check("opacity", record.opacity)?,
    ))
}

impl From<Rgba> for ColorRecord {
    fn from(color: Rgba) -> Self {
        encode(color)
    }
}

impl TryFrom<ColorRecord> for Rgba {
    type Error = CorruptDataError;

    fn try_from(record: ColorRecord) -> Result<Self, Self::Error> {
        decode(record)
    }
}

/// Decode an embedded color record, substituting [`Rgba::DEFAULT_CLASS`] when it is
/// missing fields or out of range so one bad color does not discard its collection.
pub fn deserialize_or_default<'de, D>(deserializer: D) -> Result<Rgba, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let decoded = serde_json::from_value::<ColorRecord>(value)
        .map_err(CorruptDataError::from)
        .and_then(decode);
    Ok(decoded.unwrap_or_else(|e| {
        tracing::warn!("unreadable class color, using default: {e}");
        Rgba::DEFAULT_CLASS
    }))
}

const NAMED: &[(&str, Rgba)] = &[
    ("red", Rgba::new(1.0, 0.0, 0.0, 1.0)),
    ("orange", Rgba::new(1.0, 0.584_313_725_490_196, 0.0, 1.0)),
    ("yellow", Rgba::new(1.0, 0.8, 0.0, 1.0)),
    ("green", Rgba::new(0.0, 0.8, 0.0, 1.0)),
    ("mint", Rgba::new(0.0, 0.780_392_156_862_745_1, 0.745_098_039_215_686_3, 1.0)),
    ("teal", Rgba::new(0.0, 0.501_960_784_313_725_5, 0.501_960_784_313_725_5, 1.0)),
    ("cyan", Rgba::new(0.0, 1.0, 1.0, 1.0)),
    ("blue", Rgba::BLUE),
    ("indigo", Rgba::new(0.294_117_647_058_823_54, 0.0, 0.509_803_921_568_627_4, 1.0)),
    ("purple", Rgba::new(0.501_960_784_313_725_5, 0.0, 0.501_960_784_313_725_5, 1.0)),
    ("pink", Rgba::new(1.0, 0.176_470_588_235_294_13, 0.333_333_333_333_333_3, 1.0)),
    ("brown", Rgba::new(0.6, 0.4, 0.2, 1.0)),
    ("gray", Rgba::new(0.5, 0.5, 0.5, 1.0)),
    ("black", Rgba::new(0.0, 0.0, 0.0, 1.0)),
    ("white", Rgba::new(1.0, 1.0, 1.0, 1.0)),
    ("clear", Rgba::CLEAR),
];

/// Names accepted by [`Rgba::from_str`].
pub fn color_names() -> impl Iterator<Item = &'static str> {
    NAMED.iter().map(|(name, _)| *name)
}

impl FromStr for Rgba {
    type Err = ValidationError;

    /// Accepts `#RRGGBB`, `#RRGGBBAA` (leading `#` optional) or a color name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_lowercase();
        if let Some((_, color)) = NAMED.iter().find(|(name, _)| *name == input) {
            return Ok(*color);
        }
        let hex = input.strip_prefix('#').unwrap_or(&input);
        let invalid = || ValidationError::Color(s.to_string());
        if !hex.is_ascii() || !(hex.len() == 6 || hex.len() == 8) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Rgba::from_rgba8(channel(0)?, channel(2)?, channel(4)?, alpha))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn encode_emits_four_named_fields() {
        let json = serde_json::to_value(Rgba::new(0.0, 0.0, 1.0, 1.0)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"red": 0.0, "green": 0.0, "blue": 1.0, "opacity": 1.0})
        );
    }

    #[test]
    fn decode_rejects_missing_field() {
        let err = serde_json::from_str::<Rgba>(r#"{"red":0.1,"green":0.2,"blue":0.3}"#);
        assert!(err.is_err());
    }

    #[test]
    fn decode_rejects_out_of_range_component() {
        let record = ColorRecord { red: 1.5, green: 0.0, blue: 0.0, opacity: 1.0 };
        match decode(record) {
            Err(CorruptDataError::ColorComponent { field, .. }) => assert_eq!(field, "red"),
            other => panic!("expected component error, got {other:?}"),
        }
        let record = ColorRecord { red: 0.0, green: 0.0, blue: 0.0, opacity: f64::NAN };
        assert!(decode(record).is_err());
    }

    #[test]
    fn lenient_decode_falls_back_to_default() {
        #[derive(Deserialize)]
        struct Holder {
            #[serde(deserialize_with = "deserialize_or_default")]
            color: Rgba,
        }
        let h: Holder = serde_json::from_str(r#"{"color":{"red":"x"}}"#).unwrap();
        assert_eq!(h.color, Rgba::DEFAULT_CLASS);
        let h: Holder = serde_json::from_str(
            r#"{"color":{"red":1.0,"green":0.0,"blue":0.0,"opacity":0.5}}"#,
        )
        .unwrap();
        assert_eq!(h.color, Rgba::new(1.0, 0.0, 0.0, 0.5));
    }

    #[test]
    fn parses_hex_and_names() {
        assert_eq!("blue".parse::<Rgba>().unwrap(), Rgba::BLUE);
        assert_eq!(" Red ".parse::<Rgba>().unwrap(), Rgba::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!("#0000FF".parse::<Rgba>().unwrap(), Rgba::BLUE);
        assert_eq!("ff000080".parse::<Rgba>().unwrap().to_hex(), "#FF000080");
        assert!("#12345".parse::<Rgba>().is_err());
        assert!("#GG0000".parse::<Rgba>().is_err());
        assert!("chartreuse".parse::<Rgba>().is_err());
    }

    #[test]
    fn hex_omits_opaque_alpha() {
        assert_eq!(Rgba::BLUE.to_hex(), "#0000FF");
        assert_eq!(Rgba::CLEAR.to_hex(), "#00000000");
    }

    proptest! {
        #[test]
        fn json_round_trip_within_epsilon(
            r in 0.0f64..=1.0, g in 0.0f64..=1.0, b in 0.0f64..=1.0, a in 0.0f64..=1.0
        ) {
            let color = Rgba::new(r, g, b, a);
            let json = serde_json::to_string(&color).unwrap();
            let back: Rgba = serde_json::from_str(&json).unwrap();
            prop_assert!(back.approx_eq(&color));
            let again: Rgba = decode(encode(back)).unwrap();
            prop_assert!(again.approx_eq(&color));
        }
    }
}
