//! Hex color strings (`"#ff00ff"`) for figure descriptions.

use image::Rgb;
use palette::Srgb;
use serde::{Deserialize, Deserializer, Serializer, de};

pub fn parse(s: &str) -> Result<Rgb<u8>, String> {
    let c: Srgb<u8> = s
        .trim()
        .parse()
        .map_err(|e| format!("invalid color `{s}`: {e}"))?;
    Ok(Rgb([c.red, c.green, c.blue]))
}

pub fn to_hex(c: Rgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", c[0], c[1], c[2])
}

pub fn serialize<S: Serializer>(c: &Rgb<u8>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&to_hex(*c))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Rgb<u8>, D::Error> {
    let s = String::deserialize(deserializer)?;
    parse(&s).map_err(de::Error::custom)
}

pub mod option {
    use super::*;

    pub fn serialize<S: Serializer>(c: &Option<Rgb<u8>>, serializer: S) -> Result<S::Ok, S::Error> {
        match c {
            Some(c) => serializer.serialize_some(&to_hex(*c)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Rgb<u8>>, D::Error> {
        let s = Option::<String>::deserialize(deserializer)?;
        s.map(|s| parse(&s).map_err(de::Error::custom)).transpose()
    }
}
