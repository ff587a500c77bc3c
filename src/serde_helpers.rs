//! Serde helpers for the model wire schema
//!
//! JSON has no literal for infinity, and bounds are routinely infinite. Bound
//! fields therefore use the protobuf JSON convention: finite values are plain
//! numbers, infinities are the strings `"Infinity"` / `"-Infinity"`.

use serde::de::{self, Visitor};
use serde::{Deserializer, Serializer};
use std::fmt;

pub mod bound {
    use super::*;

    pub fn serialize<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else if value.is_nan() {
            serializer.serialize_str("NaN")
        } else if *value > 0.0 {
            serializer.serialize_str("Infinity")
        } else {
            serializer.serialize_str("-Infinity")
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(BoundVisitor)
    }
}

struct BoundVisitor;

impl<'de> Visitor<'de> for BoundVisitor {
    type Value = f64;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a number, \"Infinity\" or \"-Infinity\"")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
        Ok(v as f64)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
        Ok(v as f64)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
        match v {
            "Infinity" | "inf" => Ok(f64::INFINITY),
            "-Infinity" | "-inf" => Ok(f64::NEG_INFINITY),
            "NaN" => Ok(f64::NAN),
            other => Err(E::invalid_value(de::Unexpected::Str(other), &self)),
        }
    }
}

pub fn infinity() -> f64 {
    f64::INFINITY
}

pub fn neg_infinity() -> f64 {
    f64::NEG_INFINITY
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct Wrapper {
        #[serde(with = "super::bound")]
        value: f64,
    }

    #[test]
    fn test_infinity_is_written_as_string() {
        let json = serde_json::to_string(&Wrapper { value: f64::NEG_INFINITY }).unwrap();
        assert_eq!(json, r#"{"value":"-Infinity"}"#);
    }

    #[test]
    fn test_accepts_integers_and_strings() {
        let w: Wrapper = serde_json::from_str(r#"{"value":3}"#).unwrap();
        assert_eq!(w.value, 3.0);
        let w: Wrapper = serde_json::from_str(r#"{"value":"Infinity"}"#).unwrap();
        assert_eq!(w.value, f64::INFINITY);
        assert!(serde_json::from_str::<Wrapper>(r#"{"value":"lots"}"#).is_err());
    }
}
