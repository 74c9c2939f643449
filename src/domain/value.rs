//! Argument values and concrete option assignments.
//!
//! Sweep files mix integer counts, float arguments, and occasionally
//! extended-precision decimals supplied as text. `ParamValue` keeps these
//! apart so exports can serialize plain numbers as JSON numbers while
//! extended-precision values round-trip as their canonical decimal strings,
//! losing no digits.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A single candidate argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    /// Extended-precision decimal, kept as its canonical decimal string.
    Decimal(String),
    Text(String),
}

impl ParamValue {
    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Int(v) => Some(*v as f64),
            ParamValue::Float(v) => Some(*v),
            ParamValue::Decimal(text) => text.parse().ok(),
            ParamValue::Text(_) => None,
        }
    }

    /// Non-negative integer view (term counts, orders).
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            ParamValue::Int(v) => u32::try_from(*v).ok(),
            _ => None,
        }
    }
}

impl std::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamValue::Int(v) => write!(f, "{v}"),
            ParamValue::Float(v) => write!(f, "{v}"),
            ParamValue::Decimal(text) | ParamValue::Text(text) => write!(f, "{text}"),
        }
    }
}

impl Serialize for ParamValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ParamValue::Int(v) => serializer.serialize_i64(*v),
            ParamValue::Float(v) => serializer.serialize_f64(*v),
            ParamValue::Decimal(text) | ParamValue::Text(text) => serializer.serialize_str(text),
        }
    }
}

impl<'de> Deserialize<'de> for ParamValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = ParamValue;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a number or a string")
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<ParamValue, E> {
                Ok(ParamValue::Int(v))
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<ParamValue, E> {
                i64::try_from(v)
                    .map(ParamValue::Int)
                    .map_err(|_| E::custom(format!("integer out of range: {v}")))
            }

            fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<ParamValue, E> {
                Ok(ParamValue::Float(v))
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<ParamValue, E> {
                // Numeric-looking strings are extended-precision decimals;
                // everything else is plain text (e.g. a variant selector).
                let numeric = !v.is_empty()
                    && v.parse::<f64>().map(|p| p.is_finite()).unwrap_or(false);
                if numeric {
                    Ok(ParamValue::Decimal(v.to_string()))
                } else {
                    Ok(ParamValue::Text(v.to_string()))
                }
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

/// Named argument axes: each axis is a name plus its ordered candidate values.
///
/// A `Vec` of pairs (rather than a map) so axis insertion order is preserved;
/// cartesian expansion order depends on it.
pub type Axes = Vec<(String, Vec<ParamValue>)>;

/// One concrete assignment of values to named options, in axis order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Assignment {
    entries: Vec<(String, ParamValue)>,
}

impl Assignment {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<(String, ParamValue)>) -> Self {
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flat `name=value` rendering for CSV cells and result identifiers.
    pub fn to_compact_string(&self) -> String {
        let parts: Vec<String> = self
            .entries
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        parts.join(", ")
    }
}

impl Serialize for Assignment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Assignment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AssignmentVisitor;

        impl<'de> Visitor<'de> for AssignmentVisitor {
            type Value = Assignment;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a map of option names to values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Assignment, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, ParamValue>()? {
                    entries.push((key, value));
                }
                Ok(Assignment { entries })
            }
        }

        deserializer.deserialize_map(AssignmentVisitor)
    }
}
