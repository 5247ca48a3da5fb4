//! Feature property values.

use geozero::mvt::tile::Value;

/// A typed feature property.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    String(String),
    Int(i64),
    UInt(u64),
    Float(f32),
    Double(f64),
    Bool(bool),
}

/// Ordered property list of one feature.
pub type Properties = Vec<(String, PropertyValue)>;

impl PropertyValue {
    /// Integer view of the value, if it holds a whole number.
    ///
    /// Strings are parsed so that year-like labels written as text still
    /// compare as numbers.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            PropertyValue::Int(v) => Some(*v),
            PropertyValue::UInt(v) => i64::try_from(*v).ok(),
            PropertyValue::Double(v) if v.fract() == 0.0 => Some(*v as i64),
            PropertyValue::Float(v) if v.fract() == 0.0 => Some(*v as i64),
            PropertyValue::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub(crate) fn to_value(&self) -> Value {
        match self {
            PropertyValue::String(v) => Value {
                string_value: Some(v.clone()),
                ..Default::default()
            },
            PropertyValue::Int(v) => Value {
                int_value: Some(*v),
                ..Default::default()
            },
            PropertyValue::UInt(v) => Value {
                uint_value: Some(*v),
                ..Default::default()
            },
            PropertyValue::Float(v) => Value {
                float_value: Some(*v),
                ..Default::default()
            },
            PropertyValue::Double(v) => Value {
                double_value: Some(*v),
                ..Default::default()
            },
            PropertyValue::Bool(v) => Value {
                bool_value: Some(*v),
                ..Default::default()
            },
        }
    }

    pub(crate) fn from_value(value: &Value) -> Option<Self> {
        if let Some(v) = &value.string_value {
            Some(PropertyValue::String(v.clone()))
        } else if let Some(v) = value.int_value {
            Some(PropertyValue::Int(v))
        } else if let Some(v) = value.sint_value {
            Some(PropertyValue::Int(v))
        } else if let Some(v) = value.uint_value {
            Some(PropertyValue::UInt(v))
        } else if let Some(v) = value.double_value {
            Some(PropertyValue::Double(v))
        } else if let Some(v) = value.float_value {
            Some(PropertyValue::Float(v))
        } else {
            value.bool_value.map(PropertyValue::Bool)
        }
    }

    /// Hashable identity used to share value slots within a layer.
    pub(crate) fn intern_key(&self) -> ValueKey {
        match self {
            PropertyValue::String(v) => ValueKey::String(v.clone()),
            PropertyValue::Int(v) => ValueKey::Int(*v),
            PropertyValue::UInt(v) => ValueKey::UInt(*v),
            PropertyValue::Float(v) => ValueKey::Float(v.to_bits()),
            PropertyValue::Double(v) => ValueKey::Double(v.to_bits()),
            PropertyValue::Bool(v) => ValueKey::Bool(*v),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        PropertyValue::String(v.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        PropertyValue::String(v)
    }
}

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        PropertyValue::Int(v)
    }
}

impl From<i32> for PropertyValue {
    fn from(v: i32) -> Self {
        PropertyValue::Int(v as i64)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum ValueKey {
    String(String),
    Int(i64),
    UInt(u64),
    Float(u32),
    Double(u64),
    Bool(bool),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_i64_conversions() {
        assert_eq!(PropertyValue::Int(2001).as_i64(), Some(2001));
        assert_eq!(PropertyValue::UInt(7).as_i64(), Some(7));
        assert_eq!(PropertyValue::Double(1999.0).as_i64(), Some(1999));
        assert_eq!(PropertyValue::Double(1999.5).as_i64(), None);
        assert_eq!(PropertyValue::from("1875").as_i64(), Some(1875));
        assert_eq!(PropertyValue::from("OBSERVATION").as_i64(), None);
        assert_eq!(PropertyValue::Bool(true).as_i64(), None);
    }

    #[test]
    fn test_value_conversion_preserves_type() {
        for property in [
            PropertyValue::from("x"),
            PropertyValue::Int(-4),
            PropertyValue::UInt(4),
            PropertyValue::Float(1.5),
            PropertyValue::Double(2.5),
            PropertyValue::Bool(false),
        ] {
            let value = property.to_value();
            assert_eq!(PropertyValue::from_value(&value), Some(property));
        }
    }

    #[test]
    fn test_sint_reads_as_int() {
        let value = Value {
            sint_value: Some(-12),
            ..Default::default()
        };
        assert_eq!(PropertyValue::from_value(&value), Some(PropertyValue::Int(-12)));
    }

    #[test]
    fn test_empty_value_has_no_property() {
        assert_eq!(PropertyValue::from_value(&Value::default()), None);
    }
}
