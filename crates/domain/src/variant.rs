//! Variants and data values — the typed payloads stored in variable nodes.
//!
//! A [`Variant`] always knows its [`DataType`] and [`ValueRank`], which is
//! what the node graph checks a write against. Arrays are homogeneous by
//! construction ([`ArrayValue`] holds one vector per element type).

use serde::{Deserialize, Serialize};

use crate::time::{Timestamp, now};

/// Built-in data types a variable can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Boolean,
    Int32,
    Double,
    String,
    #[serde(rename = "EUInformation")]
    EuInformation,
    Range,
}

/// Dimensionality of a variable's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueRank {
    Scalar,
    OneDimension,
}

/// Engineering unit descriptor (UNECE unit code plus labels).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EuInformation {
    pub namespace_uri: String,
    pub unit_id: i32,
    pub display_name: String,
    pub description: String,
}

impl EuInformation {
    /// Namespace of the UNECE Recommendation 20 unit codes.
    pub const UNECE_NAMESPACE: &'static str = "http://www.opcfoundation.org/UA/units/un/cefact";

    /// Unit from the UNECE table.
    #[must_use]
    pub fn unece(
        unit_id: i32,
        display_name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            namespace_uri: Self::UNECE_NAMESPACE.to_string(),
            unit_id,
            display_name: display_name.into(),
            description: description.into(),
        }
    }

    /// Degree Celsius (`CEL`).
    #[must_use]
    pub fn degree_celsius() -> Self {
        Self::unece(4_408_652, "\u{b0}C", "degree Celsius")
    }

    /// Dimensionless absorbance unit.
    #[must_use]
    pub fn absorbance_unit() -> Self {
        Self::unece(-1, "AU", "absorbance unit")
    }
}

/// Closed numeric range of an analog item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub low: f64,
    pub high: f64,
}

impl Range {
    #[must_use]
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Whether `value` lies inside the range (inclusive).
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }
}

/// Homogeneous one-dimensional array payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "element", content = "values")]
pub enum ArrayValue {
    Boolean(Vec<bool>),
    Int32(Vec<i32>),
    Double(Vec<f64>),
    String(Vec<String>),
}

impl ArrayValue {
    /// Element type of the array.
    #[must_use]
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Boolean(_) => DataType::Boolean,
            Self::Int32(_) => DataType::Int32,
            Self::Double(_) => DataType::Double,
            Self::String(_) => DataType::String,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Boolean(v) => v.len(),
            Self::Int32(v) => v.len(),
            Self::Double(v) => v.len(),
            Self::String(v) => v.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A type-tagged value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Variant {
    #[default]
    Empty,
    Boolean(bool),
    Int32(i32),
    Double(f64),
    String(String),
    #[serde(rename = "EUInformation")]
    EuInformation(EuInformation),
    Range(Range),
    Array(ArrayValue),
}

impl Variant {
    /// Data type tag, or `None` for [`Variant::Empty`].
    #[must_use]
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Self::Empty => None,
            Self::Boolean(_) => Some(DataType::Boolean),
            Self::Int32(_) => Some(DataType::Int32),
            Self::Double(_) => Some(DataType::Double),
            Self::String(_) => Some(DataType::String),
            Self::EuInformation(_) => Some(DataType::EuInformation),
            Self::Range(_) => Some(DataType::Range),
            Self::Array(array) => Some(array.data_type()),
        }
    }

    #[must_use]
    pub fn value_rank(&self) -> ValueRank {
        match self {
            Self::Array(_) => ValueRank::OneDimension,
            _ => ValueRank::Scalar,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Quality of a data value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StatusCode {
    #[default]
    Good,
    Uncertain,
    Bad,
    BadWaitingForInitialData,
}

impl StatusCode {
    #[must_use]
    pub fn is_good(self) -> bool {
        matches!(self, Self::Good)
    }
}

/// A variant together with its status and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataValue {
    pub value: Variant,
    pub status: StatusCode,
    pub source_timestamp: Option<Timestamp>,
    pub server_timestamp: Option<Timestamp>,
}

impl DataValue {
    /// A good value stamped with the current time as source timestamp.
    #[must_use]
    pub fn from_source(value: Variant) -> Self {
        Self {
            value,
            status: StatusCode::Good,
            source_timestamp: Some(now()),
            server_timestamp: None,
        }
    }

    /// The value of a variable nobody has written yet.
    #[must_use]
    pub fn waiting_for_initial_data() -> Self {
        Self {
            value: Variant::Empty,
            status: StatusCode::BadWaitingForInitialData,
            source_timestamp: None,
            server_timestamp: None,
        }
    }

    /// A good value without timestamps, used for static properties.
    #[must_use]
    pub fn constant(value: impl Into<Variant>) -> Self {
        Self {
            value: value.into(),
            status: StatusCode::Good,
            source_timestamp: None,
            server_timestamp: None,
        }
    }
}

impl Default for DataValue {
    fn default() -> Self {
        Self::waiting_for_initial_data()
    }
}

impl From<bool> for Variant {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i32> for Variant {
    fn from(value: i32) -> Self {
        Self::Int32(value)
    }
}

impl From<f64> for Variant {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<String> for Variant {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for Variant {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<Vec<f64>> for Variant {
    fn from(values: Vec<f64>) -> Self {
        Self::Array(ArrayValue::Double(values))
    }
}

impl From<EuInformation> for Variant {
    fn from(value: EuInformation) -> Self {
        Self::EuInformation(value)
    }
}

impl From<Range> for Variant {
    fn from(value: Range) -> Self {
        Self::Range(value)
    }
}
