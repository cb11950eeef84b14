//! Data passed between models.
//!
//! Values are either plain numbers or maps of named values, e.g. a timeseries keyed by interval
//! name, or the results of all the models in a system-of-systems model keyed by model name.
use anyhow::{Result, bail};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A mapping from names (of ports, models or intervals) to values
pub type DataMap = IndexMap<String, Value>;

/// A single piece of model data
#[derive(PartialEq, Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A scalar quantity
    Number(f64),
    /// A collection of named values
    Map(DataMap),
}

impl Value {
    /// The value as a number, if it is one
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(number) => Some(*number),
            Value::Map(_) => None,
        }
    }

    /// The value as a map, if it is one
    pub fn as_map(&self) -> Option<&DataMap> {
        match self {
            Value::Map(map) => Some(map),
            Value::Number(_) => None,
        }
    }

    /// Iterate over all the numbers contained in this value along with the keys leading to them
    pub fn iter_leaves(&self) -> Box<dyn Iterator<Item = (Vec<&str>, f64)> + '_> {
        match self {
            Value::Number(number) => Box::new(std::iter::once((Vec::new(), *number))),
            Value::Map(map) => Box::new(map.iter().flat_map(|(key, value)| {
                value.iter_leaves().map(move |(mut path, number)| {
                    path.insert(0, key.as_str());
                    (path, number)
                })
            })),
        }
    }

    /// A copy of this value with every number multiplied by `factor`
    pub fn scaled(&self, factor: f64) -> Value {
        match self {
            Value::Number(number) => Value::Number(number * factor),
            Value::Map(map) => Value::Map(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.scaled(factor)))
                    .collect(),
            ),
        }
    }

    /// Add `other` to this value.
    ///
    /// Maps are added key by key. Keys missing from one side are treated as zero.
    pub fn try_add(self, other: &Value) -> Result<Value> {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
            (Value::Map(mut map), Value::Map(other)) => {
                for (key, value) in other {
                    if let Some(existing) = map.get_mut(key) {
                        *existing = std::mem::replace(existing, Value::Number(0.0)).try_add(value)?;
                    } else {
                        map.insert(key.clone(), value.clone());
                    }
                }
                Ok(Value::Map(map))
            }
            (a, b) => bail!("Cannot add {b} to {a}"),
        }
    }
}

/// Sum `(weight, value)` pairs, giving zero if there are none
pub fn weighted_sum<'a, I>(terms: I) -> Result<Value>
where
    I: IntoIterator<Item = (f64, &'a Value)>,
{
    let mut total: Option<Value> = None;
    for (weight, value) in terms {
        let scaled = value.scaled(weight);
        total = Some(match total {
            Some(total) => total.try_add(&scaled)?,
            None => scaled,
        });
    }

    Ok(total.unwrap_or(Value::Number(0.0)))
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<DataMap> for Value {
    fn from(value: DataMap) -> Self {
        Value::Map(value)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(number) => write!(f, "{number}"),
            Value::Map(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}
