//! Timeseries data associated with a set of intervals.
use crate::id::IntervalID;
use crate::interval::{HOURS_IN_YEAR, IntervalValue};
use crate::value::{DataMap, Value};
use anyhow::{Context, Result, ensure};

/// A series of values, one for each of a collection of intervals
#[derive(PartialEq, Clone, Debug)]
pub struct TimeSeries {
    names: Vec<IntervalID>,
    values: Vec<f64>,
    hourly_values: Vec<f64>,
}

impl TimeSeries {
    /// Create a new [`TimeSeries`] from parallel sequences of interval names and values
    pub fn new(names: Vec<IntervalID>, values: Vec<f64>) -> Result<Self> {
        ensure!(
            names.len() == values.len(),
            "Timeseries has {} interval names but {} values",
            names.len(),
            values.len()
        );

        Ok(Self {
            names,
            values,
            hourly_values: vec![0.0; HOURS_IN_YEAR as usize],
        })
    }

    /// Create a new [`TimeSeries`] from (interval name, value) pairs
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<IntervalID>,
    {
        let (names, values) = pairs
            .into_iter()
            .map(|(name, value)| (name.into(), value))
            .unzip();

        Self {
            names,
            values,
            hourly_values: vec![0.0; HOURS_IN_YEAR as usize],
        }
    }

    /// Create a [`TimeSeries`] from a map of interval names to numbers
    pub fn from_value(value: &Value) -> Result<Self> {
        let map = value
            .as_map()
            .context("Expected a map of interval names to values")?;
        let pairs: Vec<(IntervalID, f64)> = map
            .iter()
            .map(|(name, value)| {
                let number = value
                    .as_number()
                    .with_context(|| format!("Value for interval '{name}' is not a number"))?;
                Ok((IntervalID::new(name), number))
            })
            .collect::<Result<_>>()?;

        Ok(Self::from_pairs(pairs))
    }

    /// The interval names, in order
    pub fn names(&self) -> &[IntervalID] {
        &self.names
    }

    /// The values for each interval, in order
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Iterate over (interval name, value) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&IntervalID, f64)> {
        self.names.iter().zip(self.values.iter().copied())
    }

    /// The values of the timeseries resampled to each hour of the year.
    ///
    /// These are all zero until the timeseries has been converted.
    pub fn hourly_values(&self) -> &[f64] {
        &self.hourly_values
    }

    /// Replace the hourly values
    pub(crate) fn set_hourly_values(&mut self, hourly_values: Vec<f64>) {
        self.hourly_values = hourly_values;
    }
}

impl From<Vec<IntervalValue>> for TimeSeries {
    fn from(values: Vec<IntervalValue>) -> Self {
        Self::from_pairs(values.into_iter().map(|iv| (iv.name, iv.value)))
    }
}

/// Convert interval values into a map of interval name to value, preserving their order
pub fn interval_values_to_value(values: Vec<IntervalValue>) -> Value {
    let map: DataMap = values
        .into_iter()
        .map(|iv| (iv.name.to_string(), Value::Number(iv.value)))
        .collect();

    Value::Map(map)
}
