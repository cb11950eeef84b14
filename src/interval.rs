//! Code for converting data between sets of time intervals.
//!
//! An [`Interval`] is a named period within a year, defined by ISO8601 durations measured from the
//! start of a reference year. Intervals are grouped into named interval sets, which are held by an
//! [`IntervalRegister`].
//!
//! Conversion between two interval sets goes via an hourly representation of the year:
//!
//! * Upscaling divides each value equally between the hours of its interval (apportionment)
//! * Downscaling sums the hourly values falling within each target interval (accumulation)
//!
//! This treats all data as additive quantities (e.g. energy generated, emissions) and assumes a
//! non-leap year of 8760 hours.
use crate::error::{SosError, config_bail, not_found_bail};
use crate::id::{IntervalID, IntervalSetID};
use crate::timeseries::TimeSeries;
use anyhow::{Context, Result, bail};
use indexmap::IndexMap;
use log::{debug, info};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt::Display;
use std::ops::Range;

pub mod duration;
use duration::IsoDuration;

/// Number of hours in the (non-leap) reference year
pub const HOURS_IN_YEAR: u32 = 8760;

/// The default reference year for interval definitions
pub const DEFAULT_BASE_YEAR: i32 = 2010;

/// A named period within a year
#[derive(PartialEq, Clone, Debug)]
pub struct Interval {
    /// Unique name of the interval
    pub name: IntervalID,
    /// Time elapsed from the start of the year to the start of the interval
    pub start: IsoDuration,
    /// Time elapsed from the start of the year to the end of the interval
    pub end: IsoDuration,
    /// The reference year against which `start` and `end` are measured
    pub base_year: i32,
    start_hour: u32,
    end_hour: u32,
}

impl Interval {
    /// Create a new [`Interval`], parsing the `start` and `end` durations.
    ///
    /// `end` may fall before `start`, in which case the interval wraps around the end of the year.
    pub fn new(name: IntervalID, start: &str, end: &str, base_year: i32) -> Result<Self> {
        let parse_hour = |value: &str| -> Result<(IsoDuration, u32)> {
            let duration: IsoDuration = value.parse()?;
            let hours = duration.hours_from_year_start(base_year)?;
            match u32::try_from(hours) {
                Ok(hour) if hour <= HOURS_IN_YEAR => Ok((duration, hour)),
                _ => bail!("{value} is beyond the end of the year"),
            }
        };

        let (start, start_hour) = parse_hour(start).map_err(|err| {
            SosError::Configuration(format!("Invalid start for interval '{name}': {err}"))
        })?;
        let (end, end_hour) = parse_hour(end).map_err(|err| {
            SosError::Configuration(format!("Invalid end for interval '{name}': {err}"))
        })?;

        Ok(Self {
            name,
            start,
            end,
            base_year,
            start_hour,
            end_hour,
        })
    }

    /// The start and end of the interval as hours of the year, where hour 0 is 00:00 on 1st
    /// January.
    pub fn to_hours(&self) -> (u32, u32) {
        (self.start_hour, self.end_hour)
    }

    /// Whether the interval crosses the boundary between one year and the next
    pub fn is_wrapping(&self) -> bool {
        self.end_hour < self.start_hour
    }

    /// The number of hours covered by the interval
    pub fn duration_hours(&self) -> u32 {
        if self.is_wrapping() {
            HOURS_IN_YEAR - self.start_hour + self.end_hour
        } else {
            self.end_hour - self.start_hour
        }
    }

    /// The ranges of hour indexes covered by this interval.
    ///
    /// A wrapping interval is split into a range at the end of the year and one at the start.
    pub fn hour_ranges(&self) -> Vec<Range<usize>> {
        let (start, end) = (self.start_hour as usize, self.end_hour as usize);
        if self.is_wrapping() {
            vec![start..HOURS_IN_YEAR as usize, 0..end]
        } else {
            vec![start..end]
        }
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Interval '{}' starts at hour {} and ends at hour {}",
            self.name, self.start_hour, self.end_hour
        )
    }
}

/// The definition of an interval, as supplied by the configuration
#[derive(PartialEq, Debug, Deserialize, Clone)]
pub struct IntervalDefinition {
    /// Unique name of the interval
    pub name: String,
    /// ISO8601 duration from the start of the year to the start of the interval
    pub start: String,
    /// ISO8601 duration from the start of the year to the end of the interval
    pub end: String,
}

/// A named, ordered set of intervals
pub type IntervalSet = IndexMap<IntervalID, Interval>;

/// A value associated with a single interval
#[derive(PartialEq, Clone, Debug)]
pub struct IntervalValue {
    /// The name of the interval
    pub name: IntervalID,
    /// The quantity for the interval
    pub value: f64,
}

/// Holds the interval sets used by the models in a system-of-systems model
#[derive(PartialEq, Debug)]
pub struct IntervalRegister {
    base_year: i32,
    sets: IndexMap<IntervalSetID, IntervalSet>,
    set_for_interval: HashMap<IntervalID, IntervalSetID>,
}

impl Default for IntervalRegister {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_YEAR)
    }
}

impl IntervalRegister {
    /// Create an empty register whose intervals are measured from the start of `base_year`
    pub fn new(base_year: i32) -> Self {
        Self {
            base_year,
            sets: IndexMap::new(),
            set_for_interval: HashMap::new(),
        }
    }

    /// The reference year for all interval sets
    pub fn base_year(&self) -> i32 {
        self.base_year
    }

    /// Register a set of intervals under `set_name`.
    ///
    /// Any existing set with the same name is replaced. Interval names must be unique across all
    /// registered sets.
    pub fn add_interval_set<I>(&mut self, set_name: IntervalSetID, intervals: I) -> Result<()>
    where
        I: IntoIterator<Item = IntervalDefinition>,
    {
        // Build the whole set first so the register is unchanged on error
        let mut set = IntervalSet::new();
        for definition in intervals {
            let name: IntervalID = definition.name.into();
            if set.contains_key(&name) {
                config_bail!("Duplicate interval '{name}' in interval set '{set_name}'");
            }
            if let Some(owner) = self.set_for_interval.get(&name)
                && *owner != set_name
            {
                config_bail!(
                    "Interval '{name}' in interval set '{set_name}' is already defined in \
                     interval set '{owner}'"
                );
            }

            let interval = Interval::new(
                name.clone(),
                &definition.start,
                &definition.end,
                self.base_year,
            )
            .with_context(|| format!("Error adding interval set '{set_name}'"))?;
            debug!("Adding interval '{name}' to set '{set_name}'");
            set.insert(name, interval);
        }

        if let Some(old_set) = self.sets.get(&set_name) {
            for name in old_set.keys() {
                self.set_for_interval.remove(name);
            }
        }
        for name in set.keys() {
            self.set_for_interval.insert(name.clone(), set_name.clone());
        }

        info!("Adding interval set '{set_name}' to register");
        self.sets.insert(set_name, set);

        Ok(())
    }

    /// Iterate over the names of the registered interval sets
    pub fn interval_set_names(&self) -> impl Iterator<Item = &IntervalSetID> {
        self.sets.keys()
    }

    /// Whether an interval set called `set_name` has been registered
    pub fn contains_set(&self, set_name: &str) -> bool {
        self.sets.contains_key(set_name)
    }

    /// Get the intervals in the specified set, in the order in which they were defined
    pub fn get_intervals_in_set(&self, set_name: &str) -> Result<&IntervalSet> {
        match self.sets.get(set_name) {
            Some(set) => Ok(set),
            None => not_found_bail!("The interval set '{set_name}' is not in the register"),
        }
    }

    /// Get an interval by its unique name
    pub fn get_interval(&self, name: &str) -> Result<&Interval> {
        let Some(set_name) = self.set_for_interval.get(name) else {
            not_found_bail!("The interval '{name}' is not in the register");
        };

        Ok(&self.sets[set_name][name])
    }

    /// Convert `timeseries` from the `from_set` interval set to the `to_set` interval set.
    ///
    /// The values are first apportioned to hourly buckets (see [`IntervalRegister::apportion`])
    /// then summed for each target interval (see [`IntervalRegister::aggregate`]). Every interval
    /// named in `timeseries` must belong to `from_set`.
    ///
    /// # Returns
    ///
    /// One value for each interval in `to_set`, in the order the intervals were defined.
    pub fn convert(
        &self,
        timeseries: &mut TimeSeries,
        from_set: &str,
        to_set: &str,
    ) -> Result<Vec<IntervalValue>> {
        let source_intervals = self.get_intervals_in_set(from_set)?;
        self.get_intervals_in_set(to_set)?;
        if let Some(name) = timeseries
            .names()
            .iter()
            .find(|name| !source_intervals.contains_key(*name))
        {
            not_found_bail!("The interval '{name}' is not in interval set '{from_set}'");
        }
        debug!("Converting timeseries from '{from_set}' to '{to_set}'");

        self.apportion(timeseries)?;
        self.aggregate(timeseries.hourly_values(), to_set)
    }

    /// Divide each value of `timeseries` equally between the hours of its interval, storing the
    /// result in the timeseries' hourly values.
    ///
    /// The intervals of the timeseries must not overlap and must have non-zero length.
    pub fn apportion(&self, timeseries: &mut TimeSeries) -> Result<()> {
        let mut hourly = vec![0.0; HOURS_IN_YEAR as usize];
        let mut filled = vec![false; HOURS_IN_YEAR as usize];
        for (name, value) in timeseries.iter() {
            let interval = self.get_interval(name.as_str())?;
            let hours = interval.duration_hours();
            if hours == 0 {
                config_bail!("Cannot apportion value to interval '{name}' as it has zero length");
            }

            let apportioned_value = value / f64::from(hours);
            debug!("Apportioning {value} to {interval} ({apportioned_value} per hour)");
            for range in interval.hour_ranges() {
                if filled[range.clone()].iter().any(|is_filled| *is_filled) {
                    config_bail!("Interval '{name}' overlaps with another interval in timeseries");
                }
                filled[range.clone()].fill(true);
                hourly[range].fill(apportioned_value);
            }
        }

        timeseries.set_hourly_values(hourly);

        Ok(())
    }

    /// Sum hourly values for each interval in `to_set`.
    ///
    /// Intervals which wrap around the end of the year include the hours at both the end and the
    /// start of the year.
    pub fn aggregate(&self, hourly: &[f64], to_set: &str) -> Result<Vec<IntervalValue>> {
        let target_intervals = self.get_intervals_in_set(to_set)?;
        if hourly.len() != HOURS_IN_YEAR as usize {
            config_bail!(
                "Expected {HOURS_IN_YEAR} hourly values but got {}",
                hourly.len()
            );
        }

        let results = target_intervals
            .values()
            .map(|interval| {
                let value = interval
                    .hour_ranges()
                    .into_iter()
                    .map(|range| hourly[range].iter().sum::<f64>())
                    .sum::<f64>();
                debug!("Resampled to {interval}: {value}");
                IntervalValue {
                    name: interval.name.clone(),
                    value,
                }
            })
            .collect();

        Ok(results)
    }
}
