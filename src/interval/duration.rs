//! Parsing of ISO8601 durations used to define interval boundaries.
use anyhow::{Context, Result, bail, ensure};
use chrono::{Months, NaiveDate};
use std::fmt::Display;
use std::str::FromStr;

/// Number of seconds in an hour
const SECONDS_PER_HOUR: u64 = 3600;

/// A duration in the ISO8601 format `PnYnMnWnDTnHnMnS`.
///
/// Years and months are calendar quantities, so the number of hours they represent depends on the
/// date they are measured from (see [`IsoDuration::hours_from_year_start`]).
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default)]
pub struct IsoDuration {
    /// Number of calendar years
    pub years: u32,
    /// Number of calendar months
    pub months: u32,
    /// Number of weeks
    pub weeks: u32,
    /// Number of days
    pub days: u32,
    /// Number of hours
    pub hours: u32,
    /// Number of minutes
    pub minutes: u32,
    /// Number of seconds
    pub seconds: u32,
}

impl FromStr for IsoDuration {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let body = s
            .strip_prefix('P')
            .with_context(|| format!("Invalid duration '{s}': must start with 'P'"))?;
        ensure!(!body.is_empty(), "Invalid duration '{s}': no components");

        let mut duration = IsoDuration::default();
        let mut in_time = false;
        let mut seen_component = false;
        let mut seen_time_component = false;
        // Position of the last designator in `PnYnMnWnDTnHnMnS`, which must strictly increase
        let mut last_position = None;
        let mut number = String::new();
        for c in body.chars() {
            match c {
                '0'..='9' => number.push(c),
                'T' => {
                    ensure!(
                        !in_time && number.is_empty(),
                        "Invalid duration '{s}': unexpected 'T'"
                    );
                    in_time = true;
                }
                designator => {
                    ensure!(
                        !number.is_empty(),
                        "Invalid duration '{s}': missing number before '{designator}'"
                    );
                    let value: u32 = number
                        .parse()
                        .with_context(|| format!("Invalid duration '{s}': number too large"))?;
                    number.clear();

                    let (position, field) = match (in_time, designator) {
                        (false, 'Y') => (0, &mut duration.years),
                        (false, 'M') => (1, &mut duration.months),
                        (false, 'W') => (2, &mut duration.weeks),
                        (false, 'D') => (3, &mut duration.days),
                        (true, 'H') => (4, &mut duration.hours),
                        (true, 'M') => (5, &mut duration.minutes),
                        (true, 'S') => (6, &mut duration.seconds),
                        _ => bail!("Invalid duration '{s}': unexpected '{designator}'"),
                    };
                    ensure!(
                        last_position.is_none_or(|last| position > last),
                        "Invalid duration '{s}': '{designator}' is repeated or out of order"
                    );
                    last_position = Some(position);
                    *field = value;
                    seen_component = true;
                    seen_time_component |= in_time;
                }
            }
        }

        ensure!(number.is_empty(), "Invalid duration '{s}': trailing number");
        ensure!(
            !in_time || seen_time_component,
            "Invalid duration '{s}': no time components after 'T'"
        );
        ensure!(seen_component, "Invalid duration '{s}': no components");

        Ok(duration)
    }
}

impl Display for IsoDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "P")?;
        for (value, designator) in [
            (self.years, 'Y'),
            (self.months, 'M'),
            (self.weeks, 'W'),
            (self.days, 'D'),
        ] {
            if value > 0 {
                write!(f, "{value}{designator}")?;
            }
        }

        if self.hours > 0 || self.minutes > 0 || self.seconds > 0 {
            write!(f, "T")?;
            for (value, designator) in [
                (self.hours, 'H'),
                (self.minutes, 'M'),
                (self.seconds, 'S'),
            ] {
                if value > 0 {
                    write!(f, "{value}{designator}")?;
                }
            }
        } else if *self == Self::default() {
            write!(f, "0D")?;
        }

        Ok(())
    }
}

impl IsoDuration {
    /// The number of whole hours elapsed between 00:00 on 1st January of `base_year` and the end
    /// of this duration.
    ///
    /// Years and months are added as calendar offsets, so e.g. `P1M` is 744 hours (31 days).
    pub fn hours_from_year_start(&self, base_year: i32) -> Result<u64> {
        let reference = NaiveDate::from_ymd_opt(base_year, 1, 1)
            .with_context(|| format!("Invalid base year: {base_year}"))?;
        let out_of_range = || format!("Duration {self} is out of range");
        let calendar_months = self
            .years
            .checked_mul(12)
            .and_then(|months| months.checked_add(self.months))
            .with_context(out_of_range)?;
        let shifted = reference
            .checked_add_months(Months::new(calendar_months))
            .with_context(out_of_range)?;
        let calendar_days = u64::try_from((shifted - reference).num_days())?;

        let seconds = calendar_days
            .checked_add(u64::from(self.weeks) * 7)
            .and_then(|days| days.checked_add(u64::from(self.days)))
            .and_then(|days| days.checked_mul(24 * SECONDS_PER_HOUR))
            .and_then(|seconds| seconds.checked_add(u64::from(self.hours) * SECONDS_PER_HOUR))
            .and_then(|seconds| seconds.checked_add(u64::from(self.minutes) * 60))
            .and_then(|seconds| seconds.checked_add(u64::from(self.seconds)))
            .with_context(out_of_range)?;

        Ok(seconds / SECONDS_PER_HOUR)
    }
}
