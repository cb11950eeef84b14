//! Code for converting data between sets of regions.
//!
//! A [`Region`] is a named polygon. Regions are grouped into named region sets, which are held by
//! a [`RegionRegister`].
//!
//! Data is converted between two region sets in proportion to area: each source region passes on
//! to a target region the fraction of its value given by the share of its area lying inside the
//! target. Parts of a source region not covered by any target region are lost, and target regions
//! with no overlapping source region receive zero.
use crate::error::{config_bail, not_found_bail};
use crate::id::{RegionID, RegionSetID};
use crate::value::{DataMap, Value, weighted_sum};
use anyhow::{Context, Result};
use geo::{Area, BooleanOps, LineString, Polygon};
use indexmap::IndexMap;
use itertools::Itertools;
use log::debug;

/// A named area
#[derive(PartialEq, Clone, Debug)]
pub struct Region {
    /// Unique name of the region within its set
    pub name: RegionID,
    /// The outline of the region
    pub shape: Polygon<f64>,
    area: f64,
}

impl Region {
    /// Create a new [`Region`] from the vertices of its outline.
    ///
    /// The outline is closed automatically and must enclose a non-zero area.
    pub fn new(name: RegionID, vertices: Vec<(f64, f64)>) -> Result<Self> {
        if vertices.len() < 3 {
            config_bail!(
                "Region '{name}' has {} vertices, but at least 3 are needed",
                vertices.len()
            );
        }

        let shape = Polygon::new(LineString::from(vertices), Vec::new());
        let area = shape.unsigned_area();
        if area <= 0.0 {
            config_bail!("Region '{name}' has zero area");
        }

        Ok(Self { name, shape, area })
    }

    /// The area of the region
    pub fn area(&self) -> f64 {
        self.area
    }

    /// The fraction of this region's area which lies within `other`
    pub fn proportion_intersecting(&self, other: &Region) -> f64 {
        self.shape.intersection(&other.shape).unsigned_area() / self.area
    }
}

/// The definition of a region, as supplied by the configuration
#[derive(PartialEq, Debug, Clone)]
pub struct RegionDefinition {
    /// Unique name of the region
    pub name: String,
    /// The (x, y) vertices of the region's outline, in order
    pub vertices: Vec<(f64, f64)>,
}

/// A named, ordered set of regions
pub type RegionSet = IndexMap<RegionID, Region>;

/// Holds the region sets used by the models in a system-of-systems model
#[derive(PartialEq, Debug, Default)]
pub struct RegionRegister {
    sets: IndexMap<RegionSetID, RegionSet>,
}

impl RegionRegister {
    /// Create an empty register
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a set of regions under `set_name`, replacing any existing set with that name
    pub fn add_region_set<I>(&mut self, set_name: RegionSetID, regions: I) -> Result<()>
    where
        I: IntoIterator<Item = RegionDefinition>,
    {
        let mut set = RegionSet::new();
        for definition in regions {
            let name: RegionID = definition.name.into();
            if set.contains_key(&name) {
                config_bail!("Duplicate region '{name}' in region set '{set_name}'");
            }

            let region = Region::new(name.clone(), definition.vertices)
                .with_context(|| format!("Error adding region set '{set_name}'"))?;
            set.insert(name, region);
        }

        debug!("Adding region set '{set_name}' with {} regions", set.len());
        self.sets.insert(set_name, set);

        Ok(())
    }

    /// Iterate over the names of the registered region sets
    pub fn region_set_names(&self) -> impl Iterator<Item = &RegionSetID> {
        self.sets.keys()
    }

    /// Whether a region set called `set_name` has been registered
    pub fn contains_set(&self, set_name: &str) -> bool {
        self.sets.contains_key(set_name)
    }

    /// Get the regions in the specified set, in the order in which they were defined
    pub fn get_regions_in_set(&self, set_name: &str) -> Result<&RegionSet> {
        match self.sets.get(set_name) {
            Some(set) => Ok(set),
            None => not_found_bail!("The region set '{set_name}' is not in the register"),
        }
    }

    /// Convert data from the `from_set` region set to the `to_set` region set.
    ///
    /// `value` must be a map from names of regions in `from_set` to values. These may be numbers or
    /// maps of numbers (e.g. timeseries), which are converted element by element.
    ///
    /// # Returns
    ///
    /// A map with one value for each region in `to_set`, in the order the regions were defined.
    pub fn convert(&self, value: &Value, from_set: &str, to_set: &str) -> Result<Value> {
        let source_regions = self.get_regions_in_set(from_set)?;
        let target_regions = self.get_regions_in_set(to_set)?;
        let data = value
            .as_map()
            .context("Expected a map of region names to values")?;

        let mut sources = Vec::with_capacity(data.len());
        for (name, value) in data {
            let Some(region) = source_regions.get(name.as_str()) else {
                not_found_bail!("The region '{name}' is not in region set '{from_set}'");
            };
            sources.push((region, value));
        }

        debug!("Converting data from region set '{from_set}' to '{to_set}'");
        let mut converted = DataMap::new();
        for (name, target) in target_regions {
            let terms = sources
                .iter()
                .map(|(source, value)| (source.proportion_intersecting(target), *value))
                .collect_vec();
            converted.insert(name.to_string(), weighted_sum(terms)?);
        }

        Ok(Value::Map(converted))
    }
}
