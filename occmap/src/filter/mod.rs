//! Attribute filters applied to occurrence features.
//!
//! A [`FilterSpec`] combines an inclusive [`YearRange`] with an optional set
//! of categories (basis of record). An absent category set matches every
//! category; a present one matches only its members, so an unknown label
//! matches nothing.

use std::collections::BTreeSet;
use thiserror::Error;

/// Errors raised while building filters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// Lower bound is greater than the upper bound
    #[error("Invalid year range: {min} is after {max}")]
    InvertedRange { min: i32, max: i32 },
}

/// Inclusive range of years; either bound may be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct YearRange {
    min: Option<i32>,
    max: Option<i32>,
}

impl YearRange {
    /// A range that accepts every feature, with or without a year.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// A range accepting exactly one year.
    pub fn exact(year: i32) -> Self {
        Self {
            min: Some(year),
            max: Some(year),
        }
    }

    /// Creates a range from optional bounds.
    pub fn new(min: Option<i32>, max: Option<i32>) -> Result<Self, FilterError> {
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(FilterError::InvertedRange { min, max });
            }
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> Option<i32> {
        self.min
    }

    pub fn max(&self) -> Option<i32> {
        self.max
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Checks a feature's year against the range.
    ///
    /// Features without a year only pass an unbounded range.
    pub fn contains(&self, year: Option<i32>) -> bool {
        match year {
            None => self.is_unbounded(),
            Some(year) => {
                self.min.map_or(true, |min| year >= min) && self.max.map_or(true, |max| year <= max)
            }
        }
    }
}

/// Year and category filter for one request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSpec {
    years: YearRange,
    categories: Option<BTreeSet<String>>,
}

impl FilterSpec {
    /// A filter that matches everything.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restricts the filter to a year range.
    pub fn with_years(mut self, years: YearRange) -> Self {
        self.years = years;
        self
    }

    /// Restricts the filter to a set of categories.
    ///
    /// An empty iterator leaves the filter matching all categories.
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = categories.into_iter().map(Into::into).collect();
        self.categories = if set.is_empty() { None } else { Some(set) };
        self
    }

    pub fn years(&self) -> &YearRange {
        &self.years
    }

    pub fn categories(&self) -> Option<&BTreeSet<String>> {
        self.categories.as_ref()
    }

    /// Checks a category label against the category set.
    pub fn matches_category(&self, category: &str) -> bool {
        self.categories
            .as_ref()
            .map_or(true, |set| set.contains(category))
    }

    /// Checks a year against the year range.
    pub fn matches_year(&self, year: Option<i32>) -> bool {
        self.years.contains(year)
    }

    /// Checks both the year and the category of a feature.
    pub fn matches(&self, year: Option<i32>, category: &str) -> bool {
        self.matches_year(year) && self.matches_category(category)
    }
}
