//! City resource model.
//!
//! # Invariants
//! - `name` is not blank.
//! - Point-of-interest ids are unique within one city.

use crate::copy::{CopyContext, CopyResult, DeepCopy};
use crate::store::keyed_store::StoreKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable city identifier; doubles as the keyed store key.
pub type CityId = StoreKey;

/// Point of interest owned by one city.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// Stored city entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub id: CityId,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub points_of_interest: Vec<PointOfInterest>,
}

/// Validation errors for city write paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CityValidationError {
    EmptyName(CityId),
    DuplicatePointOfInterest { city_id: CityId, point_id: i64 },
}

impl Display for CityValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName(id) => write!(f, "city {id} has an empty name"),
            Self::DuplicatePointOfInterest { city_id, point_id } => write!(
                f,
                "city {city_id} lists point of interest {point_id} more than once"
            ),
        }
    }
}

impl Error for CityValidationError {}

impl City {
    pub fn new(id: CityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            points_of_interest: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_point_of_interest(mut self, point: PointOfInterest) -> Self {
        self.points_of_interest.push(point);
        self
    }

    pub fn validate(&self) -> Result<(), CityValidationError> {
        if self.name.trim().is_empty() {
            return Err(CityValidationError::EmptyName(self.id));
        }

        let mut seen = BTreeSet::new();
        for point in &self.points_of_interest {
            if !seen.insert(point.id) {
                return Err(CityValidationError::DuplicatePointOfInterest {
                    city_id: self.id,
                    point_id: point.id,
                });
            }
        }
        Ok(())
    }

    /// Drops points of interest, as list endpoints never return them.
    pub fn into_summary(mut self) -> Self {
        self.points_of_interest.clear();
        self
    }
}

impl PointOfInterest {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
        }
    }
}

impl DeepCopy for PointOfInterest {
    fn deep_copy_in(&self, ctx: &mut CopyContext) -> CopyResult<Self> {
        ctx.enter(|ctx| {
            Ok(Self {
                id: self.id,
                name: self.name.deep_copy_in(ctx)?,
                description: self.description.deep_copy_in(ctx)?,
            })
        })
    }
}

impl DeepCopy for City {
    fn deep_copy_in(&self, ctx: &mut CopyContext) -> CopyResult<Self> {
        ctx.enter(|ctx| {
            Ok(Self {
                id: self.id,
                name: self.name.deep_copy_in(ctx)?,
                description: self.description.deep_copy_in(ctx)?,
                points_of_interest: self.points_of_interest.deep_copy_in(ctx)?,
            })
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointOfInterestDto {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// City with its points of interest, for detail responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityDto {
    pub id: CityId,
    pub name: String,
    pub description: Option<String>,
    pub number_of_points_of_interest: usize,
    pub points_of_interest: Vec<PointOfInterestDto>,
}

/// City without points of interest, for list responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityWithoutPointsOfInterestDto {
    pub id: CityId,
    pub name: String,
    pub description: Option<String>,
}

impl From<PointOfInterest> for PointOfInterestDto {
    fn from(value: PointOfInterest) -> Self {
        Self {
            id: value.id,
            name: value.name,
            description: value.description,
        }
    }
}

impl From<City> for CityDto {
    fn from(value: City) -> Self {
        Self {
            id: value.id,
            name: value.name,
            description: value.description,
            number_of_points_of_interest: value.points_of_interest.len(),
            points_of_interest: value
                .points_of_interest
                .into_iter()
                .map(PointOfInterestDto::from)
                .collect(),
        }
    }
}

impl From<City> for CityWithoutPointsOfInterestDto {
    fn from(value: City) -> Self {
        Self {
            id: value.id,
            name: value.name,
            description: value.description,
        }
    }
}
