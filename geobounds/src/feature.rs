use std::fmt::Display;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};
use thiserror::Error;

use crate::{BoundingRegion, Geometry, accumulate_features};

pub type Properties = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureId {
    Number(Number),
    Text(String),
}

impl Display for FeatureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeatureId::Number(n) => write!(f, "{n}"),
            FeatureId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for FeatureId {
    fn from(value: u64) -> Self {
        FeatureId::Number(value.into())
    }
}

impl From<&str> for FeatureId {
    fn from(value: &str) -> Self {
        FeatureId::Text(value.to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct Feature {
    #[serde(
        default,
        deserialize_with = "lenient_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<FeatureId>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default, deserialize_with = "object_or_empty")]
    pub properties: Properties,
}

// Ids other than a number or a string are dropped.
fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<FeatureId>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => Some(FeatureId::Number(n)),
        Value::String(s) => Some(FeatureId::Text(s)),
        _ => None,
    })
}

fn object_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Properties, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(map) => map,
        _ => Properties::new(),
    })
}

impl Feature {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry: Some(geometry),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<FeatureId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn bounds(&self) -> BoundingRegion {
        self.geometry
            .as_ref()
            .map_or_else(BoundingRegion::new, Geometry::bounds)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct FeatureCollection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<[f64; 4]>,
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Error)]
pub enum GeoJsonError {
    #[error("invalid GeoJSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            bbox: None,
            features,
        }
    }

    pub fn from_json(text: &str) -> Result<Self, GeoJsonError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn bounds(&self) -> BoundingRegion {
        let mut region = BoundingRegion::new();
        accumulate_features(&self.features, &mut region);
        region
    }

    /// Sets the `bbox` member from the features' bounds, clearing it when
    /// nothing has coordinates.
    pub fn with_computed_bbox(mut self) -> Self {
        self.bbox = self.bounds().bounds().map(|b| b.to_bbox());
        self
    }

    pub fn find(&self, id: &FeatureId) -> Option<&Feature> {
        self.features.iter().find(|f| f.id.as_ref() == Some(id))
    }

    /// Features whose geometry is missing or could not be classified.
    pub fn unrecognized_count(&self) -> usize {
        self.features
            .iter()
            .filter(|f| !f.geometry.as_ref().is_some_and(Geometry::is_recognized))
            .count()
    }
}

impl FromIterator<Feature> for FeatureCollection {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
