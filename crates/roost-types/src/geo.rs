//! Minimal GeoJSON geometry model.
//!
//! Only geometry objects are accepted (no `Feature` wrappers). Parsing checks
//! structure, not topology: positions need two or three finite ordinates and
//! polygon rings need at least four positions once closed. Open rings are
//! closed by repeating their first position.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// `[longitude, latitude]` with an optional altitude.
pub type Position = Vec<f64>;

#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("malformed GeoJSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid {kind}: {reason}")]
    Invalid { kind: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: Position },
    MultiPoint { coordinates: Vec<Position> },
    LineString { coordinates: Vec<Position> },
    MultiLineString { coordinates: Vec<Vec<Position>> },
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
    GeometryCollection { geometries: Vec<Geometry> },
}

impl Geometry {
    /// Parse and structurally validate a GeoJSON geometry object.
    pub fn parse(geojson: &str) -> Result<Self, GeometryError> {
        let mut geom: Geometry = serde_json::from_str(geojson)?;
        geom.normalize()?;
        Ok(geom)
    }

    /// The GeoJSON `type` member.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Point { .. } => "Point",
            Self::MultiPoint { .. } => "MultiPoint",
            Self::LineString { .. } => "LineString",
            Self::MultiLineString { .. } => "MultiLineString",
            Self::Polygon { .. } => "Polygon",
            Self::MultiPolygon { .. } => "MultiPolygon",
            Self::GeometryCollection { .. } => "GeometryCollection",
        }
    }

    pub fn is_multi_polygon(&self) -> bool {
        matches!(self, Self::MultiPolygon { .. })
    }

    pub fn to_json(&self) -> Result<String, GeometryError> {
        Ok(serde_json::to_string(self)?)
    }

    fn normalize(&mut self) -> Result<(), GeometryError> {
        let kind = self.kind();
        match self {
            Self::Point { coordinates } => check_position(kind, coordinates),
            Self::MultiPoint { coordinates } => {
                coordinates.iter().try_for_each(|p| check_position(kind, p))
            }
            Self::LineString { coordinates } => check_line(kind, coordinates),
            Self::MultiLineString { coordinates } => {
                coordinates.iter().try_for_each(|l| check_line(kind, l))
            }
            Self::Polygon { coordinates } => normalize_polygon(kind, coordinates),
            Self::MultiPolygon { coordinates } => {
                if coordinates.is_empty() {
                    return Err(invalid(kind, "no polygons"));
                }
                coordinates
                    .iter_mut()
                    .try_for_each(|polygon| normalize_polygon(kind, polygon))
            }
            Self::GeometryCollection { geometries } => {
                geometries.iter_mut().try_for_each(Geometry::normalize)
            }
        }
    }
}

fn invalid(kind: &'static str, reason: impl Into<String>) -> GeometryError {
    GeometryError::Invalid {
        kind,
        reason: reason.into(),
    }
}

fn check_position(kind: &'static str, position: &Position) -> Result<(), GeometryError> {
    if !(2..=3).contains(&position.len()) {
        return Err(invalid(
            kind,
            format!("position has {} ordinates", position.len()),
        ));
    }
    if position.iter().any(|v| !v.is_finite()) {
        return Err(invalid(kind, "position has a non-finite ordinate"));
    }
    Ok(())
}

fn check_line(kind: &'static str, line: &[Position]) -> Result<(), GeometryError> {
    if line.len() < 2 {
        return Err(invalid(kind, "line needs at least 2 positions"));
    }
    line.iter().try_for_each(|p| check_position(kind, p))
}

fn normalize_polygon(kind: &'static str, rings: &mut [Vec<Position>]) -> Result<(), GeometryError> {
    if rings.is_empty() {
        return Err(invalid(kind, "polygon has no exterior ring"));
    }
    for ring in rings.iter_mut() {
        ring.iter().try_for_each(|p| check_position(kind, p))?;
        if let (Some(first), Some(last)) = (ring.first(), ring.last()) {
            if first != last {
                let first = first.clone();
                ring.push(first);
            }
        }
        if ring.len() < 4 {
            return Err(invalid(kind, "linear ring needs at least 4 positions"));
        }
    }
    Ok(())
}
