//! Point set document parsing and validation
//!
//! The document is a JSON object:
//!
//! ```json
//! {
//!   "classes": ["water", "land"],
//!   "points": {"img.png": {"water": [{"x": 1, "y": 1}]}},
//!   "colors": {"water": [0, 0, 255]}
//! }
//! ```
//!
//! Older documents store the per-image mapping under `images` instead of
//! `points`; both are accepted. Images and classes are kept in document
//! order so extraction visits them deterministically.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use log::{debug, info, warn};
use serde_json::{json, Map, Value};

use crate::errors::{FeatureError, FeatureResult};

/// Key holding the per-image annotations
const POINTS_KEY: &str = "points";

/// Legacy name of [`POINTS_KEY`]
const LEGACY_POINTS_KEY: &str = "images";

/// An annotated pixel coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelPoint {
    /// Column, from the left edge
    pub x: usize,
    /// Row, from the top edge
    pub y: usize,
}

impl PixelPoint {
    /// Create a new point
    pub fn new(x: usize, y: usize) -> Self {
        PixelPoint { x, y }
    }
}

/// Points of one class within one image
#[derive(Debug, Clone, PartialEq)]
pub struct ClassAnnotations {
    /// Class name, expected to appear in the point set's classes
    pub name: String,
    /// Annotated pixels in document order
    pub points: Vec<PixelPoint>,
}

/// All annotations for one image
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAnnotations {
    /// Image file name, relative to the point set directory
    pub image: String,
    /// Per-class annotations in document order
    pub classes: Vec<ClassAnnotations>,
}

/// Loaded annotation data
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointSet {
    /// Ordered class names; the position defines the one-hot index
    pub classes: Vec<String>,
    /// Per-image annotations in document order
    pub images: Vec<ImageAnnotations>,
    /// Display colors keyed by class name, carried through untouched
    pub colors: Map<String, Value>,
    /// Directory image names are resolved against
    pub directory: PathBuf,
}

impl PointSet {
    /// Load a point set from a JSON file
    ///
    /// Image names are resolved relative to the file's directory.
    ///
    /// # Arguments
    /// * `path` - Path to the point file
    ///
    /// # Returns
    /// The parsed point set or an error
    pub fn load<P: AsRef<Path>>(path: P) -> FeatureResult<Self> {
        let path = path.as_ref();
        info!("Loading points from {}", path.display());

        let contents = fs::read_to_string(path)?;
        let directory = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Self::from_json(&contents, directory)
    }

    /// Parse a point set from JSON text
    pub fn from_json<P: Into<PathBuf>>(text: &str, directory: P) -> FeatureResult<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value, directory)
    }

    /// Parse a point set from an already decoded JSON document
    pub fn from_value<P: Into<PathBuf>>(value: &Value, directory: P) -> FeatureResult<Self> {
        let document = value
            .as_object()
            .ok_or_else(|| FeatureError::MalformedPoints("document is not an object".to_string()))?;

        let classes = parse_classes(document)?;

        let points_value = match (document.get(POINTS_KEY), document.get(LEGACY_POINTS_KEY)) {
            (Some(points), _) => points,
            (None, Some(images)) => {
                debug!("Reading legacy '{}' key as points", LEGACY_POINTS_KEY);
                images
            }
            (None, None) => return Err(FeatureError::MalformedPoints("missing 'points'".to_string())),
        };

        let images = parse_images(points_value)?;

        let colors = match document.get("colors") {
            Some(Value::Object(colors)) => colors.clone(),
            Some(Value::Null) | None => {
                warn!("Point set has no colors");
                Map::new()
            }
            Some(other) => {
                return Err(FeatureError::MalformedPoints(format!("'colors' must be an object, got {}", other)));
            }
        };

        let point_set = PointSet { classes, images, colors, directory: directory.into() };
        debug!("Parsed {} class(es), {} image(s), {} point(s)",
               point_set.classes.len(), point_set.images.len(), point_set.point_count());

        Ok(point_set)
    }

    /// Encode as a JSON document using the current `points` key
    pub fn to_value(&self) -> Value {
        let mut points = Map::new();
        for image in &self.images {
            let mut classes = Map::new();
            for class in &image.classes {
                let coordinates: Vec<Value> = class.points
                    .iter()
                    .map(|p| json!({"x": p.x, "y": p.y}))
                    .collect();
                classes.insert(class.name.clone(), Value::Array(coordinates));
            }
            points.insert(image.image.clone(), Value::Object(classes));
        }

        json!({
            "classes": self.classes,
            "points": points,
            "colors": self.colors,
        })
    }

    /// Encode as JSON text
    pub fn to_json(&self) -> FeatureResult<String> {
        Ok(serde_json::to_string(&self.to_value())?)
    }

    /// Check that every class used by the annotations is listed in `classes`
    pub fn validate(&self) -> FeatureResult<()> {
        for image in &self.images {
            for class in &image.classes {
                if self.class_index(&class.name).is_none() {
                    return Err(FeatureError::InconsistentPointSet(class.name.clone()));
                }
            }
        }
        Ok(())
    }

    /// Position of a class name in `classes`
    pub fn class_index(&self, name: &str) -> Option<usize> {
        self.classes.iter().position(|c| c == name)
    }

    /// Total number of annotated points across all images and classes
    pub fn point_count(&self) -> usize {
        self.images
            .iter()
            .flat_map(|image| image.classes.iter())
            .map(|class| class.points.len())
            .sum()
    }

    /// Full path of an image named in the point set
    pub fn image_path(&self, image: &str) -> PathBuf {
        self.directory.join(image)
    }
}

fn parse_classes(document: &Map<String, Value>) -> FeatureResult<Vec<String>> {
    let list = document
        .get("classes")
        .and_then(Value::as_array)
        .ok_or_else(|| FeatureError::MalformedPoints("'classes' must be an array".to_string()))?;

    let mut seen = HashSet::new();
    let mut classes = Vec::with_capacity(list.len());
    for entry in list {
        let name = entry
            .as_str()
            .ok_or_else(|| FeatureError::MalformedPoints(format!("class name {} is not a string", entry)))?;
        if !seen.insert(name) {
            return Err(FeatureError::MalformedPoints(format!("duplicate class '{}'", name)));
        }
        classes.push(name.to_string());
    }

    Ok(classes)
}

fn parse_images(value: &Value) -> FeatureResult<Vec<ImageAnnotations>> {
    let images = value
        .as_object()
        .ok_or_else(|| FeatureError::MalformedPoints("'points' must be an object".to_string()))?;

    let mut parsed = Vec::with_capacity(images.len());
    for (image, classes_value) in images {
        let classes = classes_value
            .as_object()
            .ok_or_else(|| FeatureError::MalformedPoints(format!("entry for '{}' must be an object", image)))?;

        let mut class_annotations = Vec::with_capacity(classes.len());
        for (name, points_value) in classes {
            let points = points_value
                .as_array()
                .ok_or_else(|| FeatureError::MalformedPoints(
                    format!("points of '{}' in '{}' must be an array", name, image)))?
                .iter()
                .map(parse_point)
                .collect::<FeatureResult<Vec<_>>>()?;
            class_annotations.push(ClassAnnotations { name: name.clone(), points });
        }

        parsed.push(ImageAnnotations { image: image.clone(), classes: class_annotations });
    }

    Ok(parsed)
}

fn parse_point(value: &Value) -> FeatureResult<PixelPoint> {
    let x = parse_coordinate(value, "x")?;
    let y = parse_coordinate(value, "y")?;
    Ok(PixelPoint::new(x, y))
}

/// Read one coordinate, truncating fractional values toward zero
fn parse_coordinate(point: &Value, axis: &str) -> FeatureResult<usize> {
    let raw = point
        .get(axis)
        .ok_or_else(|| FeatureError::MalformedPoints(format!("point {} has no '{}'", point, axis)))?;

    if let Some(v) = raw.as_u64() {
        return Ok(v as usize);
    }

    match raw.as_f64() {
        Some(v) if v.is_finite() && v > -1.0 => Ok(v.trunc() as usize),
        _ => Err(FeatureError::MalformedPoints(format!("'{}' of point {} is not a pixel index", axis, point))),
    }
}
