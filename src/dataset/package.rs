//! Vector package codec
//!
//! A package is written as a flat JSON document:
//!
//! ```json
//! {
//!   "classes": ["water", "land"],
//!   "labels": [[1, 0], [0, 1]],
//!   "data": [[0.1, 0.2, 0.3], [0.4, 0.5, 0.6]],
//!   "colors": {"water": [0, 0, 255]},
//!   "extractor": {"name": "WholePixel", "kwargs": {}}
//! }
//! ```
//!
//! Structure is validated on load and before saving, so a malformed
//! dataset is never handed to a trainer.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{FeatureError, FeatureResult};
use crate::extractor::{ExtractorFactory, ExtractorProvenance, FeatureExtractor, FeatureVector};
use super::one_hot::{hot_index, OneHotLabel};
use super::shuffle::shuffle_pairs;

/// Extracted dataset plus the provenance needed to reproduce it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorPackage {
    /// Ordered class names; label positions refer to this list
    pub classes: Vec<String>,
    /// One-hot labels, index-aligned with `data`
    pub labels: Vec<OneHotLabel>,
    /// Feature vectors, all of the same length
    pub data: Vec<FeatureVector>,
    /// Display colors keyed by class name
    #[serde(default)]
    pub colors: Map<String, Value>,
    /// Extractor that produced `data`
    pub extractor: ExtractorProvenance,
}

/// Headline numbers of a package
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackageSummary {
    /// Number of vector/label pairs
    pub total_points: usize,
    /// Length of each vector, 0 for an empty package
    pub vector_length: usize,
    /// Number of classes
    pub num_classes: usize,
}

impl fmt::Display for PackageSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Total points: {}", self.total_points)?;
        writeln!(f, "  Vector length: {}", self.vector_length)?;
        write!(f, "  Number of classes: {}", self.num_classes)
    }
}

impl VectorPackage {
    /// Create an empty package
    ///
    /// # Arguments
    /// * `classes` - Ordered class names
    /// * `colors` - Display colors keyed by class name
    /// * `extractor` - Provenance of the extractor that will fill the package
    pub fn new(classes: Vec<String>, colors: Map<String, Value>, extractor: ExtractorProvenance) -> Self {
        VectorPackage {
            classes,
            labels: Vec::new(),
            data: Vec::new(),
            colors,
            extractor,
        }
    }

    /// Append one vector with its label
    pub fn push(&mut self, vector: FeatureVector, label: OneHotLabel) {
        self.data.push(vector);
        self.labels.push(label);
    }

    /// Number of vector/label pairs
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the package holds no vectors
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Shuffle vectors and labels with one shared permutation
    ///
    /// # Returns
    /// The seed that was used
    pub fn shuffle(&mut self, seed: Option<u64>) -> FeatureResult<u64> {
        shuffle_pairs(&mut self.data, &mut self.labels, seed)
    }

    /// Rebuild the extractor recorded in the package
    pub fn feature_extractor(&self) -> FeatureResult<FeatureExtractor> {
        ExtractorFactory::from_provenance(&self.extractor)
    }

    /// Headline numbers of the package
    pub fn summary(&self) -> PackageSummary {
        PackageSummary {
            total_points: self.data.len(),
            vector_length: self.data.first().map(Vec::len).unwrap_or(0),
            num_classes: self.classes.len(),
        }
    }

    /// Check the structural invariants of the package
    ///
    /// Data and labels must be the same length, every vector must have the
    /// same length, and every label must be one-hot over `classes`.
    pub fn validate(&self) -> FeatureResult<()> {
        if self.data.len() != self.labels.len() {
            return Err(FeatureError::MalformedPackage(format!(
                "{} vectors but {} labels", self.data.len(), self.labels.len()
            )));
        }

        if let Some(first) = self.data.first() {
            let expected = first.len();
            if let Some((index, vector)) = self.data.iter().enumerate().find(|(_, v)| v.len() != expected) {
                return Err(FeatureError::MalformedPackage(format!(
                    "vector {} has length {} but vector 0 has length {}", index, vector.len(), expected
                )));
            }
        }

        let num_classes = self.classes.len();
        for (index, label) in self.labels.iter().enumerate() {
            if label.len() != num_classes {
                return Err(FeatureError::MalformedPackage(format!(
                    "label {} has length {} but there are {} classes", index, label.len(), num_classes
                )));
            }
            if hot_index(label).is_none() {
                return Err(FeatureError::MalformedPackage(format!("label {} is not one-hot", index)));
            }
        }

        Ok(())
    }

    /// Encode as JSON text
    pub fn to_json(&self) -> FeatureResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode and validate a package from JSON text
    pub fn from_json(text: &str) -> FeatureResult<Self> {
        let package: VectorPackage = serde_json::from_str(text)?;
        package.validate()?;
        Ok(package)
    }

    /// Write the package to a file
    ///
    /// # Arguments
    /// * `path` - Destination path, overwritten if it exists
    ///
    /// # Returns
    /// Result indicating success or an error
    pub fn save<P: AsRef<Path>>(&self, path: P) -> FeatureResult<()> {
        let path = path.as_ref();
        self.validate()?;

        info!("Saving {} vectors to {}", self.len(), path.display());

        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;

        Ok(())
    }

    /// Read and validate a package from a file
    ///
    /// # Arguments
    /// * `path` - Path to a package written by [`VectorPackage::save`]
    ///
    /// # Returns
    /// The package, or an error if it cannot be read or is malformed
    pub fn load<P: AsRef<Path>>(path: P) -> FeatureResult<Self> {
        let path = path.as_ref();
        info!("Loading vector package from {}", path.display());

        let reader = BufReader::new(File::open(path)?);
        let package: VectorPackage = serde_json::from_reader(reader)?;
        package.validate()?;

        debug!("Loaded package: {} vectors, extractor {}", package.len(), package.extractor.name);
        Ok(package)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> VectorPackage {
        let mut colors = Map::new();
        colors.insert("water".to_string(), json!([0, 0, 255]));
        colors.insert("land".to_string(), json!("#00ff00"));

        let mut package = VectorPackage::new(
            vec!["water".to_string(), "land".to_string()],
            colors,
            FeatureExtractor::Neighborhood { pad: 1 }.provenance(),
        );
        package.push(vec![1.0 / 255.0, 0.1, 1.0 / 3.0], vec![1, 0]);
        package.push(vec![0.0, 254.0 / 255.0, 0.7], vec![0, 1]);
        package
    }

    #[test]
    fn test_save_load_round_trip_is_exact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vectors.json");
        let package = sample();

        package.save(&path).unwrap();
        let loaded = VectorPackage::load(&path).unwrap();
        assert_eq!(loaded, package);
    }

    #[test]
    fn test_document_keys() {
        let value: Value = serde_json::from_str(&sample().to_json().unwrap()).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["classes", "labels", "data", "colors", "extractor"]);
        assert_eq!(value["extractor"], json!({"name": "Neighborhood", "kwargs": {"pad": 1}}));
        assert_eq!(value["labels"], json!([[1, 0], [0, 1]]));
    }

    #[test]
    fn test_length_mismatch_is_malformed() {
        let text = json!({
            "classes": ["a", "b"],
            "labels": [[1, 0]],
            "data": [[0.5], [0.25]],
            "colors": {},
            "extractor": {"name": "WholePixel", "kwargs": {}}
        }).to_string();
        assert!(matches!(VectorPackage::from_json(&text), Err(FeatureError::MalformedPackage(_))));
    }

    #[test]
    fn test_ragged_vectors_are_malformed() {
        let mut package = sample();
        package.data[1].push(0.0);
        assert!(package.validate().is_err());
    }

    #[test]
    fn test_bad_label_is_malformed() {
        let mut package = sample();
        package.labels[0] = vec![1, 1];
        assert!(package.validate().is_err());
        package.labels[0] = vec![1, 0, 0];
        assert!(package.validate().is_err());
    }

    #[test]
    fn test_summary_and_extractor() {
        let package = sample();
        assert_eq!(package.summary(), PackageSummary { total_points: 2, vector_length: 3, num_classes: 2 });
        assert_eq!(package.feature_extractor().unwrap(), FeatureExtractor::Neighborhood { pad: 1 });
    }

    #[test]
    fn test_shuffle_keeps_pairs() {
        let mut package = sample();
        let original = package.clone();
        package.shuffle(Some(7)).unwrap();
        assert_eq!(package.len(), original.len());
        for (vector, label) in package.data.iter().zip(&package.labels) {
            let at = original.data.iter().position(|v| v == vector).unwrap();
            assert_eq!(&original.labels[at], label);
        }
    }
}
