use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::utils::{ClassifierError, Result};

/// A single labeled example: a feature vector and an integer class
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Instance {
    features: Vec<f64>,
    label: i64,
}

impl Instance {
    /// Create a new instance
    pub fn new(features: Vec<f64>, label: i64) -> Self {
        Self { features, label }
    }

    pub fn features(&self) -> &[f64] {
        &self.features
    }

    pub fn label(&self) -> i64 {
        self.label
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }
}

/// An ordered collection of instances sharing one feature count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub name: String,
    instances: Vec<Instance>,
    feature_count: usize,
}

impl Dataset {
    /// Build a dataset from already parsed instances.
    ///
    /// The first instance fixes the feature count; any later instance with a
    /// different count is rejected. An empty list is accepted and has a
    /// feature count of 0.
    pub fn from_instances(name: impl Into<String>, instances: Vec<Instance>) -> Result<Self> {
        let name = name.into();
        let feature_count = instances.first().map_or(0, Instance::feature_count);

        for (i, instance) in instances.iter().enumerate() {
            if instance.feature_count() != feature_count {
                return Err(ClassifierError::FeatureCountMismatch {
                    context: format!("{} instance {}", name, i),
                    expected: feature_count,
                    actual: instance.feature_count(),
                });
            }
        }

        Ok(Self {
            name,
            instances,
            feature_count,
        })
    }

    /// Load a dataset from a space separated file whose first line is a header
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path.display().to_string();
        let file = File::open(path).map_err(|e| ClassifierError::Io {
            path: name.clone(),
            message: e.to_string(),
        })?;
        Self::from_reader(name, file)
    }

    /// Load a dataset from in-memory text in the same format as [`Dataset::from_path`]
    pub fn from_text(name: impl Into<String>, content: &str) -> Result<Self> {
        Self::from_reader(name, content.as_bytes())
    }

    /// Parse rows of `f1 f2 ... fN label` from any reader.
    ///
    /// The first physical line is the header and is dropped unread, even when
    /// blank or malformed. Later blank lines and empty tokens from repeated
    /// spaces are ignored. Labels are parsed as floating point and truncated
    /// toward zero.
    pub fn from_reader<R: Read>(name: impl Into<String>, reader: R) -> Result<Self> {
        let name = name.into();
        let mut buffered = BufReader::new(reader);
        let mut header = Vec::new();
        buffered
            .read_until(b'\n', &mut header)
            .map_err(|e| ClassifierError::Io {
                path: name.clone(),
                message: e.to_string(),
            })?;

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b' ')
            .has_headers(false)
            .quoting(false)
            .flexible(true)
            .from_reader(buffered);

        let mut instances = Vec::new();
        let mut expected: Option<usize> = None;

        for result in reader.records() {
            let record = result.map_err(|e| csv_error(&name, e))?;
            // csv counts from the line after the header
            let line = record.position().map_or(0, |p| p.line() + 1);
            let tokens: Vec<&str> = record
                .iter()
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .collect();

            if tokens.is_empty() {
                continue;
            }

            let instance = parse_row(&name, line, &tokens)?;
            match expected {
                None => expected = Some(instance.feature_count()),
                Some(count) if count != instance.feature_count() => {
                    return Err(ClassifierError::FeatureCountMismatch {
                        context: format!("{}:{}", name, line),
                        expected: count,
                        actual: instance.feature_count(),
                    });
                }
                Some(_) => {}
            }
            instances.push(instance);
        }

        tracing::debug!(
            "Parsed {} instances with {} features from {}",
            instances.len(),
            expected.unwrap_or(0),
            name
        );

        Self::from_instances(name, instances)
    }

    /// Get the number of instances
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Check if dataset is empty
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn feature_count(&self) -> usize {
        self.feature_count
    }

    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    /// Feature matrix (rows=instances, cols=features)
    pub fn to_matrix(&self) -> Result<Array2<f64>> {
        let flat: Vec<f64> = self
            .instances
            .iter()
            .flat_map(|instance| instance.features().iter().copied())
            .collect();

        Array2::from_shape_vec((self.len(), self.feature_count), flat).map_err(|e| {
            ClassifierError::ValidationError(format!(
                "failed to build feature matrix for {}: {}",
                self.name, e
            ))
        })
    }

    /// Number of instances per label, ordered by label
    pub fn label_counts(&self) -> BTreeMap<i64, usize> {
        let mut counts = BTreeMap::new();
        for instance in &self.instances {
            *counts.entry(instance.label()).or_insert(0) += 1;
        }
        counts
    }
}

fn parse_row(name: &str, line: u64, tokens: &[&str]) -> Result<Instance> {
    if tokens.len() < 2 {
        return Err(ClassifierError::Parse {
            path: name.to_string(),
            line,
            message: format!(
                "expected at least one feature and a label, found {} token(s)",
                tokens.len()
            ),
        });
    }

    let values = tokens
        .iter()
        .map(|token| parse_value(name, line, token))
        .collect::<Result<Vec<f64>>>()?;

    let (label, features) = values
        .split_last()
        .ok_or_else(|| ClassifierError::Parse {
            path: name.to_string(),
            line,
            message: "row has no label".to_string(),
        })?;

    Ok(Instance::new(features.to_vec(), parse_label(name, line, *label)?))
}

fn parse_label(name: &str, line: u64, value: f64) -> Result<i64> {
    let truncated = value.trunc();
    // i64::MAX as f64 rounds up to 2^63, which is already out of range
    if truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
        return Err(ClassifierError::Parse {
            path: name.to_string(),
            line,
            message: format!("label {} is outside the integer range", value),
        });
    }
    Ok(truncated as i64)
}

fn parse_value(name: &str, line: u64, token: &str) -> Result<f64> {
    let value: f64 = token.parse().map_err(|_| ClassifierError::Parse {
        path: name.to_string(),
        line,
        message: format!("invalid number \"{}\"", token),
    })?;

    if !value.is_finite() {
        return Err(ClassifierError::Parse {
            path: name.to_string(),
            line,
            message: format!("non-finite value \"{}\"", token),
        });
    }

    Ok(value)
}

fn csv_error(name: &str, err: csv::Error) -> ClassifierError {
    if err.is_io_error() {
        return ClassifierError::Io {
            path: name.to_string(),
            message: err.to_string(),
        };
    }
    ClassifierError::Parse {
        path: name.to_string(),
        line: err.position().map_or(0, |p| p.line() + 1),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_accessors() {
        let instance = Instance::new(vec![1.0, 2.5], 3);
        assert_eq!(instance.features(), &[1.0, 2.5]);
        assert_eq!(instance.label(), 3);
        assert_eq!(instance.feature_count(), 2);
    }

    #[test]
    fn test_text_loading_skips_header() {
        let data = "a b class\n1.0 2.0 0\n3.0 4.0 1\n";
        let dataset = Dataset::from_text("train", data).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.feature_count(), 2);
        assert_eq!(dataset.instances()[0].features(), &[1.0, 2.0]);
        assert_eq!(dataset.instances()[1].label(), 1);
    }

    #[test]
    fn test_header_is_not_validated() {
        let data = "only_one_column\n1 2 3 4\n";
        let dataset = Dataset::from_text("train", data).unwrap();
        assert_eq!(dataset.feature_count(), 3);
    }

    #[test]
    fn test_label_is_truncated() {
        let data = "h\n0.5 2.9\n0.5 -1.7\n";
        let dataset = Dataset::from_text("train", data).unwrap();
        assert_eq!(dataset.instances()[0].label(), 2);
        assert_eq!(dataset.instances()[1].label(), -1);
    }

    #[test]
    fn test_blank_lines_and_extra_spaces_ignored() {
        let data = "h\n1.0  2.0 0 \n\n3.0 4.0 1\n";
        let dataset = Dataset::from_text("train", data).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.instances()[0].features(), &[1.0, 2.0]);
    }

    #[test]
    fn test_quoted_header_does_not_swallow_rows() {
        let data = "\"x y class\n0.0 1.0 0\n1.0 2.0 1\n";
        let dataset = Dataset::from_text("train", data).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.instances()[1].features(), &[1.0, 2.0]);
    }

    #[test]
    fn test_blank_first_line_is_the_header() {
        let data = "\n0.0 1.0 0\n1.0 2.0 1\n";
        let dataset = Dataset::from_text("train", data).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.instances()[0].features(), &[0.0, 1.0]);
    }

    #[test]
    fn test_quote_in_data_row_is_a_parse_error() {
        let data = "h\n\"1.0 2.0 0\n3.0 4.0 1\n";
        let err = Dataset::from_text("train", data).unwrap_err();
        assert!(matches!(err, ClassifierError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_out_of_range_label_is_rejected() {
        let err = Dataset::from_text("train", "h\n1.0 1e30\n").unwrap_err();
        match err {
            ClassifierError::Parse { line, message, .. } => {
                assert_eq!(line, 2);
                assert!(message.contains("outside the integer range"));
            }
            other => panic!("unexpected error: {other}"),
        }

        assert!(Dataset::from_text("train", "h\n1.0 -1e30\n").is_err());
        let dataset = Dataset::from_text("train", "h\n1.0 -9007199254740992\n").unwrap();
        assert_eq!(dataset.instances()[0].label(), -9_007_199_254_740_992);
    }

    #[test]
    fn test_header_only_is_empty() {
        let dataset = Dataset::from_text("train", "x y class\n").unwrap();
        assert!(dataset.is_empty());
        assert_eq!(dataset.feature_count(), 0);
    }

    #[test]
    fn test_short_row_is_rejected() {
        let data = "h\n1.0 2.0 3.0 0\n1.0 2.0 1\n";
        let err = Dataset::from_text("train", data).unwrap_err();

        assert_eq!(
            err,
            ClassifierError::FeatureCountMismatch {
                context: "train:3".to_string(),
                expected: 3,
                actual: 2,
            }
        );
    }

    #[test]
    fn test_non_numeric_token_is_rejected() {
        let data = "h\n1.0 abc 0\n";
        let err = Dataset::from_text("train", data).unwrap_err();

        match err {
            ClassifierError::Parse { path, line, message } => {
                assert_eq!(path, "train");
                assert_eq!(line, 2);
                assert!(message.contains("abc"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_finite_value_is_rejected() {
        let data = "h\n1.0 NaN 0\n";
        let err = Dataset::from_text("train", data).unwrap_err();
        assert!(err.to_string().contains("non-finite"));
    }

    #[test]
    fn test_label_only_row_is_rejected() {
        let data = "h\n1\n";
        let err = Dataset::from_text("train", data).unwrap_err();
        assert!(matches!(err, ClassifierError::Parse { .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Dataset::from_path("/definitely/not/here.txt").unwrap_err();
        assert!(matches!(err, ClassifierError::Io { .. }));
    }

    #[test]
    fn test_from_instances_mismatch() {
        let instances = vec![Instance::new(vec![1.0, 2.0], 0), Instance::new(vec![1.0], 1)];
        let err = Dataset::from_instances("mem", instances).unwrap_err();
        assert!(matches!(
            err,
            ClassifierError::FeatureCountMismatch {
                expected: 2,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_to_matrix() {
        let data = "h\n1 2 0\n3 4 1\n5 6 1\n";
        let dataset = Dataset::from_text("train", data).unwrap();
        let matrix = dataset.to_matrix().unwrap();

        assert_eq!(matrix.dim(), (3, 2));
        assert_eq!(matrix[[2, 1]], 6.0);
    }

    #[test]
    fn test_label_counts() {
        let data = "h\n1 2\n1 0\n1 2\n1 2\n";
        let dataset = Dataset::from_text("train", data).unwrap();
        let counts = dataset.label_counts();

        assert_eq!(counts.get(&2), Some(&3));
        assert_eq!(counts.get(&0), Some(&1));
        assert_eq!(counts.keys().copied().collect::<Vec<_>>(), vec![0, 2]);
    }
}
