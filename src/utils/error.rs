use std::fmt;

/// Error type for loading data and running the classifier
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierError {
    /// A data file could not be opened or read
    Io { path: String, message: String },
    /// A data row could not be parsed (non-numeric token, missing label)
    Parse {
        path: String,
        line: u64,
        message: String,
    },
    /// An instance does not have the feature count fixed by the first one
    FeatureCountMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },
    /// A training file contained no data rows
    EmptyTrainingSet { path: String },
    /// Validation errors (e.g., NaN values, empty feature matrix)
    ValidationError(String),
}

impl fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassifierError::Io { path, message } => {
                write!(f, "IoError: failed to read \"{}\": {}", path, message)
            }
            ClassifierError::Parse {
                path,
                line,
                message,
            } => write!(f, "ParseError: {}:{}: {}", path, line, message),
            ClassifierError::FeatureCountMismatch {
                context,
                expected,
                actual,
            } => write!(
                f,
                "FeatureCountMismatch: {}: expected {} features, found {}",
                context, expected, actual
            ),
            ClassifierError::EmptyTrainingSet { path } => write!(
                f,
                "EmptyTrainingSet: \"{}\" contains no training instances",
                path
            ),
            ClassifierError::ValidationError(msg) => write!(f, "ValidationError: {}", msg),
        }
    }
}

impl std::error::Error for ClassifierError {}

/// Result alias used by the classification core
pub type Result<T> = std::result::Result<T, ClassifierError>;
