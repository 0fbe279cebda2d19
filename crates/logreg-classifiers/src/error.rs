use std::error::Error;
use std::fmt;

/// Precondition and numeric-domain failures raised by training and evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierError {
    /// Two index-aligned inputs have different lengths.
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    /// Feature matrix width does not match the parameter vector.
    DimensionMismatch { features: usize, parameters: usize },
    EmptyInput(&'static str),
    /// A label other than 0 or 1, with its row index.
    NonBinaryLabel { index: usize, value: i32 },
    /// A probability score that is NaN or outside [0, 1], with its row index.
    InvalidProbability { index: usize, value: f64 },
    InvalidParameter { name: &'static str, value: f64 },
    /// Only one class is present, so one of the ROC rates is undefined everywhere.
    SingleClass { label: i32 },
    InvalidGrid { start: f64, end: f64, step: f64 },
    /// Prediction was requested before the model had parameters.
    NotFitted,
}

impl fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ClassifierError::LengthMismatch {
                what,
                expected,
                found,
            } => write!(f, "{} has length {}, expected {}", what, found, expected),
            ClassifierError::DimensionMismatch {
                features,
                parameters,
            } => write!(
                f,
                "Feature matrix has {} columns but the parameter vector has {} entries",
                features, parameters
            ),
            ClassifierError::EmptyInput(what) => write!(f, "{} must not be empty", what),
            ClassifierError::NonBinaryLabel { index, value } => write!(
                f,
                "Label {} at row {} is not binary (expected 0 or 1)",
                value, index
            ),
            ClassifierError::InvalidProbability { index, value } => write!(
                f,
                "Probability {} at row {} is outside [0, 1]",
                value, index
            ),
            ClassifierError::InvalidParameter { name, value } => {
                write!(f, "Invalid value {} for parameter '{}'", value, name)
            }
            ClassifierError::SingleClass { label } => write!(
                f,
                "Only label {} is present; ROC rates are undefined without both classes",
                label
            ),
            ClassifierError::InvalidGrid { start, end, step } => write!(
                f,
                "Invalid threshold grid [{}, {}) with step {}",
                start, end, step
            ),
            ClassifierError::NotFitted => {
                write!(f, "Model has no parameters; call fit or build it from a theta vector")
            }
        }
    }
}

impl Error for ClassifierError {}

pub type Result<T> = std::result::Result<T, ClassifierError>;

/// Check that every label is 0 or 1.
pub(crate) fn ensure_binary_labels<'a, I>(labels: I) -> Result<()>
where
    I: IntoIterator<Item = &'a i32>,
{
    for (index, &value) in labels.into_iter().enumerate() {
        if value != 0 && value != 1 {
            return Err(ClassifierError::NonBinaryLabel { index, value });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_offending_values() {
        let err = ClassifierError::LengthMismatch {
            what: "labels",
            expected: 4,
            found: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("labels"));
        assert!(msg.contains('4') && msg.contains('3'));

        let err = ClassifierError::NonBinaryLabel { index: 2, value: -1 };
        assert!(err.to_string().contains("row 2"));
    }

    #[test]
    fn binary_label_check() {
        assert!(ensure_binary_labels(&[0, 1, 1, 0]).is_ok());
        assert_eq!(
            ensure_binary_labels(&[0, 1, 2]),
            Err(ClassifierError::NonBinaryLabel { index: 2, value: 2 })
        );
    }
}
