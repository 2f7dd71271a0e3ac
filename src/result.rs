use crate::imports::*;

/*
    Types:
    * ErrorKind - Taxonomy of reportable failures, each with a stable numeric code
    * FilterError - One reported error (kind, code, message)
    * Warning - One reported warning (code, message)
    * Outcome - Ordered warnings and errors from one phase call; failed when errors is non-empty
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    PathNotFound,
    DuplicateName,
    TypeMismatch,
    MissingParameter,
    ConstraintViolation,
    UnsupportedType,
    ShapeMismatch,
    Cancelled,
    ParentNotFound,
    UnknownParameter,
    ParseFailure,
    ExecutionFailed,
}

impl ErrorKind {
    pub fn code(&self) -> i32 {
        match self {
            ErrorKind::PathNotFound => -1001,
            ErrorKind::DuplicateName => -1002,
            ErrorKind::TypeMismatch => -1003,
            ErrorKind::MissingParameter => -1004,
            ErrorKind::ConstraintViolation => -1005,
            ErrorKind::UnsupportedType => -1006,
            ErrorKind::ShapeMismatch => -1007,
            ErrorKind::Cancelled => -1008,
            ErrorKind::ParentNotFound => -1009,
            ErrorKind::UnknownParameter => -1010,
            ErrorKind::ParseFailure => -1011,
            ErrorKind::ExecutionFailed => -1012,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("[{code}] {message}")]
pub struct FilterError {
    pub kind: ErrorKind,
    pub code: i32,
    pub message: String,
}

impl FilterError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        FilterError {
            kind,
            code: kind.code(),
            message: message.into(),
        }
    }

    /// Recovers the kind when `err` wraps a FilterError or StoreError, otherwise ExecutionFailed.
    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        if let Some(filter_error) = err.downcast_ref::<FilterError>() {
            return filter_error.clone();
        }
        if let Some(store_error) = err.downcast_ref::<StoreError>() {
            return store_error.clone().into();
        }
        if let Some(numeric_error) = err.downcast_ref::<NumericError>() {
            return numeric_error.clone().into();
        }
        FilterError::new(ErrorKind::ExecutionFailed, format!("{:#}", err))
    }
}

impl From<StoreError> for FilterError {
    fn from(err: StoreError) -> Self {
        let kind = match &err {
            StoreError::PathNotFound(_) => ErrorKind::PathNotFound,
            StoreError::DuplicateName { .. } => ErrorKind::DuplicateName,
            StoreError::ParentNotFound(_) => ErrorKind::ParentNotFound,
            StoreError::NotAnArray { .. } => ErrorKind::TypeMismatch,
            StoreError::ShapeMismatch { .. } => ErrorKind::ShapeMismatch,
            StoreError::ArrayTooLarge { .. } => ErrorKind::ConstraintViolation,
            StoreError::RootImmutable => ErrorKind::ConstraintViolation,
            StoreError::InvalidName(_) => ErrorKind::ConstraintViolation,
        };
        FilterError::new(kind, err.to_string())
    }
}

impl From<NumericError> for FilterError {
    fn from(err: NumericError) -> Self {
        let kind = match &err {
            NumericError::UnsupportedType(_) => ErrorKind::UnsupportedType,
            NumericError::UnsupportedOperation { .. } => ErrorKind::UnsupportedType,
            NumericError::Parse { .. } => ErrorKind::ParseFailure,
        };
        FilterError::new(kind, err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Warning {
    pub code: i32,
    pub message: String,
}

impl Warning {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Warning {
            code,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    pub warnings: Vec<Warning>,
    pub errors: Vec<FilterError>,
}

impl Outcome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_error(error: impl Into<FilterError>) -> Self {
        let mut outcome = Self::new();
        outcome.push_error(error);
        outcome
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn is_failed(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn push_error(&mut self, error: impl Into<FilterError>) {
        self.errors.push(error.into());
    }

    pub fn error(&mut self, kind: ErrorKind, message: impl Into<String>) {
        self.errors.push(FilterError::new(kind, message));
    }

    pub fn warn(&mut self, code: i32, message: impl Into<String>) {
        self.warnings.push(Warning::new(code, message));
    }

    pub fn merge(&mut self, other: Outcome) {
        self.warnings.extend(other.warnings);
        self.errors.extend(other.errors);
    }

    pub fn has_error(&self, kind: ErrorKind) -> bool {
        self.errors.iter().any(|e| e.kind == kind)
    }

    pub fn count(&self, kind: ErrorKind) -> usize {
        self.errors.iter().filter(|e| e.kind == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct() {
        let kinds = [
            ErrorKind::PathNotFound,
            ErrorKind::DuplicateName,
            ErrorKind::TypeMismatch,
            ErrorKind::MissingParameter,
            ErrorKind::ConstraintViolation,
            ErrorKind::UnsupportedType,
            ErrorKind::ShapeMismatch,
            ErrorKind::Cancelled,
            ErrorKind::ParentNotFound,
            ErrorKind::UnknownParameter,
            ErrorKind::ParseFailure,
            ErrorKind::ExecutionFailed,
        ];
        let codes: HashSet<i32> = kinds.iter().map(ErrorKind::code).collect();
        assert_eq!(codes.len(), kinds.len());
        assert!(codes.iter().all(|c| *c < 0));
    }

    #[test]
    fn outcome_fails_only_with_errors() {
        let mut outcome = Outcome::new();
        outcome.warn(10, "heads up");
        assert!(outcome.is_ok());
        outcome.error(ErrorKind::ShapeMismatch, "bad");
        assert!(outcome.is_failed());
        assert_eq!(outcome.errors[0].code, -1007);
    }

    #[test]
    fn anyhow_errors_keep_their_kind() {
        let err: anyhow::Error = FilterError::new(ErrorKind::MissingParameter, "x").into();
        assert_eq!(FilterError::from_anyhow(&err).kind, ErrorKind::MissingParameter);

        let path = DataPath::parse("a").unwrap();
        let err: anyhow::Error = StoreError::PathNotFound(path).into();
        assert_eq!(FilterError::from_anyhow(&err).kind, ErrorKind::PathNotFound);

        let err = anyhow::anyhow!("boom");
        let converted = FilterError::from_anyhow(&err);
        assert_eq!(converted.kind, ErrorKind::ExecutionFailed);
        assert_eq!(converted.message, "boom");
    }
}
