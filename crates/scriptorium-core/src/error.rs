use serde::Serialize;
use thiserror::Error;

/// A validation failure attached to a single input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Collection of field-level validation errors.
///
/// Accumulates errors across fields so a caller sees every problem in one
/// round trip, the way a form surface reports them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[serde(transparent)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `Ok(())` when no errors were collected, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "validation failed: ")?;
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl From<FieldError> for ValidationErrors {
    fn from(err: FieldError) -> Self {
        Self(vec![err])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_collection_converts_to_ok() {
        assert!(ValidationErrors::new().into_result().is_ok());
    }

    #[test]
    fn collected_errors_convert_to_err_and_format() {
        let mut errors = ValidationErrors::new();
        errors.push("published_at", "publish date cannot be in the past");
        errors.push("title", "this field is required");
        let err = errors.into_result().unwrap_err();
        assert_eq!(err.errors().len(), 2);
        assert_eq!(
            err.to_string(),
            "validation failed: published_at: publish date cannot be in the past; title: this field is required"
        );
    }

    #[test]
    fn serializes_as_plain_list() {
        let errors: ValidationErrors = FieldError::new("name", "already taken").into();
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "field": "name", "message": "already taken" }])
        );
    }
}
