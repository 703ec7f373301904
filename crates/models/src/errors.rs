use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("validation error: {0}")]
    Validation(String),
}

/// Accumulates `field: reason` pairs so a request reports every bad field at once.
#[derive(Debug, Default)]
pub(crate) struct FieldErrors(Vec<String>);

impl FieldErrors {
    pub(crate) fn check(&mut self, ok: bool, field: &str, reason: &str) {
        if !ok {
            self.0.push(format!("{field}: {reason}"));
        }
    }

    pub(crate) fn finish(self) -> Result<(), ModelError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ModelError::Validation(self.0.join(", ")))
        }
    }
}

pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
