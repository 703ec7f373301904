use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityId};
use crate::errors::{is_blank, FieldErrors, ModelError};

/// Stored employee. `document` is the natural key and never changes after creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub document: String,
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Create/update payload: no id, which the store assigns.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeInput {
    #[serde(default)]
    pub document: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl EmployeeInput {
    pub fn new(document: impl Into<String>, first_name: impl Into<String>) -> Self {
        Self { document: document.into(), first_name: first_name.into(), ..Self::default() }
    }

    /// Boundary checks: document made of digits, first name present, email well formed.
    pub fn validate(&self) -> Result<(), ModelError> {
        let mut errs = FieldErrors::default();
        errs.check(!is_blank(&self.document), "document", "must not be blank");
        errs.check(
            is_blank(&self.document) || self.document.chars().all(|c| c.is_ascii_digit()),
            "document",
            "must contain only digits",
        );
        errs.check(!is_blank(&self.first_name), "firstName", "must not be blank");
        if let Some(email) = &self.email {
            errs.check(looks_like_email(email), "email", "must be a well-formed email address");
        }
        errs.finish()
    }
}

fn looks_like_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else { return false };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

impl Entity for Employee {
    type Input = EmployeeInput;

    const KIND: &'static str = "employee";
    const NATURAL_KEY_FIELD: &'static str = "document";

    fn id(&self) -> Option<&EntityId> {
        self.id.as_ref()
    }

    fn assign_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    fn natural_key(&self) -> &str {
        &self.document
    }

    fn input_natural_key(input: &EmployeeInput) -> &str {
        &input.document
    }

    fn from_input(input: EmployeeInput) -> Self {
        Self {
            id: None,
            document: input.document,
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
        }
    }

    fn apply(&mut self, input: EmployeeInput) {
        self.first_name = input.first_name;
        self.last_name = input.last_name;
        self.email = input.email;
    }
}
