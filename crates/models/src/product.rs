use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityId};
use crate::errors::{is_blank, FieldErrors, ModelError};

/// Stored product. `sku` is the natural key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub sku: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: Decimal,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Decimal,
}

impl ProductInput {
    pub fn new(sku: impl Into<String>, name: impl Into<String>, price: Decimal) -> Self {
        Self { sku: sku.into(), name: name.into(), description: None, price }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        let mut errs = FieldErrors::default();
        errs.check(!is_blank(&self.sku), "sku", "must not be blank");
        errs.check(!is_blank(&self.name), "name", "must not be blank");
        errs.check(self.price > Decimal::ZERO, "price", "must be greater than 0");
        errs.finish()
    }
}

impl Entity for Product {
    type Input = ProductInput;

    const KIND: &'static str = "product";
    const NATURAL_KEY_FIELD: &'static str = "sku";

    fn id(&self) -> Option<&EntityId> {
        self.id.as_ref()
    }

    fn assign_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    fn natural_key(&self) -> &str {
        &self.sku
    }

    fn input_natural_key(input: &ProductInput) -> &str {
        &input.sku
    }

    fn from_input(input: ProductInput) -> Self {
        Self {
            id: None,
            sku: input.sku,
            name: input.name,
            description: input.description,
            price: input.price,
        }
    }

    fn apply(&mut self, input: ProductInput) {
        self.sku = input.sku;
        self.name = input.name;
        self.description = input.description;
        self.price = input.price;
    }
}
