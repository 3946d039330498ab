use std::collections::HashSet;

use super::{Category, Field};
use crate::errors::{ReportError, Result};

/// Immutable catalog of fields, in declaration order.
///
/// Built once at startup and passed to whatever needs it; there is no global
/// instance.
#[derive(Debug, Clone)]
pub struct FieldRegistry {
    fields: Vec<Field>,
}

impl FieldRegistry {
    pub fn new(fields: Vec<Field>) -> Result<Self> {
        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.name().to_string()) {
                return Err(ReportError::DuplicateField {
                    name: field.name().to_string(),
                });
            }
        }
        Ok(Self { fields })
    }

    /// The built-in catalog of cluster benchmark metrics.
    pub fn standard() -> Self {
        Self {
            fields: super::catalog::standard_fields(),
        }
    }

    /// Fields applying to `category`, in declaration order.
    pub fn fields_for(&self, category: Category) -> Vec<&Field> {
        self.fields
            .iter()
            .filter(|f| f.applies_to(category))
            .collect()
    }

    pub fn lookup(&self, name: &str) -> Result<&Field> {
        self.fields
            .iter()
            .find(|f| f.name() == name)
            .ok_or_else(|| ReportError::unknown_field_in(name, "field registry"))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
