use anyhow::{Result, anyhow};

use crate::models::{
    field_spec::FieldSpec,
    payload::{SubmissionPayload, json_type_name},
};

/// Rejects nested values under any key the document will render.
pub fn validate_field_values(payload: &SubmissionPayload, field_spec: &FieldSpec) -> Result<()> {
    for key in field_spec.keys() {
        let Some(value) = payload.get(key) else {
            continue;
        };

        if value.is_array() || value.is_object() {
            return Err(anyhow!(
                "Field '{}' must be a scalar value, got {}",
                key,
                json_type_name(value)
            ));
        }
    }

    Ok(())
}
