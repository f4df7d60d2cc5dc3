//! Local validation helpers
//!
//! Checks that run on the desired state before any OME call. Every helper
//! returns `ProviderError::Validation` naming the offending attributes.

use crate::error::ProviderError;

/// One optional attribute and whether the user set it
pub type Field<'a> = (&'a str, bool);

/// Exactly one of `fields` must be set
pub fn exactly_one(fields: &[Field<'_>]) -> Result<(), ProviderError> {
    let set: Vec<&str> = fields.iter().filter(|(_, set)| *set).map(|(name, _)| *name).collect();
    match set.len() {
        1 => Ok(()),
        0 => Err(ProviderError::Validation(format!(
            "exactly one of {} must be specified",
            names(fields)
        ))),
        _ => Err(ProviderError::Validation(format!(
            "only one of {} can be specified, got {}",
            names(fields),
            set.join(", ")
        ))),
    }
}

/// At most one of `fields` may be set
pub fn at_most_one(fields: &[Field<'_>]) -> Result<(), ProviderError> {
    let set: Vec<&str> = fields.iter().filter(|(_, set)| *set).map(|(name, _)| *name).collect();
    if set.len() > 1 {
        return Err(ProviderError::Validation(format!(
            "only one of {} can be specified, got {}",
            names(fields),
            set.join(", ")
        )));
    }
    Ok(())
}

/// `value` must be one of `allowed`
pub fn one_of(field: &str, value: &str, allowed: &[&str]) -> Result<(), ProviderError> {
    if allowed.contains(&value) {
        return Ok(());
    }
    Err(ProviderError::Validation(format!(
        "Attribute {} value must be one of: [{}], got: {:?}",
        field,
        allowed.iter().map(|a| format!("{:?}", a)).collect::<Vec<_>>().join(" "),
        value
    )))
}

/// `value` must not be empty or whitespace
pub fn not_blank(field: &str, value: &str) -> Result<(), ProviderError> {
    if value.trim().is_empty() {
        return Err(ProviderError::Validation(format!(
            "Attribute {} must not be empty",
            field
        )));
    }
    Ok(())
}

/// List length must be within `min..=max`
pub fn size_between<T>(field: &str, values: &[T], min: usize, max: usize) -> Result<(), ProviderError> {
    if values.len() < min {
        return Err(ProviderError::Validation(format!(
            "Attribute {} list must contain at least {} elements, got: {}",
            field,
            min,
            values.len()
        )));
    }
    if values.len() > max {
        return Err(ProviderError::Validation(format!(
            "Attribute {} list must contain at most {} elements, got: {}",
            field,
            max,
            values.len()
        )));
    }
    Ok(())
}

/// List must not repeat a value
pub fn unique<T: PartialEq + std::fmt::Debug>(field: &str, values: &[T]) -> Result<(), ProviderError> {
    for (i, value) in values.iter().enumerate() {
        if values[..i].contains(value) {
            return Err(ProviderError::Validation(format!(
                "Attribute {} contains the duplicate value {:?}",
                field, value
            )));
        }
    }
    Ok(())
}

fn names(fields: &[Field<'_>]) -> String {
    fields.iter().map(|(name, _)| *name).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exactly_one() {
        assert!(exactly_one(&[("ref_template_id", true), ("ref_template_name", false)]).is_ok());
        let both = exactly_one(&[("ref_template_id", true), ("ref_template_name", true)]).unwrap_err();
        assert!(both.to_string().contains("only one of ref_template_id, ref_template_name"));
        let none = exactly_one(&[("ref_template_id", false), ("ref_template_name", false)]).unwrap_err();
        assert!(none.to_string().contains("exactly one of"));
    }

    #[test]
    fn test_at_most_one_allows_none() {
        assert!(at_most_one(&[("device_ids", false), ("device_service_tags", false)]).is_ok());
        assert!(at_most_one(&[("device_ids", true), ("device_service_tags", true)]).is_err());
    }

    #[test]
    fn test_size_between_messages() {
        let empty: Vec<String> = Vec::new();
        let err = size_between("subject_alternate_names", &empty, 1, 4).unwrap_err();
        assert!(err.to_string().contains("at least 1 elements"));
        let many = vec!["a"; 5];
        let err = size_between("subject_alternate_names", &many, 1, 4).unwrap_err();
        assert!(err.to_string().contains("at most 4 elements"));
        assert!(size_between("subject_alternate_names", &many[..4], 1, 4).is_ok());
    }

    #[test]
    fn test_one_of_is_case_sensitive() {
        assert!(one_of("output_format", "csv", &["csv", "html"]).is_ok());
        assert!(one_of("output_format", "CSV", &["csv", "html"]).is_err());
    }

    #[test]
    fn test_unique() {
        assert!(unique("device_ids", &[1, 2, 3]).is_ok());
        assert!(unique("device_ids", &[1, 2, 1]).is_err());
    }
}
