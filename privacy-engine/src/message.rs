//! The byte string a score authorization covers.

use crate::constants::MESSAGE_DELIMITER;
use crate::errors::PrivacyError;

fn format_field(name: &str, value: f64) -> Result<String, PrivacyError> {
    if !value.is_finite() {
        return Err(PrivacyError::InvalidMessageField(format!("{name} is not finite")));
    }
    // -0.0 prints as "-0"; verifiers expect "0".
    let value = if value == 0.0 { 0.0 } else { value };
    Ok(format!("{value}"))
}

/// `"<id>|<distance>|<pace>"` with shortest round-trip number formatting.
pub fn canonical_message(id: &str, total_distance: f64, average_pace: f64) -> Result<String, PrivacyError> {
    if id.contains(MESSAGE_DELIMITER) {
        return Err(PrivacyError::InvalidMessageField(format!(
            "id must not contain '{MESSAGE_DELIMITER}'"
        )));
    }
    let distance = format_field("total_distance", total_distance)?;
    let pace = format_field("average_pace", average_pace)?;
    Ok(format!("{id}{MESSAGE_DELIMITER}{distance}{MESSAGE_DELIMITER}{pace}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_fields_with_delimiter() {
        assert_eq!(canonical_message("ring42", 5.234, 6.12).unwrap(), "ring42|5.234|6.12");
    }

    #[test]
    fn integral_values_drop_the_fraction() {
        assert_eq!(canonical_message("g", 5.0, 10.0).unwrap(), "g|5|10");
        assert_eq!(canonical_message("g", -0.0, 0.0).unwrap(), "g|0|0");
        assert_eq!(canonical_message("", 0.1, 0.25).unwrap(), "|0.1|0.25");
    }

    #[test]
    fn rejects_ambiguous_fields() {
        assert!(matches!(
            canonical_message("a|b", 1.0, 1.0),
            Err(PrivacyError::InvalidMessageField(_))
        ));
        assert!(matches!(
            canonical_message("a", f64::NAN, 1.0),
            Err(PrivacyError::InvalidMessageField(_))
        ));
        assert!(matches!(
            canonical_message("a", 1.0, f64::INFINITY),
            Err(PrivacyError::InvalidMessageField(_))
        ));
    }
}
