use anyhow::{anyhow, Result};

/// Zone names become column and key names, so only `[a-z0-9_]` is allowed.
pub fn validate_zone_name(value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(anyhow!("zone name is empty"));
    }
    if !value
        .chars()
        .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_')
    {
        return Err(anyhow!("zone name must match [a-z0-9_]+: {}", value));
    }
    Ok(())
}

pub fn validate_field_name(label: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(anyhow!("{} must not be empty", label));
    }
    if !value.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_') {
        return Err(anyhow!("{} must be alphanumeric: {}", label, value));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_names() {
        assert!(validate_zone_name("therun").is_ok());
        assert!(validate_zone_name("zone_2").is_ok());
        assert!(validate_zone_name("Easy").is_err());
        assert!(validate_zone_name("ea sy").is_err());
        assert!(validate_zone_name("").is_err());
    }

    #[test]
    fn field_names() {
        assert!(validate_field_name("identity_field", "buid").is_ok());
        assert!(validate_field_name("identity_field", "").is_err());
        assert!(validate_field_name("identity_field", "bu'id").is_err());
    }
}
