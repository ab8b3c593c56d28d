use super::{Result, WizardError};

/// Converts a dotted version string into its integer ordinal.
///
/// `major.minor.patch` maps to `major * 1_000_000 + minor * 1_000 + patch`.
/// Missing parts count as zero and trailing suffixes of a part are ignored,
/// so `"12.4-dev"` becomes `12_004_000`.
pub fn version_ordinal(version: &str) -> Result<u32> {
    let mut parts = version.trim().split('.');
    let mut ordinal: u32 = 0;

    for index in 0..3 {
        let part = parts.next().unwrap_or("");
        let digits: String = part.chars().take_while(|c| c.is_ascii_digit()).collect();

        if index == 0 && digits.is_empty() {
            return Err(WizardError::InvalidVersion(version.to_string()));
        }

        let value = if digits.is_empty() {
            0
        } else {
            digits
                .parse::<u32>()
                .map_err(|_| WizardError::InvalidVersion(version.to_string()))?
        };

        if value > 999 {
            return Err(WizardError::InvalidVersion(format!(
                "{} (part '{}' exceeds 999)",
                version, part
            )));
        }

        ordinal = ordinal * 1_000 + value;
    }

    Ok(ordinal)
}

/// Renders an ordinal back into `major.minor.patch`.
pub fn version_string(ordinal: u32) -> String {
    format!(
        "{}.{}.{}",
        ordinal / 1_000_000,
        (ordinal / 1_000) % 1_000,
        ordinal % 1_000
    )
}
