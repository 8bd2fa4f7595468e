//! Severity ranking used when no allowlist is active.

/// Rank a severity label. Higher is more severe; unknown labels rank 0.
pub fn severity_rank(value: Option<&str>) -> u8 {
    let Some(value) = value else {
        return 0;
    };
    match value.to_lowercase().as_str() {
        "critical" => 4,
        "high" => 3,
        "moderate" | "medium" => 2,
        "low" => 1,
        _ => 0,
    }
}

/// Whether `severity` ranks at or above `min_severity`.
pub fn meets_severity(severity: Option<&str>, min_severity: &str) -> bool {
    severity_rank(severity) >= severity_rank(Some(min_severity))
}
