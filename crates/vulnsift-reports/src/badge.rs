//! Severity badges for vulnerable-change tables.

/// Severity levels recognised by the changes table, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeSeverity {
    Critical,
    High,
    Moderate,
    Medium,
    Low,
    Info,
}

impl ChangeSeverity {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "critical" => Some(Self::Critical),
            "high" => Some(Self::High),
            "moderate" => Some(Self::Moderate),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            "info" => Some(Self::Info),
            _ => None,
        }
    }

    /// Sort weight; higher is more severe.
    pub fn rank(self) -> u8 {
        match self {
            Self::Critical => 5,
            Self::High => 4,
            Self::Moderate | Self::Medium => 3,
            Self::Low => 2,
            Self::Info => 1,
        }
    }

    pub fn badge(self) -> &'static str {
        match self {
            Self::Critical => "🔴 Critical",
            Self::High => "🟠 High",
            Self::Moderate => "🟡 Moderate",
            Self::Medium => "🟡 Medium",
            Self::Low => "🟢 Low",
            Self::Info => "🔵 Info",
        }
    }
}

/// Rank of an optional severity label; missing or unrecognised labels are 0.
pub fn change_rank(value: Option<&str>) -> u8 {
    value.and_then(ChangeSeverity::parse).map_or(0, ChangeSeverity::rank)
}

/// Badge text for an optional severity label.
pub fn severity_badge(value: Option<&str>) -> String {
    match value {
        None => "⚪ Unknown".to_string(),
        Some(label) => match ChangeSeverity::parse(label) {
            Some(severity) => severity.badge().to_string(),
            None => format!("⚪ {}", title_case(label)),
        },
    }
}

fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
