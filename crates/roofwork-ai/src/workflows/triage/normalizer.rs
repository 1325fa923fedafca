use serde::{Deserialize, Serialize};

/// Closed category set for free-form roof type descriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoofCategory {
    Shingle,
    Tile,
    Metal,
    Flat,
    Unknown,
    Other,
}

impl RoofCategory {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Shingle => "Shingle",
            Self::Tile => "Tile",
            Self::Metal => "Metal",
            Self::Flat => "Flat",
            Self::Unknown => "Unknown",
            Self::Other => "Other",
        }
    }
}

const UNKNOWN_ALIASES: &[&str] = &["unknown", "other", "n/a", "na"];

/// Classify a free-form roof type description into the closed category set.
///
/// Matching is case-insensitive on the trimmed input, and the cascade order
/// is load-bearing: a description like "asphalt shingle, flat section"
/// resolves to Shingle because earlier patterns win regardless of position
/// in the string. Total over all inputs.
pub(crate) fn normalize_roof_type(raw: Option<&str>) -> RoofCategory {
    let value = match raw {
        Some(value) => value.trim().to_ascii_lowercase(),
        None => return RoofCategory::Unknown,
    };

    if value.contains("shingle") {
        return RoofCategory::Shingle;
    }
    if value.contains("asphalt") || value.contains("arch") {
        return RoofCategory::Shingle;
    }
    if value.contains("tile") {
        return RoofCategory::Tile;
    }
    if value.contains("metal") {
        return RoofCategory::Metal;
    }
    if value.contains("flat") {
        return RoofCategory::Flat;
    }
    if UNKNOWN_ALIASES.iter().any(|alias| value.contains(alias)) {
        return RoofCategory::Unknown;
    }

    RoofCategory::Other
}
