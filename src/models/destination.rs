use serde::Serialize;

/// Reasons a catalog row is left out of the store
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CatalogRowError {
    #[error("missing value for column {0}")]
    MissingField(&'static str),

    #[error("budget {0:?} is not a number")]
    InvalidBudget(String),
}

/// One catalog entry. Only constructed through [`Destination::new`], so every value in a
/// catalog has its category fields filled and a parsed budget.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Destination {
    pub name: String,
    pub destination_type: String,
    pub travel_purpose: String,
    pub travel_season: String,
    pub municipality: String,
    /// Budget exactly as written in the catalog, e.g. "5,000"
    #[serde(rename = "budget")]
    pub budget_label: String,
    /// Parsed numeric budget
    #[serde(skip)]
    pub budget: f64,
    pub packing_tips: String,
}

impl Destination {
    /// Builds a destination from catalog cells, rejecting rows that cannot be matched
    pub fn new(
        name: &str,
        destination_type: &str,
        travel_purpose: &str,
        travel_season: &str,
        municipality: &str,
        budget: &str,
        packing_tips: &str,
    ) -> Result<Self, CatalogRowError> {
        let destination_type = required(destination_type, "Destination_Type")?;
        let travel_purpose = required(travel_purpose, "Travel_Purpose")?;
        let travel_season = required(travel_season, "Travel_season")?;
        let budget_label = required(budget, "Budget")?;
        let budget = parse_budget(&budget_label)?;

        Ok(Self {
            name: name.trim().to_string(),
            destination_type,
            travel_purpose,
            travel_season,
            municipality: municipality.trim().to_string(),
            budget_label,
            budget,
            packing_tips: packing_tips.trim().to_string(),
        })
    }
}

fn required(value: &str, column: &'static str) -> Result<String, CatalogRowError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CatalogRowError::MissingField(column));
    }
    Ok(trimmed.to_string())
}

/// Parses a locale-formatted amount such as "12,500.50", dropping thousands separators
pub fn parse_budget(raw: &str) -> Result<f64, CatalogRowError> {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    match cleaned.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(CatalogRowError::InvalidBudget(raw.to_string())),
    }
}
