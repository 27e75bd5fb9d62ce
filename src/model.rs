use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Canonical column order for every exported dealflow record.
pub const OUTPUT_FIELDS: [&str; 18] = [
    "id",
    "name",
    "sector",
    "sub_sector",
    "country",
    "stage",
    "description",
    "website",
    "tags",
    "primary_technology",
    "water_efficiency",
    "regenerative_technologies",
    "environmental_impact",
    "social_impact",
    "digital_model",
    "sustainability_indicator",
    "data_source",
    "scraped_at",
];

/// Loosely-typed record yielded by a source adapter before normalization.
pub type CandidateRecord = Map<String, Value>;

/// Normalized dealflow record.
///
/// Fields are declared in [`OUTPUT_FIELDS`] order so serialization emits the
/// export column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealRecord {
    pub id: String,
    pub name: String,
    pub sector: String,
    pub sub_sector: String,
    pub country: String,
    pub stage: String,
    pub description: String,
    pub website: String,
    pub tags: Vec<String>,
    pub primary_technology: String,
    pub water_efficiency: String,
    pub regenerative_technologies: String,
    pub environmental_impact: String,
    pub social_impact: String,
    pub digital_model: String,
    pub sustainability_indicator: String,
    pub data_source: String,
    /// Unix timestamp (seconds) taken when the record was normalized
    pub scraped_at: i64,
}

impl DealRecord {
    /// Returns the value stored under a schema field name, or `None` for
    /// names outside [`OUTPUT_FIELDS`].
    pub fn cell(&self, field: &str) -> Option<Value> {
        let text = match field {
            "id" => &self.id,
            "name" => &self.name,
            "sector" => &self.sector,
            "sub_sector" => &self.sub_sector,
            "country" => &self.country,
            "stage" => &self.stage,
            "description" => &self.description,
            "website" => &self.website,
            "primary_technology" => &self.primary_technology,
            "water_efficiency" => &self.water_efficiency,
            "regenerative_technologies" => &self.regenerative_technologies,
            "environmental_impact" => &self.environmental_impact,
            "social_impact" => &self.social_impact,
            "digital_model" => &self.digital_model,
            "sustainability_indicator" => &self.sustainability_indicator,
            "data_source" => &self.data_source,
            "tags" => {
                return Some(Value::Array(
                    self.tags.iter().cloned().map(Value::String).collect(),
                ))
            }
            "scraped_at" => return Some(Value::from(self.scraped_at)),
            _ => return None,
        };
        Some(Value::String(text.clone()))
    }

    /// Mutable access to a scalar text field by schema name.
    pub(crate) fn text_field_mut(&mut self, field: &str) -> Option<&mut String> {
        match field {
            "id" => Some(&mut self.id),
            "name" => Some(&mut self.name),
            "sector" => Some(&mut self.sector),
            "sub_sector" => Some(&mut self.sub_sector),
            "country" => Some(&mut self.country),
            "stage" => Some(&mut self.stage),
            "description" => Some(&mut self.description),
            "website" => Some(&mut self.website),
            "primary_technology" => Some(&mut self.primary_technology),
            "water_efficiency" => Some(&mut self.water_efficiency),
            "regenerative_technologies" => Some(&mut self.regenerative_technologies),
            "environmental_impact" => Some(&mut self.environmental_impact),
            "social_impact" => Some(&mut self.social_impact),
            "digital_model" => Some(&mut self.digital_model),
            "sustainability_indicator" => Some(&mut self.sustainability_indicator),
            "data_source" => Some(&mut self.data_source),
            _ => None,
        }
    }

    /// Empty record stamped with `scraped_at`.
    pub(crate) fn blank(scraped_at: i64) -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            sector: String::new(),
            sub_sector: String::new(),
            country: String::new(),
            stage: String::new(),
            description: String::new(),
            website: String::new(),
            tags: Vec::new(),
            primary_technology: String::new(),
            water_efficiency: String::new(),
            regenerative_technologies: String::new(),
            environmental_impact: String::new(),
            social_impact: String::new(),
            digital_model: String::new(),
            sustainability_indicator: String::new(),
            data_source: String::new(),
            scraped_at,
        }
    }
}

/// Identity of a remote source as seen by its adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    /// Human readable name, also attached to records as `data_source`
    pub name: String,
    pub url: String,
    /// Free-text onboarding notes (auth, rate limits, ...)
    pub notes: Option<String>,
}
