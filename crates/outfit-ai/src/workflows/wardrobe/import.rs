use std::fmt;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Deserializer};

use crate::workflows::outfits::domain::{
    Category, Formality, Garment, Material, Pattern, Seasonality, StyleBucket,
};

#[derive(Debug)]
pub enum WardrobeImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    /// A cell that could not be interpreted. `line` counts the header as line 1.
    InvalidField {
        line: usize,
        field: &'static str,
        value: String,
    },
    DuplicateId {
        line: usize,
        id: String,
    },
}

impl fmt::Display for WardrobeImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WardrobeImportError::Io(err) => write!(f, "failed to read wardrobe export: {err}"),
            WardrobeImportError::Csv(err) => write!(f, "invalid wardrobe CSV data: {err}"),
            WardrobeImportError::InvalidField { line, field, value } => {
                write!(f, "line {line}: unrecognised {field} '{value}'")
            }
            WardrobeImportError::DuplicateId { line, id } => {
                write!(f, "line {line}: garment id '{id}' appears more than once")
            }
        }
    }
}

impl std::error::Error for WardrobeImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WardrobeImportError::Io(err) => Some(err),
            WardrobeImportError::Csv(err) => Some(err),
            WardrobeImportError::InvalidField { .. } | WardrobeImportError::DuplicateId { .. } => {
                None
            }
        }
    }
}

impl From<std::io::Error> for WardrobeImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for WardrobeImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads a headered wardrobe CSV into garments.
pub struct WardrobeImporter;

impl WardrobeImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Garment>, WardrobeImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Garment>, WardrobeImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut garments: Vec<Garment> = Vec::new();

        for (offset, record) in csv_reader.deserialize::<GarmentRow>().enumerate() {
            let line = offset + 2;
            let garment = record?.into_garment(line)?;
            if garments.iter().any(|existing| existing.id == garment.id) {
                return Err(WardrobeImportError::DuplicateId {
                    line,
                    id: garment.id.0,
                });
            }
            garments.push(garment);
        }

        Ok(garments)
    }
}

#[derive(Debug, Deserialize)]
struct GarmentRow {
    id: String,
    name: String,
    category: String,
    primary_color: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    secondary_color: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    material: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    fit: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pattern: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    seasonality: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    formality: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    style: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    wear_count: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    last_worn: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    tags: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    description: Option<String>,
}

impl GarmentRow {
    fn into_garment(self, line: usize) -> Result<Garment, WardrobeImportError> {
        let invalid = |field: &'static str, value: &str| WardrobeImportError::InvalidField {
            line,
            field,
            value: value.to_string(),
        };

        if self.id.is_empty() {
            return Err(invalid("id", ""));
        }
        let category =
            Category::parse(&self.category).ok_or_else(|| invalid("category", &self.category))?;
        let mut garment = Garment::new(self.id, self.name, category, self.primary_color);

        garment.secondary_color = self.secondary_color.map(|color| color.to_ascii_lowercase());
        garment.fit = self.fit;
        garment.description = self.description;

        if let Some(value) = self.material {
            garment.material = match Material::parse(&value) {
                Material::Other if !is_other(&value) => return Err(invalid("material", &value)),
                material => material,
            };
        }
        if let Some(value) = self.pattern {
            garment.pattern = match Pattern::parse(&value) {
                Pattern::Other if !is_other(&value) => return Err(invalid("pattern", &value)),
                pattern => pattern,
            };
        }
        if let Some(value) = self.seasonality {
            garment.seasonality =
                Seasonality::parse(&value).ok_or_else(|| invalid("seasonality", &value))?;
        }
        if let Some(value) = self.formality {
            garment.formality =
                Formality::parse(&value).ok_or_else(|| invalid("formality", &value))?;
        }
        if let Some(value) = self.style {
            garment.style = StyleBucket::parse(&value).ok_or_else(|| invalid("style", &value))?;
        }
        if let Some(value) = self.wear_count {
            garment.wear_count = value
                .parse()
                .map_err(|_| invalid("wear_count", &value))?;
        }
        if let Some(value) = self.last_worn {
            let worn = parse_timestamp(&value).ok_or_else(|| invalid("last_worn", &value))?;
            garment.last_worn = Some(worn);
        }
        if let Some(value) = self.tags {
            garment.tags = value
                .split(';')
                .map(|tag| tag.trim().to_ascii_lowercase())
                .filter(|tag| !tag.is_empty())
                .collect();
        }

        Ok(garment)
    }
}

fn is_other(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("other")
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
pub(crate) fn parse_timestamp_for_tests(value: &str) -> Option<DateTime<Utc>> {
    parse_timestamp(value)
}
