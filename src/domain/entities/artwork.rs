use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::entities::option_fields::OptionField;

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Artwork {
    pub id: i64,
    pub title: String,
    pub image: String,
    pub description: String,
    pub price: Option<f64>,
    pub medium: Option<String>,
    pub dimensions: Option<String>,
    pub category: Option<String>,
    pub year: Option<i32>,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated artwork ready for insertion; the id is assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtworkInsert {
    pub title: String,
    pub image: String,
    pub description: String,
    pub price: Option<f64>,
    pub medium: Option<String>,
    pub dimensions: Option<String>,
    pub category: Option<String>,
    pub year: Option<i32>,
    pub is_available: bool,
}

// ───── Input & Validation ───────────────────────────────────────────

/// Admin form payload. Numeric fields are accepted as numbers or numeric strings.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewArtworkRequest {
    #[validate(
        required(message = "Title is required"),
        custom(function = "validate_not_blank", message = "Title is required")
    )]
    pub title: Option<String>,

    #[validate(
        required(message = "Description is required"),
        custom(function = "validate_not_blank", message = "Description is required")
    )]
    pub description: Option<String>,

    #[validate(
        required(message = "Image is required"),
        custom(function = "validate_not_blank", message = "Image is required")
    )]
    pub image: Option<String>,

    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: Option<f64>,

    pub medium: Option<String>,
    pub dimensions: Option<String>,
    pub category: Option<String>,

    #[serde(default, deserialize_with = "lenient_i32::deserialize")]
    pub year: Option<i32>,

    pub is_available: Option<bool>,
}

impl NewArtworkRequest {
    pub fn prepare_for_insert(self) -> ArtworkInsert {
        ArtworkInsert {
            title: self.title.unwrap_or_default().trim().to_string(),
            image: self.image.unwrap_or_default().trim().to_string(),
            description: self.description.unwrap_or_default(),
            price: self.price,
            medium: trimmed(self.medium),
            dimensions: trimmed(self.dimensions),
            category: trimmed(self.category),
            year: self.year,
            // Only an explicit `false` marks a new piece as unavailable.
            is_available: self.is_available != Some(false),
        }
    }
}

/// Partial update; `id` selects the record and every other field is optional.
/// Nullable columns distinguish "absent" from an explicit `null`.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateArtworkRequest {
    pub id: Option<i64>,

    #[validate(custom(function = "validate_not_blank", message = "Title cannot be empty"))]
    pub title: Option<String>,

    #[validate(custom(function = "validate_not_blank", message = "Image cannot be empty"))]
    pub image: Option<String>,

    #[validate(custom(function = "validate_not_blank", message = "Description cannot be empty"))]
    pub description: Option<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_patch_price"))]
    pub price: OptionField<f64>,

    #[serde(default)]
    pub medium: OptionField<String>,

    #[serde(default)]
    pub dimensions: OptionField<String>,

    #[serde(default)]
    pub category: OptionField<String>,

    #[serde(default)]
    pub year: OptionField<i32>,

    pub is_available: Option<bool>,
}

impl UpdateArtworkRequest {
    /// Overlays the supplied fields onto `current`, producing the full new row.
    pub fn apply_to(self, current: &Artwork) -> ArtworkInsert {
        ArtworkInsert {
            title: self.title.map(|t| t.trim().to_string()).unwrap_or_else(|| current.title.clone()),
            image: self.image.map(|i| i.trim().to_string()).unwrap_or_else(|| current.image.clone()),
            description: self.description.unwrap_or_else(|| current.description.clone()),
            price: merge(self.price, current.price),
            medium: merge(self.medium.map_value(|m| m.trim().to_string()), current.medium.clone()),
            dimensions: merge(self.dimensions.map_value(|d| d.trim().to_string()), current.dimensions.clone()),
            category: merge(self.category.map_value(|c| c.trim().to_string()), current.category.clone()),
            year: merge(self.year, current.year),
            is_available: self.is_available.unwrap_or(current.is_available),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ArtworkIdRequest {
    pub id: Option<i64>,
}

// ───── Helper Functions ─────────────────────────────────────────────

fn merge<T>(patch: OptionField<T>, current: Option<T>) -> Option<T> {
    match patch {
        OptionField::Unchanged => current,
        OptionField::SetToNull => None,
        OptionField::SetToValue(v) => Some(v),
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn validate_not_blank(value: &String) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn validate_patch_price(price: &OptionField<f64>) -> Result<(), ValidationError> {
    match price {
        OptionField::SetToValue(p) if *p < 0.0 || !p.is_finite() => {
            let mut err = ValidationError::new("range");
            err.message = Some("Price cannot be negative".into());
            Err(err)
        }
        _ => Ok(()),
    }
}

/// The admin form posts numbers as strings; empty strings mean "not set".
#[derive(Deserialize)]
#[serde(untagged)]
enum FormNumber {
    Number(f64),
    Text(String),
}

impl FormNumber {
    fn into_f64<E: serde::de::Error>(self) -> Result<Option<f64>, E> {
        let n = match self {
            FormNumber::Number(n) => n,
            FormNumber::Text(s) if s.trim().is_empty() => return Ok(None),
            FormNumber::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| E::custom(format!("invalid number: {s}")))?,
        };

        if !n.is_finite() {
            return Err(E::custom("number must be finite"));
        }
        Ok(Some(n))
    }
}

mod lenient_f64 {
    use serde::{Deserialize, Deserializer};

    use super::FormNumber;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<FormNumber>::deserialize(deserializer)? {
            Some(raw) => raw.into_f64(),
            None => Ok(None),
        }
    }
}

mod lenient_i32 {
    use serde::{de::Error, Deserialize, Deserializer};

    use super::FormNumber;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let parsed = match Option::<FormNumber>::deserialize(deserializer)? {
            Some(raw) => raw.into_f64::<D::Error>()?,
            None => None,
        };
        let Some(n) = parsed else {
            return Ok(None);
        };

        if n.fract() != 0.0 || n < f64::from(i32::MIN) || n > f64::from(i32::MAX) {
            return Err(D::Error::custom(format!("expected a whole number, got {n}")));
        }
        Ok(Some(n as i32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stored() -> Artwork {
        Artwork {
            id: 3,
            title: "Sunset Serenity".into(),
            image: "/images/sunset.jpg".into(),
            description: "Warm light over water".into(),
            price: Some(500.0),
            medium: Some("Oil".into()),
            dimensions: None,
            category: Some("Landscape".into()),
            year: Some(2022),
            is_available: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn missing_required_fields_fail_validation() {
        let request: NewArtworkRequest = serde_json::from_value(json!({
            "title": "  ",
            "image": "/images/a.jpg"
        }))
        .unwrap();

        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("description"));
        assert!(!fields.contains_key("image"));
    }

    #[test]
    fn form_strings_are_parsed_as_numbers() {
        let request: NewArtworkRequest = serde_json::from_value(json!({
            "title": "Urban Rhythm",
            "description": "City energy",
            "image": "/images/urban.jpg",
            "price": "750.50",
            "year": "2021",
            "medium": "  Acrylic  ",
            "category": ""
        }))
        .unwrap();

        assert!(request.validate().is_ok());
        let insert = request.prepare_for_insert();
        assert_eq!(insert.price, Some(750.5));
        assert_eq!(insert.year, Some(2021));
        assert_eq!(insert.medium.as_deref(), Some("Acrylic"));
        assert_eq!(insert.category, None);
        assert!(insert.is_available);
    }

    #[test]
    fn non_finite_price_is_rejected() {
        for price in ["NaN", "inf", "-infinity"] {
            let parsed = serde_json::from_value::<NewArtworkRequest>(json!({
                "title": "T", "description": "D", "image": "I", "price": price
            }));
            assert!(parsed.is_err(), "{price} should not parse");
        }
    }

    #[test]
    fn year_must_be_a_whole_number_in_range() {
        for year in [json!(2021.9), json!("2021.9"), json!("1e12")] {
            let parsed = serde_json::from_value::<NewArtworkRequest>(json!({
                "title": "T", "description": "D", "image": "I", "year": year
            }));
            assert!(parsed.is_err(), "{year} should not parse");
        }

        let request: NewArtworkRequest = serde_json::from_value(json!({
            "title": "T", "description": "D", "image": "I", "year": 2021.0
        }))
        .unwrap();
        assert_eq!(request.year, Some(2021));
    }

    #[test]
    fn negative_price_is_rejected() {
        let request: NewArtworkRequest = serde_json::from_value(json!({
            "title": "T", "description": "D", "image": "I", "price": -1
        }))
        .unwrap();

        assert!(request.validate().unwrap_err().field_errors().contains_key("price"));
    }

    #[test]
    fn explicit_false_marks_unavailable() {
        let request: NewArtworkRequest = serde_json::from_value(json!({
            "title": "T", "description": "D", "image": "I", "isAvailable": false
        }))
        .unwrap();

        assert!(!request.prepare_for_insert().is_available);
    }

    #[test]
    fn update_distinguishes_null_from_absent() {
        let patch: UpdateArtworkRequest = serde_json::from_value(json!({
            "id": 3,
            "title": "Sunset Serenity II",
            "price": null,
            "dimensions": "40x60"
        }))
        .unwrap();

        let merged = patch.apply_to(&stored());
        assert_eq!(merged.title, "Sunset Serenity II");
        assert_eq!(merged.price, None);
        assert_eq!(merged.dimensions.as_deref(), Some("40x60"));
        assert_eq!(merged.medium.as_deref(), Some("Oil"));
        assert_eq!(merged.year, Some(2022));
    }

    #[test]
    fn update_rejects_negative_price() {
        let patch: UpdateArtworkRequest =
            serde_json::from_value(json!({"id": 1, "price": -5.0})).unwrap();

        assert!(patch.validate().is_err());
    }
}
