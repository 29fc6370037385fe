use serde::{Deserialize, Deserializer, Serialize};

/// Represents optional field semantics in PATCH/UPDATE requests.
///
/// - `Unchanged` → field absent from the payload
/// - `SetToNull` → explicitly `null`
/// - `SetToValue` → set to provided value
///
/// Pair with `#[serde(default)]` so that an absent key becomes `Unchanged`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub enum OptionField<T> {
    #[default]
    Unchanged,
    SetToNull,
    SetToValue(T),
}

impl<'de, T> Deserialize<'de> for OptionField<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            None => OptionField::SetToNull,
            Some(value) => OptionField::SetToValue(value),
        })
    }
}

impl<T> OptionField<T> {
    /// Transform inner value if `SetToValue`
    pub fn map_value<U, F: FnOnce(T) -> U>(self, f: F) -> OptionField<U> {
        match self {
            Self::Unchanged => OptionField::Unchanged,
            Self::SetToNull => OptionField::SetToNull,
            Self::SetToValue(v) => OptionField::SetToValue(f(v)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default)]
        medium: OptionField<String>,
    }

    #[test]
    fn absent_null_and_value_are_distinct() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        let null: Patch = serde_json::from_str(r#"{"medium": null}"#).unwrap();
        let value: Patch = serde_json::from_str(r#"{"medium": "Oil"}"#).unwrap();

        assert_eq!(absent.medium, OptionField::Unchanged);
        assert_eq!(null.medium, OptionField::SetToNull);
        assert_eq!(value.medium, OptionField::SetToValue("Oil".to_string()));
    }

    #[test]
    fn map_value_keeps_null_and_absent() {
        assert_eq!(OptionField::<i32>::Unchanged.map_value(|v| v + 1), OptionField::Unchanged);
        assert_eq!(OptionField::<i32>::SetToNull.map_value(|v| v + 1), OptionField::SetToNull);
        assert_eq!(OptionField::SetToValue(1).map_value(|v| v + 1), OptionField::SetToValue(2));
    }
}
