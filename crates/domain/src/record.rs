use metaform_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

const ID_PROPERTY: &str = "id";

/// Persisted entity record: a server-assigned id plus one value per field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    #[serde(deserialize_with = "deserialize_record_id")]
    id: NonEmptyString,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl EntityRecord {
    /// Creates a record; an `id` key inside `fields` is discarded.
    pub fn new(id: impl Into<String>, mut fields: Map<String, Value>) -> AppResult<Self> {
        fields.remove(ID_PROPERTY);
        Ok(Self {
            id: NonEmptyString::new(id)?,
            fields,
        })
    }

    /// Builds a record from a gateway-assigned id and a submitted payload.
    pub fn from_payload(id: impl Into<String>, payload: EntityPayload) -> AppResult<Self> {
        Self::new(id, payload.into_fields())
    }

    /// Returns the record identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns the field values, without `id`.
    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Returns one field value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Returns the record as a JSON object including `id`.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut object = self.fields.clone();
        object.insert(
            ID_PROPERTY.to_owned(),
            Value::String(self.id.as_str().to_owned()),
        );
        Value::Object(object)
    }
}

// Some REST backends hand out numeric ids; records always carry them as strings.
fn deserialize_record_id<'de, D>(deserializer: D) -> Result<NonEmptyString, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    let id = match raw {
        Value::String(text) => text,
        Value::Number(number) => number.to_string(),
        other => {
            return Err(serde::de::Error::custom(format!(
                "record id must be a string or number, got {other}"
            )));
        }
    };

    NonEmptyString::new(id).map_err(serde::de::Error::custom)
}

/// Create or update body: a full replacement field map that never carries `id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EntityPayload(Map<String, Value>);

impl EntityPayload {
    /// Wraps a field map, dropping any `id` key.
    #[must_use]
    pub fn new(mut fields: Map<String, Value>) -> Self {
        fields.remove(ID_PROPERTY);
        Self(fields)
    }

    /// Builds a payload from an arbitrary JSON value, which must be an object.
    pub fn from_value(value: Value) -> AppResult<Self> {
        match value {
            Value::Object(fields) => Ok(Self::new(fields)),
            _ => Err(AppError::Validation(
                "entity payload must be a JSON object".to_owned(),
            )),
        }
    }

    /// Returns the field values.
    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consumes the payload into its field map.
    #[must_use]
    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }
}
