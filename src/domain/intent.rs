use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::errors::{StoreError, StoreResult};
use super::models::{Crop, Entity, EntityKind, Equipment, Field, Staff, Vehicle};

/// One of the three operations a collection answers to.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation<T> {
    /// Append a fully populated record.
    Add(T),
    /// Remove every record with this identity key.
    Delete(String),
    /// Replace the first record keyed `key` with `record`.
    Update { key: String, record: T },
}

impl<T> Operation<T> {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Add(_) => "add",
            Self::Delete(_) => "delete",
            Self::Update { .. } => "update",
        }
    }
}

/// A routable instruction: one operation tagged with the kind it targets.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Vehicle(Operation<Vehicle>),
    Equipment(Operation<Equipment>),
    Staff(Operation<Staff>),
    Field(Operation<Field>),
    Crop(Operation<Crop>),
}

impl Intent {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Vehicle(_) => EntityKind::Vehicle,
            Self::Equipment(_) => EntityKind::Equipment,
            Self::Staff(_) => EntityKind::Staff,
            Self::Field(_) => EntityKind::Field,
            Self::Crop(_) => EntityKind::Crop,
        }
    }

    pub fn operation_name(&self) -> &'static str {
        match self {
            Self::Vehicle(op) => op.name(),
            Self::Equipment(op) => op.name(),
            Self::Staff(op) => op.name(),
            Self::Field(op) => op.name(),
            Self::Crop(op) => op.name(),
        }
    }

    /// Add, or Update of `editing` when set, built from form values in
    /// field order.
    pub fn from_values(kind: EntityKind, values: &[String], editing: Option<String>) -> Self {
        match kind {
            EntityKind::Vehicle => record_intent::<Vehicle>(values, editing),
            EntityKind::Equipment => record_intent::<Equipment>(values, editing),
            EntityKind::Staff => record_intent::<Staff>(values, editing),
            EntityKind::Field => record_intent::<Field>(values, editing),
            EntityKind::Crop => record_intent::<Crop>(values, editing),
        }
    }

    pub fn delete(kind: EntityKind, key: impl Into<String>) -> Self {
        let key = key.into();
        match kind {
            EntityKind::Vehicle => Self::Vehicle(Operation::Delete(key)),
            EntityKind::Equipment => Self::Equipment(Operation::Delete(key)),
            EntityKind::Staff => Self::Staff(Operation::Delete(key)),
            EntityKind::Field => Self::Field(Operation::Delete(key)),
            EntityKind::Crop => Self::Crop(Operation::Delete(key)),
        }
    }
}

fn record_intent<T: Entity>(values: &[String], editing: Option<String>) -> Intent {
    let record = T::from_values(values);
    let operation = match editing {
        Some(key) => Operation::Update { key, record },
        None => Operation::Add(record),
    };
    T::wrap(operation)
}

/// The untyped form of an intent, as it arrives from outside the crate:
///
/// ```json
/// { "entityKind": "vehicle", "operation": "delete", "payload": "V1" }
/// ```
///
/// Convert with `Intent::try_from`; anything that does not name a known
/// kind and operation with a well-formed payload is rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawIntent {
    pub entity_kind: String,
    pub operation: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

#[derive(Deserialize)]
struct UpdatePayload<T> {
    key: String,
    record: T,
}

impl TryFrom<RawIntent> for Intent {
    type Error = StoreError;

    fn try_from(raw: RawIntent) -> StoreResult<Self> {
        let unknown = || StoreError::UnknownIntent {
            kind: raw.entity_kind.clone(),
            operation: raw.operation.clone(),
        };
        let kind = EntityKind::parse(&raw.entity_kind).ok_or_else(unknown)?;
        if !matches!(raw.operation.as_str(), "add" | "delete" | "update") {
            return Err(unknown());
        }

        let intent = match kind {
            EntityKind::Vehicle => Self::Vehicle(parse_operation(kind, &raw.operation, raw.payload)?),
            EntityKind::Equipment => Self::Equipment(parse_operation(kind, &raw.operation, raw.payload)?),
            EntityKind::Staff => Self::Staff(parse_operation(kind, &raw.operation, raw.payload)?),
            EntityKind::Field => Self::Field(parse_operation(kind, &raw.operation, raw.payload)?),
            EntityKind::Crop => Self::Crop(parse_operation(kind, &raw.operation, raw.payload)?),
        };
        Ok(intent)
    }
}

fn parse_operation<T: DeserializeOwned>(
    kind: EntityKind,
    operation: &str,
    payload: serde_json::Value,
) -> StoreResult<Operation<T>> {
    let malformed = |e: serde_json::Error| StoreError::MalformedPayload {
        kind,
        operation: operation.to_string(),
        reason: e.to_string(),
    };

    match operation {
        "add" => serde_json::from_value(payload).map(Operation::Add).map_err(malformed),
        "delete" => serde_json::from_value(payload).map(Operation::Delete).map_err(malformed),
        "update" => serde_json::from_value::<UpdatePayload<T>>(payload)
            .map(|p| Operation::Update { key: p.key, record: p.record })
            .map_err(malformed),
        _ => Err(StoreError::UnknownIntent {
            kind: kind.to_string(),
            operation: operation.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(kind: &str, operation: &str, payload: serde_json::Value) -> RawIntent {
        RawIntent {
            entity_kind: kind.to_string(),
            operation: operation.to_string(),
            payload,
        }
    }

    #[test]
    fn test_raw_add_converts_to_typed_intent() {
        let intent = Intent::try_from(raw(
            "vehicle",
            "add",
            json!({
                "vehicleCode": "V1",
                "licensePlate": "ABC-1",
                "vehicleCategory": "Tractor",
                "fuelType": "Diesel",
                "status": "Available",
                "allocatedStaff": "John Doe"
            }),
        ))
        .unwrap();

        let Intent::Vehicle(Operation::Add(vehicle)) = intent else {
            panic!("expected vehicle add");
        };
        assert_eq!(vehicle.key(), "V1");
        assert_eq!(vehicle.license_plate, "ABC-1");
    }

    #[test]
    fn test_raw_delete_and_update() {
        let delete = Intent::try_from(raw("staff", "delete", json!("S1"))).unwrap();
        assert_eq!(delete, Intent::Staff(Operation::Delete("S1".to_string())));

        let update = Intent::try_from(raw(
            "field",
            "update",
            json!({
                "key": "F1",
                "record": {"fieldCode": "F1", "fieldName": "North", "location": "Kandy", "extentSize": "2"}
            }),
        ))
        .unwrap();
        assert_eq!(update.kind(), EntityKind::Field);
        assert_eq!(update.operation_name(), "update");
    }

    #[test]
    fn test_raw_intent_deserializes_from_json() {
        let raw: RawIntent =
            serde_json::from_str(r#"{"entityKind":"crop","operation":"delete","payload":"C1"}"#).unwrap();
        assert_eq!(
            Intent::try_from(raw).unwrap(),
            Intent::Crop(Operation::Delete("C1".to_string()))
        );
    }

    #[test]
    fn test_unknown_kind_or_operation_is_rejected() {
        assert!(matches!(
            Intent::try_from(raw("tractor", "add", json!({}))),
            Err(StoreError::UnknownIntent { .. })
        ));
        assert!(matches!(
            Intent::try_from(raw("vehicle", "archive", json!("V1"))),
            Err(StoreError::UnknownIntent { .. })
        ));
    }

    #[test]
    fn test_malformed_payload_is_rejected() {
        let err = Intent::try_from(raw("equipment", "delete", json!({"equipmentId": "E1"}))).unwrap_err();
        assert!(matches!(
            err,
            StoreError::MalformedPayload { kind: EntityKind::Equipment, .. }
        ));

        let err = Intent::try_from(raw("vehicle", "add", json!({"vehicleCode": "V1"}))).unwrap_err();
        assert!(matches!(err, StoreError::MalformedPayload { .. }));
    }

    #[test]
    fn test_from_values_builds_add_or_update() {
        let values: Vec<String> = ["C1", "Rice", "Oryza sativa", "Cereal", "Maha", "F1"]
            .iter()
            .map(|v| v.to_string())
            .collect();

        let add = Intent::from_values(EntityKind::Crop, &values, None);
        assert_eq!(add.operation_name(), "add");

        let update = Intent::from_values(EntityKind::Crop, &values, Some("C0".to_string()));
        let Intent::Crop(Operation::Update { key, record }) = update else {
            panic!("expected crop update");
        };
        assert_eq!(key, "C0");
        assert_eq!(record.common_name, "Rice");
    }

    #[test]
    fn test_delete_constructor_targets_kind() {
        for kind in EntityKind::ALL {
            let intent = Intent::delete(kind, "K");
            assert_eq!(intent.kind(), kind);
            assert_eq!(intent.operation_name(), "delete");
        }
    }
}
