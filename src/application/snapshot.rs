use serde::Serialize;

use crate::domain::{Collection, Crop, Entity, EntityKind, Equipment, Field, Staff, Vehicle};

/// The whole state tree: one ordered collection per entity kind.
///
/// Cloning is cheap; every collection is reference counted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    pub vehicle: Collection<Vehicle>,
    pub equipment: Collection<Equipment>,
    pub staff: Collection<Staff>,
    pub field: Collection<Field>,
    pub crop: Collection<Crop>,
}

impl Snapshot {
    pub fn len(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Vehicle => self.vehicle.len(),
            EntityKind::Equipment => self.equipment.len(),
            EntityKind::Staff => self.staff.len(),
            EntityKind::Field => self.field.len(),
            EntityKind::Crop => self.crop.len(),
        }
    }

    /// Every record of `kind` as its attribute values, in insertion order.
    pub fn rows(&self, kind: EntityKind) -> Vec<Vec<String>> {
        match kind {
            EntityKind::Vehicle => rows_of(&self.vehicle),
            EntityKind::Equipment => rows_of(&self.equipment),
            EntityKind::Staff => rows_of(&self.staff),
            EntityKind::Field => rows_of(&self.field),
            EntityKind::Crop => rows_of(&self.crop),
        }
    }

    /// Attribute values of the record at `index`.
    pub fn row(&self, kind: EntityKind, index: usize) -> Option<Vec<String>> {
        match kind {
            EntityKind::Vehicle => row_of(&self.vehicle, index),
            EntityKind::Equipment => row_of(&self.equipment, index),
            EntityKind::Staff => row_of(&self.staff, index),
            EntityKind::Field => row_of(&self.field, index),
            EntityKind::Crop => row_of(&self.crop, index),
        }
    }

    /// Identity key of the record at `index`.
    pub fn key_at(&self, kind: EntityKind, index: usize) -> Option<String> {
        self.row(kind, index).and_then(|row| row.into_iter().next())
    }

    /// Names offered by staff-assignment fields.
    pub fn staff_names(&self) -> Vec<String> {
        self.staff
            .iter()
            .map(Staff::display_name)
            .filter(|name| !name.is_empty())
            .collect()
    }
}

fn row_of<T: Entity>(collection: &Collection<T>, index: usize) -> Option<Vec<String>> {
    collection
        .get(index)
        .map(|record| record.values().into_iter().map(str::to_string).collect())
}

fn rows_of<T: Entity>(collection: &Collection<T>) -> Vec<Vec<String>> {
    collection
        .iter()
        .map(|record| record.values().into_iter().map(str::to_string).collect())
        .collect()
}
