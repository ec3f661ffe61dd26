use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::intent::{Intent, Operation};

/// Names offered for staff-assignment fields when no staff records exist yet.
pub const DEFAULT_VEHICLE_STAFF: &[&str] = &["John Doe", "Jane Smith", "Alice Johnson"];
pub const DEFAULT_EQUIPMENT_STAFF: &[&str] = &[
    "John Doe",
    "Jane Smith",
    "Alice Johnson",
    "Bob Brown",
    "Charlie Davis",
];

/// The managed record categories. One collection exists per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Vehicle,
    Equipment,
    Staff,
    Field,
    Crop,
}

impl EntityKind {
    /// Every kind, in console page order.
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Vehicle,
        EntityKind::Equipment,
        EntityKind::Staff,
        EntityKind::Field,
        EntityKind::Crop,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vehicle => "vehicle",
            Self::Equipment => "equipment",
            Self::Staff => "staff",
            Self::Field => "field",
            Self::Crop => "crop",
        }
    }

    /// Parses the lowercase name produced by [`EntityKind::as_str`].
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "vehicle" => Some(Self::Vehicle),
            "equipment" => Some(Self::Equipment),
            "staff" => Some(Self::Staff),
            "field" => Some(Self::Field),
            "crop" => Some(Self::Crop),
            _ => None,
        }
    }

    /// Page title shown in the console.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Vehicle => "Vehicle Management",
            Self::Equipment => "Equipment Management",
            Self::Staff => "Staff Management",
            Self::Field => "Field Management",
            Self::Crop => "Crop Management",
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|k| k == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        match self {
            Self::Vehicle => Vehicle::FIELDS,
            Self::Equipment => Equipment::FIELDS,
            Self::Staff => Staff::FIELDS,
            Self::Field => Field::FIELDS,
            Self::Crop => Crop::FIELDS,
        }
    }

    pub fn columns(&self) -> &'static [usize] {
        match self {
            Self::Vehicle => Vehicle::COLUMNS,
            Self::Equipment => Equipment::COLUMNS,
            Self::Staff => Staff::COLUMNS,
            Self::Field => Field::COLUMNS,
            Self::Crop => Crop::COLUMNS,
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a form attribute is edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldInput {
    /// Free text.
    Text,
    /// One of a fixed list of options.
    Select(&'static [&'static str]),
    /// A staff member's name, drawn from the staff collection. The list is
    /// the fallback used while that collection is empty.
    Staff(&'static [&'static str]),
}

/// Describes one attribute of a record: its serialized name, its form label
/// and how it is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub input: FieldInput,
}

const fn text(name: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec { name, label, input: FieldInput::Text }
}

const fn select(name: &'static str, label: &'static str, options: &'static [&'static str]) -> FieldSpec {
    FieldSpec { name, label, input: FieldInput::Select(options) }
}

const fn staff(name: &'static str, label: &'static str, fallback: &'static [&'static str]) -> FieldSpec {
    FieldSpec { name, label, input: FieldInput::Staff(fallback) }
}

/// A flat record of string attributes with one identity key.
///
/// `FIELDS` lists every attribute in form order; the identity key is always
/// the first entry. `COLUMNS` picks the attributes shown in the page table.
pub trait Entity: Clone + PartialEq + std::fmt::Debug + Serialize + DeserializeOwned {
    const KIND: EntityKind;
    const FIELDS: &'static [FieldSpec];
    const COLUMNS: &'static [usize];

    /// The identity key used to locate this record for update and delete.
    fn key(&self) -> &str;

    /// Attribute values in `FIELDS` order.
    fn values(&self) -> Vec<&str>;

    /// Builds a record from values in `FIELDS` order. Missing values are empty.
    fn from_values(values: &[String]) -> Self;

    /// Tags an operation on this kind as a routable intent.
    fn wrap(operation: Operation<Self>) -> Intent;
}

fn value_at(values: &[String], index: usize) -> String {
    values.get(index).cloned().unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub vehicle_code: String,
    pub license_plate: String,
    pub vehicle_category: String,
    pub fuel_type: String,
    pub status: String,
    pub allocated_staff: String,
}

impl Entity for Vehicle {
    const KIND: EntityKind = EntityKind::Vehicle;
    const FIELDS: &'static [FieldSpec] = &[
        text("vehicleCode", "Vehicle Code"),
        text("licensePlate", "License Plate"),
        text("vehicleCategory", "Vehicle Category"),
        select("fuelType", "Fuel Type", &["Petrol", "Diesel", "Electric"]),
        select("status", "Status", &["Available", "Out of Service"]),
        staff("allocatedStaff", "Allocated Staff", DEFAULT_VEHICLE_STAFF),
    ];
    const COLUMNS: &'static [usize] = &[0, 2, 4, 5];

    fn key(&self) -> &str {
        &self.vehicle_code
    }

    fn values(&self) -> Vec<&str> {
        vec![
            self.vehicle_code.as_str(),
            self.license_plate.as_str(),
            self.vehicle_category.as_str(),
            self.fuel_type.as_str(),
            self.status.as_str(),
            self.allocated_staff.as_str(),
        ]
    }

    fn from_values(values: &[String]) -> Self {
        Self {
            vehicle_code: value_at(values, 0),
            license_plate: value_at(values, 1),
            vehicle_category: value_at(values, 2),
            fuel_type: value_at(values, 3),
            status: value_at(values, 4),
            allocated_staff: value_at(values, 5),
        }
    }

    fn wrap(operation: Operation<Self>) -> Intent {
        Intent::Vehicle(operation)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    pub equipment_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub equipment_type: String,
    pub status: String,
    pub assigned_staff: String,
}

impl Entity for Equipment {
    const KIND: EntityKind = EntityKind::Equipment;
    const FIELDS: &'static [FieldSpec] = &[
        text("equipmentId", "Equipment ID"),
        text("name", "Name"),
        select("type", "Type", &["Electrical", "Mechanical", "Hydraulic"]),
        select("status", "Status", &["Available", "Unavailable"]),
        staff("assignedStaff", "Assigned Staff", DEFAULT_EQUIPMENT_STAFF),
    ];
    const COLUMNS: &'static [usize] = &[0, 1, 2, 3, 4];

    fn key(&self) -> &str {
        &self.equipment_id
    }

    fn values(&self) -> Vec<&str> {
        vec![
            self.equipment_id.as_str(),
            self.name.as_str(),
            self.equipment_type.as_str(),
            self.status.as_str(),
            self.assigned_staff.as_str(),
        ]
    }

    fn from_values(values: &[String]) -> Self {
        Self {
            equipment_id: value_at(values, 0),
            name: value_at(values, 1),
            equipment_type: value_at(values, 2),
            status: value_at(values, 3),
            assigned_staff: value_at(values, 4),
        }
    }

    fn wrap(operation: Operation<Self>) -> Intent {
        Intent::Equipment(operation)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub designation: String,
    pub gender: String,
    pub contact_no: String,
    pub email: String,
    pub role: String,
}

impl Staff {
    /// "First Last", as offered by staff-assignment fields.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

impl Entity for Staff {
    const KIND: EntityKind = EntityKind::Staff;
    const FIELDS: &'static [FieldSpec] = &[
        text("id", "Staff ID"),
        text("firstName", "First Name"),
        text("lastName", "Last Name"),
        text("designation", "Designation"),
        select("gender", "Gender", &["Male", "Female", "Other"]),
        text("contactNo", "Contact No"),
        text("email", "Email"),
        select("role", "Role", &["Manager", "Administrative", "Scientist", "Labour", "Other"]),
    ];
    const COLUMNS: &'static [usize] = &[0, 1, 2, 7];

    fn key(&self) -> &str {
        &self.id
    }

    fn values(&self) -> Vec<&str> {
        vec![
            self.id.as_str(),
            self.first_name.as_str(),
            self.last_name.as_str(),
            self.designation.as_str(),
            self.gender.as_str(),
            self.contact_no.as_str(),
            self.email.as_str(),
            self.role.as_str(),
        ]
    }

    fn from_values(values: &[String]) -> Self {
        Self {
            id: value_at(values, 0),
            first_name: value_at(values, 1),
            last_name: value_at(values, 2),
            designation: value_at(values, 3),
            gender: value_at(values, 4),
            contact_no: value_at(values, 5),
            email: value_at(values, 6),
            role: value_at(values, 7),
        }
    }

    fn wrap(operation: Operation<Self>) -> Intent {
        Intent::Staff(operation)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub field_code: String,
    pub field_name: String,
    pub location: String,
    pub extent_size: String,
}

impl Entity for Field {
    const KIND: EntityKind = EntityKind::Field;
    const FIELDS: &'static [FieldSpec] = &[
        text("fieldCode", "Field Code"),
        text("fieldName", "Field Name"),
        text("location", "Location"),
        text("extentSize", "Extent Size"),
    ];
    const COLUMNS: &'static [usize] = &[0, 1, 2, 3];

    fn key(&self) -> &str {
        &self.field_code
    }

    fn values(&self) -> Vec<&str> {
        vec![self.field_code.as_str(), self.field_name.as_str(), self.location.as_str(), self.extent_size.as_str()]
    }

    fn from_values(values: &[String]) -> Self {
        Self {
            field_code: value_at(values, 0),
            field_name: value_at(values, 1),
            location: value_at(values, 2),
            extent_size: value_at(values, 3),
        }
    }

    fn wrap(operation: Operation<Self>) -> Intent {
        Intent::Field(operation)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Crop {
    pub crop_code: String,
    pub common_name: String,
    pub scientific_name: String,
    pub category: String,
    pub season: String,
    pub field_code: String,
}

impl Entity for Crop {
    const KIND: EntityKind = EntityKind::Crop;
    const FIELDS: &'static [FieldSpec] = &[
        text("cropCode", "Crop Code"),
        text("commonName", "Common Name"),
        text("scientificName", "Scientific Name"),
        select("category", "Category", &["Cereal", "Vegetable", "Fruit", "Pulse"]),
        select("season", "Season", &["Yala", "Maha"]),
        text("fieldCode", "Field Code"),
    ];
    const COLUMNS: &'static [usize] = &[0, 1, 3, 4];

    fn key(&self) -> &str {
        &self.crop_code
    }

    fn values(&self) -> Vec<&str> {
        vec![
            self.crop_code.as_str(),
            self.common_name.as_str(),
            self.scientific_name.as_str(),
            self.category.as_str(),
            self.season.as_str(),
            self.field_code.as_str(),
        ]
    }

    fn from_values(values: &[String]) -> Self {
        Self {
            crop_code: value_at(values, 0),
            common_name: value_at(values, 1),
            scientific_name: value_at(values, 2),
            category: value_at(values, 3),
            season: value_at(values, 4),
            field_code: value_at(values, 5),
        }
    }

    fn wrap(operation: Operation<Self>) -> Intent {
        Intent::Crop(operation)
    }
}
