use std::path::Path;

use crate::application::Snapshot;
use crate::domain::{Collection, Entity, EntityKind, ExportError};

/// Writes one page's records to a CSV file: a header row of attribute
/// names, then one row per record in insertion order.
pub struct CsvExporter;

impl CsvExporter {
    pub fn export_page(snapshot: &Snapshot, kind: EntityKind, filename: &str) -> Result<String, ExportError> {
        match kind {
            EntityKind::Vehicle => Self::export_collection(&snapshot.vehicle, filename),
            EntityKind::Equipment => Self::export_collection(&snapshot.equipment, filename),
            EntityKind::Staff => Self::export_collection(&snapshot.staff, filename),
            EntityKind::Field => Self::export_collection(&snapshot.field, filename),
            EntityKind::Crop => Self::export_collection(&snapshot.crop, filename),
        }
    }

    pub fn export_collection<T: Entity>(collection: &Collection<T>, filename: &str) -> Result<String, ExportError> {
        let mut writer = csv::Writer::from_path(Path::new(filename))?;

        // serialize() only emits headers alongside the first record
        if collection.is_empty() {
            writer.write_record(T::FIELDS.iter().map(|spec| spec.name))?;
        }
        for record in collection {
            writer.serialize(record)?;
        }
        writer.flush()?;

        tracing::info!(kind = %T::KIND, rows = collection.len(), filename, "exported csv");
        Ok(filename.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Equipment;
    use tempfile::tempdir;

    fn equipment(id: &str, name: &str) -> Equipment {
        Equipment {
            equipment_id: id.to_string(),
            name: name.to_string(),
            equipment_type: "Mechanical".to_string(),
            status: "Available".to_string(),
            assigned_staff: "Bob Brown".to_string(),
        }
    }

    #[test]
    fn test_export_writes_header_and_rows_in_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("equipment.csv");
        let filename = path.to_str().unwrap();
        let snapshot = Snapshot {
            equipment: Collection::default()
                .add(equipment("E1", "Plough"))
                .add(equipment("E2", "Harrow, disc")),
            ..Snapshot::default()
        };

        let written = CsvExporter::export_page(&snapshot, EntityKind::Equipment, filename).unwrap();
        assert_eq!(written, filename);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "equipmentId,name,type,status,assignedStaff");
        assert_eq!(lines[1], "E1,Plough,Mechanical,Available,Bob Brown");
        assert_eq!(lines[2], "E2,\"Harrow, disc\",Mechanical,Available,Bob Brown");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_export_empty_page_writes_header_only() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("field.csv");

        CsvExporter::export_page(&Snapshot::default(), EntityKind::Field, path.to_str().unwrap()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim_end(), "fieldCode,fieldName,location,extentSize");
    }

    #[test]
    fn test_export_to_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("out.csv");

        let result = CsvExporter::export_page(&Snapshot::default(), EntityKind::Crop, path.to_str().unwrap());
        assert!(result.is_err());
    }
}
