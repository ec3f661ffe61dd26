//! Example records for trying the console out. They go through ordinary
//! Add intents, so subscribers see them like any other change.

use crate::domain::{Crop, Entity, Equipment, Field, Staff, StoreResult, Vehicle};

use super::aggregator::RootStore;

fn record<T: Entity>(values: &[&str]) -> T {
    let values: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    T::from_values(&values)
}

pub fn seed_demo(store: &mut RootStore) -> StoreResult<()> {
    use crate::domain::Operation::Add;

    let staff: [Staff; 3] = [
        record(&["S001", "John", "Doe", "Field Supervisor", "Male", "0771234567", "john@farm.lk", "Manager"]),
        record(&["S002", "Jane", "Smith", "Agronomist", "Female", "0712345678", "jane@farm.lk", "Scientist"]),
        record(&["S003", "Alice", "Johnson", "Driver", "Female", "0759876543", "alice@farm.lk", "Labour"]),
    ];
    for member in staff {
        store.dispatch(Staff::wrap(Add(member)))?;
    }

    let vehicles: [Vehicle; 2] = [
        record(&["V001", "WP-CAB-1234", "Tractor", "Diesel", "Available", "John Doe"]),
        record(&["V002", "CP-LK-5678", "Pickup", "Petrol", "Out of Service", "Alice Johnson"]),
    ];
    for vehicle in vehicles {
        store.dispatch(Vehicle::wrap(Add(vehicle)))?;
    }

    let equipment: [Equipment; 2] = [
        record(&["E001", "Water Pump", "Hydraulic", "Available", "Jane Smith"]),
        record(&["E002", "Seed Drill", "Mechanical", "Unavailable", "John Doe"]),
    ];
    for item in equipment {
        store.dispatch(Equipment::wrap(Add(item)))?;
    }

    let fields: [Field; 2] = [
        record(&["F001", "North Paddy", "Polonnaruwa", "4.5"]),
        record(&["F002", "Hill Plot", "Nuwara Eliya", "1.2"]),
    ];
    for field in fields {
        store.dispatch(Field::wrap(Add(field)))?;
    }

    let crops: [Crop; 2] = [
        record(&["C001", "Rice", "Oryza sativa", "Cereal", "Maha", "F001"]),
        record(&["C002", "Carrot", "Daucus carota", "Vegetable", "Yala", "F002"]),
    ];
    for crop in crops {
        store.dispatch(Crop::wrap(Add(crop)))?;
    }

    tracing::info!("demo records loaded");
    Ok(())
}
