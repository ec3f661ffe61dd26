//! Root state aggregator.
//!
//! Owns one collection per entity kind, routes intents to them, and tells
//! subscribers when a dispatch has gone through. Subscribers receive no
//! payload; they read the new state through [`RootStore::get_snapshot`] or a
//! [`SnapshotHandle`].

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use crate::domain::{Collection, Entity, Intent, Operation, RawIntent, StoreResult};

use super::snapshot::Snapshot;
use super::store::{reduce, Change, KeyPolicy};

/// A callback run after every successful dispatch.
pub type Listener = Box<dyn FnMut()>;

/// Token returned by [`RootStore::subscribe`]; pass it to
/// [`RootStore::unsubscribe`] to stop notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreConfig {
    pub key_policy: KeyPolicy,
}

/// Read-only view of the store's current snapshot that can be moved into a
/// listener.
#[derive(Debug, Clone)]
pub struct SnapshotHandle {
    current: Rc<RefCell<Arc<Snapshot>>>,
}

impl SnapshotHandle {
    pub fn get(&self) -> Arc<Snapshot> {
        Arc::clone(&*self.current.borrow())
    }
}

/// The single state container for a console session.
///
/// # Examples
///
/// ```
/// use farmdesk::application::{RootStore, StoreConfig};
/// use farmdesk::domain::{Entity, Intent, Operation, Vehicle};
///
/// let mut store = RootStore::create(StoreConfig::default());
/// let vehicle = Vehicle::from_values(&["V1".to_string()]);
/// store.dispatch(Intent::Vehicle(Operation::Add(vehicle))).unwrap();
/// assert_eq!(store.get_snapshot().vehicle.len(), 1);
/// store.dispose();
/// ```
pub struct RootStore {
    current: Rc<RefCell<Arc<Snapshot>>>,
    listeners: Vec<(Subscription, Listener)>,
    next_subscription: u64,
    config: StoreConfig,
}

impl std::fmt::Debug for RootStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RootStore")
            .field("snapshot", &self.current.borrow())
            .field("listeners", &self.listeners.len())
            .field("config", &self.config)
            .finish()
    }
}

impl RootStore {
    /// Creates a store with every collection empty and no subscribers.
    pub fn create(config: StoreConfig) -> Self {
        tracing::debug!(?config, "root store created");
        Self {
            current: Rc::new(RefCell::new(Arc::new(Snapshot::default()))),
            listeners: Vec::new(),
            next_subscription: 0,
            config,
        }
    }

    pub fn config(&self) -> StoreConfig {
        self.config
    }

    /// Routes `intent` to its collection and notifies every subscriber.
    ///
    /// A delete or update that matches nothing still succeeds and still
    /// notifies; the snapshot keeps its reference and the result is
    /// [`Change::NoMatch`]. On error nothing changes and nobody is notified.
    pub fn dispatch(&mut self, intent: Intent) -> StoreResult<Change> {
        let kind = intent.kind();
        let operation = intent.operation_name();

        let result = match intent {
            Intent::Vehicle(op) => self.apply(op, |s| &mut s.vehicle),
            Intent::Equipment(op) => self.apply(op, |s| &mut s.equipment),
            Intent::Staff(op) => self.apply(op, |s| &mut s.staff),
            Intent::Field(op) => self.apply(op, |s| &mut s.field),
            Intent::Crop(op) => self.apply(op, |s| &mut s.crop),
        };

        match result {
            Ok(change) => {
                tracing::debug!(%kind, operation, ?change, "dispatched");
                self.notify();
                Ok(change)
            }
            Err(err) => {
                tracing::warn!(%kind, operation, error = %err, "intent rejected");
                Err(err)
            }
        }
    }

    /// Converts an untyped intent and dispatches it. Unknown kinds,
    /// unknown operations and malformed payloads are rejected before
    /// anything is routed.
    pub fn dispatch_raw(&mut self, raw: RawIntent) -> StoreResult<Change> {
        let intent = Intent::try_from(raw).inspect_err(|err| {
            tracing::warn!(error = %err, "raw intent rejected");
        })?;
        self.dispatch(intent)
    }

    /// The current state tree. Pointer-equal across calls until a dispatch
    /// changes a collection.
    pub fn get_snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&*self.current.borrow())
    }

    pub fn snapshot_handle(&self) -> SnapshotHandle {
        SnapshotHandle {
            current: Rc::clone(&self.current),
        }
    }

    /// Registers `listener`. Listeners run in registration order.
    pub fn subscribe<F>(&mut self, listener: F) -> Subscription
    where
        F: FnMut() + 'static,
    {
        let subscription = Subscription(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((subscription, Box::new(listener)));
        subscription
    }

    /// Removes a listener. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(id, _)| *id != subscription);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Ends the session. All state and listeners are dropped.
    pub fn dispose(mut self) {
        tracing::debug!(listeners = self.listeners.len(), "root store disposed");
        self.listeners.clear();
    }

    fn apply<T: Entity>(
        &mut self,
        operation: Operation<T>,
        slot: fn(&mut Snapshot) -> &mut Collection<T>,
    ) -> StoreResult<Change> {
        let mut next = Snapshot::clone(&self.current.borrow());
        let collection = slot(&mut next);
        let (updated, change) = reduce(collection, operation, self.config.key_policy)?;

        if change == Change::Applied {
            *collection = updated;
            *self.current.borrow_mut() = Arc::new(next);
        }
        Ok(change)
    }

    fn notify(&mut self) {
        for (_, listener) in self.listeners.iter_mut() {
            listener();
        }
    }
}

/// A listener that writes the whole snapshot as JSON to the debug log.
pub fn log_snapshot(handle: SnapshotHandle) -> impl FnMut() + 'static {
    move || {
        let snapshot = handle.get();
        match serde_json::to_string(&*snapshot) {
            Ok(json) => tracing::debug!(state = %json, "updated store state"),
            Err(err) => tracing::warn!(error = %err, "could not serialize store state"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EntityKind, StoreError, Vehicle};
    use serde_json::json;
    use std::cell::Cell;

    fn vehicle(code: &str, plate: &str) -> Vehicle {
        Vehicle {
            vehicle_code: code.to_string(),
            license_plate: plate.to_string(),
            vehicle_category: "Tractor".to_string(),
            fuel_type: "Diesel".to_string(),
            status: "Available".to_string(),
            allocated_staff: "John Doe".to_string(),
        }
    }

    fn add(v: Vehicle) -> Intent {
        Intent::Vehicle(Operation::Add(v))
    }

    fn codes(store: &RootStore) -> Vec<String> {
        store
            .get_snapshot()
            .vehicle
            .iter()
            .map(|v| v.vehicle_code.clone())
            .collect()
    }

    #[test]
    fn test_create_starts_empty() {
        let store = RootStore::create(StoreConfig::default());
        assert_eq!(*store.get_snapshot(), Snapshot::default());
        assert_eq!(store.listener_count(), 0);
    }

    #[test]
    fn test_add_then_delete_vehicle() {
        let mut store = RootStore::create(StoreConfig::default());

        store.dispatch(add(vehicle("V1", "ABC-1"))).unwrap();
        assert_eq!(codes(&store), vec!["V1"]);
        assert_eq!(store.get_snapshot().vehicle.get(0).unwrap().license_plate, "ABC-1");

        let change = store.dispatch(Intent::delete(EntityKind::Vehicle, "V1")).unwrap();
        assert_eq!(change, Change::Applied);
        assert!(store.get_snapshot().vehicle.is_empty());
    }

    #[test]
    fn test_update_replaces_at_same_position() {
        let mut store = RootStore::create(StoreConfig::default());
        store.dispatch(add(vehicle("V1", "ABC-1"))).unwrap();
        store.dispatch(add(vehicle("V2", "ABC-2"))).unwrap();

        store
            .dispatch(Intent::Vehicle(Operation::Update {
                key: "V1".to_string(),
                record: vehicle("V1", "NEW-1"),
            }))
            .unwrap();

        let snapshot = store.get_snapshot();
        assert_eq!(snapshot.vehicle.get(0), Some(&vehicle("V1", "NEW-1")));
        assert_eq!(snapshot.vehicle.get(1), Some(&vehicle("V2", "ABC-2")));
    }

    #[test]
    fn test_update_missing_key_is_silent_no_op() {
        let mut store = RootStore::create(StoreConfig::default());
        store.dispatch(add(vehicle("V1", "ABC-1"))).unwrap();
        let before = store.get_snapshot();

        let change = store
            .dispatch(Intent::Vehicle(Operation::Update {
                key: "V9".to_string(),
                record: vehicle("V9", "X"),
            }))
            .unwrap();

        assert_eq!(change, Change::NoMatch);
        assert!(Arc::ptr_eq(&before, &store.get_snapshot()));
    }

    #[test]
    fn test_snapshot_is_stable_without_dispatch() {
        let mut store = RootStore::create(StoreConfig::default());
        store.dispatch(add(vehicle("V1", "ABC-1"))).unwrap();

        let first = store.get_snapshot();
        let second = store.get_snapshot();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_dispatch_only_replaces_target_collection() {
        let mut store = RootStore::create(StoreConfig::default());
        let before = store.get_snapshot();

        store.dispatch(add(vehicle("V1", "ABC-1"))).unwrap();

        let after = store.get_snapshot();
        assert!(!Arc::ptr_eq(&before, &after));
        assert!(!after.vehicle.ptr_eq(&before.vehicle));
        assert!(after.staff.ptr_eq(&before.staff));
        assert!(after.crop.ptr_eq(&before.crop));
        assert!(before.vehicle.is_empty());
    }

    #[test]
    fn test_listeners_run_in_registration_order() {
        let mut store = RootStore::create(StoreConfig::default());
        let calls = Rc::new(RefCell::new(Vec::new()));

        for name in ["first", "second", "third"] {
            let calls = Rc::clone(&calls);
            store.subscribe(move || calls.borrow_mut().push(name));
        }

        store.dispatch(add(vehicle("V1", "ABC-1"))).unwrap();
        assert_eq!(*calls.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_listeners_notified_on_no_op() {
        let mut store = RootStore::create(StoreConfig::default());
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        store.subscribe(move || counter.set(counter.get() + 1));

        store.dispatch(Intent::delete(EntityKind::Crop, "C1")).unwrap();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let mut store = RootStore::create(StoreConfig::default());
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        let subscription = store.subscribe(move || counter.set(counter.get() + 1));

        store.dispatch(add(vehicle("V1", "ABC-1"))).unwrap();
        assert!(store.unsubscribe(subscription));
        assert!(!store.unsubscribe(subscription));
        store.dispatch(add(vehicle("V2", "ABC-2"))).unwrap();

        assert_eq!(count.get(), 1);
        assert_eq!(store.listener_count(), 0);
    }

    #[test]
    fn test_listener_reads_new_snapshot_through_handle() {
        let mut store = RootStore::create(StoreConfig::default());
        let handle = store.snapshot_handle();
        let seen = Rc::new(Cell::new(0));
        let sink = Rc::clone(&seen);
        store.subscribe(move || sink.set(handle.get().vehicle.len()));

        store.dispatch(add(vehicle("V1", "ABC-1"))).unwrap();
        store.dispatch(add(vehicle("V2", "ABC-2"))).unwrap();
        assert_eq!(seen.get(), 2);
    }

    #[test]
    fn test_raw_dispatch_rejects_unknown_intent_without_notifying() {
        let mut store = RootStore::create(StoreConfig::default());
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        store.subscribe(move || counter.set(counter.get() + 1));

        let err = store
            .dispatch_raw(RawIntent {
                entity_kind: "livestock".to_string(),
                operation: "add".to_string(),
                payload: json!({}),
            })
            .unwrap_err();

        assert!(matches!(err, StoreError::UnknownIntent { .. }));
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_raw_dispatch_routes_valid_intent() {
        let mut store = RootStore::create(StoreConfig::default());
        store
            .dispatch_raw(RawIntent {
                entity_kind: "field".to_string(),
                operation: "add".to_string(),
                payload: json!({"fieldCode": "F1", "fieldName": "North", "location": "Matale", "extentSize": "3"}),
            })
            .unwrap();
        assert_eq!(store.get_snapshot().field.len(), 1);
    }

    #[test]
    fn test_unique_policy_rejects_duplicate_without_change() {
        let mut store = RootStore::create(StoreConfig {
            key_policy: KeyPolicy::Unique,
        });
        store.dispatch(add(vehicle("V1", "ABC-1"))).unwrap();
        let before = store.get_snapshot();

        let err = store.dispatch(add(vehicle("V1", "DUP"))).unwrap_err();

        assert!(matches!(err, StoreError::DuplicateKey { .. }));
        assert!(Arc::ptr_eq(&before, &store.get_snapshot()));
    }

    #[test]
    fn test_log_snapshot_listener_runs() {
        let mut store = RootStore::create(StoreConfig::default());
        let listener = log_snapshot(store.snapshot_handle());
        store.subscribe(listener);
        store.dispatch(add(vehicle("V1", "ABC-1"))).unwrap();
        store.dispose();
    }
}
