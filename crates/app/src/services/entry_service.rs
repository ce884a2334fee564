//! Entry service — registers devices and wires their coordinator and entities.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tuyable_domain::catalog;
use tuyable_domain::device::DeviceIdentity;
use tuyable_domain::id::EntryId;

use crate::coordinator::Coordinator;
use crate::entities::{DeviceContext, Entities};
use crate::ports::{DeviceTransport, EventPublisher};

/// One registered device: its coordinator, shared context and entities.
pub struct Entry<T, P> {
    id: EntryId,
    coordinator: Coordinator<P>,
    context: Arc<DeviceContext<T>>,
    entities: Entities<T>,
}

impl<T: DeviceTransport, P> Entry<T, P> {
    #[must_use]
    pub fn id(&self) -> EntryId {
        self.id
    }

    /// Display name of the entry, e.g. `"Fingerbot Plus 5B0EDF"`.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.context.device_info().name
    }

    #[must_use]
    pub fn coordinator(&self) -> &Coordinator<P> {
        &self.coordinator
    }

    #[must_use]
    pub fn context(&self) -> &Arc<DeviceContext<T>> {
        &self.context
    }

    #[must_use]
    pub fn entities(&self) -> &Entities<T> {
        &self.entities
    }
}

/// Application service managing the set of registered entries.
pub struct EntryService<T, P> {
    publisher: P,
    disconnect_delay: Duration,
    entries: Mutex<HashMap<EntryId, Arc<Entry<T, P>>>>,
}

impl<T, P> EntryService<T, P>
where
    T: DeviceTransport + 'static,
    P: EventPublisher + Clone + Send + Sync + 'static,
{
    /// Create a service whose coordinators publish to `publisher`.
    #[must_use]
    pub fn new(publisher: P, disconnect_delay: Duration) -> Self {
        Self {
            publisher,
            disconnect_delay,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Register a device: start its coordinator and create its entities.
    #[tracing::instrument(skip(self, device, transport), fields(address = %device.address))]
    pub fn setup_entry(&self, device: DeviceIdentity, transport: Arc<T>) -> Arc<Entry<T, P>> {
        let product = catalog::product_info(&device.category, &device.product_id);
        if product.is_none() {
            tracing::warn!(
                category = %device.category,
                product_id = %device.product_id,
                "product not in catalog, only signal strength is exposed"
            );
        }

        let coordinator = Coordinator::new(
            device.clone(),
            product,
            self.publisher.clone(),
            self.disconnect_delay,
        );
        coordinator.start(transport.as_ref());

        let context = Arc::new(DeviceContext::new(
            device,
            product,
            transport,
            coordinator.connection(),
        ));
        let entities = Entities::setup(&context);
        tracing::info!(
            name = %context.device_info().name,
            buttons = entities.buttons.len(),
            selects = entities.selects.len(),
            sensors = entities.sensors.len(),
            "entry set up"
        );

        let entry = Arc::new(Entry {
            id: EntryId::new(),
            coordinator,
            context,
            entities,
        });
        self.lock_entries().insert(entry.id, Arc::clone(&entry));
        entry
    }

    #[must_use]
    pub fn get(&self, id: EntryId) -> Option<Arc<Entry<T, P>>> {
        self.lock_entries().get(&id).cloned()
    }

    /// All registered entries, in no particular order.
    #[must_use]
    pub fn entries(&self) -> Vec<Arc<Entry<T, P>>> {
        self.lock_entries().values().cloned().collect()
    }

    /// Stop the entry's coordinator and forget it. Returns `false` for
    /// unknown ids.
    #[tracing::instrument(skip(self))]
    pub fn unload_entry(&self, id: EntryId) -> bool {
        let Some(entry) = self.lock_entries().remove(&id) else {
            return false;
        };
        entry.coordinator.shutdown();
        tracing::info!(address = %entry.context.device().address, "entry unloaded");
        true
    }

    /// Unload every entry.
    pub fn shutdown(&self) {
        let entries: Vec<_> = self.lock_entries().drain().map(|(_, entry)| entry).collect();
        for entry in entries {
            entry.coordinator.shutdown();
        }
    }

    fn lock_entries(&self) -> MutexGuard<'_, HashMap<EntryId, Arc<Entry<T, P>>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
