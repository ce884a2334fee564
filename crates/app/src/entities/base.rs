//! Behaviour common to every entity kind.

use std::sync::Arc;

use tokio::task::JoinHandle;

use tuyable_domain::datapoint::{DatapointId, DatapointType, DatapointValue};
use tuyable_domain::device::DeviceInfo;
use tuyable_domain::entity::{self, Availability, EntityMeta};

use crate::error::EntityError;
use crate::ports::DeviceTransport;

use super::DeviceContext;

/// Identity, availability and write path of one entity.
pub struct BleEntity<T> {
    context: Arc<DeviceContext<T>>,
    meta: EntityMeta,
    availability: Availability,
    unique_id: String,
}

impl<T: DeviceTransport + 'static> BleEntity<T> {
    pub(crate) fn new(
        context: Arc<DeviceContext<T>>,
        meta: EntityMeta,
        availability: Availability,
    ) -> Self {
        let unique_id = entity::unique_id(&context.device().device_id, meta.key);
        Self {
            context,
            meta,
            availability,
            unique_id,
        }
    }

    /// Stable id, `"{device_id}-{key}"`.
    #[must_use]
    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    #[must_use]
    pub fn meta(&self) -> &EntityMeta {
        &self.meta
    }

    #[must_use]
    pub fn device_info(&self) -> &DeviceInfo {
        self.context.device_info()
    }

    #[must_use]
    pub fn context(&self) -> &DeviceContext<T> {
        &self.context
    }

    /// Connected, and the descriptor's availability rule holds.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.context.is_connected()
            && self
                .availability
                .evaluate(self.context.product(), |id| self.context.value_of(id))
    }

    /// Write `value` as a `dp_type` datapoint, creating the cell if needed.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError::Coercion`] when `value` cannot be expressed as
    /// `dp_type`. Failures of the write itself are only logged.
    pub fn send_value(
        &self,
        dp_id: DatapointId,
        dp_type: DatapointType,
        value: DatapointValue,
    ) -> Result<JoinHandle<()>, EntityError> {
        let value = value.coerce(dp_type)?;
        self.context.transport().get_or_create(dp_id, value.clone());
        Ok(self.write(dp_id, value))
    }

    /// Spawn the write; the caller may drop the handle.
    pub(crate) fn write(&self, dp_id: DatapointId, value: DatapointValue) -> JoinHandle<()> {
        let transport = Arc::clone(self.context.transport());
        let unique_id = self.unique_id.clone();
        tracing::debug!(entity = %unique_id, %dp_id, ?value, "writing datapoint");
        tokio::spawn(async move {
            if let Err(err) = transport.set_value(dp_id, value).await {
                tracing::warn!(%err, entity = %unique_id, %dp_id, "datapoint write failed");
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::watch;

    use tuyable_domain::catalog;

    use crate::test_support::{FakeTransport, device};

    fn entity(
        transport: FakeTransport,
        connected: bool,
        availability: Availability,
    ) -> (BleEntity<FakeTransport>, Arc<FakeTransport>) {
        let transport = Arc::new(transport);
        let (_, connection) = watch::channel(connected);
        let device = device("co2bj", "59s19z5m");
        let product = catalog::product_info("co2bj", "59s19z5m");
        let context = DeviceContext::new(device, product, Arc::clone(&transport), connection);
        let entity = BleEntity::new(Arc::new(context), EntityMeta::new("carbon_dioxide_alarm"), availability);
        (entity, transport)
    }

    #[test]
    fn should_derive_unique_id_from_device_and_key() {
        let (entity, _) = entity(FakeTransport::default(), true, Availability::Always);
        assert_eq!(entity.unique_id(), "bf1234-carbon_dioxide_alarm");
        assert_eq!(entity.device_info().name, "CO2 Detector 5B0EDF");
    }

    #[test]
    fn should_be_unavailable_while_disconnected() {
        let (entity, _) = entity(FakeTransport::default(), false, Availability::Always);
        assert!(!entity.is_available());
    }

    #[test]
    fn should_apply_availability_rule_when_connected() {
        let transport = FakeTransport::default().with(13, DatapointValue::Bool(false));
        let (entity, _) = entity(transport, true, Availability::Co2AlarmEnabled);
        assert!(!entity.is_available());
    }

    #[tokio::test]
    async fn should_create_cell_and_write_generic_value() {
        let (entity, transport) = entity(FakeTransport::default(), true, Availability::Always);

        entity
            .send_value(DatapointId::new(101), DatapointType::Enum, DatapointValue::Value(1))
            .unwrap()
            .await
            .unwrap();

        assert_eq!(
            transport.writes(),
            [(DatapointId::new(101), DatapointValue::Enum(1))]
        );
        assert!(transport.has_id(DatapointId::new(101), Some(DatapointType::Enum)));
    }

    #[tokio::test]
    async fn should_reject_value_that_does_not_fit_type() {
        let (entity, transport) = entity(FakeTransport::default(), true, Availability::Always);

        let result = entity.send_value(
            DatapointId::new(101),
            DatapointType::Bool,
            DatapointValue::String("on".to_owned()),
        );

        assert!(matches!(result, Err(EntityError::Coercion(_))));
        assert!(transport.writes().is_empty());
    }

    #[tokio::test]
    async fn should_swallow_failed_writes() {
        let transport = FakeTransport::default().with(7, DatapointValue::Raw(vec![1]));
        let (entity, transport) = entity(transport, true, Availability::Always);

        let handle = entity.write(DatapointId::new(7), DatapointValue::Enum(2));

        assert!(handle.await.is_ok());
        assert_eq!(transport.writes().len(), 1);
    }
}
