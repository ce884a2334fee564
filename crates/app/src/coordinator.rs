//! Update coordinator — the debounced connection state of one device.
//!
//! BLE links drop and come back constantly, so a disconnect only takes effect
//! after [`DEFAULT_DISCONNECT_DELAY`] (configurable) without a reconnect or an
//! update in between. Entities read the resulting state through
//! [`Coordinator::connection`]; hosts subscribe to [`CoordinatorEvent`]s.
//!
//! For fingerbots with a manual-control datapoint, a device-originated change
//! of the switch datapoint means someone pressed the physical button; that is
//! published as a `fingerbot_button_pressed` event.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio_stream::StreamExt as _;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

use tuyable_domain::datapoint::{Datapoint, DatapointId};
use tuyable_domain::device::DeviceIdentity;
use tuyable_domain::event::Event;
use tuyable_domain::product::ProductInfo;

use crate::ports::{DeviceTransport, EventPublisher, TransportEvent};

/// Time a device may stay disconnected before its entities become unavailable.
pub const DEFAULT_DISCONNECT_DELAY: Duration = Duration::from_secs(600);

const LISTENER_CAPACITY: usize = 64;

/// Notification sent to coordinator subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordinatorEvent {
    ConnectionChanged { connected: bool },
    /// Datapoints touched by an update batch.
    Updated(Vec<DatapointId>),
}

/// Debounced connection state and update fan-out for one device.
///
/// Cheap to clone; clones share the same state.
pub struct Coordinator<P> {
    inner: Arc<Inner<P>>,
}

impl<P> Clone for Coordinator<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<P> {
    device: DeviceIdentity,
    product: Option<&'static ProductInfo>,
    publisher: P,
    disconnect_delay: Duration,
    connected: watch::Sender<bool>,
    listeners: broadcast::Sender<CoordinatorEvent>,
    tasks: Mutex<Tasks>,
}

#[derive(Default)]
struct Tasks {
    /// Bumped by every connect; a disconnect timer only fires for the
    /// generation it was started in.
    generation: u64,
    disconnect_timer: Option<JoinHandle<()>>,
    listener: Option<JoinHandle<()>>,
}

impl Tasks {
    fn cancel_disconnect_timer(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if let Some(timer) = self.disconnect_timer.take() {
            timer.abort();
        }
    }
}

impl<P: EventPublisher + Send + Sync + 'static> Coordinator<P> {
    /// Create a coordinator in the disconnected state.
    #[must_use]
    pub fn new(
        device: DeviceIdentity,
        product: Option<&'static ProductInfo>,
        publisher: P,
        disconnect_delay: Duration,
    ) -> Self {
        let (connected, _) = watch::channel(false);
        let (listeners, _) = broadcast::channel(LISTENER_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                device,
                product,
                publisher,
                disconnect_delay,
                connected,
                listeners,
                tasks: Mutex::new(Tasks::default()),
            }),
        }
    }

    #[must_use]
    pub fn device(&self) -> &DeviceIdentity {
        &self.inner.device
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        *self.inner.connected.borrow()
    }

    /// Watch the debounced connection state.
    #[must_use]
    pub fn connection(&self) -> watch::Receiver<bool> {
        self.inner.connected.subscribe()
    }

    /// Receive coordinator notifications published after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CoordinatorEvent> {
        self.inner.listeners.subscribe()
    }

    /// The device link is up: drop any pending disconnect.
    pub async fn handle_connect(&self) {
        let became_connected = {
            let mut tasks = self.inner.lock_tasks();
            tasks.cancel_disconnect_timer();
            let changed = self.inner.connected.send_if_modified(|connected| {
                let changed = !*connected;
                *connected = true;
                changed
            });
            if changed {
                self.inner.notify_listeners(true);
            }
            changed
        };

        if became_connected {
            tracing::info!(address = %self.inner.device.address, "device connected");
            self.inner.publish_connection(true).await;
        }
    }

    /// The device link dropped: mark the device disconnected once the delay
    /// passes, unless a timer is already running.
    pub fn handle_disconnect(&self) {
        let mut tasks = self.inner.lock_tasks();
        if tasks.disconnect_timer.is_some() {
            return;
        }

        tracing::debug!(
            address = %self.inner.device.address,
            delay_secs = self.inner.disconnect_delay.as_secs(),
            "device link lost, waiting before marking disconnected"
        );
        let generation = tasks.generation;
        let inner = Arc::clone(&self.inner);
        tasks.disconnect_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(inner.disconnect_delay).await;
            inner.expire(generation).await;
        }));
    }

    /// A batch of datapoints arrived; an update implies the link is up.
    pub async fn handle_update(&self, updates: &[Datapoint]) {
        self.handle_connect().await;

        let ids = updates.iter().map(|update| update.id).collect();
        let _ = self.inner.listeners.send(CoordinatorEvent::Updated(ids));

        let Some(fingerbot) = self.inner.product.and_then(ProductInfo::manual_fingerbot) else {
            return;
        };
        let presses = updates
            .iter()
            .filter(|update| update.id == fingerbot.switch && update.changed_by_device)
            .count();
        for _ in 0..presses {
            tracing::debug!(address = %self.inner.device.address, "fingerbot button pressed");
            let event =
                Event::fingerbot_button_pressed(&self.inner.device.address, &self.inner.device.device_id);
            self.inner.publish(event).await;
        }
    }

    /// Feed transport events into the coordinator until the transport closes
    /// or [`shutdown`](Self::shutdown) is called.
    pub fn start<T: DeviceTransport>(&self, transport: &T) {
        let mut events = BroadcastStream::new(transport.subscribe());
        let coordinator = self.clone();
        let listener = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                match event {
                    Ok(TransportEvent::Connected) => coordinator.handle_connect().await,
                    Ok(TransportEvent::Disconnected) => coordinator.handle_disconnect(),
                    Ok(TransportEvent::Updated(updates)) => {
                        coordinator.handle_update(&updates).await;
                    }
                    Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                        tracing::warn!(
                            address = %coordinator.inner.device.address,
                            skipped,
                            "coordinator fell behind transport events"
                        );
                    }
                }
            }
            tracing::debug!(address = %coordinator.inner.device.address, "transport closed");
        });

        if let Some(previous) = self.inner.lock_tasks().listener.replace(listener) {
            previous.abort();
        }
    }

    /// Stop listening to the transport and drop any pending disconnect.
    pub fn shutdown(&self) {
        let mut tasks = self.inner.lock_tasks();
        tasks.cancel_disconnect_timer();
        if let Some(listener) = tasks.listener.take() {
            listener.abort();
        }
    }
}

impl<P: EventPublisher + Send + Sync + 'static> Inner<P> {
    fn lock_tasks(&self) -> MutexGuard<'_, Tasks> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(test)]
    fn has_pending_disconnect(&self) -> bool {
        self.lock_tasks().disconnect_timer.is_some()
    }

    async fn expire(&self, generation: u64) {
        {
            let mut tasks = self.lock_tasks();
            if tasks.generation != generation {
                return;
            }
            tasks.disconnect_timer = None;
            self.connected.send_replace(false);
            self.notify_listeners(false);
        }

        tracing::info!(address = %self.device.address, "device disconnected");
        self.publish_connection(false).await;
    }

    /// Must be called with the tasks lock held so listeners see transitions
    /// in the same order as the watched state.
    fn notify_listeners(&self, connected: bool) {
        let _ = self
            .listeners
            .send(CoordinatorEvent::ConnectionChanged { connected });
    }

    async fn publish_connection(&self, connected: bool) {
        self.publish(Event::connection_changed(&self.device.address, connected))
            .await;
    }

    async fn publish(&self, event: Event) {
        let event_type = event.event_type;
        if let Err(err) = self.publisher.publish(event).await {
            tracing::warn!(%err, %event_type, address = %self.device.address, "failed to publish event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tuyable_domain::catalog;
    use tuyable_domain::datapoint::DatapointValue;
    use tuyable_domain::event::EventType;

    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::sync::Semaphore;

    use crate::event_bus::InProcessEventBus;
    use crate::ports::PublishError;
    use crate::test_support::{FakeTransport, device};

    const DELAY: Duration = Duration::from_secs(600);

    type Bus = Arc<InProcessEventBus>;

    fn coordinator(category: &str, product_id: &str) -> (Coordinator<Bus>, Bus) {
        let bus = Arc::new(InProcessEventBus::new(16));
        let device = device(category, product_id);
        let product = catalog::product_info(category, product_id);
        (Coordinator::new(device, product, Arc::clone(&bus), DELAY), bus)
    }

    fn switch_update(changed_by_device: bool) -> Datapoint {
        Datapoint::new(DatapointId::new(2), DatapointValue::Bool(true), changed_by_device)
    }

    /// Publisher holding every publish until a permit is released.
    struct GatedPublisher {
        gate: Semaphore,
        entered: AtomicUsize,
        published: Mutex<Vec<Event>>,
    }

    type Gated = Arc<GatedPublisher>;

    impl GatedPublisher {
        fn new() -> Self {
            Self {
                gate: Semaphore::new(0),
                entered: AtomicUsize::new(0),
                published: Mutex::new(Vec::new()),
            }
        }

        fn release(&self, permits: usize) {
            self.gate.add_permits(permits);
        }

        async fn wait_entered(&self, count: usize) {
            while self.entered.load(Ordering::SeqCst) < count {
                tokio::task::yield_now().await;
            }
        }

        fn published(&self) -> Vec<serde_json::Value> {
            self.published
                .lock()
                .unwrap()
                .iter()
                .map(|event| event.data["connected"].clone())
                .collect()
        }
    }

    impl EventPublisher for GatedPublisher {
        fn publish(&self, event: Event) -> impl Future<Output = Result<(), PublishError>> + Send {
            async move {
                self.entered.fetch_add(1, Ordering::SeqCst);
                self.gate.acquire().await.unwrap().forget();
                self.published.lock().unwrap().push(event);
                Ok(())
            }
        }
    }

    struct FailingPublisher;

    impl EventPublisher for FailingPublisher {
        fn publish(&self, _event: Event) -> impl Future<Output = Result<(), PublishError>> + Send {
            async { Err(PublishError::new("host bus unavailable")) }
        }
    }

    fn gated(category: &str, product_id: &str) -> (Coordinator<Gated>, Gated) {
        let publisher = Arc::new(GatedPublisher::new());
        let product = catalog::product_info(category, product_id);
        let coordinator = Coordinator::new(
            device(category, product_id),
            product,
            Arc::clone(&publisher),
            DELAY,
        );
        (coordinator, publisher)
    }

    fn spawn_connect(coordinator: &Coordinator<Gated>) -> JoinHandle<()> {
        let coordinator = coordinator.clone();
        tokio::spawn(async move { coordinator.handle_connect().await })
    }

    #[tokio::test]
    async fn should_start_disconnected() {
        let (coordinator, _) = coordinator("co2bj", "59s19z5m");
        assert!(!coordinator.is_connected());
        assert!(!*coordinator.connection().borrow());
    }

    #[tokio::test]
    async fn should_notify_once_on_connect() {
        let (coordinator, _) = coordinator("co2bj", "59s19z5m");
        let mut events = coordinator.subscribe();

        coordinator.handle_connect().await;
        coordinator.handle_connect().await;

        assert!(coordinator.is_connected());
        assert_eq!(
            events.recv().await.unwrap(),
            CoordinatorEvent::ConnectionChanged { connected: true }
        );
        assert!(events.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn should_stay_connected_until_delay_passes() {
        let (coordinator, _) = coordinator("co2bj", "59s19z5m");
        coordinator.handle_connect().await;

        coordinator.handle_disconnect();
        tokio::time::sleep(DELAY - Duration::from_secs(1)).await;
        assert!(coordinator.is_connected());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(!coordinator.is_connected());
        assert!(!coordinator.inner.has_pending_disconnect());
    }

    #[tokio::test(start_paused = true)]
    async fn should_never_flip_when_reconnecting_within_delay() {
        let (coordinator, _) = coordinator("co2bj", "59s19z5m");
        coordinator.handle_connect().await;
        let connection = coordinator.connection();

        coordinator.handle_disconnect();
        tokio::time::sleep(Duration::from_secs(30)).await;
        coordinator.handle_connect().await;
        tokio::time::sleep(DELAY * 2).await;

        assert!(coordinator.is_connected());
        assert!(!connection.has_changed().unwrap());
        assert!(!coordinator.inner.has_pending_disconnect());
    }

    #[tokio::test(start_paused = true)]
    async fn should_keep_first_timer_on_repeated_disconnects() {
        let (coordinator, _) = coordinator("co2bj", "59s19z5m");
        coordinator.handle_connect().await;

        coordinator.handle_disconnect();
        tokio::time::sleep(DELAY / 2).await;
        coordinator.handle_disconnect();
        tokio::time::sleep(DELAY / 2 + Duration::from_secs(1)).await;

        assert!(!coordinator.is_connected());
    }

    #[tokio::test(start_paused = true)]
    async fn should_treat_update_as_reconnect() {
        let (coordinator, _) = coordinator("co2bj", "59s19z5m");
        coordinator.handle_connect().await;
        let mut events = coordinator.subscribe();

        coordinator.handle_disconnect();
        let update = Datapoint::new(DatapointId::new(2), DatapointValue::Value(800), true);
        coordinator.handle_update(&[update]).await;
        tokio::time::sleep(DELAY * 2).await;

        assert!(coordinator.is_connected());
        assert_eq!(
            events.recv().await.unwrap(),
            CoordinatorEvent::Updated(vec![DatapointId::new(2)])
        );
    }

    #[tokio::test]
    async fn should_publish_fingerbot_press_from_device() {
        let (coordinator, bus) = coordinator("szjqr", "blliqpsj");
        let mut events = bus.subscribe();

        coordinator.handle_update(&[switch_update(true)]).await;

        let connected = events.recv().await.unwrap();
        assert_eq!(connected.event_type, EventType::ConnectionChanged);
        let pressed = events.recv().await.unwrap();
        assert_eq!(pressed.event_type, EventType::FingerbotButtonPressed);
        assert_eq!(
            pressed.data,
            serde_json::json!({ "address": "DC:23:4D:5B:0E:DF", "device_id": "bf1234" })
        );
    }

    #[tokio::test]
    async fn should_ignore_locally_echoed_switch_updates() {
        let (coordinator, bus) = coordinator("szjqr", "blliqpsj");
        coordinator.handle_connect().await;
        let mut events = bus.subscribe();

        coordinator.handle_update(&[switch_update(false)]).await;

        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn should_ignore_switch_updates_without_manual_control() {
        let (coordinator, bus) = coordinator("szjqr", "ltak7e1p");
        coordinator.handle_connect().await;
        let mut events = bus.subscribe();

        coordinator.handle_update(&[switch_update(true)]).await;

        assert!(events.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn should_follow_transport_events_once_started() {
        let (coordinator, _) = coordinator("co2bj", "59s19z5m");
        let transport = FakeTransport::default();
        coordinator.start(&transport);
        let mut events = coordinator.subscribe();

        transport.emit(TransportEvent::Connected);
        assert_eq!(
            events.recv().await.unwrap(),
            CoordinatorEvent::ConnectionChanged { connected: true }
        );

        transport.emit(TransportEvent::Disconnected);
        assert_eq!(
            events.recv().await.unwrap(),
            CoordinatorEvent::ConnectionChanged { connected: false }
        );
        assert!(!coordinator.is_connected());
    }

    #[tokio::test(start_paused = true)]
    async fn should_drop_pending_disconnect_on_shutdown() {
        let (coordinator, _) = coordinator("co2bj", "59s19z5m");
        coordinator.handle_connect().await;
        coordinator.handle_disconnect();

        coordinator.shutdown();
        tokio::time::sleep(DELAY * 2).await;

        assert!(coordinator.is_connected());
        assert!(!coordinator.inner.has_pending_disconnect());
    }

    #[tokio::test(start_paused = true)]
    async fn should_notify_listeners_before_host_publish_completes() {
        let (coordinator, publisher) = gated("co2bj", "59s19z5m");
        let mut events = coordinator.subscribe();

        let connecting = spawn_connect(&coordinator);
        publisher.wait_entered(1).await;

        assert!(coordinator.is_connected());
        assert_eq!(
            events.try_recv().unwrap(),
            CoordinatorEvent::ConnectionChanged { connected: true }
        );
        assert!(publisher.published().is_empty());

        publisher.release(1);
        connecting.await.unwrap();
        assert_eq!(publisher.published(), [serde_json::json!(true)]);
    }

    #[tokio::test(start_paused = true)]
    async fn should_order_transitions_like_state_while_publish_is_stalled() {
        let (coordinator, publisher) = gated("co2bj", "59s19z5m");
        publisher.release(1);
        coordinator.handle_connect().await;
        let mut events = coordinator.subscribe();

        // the expiry blocks on its host publish
        coordinator.handle_disconnect();
        tokio::time::sleep(DELAY + Duration::from_secs(1)).await;
        publisher.wait_entered(2).await;
        assert!(!coordinator.is_connected());

        // a reconnect lands while that publish is still pending
        let connecting = spawn_connect(&coordinator);
        publisher.wait_entered(3).await;
        assert!(coordinator.is_connected());

        assert_eq!(
            events.try_recv().unwrap(),
            CoordinatorEvent::ConnectionChanged { connected: false }
        );
        assert_eq!(
            events.try_recv().unwrap(),
            CoordinatorEvent::ConnectionChanged { connected: true }
        );
        assert!(events.try_recv().is_err());

        publisher.release(2);
        connecting.await.unwrap();
        assert!(coordinator.is_connected());
    }

    #[tokio::test]
    async fn should_keep_running_when_host_publish_fails() {
        let device = device("szjqr", "blliqpsj");
        let product = catalog::product_info("szjqr", "blliqpsj");
        let coordinator = Coordinator::new(device, product, FailingPublisher, DELAY);
        let mut events = coordinator.subscribe();

        coordinator.handle_update(&[switch_update(true)]).await;

        assert!(coordinator.is_connected());
        assert_eq!(
            events.recv().await.unwrap(),
            CoordinatorEvent::ConnectionChanged { connected: true }
        );
        assert_eq!(
            events.recv().await.unwrap(),
            CoordinatorEvent::Updated(vec![DatapointId::new(2)])
        );
    }
}
