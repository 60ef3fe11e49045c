//! Controller facade
//!
//! Bridges a transport to the controller service and the application:
//! - every event the transport pushes goes through a single relay, which
//!   first updates the derived session/controller/workflow state and then
//!   fans the event out to registered listeners and async subscribers
//! - commands, writes and queries are forwarded to the transport, scoped by
//!   the identifier of the open session
//!
//! ## Lifecycle
//!
//! ```text
//! Disconnected --connect--> Connected --connection:open--> SessionOpen
//!      ^                        ^  |                           |
//!      |                        |  +<--connection:close/close--+
//!      +--disconnect/reconnect_failed (from either state)------+
//! ```
//!
//! Leaving `SessionOpen` always resets the session, controller family,
//! settings, state and workflow state in one step. Listeners persist
//! across reconnects.

use crate::firmware::ControllerStateModel;
use crate::registry::{invoke_isolated, ListenerRegistry};
use crate::session::{ConnectionSession, OpenDefaults, OpenOptions};
use crate::transport::{ConnectOptions, Transport, TransportConnector};
use cnckit_core::data::ensure_array;
use cnckit_core::{
    thread_safe, thread_safe_rw, AckCallback, AckResult, ControllerError, ControllerFamily,
    EventName, EventSink, Listener, Position, ReadyCallback, RelayedEvent, Session, ThreadSafe,
    ThreadSafeRw, ValueMap, WorkflowState,
};
use parking_lot::Mutex;
use serde_json::Value;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Default capacity of the async event channel
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Where the facade is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// No live transport
    Disconnected,
    /// Transport up, no machine connection open
    Connected,
    /// A machine connection is open
    SessionOpen,
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "Disconnected"),
            Self::Connected => write!(f, "Connected"),
            Self::SessionOpen => write!(f, "Session open"),
        }
    }
}

/// What the service announced in its `startup` greeting
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartupInfo {
    /// Controller families the service has loaded
    pub loaded_controllers: Vec<String>,
    /// User-defined baud rates
    pub baud_rates: Vec<u32>,
}

impl StartupInfo {
    fn from_payload(payload: Option<&Value>) -> Self {
        let empty = ValueMap::new();
        let payload = payload.and_then(Value::as_object).unwrap_or(&empty);

        let loaded_controllers = ensure_array(payload.get("loadedControllers"))
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect();
        let baud_rates = ensure_array(payload.get("baudRates"))
            .iter()
            .filter_map(|v| match v {
                Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
                Value::String(s) => s.trim().parse::<u32>().ok(),
                _ => None,
            })
            .collect();

        Self {
            loaded_controllers,
            baud_rates,
        }
    }
}

/// State derived from the event stream
#[derive(Debug, Default)]
struct LiveState {
    session: ConnectionSession,
    controller: ControllerStateModel,
    workflow: WorkflowState,
    startup: StartupInfo,
}

impl LiveState {
    fn apply(&mut self, name: EventName, args: &[Value]) {
        match name {
            EventName::ControllerType => {
                self.controller.set_family(args.first());
            }
            EventName::ControllerSettings => {
                self.controller.set_family(args.first());
                self.controller.replace_settings(args.get(1));
            }
            EventName::ControllerState => {
                self.controller.set_family(args.first());
                self.controller.replace_state(args.get(1));
            }
            EventName::ConnectionOpen => {
                self.session.apply_open_event(args.first());
                tracing::info!("Connection '{}' opened", self.session.ident());
            }
            EventName::ConnectionClose | EventName::Disconnect | EventName::ReconnectFailed => {
                self.reset();
                tracing::info!("Session state reset after '{}'", name);
            }
            EventName::WorkflowState => {
                match args
                    .first()
                    .and_then(Value::as_str)
                    .and_then(WorkflowState::from_name)
                {
                    Some(state) => self.workflow = state,
                    None => tracing::warn!("Ignoring unknown workflow state {:?}", args.first()),
                }
            }
            EventName::Startup => {
                self.startup = StartupInfo::from_payload(args.first());
            }
            _ => {}
        }
    }

    /// Clears the session first so forwarding stops before anything else
    fn reset(&mut self) {
        self.session.clear();
        self.controller.reset();
        self.workflow = WorkflowState::Idle;
    }
}

/// At-most-once holder for the callback passed to `connect`
#[derive(Default)]
struct StartupLatch {
    fired: AtomicBool,
    callback: Mutex<Option<ReadyCallback>>,
}

impl StartupLatch {
    fn arm(&self, callback: Option<ReadyCallback>) {
        *self.callback.lock() = callback;
        self.fired.store(false, Ordering::SeqCst);
    }

    fn fire(&self) {
        if self.fired.swap(true, Ordering::SeqCst) {
            return;
        }
        let callback = self.callback.lock().take();
        if let Some(callback) = callback {
            callback();
        }
    }
}

/// Receives transport events. Holds no reference to the transport itself.
#[derive(Clone)]
struct Relay {
    registry: ThreadSafeRw<ListenerRegistry>,
    live: ThreadSafe<LiveState>,
    ready: Arc<StartupLatch>,
    events: broadcast::Sender<RelayedEvent>,
}

impl Relay {
    fn handle(&self, name: EventName, args: Vec<Value>) {
        tracing::debug!("Relaying '{}' ({} args)", name, args.len());

        if name.mutates_state() {
            self.live.lock().apply(name, &args);
        }

        let listeners = self.registry.read().listeners(name);
        invoke_isolated(&listeners, name, &args);

        // No async subscribers is not an error
        let _ = self.events.send(RelayedEvent::new(name, args));

        if name == EventName::Startup {
            self.ready.fire();
        }
    }

    fn sink(&self) -> EventSink {
        let relay = self.clone();
        Arc::new(move |name, args| relay.handle(name, args))
    }
}

/// Builder for [`ControllerFacade`]
pub struct ControllerFacadeBuilder {
    connector: Option<Arc<dyn TransportConnector>>,
    open_defaults: OpenDefaults,
    event_capacity: usize,
}

impl ControllerFacadeBuilder {
    /// Transport connector used by `connect` (required)
    pub fn connector(mut self, connector: Arc<dyn TransportConnector>) -> Self {
        self.connector = Some(connector);
        self
    }

    /// Defaults applied to open requests
    pub fn open_defaults(mut self, defaults: OpenDefaults) -> Self {
        self.open_defaults = defaults;
        self
    }

    /// Capacity of the async event channel
    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Build the facade. Fails if no connector was supplied.
    pub fn build(self) -> Result<ControllerFacade, ControllerError> {
        let connector = self.connector.ok_or(ControllerError::MissingTransport)?;
        Ok(ControllerFacade::assemble(
            connector,
            self.open_defaults,
            self.event_capacity,
        ))
    }
}

impl Default for ControllerFacadeBuilder {
    fn default() -> Self {
        Self {
            connector: None,
            open_defaults: OpenDefaults::default(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

/// Client-side facade over a live session with the controller service
pub struct ControllerFacade {
    connector: Arc<dyn TransportConnector>,
    transport: ThreadSafe<Option<Arc<dyn Transport>>>,
    relay: Relay,
    open_defaults: OpenDefaults,
}

impl ControllerFacade {
    /// Create a facade with default settings
    pub fn new(connector: Arc<dyn TransportConnector>) -> Self {
        Self::assemble(connector, OpenDefaults::default(), DEFAULT_EVENT_CAPACITY)
    }

    fn assemble(
        connector: Arc<dyn TransportConnector>,
        open_defaults: OpenDefaults,
        event_capacity: usize,
    ) -> Self {
        let (events, _) = broadcast::channel(event_capacity.max(1));
        Self {
            connector,
            transport: thread_safe(None),
            relay: Relay {
                registry: thread_safe_rw(ListenerRegistry::new()),
                live: thread_safe(LiveState::default()),
                ready: Arc::new(StartupLatch::default()),
                events,
            },
            open_defaults,
        }
    }

    /// Start building a facade
    pub fn builder() -> ControllerFacadeBuilder {
        ControllerFacadeBuilder::default()
    }

    // ---------------------------------------------------------------------
    // Transport lifecycle
    // ---------------------------------------------------------------------

    /// Connect to the service at `host`.
    ///
    /// An existing transport is destroyed first and the derived state is
    /// reset. `on_ready` runs at most once, after the service's `startup`
    /// greeting has been relayed.
    pub fn connect(&self, host: &str, options: &ConnectOptions, on_ready: Option<ReadyCallback>) {
        let previous = self.transport.lock().take();
        if let Some(previous) = previous {
            tracing::info!("Replacing existing transport");
            previous.destroy();
            self.relay.live.lock().reset();
        }

        self.relay.ready.arm(on_ready);

        tracing::info!("Connecting to controller service at '{}'", host);
        let transport = self.connector.connect(host, options, self.relay.sink());
        *self.transport.lock() = Some(transport);
    }

    /// Destroy the transport and reset the derived state
    pub fn disconnect(&self) {
        let transport = self.transport.lock().take();
        if let Some(transport) = transport {
            tracing::info!("Disconnecting from controller service");
            transport.destroy();
        }
        self.relay.live.lock().reset();
    }

    /// Whether the transport is up
    pub fn is_connected(&self) -> bool {
        self.transport().is_some_and(|t| t.is_connected())
    }

    /// Current lifecycle state
    pub fn link_state(&self) -> LinkState {
        if !self.is_connected() {
            LinkState::Disconnected
        } else if self.relay.live.lock().session.is_open() {
            LinkState::SessionOpen
        } else {
            LinkState::Connected
        }
    }

    fn transport(&self) -> Option<Arc<dyn Transport>> {
        self.transport.lock().clone()
    }

    /// Transport and session identifier, if both exist
    fn session_target(&self) -> Result<(Arc<dyn Transport>, String), ControllerError> {
        let transport = self.transport().ok_or(ControllerError::NotConnected)?;
        let ident = self.relay.live.lock().session.ident().to_string();
        if ident.is_empty() {
            return Err(ControllerError::NoSession);
        }
        Ok((transport, ident))
    }

    /// Like [`Self::session_target`], logging why a request is dropped
    fn forward_target(&self, operation: &str) -> Option<(Arc<dyn Transport>, String)> {
        self.session_target()
            .map_err(|err| tracing::warn!("Dropping '{}': {}", operation, err))
            .ok()
    }

    // ---------------------------------------------------------------------
    // Listeners
    // ---------------------------------------------------------------------

    /// Append `listener` to the listeners for `name`
    pub fn register_listener(&self, name: EventName, listener: Listener) -> bool {
        self.relay.registry.write().register(name, listener)
    }

    /// Append `listener` to the listeners for the event called `name`.
    /// Returns false if the name is unknown.
    pub fn register_listener_by_name(&self, name: &str, listener: Listener) -> bool {
        self.relay.registry.write().register_by_name(name, listener)
    }

    /// Remove the first occurrence of `listener` from the listeners for `name`
    pub fn deregister_listener(&self, name: EventName, listener: &Listener) -> bool {
        self.relay.registry.write().deregister(name, listener)
    }

    /// Remove the first occurrence of `listener` from the listeners for the
    /// event called `name`. Returns false if the name is unknown.
    pub fn deregister_listener_by_name(&self, name: &str, listener: &Listener) -> bool {
        self.relay.registry.write().deregister_by_name(name, listener)
    }

    /// Number of listeners registered for `name`
    pub fn listener_count(&self, name: EventName) -> usize {
        self.relay.registry.read().listener_count(name)
    }

    /// Receive every relayed event asynchronously
    pub fn subscribe_events(&self) -> broadcast::Receiver<RelayedEvent> {
        self.relay.events.subscribe()
    }

    // ---------------------------------------------------------------------
    // Requests
    // ---------------------------------------------------------------------

    /// Ask the service to open a machine connection.
    ///
    /// On a successful acknowledgment the returned identifier becomes the
    /// session identifier. Remote errors reach `callback` untouched, including
    /// the service's rejection of invalid `options`. Returns false, without
    /// calling `callback`, when not connected.
    pub fn open(
        &self,
        family: ControllerFamily,
        options: OpenOptions,
        callback: Option<AckCallback>,
    ) -> bool {
        let Some(transport) = self.transport() else {
            tracing::warn!("Dropping 'open': {}", ControllerError::NotConnected);
            return false;
        };
        if let Err(err) = options.validate() {
            tracing::warn!("Forwarding 'open' anyway: {}", err);
        }

        let family = if family.is_known() {
            family
        } else {
            ControllerFamily::Grbl
        };
        let kind = options.kind();
        let wire = options.resolve(&self.open_defaults);
        let live = self.relay.live.clone();

        tracing::info!("Opening {} connection for {}", kind, family);
        transport.open(
            family,
            kind,
            wire,
            Box::new(move |result: AckResult| {
                match &result {
                    Ok(args) => live.lock().session.acknowledge_open(args),
                    Err(err) => tracing::warn!("Open rejected: {}", err),
                }
                if let Some(callback) = callback {
                    callback(result);
                }
            }),
        );
        true
    }

    /// Ask the service to close the open machine connection.
    ///
    /// The session identifier is cleared once the service acknowledges,
    /// whatever the outcome; a successful acknowledgment also resets the
    /// derived state. Returns false when there is nothing to close.
    pub fn close(&self, callback: Option<AckCallback>) -> bool {
        let Some((transport, ident)) = self.forward_target("close") else {
            return false;
        };

        let live = self.relay.live.clone();
        tracing::info!("Closing connection '{}'", ident);
        transport.close(
            &ident,
            Box::new(move |result: AckResult| {
                {
                    let mut live = live.lock();
                    live.session.acknowledge_close();
                    if result.is_ok() {
                        live.reset();
                    }
                }
                if let Some(callback) = callback {
                    callback(result);
                }
            }),
        );
        true
    }

    /// Ask the service for the ports it can open. The list arrives through
    /// `callback`, not through the `ports` listeners.
    pub fn get_ports(&self, callback: AckCallback) -> bool {
        let Some(transport) = self.transport() else {
            tracing::warn!("Dropping 'getPorts': {}", ControllerError::NotConnected);
            return false;
        };
        transport.get_ports(callback);
        true
    }

    /// Run `command` on the open connection. See [`crate::Command`] for
    /// the well-known names.
    pub fn command(
        &self,
        command: impl AsRef<str>,
        args: Vec<Value>,
        callback: Option<AckCallback>,
    ) -> bool {
        let command = command.as_ref();
        let Some((transport, ident)) = self.forward_target(command) else {
            return false;
        };
        transport.command(&ident, command, args, callback);
        true
    }

    /// Write `data` to the open connection
    pub fn write(&self, data: &str, context: Option<Value>) -> bool {
        let Some((transport, ident)) = self.forward_target("write") else {
            return false;
        };
        transport.write(&ident, data, context);
        true
    }

    /// Write `data` and a newline to the open connection
    pub fn writeln(&self, data: &str, context: Option<Value>) -> bool {
        let Some((transport, ident)) = self.forward_target("writeln") else {
            return false;
        };
        transport.writeln(&ident, data, context);
        true
    }

    // ---------------------------------------------------------------------
    // Derived state
    // ---------------------------------------------------------------------

    /// Machine state reported by the controller, or an empty string when
    /// no controller is known or no session is open
    pub fn machine_state(&self) -> String {
        let live = self.relay.live.lock();
        live.controller.machine_state(live.session.is_open())
    }

    /// Machine position in millimeters
    pub fn machine_position(&self) -> Position {
        self.relay.live.lock().controller.machine_position()
    }

    /// Work position in millimeters
    pub fn work_position(&self) -> Position {
        self.relay.live.lock().controller.work_position()
    }

    /// Active work coordinate system (G54-G59)
    pub fn work_coordinate_system(&self) -> String {
        self.relay.live.lock().controller.work_coordinate_system()
    }

    /// Controller family last reported
    pub fn controller_family(&self) -> ControllerFamily {
        self.relay.live.lock().controller.family()
    }

    /// Firmware settings last reported
    pub fn controller_settings(&self) -> ValueMap {
        self.relay.live.lock().controller.settings().clone()
    }

    /// Live state last reported
    pub fn controller_state(&self) -> ValueMap {
        self.relay.live.lock().controller.state().clone()
    }

    /// The current session
    pub fn session(&self) -> Session {
        self.relay.live.lock().session.snapshot()
    }

    /// Workflow state last reported
    pub fn workflow_state(&self) -> WorkflowState {
        self.relay.live.lock().workflow
    }

    /// Controllers announced by the service
    pub fn loaded_controllers(&self) -> Vec<String> {
        self.relay.live.lock().startup.loaded_controllers.clone()
    }

    /// Baud rates announced by the service
    pub fn baud_rates(&self) -> Vec<u32> {
        self.relay.live.lock().startup.baud_rates.clone()
    }
}

impl fmt::Debug for ControllerFacade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerFacade")
            .field("link_state", &self.link_state())
            .field("open_defaults", &self.open_defaults)
            .finish()
    }
}

impl Drop for ControllerFacade {
    fn drop(&mut self) {
        let transport = self.transport.lock().take();
        if let Some(transport) = transport {
            transport.destroy();
        }
    }
}
