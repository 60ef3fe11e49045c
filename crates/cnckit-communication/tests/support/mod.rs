#![allow(dead_code)]
//! Recording transport used by the integration tests.
//!
//! Every outbound request is captured, acknowledgments are held until the
//! test resolves them, and events can be pushed through the facade's sink.

use cnckit_communication::{ConnectOptions, ControllerFacade, Transport, TransportConnector};
use cnckit_core::{
    AckCallback, AckResult, ConnectionKind, ControllerFamily, EventName, EventSink, ValueMap,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Open {
        family: ControllerFamily,
        kind: ConnectionKind,
        options: ValueMap,
    },
    Close {
        ident: String,
    },
    GetPorts,
    Command {
        ident: String,
        command: String,
        args: Vec<Value>,
        has_ack: bool,
    },
    Write {
        ident: String,
        data: String,
        context: Option<Value>,
    },
    Writeln {
        ident: String,
        data: String,
        context: Option<Value>,
    },
}

pub struct RecordingTransport {
    connected: AtomicBool,
    destroyed: AtomicBool,
    requests: Mutex<Vec<Request>>,
    pending: Mutex<VecDeque<AckCallback>>,
    sink: EventSink,
}

impl RecordingTransport {
    fn new(sink: EventSink) -> Self {
        Self {
            connected: AtomicBool::new(true),
            destroyed: AtomicBool::new(false),
            requests: Mutex::new(Vec::new()),
            pending: Mutex::new(VecDeque::new()),
            sink,
        }
    }

    /// Push an event as if the service sent it
    pub fn emit(&self, name: EventName, args: Vec<Value>) {
        (self.sink)(name, args);
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Resolve the oldest pending acknowledgment
    pub fn ack_next(&self, result: AckResult) -> bool {
        let ack = self.pending.lock().pop_front();
        match ack {
            Some(ack) => {
                ack(result);
                true
            }
            None => false,
        }
    }

    pub fn pending_acks(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::SeqCst)
    }

    fn record(&self, request: Request) {
        self.requests.lock().push(request);
    }

    fn hold(&self, ack: AckCallback) {
        self.pending.lock().push_back(ack);
    }
}

impl Transport for RecordingTransport {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst) && !self.is_destroyed()
    }

    fn destroy(&self) {
        self.destroyed.store(true, Ordering::SeqCst);
    }

    fn open(
        &self,
        family: ControllerFamily,
        kind: ConnectionKind,
        options: ValueMap,
        ack: AckCallback,
    ) {
        self.record(Request::Open {
            family,
            kind,
            options,
        });
        self.hold(ack);
    }

    fn close(&self, ident: &str, ack: AckCallback) {
        self.record(Request::Close {
            ident: ident.to_string(),
        });
        self.hold(ack);
    }

    fn get_ports(&self, ack: AckCallback) {
        self.record(Request::GetPorts);
        self.hold(ack);
    }

    fn command(&self, ident: &str, command: &str, args: Vec<Value>, ack: Option<AckCallback>) {
        self.record(Request::Command {
            ident: ident.to_string(),
            command: command.to_string(),
            args,
            has_ack: ack.is_some(),
        });
        if let Some(ack) = ack {
            self.hold(ack);
        }
    }

    fn write(&self, ident: &str, data: &str, context: Option<Value>) {
        self.record(Request::Write {
            ident: ident.to_string(),
            data: data.to_string(),
            context,
        });
    }

    fn writeln(&self, ident: &str, data: &str, context: Option<Value>) {
        self.record(Request::Writeln {
            ident: ident.to_string(),
            data: data.to_string(),
            context,
        });
    }
}

#[derive(Default)]
pub struct RecordingConnector {
    transports: Mutex<Vec<Arc<RecordingTransport>>>,
    hosts: Mutex<Vec<String>>,
}

impl RecordingConnector {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn latest(&self) -> Arc<RecordingTransport> {
        self.transports
            .lock()
            .last()
            .cloned()
            .expect("no transport has been created")
    }

    pub fn connect_count(&self) -> usize {
        self.transports.lock().len()
    }

    pub fn hosts(&self) -> Vec<String> {
        self.hosts.lock().clone()
    }
}

impl TransportConnector for RecordingConnector {
    fn connect(
        &self,
        host: &str,
        _options: &ConnectOptions,
        events: EventSink,
    ) -> Arc<dyn Transport> {
        let transport = Arc::new(RecordingTransport::new(events));
        self.transports.lock().push(transport.clone());
        self.hosts.lock().push(host.to_string());
        transport
    }
}

/// A facade connected to a fresh recording transport
pub fn connected_facade() -> (ControllerFacade, Arc<RecordingConnector>, Arc<RecordingTransport>) {
    let connector = RecordingConnector::new();
    let facade = ControllerFacade::new(connector.clone());
    facade.connect("http://localhost:8000", &ConnectOptions::default(), None);
    let transport = connector.latest();
    (facade, connector, transport)
}

/// Announce an open machine connection
pub fn open_session(transport: &RecordingTransport, ident: &str) {
    transport.emit(
        EventName::ConnectionOpen,
        vec![json!({
            "ident": ident,
            "type": "serial",
            "settings": {"path": "/dev/ttyUSB0", "baudRate": 115200}
        })],
    );
}

/// Report a controller state for `family`
pub fn report_state(transport: &RecordingTransport, family: &str, state: Value) {
    transport.emit(EventName::ControllerState, vec![json!(family), state]);
}

/// Report controller settings for `family`
pub fn report_settings(transport: &RecordingTransport, family: &str, settings: Value) {
    transport.emit(EventName::ControllerSettings, vec![json!(family), settings]);
}
