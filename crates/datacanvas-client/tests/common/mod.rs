#![allow(dead_code)]

use datacanvas_client::{DataCanvas, DataCanvasError, SdkConfig, Transport};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// One recorded `execute` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub path: String,
    pub query: Vec<(String, String)>,
}

/// Transport double that records calls and replays a canned result.
pub struct StubTransport {
    reply: Result<Value, DataCanvasError>,
    pub calls: Rc<RefCell<Vec<Call>>>,
    pub closes: Rc<Cell<usize>>,
}

impl StubTransport {
    pub fn replying(reply: Result<Value, DataCanvasError>) -> Self {
        Self {
            reply,
            calls: Rc::default(),
            closes: Rc::default(),
        }
    }

    pub fn ok(body: Value) -> Self {
        Self::replying(Ok(body))
    }
}

impl Transport for StubTransport {
    fn execute(&self, path: &str, query: &[(&str, String)]) -> Result<Value, DataCanvasError> {
        self.calls.borrow_mut().push(Call {
            path: path.to_string(),
            query: query
                .iter()
                .map(|(k, v)| ((*k).to_string(), v.clone()))
                .collect(),
        });
        self.reply.clone()
    }

    fn close(&mut self) {
        self.closes.set(self.closes.get() + 1);
    }
}

pub fn config(base_url: &str) -> SdkConfig {
    SdkConfig::new("test-key", "test-secret", 7, base_url).unwrap()
}

/// Client over a stub plus handles to its call log and close counter.
pub fn stub_client(
    stub: StubTransport,
) -> (DataCanvas<StubTransport>, Rc<RefCell<Vec<Call>>>, Rc<Cell<usize>>) {
    let calls = Rc::clone(&stub.calls);
    let closes = Rc::clone(&stub.closes);
    (
        DataCanvas::with_transport(config("https://api.example.com"), stub),
        calls,
        closes,
    )
}
