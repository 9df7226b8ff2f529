mod common;

use common::{stub_client, StubTransport};
use datacanvas_client::DataQuery;
use datacanvas_core::classify;
use serde_json::json;

#[test]
fn explicit_close_releases_once() {
    let (client, _, closes) = stub_client(StubTransport::ok(json!({})));
    client.close();
    assert_eq!(closes.get(), 1);
}

#[test]
fn drop_releases_once() {
    let (client, _, closes) = stub_client(StubTransport::ok(json!({})));
    {
        let _scoped = client;
    }
    assert_eq!(closes.get(), 1);
}

#[test]
fn release_after_failed_call() {
    let (client, calls, closes) = stub_client(StubTransport::replying(Err(classify(500, None))));

    assert!(client.devices().list().is_err());
    assert!(client.data().list(&DataQuery::new("t").limit(0)).is_err());
    assert_eq!(calls.borrow().len(), 1);
    assert_eq!(closes.get(), 0);

    client.close();
    assert_eq!(closes.get(), 1);
}

#[test]
fn release_on_early_return() {
    fn fetch(stub: StubTransport) -> Result<(), datacanvas_client::DataCanvasError> {
        let (client, _, _) = stub_client(stub);
        client.devices().list()?;
        Ok(())
    }

    let stub = StubTransport::replying(Err(classify(401, None)));
    let closes = std::rc::Rc::clone(&stub.closes);
    assert!(fetch(stub).is_err());
    assert_eq!(closes.get(), 1);
}

#[test]
fn release_during_unwind() {
    let stub = StubTransport::ok(json!({}));
    let closes = std::rc::Rc::clone(&stub.closes);

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
        let (_client, _, _) = stub_client(stub);
        panic!("caller failure");
    }));

    assert!(result.is_err());
    assert_eq!(closes.get(), 1);
}
