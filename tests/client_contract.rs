// Client access contract exercised through the public API with the in-memory store.
use std::sync::Arc;
use std::thread;

use qconf::api::{Client, ErrorKind, MemoryBackend, version};

fn demo_client() -> Client<Arc<MemoryBackend>> {
    let store = Arc::new(MemoryBackend::new().with_default_idc("corp"));
    store.set_conf("corp", "/demo/confs/conf", "v1").expect("set");
    store.set_conf("corp", "/demo/confs/a", "1").expect("set");
    store.set_conf("corp", "/demo/confs/b", "2").expect("set");
    store
        .set_hosts("corp", "/demo/hosts", ["10.0.0.1:80", "10.0.0.2:80"])
        .expect("set");
    Client::connect(store).expect("connect")
}

#[test]
fn single_value_lookup() {
    let client = demo_client();
    assert_eq!(client.get_conf("/demo/confs/conf", Some("corp")).expect("conf"), "v1");

    let err = client
        .get_conf("/demo/confs/nothing", Some("corp"))
        .expect_err("not found");
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn keys_resolve_regardless_of_surrounding_slashes() {
    let client = demo_client();
    for key in ["demo/confs/conf", "/demo/confs/conf/", "//demo/confs/conf"] {
        assert_eq!(client.get_conf(key, None).expect("conf"), "v1");
    }
    let err = client.get_conf("/", None).expect_err("root");
    assert_eq!(err.kind(), ErrorKind::Usage);
    assert_eq!(err.code(), Some(1));
}

#[test]
fn batch_lookup_under_namespace() {
    let store = Arc::new(MemoryBackend::new());
    store.set_conf("corp", "/demo/confs/a", "1").expect("set");
    store.set_conf("corp", "/demo/confs/b", "2").expect("set");
    let client = Client::connect(store).expect("connect");

    let batch = client.get_batch_conf("/demo/confs", Some("corp")).expect("batch");
    assert_eq!(batch.len(), 2);
    assert_eq!(batch["a"], "1");
    assert_eq!(batch["b"], "2");

    let keys = client.get_batch_keys("/demo/confs", Some("corp")).expect("keys");
    assert_eq!(keys, vec!["a", "b"]);
    let keys = client.get_batch_keys("demo/confs/", Some("corp")).expect("keys");
    assert_eq!(keys, vec!["a", "b"]);
}

#[test]
fn values_up_to_the_ceiling_are_returned_whole() {
    let client = demo_client();
    let store = client.backend();
    for len in [0, 1, 2047, 2048, 16 * 1024, 1024 * 1024 - 1] {
        let value = "v".repeat(len);
        store.set_conf("corp", "/demo/sized", &value).expect("set");
        let fetched = client.get_conf("/demo/sized", None).expect("conf");
        assert_eq!(fetched.len(), len);
    }

    store
        .set_conf("corp", "/demo/sized", &"v".repeat(1024 * 1024))
        .expect("set");
    let err = client.get_conf("/demo/sized", None).expect_err("too big");
    assert_eq!(err.kind(), ErrorKind::BufferTooSmall);
}

#[test]
fn every_array_is_released_once() {
    let client = demo_client();
    client.get_all_host("/demo/hosts", None).expect("hosts");
    client.get_batch_keys("/demo/confs", None).expect("keys");
    client.get_batch_conf("/demo/confs", None).expect("batch");
    client.get_all_host("/demo/none", None).expect_err("missing");
    client.get_batch_keys("/demo/none", Some("zz")).expect_err("zone");
    client.get_batch_conf("/demo/none", None).expect_err("missing");

    let store = client.backend();
    assert_eq!(store.resources_acquired(), 6);
    assert_eq!(store.resources_released(), 6);
}

#[test]
fn concurrent_callers_share_one_client() {
    let client = Arc::new(demo_client());
    let workers: Vec<_> = (0..8)
        .map(|_| {
            let client = Arc::clone(&client);
            thread::spawn(move || {
                for _ in 0..50 {
                    assert_eq!(client.get_conf("/demo/confs/conf", None).expect("conf"), "v1");
                    assert_eq!(client.get_all_host("/demo/hosts", None).expect("hosts").len(), 2);
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().expect("worker");
    }

    let store = client.backend();
    assert_eq!(store.resources_acquired(), 400);
    assert_eq!(store.resources_released(), 400);
}

#[test]
fn version_is_available_without_a_store() {
    let first = version();
    assert!(!first.is_empty());
    assert_eq!(first, version());
}
