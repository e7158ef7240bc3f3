use tickity_nullables::NullStore;
use tickity_store::{CheckInCache, KeyValueStore, StoreError};
use tickity_types::{CheckInRecord, EventId, TxHash, WalletAddress};

fn event(id: &str) -> EventId {
    EventId::new(id).unwrap()
}

fn wallet(addr: &str) -> WalletAddress {
    WalletAddress::parse(addr).unwrap()
}

fn record(addr: &str) -> CheckInRecord {
    CheckInRecord {
        wallet_address: wallet(addr),
        image_url: Some("https://img.example/selfie.jpg".into()),
        transaction_hash: Some(TxHash::new([9; 32])),
    }
}

#[test]
fn set_then_get_returns_record() {
    let cache = CheckInCache::new(NullStore::new());
    cache.set(&event("E1"), &record("0xABC")).unwrap();
    let got = cache.get(&event("E1")).unwrap().unwrap();
    assert_eq!(got.wallet_address.as_str(), "0xABC");
}

#[test]
fn other_wallet_sees_nothing() {
    let cache = CheckInCache::new(NullStore::new());
    cache.set(&event("E1"), &record("0xABC")).unwrap();
    assert!(cache
        .get_for_wallet(&event("E1"), &wallet("0xABC"))
        .unwrap()
        .is_some());
    assert!(cache
        .get_for_wallet(&event("E1"), &wallet("0xDEF"))
        .unwrap()
        .is_none());
}

#[test]
fn set_overwrites_without_merge() {
    let cache = CheckInCache::new(NullStore::new());
    cache.set(&event("E1"), &record("0xABC")).unwrap();
    let replacement = CheckInRecord {
        wallet_address: wallet("0xDEF"),
        image_url: None,
        transaction_hash: None,
    };
    cache.set(&event("E1"), &replacement).unwrap();
    assert_eq!(cache.get(&event("E1")).unwrap(), Some(replacement));
}

#[test]
fn records_are_namespaced_by_event() {
    let cache = CheckInCache::new(NullStore::new());
    cache.set(&event("E1"), &record("0xABC")).unwrap();
    assert!(cache.get(&event("E2")).unwrap().is_none());
    assert!(cache.store().get_item("checkin:E1").unwrap().is_some());
}

#[test]
fn corrupt_json_is_a_serialization_error() {
    let store = NullStore::new();
    store.set_item("checkin:E1", "{not json").unwrap();
    let cache = CheckInCache::new(store);
    assert!(matches!(
        cache.get(&event("E1")),
        Err(StoreError::Serialization(_))
    ));
}

#[test]
fn failing_backend_surfaces_error() {
    let store = NullStore::new();
    store.fail_writes(true);
    let cache = CheckInCache::new(store);
    assert!(matches!(
        cache.set(&event("E1"), &record("0xABC")),
        Err(StoreError::Backend(_))
    ));
}
