//! Conformance suite for [`KeyValueProvider`] implementations.
//!
//! Every provider, built-in or third-party, can run the same checks to
//! confirm it honours the trait contract. Enable the `testutil` feature and
//! call each function with a fresh provider:
//!
//! ```no_run
//! use kvprefs_core::conformance;
//! use kvprefs_core::provider::MemoryKeyValueProvider;
//!
//! #[test]
//! fn missing_key_is_absent() {
//!     conformance::get_returns_none_for_missing_key(&MemoryKeyValueProvider::new());
//! }
//! ```
//!
//! Persistence checks take a `reopen` closure that builds a second,
//! independent instance over the same storage (same file, same keychain
//! service, or a shared memory map).

use crate::preferences::{Key, Preferences};
use crate::provider::KeyValueProvider;
use std::sync::Arc;

/// `get` on a key that was never set returns `Ok(None)`.
pub fn get_returns_none_for_missing_key<P: KeyValueProvider>(provider: &P) {
    let result = provider.get("randomKey");
    assert!(result.is_ok(), "get should not error on missing key: {result:?}");
    assert_eq!(result.expect("checked above"), None, "missing key should be absent");
}

/// `set` then `get` returns the stored value.
pub fn set_then_get_returns_value<P: KeyValueProvider>(provider: &P) {
    provider.set("sampleKey1", Some("value1")).expect("set should succeed");
    assert_eq!(provider.get("sampleKey1").expect("get"), Some("value1".to_string()));
}

/// `set` on an existing key overwrites it.
pub fn set_overwrites_existing<P: KeyValueProvider>(provider: &P) {
    provider.set("sampleKey1", Some("original")).expect("set");
    provider.set("sampleKey1", Some("updated")).expect("overwrite");
    assert_eq!(provider.get("sampleKey1").expect("get"), Some("updated".to_string()));
}

/// `set(k, None)` removes the key; it is absent, not an empty string.
pub fn set_none_removes_key<P: KeyValueProvider>(provider: &P) {
    provider.set("sampleKey1", Some("value1")).expect("set");
    provider.set("sampleKey1", None).expect("remove");
    assert_eq!(provider.get("sampleKey1").expect("get after remove"), None);
}

/// Removing a key that was never set is a silent no-op.
pub fn set_none_on_missing_key_is_noop<P: KeyValueProvider>(provider: &P) {
    let result = provider.set("ghost", None);
    assert!(result.is_ok(), "removing a missing key should not error: {result:?}");
    assert_eq!(provider.get("ghost").expect("get"), None);
}

/// An empty string is a value, distinct from absence.
pub fn empty_string_is_stored<P: KeyValueProvider>(provider: &P) {
    provider.set("blank", Some("")).expect("set");
    assert_eq!(provider.get("blank").expect("get"), Some(String::new()));
}

/// Keys and values with separators, whitespace and non-ASCII text survive.
pub fn special_characters_survive<P: KeyValueProvider>(provider: &P) {
    let cases = [
        ("key with spaces", " padded value "),
        ("a=b:c", "#not a comment"),
        ("unicode", "caf\u{e9} \u{1F600}"),
        ("multiline", "line one\nline two"),
    ];
    for (key, value) in cases {
        provider.set(key, Some(value)).expect("set");
    }
    for (key, value) in cases {
        assert_eq!(provider.get(key).expect("get"), Some(value.to_string()), "key {key:?}");
    }
}

/// A second instance over the same storage observes writes.
///
/// Does nothing for non-persistent providers.
pub fn second_instance_sees_writes<P, F>(provider: &P, reopen: F)
where
    P: KeyValueProvider,
    F: Fn(&P) -> P,
{
    if !provider.is_persistent() {
        return;
    }
    provider.set("sampleKey2", Some("value2")).expect("set");
    let second = reopen(provider);
    assert!(!std::ptr::eq(provider, &second), "reopen must build a new instance");
    assert_eq!(second.get("sampleKey2").expect("get"), Some("value2".to_string()));
}

/// A removal is visible to a second instance over the same storage.
pub fn second_instance_sees_removal<P, F>(provider: &P, reopen: F)
where
    P: KeyValueProvider,
    F: Fn(&P) -> P,
{
    if !provider.is_persistent() {
        return;
    }
    provider.set("sampleKey3", Some("value3")).expect("set");
    provider.set("sampleKey3", None).expect("remove");
    assert_eq!(reopen(provider).get("sampleKey3").expect("get"), None);
}

/// Typed values round-trip through `Preferences` on this provider.
pub fn preferences_round_trip<P: KeyValueProvider + 'static>(provider: P) {
    let provider = Arc::new(provider);
    let preferences = Preferences::new(provider.clone());
    let port = Key::parsed("port", 8080u16);

    assert_eq!(preferences.get(&port).expect("get default"), 8080);
    assert_eq!(provider.get("port").expect("raw get"), None, "defaults must not be written");

    preferences.set(&port, Some(&9090)).expect("set");
    assert_eq!(preferences.get_if_exists(&port).expect("get"), Some(9090));
    assert_eq!(provider.get("port").expect("raw get"), Some("9090".to_string()));

    assert_eq!(preferences.remove_key(&port).expect("remove"), Some(9090));
    assert!(!preferences.contains_key(&port).expect("contains"));
    assert_eq!(preferences.remove_key(&port).expect("remove again"), None);
    assert_eq!(preferences.get(&port).expect("get default"), 8080);
}

/// Runs every check that needs only a fresh provider.
///
/// `fresh` is called once per check so each starts from an empty store.
pub fn run_all<P, N, F>(fresh: N, reopen: F)
where
    P: KeyValueProvider + 'static,
    N: Fn() -> P,
    F: Fn(&P) -> P,
{
    get_returns_none_for_missing_key(&fresh());
    set_then_get_returns_value(&fresh());
    set_overwrites_existing(&fresh());
    set_none_removes_key(&fresh());
    set_none_on_missing_key_is_noop(&fresh());
    empty_string_is_stored(&fresh());
    special_characters_survive(&fresh());
    second_instance_sees_writes(&fresh(), &reopen);
    second_instance_sees_removal(&fresh(), &reopen);
    preferences_round_trip(fresh());
}
