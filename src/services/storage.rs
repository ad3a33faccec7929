use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::BTreeMap;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{window, DomException, Storage};

const SENTINEL_KEY: &str = "__storage_test__";

/// Which of the browser's key/value stores to use.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum StorageKind {
    #[default]
    #[serde(rename = "localStorage")]
    Local,
    #[serde(rename = "sessionStorage")]
    Session,
}

impl StorageKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "localStorage" => Some(StorageKind::Local),
            "sessionStorage" => Some(StorageKind::Session),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StorageKind::Local => "localStorage",
            StorageKind::Session => "sessionStorage",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("{0} is not available")]
    Unavailable(&'static str),
    #[error("storage quota exceeded")]
    QuotaExceeded,
    #[error("storage error: {0}")]
    Backend(String),
}

impl StorageError {
    fn from_js(err: JsValue) -> Self {
        match err.dyn_ref::<DomException>() {
            Some(ex) if is_quota_error(ex.code(), &ex.name()) => StorageError::QuotaExceeded,
            Some(ex) => StorageError::Backend(format!("{}: {}", ex.name(), ex.message())),
            None => StorageError::Backend(format!("{:?}", err)),
        }
    }
}

/// Browsers disagree on how a full store is reported: Firefox uses its own
/// code and name, and the code may be missing altogether.
pub fn is_quota_error(code: u16, name: &str) -> bool {
    matches!(code, 22 | 1014) || matches!(name, "QuotaExceededError" | "NS_ERROR_DOM_QUOTA_REACHED")
}

pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
    fn len(&self) -> Result<u32, StorageError>;

    fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }

    fn get_json<T: for<'de> Deserialize<'de>>(&self, key: &str) -> anyhow::Result<Option<T>>
    where
        Self: Sized,
    {
        match self.get_item(key)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> anyhow::Result<String>
    where
        Self: Sized,
    {
        let json = serde_json::to_string(value)?;
        self.set_item(key, &json)?;
        Ok(json)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }

    fn len(&self) -> Result<u32, StorageError> {
        (**self).len()
    }
}

/// `window.localStorage` or `window.sessionStorage`.
pub struct BrowserStorage {
    storage: Storage,
}

impl BrowserStorage {
    pub fn open(kind: StorageKind) -> Result<Self, StorageError> {
        let window = window().ok_or(StorageError::Unavailable(kind.name()))?;
        let storage = match kind {
            StorageKind::Local => window.local_storage(),
            StorageKind::Session => window.session_storage(),
        };
        match storage {
            Ok(Some(storage)) => Ok(Self { storage }),
            _ => Err(StorageError::Unavailable(kind.name())),
        }
    }
}

impl KeyValueStore for BrowserStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage.get_item(key).map_err(StorageError::from_js)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage.set_item(key, value).map_err(StorageError::from_js)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.storage.remove_item(key).map_err(StorageError::from_js)
    }

    fn len(&self) -> Result<u32, StorageError> {
        self.storage.length().map_err(StorageError::from_js)
    }
}

/// In-memory store with an optional quota on the total size of keys and values.
#[derive(Default, Debug)]
pub struct MemoryStorage {
    entries: RefCell<BTreeMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(bytes: usize) -> Self {
        Self { entries: RefCell::default(), quota: Some(bytes) }
    }

    fn used_without(&self, key: &str) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(quota) = self.quota {
            if self.used_without(key) + key.len() + value.len() > quota {
                return Err(StorageError::QuotaExceeded);
            }
        }
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }

    fn len(&self) -> Result<u32, StorageError> {
        Ok(self.entries.borrow().len() as u32)
    }
}

/// Checks that `store` accepts a write and a removal.
///
/// A full store still counts as available as long as it already holds
/// something, since that data can be read back.
pub fn probe<S: KeyValueStore + ?Sized>(store: &S) -> bool {
    let outcome = store
        .set_item(SENTINEL_KEY, SENTINEL_KEY)
        .and_then(|_| store.remove_item(SENTINEL_KEY));

    match outcome {
        Ok(()) => true,
        Err(StorageError::QuotaExceeded) => matches!(store.is_empty(), Ok(false)),
        Err(e) => {
            log::warn!("Storage probe failed: {}", e);
            false
        }
    }
}

/// Must not be called before the page has finished initialising.
pub fn storage_available(kind: StorageKind) -> bool {
    match BrowserStorage::open(kind) {
        Ok(storage) => probe(&storage),
        Err(e) => {
            log::warn!("{}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Holds entries but refuses every write with the given error.
    struct RefusingStore {
        entries: u32,
        error: fn() -> StorageError,
    }

    impl KeyValueStore for RefusingStore {
        fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err((self.error)())
        }

        fn remove_item(&self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }

        fn len(&self) -> Result<u32, StorageError> {
            Ok(self.entries)
        }
    }

    #[test]
    fn backend_failure_is_unavailable_even_with_data() {
        let store = RefusingStore { entries: 3, error: || StorageError::Backend("SecurityError".into()) };
        assert!(!probe(&store));
        let store = RefusingStore { entries: 0, error: || StorageError::Unavailable("localStorage") };
        assert!(!probe(&store));
    }

    #[test]
    fn quota_failure_depends_on_existing_entries() {
        let store = RefusingStore { entries: 1, error: || StorageError::QuotaExceeded };
        assert!(probe(&store));
        let store = RefusingStore { entries: 0, error: || StorageError::QuotaExceeded };
        assert!(!probe(&store));
    }

    #[test]
    fn store_references_share_entries() {
        fn write_panel<S: KeyValueStore>(store: S) -> u32 {
            store.set_item("slotted_panel", "[]").unwrap();
            store.len().unwrap()
        }

        let store = MemoryStorage::new();
        assert_eq!(write_panel(&store), 1);
        assert_eq!(store.get_item("slotted_panel").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn quota_errors_by_code_or_name() {
        assert!(is_quota_error(22, "Whatever"));
        assert!(is_quota_error(1014, ""));
        assert!(is_quota_error(0, "QuotaExceededError"));
        assert!(is_quota_error(0, "NS_ERROR_DOM_QUOTA_REACHED"));
        assert!(!is_quota_error(18, "SecurityError"));
    }

    #[test]
    fn probe_leaves_no_sentinel_behind() {
        let store = MemoryStorage::new();
        assert!(probe(&store));
        assert_eq!(store.get_item(SENTINEL_KEY).unwrap(), None);
        assert_eq!(store.len().unwrap(), 0);
    }

    #[test]
    fn full_empty_store_is_unavailable() {
        let store = MemoryStorage::with_quota(4);
        assert!(!probe(&store));
    }

    #[test]
    fn full_store_with_data_is_available() {
        let store = MemoryStorage::with_quota(16);
        store.set_item("configuration", "").unwrap();
        assert!(probe(&store));
    }

    #[test]
    fn quota_counts_replaced_values_once() {
        let store = MemoryStorage::with_quota(10);
        store.set_item("key", "value").unwrap();
        store.set_item("key", "other").unwrap();
        assert!(matches!(store.set_item("key", "too long now"), Err(StorageError::QuotaExceeded)));
        assert_eq!(store.get_item("key").unwrap().as_deref(), Some("other"));
    }

    #[test]
    fn json_helpers() {
        let store = MemoryStorage::new();
        assert_eq!(store.get_json::<Vec<u32>>("numbers").unwrap(), None);
        store.set_json("numbers", &[1u32, 2, 3][..]).unwrap();
        assert_eq!(store.get_json::<Vec<u32>>("numbers").unwrap(), Some(vec![1, 2, 3]));
        store.set_item("numbers", "[1,").unwrap();
        assert!(store.get_json::<Vec<u32>>("numbers").is_err());
    }

    #[test]
    fn storage_kind_names() {
        assert_eq!(StorageKind::from_name("sessionStorage"), Some(StorageKind::Session));
        assert_eq!(StorageKind::from_name("indexedDB"), None);
        assert_eq!(StorageKind::Local.name(), "localStorage");
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn local_storage_is_available() {
        assert!(storage_available(StorageKind::Local));
    }

    #[wasm_bindgen_test]
    fn browser_storage_round_trips_items() {
        let storage = BrowserStorage::open(StorageKind::Session).unwrap();
        storage.set_item("browser_test_key", "42").unwrap();
        assert_eq!(storage.get_item("browser_test_key").unwrap().as_deref(), Some("42"));
        storage.remove_item("browser_test_key").unwrap();
        assert_eq!(storage.get_item("browser_test_key").unwrap(), None);
    }
}
