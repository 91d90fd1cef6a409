//! Property datatype registry
//!
//! An in-memory map from property id to datatype, seeded from the embedded
//! snapshot at construction. Misses go to the [`RemoteResolver`]; lookup
//! failures are logged and degrade to "datatype unknown", never to an error
//! for the caller.
//!
//! Single-threaded by design: lookups take `&mut self` and block on the
//! network. Share across threads with one registry per worker or an
//! external lock.

use std::collections::HashMap;
use std::io::{Read, Write};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::config::RegistryConfig;
use crate::datatype::DatatypeId;
use crate::error::{FetchError, SnapshotError};
use crate::fetcher::{HttpFetcher, WebResourceFetcher};
use crate::property_id::PropertyId;
use crate::resolver::RemoteResolver;
use crate::snapshot::{read_snapshot, seed_entries, write_snapshot};
use crate::value::{Value, ValueKind};

/// Stored outcome for a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "datatype", rename_all = "snake_case")]
pub enum TypeLookup {
    Known(DatatypeId),
    /// Looked up remotely and the lookup failed
    Unresolved,
}

impl TypeLookup {
    pub fn datatype(self) -> Option<DatatypeId> {
        match self {
            TypeLookup::Known(datatype) => Some(datatype),
            TypeLookup::Unresolved => None,
        }
    }
}

pub struct PropertyTypes {
    types: HashMap<PropertyId, TypeLookup>,
    resolver: RemoteResolver,
    cache_failures: bool,
    last_registered: Option<PropertyId>,
}

impl PropertyTypes {
    /// Registry against the public API with default settings
    pub fn new() -> Result<Self, FetchError> {
        Self::with_config(RegistryConfig::default())
    }

    /// Registry using a reqwest-backed fetcher built from `config`
    pub fn with_config(config: RegistryConfig) -> Result<Self, FetchError> {
        let fetcher = HttpFetcher::from_config(&config)?;
        Ok(Self::with_fetcher(config, Box::new(fetcher)))
    }

    pub fn with_fetcher(config: RegistryConfig, fetcher: Box<dyn WebResourceFetcher>) -> Self {
        let types: HashMap<PropertyId, TypeLookup> = seed_entries()
            .into_iter()
            .map(|(property, datatype)| (property, TypeLookup::Known(datatype)))
            .collect();
        debug!(entries = types.len(), "Loaded seed snapshot");

        Self {
            types,
            resolver: RemoteResolver::new(config.api_url, fetcher),
            cache_failures: config.cache_failures,
            last_registered: None,
        }
    }

    pub fn api_url(&self) -> &str {
        self.resolver.api_url()
    }

    /// Datatype of `property`, looking it up online on a cache miss.
    ///
    /// Returns `None` when the lookup fails; the failure is logged. With
    /// `cache_failures` the failure is remembered and not retried.
    pub fn get_type(&mut self, property: &PropertyId) -> Option<DatatypeId> {
        if let Some(entry) = self.types.get(property) {
            return entry.datatype();
        }

        match self.resolver.resolve(property) {
            Ok(datatype) => {
                self.types
                    .insert(property.clone(), TypeLookup::Known(datatype));
                Some(datatype)
            }
            Err(e) => {
                error!(property = %property, error = %e, "Failed to resolve property datatype");
                if self.cache_failures {
                    self.types.insert(property.clone(), TypeLookup::Unresolved);
                }
                None
            }
        }
    }

    /// Look `property` up online even when it is cached and store the answer.
    ///
    /// A failed lookup keeps whatever entry was there and returns `None`.
    pub fn refresh(&mut self, property: &PropertyId) -> Option<DatatypeId> {
        match self.resolver.resolve(property) {
            Ok(datatype) => {
                self.set_type(property, datatype);
                Some(datatype)
            }
            Err(e) => {
                error!(property = %property, error = %e, "Failed to refresh property datatype");
                if self.cache_failures && !self.types.contains_key(property) {
                    self.types.insert(property.clone(), TypeLookup::Unresolved);
                }
                None
            }
        }
    }

    /// Overwrite the stored datatype unconditionally
    pub fn set_type(&mut self, property: &PropertyId, datatype: DatatypeId) {
        self.types
            .insert(property.clone(), TypeLookup::Known(datatype));
    }

    /// Datatype `property` should have given a value it carries.
    ///
    /// Every kind except textual determines the datatype on its own. Textual
    /// values may be STRING, URL or COMMONS_MEDIA, so the registry is
    /// consulted, defaulting to STRING.
    pub fn infer_type_from_value(&mut self, property: &PropertyId, value: &Value) -> DatatypeId {
        let datatype = match value.kind() {
            ValueKind::EntityReference => DatatypeId::Item,
            ValueKind::GlobeCoordinates => DatatypeId::GlobeCoordinates,
            ValueKind::Quantity => DatatypeId::Quantity,
            ValueKind::PointInTime => DatatypeId::Time,
            ValueKind::Textual => {
                return self.get_type(property).unwrap_or(DatatypeId::String);
            }
        };

        self.record_inferred(property, datatype);
        datatype
    }

    /// Known entries win over inference; only absent or unresolved ones are filled
    fn record_inferred(&mut self, property: &PropertyId, datatype: DatatypeId) {
        match self.types.get(property) {
            Some(TypeLookup::Known(existing)) => {
                if *existing != datatype {
                    warn!(
                        property = %property,
                        declared = %existing,
                        inferred = %datatype,
                        "Value kind disagrees with declared datatype"
                    );
                }
            }
            Some(TypeLookup::Unresolved) | None => {
                debug!(property = %property, datatype = %datatype, "Recording inferred datatype");
                self.types
                    .insert(property.clone(), TypeLookup::Known(datatype));
            }
        }
    }

    /// Remember `property` as the one currently being processed
    pub fn register(&mut self, property: &PropertyId) {
        self.last_registered = Some(property.clone());
    }

    pub fn last_registered(&self) -> Option<&PropertyId> {
        self.last_registered.as_ref()
    }

    /// Stored entry for `property` without triggering a lookup.
    ///
    /// `None` means the property has never been looked up.
    pub fn cached(&self, property: &PropertyId) -> Option<TypeLookup> {
        self.types.get(property).copied()
    }

    /// Number of stored entries, unresolved ones included
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn known_types(&self) -> impl Iterator<Item = (&PropertyId, DatatypeId)> + '_ {
        self.types
            .iter()
            .filter_map(|(property, entry)| entry.datatype().map(|dt| (property, dt)))
    }

    /// Write all known entries as a reloadable snapshot, ordered by numeric id.
    ///
    /// Unresolved entries carry no datatype and are skipped with a warning.
    pub fn export_snapshot<W: Write + ?Sized>(&self, sink: &mut W) -> Result<usize, SnapshotError> {
        for (property, entry) in &self.types {
            if *entry == TypeLookup::Unresolved {
                warn!(property = %property, "Skipping unresolved property in snapshot export");
            }
        }

        write_snapshot(sink, self.known_types())
    }

    /// Merge a snapshot into the registry, overwriting existing entries
    pub fn load_snapshot<R: Read>(&mut self, reader: R) -> Result<usize, SnapshotError> {
        let entries = read_snapshot(reader)?;
        let count = entries.len();
        for (property, datatype) in entries {
            self.types.insert(property, TypeLookup::Known(datatype));
        }
        debug!(entries = count, "Merged snapshot");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::OfflineFetcher;
    use rust_decimal::Decimal;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Answers every request with the same body and counts calls
    struct CountingFetcher {
        body: &'static str,
        calls: Arc<AtomicUsize>,
    }

    impl WebResourceFetcher for CountingFetcher {
        fn fetch(&self, _url: &str) -> Result<Vec<u8>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.body.as_bytes().to_vec())
        }
    }

    fn registry_with(body: &'static str, config: RegistryConfig) -> (PropertyTypes, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let fetcher = CountingFetcher {
            body,
            calls: Arc::clone(&calls),
        };
        (PropertyTypes::with_fetcher(config, Box::new(fetcher)), calls)
    }

    fn offline() -> PropertyTypes {
        PropertyTypes::with_fetcher(RegistryConfig::default(), Box::new(OfflineFetcher))
    }

    fn pid(s: &str) -> PropertyId {
        s.parse().unwrap()
    }

    #[test]
    fn test_seeded_lookup_does_not_fetch() {
        let (mut registry, calls) = registry_with("{}", RegistryConfig::default());
        assert_eq!(registry.get_type(&pid("P31")), Some(DatatypeId::Item));
        assert_eq!(registry.get_type(&pid("P625")), Some(DatatypeId::GlobeCoordinates));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_remote_result_is_memoized() {
        let (mut registry, calls) = registry_with(
            r#"{"entities":{"P2":{"datatype":"url"}}}"#,
            RegistryConfig::default(),
        );
        assert_eq!(registry.cached(&pid("P2")), None);
        assert_eq!(registry.get_type(&pid("P2")), Some(DatatypeId::Url));
        assert_eq!(registry.get_type(&pid("P2")), Some(DatatypeId::Url));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            registry.cached(&pid("P2")),
            Some(TypeLookup::Known(DatatypeId::Url))
        );
    }

    #[test]
    fn test_failure_is_cached_as_unresolved() {
        let (mut registry, calls) = registry_with(
            r#"{"entities":{"P2":{"datatype":"nonsense-type"}}}"#,
            RegistryConfig::default(),
        );
        assert_eq!(registry.get_type(&pid("P2")), None);
        assert_eq!(registry.get_type(&pid("P2")), None);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(registry.cached(&pid("P2")), Some(TypeLookup::Unresolved));
    }

    #[test]
    fn test_failure_retried_when_not_caching_failures() {
        let (mut registry, calls) = registry_with(
            "<html>maintenance</html>",
            RegistryConfig::default().with_cache_failures(false),
        );
        assert_eq!(registry.get_type(&pid("P2")), None);
        assert_eq!(registry.get_type(&pid("P2")), None);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(registry.cached(&pid("P2")), None);
    }

    #[test]
    fn test_set_type_overrides_seed() {
        let mut registry = offline();
        registry.set_type(&pid("P31"), DatatypeId::Time);
        registry.set_type(&pid("P999"), DatatypeId::Time);
        assert_eq!(registry.get_type(&pid("P31")), Some(DatatypeId::Time));
        assert_eq!(registry.get_type(&pid("P999")), Some(DatatypeId::Time));
    }

    #[test]
    fn test_set_type_overrides_unresolved() {
        let mut registry = offline();
        assert_eq!(registry.get_type(&pid("P999")), None);
        registry.set_type(&pid("P999"), DatatypeId::Quantity);
        assert_eq!(registry.get_type(&pid("P999")), Some(DatatypeId::Quantity));
    }

    #[test]
    fn test_refresh_refetches_seeded_property() {
        let (mut registry, calls) = registry_with(
            r#"{"entities":{"P31":{"datatype":"string"}}}"#,
            RegistryConfig::default(),
        );
        assert_eq!(registry.refresh(&pid("P31")), Some(DatatypeId::String));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(registry.get_type(&pid("P31")), Some(DatatypeId::String));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_refresh_keeps_existing_entry() {
        let mut registry = offline();
        assert_eq!(registry.refresh(&pid("P31")), None);
        assert_eq!(registry.cached(&pid("P31")), Some(TypeLookup::Known(DatatypeId::Item)));

        assert_eq!(registry.refresh(&pid("P999")), None);
        assert_eq!(registry.cached(&pid("P999")), Some(TypeLookup::Unresolved));
    }

    #[test]
    fn test_registry_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<PropertyTypes>();
        assert_send::<RemoteResolver>();
    }

    #[test]
    fn test_registry_behind_lock_on_worker_thread() {
        let (registry, calls) = registry_with(
            r#"{"entities":{"P2":{"datatype":"time"}}}"#,
            RegistryConfig::default(),
        );
        let shared = Arc::new(Mutex::new(registry));

        let worker = {
            let shared = Arc::clone(&shared);
            std::thread::spawn(move || {
                let mut registry = shared.lock().unwrap();
                registry.get_type(&pid("P2"))
            })
        };
        assert_eq!(worker.join().unwrap(), Some(DatatypeId::Time));

        assert_eq!(shared.lock().unwrap().get_type(&pid("P2")), Some(DatatypeId::Time));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_infer_fixed_kinds() {
        let mut registry = offline();
        let property = pid("P5");
        assert_eq!(
            registry.infer_type_from_value(&property, &Value::coordinates(1.0, 2.0, 0.1)),
            DatatypeId::GlobeCoordinates
        );
        assert_eq!(
            registry.infer_type_from_value(&property, &Value::entity("Q1")),
            DatatypeId::Item
        );
        assert_eq!(
            registry.infer_type_from_value(&property, &Value::quantity(Decimal::ONE)),
            DatatypeId::Quantity
        );
        assert_eq!(
            registry.infer_type_from_value(&property, &Value::date(2000, 1, 1)),
            DatatypeId::Time
        );
    }

    #[test]
    fn test_infer_records_only_when_unknown() {
        let mut registry = offline();
        registry.infer_type_from_value(&pid("P5"), &Value::coordinates(1.0, 2.0, 0.1));
        assert_eq!(
            registry.cached(&pid("P5")),
            Some(TypeLookup::Known(DatatypeId::GlobeCoordinates))
        );

        // P31 is seeded as ITEM and stays that way
        assert_eq!(
            registry.infer_type_from_value(&pid("P31"), &Value::date(2000, 1, 1)),
            DatatypeId::Time
        );
        assert_eq!(registry.cached(&pid("P31")), Some(TypeLookup::Known(DatatypeId::Item)));
    }

    #[test]
    fn test_infer_textual_consults_registry() {
        let mut registry = offline();
        registry.set_type(&pid("P999"), DatatypeId::Url);
        assert_eq!(
            registry.infer_type_from_value(&pid("P999"), &Value::string("https://example.org")),
            DatatypeId::Url
        );
        assert_eq!(
            registry.infer_type_from_value(&pid("P18"), &Value::string("Berlin.jpg")),
            DatatypeId::CommonsMedia
        );
        assert_eq!(
            registry.infer_type_from_value(&pid("P3"), &Value::string("plain")),
            DatatypeId::String
        );
        // the STRING default is a guess and is not stored
        assert_eq!(registry.cached(&pid("P3")), Some(TypeLookup::Unresolved));
    }

    #[test]
    fn test_register_overwrites_slot() {
        let mut registry = offline();
        assert!(registry.last_registered().is_none());
        registry.register(&pid("P31"));
        registry.register(&pid("P279"));
        assert_eq!(registry.last_registered(), Some(&pid("P279")));
    }

    #[test]
    fn test_export_orders_numerically_and_skips_unresolved() {
        let mut registry = offline();
        registry.types.clear();
        registry.set_type(&pid("P9"), DatatypeId::Item);
        registry.set_type(&pid("P10"), DatatypeId::String);
        registry.set_type(&pid("P2"), DatatypeId::Time);
        assert_eq!(registry.get_type(&pid("P4")), None);

        let mut out = Vec::new();
        assert_eq!(registry.export_snapshot(&mut out).unwrap(), 3);
        let text = String::from_utf8(out).unwrap();
        let body: Vec<&str> = text.lines().filter(|l| !l.starts_with('#')).collect();
        assert_eq!(body, vec!["P2\tTIME", "P9\tITEM", "P10\tSTRING"]);
    }

    #[test]
    fn test_load_snapshot_merges() {
        let mut registry = offline();
        let before = registry.len();
        let merged = registry
            .load_snapshot("P31\tSTRING\nP5000000\tURL\n".as_bytes())
            .unwrap();
        assert_eq!(merged, 2);
        assert_eq!(registry.len(), before + 1);
        assert_eq!(registry.get_type(&pid("P31")), Some(DatatypeId::String));
        assert_eq!(registry.get_type(&pid("P5000000")), Some(DatatypeId::Url));
    }

    #[test]
    fn test_load_snapshot_rejects_malformed() {
        let mut registry = offline();
        let err = registry.load_snapshot("P31\tITEM\nbroken\n".as_bytes()).unwrap_err();
        assert!(matches!(err, SnapshotError::Malformed { line: 2, .. }));
    }

    #[test]
    fn test_type_lookup_serde() {
        let json = serde_json::to_string(&TypeLookup::Known(DatatypeId::Url)).unwrap();
        assert_eq!(json, r#"{"status":"known","datatype":"URL"}"#);
        let json = serde_json::to_string(&TypeLookup::Unresolved).unwrap();
        assert_eq!(json, r#"{"status":"unresolved"}"#);
    }
}
