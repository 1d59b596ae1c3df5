//! Process-wide memoisation of sentence models
//!
//! Initialising a model means resolving, parsing and compiling a language
//! pack. The registry does that at most once per [`ModelSpec`], including
//! when several streams hit the same spec concurrently, and remembers
//! failures as well as successes.

use super::model::SentenceModel;
use crate::config::TokenizerSettings;
use crate::error::InitError;
use crate::language::{normalize_code, resolve_pack};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

/// Outcome of initialising one model
pub type ModelSlot = Result<Arc<SentenceModel>, InitError>;

/// Key identifying one model initialisation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelSpec {
    pub language: String,
    pub offline: bool,
    pub data_dir: Option<PathBuf>,
}

impl ModelSpec {
    pub fn new(language: &str) -> Self {
        Self {
            language: normalize_code(language),
            offline: false,
            data_dir: None,
        }
    }

    pub fn from_settings(settings: &TokenizerSettings) -> Self {
        Self {
            language: normalize_code(&settings.language),
            offline: settings.offline,
            data_dir: settings.data_dir.clone(),
        }
    }
}

/// Memoising model registry
#[derive(Debug, Default)]
pub struct BackendRegistry {
    slots: Mutex<HashMap<ModelSpec, Arc<OnceLock<ModelSlot>>>>,
    init_count: AtomicUsize,
}

static GLOBAL: OnceLock<BackendRegistry> = OnceLock::new();

impl BackendRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry shared by every stream in the process
    pub fn global() -> &'static BackendRegistry {
        GLOBAL.get_or_init(BackendRegistry::new)
    }

    /// Return the model for `spec`, initialising it on first use
    pub fn get_or_init(&self, spec: &ModelSpec) -> ModelSlot {
        let slot = {
            let mut slots = self.slots.lock();
            Arc::clone(slots.entry(spec.clone()).or_default())
        };

        slot.get_or_init(|| self.initialize(spec)).clone()
    }

    fn initialize(&self, spec: &ModelSpec) -> ModelSlot {
        self.init_count.fetch_add(1, Ordering::SeqCst);
        log::info!(
            "Initializing sentence model '{}' (offline: {})",
            spec.language,
            spec.offline
        );

        match resolve_pack(&spec.language, spec.offline, spec.data_dir.as_deref()) {
            Ok(pack) => Ok(Arc::new(SentenceModel::from_pack(&pack))),
            Err(e) => {
                log::warn!("Sentence model '{}' unavailable: {e}", spec.language);
                Err(e)
            }
        }
    }

    /// Whether `spec` has finished initialising, successfully or not
    pub fn is_initialized(&self, spec: &ModelSpec) -> bool {
        self.slots
            .lock()
            .get(spec)
            .is_some_and(|slot| slot.get().is_some())
    }

    /// Drop every memoised model
    pub fn teardown(&self) {
        let dropped = {
            let mut slots = self.slots.lock();
            std::mem::take(&mut *slots)
        };
        if !dropped.is_empty() {
            log::info!("Released {} sentence model(s)", dropped.len());
        }
    }

    /// Number of initialisations performed so far
    pub fn init_count(&self) -> usize {
        self.init_count.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use tempfile::TempDir;

    #[test]
    fn test_memoises_success() {
        let registry = BackendRegistry::new();
        let spec = ModelSpec::new("english");

        assert!(!registry.is_initialized(&spec));
        let first = registry.get_or_init(&spec).unwrap();
        let second = registry.get_or_init(&spec).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.code(), "en");
        assert_eq!(registry.init_count(), 1);
        assert!(registry.is_initialized(&spec));
    }

    #[test]
    fn test_memoises_failure() {
        let registry = BackendRegistry::new();
        let dir = TempDir::new().unwrap();
        let spec = ModelSpec {
            language: "ru".to_string(),
            offline: true,
            data_dir: Some(dir.path().to_path_buf()),
        };

        for _ in 0..3 {
            assert!(matches!(
                registry.get_or_init(&spec),
                Err(InitError::PackUnavailable { .. })
            ));
        }
        assert_eq!(registry.init_count(), 1);
    }

    #[test]
    fn test_distinct_specs() {
        let registry = BackendRegistry::new();
        registry.get_or_init(&ModelSpec::new("en")).unwrap();
        registry.get_or_init(&ModelSpec::new("ru")).unwrap();
        registry.get_or_init(&ModelSpec::new("EN")).unwrap();
        assert_eq!(registry.init_count(), 2);
    }

    #[test]
    fn test_concurrent_first_use() {
        let registry = Arc::new(BackendRegistry::new());
        let spec = ModelSpec::new("ru");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let spec = spec.clone();
                thread::spawn(move || registry.get_or_init(&spec).is_ok())
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
        assert_eq!(registry.init_count(), 1);
    }

    #[test]
    fn test_teardown_forces_reinit() {
        let registry = BackendRegistry::new();
        let spec = ModelSpec::new("en");

        registry.get_or_init(&spec).unwrap();
        registry.teardown();
        assert!(!registry.is_initialized(&spec));

        registry.get_or_init(&spec).unwrap();
        assert_eq!(registry.init_count(), 2);
    }
}
