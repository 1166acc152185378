//! Type-keyed store behind [`Config`](super::Config)

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{OnceLock, PoisonError, RwLock};

type Entry = Box<dyn Any + Send + Sync>;

/// One instance per config type
#[derive(Default)]
pub struct ConfigRepository {
    configs: HashMap<TypeId, Entry>,
}

impl ConfigRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `config`, replacing any earlier instance of its type
    pub fn register<T: Any + Send + Sync>(&mut self, config: T) {
        self.configs.insert(TypeId::of::<T>(), Box::new(config));
    }

    pub fn get<T: Any + Send + Sync + Clone>(&self) -> Option<T> {
        self.configs.get(&TypeId::of::<T>())?.downcast_ref::<T>().cloned()
    }

    pub fn has<T: Any>(&self) -> bool {
        self.configs.contains_key(&TypeId::of::<T>())
    }
}

fn global() -> &'static RwLock<ConfigRepository> {
    static REPOSITORY: OnceLock<RwLock<ConfigRepository>> = OnceLock::new();
    REPOSITORY.get_or_init(RwLock::default)
}

pub fn register<T: Any + Send + Sync>(config: T) {
    global()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register(config);
}

pub fn get<T: Any + Send + Sync + Clone>() -> Option<T> {
    global().read().unwrap_or_else(PoisonError::into_inner).get::<T>()
}

pub fn has<T: Any>() -> bool {
    global().read().unwrap_or_else(PoisonError::into_inner).has::<T>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_registration_replaces_earlier() {
        let mut repo = ConfigRepository::new();
        repo.register(5u8);
        repo.register(7u8);
        assert_eq!(repo.get::<u8>(), Some(7));
        assert!(!repo.has::<u16>());
    }
}
