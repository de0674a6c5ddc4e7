//! # Key to Variable Registry

use std::{borrow::Borrow, hash::Hash};

use crate::types::{RsHashMap, Var};

use super::{BasicVarManager, ManageVars};

/// Maps keys to variables. Every newly registered key gets the next free
/// variable, so variables follow registration order and are never reused.
#[derive(Debug, Clone)]
pub struct Registry<K> {
    ids: RsHashMap<K, Var>,
    keys: Vec<K>,
    var_manager: BasicVarManager,
}

impl<K> Default for Registry<K> {
    fn default() -> Self {
        Registry {
            ids: RsHashMap::default(),
            keys: vec![],
            var_manager: BasicVarManager::default(),
        }
    }
}

impl<K> Registry<K>
where
    K: Hash + Eq + Clone,
{
    /// Creates an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a key and returns its new variable
    ///
    /// # Errors
    ///
    /// If the key is already registered, its existing variable is returned as
    /// the error value.
    pub fn register(&mut self, key: K) -> Result<Var, Var> {
        if let Some(&var) = self.ids.get(&key) {
            return Err(var);
        }
        let var = self.var_manager.new_var();
        self.ids.insert(key.clone(), var);
        self.keys.push(key);
        Ok(var)
    }

    /// Looks up the variable of a key
    pub fn get<Q>(&self, key: &Q) -> Option<Var>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.ids.get(key).copied()
    }

    /// Looks up the key of a variable
    #[must_use]
    pub fn key(&self, var: Var) -> Option<&K> {
        self.keys.get(var.idx())
    }

    /// Gets the number of registered keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Checks whether no key is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Iterates over keys and their variables in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&K, Var)> {
        self.keys.iter().zip(0u32..).map(|(k, idx)| (k, Var::new(idx)))
    }

    /// Gets a copy of the variable manager, to continue allocating variables
    /// after the registered ones
    #[must_use]
    pub fn var_manager(&self) -> BasicVarManager {
        self.var_manager
    }
}
