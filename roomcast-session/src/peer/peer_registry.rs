use crate::engine::NegotiationEngine;
use crate::peer::PeerEntry;
use roomcast_core::SessionKey;
use std::collections::BTreeMap;

/// Peer entries keyed by remote session key, iterated in key order.
pub struct PeerRegistry<E: NegotiationEngine> {
    peers: BTreeMap<SessionKey, PeerEntry<E>>,
    next_generation: u64,
}

impl<E: NegotiationEngine> PeerRegistry<E> {
    pub fn new() -> Self {
        Self {
            peers: BTreeMap::new(),
            next_generation: 0,
        }
    }

    /// Reserves the generation for an entry about to be created.
    pub fn next_generation(&mut self) -> u64 {
        self.next_generation += 1;
        self.next_generation
    }

    pub fn insert(&mut self, entry: PeerEntry<E>) -> Option<PeerEntry<E>> {
        self.peers.insert(entry.session_key().clone(), entry)
    }

    pub fn get(&self, key: &SessionKey) -> Option<&PeerEntry<E>> {
        self.peers.get(key)
    }

    pub fn get_mut(&mut self, key: &SessionKey) -> Option<&mut PeerEntry<E>> {
        self.peers.get_mut(key)
    }

    /// Entry for `key` if it was created with `generation`.
    pub fn get_current(&mut self, key: &SessionKey, generation: u64) -> Option<&mut PeerEntry<E>> {
        self.peers
            .get_mut(key)
            .filter(|entry| entry.generation() == generation)
    }

    pub fn remove(&mut self, key: &SessionKey) -> Option<PeerEntry<E>> {
        self.peers.remove(key)
    }

    pub fn contains(&self, key: &SessionKey) -> bool {
        self.peers.contains_key(key)
    }

    pub fn keys(&self) -> Vec<SessionKey> {
        self.peers.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}

impl<E: NegotiationEngine> Default for PeerRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}
