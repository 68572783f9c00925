//! Hash map aliases backed by `ahash`.
//!
//! Document handles are hashed on every adjacency lookup during a
//! traversal, so the default SipHash is swapped for aHash everywhere.

/// A `hashbrown` map using aHash.
pub type FastHashMap<K, V> = hashbrown::HashMap<K, V, ahash::RandomState>;

/// A `hashbrown` set using aHash.
pub type FastHashSet<T> = hashbrown::HashSet<T, ahash::RandomState>;
