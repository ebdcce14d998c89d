use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Global string interner for node references.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Opaque handle to a node in the host document.
///
/// This is the only thing that crosses the message channel: callers see the
/// string form, the engine compares interned `Spur`s (4 bytes, Copy, O(1) Hash).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef(Spur);

impl NodeRef {
    /// Intern a host-issued id string, or return the existing handle.
    pub fn intern(s: &str) -> Self {
        NodeRef(INTERNER.get_or_intern(s))
    }

    /// Look up an id without interning it. Unknown strings were never issued
    /// by any host in this process, so they cannot name a live node.
    pub fn lookup(s: &str) -> Option<Self> {
        INTERNER.get(s).map(NodeRef)
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// Issue a fresh id in the host's `<session>:<counter>` shape.
    pub fn issue(session: u32) -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        Self::intern(&format!("{session}:{n}"))
    }
}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeRef({})", self.as_str())
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NodeRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(NodeRef::intern(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_roundtrip() {
        let a = NodeRef::intern("12:34");
        let b = NodeRef::intern("12:34");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "12:34");
    }

    #[test]
    fn issued_ids_are_unique() {
        let a = NodeRef::issue(1);
        let b = NodeRef::issue(1);
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("1:"));
    }

    #[test]
    fn lookup_does_not_intern() {
        assert!(NodeRef::lookup("never-issued-zz").is_none());
        let r = NodeRef::intern("issued-zz");
        assert_eq!(NodeRef::lookup("issued-zz"), Some(r));
    }

    #[test]
    fn serializes_as_plain_string() {
        let r = NodeRef::intern("7:1");
        assert_eq!(serde_json::to_string(&r).unwrap(), "\"7:1\"");
        let back: NodeRef = serde_json::from_str("\"7:1\"").unwrap();
        assert_eq!(back, r);
    }
}
