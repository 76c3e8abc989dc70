//! Compiled module interfaces.
//!
//! An interface is the compiler-produced summary of a module's public
//! surface, sufficient for any dependent to compile against. The driver
//! treats the payload as opaque bytes: the encoding belongs to the compiler
//! collaborator and is persisted verbatim, one file per module.

use std::fmt;
use std::sync::Arc;

/// Opaque compiled interface of one module.
///
/// Immutable and cheap to clone; the scheduler hands snapshots of these to
/// worker threads without copying the payload.
#[derive(Clone, PartialEq, Eq)]
pub struct Interface {
    bytes: Arc<[u8]>,
}

impl Interface {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into().into(),
        }
    }

    /// Synthetic interface carried by native modules.
    ///
    /// Native modules are never compiled, so they have no real interface;
    /// an empty payload keeps the readiness partition uniform.
    pub fn native() -> Self {
        Self::from_bytes(Vec::new())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Interface({} bytes)", self.bytes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clone_shares_payload() {
        let iface = Interface::from_bytes(b"exposed: main".to_vec());
        let copy = iface.clone();
        assert_eq!(iface, copy);
        assert_eq!(copy.as_bytes(), b"exposed: main");
    }

    #[test]
    fn native_is_empty() {
        assert!(Interface::native().is_empty());
    }
}
