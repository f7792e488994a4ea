//! Name-to-kind registry for argument types found in annotations.
//!
//! Secondary annotations name each argument by its generator type, usually
//! namespace-qualified (`wpp::UInt32Item`, `struct wpp::StringItem`). The
//! catalog strips the qualification and resolves the bare name.

use super::kind::TraceItemKind;
use crate::utils::error::TraceItemError;
use log::debug;
use std::collections::HashMap;

/// Registry of known argument kinds
///
/// **Public** - the correlator resolves every argument through one of these
#[derive(Debug, Clone)]
pub struct TraceItemCatalog {
    kinds: HashMap<String, TraceItemKind>,
}

impl TraceItemCatalog {
    /// Catalog with every built-in kind registered under its generator name
    pub fn new() -> Self {
        let kinds = TraceItemKind::ALL
            .iter()
            .map(|kind| (kind.registered_name().to_string(), *kind))
            .collect();

        Self { kinds }
    }

    /// Register an additional name for a kind
    ///
    /// Returns the kind previously registered under that name, if any.
    pub fn register(&mut self, name: impl Into<String>, kind: TraceItemKind) -> Option<TraceItemKind> {
        let name = name.into();
        debug!("Registering trace item name {} as {}", name, kind);
        self.kinds.insert(name, kind)
    }

    /// Resolve an argument type name to its kind
    ///
    /// **Public** - main entry point of the catalog
    ///
    /// # Errors
    /// * `TraceItemError::UnknownKind` - the bare name is not registered
    pub fn resolve(&self, name: &str) -> Result<TraceItemKind, TraceItemError> {
        let bare = strip_namespace(name);
        self.kinds
            .get(bare)
            .copied()
            .ok_or_else(|| TraceItemError::UnknownKind(name.to_string()))
    }

    /// Number of registered names
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl Default for TraceItemCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Drop everything up to the last `::` (and any leading `struct `/`class `)
fn strip_namespace(name: &str) -> &str {
    let name = name.trim();
    let bare = name.rsplit_once("::").map_or(name, |(_, bare)| bare);
    bare.strip_prefix("struct ")
        .or_else(|| bare.strip_prefix("class "))
        .unwrap_or(bare)
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_qualified_names() {
        let catalog = TraceItemCatalog::new();
        assert_eq!(catalog.resolve("wpp::UInt32Item").unwrap(), TraceItemKind::UInt32);
        assert_eq!(
            catalog.resolve("struct wpp::StringItem").unwrap(),
            TraceItemKind::String
        );
        assert_eq!(catalog.resolve("GuidItem").unwrap(), TraceItemKind::Guid);
        assert_eq!(catalog.resolve("class HexDumpItem").unwrap(), TraceItemKind::HexDump);
    }

    #[test]
    fn test_unknown_kind_keeps_original_name() {
        let catalog = TraceItemCatalog::new();
        assert_eq!(
            catalog.resolve("wpp::ByteItem").unwrap_err(),
            TraceItemError::UnknownKind("wpp::ByteItem".to_string())
        );
    }

    #[test]
    fn test_every_kind_is_registered() {
        let catalog = TraceItemCatalog::default();
        assert_eq!(catalog.len(), TraceItemKind::ALL.len());
        for kind in TraceItemKind::ALL {
            assert_eq!(catalog.resolve(kind.registered_name()).unwrap(), kind);
        }
    }

    #[test]
    fn test_register_alias() {
        let mut catalog = TraceItemCatalog::new();
        assert!(catalog.register("ByteItem", TraceItemKind::UInt8).is_none());
        assert_eq!(catalog.resolve("wpp::ByteItem").unwrap(), TraceItemKind::UInt8);
    }

    #[test]
    fn test_floating_point_kinds_resolve() {
        let catalog = TraceItemCatalog::new();
        assert_eq!(catalog.resolve("struct wpp::FloatItem").unwrap(), TraceItemKind::Float);
        assert_eq!(catalog.resolve("DoubleItem").unwrap(), TraceItemKind::Double);
        assert_eq!(
            catalog.resolve("wpp::LongDoubleItem").unwrap(),
            TraceItemKind::LongDouble
        );
    }
}
