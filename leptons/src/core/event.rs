//! In-memory event store: labelled products of one collision event.
//!
//! Modules only see events through [`EventStore`] (read by label) and
//! [`EventSink`] (put a new product), so they can run against any store.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::error::{ModuleError, ModuleResult};
use crate::core::types::{BeamSpot, Lepton, Muon, Vertex};

/// Identity of a recorded event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId {
    pub run: u32,
    pub lumi: u32,
    pub event: u64,
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.run, self.lumi, self.event)
    }
}

/// Anything an event can hold under a label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Product {
    Muons(Vec<Muon>),
    Electrons(Vec<Lepton>),
    Taus(Vec<Lepton>),
    BeamSpot(BeamSpot),
    Vertices(Vec<Vertex>),
}

impl Product {
    pub fn kind(&self) -> ProductKind {
        match self {
            Product::Muons(_) => ProductKind::Muons,
            Product::Electrons(_) => ProductKind::Electrons,
            Product::Taus(_) => ProductKind::Taus,
            Product::BeamSpot(_) => ProductKind::BeamSpot,
            Product::Vertices(_) => ProductKind::Vertices,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductKind {
    Muons,
    Electrons,
    Taus,
    BeamSpot,
    Vertices,
}

impl fmt::Display for ProductKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProductKind::Muons => "muons",
            ProductKind::Electrons => "electrons",
            ProductKind::Taus => "taus",
            ProductKind::BeamSpot => "beam_spot",
            ProductKind::Vertices => "vertices",
        };
        f.write_str(name)
    }
}

/// Read-only lookup of event products by label.
pub trait EventStore {
    fn product(&self, label: &str) -> Option<&Product>;

    /// Look up `label`, failing if it is absent.
    fn require(&self, label: &str) -> ModuleResult<&Product> {
        self.product(label).ok_or_else(|| ModuleError::MissingProduct {
            label: label.to_string(),
        })
    }

    fn muons(&self, label: &str) -> ModuleResult<&[Muon]> {
        match self.require(label)? {
            Product::Muons(muons) => Ok(muons.as_slice()),
            other => Err(wrong_type(label, ProductKind::Muons, other)),
        }
    }

    fn electrons(&self, label: &str) -> ModuleResult<&[Lepton]> {
        match self.require(label)? {
            Product::Electrons(electrons) => Ok(electrons.as_slice()),
            other => Err(wrong_type(label, ProductKind::Electrons, other)),
        }
    }

    fn taus(&self, label: &str) -> ModuleResult<&[Lepton]> {
        match self.require(label)? {
            Product::Taus(taus) => Ok(taus.as_slice()),
            other => Err(wrong_type(label, ProductKind::Taus, other)),
        }
    }

    fn beam_spot(&self, label: &str) -> ModuleResult<&BeamSpot> {
        match self.require(label)? {
            Product::BeamSpot(beam_spot) => Ok(beam_spot),
            other => Err(wrong_type(label, ProductKind::BeamSpot, other)),
        }
    }

    fn vertices(&self, label: &str) -> ModuleResult<&[Vertex]> {
        match self.require(label)? {
            Product::Vertices(vertices) => Ok(vertices.as_slice()),
            other => Err(wrong_type(label, ProductKind::Vertices, other)),
        }
    }
}

/// Destination for products created while processing an event.
pub trait EventSink {
    /// Store `product` under `label`, replacing any previous product.
    fn put(&mut self, label: &str, product: Product);
}

fn wrong_type(label: &str, expected: ProductKind, found: &Product) -> ModuleError {
    ModuleError::WrongProductType {
        label: label.to_string(),
        expected,
        found: found.kind(),
    }
}

/// One recorded event with its products.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    #[serde(default)]
    pub products: BTreeMap<String, Product>,
    /// Path decision; unset until the event has been processed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepted: Option<bool>,
}

impl Event {
    pub fn new(id: EventId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn with_product(mut self, label: &str, product: Product) -> Self {
        self.put(label, product);
        self
    }
}

impl EventStore for Event {
    fn product(&self, label: &str) -> Option<&Product> {
        self.products.get(label)
    }
}

impl EventSink for Event {
    fn put(&mut self, label: &str, product: Product) {
        self.products.insert(label.to_string(), product);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event() -> Event {
        Event::new(EventId {
            run: 1,
            lumi: 2,
            event: 3,
        })
        .with_product("muons", Product::Muons(vec![Muon::default()]))
        .with_product("bs", Product::BeamSpot(BeamSpot::default()))
    }

    #[test]
    fn typed_lookup_returns_product() {
        let event = event();
        assert_eq!(event.muons("muons").expect("muons").len(), 1);
        assert_eq!(event.beam_spot("bs").expect("bs"), &BeamSpot::default());
    }

    #[test]
    fn missing_label_names_the_label() {
        let err = event().vertices("offlinePrimaryVertices").expect_err("missing");
        assert_eq!(
            err,
            ModuleError::MissingProduct {
                label: "offlinePrimaryVertices".to_string()
            }
        );
        assert!(err.to_string().contains("offlinePrimaryVertices"));
    }

    #[test]
    fn wrong_type_reports_both_kinds() {
        let err = event().electrons("muons").expect_err("wrong type");
        assert_eq!(
            err.to_string(),
            "input 'muons' holds muons, expected electrons"
        );
    }

    #[test]
    fn put_replaces_existing_product() {
        let mut event = event();
        event.put("muons", Product::Muons(Vec::new()));
        assert!(event.muons("muons").expect("muons").is_empty());
    }

    #[test]
    fn event_id_displays_run_lumi_event() {
        assert_eq!(event().id.to_string(), "1:2:3");
    }
}
