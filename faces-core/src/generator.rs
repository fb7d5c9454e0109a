//! Face Generator - Single Entry Point
//!
//! `generate` is pure: same seed and catalog, byte-identical document.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::catalog::{TraitCatalog, TraitCategory};
use crate::hashing::SeedDigest;
use crate::render::{Element, Node, SvgDocument};
use crate::validation::validate_catalog;

pub const SVG_CONTENT_TYPE: &str = "image/svg+xml";
pub const DEFAULT_SEED: &str = "default";

pub const CANVAS_WIDTH: u32 = 100;
pub const CANVAS_HEIGHT: u32 = 120;

const LABEL_STYLE: &str = "text { font-family: sans-serif; font-weight: bold; fill: #333333; }";
const TOP_LABEL: &str = "USA";
const BOTTOM_LABEL: &str = "FOREVER";

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("Invalid trait catalog: {0}")]
    InvalidCatalog(String),
}

/// Variant index chosen for each category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TraitSelection {
    pub background: usize,
    pub face_color: usize,
    pub head: usize,
    pub eyes: usize,
    pub mouth: usize,
    pub accessory: usize,
}

impl TraitSelection {
    /// `digest[byte] % len` per category.
    ///
    /// Lengths that do not divide 256 favor low indices slightly. Changing
    /// that would remap every existing seed, so it stays.
    ///
    /// `catalog` must have passed validation; an empty table panics here,
    /// which is why only `FaceGenerator` reaches it.
    pub(crate) fn from_digest(digest: &SeedDigest, catalog: &TraitCatalog) -> Self {
        let pick = |category: TraitCategory| {
            digest.byte(category.digest_byte()) as usize % catalog.table(category).len()
        };
        Self {
            background: pick(TraitCategory::Background),
            face_color: pick(TraitCategory::FaceColor),
            head: pick(TraitCategory::Head),
            eyes: pick(TraitCategory::Eyes),
            mouth: pick(TraitCategory::Mouth),
            accessory: pick(TraitCategory::Accessory),
        }
    }

    pub fn index(&self, category: TraitCategory) -> usize {
        match category {
            TraitCategory::Background => self.background,
            TraitCategory::FaceColor => self.face_color,
            TraitCategory::Head => self.head,
            TraitCategory::Eyes => self.eyes,
            TraitCategory::Mouth => self.mouth,
            TraitCategory::Accessory => self.accessory,
        }
    }
}

/// A derived face. Recomputed per request, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Face {
    pub seed: String,
    pub digest: SeedDigest,
    pub traits: TraitSelection,
}

/// The generator - owns a shared, validated catalog
#[derive(Debug, Clone)]
pub struct FaceGenerator {
    catalog: Arc<TraitCatalog>,
}

impl FaceGenerator {
    /// Refuses catalogs with error-level violations (e.g. an empty table).
    pub fn new(catalog: Arc<TraitCatalog>) -> Result<Self, GeneratorError> {
        let validation = validate_catalog(&catalog);
        if !validation.valid {
            return Err(GeneratorError::InvalidCatalog(validation.summary()));
        }
        Ok(Self { catalog })
    }

    pub fn standard() -> Self {
        Self { catalog: Arc::new(TraitCatalog::standard()) }
    }

    pub fn catalog(&self) -> &TraitCatalog {
        &self.catalog
    }

    pub fn derive(&self, seed: &str) -> Face {
        let digest = SeedDigest::of(seed);
        let traits = TraitSelection::from_digest(&digest, &self.catalog);
        let digest_hex = digest.to_hex();
        debug!(digest = %&digest_hex[..12], ?traits, "derived face");
        Face { seed: seed.to_string(), digest, traits }
    }

    /// Derive and render in one step
    pub fn generate(&self, seed: &str) -> String {
        self.render(&self.derive(seed))
    }

    pub fn render(&self, face: &Face) -> String {
        let variant = |category: TraitCategory| {
            self.catalog
                .table(category)
                .get(face.traits.index(category))
                .unwrap_or_default()
                .to_string()
        };

        let mut doc = SvgDocument::new(CANVAS_WIDTH, CANVAS_HEIGHT);
        doc.push(Element::new("style").text(LABEL_STYLE))
            .push(Element::new("rect")
                .attr("width", "100%")
                .attr("height", "100%")
                .attr("fill", variant(TraitCategory::Background)))
            .push(Element::new("rect")
                .attr("x", "2")
                .attr("y", "2")
                .attr("width", "96")
                .attr("height", "116")
                .attr("fill", "none")
                .attr("stroke", "#666")
                .attr("stroke-width", "0.5")
                .attr("stroke-dasharray", "2 2"))
            .push(Element::new("text")
                .attr("x", "5")
                .attr("y", "12")
                .attr("font-size", "8")
                .text(TOP_LABEL))
            .push(Element::new("text")
                .attr("x", "50")
                .attr("y", "115")
                .attr("font-size", "10")
                .attr("text-anchor", "middle")
                .text(BOTTOM_LABEL));

        doc.comment("Face (Head)")
            .push(Element::new("g")
                .attr("fill", variant(TraitCategory::FaceColor))
                .child(Node::Markup(variant(TraitCategory::Head))));
        doc.comment("Eyes").markup(variant(TraitCategory::Eyes));
        doc.comment("Mouth").markup(variant(TraitCategory::Mouth));
        doc.comment("Accessory").markup(variant(TraitCategory::Accessory));
        doc.comment(format!("seed:{}", face.seed));

        doc.render()
    }
}

impl Default for FaceGenerator {
    fn default() -> Self {
        Self::standard()
    }
}
