use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::util::color::FALLBACK_RGB;

/// Element color palette.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ColorOptions {
    /// Keep the colors supplied with each atom in the record. When false,
    /// every atom is recolored from the palette.
    pub use_record_colors: bool,
    /// RGB color for elements missing from the palette.
    pub fallback: [f32; 3],
    /// Per-element RGB keyed by element symbol (case-sensitive, e.g. `Cl`).
    pub elements: HashMap<String, [f32; 3]>,
}

impl Default for ColorOptions {
    fn default() -> Self {
        let mut elements = HashMap::new();
        let _ = elements.insert("H".to_owned(), [1.0, 1.0, 1.0]);
        let _ = elements.insert("C".to_owned(), [0.1, 0.1, 0.1]);
        let _ = elements.insert("O".to_owned(), [1.0, 0.0, 0.0]);
        let _ = elements.insert("N".to_owned(), [0.0, 0.0, 1.0]);
        let _ = elements.insert("Cl".to_owned(), [0.0, 1.0, 0.0]);
        let _ = elements.insert("Na".to_owned(), [0.5, 0.0, 0.5]);
        let _ = elements.insert("K".to_owned(), [1.0, 0.65, 0.0]);
        let _ = elements.insert("S".to_owned(), [1.0, 1.0, 0.0]);
        let _ = elements.insert("P".to_owned(), [1.0, 0.75, 0.8]);
        let _ = elements.insert("Fe".to_owned(), [0.65, 0.16, 0.16]);

        Self {
            use_record_colors: true,
            fallback: FALLBACK_RGB,
            elements,
        }
    }
}

impl ColorOptions {
    /// Look up the palette color for an element symbol. Falls back to
    /// [`ColorOptions::fallback`].
    #[must_use]
    pub fn element_color(&self, element: &str) -> [f32; 3] {
        self.elements
            .get(element.trim())
            .copied()
            .unwrap_or(self.fallback)
    }
}
