use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::atom::{Atom, AtomId};
use super::ModelError;
use crate::layout::LayoutMap;
use crate::options::ColorOptions;
use crate::util::color;

/// Atom entry as it appears in a reaction record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomDesc {
    /// Atom identifier, e.g. `a1`.
    pub id: String,
    /// Element symbol, e.g. `C`.
    pub element: String,
    /// `#RRGGBB` color; the palette fills in when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Bond entry as it appears in a reaction record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondDesc {
    /// First endpoint atom id.
    pub from_atom: String,
    /// Second endpoint atom id.
    pub to_atom: String,
}

/// Molecule entry as it appears in a reaction record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoleculeDesc {
    /// Display name, e.g. `Ethanol`.
    pub name: String,
    /// Chemical formula, e.g. `C2H6O`.
    #[serde(default)]
    pub formula: String,
    /// Short free-text description.
    #[serde(default)]
    pub description: String,
    /// Atoms in first-seen order.
    pub atoms: Vec<AtomDesc>,
    /// Bonds between atoms of this molecule.
    #[serde(default)]
    pub bonds: Vec<BondDesc>,
}

/// A single (undirected in effect) bond between two atoms of one molecule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bond {
    /// First endpoint.
    pub from: AtomId,
    /// Second endpoint.
    pub to: AtomId,
}

impl Bond {
    /// Create a bond between two atom ids.
    #[must_use]
    pub fn new(from: impl Into<AtomId>, to: impl Into<AtomId>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// A validated molecule: unique atom ids and bonds that only reference
/// atoms of this molecule.
#[derive(Debug, Clone)]
pub struct MolecularStructure {
    /// Display name.
    pub name: String,
    /// Chemical formula, when the record supplied a non-empty one.
    pub formula: Option<String>,
    /// Free-text description, when supplied.
    pub description: Option<String>,
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
    index: FxHashMap<AtomId, usize>,
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_owned())
}

impl MolecularStructure {
    /// Build a structure from atoms and bonds, validating identifiers and
    /// bond endpoints.
    pub fn new(
        name: impl Into<String>,
        atoms: Vec<Atom>,
        bonds: Vec<Bond>,
    ) -> Result<Self, ModelError> {
        let name = name.into();
        let mut index = FxHashMap::default();
        index.reserve(atoms.len());

        for (i, atom) in atoms.iter().enumerate() {
            if atom.id.as_str().is_empty() {
                return Err(ModelError::EmptyAtomId {
                    molecule: name,
                    index: i,
                });
            }
            if index.insert(atom.id.clone(), i).is_some() {
                return Err(ModelError::DuplicateAtom {
                    molecule: name,
                    id: atom.id.to_string(),
                });
            }
        }

        for (i, bond) in bonds.iter().enumerate() {
            for end in [&bond.from, &bond.to] {
                if !index.contains_key(end) {
                    return Err(ModelError::UnknownBondAtom {
                        molecule: name,
                        bond: i,
                        atom: end.to_string(),
                    });
                }
            }
        }

        Ok(Self {
            name,
            formula: None,
            description: None,
            atoms,
            bonds,
            index,
        })
    }

    /// Convert a record entry into a validated structure.
    ///
    /// Atom colors come from the record unless it omits them or
    /// `colors.use_record_colors` is off, in which case the element palette
    /// decides.
    pub fn from_desc(
        desc: &MoleculeDesc,
        colors: &ColorOptions,
    ) -> Result<Self, ModelError> {
        let mut atoms = Vec::with_capacity(desc.atoms.len());
        for a in &desc.atoms {
            let rgb = match a.color.as_deref() {
                Some(hex) if colors.use_record_colors => color::parse_hex(hex)
                    .ok_or_else(|| ModelError::InvalidColor {
                        molecule: desc.name.clone(),
                        atom: a.id.clone(),
                        value: hex.to_owned(),
                    })?,
                _ => colors.element_color(&a.element),
            };
            atoms.push(Atom::new(a.id.trim(), a.element.trim(), rgb));
        }

        let bonds = desc
            .bonds
            .iter()
            .map(|b| Bond::new(b.from_atom.trim(), b.to_atom.trim()))
            .collect();

        let mut mol = Self::new(desc.name.clone(), atoms, bonds)?;
        mol.formula = non_empty(&desc.formula);
        mol.description = non_empty(&desc.description);
        Ok(mol)
    }

    /// Convert back into the record shape, colors as `#RRGGBB`.
    #[must_use]
    pub fn to_desc(&self) -> MoleculeDesc {
        MoleculeDesc {
            name: self.name.clone(),
            formula: self.formula.clone().unwrap_or_default(),
            description: self.description.clone().unwrap_or_default(),
            atoms: self
                .atoms
                .iter()
                .map(|a| AtomDesc {
                    id: a.id.to_string(),
                    element: a.element.clone(),
                    color: Some(color::to_hex(a.color)),
                })
                .collect(),
            bonds: self
                .bonds
                .iter()
                .map(|b| BondDesc {
                    from_atom: b.from.to_string(),
                    to_atom: b.to.to_string(),
                })
                .collect(),
        }
    }

    /// Atoms in first-seen order.
    #[must_use]
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    /// Bonds in record order.
    #[must_use]
    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    /// Look up an atom by id.
    #[must_use]
    pub fn atom(&self, id: &str) -> Option<&Atom> {
        self.index.get(id).map(|&i| &self.atoms[i])
    }

    /// Set an atom's display color. Returns false if the id is unknown.
    pub fn set_color(&mut self, id: &str, rgb: [f32; 3]) -> bool {
        match self.index.get(id) {
            Some(&i) => {
                self.atoms[i].color = rgb;
                true
            }
            None => false,
        }
    }

    /// One color per element in first-seen order; the first atom of an
    /// element decides its color.
    #[must_use]
    pub fn element_colors(&self) -> Vec<(String, [f32; 3])> {
        let mut out: Vec<(String, [f32; 3])> = Vec::new();
        for atom in &self.atoms {
            if !out.iter().any(|(e, _)| *e == atom.element) {
                out.push((atom.element.clone(), atom.color));
            }
        }
        out
    }

    /// Copy positions from a layout into the atoms. Atoms absent from the
    /// layout keep their current position.
    pub fn apply_layout(&mut self, layout: &LayoutMap) {
        for atom in &mut self.atoms {
            if let Some(pos) = layout.get(atom.id.as_str()) {
                atom.position = Some(pos);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desc(json: &str) -> MoleculeDesc {
        serde_json::from_str(json).unwrap()
    }

    const WATER: &str = r##"{
        "name": "Water",
        "formula": "H2O",
        "atoms": [
            {"id": "a1", "element": "O", "color": "#FF0000"},
            {"id": "a2", "element": "H", "color": "#FFFFFF"},
            {"id": "a3", "element": "H"}
        ],
        "bonds": [
            {"from_atom": "a1", "to_atom": "a2"},
            {"from_atom": "a1", "to_atom": "a3"}
        ]
    }"##;

    #[test]
    fn parses_record_colors_and_palette_fallback() {
        let mol =
            MolecularStructure::from_desc(&desc(WATER), &ColorOptions::default())
                .unwrap();
        assert_eq!(mol.name, "Water");
        assert_eq!(mol.formula.as_deref(), Some("H2O"));
        assert_eq!(mol.description, None);
        assert_eq!(mol.atoms().len(), 3);
        assert_eq!(mol.bonds().len(), 2);
        assert_eq!(mol.atom("a1").unwrap().color, [1.0, 0.0, 0.0]);
        // No color in the record: palette white for hydrogen.
        assert_eq!(mol.atom("a3").unwrap().color, [1.0, 1.0, 1.0]);
        assert!(mol.atoms().iter().all(|a| a.position.is_none()));
    }

    #[test]
    fn palette_overrides_record_colors_when_disabled() {
        let colors = ColorOptions {
            use_record_colors: false,
            ..ColorOptions::default()
        };
        let mut d = desc(WATER);
        d.atoms[0].color = Some("#123456".to_owned());
        let mol = MolecularStructure::from_desc(&d, &colors).unwrap();
        assert_eq!(mol.atom("a1").unwrap().color, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn rejects_unknown_bond_endpoint() {
        let mut d = desc(WATER);
        d.bonds.push(BondDesc {
            from_atom: "a2".to_owned(),
            to_atom: "a9".to_owned(),
        });
        let err =
            MolecularStructure::from_desc(&d, &ColorOptions::default())
                .unwrap_err();
        match err {
            ModelError::UnknownBondAtom {
                molecule,
                bond,
                atom,
            } => {
                assert_eq!(molecule, "Water");
                assert_eq!(bond, 2);
                assert_eq!(atom, "a9");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_duplicate_and_empty_ids() {
        let mut d = desc(WATER);
        d.atoms[2].id = "a2".to_owned();
        assert!(matches!(
            MolecularStructure::from_desc(&d, &ColorOptions::default()),
            Err(ModelError::DuplicateAtom { ref id, .. }) if id == "a2"
        ));

        let mut d = desc(WATER);
        d.atoms[1].id = "  ".to_owned();
        assert!(matches!(
            MolecularStructure::from_desc(&d, &ColorOptions::default()),
            Err(ModelError::EmptyAtomId { index: 1, .. })
        ));
    }

    #[test]
    fn rejects_bad_color() {
        let mut d = desc(WATER);
        d.atoms[1].color = Some("white".to_owned());
        let err =
            MolecularStructure::from_desc(&d, &ColorOptions::default())
                .unwrap_err();
        assert!(err.to_string().contains("'white'"));
    }

    #[test]
    fn element_colors_first_seen_wins() {
        let mut mol = MolecularStructure::from_desc(
            &desc(WATER),
            &ColorOptions::default(),
        )
        .unwrap();
        assert!(mol.set_color("a3", [0.0, 1.0, 0.0]));
        assert!(!mol.set_color("zz", [0.0, 1.0, 0.0]));
        let table = mol.element_colors();
        assert_eq!(
            table,
            vec![
                ("O".to_owned(), [1.0, 0.0, 0.0]),
                ("H".to_owned(), [1.0, 1.0, 1.0]),
            ]
        );
    }

    #[test]
    fn to_desc_preserves_structure() {
        let d = desc(WATER);
        let mol =
            MolecularStructure::from_desc(&d, &ColorOptions::default()).unwrap();
        let back = mol.to_desc();
        assert_eq!(back.bonds, d.bonds);
        assert_eq!(back.atoms[2].color.as_deref(), Some("#FFFFFF"));
        assert_eq!(back.formula, "H2O");
    }

    #[test]
    fn apply_layout_positions_every_atom() {
        let mut mol = MolecularStructure::from_desc(
            &desc(WATER),
            &ColorOptions::default(),
        )
        .unwrap();
        assert!(mol.atoms().iter().all(|a| a.position.is_none()));

        let layout = crate::layout::layout_structure(&mol, 1.2).unwrap();
        mol.apply_layout(&layout);
        for atom in mol.atoms() {
            assert_eq!(atom.position, layout.get(atom.id.as_str()));
            assert!(atom.position.is_some());
        }
        assert_eq!(mol.atom("a1").unwrap().position, Some(glam::Vec3::ZERO));
    }
}
