use serde::{Deserialize, Serialize};

use super::structure::{MolecularStructure, MoleculeDesc};
use super::ModelError;
use crate::options::ColorOptions;

/// Side of the reaction a molecule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Consumed by the reaction.
    Reactant,
    /// Produced by the reaction.
    Product,
}

impl Role {
    /// Plural label used for file names and prim paths.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Reactant => "reactants",
            Self::Product => "products",
        }
    }

    /// Name of the scope grouping this role's molecules in a stage.
    #[must_use]
    pub fn scope_name(self) -> &'static str {
        match self {
            Self::Reactant => "Reactants",
            Self::Product => "Products",
        }
    }
}

/// Reaction record as produced by the reaction service.
///
/// Field names follow the service's JSON (`reaction`,
/// `reactionDescription`). A `reaction_id` may be present when the record
/// came out of a cache; it is informational only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionDesc {
    /// Cache key of the prompt that produced this record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reaction_id: Option<String>,
    /// Original user prompt, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Molecules consumed.
    #[serde(default)]
    pub reactants: Vec<MoleculeDesc>,
    /// Molecules produced.
    #[serde(default)]
    pub products: Vec<MoleculeDesc>,
    /// Balanced equation text.
    #[serde(default)]
    pub reaction: String,
    /// One-line description of the process.
    #[serde(default, rename = "reactionDescription")]
    pub reaction_description: String,
}

/// A validated reaction: every reactant and product passed molecule
/// validation.
#[derive(Debug, Clone)]
pub struct ReactionRecord {
    /// Molecules consumed, in record order.
    pub reactants: Vec<MolecularStructure>,
    /// Molecules produced, in record order.
    pub products: Vec<MolecularStructure>,
    /// Balanced equation, when supplied.
    pub equation: Option<String>,
    /// Natural-language process description, when supplied.
    pub process_description: Option<String>,
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_owned())
}

impl ReactionRecord {
    /// Validate a parsed record. Fails on the first invalid molecule.
    pub fn from_desc(
        desc: &ReactionDesc,
        colors: &ColorOptions,
    ) -> Result<Self, ModelError> {
        let convert = |mols: &[MoleculeDesc]| {
            mols.iter()
                .map(|m| MolecularStructure::from_desc(m, colors))
                .collect::<Result<Vec<_>, _>>()
        };

        Ok(Self {
            reactants: convert(&desc.reactants)?,
            products: convert(&desc.products)?,
            equation: non_empty(&desc.reaction),
            process_description: non_empty(&desc.reaction_description),
        })
    }

    /// Parse and validate a JSON reaction record.
    pub fn from_json(
        json: &str,
        colors: &ColorOptions,
    ) -> Result<Self, ModelError> {
        let desc: ReactionDesc = serde_json::from_str(json)?;
        Self::from_desc(&desc, colors)
    }

    /// Convert back into the service's record shape.
    #[must_use]
    pub fn to_desc(&self) -> ReactionDesc {
        ReactionDesc {
            reaction_id: None,
            prompt: None,
            reactants: self
                .reactants
                .iter()
                .map(MolecularStructure::to_desc)
                .collect(),
            products: self
                .products
                .iter()
                .map(MolecularStructure::to_desc)
                .collect(),
            reaction: self.equation.clone().unwrap_or_default(),
            reaction_description: self
                .process_description
                .clone()
                .unwrap_or_default(),
        }
    }

    /// All molecules tagged with their role, reactants first.
    pub fn molecules(
        &self,
    ) -> impl Iterator<Item = (Role, &MolecularStructure)> + '_ {
        self.reactants
            .iter()
            .map(|m| (Role::Reactant, m))
            .chain(self.products.iter().map(|m| (Role::Product, m)))
    }
}
