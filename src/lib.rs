// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Molecular layout and ball-and-stick scene generation for chemical
//! reactions.
//!
//! A reaction record (reactants, products, equation) is validated into
//! [`model::MolecularStructure`]s, each molecule is laid out on a six-axis
//! lattice by breadth-first traversal of its bond graph, and bonds become
//! capsules posed between their atom spheres. The result is written as
//! USD ASCII layers plus an optional stage animating reactants into
//! products.
//!
//! # Key entry points
//!
//! - [`layout::compute_layout`] - lattice BFS placement of a bond graph
//! - [`geometry::resolve_bond_pose`] - capsule pose between two atoms
//! - [`scene::ReactionScene`] - per-molecule descriptors and animation
//! - [`scene::write_reaction`] - writes a scene through a
//!   [`scene::SceneWriter`]
//! - [`service::ReactionClient`] - cache-first lookup of reaction records
//! - [`options::Options`] - runtime configuration (layout, geometry, colors,
//!   animation, output)
//!
//! # Example
//!
//! ```
//! use chemsim::model::ReactionRecord;
//! use chemsim::options::Options;
//! use chemsim::scene::ReactionScene;
//!
//! let json = r#"{
//!     "reactants": [{
//!         "name": "Hydrogen",
//!         "atoms": [{"id": "h1", "element": "H"}, {"id": "h2", "element": "H"}],
//!         "bonds": [{"from_atom": "h1", "to_atom": "h2"}]
//!     }],
//!     "products": []
//! }"#;
//!
//! let options = Options::default();
//! let record = ReactionRecord::from_json(json, &options.colors)?;
//! let scene = ReactionScene::build(&record, &options)?;
//! assert_eq!(scene.reactants[0].spheres.len(), 2);
//! assert_eq!(scene.reactants[0].capsules.len(), 1);
//! # Ok::<(), chemsim::error::ChemSimError>(())
//! ```

pub mod error;
pub mod geometry;
pub mod layout;
pub mod model;
pub mod options;
pub mod scene;
pub mod service;
pub mod util;

pub use error::ChemSimError;
