//! Persisting scenes to disk.
//!
//! [`SceneWriter`] is the seam between primitive generation and a concrete
//! scene-file format. [`write_reaction`] owns the directory layout: one file
//! per molecule named `<role>_<molecule>.<ext>` plus a combined animation
//! stage that references them.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;

use super::animation::ReactionAnimation;
use super::{MoleculeScene, ReactionScene};
use crate::error::ChemSimError;

/// File stem of the combined animation stage.
pub const ANIMATION_STEM: &str = "reaction_anim";

/// Serializes molecule scenes and reaction animations.
pub trait SceneWriter {
    /// File extension without the leading dot.
    fn extension(&self) -> &'static str;

    /// Write a single molecule.
    fn write_molecule(
        &self,
        scene: &MoleculeScene,
        out: &mut dyn Write,
    ) -> io::Result<()>;

    /// Write the animation stage. `assets[i]` is the path of the molecule
    /// file driven by `animation.tracks[i]`, relative to the stage.
    fn write_animation(
        &self,
        animation: &ReactionAnimation,
        assets: &[String],
        title: Option<&str>,
        out: &mut dyn Write,
    ) -> io::Result<()>;
}

/// Replace every character outside `[A-Za-z0-9_]` with `_`, and prefix a
/// leading digit with `_`, so the result is a valid prim or file name.
#[must_use]
pub fn sanitize_prim_name(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// Hands out names that are unique among siblings, suffixing repeats with
/// `_2`, `_3`, ...
#[derive(Debug, Default)]
pub(crate) struct UniqueNames {
    taken: FxHashSet<String>,
}

impl UniqueNames {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Mark `name` as used without handing it out.
    pub(crate) fn reserve(&mut self, name: &str) {
        let _ = self.taken.insert(name.to_owned());
    }

    /// `base` if still free, else the first free `base_N`.
    pub(crate) fn claim(&mut self, base: &str) -> String {
        let mut name = base.to_owned();
        let mut n = 1;
        while !self.taken.insert(name.clone()) {
            n += 1;
            name = format!("{base}_{n}");
        }
        name
    }
}

/// Files produced by [`write_reaction`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WrittenScene {
    /// Directory holding every file below.
    pub directory: PathBuf,
    /// Molecule files, reactants first, in record order.
    pub molecules: Vec<PathBuf>,
    /// Animation stage, when one was written.
    pub animation: Option<PathBuf>,
}

fn write_file(
    path: &Path,
    body: impl FnOnce(&mut dyn Write) -> io::Result<()>,
) -> Result<(), ChemSimError> {
    let mut out = BufWriter::new(File::create(path)?);
    body(&mut out)?;
    out.flush()?;
    Ok(())
}

/// Write every molecule of `scene` into `dir`, then (optionally) the
/// animation stage referencing them.
///
/// Molecules that sanitize to the same name get a numeric suffix so no file
/// is overwritten.
pub fn write_reaction(
    scene: &ReactionScene,
    writer: &dyn SceneWriter,
    dir: &Path,
    with_animation: bool,
) -> Result<WrittenScene, ChemSimError> {
    std::fs::create_dir_all(dir)?;
    let ext = writer.extension();

    let mut stems = UniqueNames::new();
    let mut written = WrittenScene {
        directory: dir.to_path_buf(),
        ..WrittenScene::default()
    };
    let mut assets = Vec::new();

    for (role, mol) in scene.molecules() {
        let base = format!("{}_{}", role.label(), sanitize_prim_name(&mol.name));
        let stem = stems.claim(&base);

        let file_name = format!("{stem}.{ext}");
        let path = dir.join(&file_name);
        write_file(&path, |out| writer.write_molecule(mol, out))?;
        log::info!("wrote {}", path.display());

        assets.push(format!("./{file_name}"));
        written.molecules.push(path);
    }

    if with_animation {
        if scene.reactants.is_empty() || scene.products.is_empty() {
            log::warn!(
                "skipping animation: need at least one reactant and one product"
            );
        } else {
            let path = dir.join(format!("{ANIMATION_STEM}.{ext}"));
            let title = scene.equation.as_deref();
            write_file(&path, |out| {
                writer.write_animation(&scene.animation, &assets, title, out)
            })?;
            log::info!("wrote {}", path.display());
            written.animation = Some(path);
        }
    }

    Ok(written)
}

/// Output subdirectory for a record file: its stem, sanitized.
#[must_use]
pub fn record_directory(root: &Path, record_path: &Path) -> PathBuf {
    let stem = record_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("reaction");
    root.join(sanitize_prim_name(stem))
}
