//! ASCII USD (`.usda`) scene writer.
//!
//! Molecule stages have `/World` as default prim, one `UsdPreviewSurface`
//! material per element under `/World/Materials`, and the molecule under
//! `/World/<name>`: a `Sphere` per atom and an `Xform` + `Capsule` per bond.
//! Each primitive also carries its exact color as `primvars:displayColor`,
//! so per-atom colors survive even when two atoms of one element disagree.

use std::io::{self, Write};

use glam::{Mat4, Vec3};

use super::animation::{ReactionAnimation, Track};
use super::writer::{sanitize_prim_name, SceneWriter, UniqueNames};
use super::MoleculeScene;

/// Writes `.usda` text layers.
#[derive(Debug, Clone, Copy, Default)]
pub struct UsdaWriter;

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Fold `-0.0` into `0.0` so it prints as `0`.
fn num(v: f32) -> f32 {
    v + 0.0
}

fn vec3(v: Vec3) -> String {
    format!("({}, {}, {})", num(v.x), num(v.y), num(v.z))
}

fn rgb(c: [f32; 3]) -> String {
    format!("({}, {}, {})", num(c[0]), num(c[1]), num(c[2]))
}

/// USD matrices are row-major with row vectors, so each USD row is one of
/// glam's columns.
fn matrix(m: Mat4) -> String {
    let rows: Vec<String> = m
        .to_cols_array_2d()
        .iter()
        .map(|c| {
            format!(
                "({}, {}, {}, {})",
                num(c[0]),
                num(c[1]),
                num(c[2]),
                num(c[3])
            )
        })
        .collect();
    format!("( {} )", rows.join(", "))
}

/// Material prim for one element.
struct MaterialPrim<'a> {
    element: &'a str,
    prim: String,
    color: [f32; 3],
}

fn material_prims(elements: &[(String, [f32; 3])]) -> Vec<MaterialPrim<'_>> {
    let mut names = UniqueNames::new();
    elements
        .iter()
        .map(|(element, color)| MaterialPrim {
            element,
            prim: names.claim(&sanitize_prim_name(element)),
            color: *color,
        })
        .collect()
}

fn write_header(
    out: &mut dyn Write,
    doc: Option<&str>,
    extra: &[String],
) -> io::Result<()> {
    writeln!(out, "#usda 1.0")?;
    writeln!(out, "(")?;
    writeln!(out, "    defaultPrim = \"World\"")?;
    if let Some(doc) = doc {
        writeln!(out, "    doc = {}", quote(doc))?;
    }
    for line in extra {
        writeln!(out, "    {line}")?;
    }
    writeln!(out, "    metersPerUnit = 1")?;
    writeln!(out, "    upAxis = \"Y\"")?;
    writeln!(out, ")")?;
    writeln!(out)
}

fn write_materials(
    out: &mut dyn Write,
    materials: &[MaterialPrim<'_>],
) -> io::Result<()> {
    writeln!(out, "    def Scope \"Materials\"")?;
    writeln!(out, "    {{")?;
    for MaterialPrim { prim: name, color, .. } in materials {
        writeln!(out, "        def Material \"{name}\"")?;
        writeln!(out, "        {{")?;
        writeln!(
            out,
            "            token outputs:surface.connect = \
             </World/Materials/{name}/Shader.outputs:surface>"
        )?;
        writeln!(out)?;
        writeln!(out, "            def Shader \"Shader\"")?;
        writeln!(out, "            {{")?;
        writeln!(
            out,
            "                uniform token info:id = \"UsdPreviewSurface\""
        )?;
        writeln!(
            out,
            "                color3f inputs:diffuseColor = {}",
            rgb(*color)
        )?;
        writeln!(out, "                token outputs:surface")?;
        writeln!(out, "            }}")?;
        writeln!(out, "        }}")?;
    }
    writeln!(out, "    }}")
}

fn write_spheres(
    out: &mut dyn Write,
    scene: &MoleculeScene,
    materials: &[MaterialPrim<'_>],
    names: &mut UniqueNames,
) -> io::Result<()> {
    for s in &scene.spheres {
        let material = materials
            .iter()
            .find(|m| m.element == s.element)
            .map_or_else(|| sanitize_prim_name(&s.element), |m| m.prim.clone());
        writeln!(out)?;
        writeln!(
            out,
            "        def Sphere \"{}\" (",
            names.claim(&sanitize_prim_name(s.atom_id.as_str()))
        )?;
        writeln!(out, "            prepend apiSchemas = [\"MaterialBindingAPI\"]")?;
        writeln!(out, "        )")?;
        writeln!(out, "        {{")?;
        writeln!(out, "            double radius = {}", s.radius)?;
        writeln!(
            out,
            "            color3f[] primvars:displayColor = [{}]",
            rgb(s.color)
        )?;
        writeln!(
            out,
            "            rel material:binding = </World/Materials/{material}>"
        )?;
        writeln!(
            out,
            "            custom string chemsim:element = {}",
            quote(&s.element)
        )?;
        writeln!(
            out,
            "            double3 xformOp:translate = {}",
            vec3(s.center)
        )?;
        writeln!(
            out,
            "            uniform token[] xformOpOrder = [\"xformOp:translate\"]"
        )?;
        writeln!(out, "        }}")?;
    }
    Ok(())
}

fn write_capsules(
    out: &mut dyn Write,
    scene: &MoleculeScene,
    names: &mut UniqueNames,
) -> io::Result<()> {
    for (i, c) in scene.capsules.iter().enumerate() {
        writeln!(out)?;
        writeln!(
            out,
            "        def Xform \"{}\"",
            names.claim(&format!("bond_{i}"))
        )?;
        writeln!(out, "        {{")?;
        writeln!(
            out,
            "            matrix4d xformOp:transform = {}",
            matrix(c.pose.transform())
        )?;
        writeln!(
            out,
            "            uniform token[] xformOpOrder = [\"xformOp:transform\"]"
        )?;
        writeln!(
            out,
            "            custom string chemsim:bond = {}",
            quote(&format!("{}-{}", c.from, c.to))
        )?;
        writeln!(out)?;
        writeln!(out, "            def Capsule \"capsule\"")?;
        writeln!(out, "            {{")?;
        writeln!(
            out,
            "                uniform token axis = \"{}\"",
            c.pose.axis.token()
        )?;
        writeln!(out, "                double height = {}", c.pose.height)?;
        writeln!(out, "                double radius = {}", c.pose.radius)?;
        writeln!(
            out,
            "                color3f[] primvars:displayColor = [{}]",
            rgb(c.color)
        )?;
        writeln!(out, "            }}")?;
        writeln!(out, "        }}")?;
    }
    Ok(())
}

impl SceneWriter for UsdaWriter {
    fn extension(&self) -> &'static str {
        "usda"
    }

    fn write_molecule(
        &self,
        scene: &MoleculeScene,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        write_header(out, scene.description.as_deref(), &[])?;
        writeln!(out, "def Xform \"World\"")?;
        writeln!(out, "{{")?;
        let materials = material_prims(&scene.element_colors);
        write_materials(out, &materials)?;
        writeln!(out)?;

        let mut world = UniqueNames::new();
        world.reserve("Materials");
        writeln!(
            out,
            "    def Xform \"{}\"",
            world.claim(&sanitize_prim_name(&scene.name))
        )?;
        writeln!(out, "    {{")?;
        writeln!(
            out,
            "        custom string chemsim:name = {}",
            quote(&scene.name)
        )?;
        if let Some(formula) = &scene.formula {
            writeln!(
                out,
                "        custom string chemsim:formula = {}",
                quote(formula)
            )?;
        }
        // Spheres and bond transforms share one parent.
        let mut children = UniqueNames::new();
        write_spheres(out, scene, &materials, &mut children)?;
        write_capsules(out, scene, &mut children)?;
        writeln!(out, "    }}")?;
        writeln!(out, "}}")
    }

    fn write_animation(
        &self,
        animation: &ReactionAnimation,
        assets: &[String],
        title: Option<&str>,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        let fps = animation.frames_per_second;
        write_header(
            out,
            title,
            &[
                format!("startTimeCode = {}", animation.start_frame),
                format!("endTimeCode = {}", animation.end_frame),
                format!("framesPerSecond = {fps}"),
                format!("timeCodesPerSecond = {fps}"),
            ],
        )?;
        writeln!(out, "def Xform \"World\"")?;
        writeln!(out, "{{")?;

        let mut scopes: Vec<&'static str> = Vec::new();
        for track in &animation.tracks {
            let scope = track.role.scope_name();
            if !scopes.contains(&scope) {
                scopes.push(scope);
            }
        }

        for scope in scopes {
            writeln!(out, "    def Xform \"{scope}\"")?;
            writeln!(out, "    {{")?;
            let tracks = animation
                .tracks
                .iter()
                .zip(assets)
                .filter(|(t, _)| t.role.scope_name() == scope);
            let mut names = UniqueNames::new();
            for (track, asset) in tracks {
                write_track(out, animation, track, asset, &mut names)?;
            }
            writeln!(out, "    }}")?;
        }
        writeln!(out, "}}")
    }
}

fn write_track(
    out: &mut dyn Write,
    animation: &ReactionAnimation,
    track: &Track,
    asset: &str,
    names: &mut UniqueNames,
) -> io::Result<()> {
    let prim = names.claim(&sanitize_prim_name(
        asset
            .trim_start_matches("./")
            .rsplit_once('.')
            .map_or(asset, |(stem, _)| stem),
    ));
    writeln!(out, "        def Xform \"{prim}\" (")?;
    writeln!(out, "            prepend references = @{asset}@")?;
    writeln!(out, "        )")?;
    writeln!(out, "        {{")?;
    writeln!(
        out,
        "            custom string chemsim:label = {}",
        quote(&track.name)
    )?;

    writeln!(out, "            double3 xformOp:translate.timeSamples = {{")?;
    if animation.easing.is_linear() {
        for k in &track.keyframes {
            writeln!(out, "                {}: {},", k.frame, vec3(k.translate))?;
        }
    } else if let (Some(first), Some(last)) =
        (track.keyframes.first(), track.keyframes.last())
    {
        for frame in first.frame..=last.frame {
            let (pos, _) = animation.sample(track, frame as f32);
            writeln!(out, "                {frame}: {},", vec3(pos))?;
        }
    }
    writeln!(out, "            }}")?;
    writeln!(
        out,
        "            uniform token[] xformOpOrder = [\"xformOp:translate\"]"
    )?;

    writeln!(out, "            token visibility.timeSamples = {{")?;
    for k in &track.keyframes {
        let token = if k.visible { "inherited" } else { "invisible" };
        writeln!(out, "                {}: \"{token}\",", k.frame)?;
    }
    writeln!(out, "            }}")?;
    writeln!(out, "        }}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Atom, Bond, MolecularStructure, ReactionRecord};
    use crate::options::Options;
    use crate::scene::ReactionScene;
    use crate::util::easing::EasingFunction;

    const RECORD: &str = r##"{
        "reactants": [{
            "name": "Carbon monoxide",
            "formula": "CO",
            "atoms": [
                {"id": "a1", "element": "C", "color": "#000000"},
                {"id": "a2", "element": "O", "color": "#FF0000"}
            ],
            "bonds": [{"from_atom": "a1", "to_atom": "a2"}]
        }],
        "products": [{
            "name": "Carbon \"dioxide\"",
            "atoms": [
                {"id": "a1", "element": "C", "color": "#000000"},
                {"id": "a2", "element": "O", "color": "#FF0000"},
                {"id": "a3", "element": "O", "color": "#FF0000"}
            ],
            "bonds": [
                {"from_atom": "a1", "to_atom": "a2"},
                {"from_atom": "a1", "to_atom": "a3"}
            ]
        }],
        "reaction": "2CO + O2 → 2CO2"
    }"##;

    fn scene(options: &Options) -> ReactionScene {
        let record =
            ReactionRecord::from_json(RECORD, &options.colors).unwrap();
        ReactionScene::build(&record, options).unwrap()
    }

    fn molecule_text(scene: &MoleculeScene) -> String {
        let mut buf = Vec::new();
        UsdaWriter.write_molecule(scene, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn molecule_layer_has_materials_atoms_and_bonds() {
        let s = scene(&Options::default());
        let text = molecule_text(&s.reactants[0]);

        assert!(text.starts_with("#usda 1.0\n"));
        assert!(text.contains("defaultPrim = \"World\""));
        assert!(text.contains("def Material \"C\""));
        assert!(text.contains("def Material \"O\""));
        assert!(text.contains("def Xform \"Carbon_monoxide\""));
        assert!(text.contains("def Sphere \"a2\" ("));
        assert!(text.contains("double3 xformOp:translate = (1.2, 0, 0)"));
        assert!(text.contains("rel material:binding = </World/Materials/O>"));
        assert!(text.contains("uniform token axis = \"X\""));
        assert!(text.contains("custom string chemsim:formula = \"CO\""));
        // Identity rotation, translated to the bond midpoint.
        assert!(text.contains(
            "matrix4d xformOp:transform = ( (1, 0, 0, 0), (0, 1, 0, 0), \
             (0, 0, 1, 0), (0.6, 0, 0, 1) )"
        ));
    }

    #[test]
    fn braces_balance_and_names_are_escaped() {
        let s = scene(&Options::default());
        let text = molecule_text(&s.products[0]);
        assert_eq!(text.matches('{').count(), text.matches('}').count());
        assert!(text.contains("chemsim:name = \"Carbon \\\"dioxide\\\"\""));
        assert!(text.contains("def Xform \"Carbon__dioxide_\""));
        assert!(text.contains("def Xform \"bond_1\""));
    }

    #[test]
    fn linear_animation_writes_keyframes_only() {
        let s = scene(&Options::default());
        let assets = vec![
            "./reactants_Carbon_monoxide.usda".to_owned(),
            "./products_Carbon__dioxide_.usda".to_owned(),
        ];
        let mut buf = Vec::new();
        UsdaWriter
            .write_animation(&s.animation, &assets, s.equation.as_deref(), &mut buf)
            .unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("endTimeCode = 48"));
        assert!(text.contains("doc = \"2CO + O2 → 2CO2\""));
        assert!(text.contains("def Xform \"Reactants\""));
        assert!(text.contains("def Xform \"Products\""));
        assert!(text.contains("def Xform \"reactants_Carbon_monoxide\" ("));
        assert!(text.contains("prepend references = @./reactants_Carbon_monoxide.usda@"));
        assert!(text.contains("0: (5, 0, 0),"));
        assert!(text.contains("24: \"invisible\","));
        assert!(!text.contains("12: ("));
        assert_eq!(text.matches('{').count(), text.matches('}').count());
    }

    #[test]
    fn eased_animation_bakes_every_frame() {
        let mut options = Options::default();
        options.animation.easing = EasingFunction::Smoothstep;
        let s = scene(&options);
        let assets = vec!["./a.usda".to_owned(), "./b.usda".to_owned()];
        let mut buf = Vec::new();
        UsdaWriter
            .write_animation(&s.animation, &assets, None, &mut buf)
            .unwrap();
        let text = String::from_utf8(buf).unwrap();
        // Smoothstep is symmetric, so frame 12 of 24 is exactly halfway.
        assert!(text.contains("12: (2.5, 0, 0),"));
        assert!(!text.contains("doc ="));
    }

    #[test]
    fn sibling_prim_names_never_collide() {
        let mol = MolecularStructure::new(
            "Materials",
            vec![
                Atom::new("a-1", "Na+", [0.5, 0.0, 0.5]),
                Atom::new("a_1", "Na-", [0.6, 0.0, 0.6]),
                Atom::new("bond_0", "C", [0.1, 0.1, 0.1]),
            ],
            vec![Bond::new("a-1", "a_1")],
        )
        .unwrap();
        let scene = MoleculeScene::build(&mol, &Options::default()).unwrap();
        let text = molecule_text(&scene);

        assert_eq!(text.matches("def Sphere ").count(), 3);
        assert_eq!(text.matches("def Sphere \"a_1\" (").count(), 1);
        assert!(text.contains("def Sphere \"a_1_2\" ("));
        assert!(text.contains("def Sphere \"bond_0\" ("));
        assert!(text.contains("def Xform \"bond_0_2\""));
        assert!(!text.contains("def Xform \"bond_0\""));

        assert_eq!(text.matches("def Scope \"Materials\"").count(), 1);
        assert!(text.contains("def Xform \"Materials_2\""));
        assert!(!text.contains("def Xform \"Materials\""));

        assert!(text.contains("def Material \"Na_\""));
        assert!(text.contains("def Material \"Na__2\""));
        assert!(text.contains("rel material:binding = </World/Materials/Na__2>"));
        assert_eq!(text.matches('{').count(), text.matches('}').count());
    }
}
