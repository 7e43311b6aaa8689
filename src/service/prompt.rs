/// Output contract handed to the model ahead of every user prompt.
const STRUCTURE_GUIDE: &str = "\
You are a chemistry modeling assistant for a 3D molecule builder. Reply with \
a single JSON object and nothing else: no prose, no markdown, no code fences.

Shape:
{
  \"reactants\": [Molecule],
  \"products\": [Molecule],
  \"reaction\": \"balanced equation, e.g. 2H2 + O2 -> 2H2O\",
  \"reactionDescription\": \"one sentence describing the process\"
}

Molecule:
{
  \"name\": \"Ethanol\",
  \"formula\": \"C2H6O\",
  \"description\": \"short description\",
  \"atoms\": [{ \"id\": \"a1\", \"element\": \"C\", \"color\": \"#000000\" }],
  \"bonds\": [{ \"from_atom\": \"a1\", \"to_atom\": \"a2\" }]
}

Rules:
- List every atom the formula implies; C2H6O means 2 C, 6 H and 1 O atoms.
- Atom ids are unique within a molecule; every bond names two listed atoms.
- Connect all atoms unless the species is a free radical or isolated ion.
- Respect common valences: C 4, N 3, O 2, H 1.
- Use one #RRGGBB color per element across all molecules \
(C #000000, H #FFFFFF, O #FF0000, N #0000FF).";

/// Full prompt text for a reaction request.
#[must_use]
pub fn compose_prompt(prompt: &str) -> String {
    format!("{STRUCTURE_GUIDE}\n\nReaction prompt:\n{}", prompt.trim())
}

/// Strip a markdown code fence (```` ``` ```` or ```` ```json ````) wrapped
/// around a model reply, then trim to the outermost JSON object when prose
/// surrounds it.
#[must_use]
pub fn extract_json(raw: &str) -> &str {
    let mut s = raw.trim();
    if let Some(rest) = s.strip_prefix("```") {
        let rest = rest
            .strip_prefix("json")
            .or_else(|| rest.strip_prefix("JSON"))
            .unwrap_or(rest);
        s = rest.trim_start();
        if let Some(body) = s.strip_suffix("```") {
            s = body.trim_end();
        }
    }
    match (s.find('{'), s.rfind('}')) {
        (Some(start), Some(end)) if start < end => &s[start..=end],
        _ => s,
    }
}
