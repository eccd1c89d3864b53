use phf::{Map, Set, phf_map, phf_set};

/// Ions whose atom name equals the residue name (e.g. `CA` in residue `CA`).
static ION_SYMBOLS: Map<&'static str, &'static str> = phf_map! {
    "NA" => "Na", "CL" => "Cl", "K" => "K", "CA" => "Ca", "MG" => "Mg",
    "ZN" => "Zn", "FE" => "Fe", "MN" => "Mn", "CU" => "Cu", "CO" => "Co",
    "NI" => "Ni", "LI" => "Li", "CS" => "Cs", "RB" => "Rb", "CD" => "Cd",
    "BR" => "Br", "IOD" => "I", "SOD" => "Na", "CLA" => "Cl", "POT" => "K",
};

/// Two-letter prefixes that never start an organic atom name.
static TWO_LETTER_PREFIXES: Set<&'static str> = phf_set! {
    "CL", "BR",
};

/// Derives an element symbol from an atom name and its residue name.
///
/// Leading digits (as in `1HB`) are skipped. Ions are recognised when the atom
/// and residue names match; otherwise the first letter decides, except for the
/// halogen prefixes `CL` and `BR`.
pub fn element_symbol(atom_name: &str, residue_name: &str) -> Option<String> {
    let name = atom_name
        .trim()
        .trim_start_matches(|c: char| c.is_ascii_digit())
        .to_ascii_uppercase();
    if name.is_empty() {
        return None;
    }

    if name == residue_name.trim().to_ascii_uppercase() {
        if let Some(symbol) = ION_SYMBOLS.get(name.as_str()) {
            return Some((*symbol).to_string());
        }
    }

    if let Some(prefix) = name.get(..2) {
        if TWO_LETTER_PREFIXES.contains(prefix) {
            let mut chars = prefix.chars();
            let first = chars.next()?;
            let second = chars.next()?.to_ascii_lowercase();
            return Some(format!("{}{}", first, second));
        }
    }

    name.chars()
        .next()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_string())
}
