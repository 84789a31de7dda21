use phf::{Set, phf_set};

static ELEMENT_SYMBOLS: Set<&'static str> = phf_set! {
    "H", "He",
    "Li", "Be", "B", "C", "N", "O", "F", "Ne",
    "Na", "Mg", "Al", "Si", "P", "S", "Cl", "Ar",
    "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn",
    "Ga", "Ge", "As", "Se", "Br", "Kr",
    "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd",
    "In", "Sn", "Sb", "Te", "I", "Xe",
    "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb", "Dy",
    "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt",
    "Au", "Hg", "Tl", "Pb", "Bi", "Po", "At", "Rn",
    "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk", "Cf",
    "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds",
    "Rg", "Cn", "Nh", "Fl", "Mc", "Lv", "Ts", "Og",
};

pub fn is_element_symbol(symbol: &str) -> bool {
    ELEMENT_SYMBOLS.contains(symbol)
}

/// Strips the pseudopotential decoration VASP 5.4+ writes on the species line
/// (e.g. `Li_sv/7a6b1c` or `Fe_pv`) and returns the bare element symbol.
///
/// Returns `None` if what remains is not a known element.
pub fn species_from_label(label: &str) -> Option<&str> {
    let bare = label
        .trim()
        .split(['_', '/'])
        .next()
        .unwrap_or_default();
    is_element_symbol(bare).then_some(bare)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_element_symbol_accepts_known_symbols_case_sensitively() {
        assert!(is_element_symbol("Li"));
        assert!(is_element_symbol("O"));
        assert!(is_element_symbol("Og"));
        assert!(!is_element_symbol("li"));
        assert!(!is_element_symbol("Xx"));
    }

    #[test]
    fn species_from_label_strips_pseudopotential_suffixes() {
        assert_eq!(species_from_label("Li_sv"), Some("Li"));
        assert_eq!(species_from_label("Fe_pv/3f2a91c0"), Some("Fe"));
        assert_eq!(species_from_label("  Mn "), Some("Mn"));
    }

    #[test]
    fn species_from_label_rejects_unknown_labels() {
        assert_eq!(species_from_label("Qq"), None);
        assert_eq!(species_from_label("1.000"), None);
        assert_eq!(species_from_label(""), None);
    }
}
