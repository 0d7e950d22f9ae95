//! Built-in mineral parameter database.
//!
//! Read-only; every lookup returns a fresh, stateless `Material`.

use crate::composite::{Material, SpinTransition};
use crate::error::{MaterialError, MaterialResult};
use crate::mineral::Mineral;
use sf_core::units::gpa;
use sf_eos::{EosMethod, ParameterSet};

#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub canonical_id: &'static str,
    pub display_name: &'static str,
    pub citation: &'static str,
    pub aliases: &'static [&'static str],
    build: fn() -> Material,
}

impl CatalogEntry {
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_ascii_lowercase();
        if query.is_empty() {
            return true;
        }
        self.canonical_id.contains(&query)
            || self.display_name.to_ascii_lowercase().contains(&query)
            || self.aliases.iter().any(|alias| alias.contains(&query))
    }

    fn is_named(&self, name: &str) -> bool {
        self.canonical_id == name || self.aliases.contains(&name)
    }

    pub fn material(&self) -> Material {
        (self.build)()
    }
}

fn slb(v_0: f64, k_0: f64, kp: f64, g_0: f64, gp: f64, mass: f64, n: f64) -> ParameterSet {
    ParameterSet::new(v_0, k_0, kp, mass, n)
        .with_shear(g_0, gp)
        .with_method(EosMethod::Slb3)
}

fn mg_perovskite() -> Material {
    Mineral::new(
        "mg_perovskite",
        slb(24.45e-6, 251.0e9, 4.1, 175.0e9, 1.7, 0.1000, 5.0)
            .with_debye(1070.0, 1.48, 1.4)
            .with_eta_s(2.6),
    )
    .into()
}

fn fe_perovskite() -> Material {
    Mineral::new(
        "fe_perovskite",
        slb(25.48e-6, 281.0e9, 4.1, 138.0e9, 1.7, 0.1319, 5.0)
            .with_debye(841.0, 1.48, 1.4)
            .with_eta_s(2.1),
    )
    .into()
}

fn periclase() -> Material {
    Mineral::new(
        "periclase",
        slb(11.24e-6, 161.0e9, 3.8, 131.0e9, 2.1, 0.0403, 2.0)
            .with_debye(773.0, 1.5, 1.5)
            .with_eta_s(2.8),
    )
    .into()
}

fn wuestite() -> Material {
    Mineral::new(
        "wuestite",
        slb(12.06e-6, 152.0e9, 4.9, 47.0e9, 0.7, 0.0718, 2.0)
            .with_debye(455.0, 1.28, 1.5)
            .with_eta_s(0.8),
    )
    .into()
}

fn matas(v_0: f64, k_0: f64, kp: f64, g_0: f64, gp: f64, mass: f64, n: f64) -> ParameterSet {
    ParameterSet::new(v_0, k_0, kp, mass, n)
        .with_shear(g_0, gp)
        .with_method(EosMethod::Mgd2)
}

fn matas_mg_perovskite() -> Material {
    Mineral::new(
        "matas_mg_perovskite",
        matas(24.43e-6, 250.0e9, 4.0, 175.0e9, 1.8, 0.1020, 5.0).with_debye(1070.0, 1.48, 1.4),
    )
    .into()
}

fn matas_fe_perovskite() -> Material {
    Mineral::new(
        "matas_fe_perovskite",
        matas(25.34e-6, 250.0e9, 4.0, 135.0e9, 1.3, 0.1319, 5.0).with_debye(841.0, 1.48, 1.4),
    )
    .into()
}

fn matas_periclase() -> Material {
    Mineral::new(
        "matas_periclase",
        matas(11.25e-6, 160.1e9, 3.83, 130.0e9, 2.2, 0.0403, 2.0).with_debye(673.0, 1.41, 1.3),
    )
    .into()
}

fn matas_wuestite() -> Material {
    Mineral::new(
        "matas_wuestite",
        matas(12.26e-6, 160.1e9, 3.83, 46.0e9, 0.6, 0.0718, 2.0).with_debye(673.0, 1.41, 1.3),
    )
    .into()
}

// Speziale et al. (2007) publish no shear parameters; these phases support
// density but not velocity queries.
fn speziale_hs_mineral() -> Mineral {
    Mineral::new(
        "speziale_fe_periclase_hs",
        ParameterSet::new(22.9e-6, 157.5e9, 3.92, 0.04567, 2.0)
            .with_debye(587.0, 1.46, 1.2)
            .with_method(EosMethod::Mgd3),
    )
}

fn speziale_ls_mineral() -> Mineral {
    Mineral::new(
        "speziale_fe_periclase_ls",
        ParameterSet::new(21.49e-6, 186.0e9, 4.6, 0.04567, 2.0)
            .with_debye(587.0, 1.46, 1.2)
            .with_method(EosMethod::Mgd3),
    )
}

fn speziale_fe_periclase_hs() -> Material {
    speziale_hs_mineral().into()
}

fn speziale_fe_periclase_ls() -> Material {
    speziale_ls_mineral().into()
}

fn speziale_fe_periclase() -> Material {
    SpinTransition::new(
        "speziale_fe_periclase",
        gpa(60.0),
        speziale_ls_mineral(),
        speziale_hs_mineral(),
    )
    .into()
}

const CATALOG: [CatalogEntry; 11] = [
    CatalogEntry {
        canonical_id: "mg_perovskite",
        display_name: "MgSiO3 perovskite",
        citation: "Stixrude & Lithgow-Bertelloni 2005",
        aliases: &["mg_pv", "bridgmanite"],
        build: mg_perovskite,
    },
    CatalogEntry {
        canonical_id: "fe_perovskite",
        display_name: "FeSiO3 perovskite",
        citation: "Stixrude & Lithgow-Bertelloni 2005",
        aliases: &["fe_pv"],
        build: fe_perovskite,
    },
    CatalogEntry {
        canonical_id: "periclase",
        display_name: "Periclase",
        citation: "Stixrude & Lithgow-Bertelloni 2005",
        aliases: &["mgo"],
        build: periclase,
    },
    CatalogEntry {
        canonical_id: "wuestite",
        display_name: "Wüstite",
        citation: "Stixrude & Lithgow-Bertelloni 2005",
        aliases: &["feo", "wustite"],
        build: wuestite,
    },
    CatalogEntry {
        canonical_id: "matas_mg_perovskite",
        display_name: "MgSiO3 perovskite (Matas)",
        citation: "Matas et al. 2007",
        aliases: &[],
        build: matas_mg_perovskite,
    },
    CatalogEntry {
        canonical_id: "matas_fe_perovskite",
        display_name: "FeSiO3 perovskite (Matas)",
        citation: "Matas et al. 2007",
        aliases: &[],
        build: matas_fe_perovskite,
    },
    CatalogEntry {
        canonical_id: "matas_periclase",
        display_name: "Periclase (Matas)",
        citation: "Matas et al. 2007",
        aliases: &[],
        build: matas_periclase,
    },
    CatalogEntry {
        canonical_id: "matas_wuestite",
        display_name: "Wüstite (Matas)",
        citation: "Matas et al. 2007",
        aliases: &[],
        build: matas_wuestite,
    },
    CatalogEntry {
        canonical_id: "speziale_fe_periclase",
        display_name: "Ferropericlase, Mg#83, spin transition at 60 GPa",
        citation: "Speziale et al. 2007",
        aliases: &["fe_periclase"],
        build: speziale_fe_periclase,
    },
    CatalogEntry {
        canonical_id: "speziale_fe_periclase_hs",
        display_name: "Ferropericlase, Mg#83, high spin",
        citation: "Speziale et al. 2007",
        aliases: &[],
        build: speziale_fe_periclase_hs,
    },
    CatalogEntry {
        canonical_id: "speziale_fe_periclase_ls",
        display_name: "Ferropericlase, Mg#83, low spin",
        citation: "Speziale et al. 2007",
        aliases: &[],
        build: speziale_fe_periclase_ls,
    },
];

pub fn entries() -> &'static [CatalogEntry] {
    &CATALOG
}

pub fn search(query: &str) -> Vec<&'static CatalogEntry> {
    CATALOG.iter().filter(|e| e.matches_query(query)).collect()
}

/// Look a material up by canonical id or alias (case-insensitive).
pub fn lookup(name: &str) -> MaterialResult<Material> {
    let key = name.trim().to_ascii_lowercase();
    CATALOG
        .iter()
        .find(|e| e.is_named(&key))
        .map(CatalogEntry::material)
        .ok_or_else(|| MaterialError::config(format!("unknown mineral: {name}")))
}

/// Parameter set of a single-mineral catalog entry.
pub fn parameters(name: &str) -> MaterialResult<ParameterSet> {
    match lookup(name)? {
        Material::Mineral(m) => Ok(m.params().clone()),
        _ => Err(MaterialError::config(format!(
            "{name} is not a single mineral"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sf_core::ErrorKind;
    use sf_core::units::k;

    #[test]
    fn ids_are_unique_and_lowercase() {
        let mut ids: Vec<&str> = entries().iter().map(|e| e.canonical_id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), entries().len());
        for e in entries() {
            assert_eq!(e.canonical_id, e.canonical_id.to_ascii_lowercase());
        }
    }

    #[test]
    fn every_entry_has_a_valid_eos() {
        for entry in entries() {
            for m in entry.material().minerals() {
                let eos = m.eos().expect("catalog minerals name their formulation");
                eos.check_params(m.params()).unwrap();
            }
        }
    }

    #[test]
    fn lookup_by_alias() {
        let m = lookup("MgO").unwrap();
        assert_eq!(m.name(), "periclase");
        assert_eq!(lookup("unobtainium").unwrap_err().kind(), ErrorKind::Configuration);
    }

    #[test]
    fn search_matches_display_names() {
        let hits = search("perovskite");
        assert_eq!(hits.len(), 4);
        assert_eq!(search("").len(), entries().len());
    }

    #[test]
    fn catalog_minerals_evaluate_at_lower_mantle_conditions() {
        for name in ["mg_perovskite", "matas_periclase", "wuestite"] {
            let mut m = lookup(name).unwrap();
            m.set_state(gpa(80.0), k(2200.0)).unwrap();
            let (_, leaf) = m.unroll().unwrap()[0];
            let rho = leaf.density().unwrap().value;
            assert!(rho > 3500.0 && rho < 10_000.0, "{name}: {rho}");
        }
    }

    #[test]
    fn ferropericlase_switches_spin_state_and_has_no_shear() {
        let mut fp = lookup("speziale_fe_periclase").unwrap();
        fp.set_state(gpa(70.0), k(2000.0)).unwrap();
        let (_, leaf) = fp.unroll().unwrap()[0];
        assert_eq!(leaf.name(), "speziale_fe_periclase_ls");
        assert!(leaf.density().is_ok());
        assert!(leaf.shear_modulus().is_err());
        fp.set_state(gpa(30.0), k(2000.0)).unwrap();
        assert_eq!(fp.unroll().unwrap()[0].1.name(), "speziale_fe_periclase_hs");
    }

    #[test]
    fn parameters_of_spin_transition_are_rejected() {
        assert!(parameters("speziale_fe_periclase").is_err());
        assert_eq!(parameters("periclase").unwrap().k_0, 161.0e9);
    }
}
