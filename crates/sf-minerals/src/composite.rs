//! Rocks: minerals, nested composites and pressure-switched phases.

use crate::error::{MaterialError, MaterialResult};
use crate::mineral::Mineral;
use sf_core::units::{Pressure, Temperature};
use sf_eos::EquationOfState;
use std::sync::Arc;

/// Tolerance on the sum of sibling fractions.
pub const FRACTION_TOLERANCE: f64 = 1e-8;

/// Anything that can be evaluated as part of a rock.
#[derive(Debug, Clone)]
pub enum Material {
    Mineral(Mineral),
    Composite(Composite),
    SpinTransition(SpinTransition),
}

/// One component of a composite, with its molar fraction.
#[derive(Debug, Clone)]
pub struct PhaseEntry {
    pub fraction: f64,
    pub material: Material,
}

/// Ordered mixture of materials whose sibling fractions sum to one.
#[derive(Debug, Clone)]
pub struct Composite {
    phases: Vec<PhaseEntry>,
}

/// A phase that is its low-spin mineral at or above the transition pressure
/// and its high-spin mineral below it.
#[derive(Debug, Clone)]
pub struct SpinTransition {
    name: String,
    transition_pressure: f64,
    low_spin: Mineral,
    high_spin: Mineral,
    pressure: Option<f64>,
}

fn check_fraction(fraction: f64) -> MaterialResult<()> {
    if fraction.is_finite() && fraction > 0.0 && fraction <= 1.0 + FRACTION_TOLERANCE {
        Ok(())
    } else {
        Err(MaterialError::config(format!(
            "phase fraction {fraction} outside (0, 1]"
        )))
    }
}

fn check_sum(sum: f64) -> MaterialResult<()> {
    if (sum - 1.0).abs() <= FRACTION_TOLERANCE {
        Ok(())
    } else {
        Err(MaterialError::config(format!(
            "phase fractions sum to {sum}, expected 1"
        )))
    }
}

impl Composite {
    /// Build a composite from `(fraction, material)` pairs.
    ///
    /// Fractions must lie in (0, 1] and sum to one within
    /// [`FRACTION_TOLERANCE`].
    pub fn new(phases: Vec<(f64, Material)>) -> MaterialResult<Self> {
        if phases.is_empty() {
            return Err(MaterialError::config("composite has no phases"));
        }
        for (fraction, _) in &phases {
            check_fraction(*fraction)?;
        }
        check_sum(phases.iter().map(|(f, _)| f).sum())?;
        Ok(Self {
            phases: phases
                .into_iter()
                .map(|(fraction, material)| PhaseEntry { fraction, material })
                .collect(),
        })
    }

    /// Build a composite after rescaling positive weights to sum to one.
    pub fn normalized(phases: Vec<(f64, Material)>) -> MaterialResult<Self> {
        if phases.iter().any(|(w, _)| !(w.is_finite() && *w > 0.0)) {
            return Err(MaterialError::config("phase weights must be positive"));
        }
        let total: f64 = phases.iter().map(|(w, _)| w).sum();
        if total <= 0.0 {
            return Err(MaterialError::config("composite has no phases"));
        }
        Self::new(
            phases
                .into_iter()
                .map(|(w, material)| (w / total, material))
                .collect(),
        )
    }

    pub fn phases(&self) -> &[PhaseEntry] {
        &self.phases
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }
}

impl SpinTransition {
    pub fn new(
        name: impl Into<String>,
        transition_pressure: Pressure,
        low_spin: Mineral,
        high_spin: Mineral,
    ) -> Self {
        Self {
            name: name.into(),
            transition_pressure: transition_pressure.value,
            low_spin,
            high_spin,
            pressure: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Transition pressure [Pa].
    pub fn transition_pressure(&self) -> f64 {
        self.transition_pressure
    }

    pub fn low_spin(&self) -> &Mineral {
        &self.low_spin
    }

    pub fn high_spin(&self) -> &Mineral {
        &self.high_spin
    }

    /// The mineral selected by the current pressure.
    pub fn active(&self) -> MaterialResult<&Mineral> {
        let pressure = self.pressure.ok_or(MaterialError::State {
            what: "spin transition pressure not set",
        })?;
        Ok(if pressure >= self.transition_pressure {
            &self.low_spin
        } else {
            &self.high_spin
        })
    }

    fn set_state_si(&mut self, pressure: f64, temperature: f64) -> MaterialResult<()> {
        self.pressure = None;
        let active = if pressure >= self.transition_pressure {
            &mut self.low_spin
        } else {
            &mut self.high_spin
        };
        active.set_state_si(pressure, temperature)?;
        self.pressure = Some(pressure);
        Ok(())
    }
}

impl Material {
    pub fn name(&self) -> &str {
        match self {
            Material::Mineral(m) => m.name(),
            Material::Composite(_) => "composite",
            Material::SpinTransition(s) => s.name(),
        }
    }

    /// Bind the formulation tagged `tag` to every leaf mineral.
    pub fn set_method(&mut self, tag: &str) -> MaterialResult<()> {
        match self {
            Material::Mineral(m) => m.set_method(tag),
            Material::Composite(c) => c
                .phases
                .iter_mut()
                .try_for_each(|p| p.material.set_method(tag)),
            Material::SpinTransition(s) => {
                s.pressure = None;
                s.low_spin.set_method(tag)?;
                s.high_spin.set_method(tag)
            }
        }
    }

    /// Bind one formulation instance to every leaf mineral.
    pub fn set_eos(&mut self, eos: &Arc<dyn EquationOfState>) -> MaterialResult<()> {
        match self {
            Material::Mineral(m) => m.set_eos(Arc::clone(eos)),
            Material::Composite(c) => c
                .phases
                .iter_mut()
                .try_for_each(|p| p.material.set_eos(eos)),
            Material::SpinTransition(s) => {
                s.pressure = None;
                s.low_spin.set_eos(Arc::clone(eos))?;
                s.high_spin.set_eos(Arc::clone(eos))
            }
        }
    }

    pub fn set_state(&mut self, pressure: Pressure, temperature: Temperature) -> MaterialResult<()> {
        self.set_state_si(pressure.value, temperature.value)
    }

    /// Set the state of every leaf mineral from raw SI values [Pa], [K].
    pub fn set_state_si(&mut self, pressure: f64, temperature: f64) -> MaterialResult<()> {
        match self {
            Material::Mineral(m) => m.set_state_si(pressure, temperature),
            Material::Composite(c) => c
                .phases
                .iter_mut()
                .try_for_each(|p| p.material.set_state_si(pressure, temperature)),
            Material::SpinTransition(s) => s.set_state_si(pressure, temperature),
        }
    }

    /// Flatten into `(fraction, leaf mineral)` pairs.
    ///
    /// Fractions multiply down the nesting chain and sum to one. Spin
    /// transitions resolve to the mineral selected by the current state, so
    /// the result must be re-derived after every `set_state`.
    pub fn unroll(&self) -> MaterialResult<Vec<(f64, &Mineral)>> {
        let mut out = Vec::new();
        self.unroll_into(1.0, &mut out)?;
        check_sum(out.iter().map(|(f, _)| f).sum())?;
        Ok(out)
    }

    fn unroll_into<'a>(&'a self, scale: f64, out: &mut Vec<(f64, &'a Mineral)>) -> MaterialResult<()> {
        match self {
            Material::Mineral(m) => out.push((scale, m)),
            Material::Composite(c) => {
                for phase in &c.phases {
                    phase.material.unroll_into(scale * phase.fraction, out)?;
                }
            }
            Material::SpinTransition(s) => out.push((scale, s.active()?)),
        }
        Ok(())
    }

    /// Every leaf mineral, including both sides of spin transitions.
    pub fn minerals(&self) -> Vec<&Mineral> {
        let mut out = Vec::new();
        self.collect_minerals(&mut out);
        out
    }

    fn collect_minerals<'a>(&'a self, out: &mut Vec<&'a Mineral>) {
        match self {
            Material::Mineral(m) => out.push(m),
            Material::Composite(c) => c.phases.iter().for_each(|p| p.material.collect_minerals(out)),
            Material::SpinTransition(s) => {
                out.push(&s.low_spin);
                out.push(&s.high_spin);
            }
        }
    }
}

impl From<Mineral> for Material {
    fn from(m: Mineral) -> Self {
        Material::Mineral(m)
    }
}

impl From<Composite> for Material {
    fn from(c: Composite) -> Self {
        Material::Composite(c)
    }
}

impl From<SpinTransition> for Material {
    fn from(s: SpinTransition) -> Self {
        Material::SpinTransition(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sf_core::ErrorKind;
    use sf_core::units::{gpa, k};
    use sf_eos::{EosMethod, ParameterSet};

    fn mineral(name: &str, v_0: f64) -> Mineral {
        Mineral::new(
            name,
            ParameterSet::new(v_0, 160.0e9, 4.0, 0.04, 2.0)
                .with_shear(130.0e9, 2.0)
                .with_method(EosMethod::Bm3),
        )
    }

    #[test]
    fn nested_fractions_multiply() {
        let inner = Composite::new(vec![
            (0.25, mineral("a", 11.0e-6).into()),
            (0.75, mineral("b", 12.0e-6).into()),
        ])
        .unwrap();
        let rock: Material = Composite::new(vec![
            (0.4, inner.into()),
            (0.6, mineral("c", 13.0e-6).into()),
        ])
        .unwrap()
        .into();
        let flat = rock.unroll().unwrap();
        let fractions: Vec<f64> = flat.iter().map(|(f, _)| *f).collect();
        let names: Vec<&str> = flat.iter().map(|(_, m)| m.name()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert!((fractions[0] - 0.1).abs() < 1e-15);
        assert!((fractions[1] - 0.3).abs() < 1e-15);
        assert!((fractions[2] - 0.6).abs() < 1e-15);
    }

    #[test]
    fn bad_fractions_are_rejected() {
        let err = Composite::new(vec![
            (0.5, mineral("a", 11.0e-6).into()),
            (0.4, mineral("b", 12.0e-6).into()),
        ])
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(Composite::new(vec![(0.0, mineral("a", 11.0e-6).into())]).is_err());
        assert!(Composite::new(vec![]).is_err());
    }

    #[test]
    fn normalized_rescales_weights() {
        let c = Composite::normalized(vec![
            (2.0, mineral("a", 11.0e-6).into()),
            (6.0, mineral("b", 12.0e-6).into()),
        ])
        .unwrap();
        assert!((c.phases()[0].fraction - 0.25).abs() < 1e-15);
        assert!(Composite::normalized(vec![(-1.0, mineral("a", 11.0e-6).into())]).is_err());
    }

    #[test]
    fn spin_transition_switches_at_threshold() {
        let mut rock: Material = SpinTransition::new(
            "fp",
            gpa(60.0),
            mineral("low", 10.0e-6),
            mineral("high", 11.0e-6),
        )
        .into();
        assert_eq!(rock.unroll().unwrap_err().kind(), ErrorKind::State);

        rock.set_state(gpa(59.0), k(300.0)).unwrap();
        assert_eq!(rock.unroll().unwrap()[0].1.name(), "high");
        rock.set_state(gpa(60.0), k(300.0)).unwrap();
        assert_eq!(rock.unroll().unwrap()[0].1.name(), "low");
        assert_eq!(rock.minerals().len(), 2);
    }

    #[test]
    fn set_method_reaches_every_leaf() {
        let mut rock: Material = Composite::new(vec![
            (0.5, mineral("a", 11.0e-6).into()),
            (
                0.5,
                SpinTransition::new("s", gpa(60.0), mineral("l", 10.0e-6), mineral("h", 11.0e-6))
                    .into(),
            ),
        ])
        .unwrap()
        .into();
        rock.set_method("bm2").unwrap();
        for m in rock.minerals() {
            assert_eq!(m.eos().unwrap().name(), "bm2");
        }
    }

    #[test]
    fn set_state_reaches_every_leaf() {
        let mut rock: Material = Composite::new(vec![
            (0.3, mineral("a", 11.0e-6).into()),
            (0.7, mineral("b", 12.0e-6).into()),
        ])
        .unwrap()
        .into();
        rock.set_state(gpa(20.0), k(1000.0)).unwrap();
        for (_, m) in rock.unroll().unwrap() {
            assert_eq!(m.pressure().unwrap().value, 20.0e9);
        }
    }
}
