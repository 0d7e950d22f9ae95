//! A single mineral end-member bound to an equation of state.

use crate::error::{MaterialError, MaterialResult};
use crate::velocity::SeismicVelocities;
use sf_core::units::{Density, Pressure, Temperature, Velocity, kg_per_m3, pa};
use sf_eos::{EosRegistry, EquationOfState, ParameterSet};
use std::sync::Arc;

/// State fixed by the last `set_state` call; the volume is resolved once.
#[derive(Debug, Clone, Copy, PartialEq)]
struct MineralState {
    pressure: f64,
    temperature: f64,
    volume: f64,
}

/// A mineral end-member.
///
/// Owns its parameter set and shares its equation of state. Every derived
/// quantity is a function of the state stored by `set_state`; querying one
/// before a state is set is a state error.
#[derive(Debug, Clone)]
pub struct Mineral {
    name: String,
    params: ParameterSet,
    eos: Option<Arc<dyn EquationOfState>>,
    state: Option<MineralState>,
}

impl Mineral {
    /// Create a mineral. If the parameter set names a preferred formulation,
    /// that formulation is bound immediately.
    pub fn new(name: impl Into<String>, params: ParameterSet) -> Self {
        let eos = params.equation_of_state.map(|method| method.model());
        Self {
            name: name.into(),
            params,
            eos,
            state: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    pub fn eos(&self) -> Option<&Arc<dyn EquationOfState>> {
        self.eos.as_ref()
    }

    /// Select the formulation registered under `tag` in the built-in registry.
    pub fn set_method(&mut self, tag: &str) -> MaterialResult<()> {
        self.set_method_from(EosRegistry::builtin(), tag)
    }

    /// Select the formulation registered under `tag` in `registry`.
    pub fn set_method_from(&mut self, registry: &EosRegistry, tag: &str) -> MaterialResult<()> {
        let eos = registry.get(tag)?;
        self.set_eos(eos)
    }

    /// Bind `eos` after checking it has every parameter it needs.
    ///
    /// Clears any previously stored state.
    pub fn set_eos(&mut self, eos: Arc<dyn EquationOfState>) -> MaterialResult<()> {
        eos.check_params(&self.params)?;
        tracing::trace!(mineral = %self.name, eos = eos.name(), "equation of state selected");
        self.eos = Some(eos);
        self.state = None;
        Ok(())
    }

    /// Store a new state and resolve the molar volume for it.
    pub fn set_state(&mut self, pressure: Pressure, temperature: Temperature) -> MaterialResult<()> {
        self.set_state_si(pressure.value, temperature.value)
    }

    /// `set_state` on raw SI values [Pa], [K].
    pub fn set_state_si(&mut self, pressure: f64, temperature: f64) -> MaterialResult<()> {
        self.state = None;
        if !pressure.is_finite() {
            return Err(MaterialError::Domain {
                what: "pressure",
                value: pressure,
            });
        }
        let volume = self.bound_eos()?.volume(pressure, temperature, &self.params)?;
        self.state = Some(MineralState {
            pressure,
            temperature,
            volume,
        });
        Ok(())
    }

    pub fn has_state(&self) -> bool {
        self.state.is_some()
    }

    fn bound_eos(&self) -> MaterialResult<&Arc<dyn EquationOfState>> {
        self.eos.as_ref().ok_or_else(|| {
            MaterialError::config(format!("no equation of state selected for {}", self.name))
        })
    }

    fn current(&self) -> MaterialResult<(&Arc<dyn EquationOfState>, MineralState)> {
        let state = self.state.ok_or(MaterialError::State {
            what: "set_state has not been called",
        })?;
        Ok((self.bound_eos()?, state))
    }

    pub fn pressure(&self) -> MaterialResult<Pressure> {
        Ok(pa(self.current()?.1.pressure))
    }

    pub fn temperature(&self) -> MaterialResult<Temperature> {
        Ok(sf_core::units::k(self.current()?.1.temperature))
    }

    /// Molar volume [m³/mol].
    pub fn molar_volume(&self) -> MaterialResult<f64> {
        Ok(self.current()?.1.volume)
    }

    /// Molar mass [kg/mol]. State independent.
    pub fn molar_mass(&self) -> f64 {
        self.params.molar_mass
    }

    pub fn density(&self) -> MaterialResult<Density> {
        Ok(kg_per_m3(self.density_si()?))
    }

    /// Density [kg/m³].
    pub fn density_si(&self) -> MaterialResult<f64> {
        let volume = self.molar_volume()?;
        Ok(self.params.molar_mass / volume)
    }

    /// Isothermal bulk modulus K_T [Pa].
    pub fn isothermal_bulk_modulus(&self) -> MaterialResult<f64> {
        let (eos, s) = self.current()?;
        Ok(eos.isothermal_bulk_modulus(s.pressure, s.temperature, s.volume, &self.params)?)
    }

    /// Adiabatic bulk modulus K_S [Pa].
    pub fn adiabatic_bulk_modulus(&self) -> MaterialResult<f64> {
        let (eos, s) = self.current()?;
        Ok(eos.adiabatic_bulk_modulus(s.pressure, s.temperature, s.volume, &self.params)?)
    }

    /// Shear modulus G [Pa].
    pub fn shear_modulus(&self) -> MaterialResult<f64> {
        let (eos, s) = self.current()?;
        Ok(eos.shear_modulus(s.pressure, s.temperature, s.volume, &self.params)?)
    }

    /// Isochoric heat capacity [J/(mol·K)].
    pub fn heat_capacity_v(&self) -> MaterialResult<f64> {
        let (eos, s) = self.current()?;
        Ok(eos.heat_capacity_v(s.pressure, s.temperature, s.volume, &self.params)?)
    }

    /// Isobaric heat capacity [J/(mol·K)].
    pub fn heat_capacity_p(&self) -> MaterialResult<f64> {
        let (eos, s) = self.current()?;
        Ok(eos.heat_capacity_p(s.pressure, s.temperature, s.volume, &self.params)?)
    }

    /// Thermal expansivity [1/K].
    pub fn thermal_expansivity(&self) -> MaterialResult<f64> {
        let (eos, s) = self.current()?;
        Ok(eos.thermal_expansivity(s.pressure, s.temperature, s.volume, &self.params)?)
    }

    pub fn grueneisen_parameter(&self) -> MaterialResult<f64> {
        let (eos, s) = self.current()?;
        Ok(eos.grueneisen_parameter(s.pressure, s.temperature, s.volume, &self.params)?)
    }

    /// All three wave speeds at the current state.
    pub fn velocities(&self) -> MaterialResult<SeismicVelocities> {
        SeismicVelocities::from_moduli(
            self.adiabatic_bulk_modulus()?,
            self.shear_modulus()?,
            self.density_si()?,
        )
    }

    pub fn v_p(&self) -> MaterialResult<Velocity> {
        Ok(self.velocities()?.vp())
    }

    pub fn v_s(&self) -> MaterialResult<Velocity> {
        Ok(self.velocities()?.vs())
    }

    pub fn v_phi(&self) -> MaterialResult<Velocity> {
        Ok(self.velocities()?.vphi())
    }
}
