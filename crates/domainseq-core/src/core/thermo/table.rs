use super::params::{NUM_PAIRS, NearestNeighborParams, pair_key};

/// Offset between degrees Celsius and Kelvin.
pub const KELVIN_OFFSET: f64 = 273.15;

/// Immutable stacking free energies (kcal/mol) at one temperature.
///
/// Entry `(first << 2) | second` holds `dH - T * dS / 1000` with `T` in Kelvin,
/// negated when the table was built with `negate = true`.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyTable {
    temperature: f64,
    negate: bool,
    values: [f64; NUM_PAIRS],
}

impl EnergyTable {
    pub fn build(params: &NearestNeighborParams, temperature: f64, negate: bool) -> Self {
        let kelvin = temperature + KELVIN_OFFSET;
        let values = std::array::from_fn(|key| {
            let stack = params.get(key);
            let dg = stack.enthalpy - kelvin * stack.entropy / 1000.0;
            if negate { -dg } else { dg }
        });
        Self {
            temperature,
            negate,
            values,
        }
    }

    #[inline]
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    #[inline]
    pub fn is_negated(&self) -> bool {
        self.negate
    }

    #[inline(always)]
    pub fn pair_energy(&self, first: u8, second: u8) -> f64 {
        self.values[pair_key(first, second)]
    }

    #[inline(always)]
    pub fn by_key(&self, key: usize) -> f64 {
        self.values[key]
    }

    pub fn values(&self) -> &[f64; NUM_PAIRS] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alphabet::{CODE_A, CODE_C};

    const TOLERANCE: f64 = 1e-9;

    #[test]
    fn table_at_37_matches_hand_computed_values() {
        let table = EnergyTable::build(&NearestNeighborParams::default(), 37.0, false);
        assert!((table.pair_energy(CODE_A, CODE_A) - (-7.6 + 310.15 * 21.3 / 1000.0)).abs() < TOLERANCE);
        assert!((table.pair_energy(CODE_A, CODE_C) - (-8.4 + 310.15 * 22.4 / 1000.0)).abs() < TOLERANCE);
    }

    #[test]
    fn negated_table_flips_every_sign() {
        let params = NearestNeighborParams::default();
        let plain = EnergyTable::build(&params, 55.0, false);
        let negated = EnergyTable::build(&params, 55.0, true);
        for key in 0..NUM_PAIRS {
            assert_eq!(plain.by_key(key), -negated.by_key(key));
        }
        assert!(negated.is_negated());
    }
}
