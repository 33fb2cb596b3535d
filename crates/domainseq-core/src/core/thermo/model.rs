use super::cache::{BatchEnergyCache, ScalarEnergyCache};
use super::energy;
use super::params::NearestNeighborParams;
use super::table::EnergyTable;
use crate::core::alphabet::{self, CodecError};
use crate::core::matrix::SeqMatrix;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::trace;

const SCALAR_CACHE_CAPACITY: usize = 100_000;

type TableKey = (u64, bool);

/// Nearest-neighbor energy model with per-instance table and energy memoization.
///
/// Tables are built at most once per `(temperature, negate)` key, under the
/// table lock, and shared as `Arc`s. The model is `Sync` and may be read from
/// several computations at once.
#[derive(Debug)]
pub struct EnergyModel {
    params: NearestNeighborParams,
    tables: Mutex<HashMap<TableKey, Arc<EnergyTable>>>,
    scalar: Mutex<ScalarEnergyCache>,
}

impl EnergyModel {
    pub fn new(params: NearestNeighborParams) -> Self {
        Self {
            params,
            tables: Mutex::new(HashMap::new()),
            scalar: Mutex::new(ScalarEnergyCache::with_capacity(SCALAR_CACHE_CAPACITY)),
        }
    }

    pub fn params(&self) -> &NearestNeighborParams {
        &self.params
    }

    pub fn table(&self, temperature: f64, negate: bool) -> Arc<EnergyTable> {
        let mut tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        let table = tables
            .entry((temperature.to_bits(), negate))
            .or_insert_with(|| {
                trace!(temperature, negate, "Building nearest-neighbor energy table.");
                Arc::new(EnergyTable::build(&self.params, temperature, negate))
            });
        Arc::clone(table)
    }

    pub fn cached_table_count(&self) -> usize {
        self.tables
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Drops every memoized table and scalar energy.
    pub fn clear_caches(&self) {
        self.tables
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.scalar
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn duplex_energy(&self, row: &[u8], temperature: f64) -> f64 {
        energy::duplex_energy(row, &self.table(temperature, false))
    }

    pub fn duplex_energies(&self, matrix: &SeqMatrix, temperature: f64, negate: bool) -> Vec<f64> {
        energy::duplex_energies(matrix, &self.table(temperature, negate))
    }

    pub fn duplex_energies_cached(
        &self,
        matrix: &SeqMatrix,
        temperature: f64,
        negate: bool,
        cache: &BatchEnergyCache,
    ) -> Arc<Vec<f64>> {
        cache.get_or_compute(matrix, temperature, negate, || {
            self.duplex_energies(matrix, temperature, negate)
        })
    }

    /// Energy of a sequence given as a string, memoized per `(sequence, temperature, negate)`.
    pub fn sequence_energy(
        &self,
        sequence: &str,
        temperature: f64,
        negate: bool,
    ) -> Result<f64, CodecError> {
        let key = sequence.to_ascii_uppercase();
        if let Some(hit) = self
            .scalar
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key, temperature, negate)
        {
            return Ok(hit);
        }

        let row = alphabet::encode(sequence)?;
        let value = energy::duplex_energy(&row, &self.table(temperature, negate));
        self.scalar
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(&key, temperature, negate, value);
        Ok(value)
    }

    /// Energies of several strings, computed through the batched path.
    pub fn sequence_energies<S: AsRef<str>>(
        &self,
        sequences: &[S],
        temperature: f64,
        negate: bool,
    ) -> Result<Vec<f64>, CodecError> {
        let matrix = alphabet::encode_batch(sequences)?;
        Ok(self.duplex_energies(&matrix, temperature, negate))
    }
}

impl Default for EnergyModel {
    fn default() -> Self {
        Self::new(NearestNeighborParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn table_is_built_once_per_key() {
        let model = EnergyModel::default();
        let a = model.table(37.0, false);
        let b = model.table(37.0, false);
        assert!(Arc::ptr_eq(&a, &b));
        model.table(37.0, true);
        model.table(55.0, false);
        assert_eq!(model.cached_table_count(), 3);
    }

    #[test]
    fn clear_caches_forgets_tables() {
        let model = EnergyModel::default();
        model.table(37.0, false);
        model.clear_caches();
        assert_eq!(model.cached_table_count(), 0);
    }

    #[test]
    fn concurrent_readers_share_one_table() {
        let model = Arc::new(EnergyModel::default());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let model = Arc::clone(&model);
                thread::spawn(move || model.table(42.0, false))
            })
            .collect();
        let tables: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(tables.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
        assert_eq!(model.cached_table_count(), 1);
    }

    #[test]
    fn sequence_energy_matches_batched_path_and_is_case_insensitive() {
        let model = EnergyModel::default();
        let single = model.sequence_energy("acgtta", 37.0, false).unwrap();
        let batched = model.sequence_energies(&["ACGTTA"], 37.0, false).unwrap();
        assert_eq!(single, batched[0]);
        assert_eq!(model.sequence_energy("ACGTTA", 37.0, false).unwrap(), single);
    }

    #[test]
    fn sequence_energy_rejects_invalid_symbols() {
        let model = EnergyModel::default();
        assert_eq!(
            model.sequence_energy("ACNT", 37.0, false),
            Err(CodecError::InvalidSymbol('N'))
        );
    }

    #[test]
    fn duplex_energies_cached_returns_same_values() {
        let model = EnergyModel::default();
        let matrix = alphabet::encode_batch(&["AAAA", "GCGC"]).unwrap();
        let cache = BatchEnergyCache::new(true);
        let cached = model.duplex_energies_cached(&matrix, 37.0, false, &cache);
        assert_eq!(*cached, model.duplex_energies(&matrix, 37.0, false));
    }
}
