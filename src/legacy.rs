//! Differencing of cumulative sums recorded by version-1 writers into
//! per-frame running statistics.
//!
//! Version 1 energy files store `esum`/`eav` as running totals since
//! the start of the simulation rather than over the current averaging
//! window. This module recovers the per-window values, carrying state
//! across frames explicitly rather than through any global.

use crate::energy::Energy;

/// Per-file legacy state, threaded through consecutive frames of one
/// version-1 decode. Never shared across files or stored globally.
#[derive(Debug, Clone, Default)]
pub(crate) struct LegacyState {
    first_step: Option<i64>,
    step_prev: i64,
    nsum_prev: i64,
    prev_energy: Vec<(f64, f64)>,
}

impl LegacyState {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Header-level fixup run once per v1 frame (spec step 4.4.10):
    /// on the first frame of the file, seeds `first_step`/`step_prev`;
    /// always recomputes `nsum`/`nsteps`/`dt` from `step`.
    pub(crate) fn fixup_header(&mut self, step: i64, nsum: &mut i32, nsteps: &mut i64, dt: &mut f64) {
        let is_first_frame = self.first_step.is_none();
        let first_step = *self.first_step.get_or_insert(step);
        if is_first_frame {
            self.step_prev = step;
            self.nsum_prev = 0;
        }
        *nsum = (step - first_step + 1) as i32;
        *nsteps = step - self.step_prev;
        *dt = 0.0;
    }

    /// Converts `energies`' cumulative `esum`/`eav` into per-window
    /// values in place, per §4.6. `step` is the frame's step number;
    /// `nsum` is mutated to reflect the resolved averaging window.
    pub(crate) fn apply(&mut self, step: i64, nsum: &mut i32, energies: &mut [Energy]) {
        let first_step = *self.first_step.get_or_insert(step);
        let nstep_all = step - first_step + 1;

        let any_nonzero_e = energies.iter().any(|e| e.e != 0.0);
        let all_zero_esum = energies.iter().all(|e| e.esum == 0.0);
        if any_nonzero_e && all_zero_esum {
            *nsum = 0;
        }

        if self.prev_energy.len() != energies.len() {
            self.prev_energy.resize(energies.len(), (0.0, 0.0));
        }

        if *nsum > 1 && i64::from(*nsum) == nstep_all && self.nsum_prev > 0 {
            *nsum = (step - self.step_prev) as i32;
            let n_new = i64::from(*nsum);
            for (energy, prev) in energies.iter_mut().zip(self.prev_energy.iter_mut()) {
                let esum_all = energy.esum;
                let eav_all = energy.eav;
                let new_esum = esum_all - prev.0;
                let delta = prev.0 / (nstep_all - n_new) as f64 - esum_all / nstep_all as f64;
                let new_eav =
                    eav_all - prev.1 - delta * delta * (nstep_all - n_new) as f64 * nstep_all as f64 / n_new as f64;
                energy.esum = new_esum;
                energy.eav = new_eav;
                *prev = (esum_all, eav_all);
            }
            self.nsum_prev = nstep_all;
        } else if *nsum > 0 {
            debug_assert_eq!(i64::from(*nsum), nstep_all);
            for (energy, prev) in energies.iter().zip(self.prev_energy.iter_mut()) {
                *prev = (energy.esum, energy.eav);
            }
            self.nsum_prev = nstep_all;
        }

        self.step_prev = step;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn energies(es: &[f64], sums: &[f64], avs: &[f64]) -> Vec<Energy> {
        es.iter()
            .zip(sums)
            .zip(avs)
            .map(|((&e, &esum), &eav)| Energy { e, eav, esum })
            .collect()
    }

    #[test]
    fn seeds_then_differences_across_frames() {
        let mut state = LegacyState::new();

        let mut nsum = 1;
        let mut frame1 = energies(&[10.0], &[10.0], &[10.0]);
        state.apply(0, &mut nsum, &mut frame1);
        assert_eq!(nsum, 1);
        assert_eq!(frame1[0].esum, 10.0);

        let mut nsum = 2;
        let mut frame2 = energies(&[20.0], &[30.0], &[40.0]);
        state.apply(1, &mut nsum, &mut frame2);
        assert_eq!(nsum, 1);
        assert_eq!(frame2[0].esum, 20.0);
    }

    #[test]
    fn missing_sums_force_nsum_zero() {
        let mut state = LegacyState::new();
        let mut nsum = 1;
        let mut frame = energies(&[5.0], &[0.0], &[0.0]);
        state.apply(0, &mut nsum, &mut frame);
        assert_eq!(nsum, 0);
    }
}
