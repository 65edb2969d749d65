//! Owns the simulation substrate shared by every node: the current
//! pattern count/capacity and the PRNG used for fresh input patterns and
//! counter-example absorption.
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Tunables for the simulation substrate, passed to `Mgr::new`.
#[derive(Clone, Copy, Debug)]
pub struct SimConfig {
    /// Initial signature size in 64-bit words (`FraigMgrImpl`'s `sig_size`).
    pub sig_size: usize,
    /// PRNG seed -- fixed rather than OS-entropy so a run is reproducible.
    pub seed: u64,
    /// Out of 100, the chance each non-model bit of an absorbed
    /// counter-example word gets flipped away from the SAT model's value.
    /// The original's `rd100(mRandGen) <= 3` is 3 inclusive, i.e. 4/100;
    /// kept as the literal threshold rather than rephrased as a fraction.
    pub flip_bias_pct: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig { sig_size: 64, seed: 0x5EED_F00D, flip_bias_pct: 3 }
    }
}

pub(crate) struct SimEngine {
    pat_size: usize,
    pat_used: usize,
    rng: StdRng,
    flip_bias_pct: u32,
}

impl SimEngine {
    pub(crate) fn new(cfg: &SimConfig) -> Self {
        SimEngine {
            pat_size: cfg.sig_size * 2,
            pat_used: cfg.sig_size,
            rng: StdRng::seed_from_u64(cfg.seed),
            flip_bias_pct: cfg.flip_bias_pct,
        }
    }

    pub(crate) fn pat_used(&self) -> usize { self.pat_used }

    /// A fresh random pattern spanning all of `pat_used` -- `FraigMgrImpl::make_input`.
    pub(crate) fn random_initial_pattern(&mut self) -> Vec<u64> {
        (0..self.pat_used).map(|_| self.rng.gen::<u64>()).collect()
    }

    /// Whether growing by one more pattern word needs more backing
    /// capacity first -- Rust's `Vec` absorbs the growth itself, so unlike
    /// `FraigMgrImpl::resize_pat` there is no per-node array to reallocate;
    /// this only tracks the logical capacity bookkeeping `Mgr::add_pat`
    /// still needs to decide when to double `pat_size`.
    pub(crate) fn needs_growth(&self) -> bool { self.pat_size <= self.pat_used }

    pub(crate) fn double_capacity(&mut self) { self.pat_size *= 2; }

    /// One new word biased toward `model_bit`, independently flipping each
    /// of the other 63 bits with probability `flip_bias_pct` out of 100 --
    /// `FraigMgrImpl::add_pat`'s counter-example absorption.
    pub(crate) fn biased_word(&mut self, model_bit: bool) -> u64 {
        let mut word = if model_bit { u64::MAX } else { 0 };
        for b in 1..64 {
            if self.rng.gen_range(0..100u32) <= self.flip_bias_pct {
                word ^= 1u64 << b;
            }
        }
        word
    }

    pub(crate) fn advance(&mut self) { self.pat_used += 1; }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_is_reproducible() {
        let cfg = SimConfig { sig_size: 8, seed: 42, flip_bias_pct: 3 };
        let mut a = SimEngine::new(&cfg);
        let mut b = SimEngine::new(&cfg);
        assert_eq!(a.random_initial_pattern(), b.random_initial_pattern());
    }

    #[test]
    fn biased_word_always_matches_model_bit_at_bit_zero() {
        let cfg = SimConfig::default();
        let mut e = SimEngine::new(&cfg);
        assert_eq!(e.biased_word(true) & 1, 1);
        assert_eq!(e.biased_word(false) & 1, 0);
    }

    #[test]
    fn growth_doubles_capacity_once_pat_used_catches_up() {
        let cfg = SimConfig { sig_size: 2, seed: 1, flip_bias_pct: 3 };
        let mut e = SimEngine::new(&cfg);
        assert!(!e.needs_growth()); // pat_size=4, pat_used=2
        e.advance();
        e.advance();
        assert!(e.needs_growth()); // pat_used caught up to pat_size
        e.double_capacity();
        assert!(!e.needs_growth());
    }
}
