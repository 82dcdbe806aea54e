//! Injectable randomness: per-domain seeded streams plus the draw helpers every resolver uses.
//!
//! All resolvers take `&mut R where R: Rng + ?Sized` and draw exclusively through
//! [`roll_unit`] and the helpers built on it, so a [`ScriptedRng`] can replay an exact
//! sequence of outcomes in tests.
use hmac::{Hmac, Mac};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use sha2::Sha256;

/// Deterministic bundle of RNG streams segregated by simulation domain.
#[derive(Debug, Clone)]
pub struct RngBundle {
    weather: CountingRng<SmallRng>,
    hazards: CountingRng<SmallRng>,
    crossing: CountingRng<SmallRng>,
    hunt: CountingRng<SmallRng>,
}

impl RngBundle {
    /// Construct the bundle from a user-visible seed.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        Self {
            weather: CountingRng::new(derive_stream_seed(seed, b"weather")),
            hazards: CountingRng::new(derive_stream_seed(seed, b"hazards")),
            crossing: CountingRng::new(derive_stream_seed(seed, b"crossing")),
            hunt: CountingRng::new(derive_stream_seed(seed, b"hunt")),
        }
    }

    /// Re-derive streams for a journey resumed from a snapshot taken on `day`.
    /// Day zero matches [`Self::from_user_seed`].
    #[must_use]
    pub fn resume(seed: u64, day: u32) -> Self {
        if day == 0 {
            return Self::from_user_seed(seed);
        }
        Self::from_user_seed(seed ^ u64::from(day).wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }

    /// Access the weather stream.
    pub const fn weather(&mut self) -> &mut CountingRng<SmallRng> {
        &mut self.weather
    }

    /// Access the daily hazard stream.
    pub const fn hazards(&mut self) -> &mut CountingRng<SmallRng> {
        &mut self.hazards
    }

    /// Access the river crossing stream.
    pub const fn crossing(&mut self) -> &mut CountingRng<SmallRng> {
        &mut self.crossing
    }

    /// Access the hunting stream.
    pub const fn hunt(&mut self) -> &mut CountingRng<SmallRng> {
        &mut self.hunt
    }

    /// Total draws performed across every stream.
    #[must_use]
    pub const fn total_draws(&self) -> u64 {
        self.weather
            .draws()
            .saturating_add(self.hazards.draws())
            .saturating_add(self.crossing.draws())
            .saturating_add(self.hunt.draws())
    }
}

/// Counting wrapper for RNG streams providing instrumentation.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl CountingRng<SmallRng> {
    fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            draws: 0,
        }
    }
}

impl<R: RngCore> CountingRng<R> {
    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: RngCore> RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    // HMAC accepts keys of any length, so construction cannot fail for an 8-byte key.
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()) else {
        return user_seed;
    };
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0_u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}

/// Replays a fixed list of unit fractions in `[0, 1)`, cycling when exhausted.
///
/// Each fraction becomes exactly one [`roll_unit`] result, rounded up to the
/// nearest multiple of 2^-24.
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    script: Vec<f32>,
    cursor: usize,
}

impl ScriptedRng {
    #[must_use]
    pub fn new(script: impl Into<Vec<f32>>) -> Self {
        Self {
            script: script.into(),
            cursor: 0,
        }
    }

    /// Number of fractions consumed so far.
    #[must_use]
    pub const fn consumed(&self) -> usize {
        self.cursor
    }
}

impl RngCore for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        let fraction = if self.script.is_empty() {
            0.0
        } else {
            self.script[self.cursor % self.script.len()]
        };
        self.cursor = self.cursor.saturating_add(1);
        // `Standard` keeps the top 24 bits of a u32 when sampling an f32. Rounding up
        // keeps a scripted fraction equal to a threshold from slipping under it.
        let mantissa = (f64::from(fraction.clamp(0.0, 0.999_999_94)) * f64::from(1_u32 << 24))
            .ceil()
            .clamp(0.0, f64::from((1_u32 << 24) - 1));
        let bits = num_traits::cast::<f64, u32>(mantissa).unwrap_or(0);
        bits << 8
    }

    fn next_u64(&mut self) -> u64 {
        u64::from(self.next_u32()) << 32
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// Uniform draw in `[0, 1)`.
pub fn roll_unit<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.r#gen::<f32>()
}

/// Returns true with probability `chance` (clamped into `[0, 1]`).
pub fn roll_chance<R: Rng + ?Sized>(rng: &mut R, chance: f32) -> bool {
    roll_unit(rng) < chance.clamp(0.0, 1.0)
}

/// Uniform index in `0..len`; `len` of zero yields zero.
pub fn roll_index<R: Rng + ?Sized>(rng: &mut R, len: usize) -> usize {
    if len <= 1 {
        let _ = roll_unit(rng);
        return 0;
    }
    let span = num_traits::cast::<usize, f32>(len).unwrap_or(1.0);
    let picked = num_traits::cast::<f32, usize>((roll_unit(rng) * span).floor()).unwrap_or(0);
    picked.min(len - 1)
}

/// Uniform integer in `[low, high)`; collapses to `low` for empty ranges.
pub fn roll_between<R: Rng + ?Sized>(rng: &mut R, low: u32, high: u32) -> u32 {
    if high <= low {
        let _ = roll_unit(rng);
        return low;
    }
    let span = usize::try_from(high - low).unwrap_or(usize::MAX);
    let offset = u32::try_from(roll_index(rng, span)).unwrap_or(0);
    low.saturating_add(offset)
}

/// Uniform real in `[low, high)`.
pub fn roll_span<R: Rng + ?Sized>(rng: &mut R, low: f32, high: f32) -> f32 {
    let unit = roll_unit(rng);
    if high <= low {
        return low;
    }
    (high - low).mul_add(unit, low)
}
