//! Reversible share codes for reproducible journeys.
//! Code format: <TRAIL>-<WORD><NN>, e.g. OR-WAGON42, MO-BISON07

use crate::trail::TrailVariant;

fn fnv1a64(bytes: &[u8]) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0100_0000_01b3;
    let mut hash = FNV_OFFSET;
    for b in bytes {
        hash = (hash ^ u64::from(*b)).wrapping_mul(FNV_PRIME);
    }
    hash
}

fn sanitize_word(word: &str) -> String {
    word.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

pub const WORD_LIST: [&str; 64] = [
    "WAGON", "OXEN", "PRAIRIE", "RIVER", "FORD", "FERRY", "BISON", "SAGE", "PLATTE", "KEARNY",
    "LARAMIE", "CHIMNEY", "BLUFFS", "CANVAS", "AXLE", "YOKE", "SADDLE", "RIFLE", "POWDER", "BACON",
    "FLOUR", "COFFEE", "BEANS", "LANTERN", "QUILT", "BONNET", "SCOUT", "GUIDE", "TRADER", "MULE",
    "HORSE", "PONY", "CREEK", "BUTTE", "MESA", "PASS", "SUMMIT", "VALLEY", "DUST", "STORM",
    "THUNDER", "HAIL", "SNOW", "FROST", "SUNRISE", "EMBER", "STAR", "MOON", "COMPASS", "MAP",
    "TRAIL", "SPRING", "WILLOW", "COTTON", "ASPEN", "PINE", "ELK", "ANTLER", "COYOTE", "HAWK",
    "EAGLE", "OWL", "BADGER", "BEAVER",
];

#[inline]
fn pack(word_index: u16, nn: u8) -> u16 {
    word_index & 0x01FF | ((u16::from(nn) & 0x7F) << 9)
}

#[inline]
fn unpack(packed: u16) -> (u16, u8) {
    let nn = u8::try_from((packed >> 9) & 0x7F).unwrap_or(0);
    (packed & 0x01FF, nn)
}

fn compose_seed(trail: TrailVariant, word_index: u16, nn: u8) -> u64 {
    let packed = pack(word_index, nn);
    let [low, high] = packed.to_le_bytes();
    let code = trail.code().as_bytes();
    // Domain-separated FNV input
    let mut buf = [0u8; 12];
    buf[..7].copy_from_slice(b"PLATTE-");
    buf[7] = code[0];
    buf[8] = code[1];
    buf[9] = low;
    buf[10] = high;
    buf[11] = 0xA5;
    let h = fnv1a64(&buf);
    (h & 0xFFFF_FFFF_FFFF_0000) | u64::from(packed)
}

/// Render `seed` as a share code. Only the low 16 bits survive the round trip.
#[must_use]
pub fn encode_friendly(trail: TrailVariant, seed: u64) -> String {
    let packed = u16::try_from(seed & 0xFFFF).unwrap_or(0);
    let (wi, mut nn) = unpack(packed);
    let word = WORD_LIST.get(usize::from(wi)).copied().unwrap_or("WAGON");
    if nn > 99 {
        nn %= 100;
    }
    format!("{}-{word}{nn:02}", trail.code())
}

/// Parse a share code back into its trail and full seed.
#[must_use]
pub fn decode_to_seed(code: &str) -> Option<(TrailVariant, u64)> {
    let s = code.trim();
    let (prefix, rest) = s.split_once('-')?;
    let trail = TrailVariant::from_code(prefix)?;
    if rest.len() < 3 || !rest.is_ascii() {
        return None;
    }
    let (word_part, nn_part) = rest.split_at(rest.len() - 2);
    let nn: u8 = nn_part.parse().ok()?;
    let word = sanitize_word(word_part);
    let idx = WORD_LIST.iter().position(|w| sanitize_word(w) == word)?;
    let wi = u16::try_from(idx).ok()?;
    Some((trail, compose_seed(trail, wi, nn)))
}

/// Derive a fresh, valid share code from arbitrary entropy.
#[must_use]
pub fn generate_code_from_entropy(trail: TrailVariant, entropy: u64) -> String {
    let wi = u16::try_from(entropy % WORD_LIST.len() as u64).unwrap_or(0);
    let nn = u8::try_from((entropy >> 17) % 100).unwrap_or(0);
    encode_friendly(trail, compose_seed(trail, wi, nn))
}
