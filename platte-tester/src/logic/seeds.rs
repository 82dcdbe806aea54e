use anyhow::{Context, Result, bail};
use platte_game::{TrailVariant, decode_to_seed, encode_friendly};
use regex::Regex;
use std::collections::HashMap;

/// Trail prefix, a word, then exactly two digits.
const SHARE_CODE_PATTERN: &str = r"^(?i)(OR|CA|MO)-[A-Z]+\d{2}$";

/// Seed metadata for simulated and interactive journeys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedInfo {
    pub seed: u64,
    pub code: Option<String>,
    /// Trail named by a share code; numeric seeds leave it open.
    pub trail: Option<TrailVariant>,
}

impl SeedInfo {
    #[must_use]
    pub fn from_numeric(seed: u64) -> Self {
        Self {
            seed,
            code: None,
            trail: None,
        }
    }

    #[must_use]
    pub fn from_share_code(seed: u64, trail: TrailVariant, code: String) -> Self {
        Self {
            seed,
            code: Some(code),
            trail: Some(trail),
        }
    }

    /// The trail this seed should run on: the share code's, else `fallback`.
    #[must_use]
    pub fn trail_or(&self, fallback: TrailVariant) -> TrailVariant {
        self.trail.unwrap_or(fallback)
    }

    #[must_use]
    pub fn share_code_for(&self, trail: TrailVariant) -> String {
        if let (Some(code), Some(source)) = (&self.code, self.trail)
            && source == trail
        {
            return code.clone();
        }
        encode_friendly(trail, self.seed)
    }
}

/// Resolve CLI seed arguments into canonical seed metadata.
///
/// Supports literal integers, share codes such as `OR-WAGON42`, and the
/// keyword `all`, which expands to every share code of every trail.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<SeedInfo>> {
    let share_code_regex = Regex::new(SHARE_CODE_PATTERN)?;
    let mut pending: Vec<SeedInfo> = Vec::new();
    let mut request_all = false;

    for token in tokens {
        if token.is_empty() {
            continue;
        }

        if token.eq_ignore_ascii_case("all") {
            request_all = true;
            continue;
        }

        if let Ok(value) = token.parse::<i64>() {
            pending.push(SeedInfo::from_numeric(value.unsigned_abs()));
            continue;
        }

        if let Ok(value) = token.parse::<u64>() {
            pending.push(SeedInfo::from_numeric(value));
            continue;
        }

        if share_code_regex.is_match(token) {
            let (trail, seed) = decode_to_seed(token)
                .with_context(|| format!("Unknown word in share code: {token}"))?;
            pending.push(SeedInfo::from_share_code(seed, trail, token.to_uppercase()));
            continue;
        }

        bail!("Unrecognized seed token: {token}");
    }

    if request_all {
        pending.extend(generate_all_share_code_seeds()?);
    }

    let mut deduped: Vec<SeedInfo> = Vec::new();
    let mut index: HashMap<(u64, Option<TrailVariant>), usize> = HashMap::new();

    for info in pending {
        let key = (info.seed, info.trail);
        if let Some(&existing) = index.get(&key) {
            if let Some(entry) = deduped.get_mut(existing)
                && entry.code.is_none()
                && info.code.is_some()
            {
                *entry = info;
            }
        } else {
            index.insert(key, deduped.len());
            deduped.push(info);
        }
    }

    if deduped.is_empty() {
        deduped.push(SeedInfo::from_numeric(1847));
    }

    Ok(deduped)
}

fn generate_all_share_code_seeds() -> Result<Vec<SeedInfo>> {
    use platte_game::seed::WORD_LIST;

    let mut seeds = Vec::with_capacity(WORD_LIST.len() * 100 * TrailVariant::ALL.len());
    for trail in TrailVariant::ALL {
        for word in WORD_LIST {
            for suffix in 0..100 {
                let code = format!("{}-{word}{suffix:02}", trail.code());
                let (trail, seed) = decode_to_seed(&code)
                    .with_context(|| format!("failed to parse share code: {code}"))?;
                seeds.push(SeedInfo::from_share_code(seed, trail, code));
            }
        }
    }
    Ok(seeds)
}
