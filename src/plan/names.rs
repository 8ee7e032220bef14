//! Random resource names for one sample run.

use rand::Rng;

/// Longest name generated; short enough for every resource type used here.
pub const MAX_NAME_LENGTH: usize = 24;
const SUFFIX_DIGITS: usize = 5;

/// `prefix` followed by a random decimal suffix, e.g. `vnet48213`.
pub fn random_name(prefix: &str) -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..10u32.pow(SUFFIX_DIGITS as u32));
    name_with_suffix(prefix, suffix)
}

fn name_with_suffix(prefix: &str, suffix: u32) -> String {
    let keep = MAX_NAME_LENGTH - SUFFIX_DIGITS;
    let prefix: String = prefix
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .take(keep)
        .collect();
    format!("{prefix}{suffix:0width$}", width = SUFFIX_DIGITS)
}
