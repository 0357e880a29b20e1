//! Uniform selection of data source names

use rand::seq::IteratorRandom;

/// Pick one of `candidates` uniformly at random
///
/// Returns `None` when there is nothing to choose from.
pub fn choose_name<I, S>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    candidates
        .into_iter()
        .choose(&mut rand::thread_rng())
        .map(|name| name.as_ref().to_string())
}
