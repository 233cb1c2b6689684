//! Tab completion for `/graveyards` and `/graveyardinfo`.

use tracing::warn;

use graveyards_core::cache::GraveyardCache;
use graveyards_core::persistence::GraveyardStore;

/// Verbs offered for the first `/graveyards` argument.
pub const VERBS: [&str; 6] = ["pos1", "pos2", "create", "addsite", "delete", "removesite"];

/// Verbs whose second argument is a graveyard name.
const NAMED_VERBS: [&str; 4] = ["create", "addsite", "delete", "removesite"];

fn matching<'a>(candidates: impl IntoIterator<Item = &'a str>, prefix: &str) -> Vec<String> {
    let prefix = prefix.to_lowercase();
    candidates
        .into_iter()
        .filter(|candidate| candidate.to_lowercase().starts_with(&prefix))
        .map(str::to_string)
        .collect()
}

/// Candidates for `/graveyards <args>`; the last element of `args` is the
/// argument being typed.
#[must_use]
pub fn graveyards(store: &GraveyardStore, args: &[&str]) -> Vec<String> {
    match args {
        [typed] => matching(VERBS, typed),
        [verb, typed] if NAMED_VERBS.contains(&verb.to_lowercase().as_str()) => {
            match store.list_names() {
                Ok(names) => matching(names.iter().map(String::as_str), typed),
                Err(e) => {
                    warn!(error = %e, "Cannot list graveyards for completion");
                    Vec::new()
                }
            }
        }
        [verb, name, typed] if verb.eq_ignore_ascii_case("removesite") => {
            match store.site_numbers(name) {
                Ok(numbers) => numbers
                    .into_iter()
                    .map(|n| n.to_string())
                    .filter(|n| n.starts_with(typed))
                    .collect(),
                Err(e) => {
                    warn!(graveyard = %name, error = %e, "Cannot list grave sites for completion");
                    Vec::new()
                }
            }
        }
        _ => Vec::new(),
    }
}

/// Candidates for `/graveyardinfo <args>`, drawn from the cache.
#[must_use]
pub fn graveyard_info(cache: &GraveyardCache, args: &[&str]) -> Vec<String> {
    match args {
        [typed] => {
            let names = cache.graveyard_names();
            matching(names.iter().map(String::as_str), typed)
        }
        _ => Vec::new(),
    }
}
