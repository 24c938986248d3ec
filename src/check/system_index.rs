use crate::core::constants::SYSTEM_INDEX_PREFIXES;

/// Whether `name` belongs to an internal index that the diagnostics skip.
///
/// Dot-prefixed names always qualify. A known prefix only counts when it is
/// followed by a separator, so `kibana_sample` matches and `kibanalogs` does not.
pub fn is_system_index(name: &str) -> bool {
    if name.starts_with('.') {
        return true;
    }

    SYSTEM_INDEX_PREFIXES.iter().any(|prefix| {
        name.strip_prefix(prefix)
            .and_then(|rest| rest.chars().next())
            .is_some_and(|c| matches!(c, '-' | '_' | '.'))
    })
}
