use crate::api::ApiReference;

/// Rank index names for a partially typed prefix.
///
/// Names starting with the prefix come first, then names with a later word
/// starting with it. Ties are broken alphabetically. Names matching neither
/// way are dropped.
pub fn rank_suggestions(index: &[ApiReference], prefix: &str, limit: usize) -> Vec<String> {
    let needle = prefix.trim().to_lowercase();
    if needle.is_empty() || limit == 0 {
        return Vec::new();
    }

    let mut ranked: Vec<(u8, String, &str)> = index
        .iter()
        .filter_map(|reference| {
            let lowered = reference.name.to_lowercase();
            let rank = if lowered.starts_with(&needle) {
                0
            } else if lowered
                .split(|c: char| !c.is_alphanumeric())
                .any(|word| word.starts_with(&needle))
            {
                1
            } else {
                return None;
            };
            Some((rank, lowered, reference.name.as_str()))
        })
        .collect();

    ranked.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
    ranked.dedup_by(|a, b| a.1 == b.1);
    ranked
        .into_iter()
        .take(limit)
        .map(|(_, _, name)| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(names: &[&str]) -> Vec<ApiReference> {
        names
            .iter()
            .map(|name| ApiReference {
                index: crate::utils::url::slugify(name),
                name: name.to_string(),
                url: String::new(),
            })
            .collect()
    }

    #[test]
    fn prefix_matches_outrank_word_matches() {
        let index = index(&["Greater Invisibility", "Invisibility", "Insect Plague"]);
        assert_eq!(
            rank_suggestions(&index, "invis", 10),
            vec!["Invisibility", "Greater Invisibility"]
        );
    }

    #[test]
    fn honours_limit_and_case() {
        let index = index(&["Shield", "Shield of Faith", "Shillelagh", "Aid"]);
        assert_eq!(rank_suggestions(&index, "SHI", 2), vec!["Shield", "Shield of Faith"]);
        assert!(rank_suggestions(&index, "   ", 5).is_empty());
        assert!(rank_suggestions(&index, "shi", 0).is_empty());
    }

    #[test]
    fn non_matches_are_dropped() {
        let index = index(&["Club", "Dagger"]);
        assert!(rank_suggestions(&index, "sword", 5).is_empty());
    }
}
