//! URL and path-segment helpers for talking to the rules API.

/// Strip trailing slashes so endpoints can be appended without doubling them.
///
/// ```
/// use sheetkeep::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("https://www.dnd5eapi.co/api/"), "https://www.dnd5eapi.co/api");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Join a base URL and an endpoint path with exactly one slash between them.
///
/// ```
/// use sheetkeep::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("https://www.dnd5eapi.co/api/", "/spells/aid"),
///     "https://www.dnd5eapi.co/api/spells/aid"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{}/{}", normalized_base, endpoint)
}

/// Turn a display name into the API's index form: lowercase words joined by
/// hyphens, apostrophes dropped ("Thieves' Tools" becomes `thieves-tools`).
///
/// ```
/// use sheetkeep::utils::url::slugify;
///
/// assert_eq!(slugify("Potion of Healing"), "potion-of-healing");
/// ```
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.extend(c.to_lowercase());
        } else if c != '\'' && c != '’' {
            pending_hyphen = true;
        }
    }

    slug
}
