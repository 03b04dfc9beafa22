//! URL slugs for shared designs

use uuid::Uuid;

/// Lower-case the title and collapse every run of non-alphanumerics to `-`
pub fn generate_slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for c in title.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        "room".to_string()
    } else {
        slug
    }
}

/// Slug for a new design: title slug plus a short suffix from its id
pub fn design_slug(title: &str, id: &Uuid) -> String {
    let suffix: String = id.simple().to_string().chars().take(8).collect();
    format!("{}-{}", generate_slug(title), suffix)
}
