// src/utils/avatar.rs

use url::Url;

const GENERATED_AVATAR_BASE: &str = "https://ui-avatars.com/api/";

/// Returns the stored avatar, or a generated initials avatar for `name`.
pub fn avatar_url(avatar: Option<&str>, name: &str) -> String {
    match avatar {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => Url::parse_with_params(
            GENERATED_AVATAR_BASE,
            &[("name", name), ("background", "random")],
        )
        .map(String::from)
        .unwrap_or_else(|_| GENERATED_AVATAR_BASE.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_avatar_wins() {
        assert_eq!(avatar_url(Some("https://cdn.test/a.png"), "Ani"), "https://cdn.test/a.png");
    }

    #[test]
    fn generated_avatar_encodes_name() {
        assert_eq!(
            avatar_url(None, "Dewi Lestari"),
            "https://ui-avatars.com/api/?name=Dewi+Lestari&background=random"
        );
    }
}
