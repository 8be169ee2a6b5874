/// Direct-view form that an `<img>` tag can load without the drive
/// viewer chrome in between.
const DIRECT_VIEW_BASE: &str = "https://drive.google.com/uc?export=view&id=";

/// Rewrite a shared-drive link into its direct-view form.
///
/// The file id is whatever sits between `id=` and the next `&`. A link
/// without an `id=` marker comes back unchanged; the rendering side
/// already hides images that fail to load.
pub fn normalize_drive_link(raw: &str) -> String {
    let Some(marker) = raw.find("id=") else {
        return raw.to_string();
    };

    let rest = &raw[marker + "id=".len()..];
    let id = rest.split('&').next().unwrap_or("");
    format!("{DIRECT_VIEW_BASE}{id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_link_becomes_direct_view() {
        assert_eq!(
            normalize_drive_link("https://drive.google.com/open?id=ABC123&foo=bar"),
            "https://drive.google.com/uc?export=view&id=ABC123"
        );
    }

    #[test]
    fn id_at_end_of_string() {
        assert_eq!(
            normalize_drive_link("https://drive.google.com/open?id=ABC123"),
            "https://drive.google.com/uc?export=view&id=ABC123"
        );
    }

    #[test]
    fn link_without_marker_is_unchanged() {
        assert_eq!(
            normalize_drive_link("https://example.com/photo.jpg"),
            "https://example.com/photo.jpg"
        );
    }

    #[test]
    fn garbage_never_panics() {
        assert_eq!(normalize_drive_link("id="), DIRECT_VIEW_BASE);
        assert_eq!(normalize_drive_link("&&&id=&&&"), DIRECT_VIEW_BASE);
    }
}
