const COUNTRY_CODE: &str = "57";
const MOBILE_PREFIX: &str = "3";

/// Normalizes a Colombian phone number to international form when its
/// shape is recognized; other numbers pass through without spaces.
pub fn clean_phone(raw: &str) -> String {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();

    if compact.starts_with('+') {
        compact
    } else if compact.starts_with(COUNTRY_CODE) {
        format!("+{}", compact)
    } else if compact.starts_with(MOBILE_PREFIX) {
        format!("+{}{}", COUNTRY_CODE, compact)
    } else {
        compact
    }
}

/// 優先使用第一支電話，空白時改用第二支
pub fn preferred_phone(telefono1: &str, telefono2: &str) -> Option<String> {
    [telefono1, telefono2]
        .into_iter()
        .find(|phone| !phone.trim().is_empty())
        .map(clean_phone)
}

/// First word of the display name, capitalized.
pub fn first_name(display_name: &str) -> String {
    let Some(word) = display_name.split_whitespace().next() else {
        return String::new();
    };
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_phone_shapes() {
        assert_eq!(clean_phone("3001234567"), "+573001234567");
        assert_eq!(clean_phone("573001234567"), "+573001234567");
        assert_eq!(clean_phone("+573001234567"), "+573001234567");
        assert_eq!(clean_phone("6012345"), "6012345");
        assert_eq!(clean_phone("300 123 4567"), "+573001234567");
        assert_eq!(clean_phone(""), "");
    }

    #[test]
    fn test_preferred_phone_falls_back_to_second() {
        assert_eq!(preferred_phone("3001234567", "6012345").as_deref(), Some("+573001234567"));
        assert_eq!(preferred_phone("", "6012345").as_deref(), Some("6012345"));
        assert_eq!(preferred_phone(" ", ""), None);
    }

    #[test]
    fn test_first_name() {
        assert_eq!(first_name("Juan Pérez"), "Juan");
        assert_eq!(first_name("  mARÍA josé"), "María");
        assert_eq!(first_name("ÑANDÚ"), "Ñandú");
        assert_eq!(first_name(""), "");
    }
}
