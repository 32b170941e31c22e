// file: src/models/locations.rs
use super::prayer::Location;

/// Countries offered for selection and their cities, first city is the default.
pub const COUNTRY_CITIES: &[(&str, &[&str])] = &[
    ("Japan", &["Osaka", "Tokyo"]),
    ("UK", &["London"]),
    ("UAE", &["Dubai"]),
    ("Turkey", &["Istanbul"]),
    ("Egypt", &["Cairo"]),
    ("Saudi Arabia", &["Medina", "Mecca"]),
];

/// Fixed batch served by the multi-city view.
pub const FEATURED_LOCATIONS: &[(&str, &str)] = &[
    ("Tokyo", "Japan"),
    ("London", "UK"),
    ("Dubai", "UAE"),
    ("Istanbul", "Turkey"),
    ("Cairo", "Egypt"),
];

pub fn cities_for(country: &str) -> &'static [&'static str] {
    COUNTRY_CITIES
        .iter()
        .find(|(name, _)| *name == country)
        .map(|(_, cities)| *cities)
        .unwrap_or(&[])
}

/// Keeps the saved city when the country offers it, otherwise falls back to
/// the country's first city.
pub fn select_city(country: &str, saved_city: Option<&str>) -> Option<&'static str> {
    let cities = cities_for(country);
    saved_city
        .and_then(|saved| cities.iter().copied().find(|city| *city == saved))
        .or_else(|| cities.first().copied())
}

pub fn featured_locations() -> Vec<Location> {
    FEATURED_LOCATIONS
        .iter()
        .map(|(city, country)| Location::new(*city, *country))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cities_for_known_and_unknown_country() {
        assert_eq!(cities_for("Japan"), &["Osaka", "Tokyo"]);
        assert!(cities_for("Atlantis").is_empty());
    }

    #[test]
    fn test_select_city_prefers_saved() {
        assert_eq!(select_city("Japan", Some("Tokyo")), Some("Tokyo"));
        assert_eq!(select_city("Japan", Some("Cairo")), Some("Osaka"));
        assert_eq!(select_city("Saudi Arabia", None), Some("Medina"));
        assert_eq!(select_city("Atlantis", Some("Tokyo")), None);
    }

    #[test]
    fn test_featured_locations() {
        let featured = featured_locations();
        assert_eq!(featured.len(), 5);
        assert_eq!(featured[0], Location::new("Tokyo", "Japan"));
        assert_eq!(featured[4], Location::new("Cairo", "Egypt"));
    }
}
