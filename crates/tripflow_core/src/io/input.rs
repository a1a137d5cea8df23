use std::fs;
use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};
use crate::itinerary::Itinerary;
use crate::place::Place;

/// Read a JSON array of places from a file, or stdin when no path is given.
/// An empty array is valid input (the pipeline treats it as a no-op).
pub fn read_places(path: Option<&Path>) -> Result<Vec<Place>> {
    let raw = match path {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    parse_places(&raw)
}

pub(crate) fn parse_places(raw: &str) -> Result<Vec<Place>> {
    serde_json::from_str(raw).map_err(|e| Error::invalid_data(format!("places JSON: {e}")))
}

/// Write the day-keyed itinerary JSON to a file, or stdout when no path is
/// given.
pub fn write_itinerary(path: Option<&Path>, itinerary: &Itinerary) -> Result<()> {
    let json = serde_json::to_string_pretty(itinerary)
        .map_err(|e| Error::other(format!("itinerary JSON: {e}")))?;

    match path {
        Some(path) => fs::write(path, json + "\n")?,
        None => println!("{json}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::parse_places;

    #[test]
    fn parses_an_array_of_places() {
        let raw = r#"[
            {"id": "p1", "name": "Palace", "lat": 37.58, "lng": 126.98},
            {"id": "p2", "name": "Market", "lat": 37.57, "lng": 126.99, "duration_min": 45}
        ]"#;
        let places = parse_places(raw).expect("parse places");

        assert_eq!(places.len(), 2);
        assert_eq!(places[0].duration_min, 60);
        assert_eq!(places[1].duration_min, 45);
    }

    #[test]
    fn empty_array_is_valid() {
        assert!(parse_places("[]").expect("parse places").is_empty());
    }

    #[test]
    fn malformed_json_is_invalid_data() {
        let err = parse_places("{not json").expect_err("should fail");
        assert!(err.to_string().contains("places JSON"));
    }

    #[test]
    fn missing_coordinates_are_rejected() {
        let err = parse_places(r#"[{"id": "p1", "name": "Palace"}]"#).expect_err("should fail");
        assert!(err.to_string().contains("places JSON"));
    }
}
