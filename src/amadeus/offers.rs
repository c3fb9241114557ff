//! Flight and hotel offer shapes and their parsing

use chrono::NaiveDate;
use rand::RngExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::PlannerError;
use crate::config::BudgetThresholds;

pub const MAX_OFFERS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightOffer {
    pub airline: String,
    pub flight_number: String,
    /// Human readable, e.g. "2h 30m"
    pub duration: String,
    pub price: u32,
    pub currency: String,
    pub departure: FlightEndpoint,
    pub arrival: FlightEndpoint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightEndpoint {
    /// Local time as HH:MM, or "TBD"
    pub time: String,
    pub airport: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelOffer {
    pub name: String,
    pub hotel_id: String,
    pub rating: String,
    pub location: String,
    /// Estimated; the by-city endpoint carries no prices
    pub price_per_night: u32,
    pub currency: String,
    pub room_type: String,
    pub amenities: Vec<String>,
}

/// Nightly price band requested by the traveller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BudgetRange {
    Budget,
    MidRange,
    Luxury,
}

impl BudgetRange {
    /// Case-insensitive; `None` for anything unrecognised
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "budget" => Some(BudgetRange::Budget),
            "mid-range" => Some(BudgetRange::MidRange),
            "luxury" => Some(BudgetRange::Luxury),
            _ => None,
        }
    }

    #[must_use]
    pub fn contains(self, price: u32, thresholds: &BudgetThresholds) -> bool {
        match self {
            BudgetRange::Budget => price <= thresholds.budget_max,
            BudgetRange::MidRange => price > thresholds.budget_max && price < thresholds.luxury_min,
            BudgetRange::Luxury => price >= thresholds.luxury_min,
        }
    }
}

/// Keep hotels in the requested band.
///
/// An unrecognised band keeps everything; if nothing matches, the first
/// three hotels are returned so the traveller still sees options.
#[must_use]
pub fn filter_by_budget(
    hotels: Vec<HotelOffer>,
    budget_range: &str,
    thresholds: &BudgetThresholds,
) -> Vec<HotelOffer> {
    let Some(range) = BudgetRange::parse(budget_range) else {
        return hotels;
    };

    let matching: Vec<HotelOffer> = hotels
        .iter()
        .filter(|hotel| range.contains(hotel.price_per_night, thresholds))
        .cloned()
        .collect();

    if matching.is_empty() {
        hotels.into_iter().take(3).collect()
    } else {
        matching
    }
}

/// Airport code for flight searches; unknown origins fall back to DEL, destinations to BOM
#[must_use]
pub fn airport_code(city: &str, fallback: &'static str) -> &'static str {
    match city.trim().to_lowercase().as_str() {
        "delhi" => "DEL",
        "mumbai" => "BOM",
        "bangalore" => "BLR",
        "chennai" => "MAA",
        "kolkata" => "CCU",
        "hyderabad" => "HYD",
        "pune" => "PNQ",
        "ahmedabad" => "AMD",
        "goa" => "GOI",
        "kochi" => "COK",
        "london" => "LHR",
        "paris" => "CDG",
        "new york" => "JFK",
        "tokyo" => "NRT",
        "singapore" => "SIN",
        "dubai" => "DXB",
        "bangkok" => "BKK",
        "sydney" => "SYD",
        _ => fallback,
    }
}

/// City code for hotel searches, falling back to DEL
#[must_use]
pub fn city_code(city: &str) -> &'static str {
    match city.trim().to_lowercase().as_str() {
        "london" => "LON",
        "paris" => "PAR",
        "new york" => "NYC",
        "tokyo" => "TYO",
        "kochi" | "ahmedabad" => "DEL",
        other => airport_code(other, "DEL"),
    }
}

/// Reject unparseable, past and same-day departures
pub fn validate_departure(departure_date: &str, today: NaiveDate) -> crate::Result<NaiveDate> {
    let date = NaiveDate::parse_from_str(departure_date.trim(), "%Y-%m-%d").map_err(|_| {
        PlannerError::validation(format!("Invalid date format: {departure_date}"))
    })?;

    if date < today {
        return Err(PlannerError::validation(format!(
            "Cannot search flights for past date {departure_date}. Please select a future date."
        )));
    }
    if date == today {
        return Err(PlannerError::validation(
            "Same-day flight bookings are very limited. Please select a date at least 1-2 days in advance for better results.",
        ));
    }
    Ok(date)
}

/// "PT2H30M" -> "2h 30m", "PT45M" -> "45m". Unrecognised input is returned as is.
#[must_use]
pub fn format_duration(iso: &str) -> String {
    let Some(rest) = iso.strip_prefix("PT") else {
        return iso.to_string();
    };

    let (hours, minutes) = match rest.split_once('H') {
        Some((hours, rest)) => (hours, rest.strip_suffix('M').unwrap_or(rest)),
        None => ("0", rest.strip_suffix('M').unwrap_or(rest)),
    };
    let hours: u32 = match hours.parse() {
        Ok(hours) => hours,
        Err(_) => return iso.to_string(),
    };
    let minutes: u32 = if minutes.is_empty() {
        0
    } else {
        match minutes.parse() {
            Ok(minutes) => minutes,
            Err(_) => return iso.to_string(),
        }
    };

    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Parse each offer on its own; malformed offers are skipped
#[must_use]
pub fn parse_flight_offers(offers: Vec<Value>) -> Vec<FlightOffer> {
    offers
        .into_iter()
        .take(MAX_OFFERS)
        .filter_map(|value| match serde_json::from_value::<RawFlightOffer>(value) {
            Ok(raw) => raw.into_offer(),
            Err(e) => {
                warn!("Skipping malformed flight offer: {}", e);
                None
            }
        })
        .collect()
}

#[must_use]
pub fn parse_hotels(hotels: Vec<Value>, city: &str) -> Vec<HotelOffer> {
    let mut rng = rand::rng();
    hotels
        .into_iter()
        .take(MAX_OFFERS)
        .filter_map(|value| match serde_json::from_value::<RawHotel>(value) {
            Ok(raw) => {
                let stars = raw.rating.unwrap_or_else(|| rng.random_range(3..=5));
                Some(HotelOffer {
                    name: raw.name.unwrap_or_else(|| "Unknown Hotel".to_string()),
                    hotel_id: raw.hotel_id.unwrap_or_default(),
                    rating: format!("{stars} stars"),
                    location: format!("{city}, IN"),
                    price_per_night: rng.random_range(3000..=15000),
                    currency: "INR".to_string(),
                    room_type: "Standard Room".to_string(),
                    amenities: vec!["WiFi".to_string(), "Room Service".to_string()],
                })
            }
            Err(e) => {
                warn!("Skipping malformed hotel: {}", e);
                None
            }
        })
        .collect()
}

fn clock_time(at: &str) -> String {
    at.split_once('T')
        .map(|(_, time)| time.chars().take(5).collect())
        .unwrap_or_else(|| "TBD".to_string())
}

#[derive(Debug, Deserialize)]
struct RawFlightOffer {
    itineraries: Vec<RawItinerary>,
    price: RawPrice,
}

#[derive(Debug, Deserialize)]
struct RawItinerary {
    duration: String,
    segments: Vec<RawSegment>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSegment {
    carrier_code: String,
    number: String,
    departure: RawEndpoint,
    arrival: RawEndpoint,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEndpoint {
    iata_code: String,
    at: String,
}

#[derive(Debug, Deserialize)]
struct RawPrice {
    total: String,
    currency: String,
}

impl RawFlightOffer {
    fn into_offer(self) -> Option<FlightOffer> {
        let itinerary = self.itineraries.into_iter().next()?;
        let segment = itinerary.segments.into_iter().next()?;
        let price: f64 = match self.price.total.parse() {
            Ok(price) => price,
            Err(_) => {
                warn!("Skipping flight offer with price '{}'", self.price.total);
                return None;
            }
        };

        Some(FlightOffer {
            airline: format!("{} Airlines", segment.carrier_code),
            flight_number: format!("{}{}", segment.carrier_code, segment.number),
            duration: format_duration(&itinerary.duration),
            price: price as u32,
            currency: self.price.currency,
            departure: FlightEndpoint {
                time: clock_time(&segment.departure.at),
                airport: segment.departure.iata_code,
            },
            arrival: FlightEndpoint {
                time: clock_time(&segment.arrival.at),
                airport: segment.arrival.iata_code,
            },
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawHotel {
    name: Option<String>,
    hotel_id: Option<String>,
    rating: Option<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn hotel(name: &str, price: u32) -> HotelOffer {
        HotelOffer {
            name: name.to_string(),
            hotel_id: String::new(),
            rating: "4 stars".to_string(),
            location: "Goa".to_string(),
            price_per_night: price,
            currency: "INR".to_string(),
            room_type: "Standard Room".to_string(),
            amenities: vec![],
        }
    }

    fn names(hotels: &[HotelOffer]) -> Vec<&str> {
        hotels.iter().map(|h| h.name.as_str()).collect()
    }

    #[rstest]
    #[case("budget", vec!["A"])]
    #[case("mid-range", vec!["B", "C"])]
    #[case("Luxury", vec!["D"])]
    #[case("whatever", vec!["A", "B", "C", "D"])]
    fn test_filter_by_budget(#[case] range: &str, #[case] expected: Vec<&str>) {
        let hotels = vec![hotel("A", 3000), hotel("B", 3001), hotel("C", 7999), hotel("D", 8000)];
        let filtered = filter_by_budget(hotels, range, &BudgetThresholds::default());
        assert_eq!(names(&filtered), expected);
    }

    #[test]
    fn test_filter_falls_back_to_first_three() {
        let hotels = vec![
            hotel("A", 9000),
            hotel("B", 9500),
            hotel("C", 12000),
            hotel("D", 15000),
        ];
        let filtered = filter_by_budget(hotels, "budget", &BudgetThresholds::default());
        assert_eq!(names(&filtered), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_thresholds_are_configurable() {
        let thresholds = BudgetThresholds {
            budget_max: 5000,
            luxury_min: 10000,
        };
        assert!(BudgetRange::Budget.contains(4500, &thresholds));
        assert!(BudgetRange::MidRange.contains(9000, &thresholds));
        assert!(!BudgetRange::Luxury.contains(9000, &thresholds));
    }

    #[rstest]
    #[case("PT2H30M", "2h 30m")]
    #[case("PT45M", "45m")]
    #[case("PT3H", "3h 0m")]
    #[case("P1DT2H", "P1DT2H")]
    fn test_format_duration(#[case] iso: &str, #[case] expected: &str) {
        assert_eq!(format_duration(iso), expected);
    }

    #[rstest]
    #[case("Goa", "GOI")]
    #[case("NEW YORK", "JFK")]
    #[case("Atlantis", "BOM")]
    fn test_airport_code(#[case] city: &str, #[case] expected: &str) {
        assert_eq!(airport_code(city, "BOM"), expected);
    }

    #[test]
    fn test_hotel_city_codes() {
        assert_eq!(city_code("London"), "LON");
        assert_eq!(city_code("Goa"), "GOI");
        assert_eq!(city_code("Atlantis"), "DEL");
    }

    #[test]
    fn test_departure_validation() {
        let today = NaiveDate::from_ymd_opt(2025, 9, 20).unwrap();
        assert!(validate_departure("2025-09-19", today).is_err());
        assert!(validate_departure("2025-09-20", today).is_err());
        assert!(validate_departure("20/09/2025", today).is_err());
        assert_eq!(
            validate_departure("2025-09-22", today).unwrap(),
            NaiveDate::from_ymd_opt(2025, 9, 22).unwrap()
        );
    }

    #[test]
    fn test_parse_flight_offers_skips_malformed() {
        let good = json!({
            "itineraries": [{
                "duration": "PT2H5M",
                "segments": [{
                    "carrierCode": "6E",
                    "number": "204",
                    "departure": {"iataCode": "DEL", "at": "2025-10-01T06:15:00"},
                    "arrival": {"iataCode": "GOI", "at": "2025-10-01T08:20:00"}
                }]
            }],
            "price": {"total": "5432.70", "currency": "INR"}
        });
        let offers = parse_flight_offers(vec![good, json!({"price": "free"})]);

        assert_eq!(offers.len(), 1);
        let offer = &offers[0];
        assert_eq!(offer.flight_number, "6E204");
        assert_eq!(offer.airline, "6E Airlines");
        assert_eq!(offer.duration, "2h 5m");
        assert_eq!(offer.price, 5432);
        assert_eq!(offer.departure.time, "06:15");
        assert_eq!(offer.arrival.airport, "GOI");
    }

    #[test]
    fn test_parse_hotels_estimates_price() {
        let hotels = parse_hotels(
            vec![json!({"name": "Sea Breeze", "hotelId": "HLGOI001", "rating": 4})],
            "Goa",
        );
        assert_eq!(hotels.len(), 1);
        assert_eq!(hotels[0].rating, "4 stars");
        assert_eq!(hotels[0].location, "Goa, IN");
        assert!((3000..=15000).contains(&hotels[0].price_per_night));
    }
}
