//! Trip configuration: trip type, cabin, dates and passengers.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
/// Incomplete or inconsistent search configuration.
pub enum ValidationError {
    /// Origin text was never resolved to a place.
    #[error("Select an origin from the suggestions")]
    MissingOrigin,
    /// Destination text was never resolved to a place.
    #[error("Select a destination from the suggestions")]
    MissingDestination,
    /// Origin and destination are the same place.
    #[error("Origin and destination must differ")]
    SameOriginAndDestination,
    /// No departure date set.
    #[error("Choose a departure date")]
    MissingDepartureDate,
    /// Round trip without a return date.
    #[error("Choose a return date for a round trip")]
    MissingReturnDate,
    /// Return date precedes the departure date.
    #[error("Return date cannot be before the departure date")]
    ReturnBeforeDeparture,
    /// Return date set on a one-way trip.
    #[error("One-way trips have no return date")]
    ReturnOnOneWay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Whether the trip has a return leg.
pub enum TripType {
    /// Outbound only.
    OneWay,
    /// Outbound and return.
    #[default]
    RoundTrip,
}

impl fmt::Display for TripType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TripType::OneWay => "One way",
            TripType::RoundTrip => "Round trip",
        };
        write!(formatter, "{label}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Cabin class offered by the provider.
pub enum CabinClass {
    /// Economy.
    #[default]
    Economy,
    /// Premium economy.
    PremiumEconomy,
    /// Business.
    Business,
    /// First.
    First,
}

impl CabinClass {
    /// All classes in menu order.
    pub const ALL: [CabinClass; 4] = [
        CabinClass::Economy,
        CabinClass::PremiumEconomy,
        CabinClass::Business,
        CabinClass::First,
    ];

    /// Token the provider expects in the `cabinClass` parameter.
    #[must_use]
    pub fn api_token(self) -> &'static str {
        match self {
            CabinClass::Economy => "economy",
            CabinClass::PremiumEconomy => "premium_economy",
            CabinClass::Business => "business",
            CabinClass::First => "first",
        }
    }

    /// The next class in menu order, wrapping around.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            CabinClass::Economy => CabinClass::PremiumEconomy,
            CabinClass::PremiumEconomy => CabinClass::Business,
            CabinClass::Business => CabinClass::First,
            CabinClass::First => CabinClass::Economy,
        }
    }
}

impl fmt::Display for CabinClass {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CabinClass::Economy => "Economy",
            CabinClass::PremiumEconomy => "Premium economy",
            CabinClass::Business => "Business",
            CabinClass::First => "First",
        };
        write!(formatter, "{label}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Passenger category.
pub enum PassengerKind {
    /// 12 years and older.
    Adult,
    /// 2 to 11 years.
    Child,
    /// Under 2 years, on an adult's lap.
    Infant,
}

/// Minimum number of adults.
pub const MIN_ADULTS: u8 = 1;
/// Maximum number of adults.
pub const MAX_ADULTS: u8 = 9;
/// Maximum number of children.
pub const MAX_CHILDREN: u8 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawPassengers")]
/// Passenger counts.
///
/// Always satisfies adults in `1..=9`, children in `0..=8` and infants at most adults.
/// Every mutation clamps to the nearest legal value.
pub struct Passengers {
    adults: u8,
    children: u8,
    infants: u8,
}

#[derive(Deserialize)]
struct RawPassengers {
    #[serde(default = "default_adults")]
    adults: u8,
    #[serde(default)]
    children: u8,
    #[serde(default)]
    infants: u8,
}

fn default_adults() -> u8 {
    MIN_ADULTS
}

impl From<RawPassengers> for Passengers {
    fn from(raw: RawPassengers) -> Self {
        let mut passengers = Passengers::default();
        passengers.set(PassengerKind::Adult, raw.adults);
        passengers.set(PassengerKind::Child, raw.children);
        passengers.set(PassengerKind::Infant, raw.infants);
        passengers
    }
}

impl Default for Passengers {
    fn default() -> Self {
        Self {
            adults: MIN_ADULTS,
            children: 0,
            infants: 0,
        }
    }
}

impl Passengers {
    /// Number of adults.
    #[must_use]
    pub fn adults(&self) -> u8 {
        self.adults
    }

    /// Number of children.
    #[must_use]
    pub fn children(&self) -> u8 {
        self.children
    }

    /// Number of infants.
    #[must_use]
    pub fn infants(&self) -> u8 {
        self.infants
    }

    /// Passengers of all kinds.
    #[must_use]
    pub fn total(&self) -> u8 {
        self.adults + self.children + self.infants
    }

    /// Count for one kind.
    #[must_use]
    pub fn count(&self, kind: PassengerKind) -> u8 {
        match kind {
            PassengerKind::Adult => self.adults,
            PassengerKind::Child => self.children,
            PassengerKind::Infant => self.infants,
        }
    }

    /// Set the count for `kind`, clamped to its legal range.
    ///
    /// Lowering adults below the infant count lowers infants with it.
    pub fn set(&mut self, kind: PassengerKind, value: u8) {
        match kind {
            PassengerKind::Adult => {
                self.adults = value.clamp(MIN_ADULTS, MAX_ADULTS);
                self.infants = self.infants.min(self.adults);
            }
            PassengerKind::Child => self.children = value.min(MAX_CHILDREN),
            PassengerKind::Infant => self.infants = value.min(self.adults),
        }
    }

    /// Add one passenger of `kind`; a no-op at the ceiling.
    pub fn increment(&mut self, kind: PassengerKind) {
        self.set(kind, self.count(kind).saturating_add(1));
    }

    /// Remove one passenger of `kind`; a no-op at the floor.
    pub fn decrement(&mut self, kind: PassengerKind) {
        self.set(kind, self.count(kind).saturating_sub(1));
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Everything about a trip except the two places.
pub struct TripConfig {
    pub(crate) trip_type: TripType,
    pub(crate) cabin_class: CabinClass,
    pub(crate) departure_date: Option<NaiveDate>,
    pub(crate) return_date: Option<NaiveDate>,
    pub(crate) passengers: Passengers,
}

impl TripConfig {
    /// Trip type.
    #[must_use]
    pub fn trip_type(&self) -> TripType {
        self.trip_type
    }

    /// Cabin class.
    #[must_use]
    pub fn cabin_class(&self) -> CabinClass {
        self.cabin_class
    }

    /// Departure date, if chosen.
    #[must_use]
    pub fn departure_date(&self) -> Option<NaiveDate> {
        self.departure_date
    }

    /// Return date, if chosen.
    #[must_use]
    pub fn return_date(&self) -> Option<NaiveDate> {
        self.return_date
    }

    /// Passenger counts.
    #[must_use]
    pub fn passengers(&self) -> &Passengers {
        &self.passengers
    }

    /// Mutable passenger counts; [`Passengers`] enforces its own invariants.
    pub fn passengers_mut(&mut self) -> &mut Passengers {
        &mut self.passengers
    }

    /// Change the trip type. Switching to one-way forgets the return date.
    pub fn set_trip_type(&mut self, trip_type: TripType) {
        self.trip_type = trip_type;
        if trip_type == TripType::OneWay {
            self.return_date = None;
        }
    }

    /// Flip between one-way and round trip.
    pub fn toggle_trip_type(&mut self) {
        let next = match self.trip_type {
            TripType::OneWay => TripType::RoundTrip,
            TripType::RoundTrip => TripType::OneWay,
        };
        self.set_trip_type(next);
    }

    /// Change the cabin class.
    pub fn set_cabin_class(&mut self, cabin_class: CabinClass) {
        self.cabin_class = cabin_class;
    }

    /// Set or clear the departure date.
    ///
    /// A return date that would now precede departure is cleared.
    pub fn set_departure_date(&mut self, date: Option<NaiveDate>) {
        self.departure_date = date;
        if let (Some(departure), Some(back)) = (self.departure_date, self.return_date)
            && back < departure
        {
            self.return_date = None;
        }
    }

    /// Set or clear the return date.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ReturnOnOneWay`] on a one-way trip and
    /// [`ValidationError::ReturnBeforeDeparture`] when `date` precedes departure.
    /// State is unchanged on error.
    pub fn set_return_date(&mut self, date: Option<NaiveDate>) -> Result<(), ValidationError> {
        if let Some(back) = date {
            if self.trip_type == TripType::OneWay {
                return Err(ValidationError::ReturnOnOneWay);
            }
            if self.departure_date.is_some_and(|departure| back < departure) {
                return Err(ValidationError::ReturnBeforeDeparture);
            }
        }
        self.return_date = date;
        Ok(())
    }

    /// Drop the return date; always allowed.
    pub fn clear_return_date(&mut self) {
        self.return_date = None;
    }

    /// Check the date rules a submission needs.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate_dates(&self) -> Result<(NaiveDate, Option<NaiveDate>), ValidationError> {
        let departure = self
            .departure_date
            .ok_or(ValidationError::MissingDepartureDate)?;
        match self.trip_type {
            TripType::OneWay => Ok((departure, None)),
            TripType::RoundTrip => {
                let back = self.return_date.ok_or(ValidationError::MissingReturnDate)?;
                if back < departure {
                    return Err(ValidationError::ReturnBeforeDeparture);
                }
                Ok((departure, Some(back)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 11, day).expect("valid test date")
    }

    fn assert_invariants(passengers: &Passengers) {
        assert!(
            (MIN_ADULTS..=MAX_ADULTS).contains(&passengers.adults()),
            "adults out of range: {passengers:?}"
        );
        assert!(passengers.children() <= MAX_CHILDREN, "children out of range");
        assert!(
            passengers.infants() <= passengers.adults(),
            "more infants than adults: {passengers:?}"
        );
    }

    #[test]
    fn passenger_invariants_hold_across_mutation_sequences() {
        let kinds = [
            PassengerKind::Adult,
            PassengerKind::Child,
            PassengerKind::Infant,
        ];
        let mut passengers = Passengers::default();

        // Deterministic pseudo-random walk over increments and decrements.
        let mut seed: u32 = 0x2545_f491;
        for _ in 0..2_000 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let kind = kinds
                .get(usize::try_from(seed % 3).expect("small index"))
                .copied()
                .expect("index in range");
            if seed & 8 == 0 {
                passengers.increment(kind);
            } else {
                passengers.decrement(kind);
            }
            assert_invariants(&passengers);
        }
    }

    #[test]
    fn lowering_adults_clamps_infants() {
        let mut passengers = Passengers::default();
        passengers.set(PassengerKind::Adult, 4);
        passengers.set(PassengerKind::Infant, 4);
        assert_eq!(passengers.infants(), 4, "one infant per adult allowed");

        passengers.decrement(PassengerKind::Adult);
        assert_eq!(passengers.adults(), 3, "adult removed");
        assert_eq!(passengers.infants(), 3, "infants follow adults down");
    }

    #[test]
    fn counts_clamp_at_bounds() {
        let mut passengers = Passengers::default();
        passengers.decrement(PassengerKind::Adult);
        assert_eq!(passengers.adults(), 1, "at least one adult");

        passengers.set(PassengerKind::Adult, 20);
        assert_eq!(passengers.adults(), 9, "at most nine adults");

        passengers.set(PassengerKind::Child, 12);
        assert_eq!(passengers.children(), 8, "at most eight children");

        passengers.set(PassengerKind::Infant, 15);
        assert_eq!(passengers.infants(), 9, "infants capped by adults");
        assert_eq!(passengers.total(), 26, "total sums every kind");
    }

    #[test]
    fn deserialized_passengers_are_clamped() {
        let passengers: Passengers =
            serde_json::from_str(r#"{"adults": 0, "children": 3, "infants": 5}"#)
                .expect("valid json");
        assert_eq!(passengers.adults(), 1, "adults raised to minimum");
        assert_eq!(passengers.children(), 3, "children kept");
        assert_eq!(passengers.infants(), 1, "infants capped by adults");
    }

    #[test]
    fn one_way_clears_return_and_round_trip_does_not_restore_it() {
        let mut trip = TripConfig::default();
        trip.set_departure_date(Some(date(10)));
        trip.set_return_date(Some(date(17))).expect("valid return");

        trip.set_trip_type(TripType::OneWay);
        assert_eq!(trip.return_date(), None, "one-way has no return");

        trip.set_trip_type(TripType::RoundTrip);
        assert_eq!(trip.return_date(), None, "not restored");
    }

    #[test]
    fn return_before_departure_is_rejected() {
        let mut trip = TripConfig::default();
        trip.set_departure_date(Some(date(10)));

        let err = trip.set_return_date(Some(date(9))).expect_err("must reject");
        assert_eq!(err, ValidationError::ReturnBeforeDeparture, "wrong error");
        assert_eq!(trip.return_date(), None, "state unchanged");

        trip.set_return_date(Some(date(10))).expect("same day return is fine");
    }

    #[test]
    fn return_on_one_way_is_rejected() {
        let mut trip = TripConfig::default();
        trip.set_trip_type(TripType::OneWay);
        let err = trip.set_return_date(Some(date(12))).expect_err("must reject");
        assert_eq!(err, ValidationError::ReturnOnOneWay, "wrong error");
    }

    #[test]
    fn moving_departure_past_return_clears_return() {
        let mut trip = TripConfig::default();
        trip.set_departure_date(Some(date(10)));
        trip.set_return_date(Some(date(12))).expect("valid return");

        trip.set_departure_date(Some(date(11)));
        assert_eq!(trip.return_date(), Some(date(12)), "still after departure");

        trip.set_departure_date(Some(date(13)));
        assert_eq!(trip.return_date(), None, "would precede departure");
    }

    #[test]
    fn validate_dates_reports_round_trip_problems() {
        let mut trip = TripConfig::default();
        assert_eq!(
            trip.validate_dates(),
            Err(ValidationError::MissingDepartureDate),
            "departure required"
        );

        trip.set_departure_date(Some(date(10)));
        assert_eq!(
            trip.validate_dates(),
            Err(ValidationError::MissingReturnDate),
            "round trip needs return"
        );

        trip.set_trip_type(TripType::OneWay);
        assert_eq!(trip.validate_dates(), Ok((date(10), None)), "one-way ok");
    }

    #[test]
    fn cabin_tokens_match_provider() {
        let tokens: Vec<&str> = CabinClass::ALL.iter().map(|cabin| cabin.api_token()).collect();
        assert_eq!(
            tokens,
            ["economy", "premium_economy", "business", "first"],
            "token set"
        );
        assert_eq!(CabinClass::First.next(), CabinClass::Economy, "wraps");
    }
}
