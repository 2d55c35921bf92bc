use std::sync::Arc;
use std::time::Instant;

use chrono::NaiveDate;
use skyfind_core::{
    Debouncer, ISO_DATE, LocationResolver, LookupTicket, PassengerKind, PlaceEntity, ProviderBundle,
    RequestId, SearchCompletion, SearchForm, SearchJob, SearchOrchestrator, SearchStatus, Side,
    TripConfig, TripType, ValidationError,
};
use tracing::debug;

use crate::settings::Settings;
use crate::ui::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Focus {
    Origin,
    Destination,
    Departure,
    Return,
    Passengers,
    Results,
}

impl Focus {
    const ORDER: [Focus; 6] = [
        Focus::Origin,
        Focus::Destination,
        Focus::Departure,
        Focus::Return,
        Focus::Passengers,
        Focus::Results,
    ];

    fn position(self) -> usize {
        Self::ORDER
            .iter()
            .position(|focus| *focus == self)
            .unwrap_or_default()
    }

    pub(crate) fn next(self) -> Self {
        let next = (self.position() + 1) % Self::ORDER.len();
        Self::ORDER.get(next).copied().unwrap_or(Focus::Origin)
    }

    pub(crate) fn previous(self) -> Self {
        let previous = (self.position() + Self::ORDER.len() - 1) % Self::ORDER.len();
        Self::ORDER.get(previous).copied().unwrap_or(Focus::Origin)
    }

    pub(crate) fn side(self) -> Option<Side> {
        match self {
            Focus::Origin => Some(Side::Origin),
            Focus::Destination => Some(Side::Destination),
            _ => None,
        }
    }
}

/// Messages sent back to the event loop by background tasks.
#[derive(Debug)]
pub(crate) enum Completion {
    Lookup {
        id: RequestId,
        places: Vec<PlaceEntity>,
    },
    /// The lookup failed or timed out.
    LookupExpired {
        id: RequestId,
    },
    Search(SearchCompletion),
}

pub(crate) struct App {
    pub form: SearchForm,
    pub orchestrator: SearchOrchestrator,
    pub resolver: LocationResolver,
    origin_debounce: Debouncer<LookupTicket>,
    destination_debounce: Debouncer<LookupTicket>,

    pub focus: Focus,
    pub passenger_kind: PassengerKind,
    pub departure_input: String,
    pub return_input: String,
    pub result_index: usize,

    pub notice: Option<String>,
    pub theme: Theme,
}

impl App {
    pub(crate) fn new(bundle: &ProviderBundle, settings: &Settings) -> Self {
        let orchestrator =
            SearchOrchestrator::new(bundle).with_timeout(settings.search.search_timeout());
        let resolver = LocationResolver::new(Arc::clone(&bundle.locations))
            .with_timeout(settings.search.lookup_timeout());

        let trip = settings.trip.clone();
        Self {
            departure_input: format_date(trip.departure_date()),
            return_input: format_date(trip.return_date()),
            form: SearchForm::with_trip(trip),
            orchestrator,
            resolver,
            origin_debounce: Debouncer::new(settings.search.debounce()),
            destination_debounce: Debouncer::new(settings.search.debounce()),
            focus: Focus::Origin,
            passenger_kind: PassengerKind::Adult,
            result_index: 0,
            notice: None,
            theme: Theme::new(settings.ui.dark_mode),
        }
    }

    fn debouncer(&mut self, side: Side) -> &mut Debouncer<LookupTicket> {
        match side {
            Side::Origin => &mut self.origin_debounce,
            Side::Destination => &mut self.destination_debounce,
        }
    }

    /// Restart the quiet window for `side`, or stop it when the text is too short.
    pub(crate) fn schedule_lookup(
        &mut self,
        side: Side,
        ticket: Option<LookupTicket>,
        now: Instant,
    ) {
        let debouncer = self.debouncer(side);
        match ticket {
            Some(ticket) => debouncer.schedule(ticket, now),
            None => debouncer.cancel(),
        }
    }

    /// Lookups whose quiet window has elapsed and that no later edit superseded.
    pub(crate) fn due_lookups(&mut self, now: Instant) -> Vec<LookupTicket> {
        let due = [
            self.origin_debounce.poll(now),
            self.destination_debounce.poll(now),
        ];
        due.into_iter()
            .flatten()
            .filter(|ticket| self.form.is_pending(ticket.id))
            .collect()
    }

    pub(crate) fn apply_completion(&mut self, completion: Completion) {
        match completion {
            Completion::Lookup { id, places } => {
                if self.form.apply_lookup(id, places).is_none() {
                    debug!(request = %id, "discarding stale place lookup");
                }
            }
            Completion::LookupExpired { id } => {
                if self.form.expire_lookup(id).is_none() {
                    debug!(request = %id, "expired place lookup was already superseded");
                }
            }
            Completion::Search(completion) => {
                if self.orchestrator.complete(completion) {
                    self.result_index = 0;
                }
            }
        }
    }

    pub(crate) fn swap(&mut self) {
        self.form.swap();
        // Pending tickets follow their fields.
        std::mem::swap(&mut self.origin_debounce, &mut self.destination_debounce);
    }

    /// Validate the form and hand back the job to spawn.
    pub(crate) fn prepare_search(&mut self) -> Option<SearchJob> {
        match self.orchestrator.prepare(&self.form) {
            Ok(job) => {
                self.notice = None;
                Some(job)
            }
            Err(err) => {
                self.notice = Some(err.to_string());
                None
            }
        }
    }

    pub(crate) fn edit_date(&mut self, focus: Focus, edit: impl FnOnce(&mut String)) {
        match focus {
            Focus::Departure => {
                edit(&mut self.departure_input);
                let date = parse_date(&self.departure_input);
                let had_return = self.form.trip().return_date().is_some();
                self.form.trip_mut().set_departure_date(date);
                if had_return && self.form.trip().return_date().is_none() {
                    self.return_input.clear();
                    self.notice = Some("Return date cleared: it was before departure".to_owned());
                }
            }
            Focus::Return if self.trip().trip_type() == TripType::OneWay => {
                self.notice = Some(ValidationError::ReturnOnOneWay.to_string());
            }
            Focus::Return => {
                edit(&mut self.return_input);
                let date = parse_date(&self.return_input);
                let trip = self.form.trip_mut();
                self.notice = match trip.set_return_date(date) {
                    Ok(()) => None,
                    Err(err) => {
                        // The shown text must never stand for an older committed date.
                        trip.clear_return_date();
                        Some(err.to_string())
                    }
                };
            }
            _ => {}
        }
    }

    pub(crate) fn toggle_trip_type(&mut self) {
        self.form.trip_mut().toggle_trip_type();
        if self.form.trip().return_date().is_none() {
            self.return_input.clear();
        }
    }

    pub(crate) fn trip(&self) -> &TripConfig {
        self.form.trip()
    }

    pub(crate) fn result_count(&self) -> usize {
        match &*self.orchestrator.status() {
            SearchStatus::Success(results) => results.itineraries.len(),
            _ => 0,
        }
    }
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), ISO_DATE).ok()
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|date| date.format(ISO_DATE).to_string())
        .unwrap_or_default()
}
