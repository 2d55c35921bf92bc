use ratatui::{
    prelude::*,
    widgets::{
        Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, TableState,
        Wrap,
    },
};
use skyfind_core::{
    HotelsView, ItinerarySummary, PassengerKind, ResultView, Side, TripType, render,
};

use crate::app::{App, Focus};

/// Colours for one of the two palettes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Theme {
    dark: bool,
    text: Color,
    muted: Color,
    accent: Color,
    error: Color,
}

impl Theme {
    pub(crate) fn new(dark_mode: bool) -> Self {
        if dark_mode {
            Self {
                dark: true,
                text: Color::White,
                muted: Color::DarkGray,
                accent: Color::Yellow,
                error: Color::LightRed,
            }
        } else {
            Self {
                dark: false,
                text: Color::Black,
                muted: Color::Gray,
                accent: Color::Blue,
                error: Color::Red,
            }
        }
    }

    /// The other palette.
    #[must_use]
    pub(crate) fn toggled(self) -> Self {
        Self::new(!self.dark)
    }

    fn block<'title>(self, title: impl Into<Line<'title>>, focused: bool) -> Block<'title> {
        let border = if focused { self.accent } else { self.muted };
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(title)
    }

    fn highlight(self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }
}

pub(crate) fn draw(frame: &mut Frame<'_>, app: &App) {
    let area = frame.area();

    // Outer layout: title, form, results, status line
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [header_area, places_area, trip_area, results_area, status_area] = chunks else {
        return;
    };

    let header = Paragraph::new("skyfind · flights and destination hotels")
        .style(Style::default().fg(app.theme.text))
        .block(app.theme.block("Skyfind", false));
    frame.render_widget(header, *header_area);

    draw_trip(frame, app, *trip_area);
    draw_results(frame, app, *results_area);
    draw_status(frame, app, *status_area);
    // Last, so suggestions overlay the rows below.
    draw_places(frame, app, *places_area, *results_area);
}

fn draw_places(frame: &mut Frame<'_>, app: &App, area: Rect, overlay_area: Rect) {
    let layout_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let chunks = layout_chunks.as_ref();
    let [origin_area, destination_area] = chunks else {
        return;
    };

    for (side, field_area, label) in [
        (Side::Origin, *origin_area, "From"),
        (Side::Destination, *destination_area, "To"),
    ] {
        let field = app.form.field(side);
        let focused = app.focus.side() == Some(side);
        let title = if field.is_searching() {
            format!("{label} (searching…)")
        } else if field.resolved().is_some() {
            format!("{label} ✓")
        } else {
            label.to_owned()
        };
        let text = if focused {
            format!("{}▏", field.text())
        } else {
            field.text().to_owned()
        };
        let input = Paragraph::new(text)
            .style(Style::default().fg(app.theme.text))
            .block(app.theme.block(title, focused));
        frame.render_widget(input, field_area);

        if focused && !field.candidates().is_empty() {
            let popup = Rect {
                x: field_area.x,
                y: overlay_area.y.saturating_sub(3),
                width: field_area.width,
                height: overlay_area.height.saturating_add(3).min(12),
            };
            draw_suggestions(frame, app, side, popup);
        }
    }
}

fn draw_suggestions(frame: &mut Frame<'_>, app: &App, side: Side, area: Rect) {
    let field = app.form.field(side);
    let items = field
        .candidates()
        .iter()
        .map(|place| {
            let mut spans = vec![Span::raw(place.suggestion_title.clone())];
            let kind = render::place_kind_label(place.kind);
            if !kind.is_empty() {
                spans.push(Span::styled(
                    format!("  [{kind}]"),
                    Style::default().fg(app.theme.accent),
                ));
            }
            spans.push(Span::styled(
                format!("  {}", place.subtitle),
                Style::default().fg(app.theme.muted),
            ));
            ListItem::new(Line::from(spans))
        })
        .collect::<Vec<ListItem<'_>>>();

    let list = List::new(items)
        .block(app.theme.block("Suggestions (↑/↓, Enter, Esc)", true))
        .highlight_style(app.theme.highlight());

    let mut state = ListState::default();
    state.select(field.highlighted());
    frame.render_widget(Clear, area);
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_trip(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let layout_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(20),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
        ])
        .split(area);
    let chunks = layout_chunks.as_ref();
    let [departure_area, return_area, options_area, passengers_area] = chunks else {
        return;
    };

    let date_box = |input: &str, focus: Focus, label: &'static str| {
        let focused = app.focus == focus;
        let text = if focused { format!("{input}▏") } else { input.to_owned() };
        let placeholder = text.is_empty();
        Paragraph::new(if placeholder { "YYYY-MM-DD".to_owned() } else { text })
            .style(Style::default().fg(if placeholder { app.theme.muted } else { app.theme.text }))
            .block(app.theme.block(label, focused))
    };
    frame.render_widget(
        date_box(&app.departure_input, Focus::Departure, "Depart"),
        *departure_area,
    );

    let trip = app.trip();
    if trip.trip_type() == TripType::RoundTrip {
        frame.render_widget(date_box(&app.return_input, Focus::Return, "Return"), *return_area);
    } else {
        let disabled = Paragraph::new("—")
            .style(Style::default().fg(app.theme.muted))
            .block(app.theme.block("Return", app.focus == Focus::Return));
        frame.render_widget(disabled, *return_area);
    }

    let options = Paragraph::new(format!("{} · {}", trip.trip_type(), trip.cabin_class()))
        .style(Style::default().fg(app.theme.text))
        .block(app.theme.block("Trip (Ctrl-T) · Cabin (Ctrl-B)", false));
    frame.render_widget(options, *options_area);

    let passengers = trip.passengers();
    let focused = app.focus == Focus::Passengers;
    let spans = [
        (PassengerKind::Adult, "Adults"),
        (PassengerKind::Child, "Children"),
        (PassengerKind::Infant, "Infants"),
    ]
    .into_iter()
    .flat_map(|(kind, label)| {
        let style = if focused && app.passenger_kind == kind {
            app.theme.highlight()
        } else {
            Style::default().fg(app.theme.text)
        };
        [
            Span::styled(format!("{label} {}", passengers.count(kind)), style),
            Span::raw("  "),
        ]
    })
    .collect::<Vec<Span<'_>>>();
    let title = match passengers.total() {
        1 => "1 Passenger".to_owned(),
        total => format!("{total} Passengers"),
    };
    let passenger_box = Paragraph::new(Line::from(spans)).block(app.theme.block(title, focused));
    frame.render_widget(passenger_box, *passengers_area);
}

fn draw_results(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let focused = app.focus == Focus::Results;
    let view = render(&app.orchestrator.status());

    match view {
        ResultView::Welcome { prompt } => {
            draw_message(frame, app, area, prompt, app.theme.muted, focused);
        }
        ResultView::Spinner => {
            draw_message(frame, app, area, "Searching flights…", app.theme.accent, focused);
        }
        ResultView::Error { message } => {
            draw_message(frame, app, area, &message, app.theme.error, focused);
        }
        ResultView::Empty { prompt, hotels } => {
            let [flights_area, hotels_area] = split_for_hotels(area, &hotels);
            draw_message(frame, app, flights_area, prompt, app.theme.muted, focused);
            draw_hotels(frame, app, hotels_area, &hotels);
        }
        ResultView::Itineraries { items, hotels } => {
            let [flights_area, hotels_area] = split_for_hotels(area, &hotels);
            draw_itineraries(frame, app, flights_area, &items, focused);
            draw_hotels(frame, app, hotels_area, &hotels);
        }
    }
}

fn split_for_hotels(area: Rect, hotels: &HotelsView) -> [Rect; 2] {
    let hotel_height = match hotels {
        HotelsView::Hidden => 0,
        HotelsView::Empty { .. } | HotelsView::Unavailable { .. } => 3,
        HotelsView::List { .. } => 8,
    };
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(hotel_height)])
        .areas(area)
}

fn draw_message(
    frame: &mut Frame<'_>,
    app: &App,
    area: Rect,
    text: &str,
    color: Color,
    focused: bool,
) {
    let paragraph = Paragraph::new(text.to_owned())
        .style(Style::default().fg(color))
        .block(app.theme.block("Flights", focused))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn draw_itineraries(
    frame: &mut Frame<'_>,
    app: &App,
    area: Rect,
    items: &[ItinerarySummary],
    focused: bool,
) {
    let rows = items.iter().map(|item| {
        Row::new(vec![
            Cell::from(item.carrier.clone()),
            Cell::from(item.flight_number.clone()),
            Cell::from(format!("{} – {}", item.departure_time, item.arrival_time)),
            Cell::from(item.route.clone()),
            Cell::from(item.duration.clone()),
            Cell::from(item.stops.clone()),
            Cell::from(item.price.clone()),
        ])
        .style(Style::default().fg(app.theme.text))
    });

    let column_widths = [
        Constraint::Min(16),
        Constraint::Length(8),
        Constraint::Length(14),
        Constraint::Length(12),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(10),
    ];

    let table = Table::new(rows, column_widths)
        .header(
            Row::new(vec!["Airline", "Flight", "Times", "Route", "Duration", "Stops", "Price"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(app.theme.block(format!("Flights ({})", items.len()), focused))
        .row_highlight_style(app.theme.highlight())
        .column_spacing(1);

    let mut state = TableState::default();
    state.select(Some(app.result_index.min(items.len().saturating_sub(1))));
    frame.render_stateful_widget(table, area, &mut state);
}

fn draw_hotels(frame: &mut Frame<'_>, app: &App, area: Rect, hotels: &HotelsView) {
    let (title, lines) = match hotels {
        HotelsView::Hidden => return,
        HotelsView::Empty { destination } => (
            format!("Hotels in {destination}"),
            vec![Line::styled("No hotels found.", Style::default().fg(app.theme.muted))],
        ),
        HotelsView::Unavailable { destination } => (
            format!("Hotels in {destination}"),
            vec![Line::styled(
                "Hotel information is unavailable right now.",
                Style::default().fg(app.theme.muted),
            )],
        ),
        HotelsView::List {
            destination,
            hotels: entries,
        } => (
            format!("Hotels in {destination} ({})", entries.len()),
            entries
                .iter()
                .map(|hotel| {
                    let mut spans = vec![
                        Span::styled(hotel.name.clone(), Style::default().fg(app.theme.text)),
                        Span::styled(
                            format!("  {}", hotel.hierarchy),
                            Style::default().fg(app.theme.muted),
                        ),
                    ];
                    if let Some(location) = &hotel.location {
                        spans.push(Span::styled(
                            format!("  {location}"),
                            Style::default().fg(app.theme.muted),
                        ));
                    }
                    Line::from(spans)
                })
                .collect(),
        ),
    };

    let paragraph = Paragraph::new(lines).block(app.theme.block(title, false));
    frame.render_widget(paragraph, area);
}

fn draw_status(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let nav_hint = match app.focus {
        Focus::Origin | Focus::Destination => {
            "Type to search · ↑/↓ Enter pick · Tab next · Ctrl-X swap · Ctrl-S search · \
             Ctrl-D theme · Ctrl-C quit"
        }
        Focus::Departure | Focus::Return => {
            "YYYY-MM-DD · Enter/Ctrl-S search · Tab next · Ctrl-C quit"
        }
        Focus::Passengers => "←/→ pick · ↑/↓ or +/- change · Tab next · Ctrl-C quit",
        Focus::Results => "↑/↓ move · Enter search again · Tab next · Ctrl-C quit",
    };

    let loading = app.orchestrator.status().is_loading();
    let status_text = if let Some(msg) = &app.notice {
        format!("{msg} · {nav_hint}")
    } else if loading {
        format!("Loading… · {nav_hint}")
    } else {
        nav_hint.to_owned()
    };

    let status_style = if app.notice.is_some() {
        Style::default().fg(app.theme.error)
    } else if loading {
        Style::default().fg(app.theme.accent)
    } else {
        Style::default().fg(app.theme.text)
    };

    let status = Paragraph::new(status_text)
        .block(app.theme.block("Status", false))
        .style(status_style)
        .wrap(Wrap { trim: true });

    frame.render_widget(status, area);
}
