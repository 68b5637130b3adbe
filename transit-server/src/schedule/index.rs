//! Denormalized, route-filtered schedule table.
//!
//! Joins stop visits to their stop and trip attributes, keeps only the
//! configured routes, and orders the result so that every trip's rows are
//! contiguous and in visit order. Route groups appear in the order the
//! caller listed them, not lexical order.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::ops::Range;

use serde::Serialize;
use tracing::debug;

use crate::domain::{Coordinates, InvalidId, RouteId, Stop, StopId, StopTime, Trip, TripId};

/// Ordered list of routes to retain.
///
/// The list defines both which routes are kept and the order route groups
/// appear in the index. Duplicates keep their first position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteFilter {
    routes: Vec<RouteId>,
}

impl RouteFilter {
    pub fn new(routes: impl IntoIterator<Item = RouteId>) -> Self {
        let mut seen = HashSet::new();
        let routes = routes
            .into_iter()
            .filter(|r| seen.insert(r.clone()))
            .collect();
        Self { routes }
    }

    /// Parse a comma-separated route list such as `"30,41,201"`.
    pub fn parse_list(s: &str) -> Result<Self, InvalidId> {
        let routes = s
            .split(',')
            .map(RouteId::parse)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(routes))
    }

    /// Position of `route` in the filter, or `None` if it is excluded.
    pub fn rank(&self, route: &RouteId) -> Option<usize> {
        self.routes.iter().position(|r| r == route)
    }

    pub fn routes(&self) -> &[RouteId] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// A stop visit joined with its stop and trip attributes.
///
/// Stop attributes are `None` when the visit's `stop_id` has no entry in the
/// stop table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailedScheduleRow {
    pub trip_id: TripId,
    pub stop_id: StopId,
    pub stop_sequence: u32,
    #[serde(rename = "shape_dist_traveled")]
    pub distance: Option<f64>,
    pub stop_name: Option<String>,
    pub stop_lat: Option<f64>,
    pub stop_lon: Option<f64>,
    pub route_id: RouteId,
    pub service_id: String,
    pub direction_name: String,
}

impl DetailedScheduleRow {
    /// True if this row visits the station called `name`.
    pub fn is_station(&self, name: &str) -> bool {
        self.stop_name.as_deref() == Some(name)
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        Some(Coordinates::new(self.stop_lat?, self.stop_lon?))
    }
}

/// The schedule, indexed by trip.
///
/// Rows are ordered by (route rank, trip stop count, trip id, stop sequence).
/// Because the first three keys are constant within a trip, each trip
/// occupies one contiguous run of rows, and each route likewise.
#[derive(Debug, Clone)]
pub struct ScheduleIndex {
    rows: Vec<DetailedScheduleRow>,
    trips: HashMap<TripId, Range<usize>>,
    trip_order: Vec<TripId>,
    route_ranges: Vec<(RouteId, Range<usize>)>,
    /// Coordinates of the first row carrying each station name.
    stations: HashMap<String, Coordinates>,
}

impl ScheduleIndex {
    /// Build the index from raw tables.
    ///
    /// Joins are left joins keyed on the first record for each id. Visits
    /// whose trip is unknown have no route and are therefore dropped by the
    /// route filter.
    pub fn build(
        stop_times: &[StopTime],
        stops: &[Stop],
        trips: &[Trip],
        filter: &RouteFilter,
    ) -> Self {
        let mut stops_by_id: HashMap<&StopId, &Stop> = HashMap::new();
        for stop in stops {
            stops_by_id.entry(&stop.stop_id).or_insert(stop);
        }
        let mut trips_by_id: HashMap<&TripId, &Trip> = HashMap::new();
        for trip in trips {
            trips_by_id.entry(&trip.trip_id).or_insert(trip);
        }

        let mut rows = Vec::new();
        let mut unmatched_stops = 0usize;
        for visit in stop_times {
            let Some(trip) = trips_by_id.get(&visit.trip_id) else {
                continue;
            };
            if filter.rank(&trip.route_id).is_none() {
                continue;
            }
            let stop = stops_by_id.get(&visit.stop_id);
            if stop.is_none() {
                unmatched_stops += 1;
            }
            rows.push(DetailedScheduleRow {
                trip_id: visit.trip_id.clone(),
                stop_id: visit.stop_id.clone(),
                stop_sequence: visit.stop_sequence,
                distance: visit.shape_dist_traveled,
                stop_name: stop.map(|s| s.stop_name.clone()),
                stop_lat: stop.map(|s| s.stop_lat),
                stop_lon: stop.map(|s| s.stop_lon),
                route_id: trip.route_id.clone(),
                service_id: trip.service_id.clone(),
                direction_name: trip.direction_name.clone(),
            });
        }

        // Stop count is only a sort key: shorter trips first within a route.
        let mut stop_counts: HashMap<TripId, u32> = HashMap::new();
        for row in &rows {
            let count = stop_counts.entry(row.trip_id.clone()).or_insert(0);
            *count = (*count).max(row.stop_sequence);
        }

        let rank = |row: &DetailedScheduleRow| filter.rank(&row.route_id).unwrap_or(usize::MAX);
        rows.sort_by(|a, b| {
            rank(a)
                .cmp(&rank(b))
                .then_with(|| stop_counts[&a.trip_id].cmp(&stop_counts[&b.trip_id]))
                .then_with(|| a.trip_id.cmp(&b.trip_id))
                .then_with(|| a.stop_sequence.cmp(&b.stop_sequence))
        });

        let index = Self::from_sorted_rows(rows);

        debug!(
            rows = index.rows.len(),
            trips = index.trip_order.len(),
            stations = index.stations.len(),
            unmatched_stops,
            "Built schedule index"
        );

        index
    }

    fn from_sorted_rows(rows: Vec<DetailedScheduleRow>) -> Self {
        let trip_runs = contiguous_runs(&rows, |a, b| a.trip_id == b.trip_id);
        let mut trips = HashMap::with_capacity(trip_runs.len());
        let mut trip_order = Vec::with_capacity(trip_runs.len());
        for range in trip_runs {
            let trip_id = rows[range.start].trip_id.clone();
            trip_order.push(trip_id.clone());
            trips.insert(trip_id, range);
        }

        let route_ranges = contiguous_runs(&rows, |a, b| a.route_id == b.route_id)
            .into_iter()
            .map(|range| (rows[range.start].route_id.clone(), range))
            .collect();

        let mut stations = HashMap::new();
        for row in &rows {
            if let (Some(name), Some(coords)) = (&row.stop_name, row.coordinates()) {
                stations.entry(name.clone()).or_insert(coords);
            }
        }

        Self {
            rows,
            trips,
            trip_order,
            route_ranges,
            stations,
        }
    }

    /// All rows, in index order.
    pub fn rows(&self) -> &[DetailedScheduleRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows of one trip, ordered by stop sequence. Empty for unknown trips.
    pub fn trip_rows(&self, trip_id: &TripId) -> &[DetailedScheduleRow] {
        self.trips
            .get(trip_id)
            .map(|range| &self.rows[range.clone()])
            .unwrap_or(&[])
    }

    /// Trip ids in index order.
    pub fn trip_ids(&self) -> &[TripId] {
        &self.trip_order
    }

    /// Configured routes that have at least one row, in filter order.
    pub fn routes(&self) -> impl Iterator<Item = &RouteId> {
        self.route_ranges.iter().map(|(route, _)| route)
    }

    /// Rows of one route. Empty for routes without rows.
    pub fn route_rows(&self, route: &RouteId) -> &[DetailedScheduleRow] {
        self.route_ranges
            .iter()
            .find(|(r, _)| r == route)
            .map(|(_, range)| &self.rows[range.clone()])
            .unwrap_or(&[])
    }

    pub fn contains_station(&self, name: &str) -> bool {
        self.stations.contains_key(name)
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    /// Station names, sorted.
    pub fn station_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.stations.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Coordinates of the first row (in index order) with this station name.
    pub fn station_coordinates(&self, name: &str) -> Option<Coordinates> {
        self.stations.get(name).copied()
    }

    /// Case-insensitive substring search over station names.
    ///
    /// Results are sorted and truncated to `limit`.
    pub fn search_stations(&self, query: &str, limit: usize) -> Vec<&str> {
        let needle = query.trim().to_lowercase();
        let mut matches: Vec<&str> = self
            .stations
            .keys()
            .filter(|name| name.to_lowercase().contains(&needle))
            .map(String::as_str)
            .collect();
        matches.sort_unstable_by(|a, b| compare_match(a, b, &needle));
        matches.truncate(limit);
        matches
    }
}

/// Prefix matches first, then alphabetical.
fn compare_match(a: &str, b: &str, needle: &str) -> Ordering {
    let a_prefix = a.to_lowercase().starts_with(needle);
    let b_prefix = b.to_lowercase().starts_with(needle);
    b_prefix.cmp(&a_prefix).then_with(|| a.cmp(b))
}

/// Split `rows` into maximal runs whose neighbours satisfy `same`.
fn contiguous_runs<T>(rows: &[T], same: impl Fn(&T, &T) -> bool) -> Vec<Range<usize>> {
    let mut runs = Vec::new();
    let mut start = 0;
    for i in 1..=rows.len() {
        if i == rows.len() || !same(&rows[i - 1], &rows[i]) {
            if start < i {
                runs.push(start..i);
            }
            start = i;
        }
    }
    runs
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn stop(id: &str, name: &str, lat: f64, lon: f64) -> Stop {
        Stop::new(StopId::parse(id).unwrap(), name, Coordinates::new(lat, lon))
    }

    pub fn trip(id: &str, route: &str, direction: &str) -> Trip {
        Trip {
            trip_id: TripId::parse(id).unwrap(),
            route_id: RouteId::parse(route).unwrap(),
            service_id: "weekday".to_string(),
            direction_name: direction.to_string(),
        }
    }

    pub fn visit(trip: &str, stop: &str, seq: u32) -> StopTime {
        StopTime::new(TripId::parse(trip).unwrap(), StopId::parse(stop).unwrap(), seq)
    }

    pub fn filter(routes: &[&str]) -> RouteFilter {
        RouteFilter::new(routes.iter().map(|r| RouteId::parse(r).unwrap()))
    }

    /// Build an index from `(trip, route, [station names in visit order])`.
    ///
    /// Each distinct station name gets one stop whose coordinates encode its
    /// position in first-appearance order.
    pub fn schedule_from_trips(trips: &[(&str, &str, &[&str])]) -> ScheduleIndex {
        let mut stops: Vec<Stop> = Vec::new();
        let mut trip_records = Vec::new();
        let mut visits = Vec::new();
        let mut routes: Vec<&str> = Vec::new();

        for (trip_id, route, names) in trips {
            if !routes.contains(route) {
                routes.push(*route);
            }
            trip_records.push(trip(trip_id, route, "Outbound"));
            for (i, name) in names.iter().enumerate() {
                let stop_id = match stops.iter().find(|s| s.stop_name == *name) {
                    Some(s) => s.stop_id.clone(),
                    None => {
                        let n = stops.len();
                        let s = stop(&format!("S{n}"), name, 32.0 + n as f64, -117.0);
                        let id = s.stop_id.clone();
                        stops.push(s);
                        id
                    }
                };
                visits.push(StopTime::new(
                    TripId::parse(trip_id).unwrap(),
                    stop_id,
                    i as u32 + 1,
                ));
            }
        }

        ScheduleIndex::build(&visits, &stops, &trip_records, &filter(&routes))
    }
}
