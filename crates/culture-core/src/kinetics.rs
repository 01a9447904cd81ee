//! Growth kinetics: doubling time from observed densities, density
//! prediction under exponential or logistic growth, and population-doubling
//! bookkeeping.
//!
//! Every calculation is a pure function. A precondition that is not met
//! (non-positive density, no growth, non-positive elapsed time, missing
//! model input) yields `None`. Only unparseable timestamp strings produce a
//! [`KineticsError`].
//!
//! Two calling conventions exist for doubling time, a scalar one and a
//! record one. Both are expressed by [`DoublingTimeInput`] and funnel into
//! [`measured_doubling_time`].

use std::f64::consts::LN_2;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use culture_types::{Parameters, StateId, StateRecord, keys, parse_timestamp};

use crate::error::KineticsError;

const SECONDS_PER_HOUR: f64 = 3600.0;

// ---------------------------------------------------------------------------
// Scalar core
// ---------------------------------------------------------------------------

/// Hours from `start` to `end`; negative when `end` is earlier.
pub fn elapsed_hours(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    let seconds = |from: DateTime<Utc>, to: DateTime<Utc>| {
        to.signed_duration_since(from)
            .to_std()
            .map_or(0.0, |duration| duration.as_secs_f64())
    };
    if end >= start {
        seconds(start, end) / SECONDS_PER_HOUR
    } else {
        -seconds(end, start) / SECONDS_PER_HOUR
    }
}

/// Exponential growth rate `ln(N1 / N0) / Δt` (per hour).
///
/// `None` unless `N0 > 0`, `N1 > N0` and `Δt > 0`.
pub fn growth_rate(initial_density: f64, final_density: f64, hours: f64) -> Option<f64> {
    let computable = initial_density.is_finite()
        && final_density.is_finite()
        && hours.is_finite()
        && initial_density > 0.0
        && final_density > initial_density
        && hours > 0.0;
    if !computable {
        return None;
    }
    let rate = (final_density / initial_density).ln() / hours;
    (rate.is_finite() && rate > 0.0).then_some(rate)
}

/// Doubling time `ln(2) / r` in hours from two density observations.
///
/// `None` when the population did not grow or no time elapsed.
pub fn measured_doubling_time(initial_density: f64, final_density: f64, hours: f64) -> Option<f64> {
    growth_rate(initial_density, final_density, hours)
        .map(|rate| LN_2 / rate)
        .filter(|hours| hours.is_finite())
}

/// Doubling time from four scalars, with timestamps given as strings.
///
/// # Errors
///
/// Returns [`KineticsError::Timestamp`] if either timestamp is unparseable.
pub fn doubling_time_from_scalars(
    initial_density: f64,
    final_density: f64,
    start: &str,
    end: &str,
) -> Result<Option<f64>, KineticsError> {
    let start = parse_timestamp(start)?;
    let end = parse_timestamp(end)?;
    Ok(measured_doubling_time(
        initial_density,
        final_density,
        elapsed_hours(start, end),
    ))
}

/// Doubling time of `state` observed at its successor `child`.
///
/// The initial density is the state's `cell_density`. The final density is
/// the state's own `end_density`, else the child's `parent_end_density`.
/// Elapsed time runs from the state's timestamp to the child's.
pub fn doubling_time_from_records(state: &StateRecord, child: &StateRecord) -> Option<f64> {
    let initial = state.parameters.number(keys::CELL_DENSITY)?;
    let final_density = state
        .parameters
        .number(keys::END_DENSITY)
        .or_else(|| child.parameters.number(keys::PARENT_END_DENSITY))?;
    measured_doubling_time(
        initial,
        final_density,
        elapsed_hours(state.timestamp, child.timestamp),
    )
}

/// The two accepted shapes of a doubling-time request.
#[derive(Debug, Clone, Copy)]
pub enum DoublingTimeInput<'a> {
    /// Two densities and two timestamp strings.
    Scalars {
        /// Density at `start`.
        initial_density: f64,
        /// Density at `end`.
        final_density: f64,
        /// Start instant.
        start: &'a str,
        /// End instant.
        end: &'a str,
    },
    /// A state carrying its densities and the successor that closes it.
    Records {
        /// The observed state.
        state: &'a StateRecord,
        /// Its successor, supplying the end instant.
        child: &'a StateRecord,
    },
}

/// Doubling time for either calling convention.
///
/// # Errors
///
/// Returns [`KineticsError::Timestamp`] if a scalar timestamp is unparseable.
pub fn doubling_time(input: DoublingTimeInput<'_>) -> Result<Option<f64>, KineticsError> {
    match input {
        DoublingTimeInput::Scalars {
            initial_density,
            final_density,
            start,
            end,
        } => doubling_time_from_scalars(initial_density, final_density, start, end),
        DoublingTimeInput::Records { state, child } => {
            Ok(doubling_time_from_records(state, child))
        }
    }
}

// ---------------------------------------------------------------------------
// Growth-rate / doubling-time duality
// ---------------------------------------------------------------------------

/// `ln(2) / value`, with non-positive or non-finite results mapped to 0.
fn ln2_over(value: f64) -> f64 {
    if value > 0.0 {
        let result = LN_2 / value;
        if result.is_finite() { result } else { 0.0 }
    } else {
        0.0
    }
}

/// Doubling time (hours) for a growth rate; 0 when the rate is not positive.
pub fn doubling_time_from_growth_rate(growth_rate: f64) -> f64 {
    ln2_over(growth_rate)
}

/// Growth rate (per hour) for a doubling time; 0 when the time is not positive.
pub fn growth_rate_from_doubling_time(doubling_time: f64) -> f64 {
    ln2_over(doubling_time)
}

/// A user edit to one side of the growth-rate / doubling-time pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GrowthEdit {
    /// A new growth rate (per hour).
    GrowthRate(f64),
    /// A new doubling time (hours).
    DoublingTime(f64),
}

/// Store the edited value and recompute its counterpart.
pub fn apply_growth_edit(parameters: &mut Parameters, edit: GrowthEdit) {
    let (rate, doubling) = match edit {
        GrowthEdit::GrowthRate(rate) => (rate, doubling_time_from_growth_rate(rate)),
        GrowthEdit::DoublingTime(hours) => (growth_rate_from_doubling_time(hours), hours),
    };
    parameters.set(keys::GROWTH_RATE, Value::from(rate));
    parameters.set(keys::DOUBLING_TIME, Value::from(doubling));
}

/// The state's parameters with a measured doubling time written in, ready
/// for the persistence layer to patch back.
pub fn with_measured_doubling_time(state: &StateRecord, hours: f64) -> Parameters {
    let mut parameters = state.parameters.clone();
    parameters.set(keys::MEASURED_DOUBLING_TIME, Value::from(hours));
    parameters
}

// ---------------------------------------------------------------------------
// Density prediction
// ---------------------------------------------------------------------------

/// A validated growth model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GrowthModel {
    /// `N(t) = N0 * e^(r t)`.
    Exponential {
        /// `N0`.
        initial_density: f64,
        /// `r` per hour.
        growth_rate: f64,
    },
    /// `N(t) = K / (1 + ((K - N0) / N0) * e^(-r t))`, never above `K`.
    Logistic {
        /// `N0`.
        initial_density: f64,
        /// `r` per hour.
        growth_rate: f64,
        /// Carrying capacity `K`.
        density_limit: f64,
    },
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

impl GrowthModel {
    /// Exponential model; `None` unless `N0 > 0` and `r > 0`.
    pub fn exponential(initial_density: f64, growth_rate: f64) -> Option<Self> {
        (positive(initial_density) && positive(growth_rate)).then_some(Self::Exponential {
            initial_density,
            growth_rate,
        })
    }

    /// Logistic model; `None` unless `N0 > 0`, `r > 0`, `K > 0` and `N0 < K`.
    pub fn logistic(initial_density: f64, growth_rate: f64, density_limit: f64) -> Option<Self> {
        let valid = positive(initial_density)
            && positive(growth_rate)
            && positive(density_limit)
            && initial_density < density_limit;
        valid.then_some(Self::Logistic {
            initial_density,
            growth_rate,
            density_limit,
        })
    }

    /// Pick the model from a parameter set.
    ///
    /// `growth_rate` is preferred; a `doubling_time` is converted when the
    /// rate is absent. A present `density_limit` selects the logistic model.
    pub fn from_parameters(parameters: &Parameters) -> Option<Self> {
        let initial = parameters.number(keys::CELL_DENSITY)?;
        let rate = parameters.number(keys::GROWTH_RATE).or_else(|| {
            parameters
                .number(keys::DOUBLING_TIME)
                .map(growth_rate_from_doubling_time)
        })?;
        match parameters.number(keys::DENSITY_LIMIT) {
            Some(limit) => Self::logistic(initial, rate, limit),
            None => Self::exponential(initial, rate),
        }
    }

    /// Starting density `N0`.
    pub const fn initial_density(&self) -> f64 {
        match self {
            Self::Exponential {
                initial_density, ..
            }
            | Self::Logistic {
                initial_density, ..
            } => *initial_density,
        }
    }

    /// Density after `hours`. Non-positive elapsed time returns `N0`.
    pub fn density_at(&self, hours: f64) -> f64 {
        if hours.is_nan() || hours <= 0.0 {
            return self.initial_density();
        }
        match *self {
            Self::Exponential {
                initial_density,
                growth_rate,
            } => initial_density * (growth_rate * hours).exp(),
            Self::Logistic {
                initial_density,
                growth_rate,
                density_limit,
            } => {
                let ratio = (density_limit - initial_density) / initial_density;
                let density = density_limit / ratio.mul_add((-growth_rate * hours).exp(), 1.0);
                density.min(density_limit)
            }
        }
    }
}

/// Predicted density of `state` at `reference`.
///
/// `None` if the state's parameters do not describe a valid model or the
/// prediction overflows.
pub fn predicted_density(state: &StateRecord, reference: DateTime<Utc>) -> Option<f64> {
    let model = GrowthModel::from_parameters(&state.parameters)?;
    let density = model.density_at(elapsed_hours(state.timestamp, reference));
    density.is_finite().then_some(density)
}

// ---------------------------------------------------------------------------
// Population doublings
// ---------------------------------------------------------------------------

/// Population doublings `log2(harvest / seed)`, added to the parent's
/// cumulative count when one is given.
pub fn population_doublings(seed: f64, harvest: f64, parent: Option<f64>) -> Option<f64> {
    if !positive(seed) || !positive(harvest) {
        return None;
    }
    let current = (harvest / seed).log2();
    Some(parent.map_or(current, |parent| parent + current))
}

/// Cumulative doublings including ancestors.
pub fn cumulative_population_doublings(current: Option<f64>, parent: Option<f64>) -> Option<f64> {
    current.map(|current| parent.map_or(current, |parent| parent + current))
}

/// Hours per doubling over a span; `None` unless doublings are positive.
pub fn doubling_time_from_population_doublings(hours: f64, doublings: f64) -> Option<f64> {
    positive(doublings)
        .then(|| hours / doublings)
        .filter(|value| value.is_finite())
}

// ---------------------------------------------------------------------------
// Measured growth between two states
// ---------------------------------------------------------------------------

/// Why a growth measurement between two states did or did not compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementOutcome {
    /// Growth rate and doubling time were computed.
    Computed,
    /// The start state has no positive `cell_density`.
    MissingStartDensity,
    /// The end state has no positive `cell_density`.
    MissingEndDensity,
    /// The end state is not later than the start state.
    EndNotAfterStart,
    /// The density did not increase.
    NoGrowth,
}

impl MeasurementOutcome {
    /// Human-readable explanation for the collaborator's UI.
    pub const fn message(self) -> &'static str {
        match self {
            Self::Computed => "Measured parameters calculated successfully",
            Self::MissingStartDensity => "Invalid or missing start density",
            Self::MissingEndDensity => "Invalid or missing end density",
            Self::EndNotAfterStart => "End time must be after start time",
            Self::NoGrowth => "Density did not increase between the two states",
        }
    }
}

/// Observed growth between two states.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasuredGrowth {
    /// Start of the observation.
    pub start_state_id: StateId,
    /// End of the observation.
    pub end_state_id: StateId,
    /// `cell_density` of the start state, if usable.
    pub start_density: Option<f64>,
    /// `cell_density` of the end state, if usable.
    pub end_density: Option<f64>,
    /// Hours between the two states, once both densities are known.
    pub elapsed_hours: Option<f64>,
    /// Measured growth rate per hour.
    pub growth_rate: Option<f64>,
    /// Measured doubling time in hours.
    pub doubling_time: Option<f64>,
    /// Result classification.
    pub outcome: MeasurementOutcome,
}

impl MeasuredGrowth {
    /// Whether the measurement produced values.
    pub fn is_computed(&self) -> bool {
        self.outcome == MeasurementOutcome::Computed
    }

    /// Write the measured values into `parameters` (no-op unless computed).
    pub fn write_to(&self, parameters: &mut Parameters) {
        if let (Some(rate), Some(doubling)) = (self.growth_rate, self.doubling_time) {
            parameters.set(keys::MEASURED_GROWTH_RATE, Value::from(rate));
            parameters.set(keys::MEASURED_DOUBLING_TIME, Value::from(doubling));
        }
    }
}

/// Measure growth from `start` to `end` using both states' `cell_density`.
pub fn measure_growth(start: &StateRecord, end: &StateRecord) -> MeasuredGrowth {
    let start_density = start
        .parameters
        .number(keys::CELL_DENSITY)
        .filter(|d| positive(*d));
    let end_density = end
        .parameters
        .number(keys::CELL_DENSITY)
        .filter(|d| positive(*d));

    let mut measured = MeasuredGrowth {
        start_state_id: start.id,
        end_state_id: end.id,
        start_density,
        end_density,
        elapsed_hours: None,
        growth_rate: None,
        doubling_time: None,
        outcome: MeasurementOutcome::Computed,
    };

    let (Some(n0), Some(n1)) = (start_density, end_density) else {
        measured.outcome = if start_density.is_none() {
            MeasurementOutcome::MissingStartDensity
        } else {
            MeasurementOutcome::MissingEndDensity
        };
        return measured;
    };

    if end.timestamp <= start.timestamp {
        measured.outcome = MeasurementOutcome::EndNotAfterStart;
        return measured;
    }

    let hours = elapsed_hours(start.timestamp, end.timestamp);
    measured.elapsed_hours = Some(hours);
    match growth_rate(n0, n1, hours) {
        Some(rate) => {
            measured.growth_rate = Some(rate);
            measured.doubling_time = Some(doubling_time_from_growth_rate(rate));
        }
        None => measured.outcome = MeasurementOutcome::NoGrowth,
    }
    measured
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    use super::*;

    const EPS: f64 = 1e-9;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0)
            .single()
            .unwrap_or_default()
    }

    fn state_at(id: i64, hours: i64) -> StateRecord {
        StateRecord::new(StateId(id), None, t0() + Duration::hours(hours))
    }

    // -----------------------------------------------------------------------
    // Doubling time
    // -----------------------------------------------------------------------

    #[test]
    fn quadrupling_over_two_days_doubles_daily() {
        let rate = growth_rate(100_000.0, 400_000.0, 48.0).unwrap_or_default();
        assert!((rate - 4.0_f64.ln() / 48.0).abs() < EPS);
        let doubling = measured_doubling_time(100_000.0, 400_000.0, 48.0).unwrap_or_default();
        assert!((doubling - 24.0).abs() < EPS);
    }

    #[test]
    fn decline_or_no_time_is_not_computable() {
        assert_eq!(measured_doubling_time(500_000.0, 300_000.0, 24.0), None);
        assert_eq!(measured_doubling_time(500_000.0, 500_000.0, 24.0), None);
        assert_eq!(measured_doubling_time(100.0, 400.0, 0.0), None);
        assert_eq!(measured_doubling_time(100.0, 400.0, -3.0), None);
        assert_eq!(measured_doubling_time(0.0, 400.0, 3.0), None);
        assert_eq!(measured_doubling_time(f64::NAN, 400.0, 3.0), None);
    }

    #[test]
    fn scalar_form_parses_api_timestamps() {
        let result = doubling_time_from_scalars(
            100_000.0,
            400_000.0,
            "2024-03-01T09:00",
            "2024-03-03T09:00",
        );
        let doubling = result.ok().flatten().unwrap_or_default();
        assert!((doubling - 24.0).abs() < EPS);
    }

    #[test]
    fn scalar_form_rejects_bad_timestamps() {
        let result = doubling_time_from_scalars(1.0, 2.0, "soon", "2024-03-03T09:00");
        assert!(matches!(result, Err(KineticsError::Timestamp { .. })));
    }

    #[test]
    fn record_form_reads_end_density_from_either_side() {
        let state = state_at(1, 0).with_parameter(keys::CELL_DENSITY, json!(100_000));
        let child = state_at(2, 48)
            .with_operation_parameter(keys::PARENT_END_DENSITY, json!(400_000));
        let inherited = doubling_time_from_records(&state, &child).unwrap_or_default();
        assert!((inherited - 24.0).abs() < EPS);

        let own = state
            .clone()
            .with_parameter(keys::END_DENSITY, json!(800_000));
        let direct = doubling_time_from_records(&own, &child).unwrap_or_default();
        assert!((direct - 16.0).abs() < EPS);
    }

    #[test]
    fn record_form_without_densities_is_none() {
        let state = state_at(1, 0);
        let child = state_at(2, 24);
        assert_eq!(doubling_time_from_records(&state, &child), None);
    }

    #[test]
    fn tagged_input_dispatches_to_both_forms() {
        let state = state_at(1, 0)
            .with_parameter(keys::CELL_DENSITY, json!(100_000))
            .with_parameter(keys::END_DENSITY, json!(400_000));
        let child = state_at(2, 48);
        let records = doubling_time(DoublingTimeInput::Records {
            state: &state,
            child: &child,
        });
        let scalars = doubling_time(DoublingTimeInput::Scalars {
            initial_density: 100_000.0,
            final_density: 400_000.0,
            start: "2024-03-01T09:00:00Z",
            end: "2024-03-03T09:00:00Z",
        });
        assert_eq!(records.ok().flatten(), scalars.ok().flatten());
    }

    // -----------------------------------------------------------------------
    // Duality
    // -----------------------------------------------------------------------

    #[test]
    fn duality_maps_degenerate_values_to_zero() {
        assert!(doubling_time_from_growth_rate(0.0).abs() < EPS);
        assert!(doubling_time_from_growth_rate(-1.0).abs() < EPS);
        assert!(growth_rate_from_doubling_time(f64::NAN).abs() < EPS);
        assert!((doubling_time_from_growth_rate(LN_2) - 1.0).abs() < EPS);
    }

    #[test]
    fn growth_edit_updates_both_keys() {
        let mut parameters = Parameters::default();
        apply_growth_edit(&mut parameters, GrowthEdit::DoublingTime(24.0));
        let rate = parameters.number(keys::GROWTH_RATE).unwrap_or_default();
        assert!((rate - LN_2 / 24.0).abs() < EPS);

        apply_growth_edit(&mut parameters, GrowthEdit::GrowthRate(0.0));
        assert_eq!(parameters.number(keys::DOUBLING_TIME), Some(0.0));
    }

    #[test]
    fn measured_doubling_time_is_patched_into_a_copy() {
        let state = state_at(1, 0).with_parameter(keys::CELL_DENSITY, json!(5));
        let patched = with_measured_doubling_time(&state, 21.5);
        assert_eq!(patched.number(keys::MEASURED_DOUBLING_TIME), Some(21.5));
        assert_eq!(patched.number(keys::CELL_DENSITY), Some(5.0));
        assert_eq!(state.parameters.number(keys::MEASURED_DOUBLING_TIME), None);
    }

    // -----------------------------------------------------------------------
    // Prediction
    // -----------------------------------------------------------------------

    #[test]
    fn logistic_at_time_zero_is_initial_density() {
        let model = GrowthModel::logistic(100_000.0, 0.05, 1_000_000.0);
        let density = model.map(|m| m.density_at(0.0)).unwrap_or_default();
        assert!((density - 100_000.0).abs() < EPS);
    }

    #[test]
    fn logistic_never_exceeds_limit() {
        let model = GrowthModel::logistic(100_000.0, 0.5, 1_000_000.0);
        let late = model.map(|m| m.density_at(10_000.0)).unwrap_or_default();
        assert!(late <= 1_000_000.0);
        assert!(late > 999_000.0);
    }

    #[test]
    fn exponential_doubles_per_doubling_time() {
        let model = GrowthModel::exponential(1000.0, LN_2 / 20.0);
        let density = model.map(|m| m.density_at(40.0)).unwrap_or_default();
        assert!((density - 4000.0).abs() < 1e-6);
    }

    #[test]
    fn invalid_models_are_rejected() {
        assert_eq!(GrowthModel::exponential(0.0, 0.1), None);
        assert_eq!(GrowthModel::exponential(10.0, 0.0), None);
        assert_eq!(GrowthModel::logistic(10.0, 0.1, 5.0), None);
        assert_eq!(GrowthModel::logistic(10.0, 0.1, 10.0), None);
        assert_eq!(GrowthModel::logistic(10.0, 0.1, -1.0), None);
    }

    #[test]
    fn prediction_before_record_returns_initial_density() {
        let state = state_at(1, 10)
            .with_parameter(keys::CELL_DENSITY, json!(2000))
            .with_parameter(keys::GROWTH_RATE, json!(0.1));
        assert_eq!(predicted_density(&state, t0()), Some(2000.0));
    }

    #[test]
    fn prediction_falls_back_to_doubling_time() {
        let state = state_at(1, 0)
            .with_parameter(keys::CELL_DENSITY, json!(1000))
            .with_parameter(keys::DOUBLING_TIME, json!("24"));
        let density = predicted_density(&state, t0() + Duration::hours(48)).unwrap_or_default();
        assert!((density - 4000.0).abs() < 1e-6);
    }

    #[test]
    fn prediction_without_rate_is_none() {
        let state = state_at(1, 0).with_parameter(keys::CELL_DENSITY, json!(1000));
        assert_eq!(predicted_density(&state, t0()), None);
    }

    // -----------------------------------------------------------------------
    // Population doublings
    // -----------------------------------------------------------------------

    #[test]
    fn population_doublings_accumulate() {
        assert_eq!(population_doublings(1.0, 8.0, None), Some(3.0));
        assert_eq!(population_doublings(1.0, 8.0, Some(2.0)), Some(5.0));
        assert_eq!(population_doublings(0.0, 8.0, None), None);
        assert_eq!(cumulative_population_doublings(Some(1.5), Some(2.0)), Some(3.5));
        assert_eq!(cumulative_population_doublings(None, Some(2.0)), None);
        assert_eq!(doubling_time_from_population_doublings(72.0, 3.0), Some(24.0));
        assert_eq!(doubling_time_from_population_doublings(72.0, 0.0), None);
    }

    // -----------------------------------------------------------------------
    // Measured growth
    // -----------------------------------------------------------------------

    #[test]
    fn measure_growth_between_two_states() {
        let start = state_at(1, 0).with_parameter(keys::CELL_DENSITY, json!(100_000));
        let end = state_at(2, 48).with_parameter(keys::CELL_DENSITY, json!(400_000));
        let measured = measure_growth(&start, &end);
        assert!(measured.is_computed());
        assert!(
            measured
                .doubling_time
                .is_some_and(|d| (d - 24.0).abs() < EPS)
        );
        assert!(measured.elapsed_hours.is_some_and(|h| (h - 48.0).abs() < EPS));

        let mut parameters = Parameters::default();
        measured.write_to(&mut parameters);
        assert!(parameters.number(keys::MEASURED_GROWTH_RATE).is_some());
    }

    #[test]
    fn measure_growth_explains_failures() {
        let bare = state_at(1, 0);
        let dense = state_at(2, 24).with_parameter(keys::CELL_DENSITY, json!(10));
        let earlier = state_at(3, -5).with_parameter(keys::CELL_DENSITY, json!(20));
        let sparse = state_at(4, 48).with_parameter(keys::CELL_DENSITY, json!(5));

        assert_eq!(
            measure_growth(&bare, &dense).outcome,
            MeasurementOutcome::MissingStartDensity
        );
        assert_eq!(
            measure_growth(&dense, &bare).outcome,
            MeasurementOutcome::MissingEndDensity
        );
        assert_eq!(
            measure_growth(&dense, &earlier).outcome,
            MeasurementOutcome::EndNotAfterStart
        );
        let declined = measure_growth(&dense, &sparse);
        assert_eq!(declined.outcome, MeasurementOutcome::NoGrowth);
        assert_eq!(declined.doubling_time, None);

        let mut parameters = Parameters::default();
        declined.write_to(&mut parameters);
        assert!(parameters.values.is_empty());
    }
}
