//! Lerp engine
//!
//! Moves a target's parameters from their live values to a stored preset
//! over a fixed duration. Progress comes from elapsed clock time, never from
//! frame counts, so a slow or stalled host only makes the next step larger.
//!
//! ```text
//!            begin()                       tick(): raw_t >= 1
//!   Idle ──────────────▶ Active ──tick()──┐ ───────────────────▶ Idle
//!    ▲                     │  ▲───────────┘  (apply pending values)
//!    └─────────────────────┘
//!      cancel() / target gone
//! ```

use crate::easing::Easing;
use crate::error::ParError;
use crate::param::{
    self, is_numeric, BatchResult, ParStyle, ParameterContainer, TargetRef, WeakTarget,
};
use crate::value::{ParValue, PresetData, Sample};
use std::collections::BTreeMap;
use std::rc::Rc;
use tracing::{debug, info, warn};

/// Durations at or below this are loaded instantly.
pub const MIN_LERP_SECONDS: f64 = 0.001;

/// Host-side periodic trigger that calls `tick` while enabled.
pub trait PollTrigger {
    fn set_active(&mut self, active: bool);
}

/// Trigger for hosts that call `update()` every tick regardless.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTrigger;

impl PollTrigger for NoTrigger {
    fn set_active(&mut self, _active: bool) {}
}

/// What `begin` captured.
#[derive(Debug, Clone, PartialEq)]
pub struct LerpPlan {
    pub numeric: usize,
    pub deferred: usize,
    pub skipped: usize,
    pub duration: f64,
}

/// Result of one `tick`.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// No session was active
    Idle,
    /// Values written at eased progress `t`
    Running { t: f64, written: BatchResult },
    /// Target values and pending values applied; the session is over
    Completed {
        written: BatchResult,
        deferred: BatchResult,
    },
    /// Target went away mid-flight; nothing applied
    Cancelled,
}

#[derive(Debug)]
struct LerpSession {
    /// Start and target per interpolated parameter, shapes already matched
    tracks: BTreeMap<String, (Sample, Sample)>,
    pending: PresetData,
    start_time: f64,
    duration: f64,
    target: WeakTarget,
}

impl LerpSession {
    fn progress(&self, now: f64) -> f64 {
        ((now - self.start_time) / self.duration).clamp(0.0, 1.0)
    }
}

/// At most one session; a new `begin` replaces the running one.
pub struct LerpEngine {
    session: Option<LerpSession>,
    trigger: Box<dyn PollTrigger>,
}

impl Default for LerpEngine {
    fn default() -> Self {
        Self::new(NoTrigger)
    }
}

impl std::fmt::Debug for LerpEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LerpEngine")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl LerpEngine {
    pub fn new(trigger: impl PollTrigger + 'static) -> Self {
        Self {
            session: None,
            trigger: Box::new(trigger),
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Raw (uneased) progress of the running session
    #[must_use]
    pub fn progress(&self, now: f64) -> Option<f64> {
        self.session.as_ref().map(|s| s.progress(now))
    }

    /// Names of the parameters being interpolated
    #[must_use]
    pub fn interpolated(&self) -> Vec<&str> {
        self.session
            .as_ref()
            .map(|s| s.tracks.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Names held back until completion
    #[must_use]
    pub fn pending(&self) -> Vec<&str> {
        self.session
            .as_ref()
            .map(|s| s.pending.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Start moving `target` towards `preset`.
    ///
    /// Any running session is cancelled first without reverting, so the
    /// new start values are whatever the target shows right now. Numeric
    /// parameters whose live and stored shapes agree are interpolated;
    /// everything else is applied when the session completes.
    pub fn begin(
        &mut self,
        preset: &PresetData,
        target: &TargetRef,
        duration: f64,
        now: f64,
    ) -> LerpPlan {
        if self.is_active() {
            debug!("Retargeting running lerp");
            self.cancel();
        }

        let mut tracks = BTreeMap::new();
        let mut pending = PresetData::new();
        let mut skipped = 0;

        {
            let container = target.borrow();
            for (name, stored) in preset {
                let Some(par) = container.par(name) else {
                    skipped += 1;
                    continue;
                };

                if !is_numeric(par) {
                    pending.insert(name.clone(), stored.clone());
                    continue;
                }

                let Ok(live) = par.value() else {
                    skipped += 1;
                    continue;
                };

                match (live.sample(), stored.sample()) {
                    (Some(from), Some(to)) if from.same_shape(&to) => {
                        tracks.insert(name.clone(), (from, to));
                    }
                    _ => {
                        pending.insert(name.clone(), stored.clone());
                    }
                }
            }
        }

        let plan = LerpPlan {
            numeric: tracks.len(),
            deferred: pending.len(),
            skipped,
            duration,
        };

        self.session = Some(LerpSession {
            tracks,
            pending,
            start_time: now,
            duration: duration.max(MIN_LERP_SECONDS),
            target: Rc::downgrade(target),
        });
        self.trigger.set_active(true);
        plan
    }

    /// Advance the running session to `now`.
    pub fn tick(&mut self, now: f64, easing: Easing) -> TickOutcome {
        let Some(session) = self.session.as_ref() else {
            return TickOutcome::Idle;
        };

        let Some(target) = session.target.upgrade().filter(|t| t.borrow().is_alive()) else {
            warn!("Target OP became invalid during lerp, cancelling");
            self.cancel();
            return TickOutcome::Cancelled;
        };

        let raw_t = session.progress(now);
        let done = raw_t >= 1.0;
        let t = if done { 1.0 } else { easing.apply(raw_t) };

        let written = {
            let mut container = target.borrow_mut();
            write_samples(&mut *container, session, t)
        };
        if written.error_count() > 0 {
            debug!("Lerp step at t={:.3}: {} errors", t, written.error_count());
        }

        if !done {
            return TickOutcome::Running { t, written };
        }

        let deferred = {
            let mut container = target.borrow_mut();
            param::apply_batch(&mut *container, &session.pending)
        };
        if deferred.error_count() > 0 {
            warn!(
                "Applied {} non-numeric parameters, {} errors",
                deferred.success_count(),
                deferred.error_count()
            );
        }

        self.cancel();
        info!("Lerp completed");
        TickOutcome::Completed { written, deferred }
    }

    /// Drop the running session without applying anything.
    pub fn cancel(&mut self) {
        if self.session.take().is_some() {
            self.trigger.set_active(false);
        }
    }
}

fn write_samples(
    container: &mut dyn ParameterContainer,
    session: &LerpSession,
    t: f64,
) -> BatchResult {
    let mut result = BatchResult::default();

    for (name, (from, to)) in &session.tracks {
        let Some(par) = container.par_mut(name) else {
            result.fail(name.as_str(), ParError::NotFound(name.clone()));
            continue;
        };
        let Some(sample) = from.lerp(to, t) else {
            continue;
        };

        let value = match sample {
            Sample::Scalar(v) if par.style() == ParStyle::Int => ParValue::Int(v.round() as i64),
            sample => ParValue::from(sample),
        };

        result.record(name, par.set_value(value));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryContainer, MemoryParameter, MemoryTrigger};
    use std::cell::RefCell;

    fn preset() -> PresetData {
        let mut data = PresetData::new();
        data.insert("Tx".into(), ParValue::Float(10.0));
        data.insert("Count".into(), ParValue::Int(10));
        data.insert("Color".into(), ParValue::from(vec![1.0, 1.0, 1.0]));
        data.insert("Mode".into(), ParValue::from("multiply"));
        data
    }

    fn target() -> (Rc<RefCell<MemoryContainer>>, TargetRef) {
        MemoryContainer::new()
            .with(MemoryParameter::new("Tx", ParStyle::Float, 0.0))
            .with(MemoryParameter::new("Count", ParStyle::Int, 0_i64))
            .with(MemoryParameter::new("Color", ParStyle::Rgb, vec![0.0, 0.0, 0.0]))
            .with(MemoryParameter::new("Mode", ParStyle::Menu, "add"))
            .into_shared()
    }

    #[test]
    fn test_begin_splits_numeric_and_pending() {
        let (_, target) = target();
        let mut engine = LerpEngine::default();
        let plan = engine.begin(&preset(), &target, 1.0, 0.0);

        assert_eq!(plan.numeric, 3);
        assert_eq!(plan.deferred, 1);
        assert_eq!(engine.interpolated(), vec!["Color", "Count", "Tx"]);
        assert_eq!(engine.pending(), vec!["Mode"]);
        assert!(engine.is_active());
    }

    #[test]
    fn test_tick_at_start_keeps_start_values() {
        let (live, target) = target();
        let mut engine = LerpEngine::default();
        engine.begin(&preset(), &target, 1.0, 5.0);

        let outcome = engine.tick(5.0, Easing::Linear);
        assert!(matches!(outcome, TickOutcome::Running { t, .. } if t == 0.0));

        let live = live.borrow();
        assert_eq!(live.get("Tx"), Some(ParValue::Float(0.0)));
        assert_eq!(live.get("Count"), Some(ParValue::Int(0)));
        assert_eq!(live.get("Mode"), Some(ParValue::from("add")));
    }

    #[test]
    fn test_tick_midway_interpolates_and_rounds_ints() {
        let (live, target) = target();
        let mut engine = LerpEngine::default();
        engine.begin(&preset(), &target, 2.0, 0.0);
        engine.tick(0.5, Easing::Linear);

        let live = live.borrow();
        assert_eq!(live.get("Tx"), Some(ParValue::Float(2.5)));
        assert_eq!(live.get("Count"), Some(ParValue::Int(3)));
        assert_eq!(live.get("Color"), Some(ParValue::from(vec![0.25, 0.25, 0.25])));
        // Non-numeric values wait for completion
        assert_eq!(live.get("Mode"), Some(ParValue::from("add")));
    }

    #[test]
    fn test_easing_shapes_progress() {
        let (live, target) = target();
        let mut engine = LerpEngine::default();
        engine.begin(&preset(), &target, 1.0, 0.0);
        engine.tick(0.5, Easing::EaseInQuad);
        assert_eq!(live.borrow().get("Tx"), Some(ParValue::Float(2.5)));
    }

    #[test]
    fn test_completion_writes_targets_exactly_and_applies_pending() {
        let (live, target) = target();
        let trigger = MemoryTrigger::new();
        let mut engine = LerpEngine::new(trigger.clone());
        engine.begin(&preset(), &target, 1.0, 0.0);
        assert!(trigger.is_active());

        let (written, deferred) = match engine.tick(3.0, Easing::EaseInSine) {
            TickOutcome::Completed { written, deferred } => (written, deferred),
            other => panic!("expected completion, got {other:?}"),
        };
        assert_eq!(written.success_count(), 3);
        assert_eq!(deferred.success_count(), 1);

        let live = live.borrow();
        assert_eq!(live.get("Tx"), Some(ParValue::Float(10.0)));
        assert_eq!(live.get("Count"), Some(ParValue::Int(10)));
        assert_eq!(live.get("Color"), Some(ParValue::from(vec![1.0, 1.0, 1.0])));
        assert_eq!(live.get("Mode"), Some(ParValue::from("multiply")));

        assert!(!engine.is_active());
        assert!(!trigger.is_active());
        assert_eq!(engine.tick(4.0, Easing::Linear), TickOutcome::Idle);
    }

    #[test]
    fn test_retarget_starts_from_live_values() {
        let (live, target) = target();
        let mut engine = LerpEngine::default();
        engine.begin(&preset(), &target, 1.0, 0.0);
        engine.tick(0.5, Easing::Linear);
        assert_eq!(live.borrow().get("Tx"), Some(ParValue::Float(5.0)));

        let mut back = PresetData::new();
        back.insert("Tx".into(), ParValue::Float(0.0));
        engine.begin(&back, &target, 1.0, 0.5);

        engine.tick(0.5, Easing::Linear);
        assert_eq!(live.borrow().get("Tx"), Some(ParValue::Float(5.0)));
        engine.tick(1.0, Easing::Linear);
        assert_eq!(live.borrow().get("Tx"), Some(ParValue::Float(2.5)));
        // The cancelled session's pending values are never applied
        assert_eq!(engine.pending(), Vec::<&str>::new());
        engine.tick(2.0, Easing::Linear);
        assert_eq!(live.borrow().get("Mode"), Some(ParValue::from("add")));
    }

    #[test]
    fn test_shape_mismatch_is_deferred() {
        let (live, target) = target();
        let mut data = PresetData::new();
        data.insert("Color".into(), ParValue::from(vec![1.0, 1.0]));
        data.insert("Tx".into(), ParValue::from("7.5"));

        let mut engine = LerpEngine::default();
        let plan = engine.begin(&data, &target, 1.0, 0.0);
        assert_eq!(plan.numeric, 0);
        assert_eq!(plan.deferred, 2);

        engine.tick(1.0, Easing::Linear);
        assert_eq!(live.borrow().get("Tx"), Some(ParValue::Float(7.5)));
    }

    #[test]
    fn test_missing_parameters_are_skipped() {
        let (_, target) = target();
        let mut data = preset();
        data.insert("Nope".into(), ParValue::Float(1.0));

        let mut engine = LerpEngine::default();
        let plan = engine.begin(&data, &target, 1.0, 0.0);
        assert_eq!(plan.skipped, 1);
        assert_eq!(plan.numeric, 3);
    }

    #[test]
    fn test_failed_parameter_does_not_stop_the_tick() {
        let (live, target) = target();
        let mut engine = LerpEngine::default();
        engine.begin(&preset(), &target, 2.0, 0.0);
        engine.tick(0.5, Easing::Linear);

        assert!(live.borrow_mut().remove("Count").is_some());
        let written = match engine.tick(1.0, Easing::Linear) {
            TickOutcome::Running { written, .. } => written,
            other => panic!("expected a running lerp, got {other:?}"),
        };
        assert_eq!(written.error_count(), 1);
        assert_eq!(written.errors[0].0, "Count");
        assert!(matches!(written.errors[0].1, ParError::NotFound(_)));
        assert_eq!(written.applied, vec!["Color".to_string(), "Tx".to_string()]);

        let live = live.borrow();
        assert_eq!(live.get("Tx"), Some(ParValue::Float(5.0)));
        assert_eq!(live.get("Color"), Some(ParValue::from(vec![0.5, 0.5, 0.5])));
        assert!(engine.is_active());
    }

    #[test]
    fn test_rejected_write_is_counted() {
        let (live, target) = MemoryContainer::new()
            .with(MemoryParameter::new("Tx", ParStyle::Float, 0.0))
            .with(MemoryParameter::new("Level", ParStyle::Float, 0.0))
            .into_shared();
        let mut data = PresetData::new();
        data.insert("Tx".into(), ParValue::Float(4.0));
        data.insert("Level".into(), ParValue::Float(1.0));

        let mut engine = LerpEngine::default();
        assert_eq!(engine.begin(&data, &target, 1.0, 0.0).numeric, 2);

        // The host turned Level into a toggle that refuses floats
        live.borrow_mut()
            .insert(MemoryParameter::new("Level", ParStyle::Toggle, false).strict());
        let written = match engine.tick(0.5, Easing::Linear) {
            TickOutcome::Running { written, .. } => written,
            other => panic!("expected a running lerp, got {other:?}"),
        };
        assert_eq!(written.applied, vec!["Tx".to_string()]);
        assert_eq!(written.error_count(), 1);
        assert!(matches!(written.errors[0].1, ParError::Write { .. }));
        assert_eq!(live.borrow().get("Tx"), Some(ParValue::Float(2.0)));
    }

    #[test]
    fn test_dead_target_cancels() {
        let (live, target) = target();
        let trigger = MemoryTrigger::new();
        let mut engine = LerpEngine::new(trigger.clone());
        engine.begin(&preset(), &target, 1.0, 0.0);

        live.borrow_mut().kill();
        assert_eq!(engine.tick(0.5, Easing::Linear), TickOutcome::Cancelled);
        assert!(!engine.is_active());
        assert!(!trigger.is_active());
        assert_eq!(live.borrow().get("Tx"), Some(ParValue::Float(0.0)));
    }

    #[test]
    fn test_dropped_target_cancels() {
        let (live, target) = target();
        let mut engine = LerpEngine::default();
        engine.begin(&preset(), &target, 1.0, 0.0);

        drop(target);
        drop(live);
        assert_eq!(engine.tick(0.5, Easing::Linear), TickOutcome::Cancelled);
    }

    #[test]
    fn test_cancel_applies_nothing() {
        let (live, target) = target();
        let trigger = MemoryTrigger::new();
        let mut engine = LerpEngine::new(trigger.clone());
        engine.begin(&preset(), &target, 1.0, 0.0);
        engine.cancel();

        assert!(!engine.is_active());
        assert!(!trigger.is_active());
        assert_eq!(trigger.switches(), 2);
        assert_eq!(live.borrow().get("Mode"), Some(ParValue::from("add")));
        // Cancelling while idle does not touch the trigger
        engine.cancel();
        assert_eq!(trigger.switches(), 2);
    }

    #[test]
    fn test_stalled_host_jumps_without_backlog() {
        let (live, target) = target();
        let mut engine = LerpEngine::default();
        engine.begin(&preset(), &target, 4.0, 0.0);
        engine.tick(0.1, Easing::Linear);
        engine.tick(3.0, Easing::Linear);
        assert_eq!(live.borrow().get("Tx"), Some(ParValue::Float(7.5)));
        assert_eq!(engine.progress(3.0), Some(0.75));
    }

    #[test]
    fn test_clock_going_backwards_clamps_to_start() {
        let (live, target) = target();
        let mut engine = LerpEngine::default();
        engine.begin(&preset(), &target, 1.0, 10.0);
        engine.tick(9.0, Easing::Linear);
        assert_eq!(live.borrow().get("Tx"), Some(ParValue::Float(0.0)));
    }
}
