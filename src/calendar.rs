//! The year engine: solar terms and lunar phases for a civil year.
//!
//! [`Calendar`] plans one root task per solar term (all 24 of the requested
//! year, plus the previous year's winter solstice that anchors the month
//! arithmetic) and 18 synodic months × 4 phases of lunar tasks seeded 45
//! days before that solstice, dispatches them through the batch solver, and
//! assembles the converged instants into a [`YearResult`]. Eighteen
//! lunations is the minimum depth that still captures the 13th month of a
//! leap lunar year.
//!
//! Individual task failures are contained: a failed solar term is simply
//! absent from the result (and logged); only the anchor solstice failing is
//! promoted to an error, because nothing downstream can work without it.
//!
//! # Example
//!
//! ```no_run
//! use lunisolar_astro::calendar::Calendar;
//! use lunisolar_astro::ephemeris::SpkEphemeris;
//! use lunisolar_astro::terms::SolarTermCode;
//!
//! let eph = SpkEphemeris::open("de440s.bsp")?;
//! let cal = Calendar::new(&eph);
//! let equinox = cal.find_solar_term(SolarTermCode::Z2, 2025)?;
//! println!("春分 {equinox}");
//! # Ok::<(), lunisolar_astro::error::CalendarError>(())
//! ```

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};

use crate::apparent::ApparentLongitude;
use crate::batch::solve_roots;
use crate::ephemeris::Ephemeris;
use crate::error::{CalendarError, Result};
use crate::math::SYNODIC_MONTH;
use crate::solver::{solve, RootKind, RootTask};
use crate::terms::{LunarPhase, SolarTermCode, ALL_PHASES, ALL_TERMS};
use crate::time::{gregorian_to_jd, LocalDT};
use crate::time_scales::{tdb_to_utc_jd, utc_to_tdb_jd};

/// Lunations probed per year; deep enough for the 13-month case.
const LUNATION_SLOTS: usize = 18;

/// A solved solar term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarTerm {
    pub code: SolarTermCode,
    pub name: &'static str,
    pub datetime: LocalDT,
}

/// The four phase instants of one synodic month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoonPhaseSet {
    pub new_moon: LocalDT,
    pub first_quarter: LocalDT,
    pub full_moon: LocalDT,
    pub last_quarter: LocalDT,
}

/// Solar terms and lunar phase sets of one civil year.
#[derive(Debug, Clone, PartialEq)]
pub struct YearResult {
    pub year: i32,
    /// The terms whose instants fall in the civil year, keyed by code.
    pub solar_terms: BTreeMap<SolarTermCode, SolarTerm>,
    /// Phase sets whose new moon falls in the civil year, in time order.
    pub lunar_phases: Vec<MoonPhaseSet>,
}

/// Per-task bookkeeping for reassembling batch results.
#[derive(Clone, Copy)]
enum TaskMeta {
    Solar { code: SolarTermCode, year: i32 },
    Lunar { phase: LunarPhase, index: usize },
}

/// Lunisolar calendar computation over one ephemeris handle.
pub struct Calendar<'e> {
    eph: &'e dyn Ephemeris,
    engine: ApparentLongitude<'e>,
    term_cache: RefCell<HashMap<(SolarTermCode, i32), LocalDT>>,
}

impl<'e> Calendar<'e> {
    pub fn new(eph: &'e dyn Ephemeris) -> Self {
        Self {
            eph,
            engine: ApparentLongitude::new(eph),
            term_cache: RefCell::new(HashMap::new()),
        }
    }

    /// The ephemeris handle this calendar computes from.
    pub fn ephemeris(&self) -> &'e dyn Ephemeris {
        self.eph
    }

    /// Initial guess for a solar term root: mid-month (late December for
    /// the winter solstice) of the month the term usually falls in.
    fn term_guess_jd_tdb(code: SolarTermCode, year: i32) -> f64 {
        let jd0 = gregorian_to_jd(year, code.guess_month(), code.guess_day(), 0, 0, 0.0);
        utc_to_tdb_jd(jd0)
    }

    fn remember_term(&self, code: SolarTermCode, year: i32, datetime: LocalDT) {
        self.term_cache.borrow_mut().insert((code, year), datetime);
    }

    /// The instant a solar term is reached in a civil year.
    pub fn find_solar_term(&self, code: SolarTermCode, year: i32) -> Result<LocalDT> {
        if let Some(cached) = self.term_cache.borrow().get(&(code, year)) {
            return Ok(*cached);
        }
        let task = RootTask::new(
            RootKind::Solar,
            code.target_longitude(),
            Self::term_guess_jd_tdb(code, year),
        );
        let jd_tdb = solve(&self.engine, &task)?;
        let datetime = LocalDT::from_utc_jd(tdb_to_utc_jd(jd_tdb));
        self.remember_term(code, year, datetime);
        Ok(datetime)
    }

    /// The instant of a lunar phase in the synodic month containing or
    /// starting nearest to `near_jd_tdb`.
    pub fn find_lunar_phase(&self, phase: LunarPhase, near_jd_tdb: f64) -> Result<LocalDT> {
        let task = RootTask::new(RootKind::Lunar, phase.phase_angle(), near_jd_tdb);
        let jd_tdb = solve(&self.engine, &task)?;
        Ok(LocalDT::from_utc_jd(tdb_to_utc_jd(jd_tdb)))
    }

    /// Computes the 24 solar terms and all lunar phase sets of a civil year.
    pub fn compute_year(&self, year: i32) -> Result<YearResult> {
        log::debug!("computing lunisolar year {year}");

        let mut tasks: Vec<RootTask> = Vec::with_capacity(25 + LUNATION_SLOTS * 4);
        let mut metas: Vec<TaskMeta> = Vec::with_capacity(tasks.capacity());

        let push_solar = |tasks: &mut Vec<RootTask>, metas: &mut Vec<TaskMeta>,
                          code: SolarTermCode,
                          target_year: i32| {
            tasks.push(RootTask::new(
                RootKind::Solar,
                code.target_longitude(),
                Self::term_guess_jd_tdb(code, target_year),
            ));
            metas.push(TaskMeta::Solar { code, year: target_year });
        };

        // The previous winter solstice anchors everything downstream.
        push_solar(&mut tasks, &mut metas, SolarTermCode::Z11, year - 1);
        for code in ALL_TERMS {
            push_solar(&mut tasks, &mut metas, code, year);
        }

        // Seed the phase ladder 45 days before the previous solstice.
        let ws_prev_guess = Self::term_guess_jd_tdb(SolarTermCode::Z11, year - 1);
        let jd_anchor = utc_to_tdb_jd(tdb_to_utc_jd(ws_prev_guess) - 45.0);

        for index in 0..LUNATION_SLOTS {
            let base_jd = jd_anchor + index as f64 * SYNODIC_MONTH;
            for phase in ALL_PHASES {
                tasks.push(RootTask::new(
                    RootKind::Lunar,
                    phase.phase_angle(),
                    base_jd + phase.guess_offset_days(),
                ));
                metas.push(TaskMeta::Lunar { phase, index });
            }
        }

        let (roots, errors) = solve_roots(self.eph, &tasks);

        let mut ws_prev_jd: Option<f64> = None;
        let mut solar_terms = BTreeMap::new();
        let mut lunar_roots: HashMap<(LunarPhase, usize), f64> = HashMap::new();

        for (i, meta) in metas.iter().enumerate() {
            if !errors[i].is_empty() {
                log::warn!("root task {i} failed: {}", errors[i]);
                continue;
            }
            let root = roots[i];
            match *meta {
                TaskMeta::Solar { code, year: task_year } => {
                    let datetime = LocalDT::from_utc_jd(tdb_to_utc_jd(root));
                    self.remember_term(code, task_year, datetime);
                    if code == SolarTermCode::Z11 && task_year == year - 1 {
                        ws_prev_jd = Some(root);
                    }
                    if task_year == year {
                        log::debug!("  {} {}: {datetime}", code, code.chinese_name());
                        solar_terms.insert(
                            code,
                            SolarTerm {
                                code,
                                name: code.chinese_name(),
                                datetime,
                            },
                        );
                    }
                }
                TaskMeta::Lunar { phase, index } => {
                    lunar_roots.insert((phase, index), root);
                }
            }
        }

        if ws_prev_jd.is_none() {
            return Err(CalendarError::MissingRoot {
                what: format!("winter solstice of {}", year - 1),
            });
        }

        let year_start = LocalDT::from_local(year, 1, 1, 0, 0, 0.0);
        let year_end = LocalDT::from_local(year + 1, 1, 1, 0, 0, 0.0);

        let mut lunar_phases = Vec::new();
        for index in 0..LUNATION_SLOTS {
            let Some(&new_jd) = lunar_roots.get(&(LunarPhase::NewMoon, index)) else {
                continue;
            };
            let new_moon = LocalDT::from_utc_jd(tdb_to_utc_jd(new_jd));
            if new_moon < year_start {
                continue;
            }
            if new_moon >= year_end && !lunar_phases.is_empty() {
                break;
            }

            let quarter = |phase: LunarPhase| {
                lunar_roots
                    .get(&(phase, index))
                    .map(|&jd| LocalDT::from_utc_jd(tdb_to_utc_jd(jd)))
            };
            let (Some(first_quarter), Some(full_moon), Some(last_quarter)) = (
                quarter(LunarPhase::FirstQuarter),
                quarter(LunarPhase::FullMoon),
                quarter(LunarPhase::LastQuarter),
            ) else {
                log::warn!("incomplete phase set for lunation {index}");
                continue;
            };

            lunar_phases.push(MoonPhaseSet {
                new_moon,
                first_quarter,
                full_moon,
                last_quarter,
            });
        }

        Ok(YearResult {
            year,
            solar_terms,
            lunar_phases,
        })
    }

    /// New moon nearest a guessed instant.
    fn new_moon_near(&self, guess: LocalDT) -> Result<LocalDT> {
        self.find_lunar_phase(LunarPhase::NewMoon, utc_to_tdb_jd(guess.utc_jd()))
    }

    /// The new moon following `new_moon`.
    pub fn next_new_moon(&self, new_moon: LocalDT) -> Result<LocalDT> {
        let guess = utc_to_tdb_jd(new_moon.utc_jd() + SYNODIC_MONTH);
        self.find_lunar_phase(LunarPhase::NewMoon, guess)
    }

    /// The last new moon strictly before `instant`.
    fn new_moon_before(&self, instant: LocalDT) -> Result<LocalDT> {
        let mut guess = instant.shift_days(-SYNODIC_MONTH);
        let mut nm = self.new_moon_near(guess)?;
        while nm >= instant {
            guess = guess.shift_days(-SYNODIC_MONTH);
            nm = self.new_moon_near(guess)?;
        }
        loop {
            let next = self.next_new_moon(nm)?;
            if next <= instant {
                nm = next;
            } else {
                break;
            }
        }
        Ok(nm)
    }

    /// The new moon on or before `instant`, where "on" means the same UTC+8
    /// civil day: a new moon later the same day still opens the month that
    /// contains `instant`.
    pub fn new_moon_on_or_before(&self, instant: LocalDT) -> Result<LocalDT> {
        let nm = self.new_moon_near(instant)?;
        if nm > instant && nm.civil_date() != instant.civil_date() {
            return self.new_moon_before(instant);
        }
        Ok(nm)
    }
}
