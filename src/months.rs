//! Lunar month enumeration and the no-principal-term intercalation rule.
//!
//! A lunar year runs from the month containing the previous winter solstice
//! (month eleven, by definition) up to the month before the one containing
//! the next. Between two solstices there are twelve or thirteen new moons;
//! in a thirteen-moon year the first month whose civil-day interval holds
//! no principal term (中气) is the leap month and repeats its predecessor's
//! number, the rule in continuous use since the 1645 時憲曆 reform.
//!
//! Month membership of a principal term is decided by UTC+8 civil day, and
//! a term falling on the same civil day as the month's *end* boundary
//! belongs to the next month, matching almanac practice.
//!
//! # Example
//!
//! ```no_run
//! use lunisolar_astro::calendar::Calendar;
//! use lunisolar_astro::ephemeris::SpkEphemeris;
//!
//! let eph = SpkEphemeris::open("de440s.bsp")?;
//! let cal = Calendar::new(&eph);
//! for month in cal.civil_year_months(2025)? {
//!     println!("{} {}", month.label, month.start);
//! }
//! # Ok::<(), lunisolar_astro::error::CalendarError>(())
//! ```

use crate::calendar::Calendar;
use crate::error::{CalendarError, Result};
use crate::math::JD_EPSILON;
use crate::terms::{SolarTermCode, MONTH_LABELS, PRINCIPAL_TERMS};
use crate::time::LocalDT;

/// One lunar month: a half-open interval between consecutive new moons.
#[derive(Debug, Clone, PartialEq)]
pub struct LunarMonth {
    /// The opening new moon (UTC+8).
    pub start: LocalDT,
    /// The next new moon; equals the following month's `start`.
    pub end: LocalDT,
    /// Month number 1..=12; a leap month repeats its predecessor's.
    pub number: u32,
    pub is_leap: bool,
    /// Chinese label, e.g. `二月` or `闰二月`.
    pub label: String,
}

impl Calendar<'_> {
    /// The 36 principal-term instants of `year − 1 ..= year + 1`, time
    /// sorted. Terms that fail to solve are skipped (the coverage test
    /// degrades, the sweep does not abort).
    fn principal_terms_sorted(&self, year: i32) -> Vec<(LocalDT, SolarTermCode)> {
        let mut instants = Vec::with_capacity(36);
        for y in (year - 1)..=(year + 1) {
            for code in PRINCIPAL_TERMS {
                match self.find_solar_term(code, y) {
                    Ok(datetime) => instants.push((datetime, code)),
                    Err(e) => log::warn!("principal term {code} of {y} unsolved: {e}"),
                }
            }
        }
        instants.sort_by(|a, b| a.0.utc_jd().total_cmp(&b.0.utc_jd()));
        instants
    }

    /// Whether the month `[start, end)` contains a principal term, counting
    /// by UTC+8 civil day. A term on the start's civil day counts even if
    /// it precedes the new moon instant; one on the end's civil day is the
    /// next month's.
    pub(crate) fn interval_contains_principal(
        terms: &[(LocalDT, SolarTermCode)],
        start: &LocalDT,
        end: &LocalDT,
    ) -> bool {
        let start_day_jd = start.start_of_civil_day().utc_jd();
        let end_jd = end.utc_jd();
        let end_date = end.civil_date();

        let from = terms.partition_point(|(dt, _)| dt.utc_jd() < start_day_jd);
        for (dt, _) in &terms[from..] {
            if dt.utc_jd() >= end_jd {
                break;
            }
            if dt.civil_date() == end_date {
                continue;
            }
            return true;
        }
        false
    }

    /// The new moons bounding the lunar year anchored on the winter
    /// solstices of `year − 1` and `year`, first and last inclusive.
    fn enumerate_new_moons(&self, year: i32) -> Result<Vec<LocalDT>> {
        let w_prev = self.find_solar_term(SolarTermCode::Z11, year - 1)?;
        let w_curr = self.find_solar_term(SolarTermCode::Z11, year)?;

        let first = self.new_moon_on_or_before(w_prev)?;
        let bound = self.new_moon_on_or_before(w_curr)?;
        let bound_jd = bound.utc_jd();

        let mut new_moons = vec![first];
        let mut last = first;
        loop {
            let next = self.next_new_moon(last)?;
            let next_jd = next.utc_jd();
            if next_jd > bound_jd + JD_EPSILON {
                break;
            }
            last = if (next_jd - bound_jd).abs() <= JD_EPSILON {
                bound
            } else {
                next
            };
            new_moons.push(last);
        }

        if new_moons.len() < 2 {
            return Err(CalendarError::SparseNewMoonList {
                year,
                count: new_moons.len().saturating_sub(1),
            });
        }

        // Cross-check the count against the mean synodic estimate.
        let span_days = bound.utc_jd() - first.utc_jd();
        let approx = (span_days / 29.53).round() as i64;
        let count = (new_moons.len() - 1) as i64;
        if (count - approx).abs() > 1 {
            return Err(CalendarError::SparseNewMoonList {
                year,
                count: count as usize,
            });
        }

        Ok(new_moons)
    }

    /// The months of the lunar year anchored on the solstice pair of
    /// `year − 1` and `year`: twelve or thirteen entries starting with
    /// month eleven.
    pub fn lunar_year_months(&self, year: i32) -> Result<Vec<LunarMonth>> {
        let new_moons = self.enumerate_new_moons(year)?;
        let count = new_moons.len() - 1;

        let terms = self.principal_terms_sorted(year);
        let has_principal: Vec<bool> = new_moons
            .windows(2)
            .map(|pair| Self::interval_contains_principal(&terms, &pair[0], &pair[1]))
            .collect();

        let leap_index = match count {
            12 => None,
            13 => {
                let idx = has_principal.iter().position(|&has| !has);
                match idx {
                    Some(idx) => Some(idx),
                    None => return Err(CalendarError::LeapNotFound { year }),
                }
            }
            _ => {
                return Err(CalendarError::SparseNewMoonList { year, count });
            }
        };

        // Number the months: eleven first, leap repeats its predecessor.
        let mut numbers = Vec::with_capacity(count);
        let mut next_number = 11u32;
        for idx in 0..count {
            if leap_index == Some(idx) {
                let inherited = if idx == 0 { next_number } else { numbers[idx - 1] };
                numbers.push(inherited);
            } else {
                numbers.push(next_number);
                next_number = if next_number == 12 { 1 } else { next_number + 1 };
            }
        }

        let months = new_moons
            .windows(2)
            .enumerate()
            .map(|(idx, pair)| {
                let is_leap = leap_index == Some(idx);
                let number = numbers[idx];
                let base = MONTH_LABELS[(number - 1) as usize];
                let label = if is_leap { format!("闰{base}") } else { base.to_string() };
                LunarMonth {
                    start: pair[0],
                    end: pair[1],
                    number,
                    is_leap,
                    label,
                }
            })
            .collect();

        Ok(months)
    }

    /// The lunar months whose opening new moon falls in civil year `year`
    /// (UTC+8), in time order.
    pub fn civil_year_months(&self, year: i32) -> Result<Vec<LunarMonth>> {
        let mut span = self.lunar_year_months(year)?;
        span.extend(self.lunar_year_months(year + 1)?);

        span.sort_by(|a, b| a.start.utc_jd().total_cmp(&b.start.utc_jd()));
        span.dedup_by_key(|m| m.start.utc_jd().to_bits());
        span.retain(|m| m.start.year == year);
        Ok(span)
    }
}
