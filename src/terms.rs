//! The 24 solar terms and 4 principal lunar phases.
//!
//! Solar terms (节气) partition the tropical year into 24 equal arcs of
//! apparent solar longitude, π/12 apart. Codes follow the traditional
//! numbering: `Z` terms are the principal terms (中气, longitude a multiple
//! of π/6, counted from 雨水 = Z1), `J` terms the sectional terms (节气,
//! offset π/12, from 立春 = J1). The winter solstice `Z11` anchors the
//! lunisolar month arithmetic.
//!
//! # Example
//!
//! ```
//! use lunisolar_astro::terms::SolarTermCode;
//!
//! let code: SolarTermCode = "Z2".parse().unwrap();
//! assert_eq!(code.chinese_name(), "春分");
//! assert_eq!(code.target_longitude(), 0.0);
//! ```

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::error::CalendarError;

/// Codes of the 24 solar terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SolarTermCode {
    J1, Z1, J2, Z2, J3, Z3, J4, Z4, J5, Z5, J6, Z6,
    J7, Z7, J8, Z8, J9, Z9, J10, Z10, J11, Z11, J12, Z12,
}

use SolarTermCode::*;

/// All 24 codes in seasonal order starting from 小寒 (J12), the first term
/// of the civil year.
pub const ALL_TERMS: [SolarTermCode; 24] = [
    J12, Z12, J1, Z1, J2, Z2, J3, Z3, J4, Z4, J5, Z5,
    J6, Z6, J7, Z7, J8, Z8, J9, Z9, J10, Z10, J11, Z11,
];

/// The 12 principal (Z) terms in the same seasonal order.
pub const PRINCIPAL_TERMS: [SolarTermCode; 12] =
    [Z12, Z1, Z2, Z3, Z4, Z5, Z6, Z7, Z8, Z9, Z10, Z11];

impl SolarTermCode {
    /// Target apparent solar longitude, radians in `(-π, π]`, with the
    /// vernal equinox (Z2) at zero.
    pub fn target_longitude(self) -> f64 {
        const STEP: f64 = PI / 12.0;
        let k = match self {
            Z2 => 0, J3 => 1, Z3 => 2, J4 => 3, Z4 => 4, J5 => 5,
            Z5 => 6, J6 => 7, Z6 => 8, J7 => 9, Z7 => 10, J8 => 11,
            Z8 => 12, J9 => -11, Z9 => -10, J10 => -9, Z10 => -8, J11 => -7,
            Z11 => -6, J12 => -5, Z12 => -4, J1 => -3, Z1 => -2, J2 => -1,
        };
        k as f64 * STEP
    }

    /// Traditional Chinese name.
    pub const fn chinese_name(self) -> &'static str {
        match self {
            J1 => "立春", Z1 => "雨水", J2 => "惊蛰", Z2 => "春分",
            J3 => "清明", Z3 => "谷雨", J4 => "立夏", Z4 => "小满",
            J5 => "芒种", Z5 => "夏至", J6 => "小暑", Z6 => "大暑",
            J7 => "立秋", Z7 => "处暑", J8 => "白露", Z8 => "秋分",
            J9 => "寒露", Z9 => "霜降", J10 => "立冬", Z10 => "小雪",
            J11 => "大雪", Z11 => "冬至", J12 => "小寒", Z12 => "大寒",
        }
    }

    /// Civil month (UTC+8) in which the term usually falls, for the
    /// solver's initial guess.
    pub const fn guess_month(self) -> u32 {
        match self {
            Z11 => 12, J12 => 1, Z12 => 1, J1 => 2, Z1 => 2, J2 => 3,
            Z2 => 3, J3 => 4, Z3 => 4, J4 => 5, Z4 => 5, J5 => 6,
            Z5 => 6, J6 => 7, Z6 => 7, J7 => 8, Z7 => 8, J8 => 9,
            Z8 => 9, J9 => 10, Z9 => 10, J10 => 11, Z10 => 11, J11 => 12,
        }
    }

    /// Guess day of month; the winter solstice sits late in December,
    /// everything else near mid-month.
    pub const fn guess_day(self) -> u32 {
        match self {
            Z11 => 22,
            _ => 15,
        }
    }

    /// True for principal (Z / 中气) terms.
    pub const fn is_principal(self) -> bool {
        matches!(self, Z1 | Z2 | Z3 | Z4 | Z5 | Z6 | Z7 | Z8 | Z9 | Z10 | Z11 | Z12)
    }

    /// The short code, e.g. `"Z11"`.
    pub const fn as_str(self) -> &'static str {
        match self {
            J1 => "J1", Z1 => "Z1", J2 => "J2", Z2 => "Z2",
            J3 => "J3", Z3 => "Z3", J4 => "J4", Z4 => "Z4",
            J5 => "J5", Z5 => "Z5", J6 => "J6", Z6 => "Z6",
            J7 => "J7", Z7 => "Z7", J8 => "J8", Z8 => "Z8",
            J9 => "J9", Z9 => "Z9", J10 => "J10", Z10 => "Z10",
            J11 => "J11", Z11 => "Z11", J12 => "J12", Z12 => "Z12",
        }
    }
}

impl fmt::Display for SolarTermCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SolarTermCode {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_TERMS
            .into_iter()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| CalendarError::UnknownCode { code: s.to_string() })
    }
}

/// The four principal phases of a synodic month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LunarPhase {
    NewMoon,
    FirstQuarter,
    FullMoon,
    LastQuarter,
}

/// The four phases in synodic order.
pub const ALL_PHASES: [LunarPhase; 4] = [
    LunarPhase::NewMoon,
    LunarPhase::FirstQuarter,
    LunarPhase::FullMoon,
    LunarPhase::LastQuarter,
];

impl LunarPhase {
    /// Target Moon−Sun elongation, radians in `(-π, π]`.
    pub fn phase_angle(self) -> f64 {
        match self {
            Self::NewMoon => 0.0,
            Self::FirstQuarter => PI / 2.0,
            Self::FullMoon => PI,
            Self::LastQuarter => -PI / 2.0,
        }
    }

    /// Days past the new moon where this phase usually falls, for the
    /// solver's initial guess.
    pub fn guess_offset_days(self) -> f64 {
        match self {
            Self::NewMoon => 0.0,
            Self::FirstQuarter => 7.0,
            Self::FullMoon => 15.0,
            Self::LastQuarter => 22.0,
        }
    }

    /// Traditional Chinese name.
    pub const fn chinese_name(self) -> &'static str {
        match self {
            Self::NewMoon => "朔",
            Self::FirstQuarter => "上弦",
            Self::FullMoon => "望",
            Self::LastQuarter => "下弦",
        }
    }

    /// The snake_case key, e.g. `"new_moon"`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NewMoon => "new_moon",
            Self::FirstQuarter => "fst_qtr",
            Self::FullMoon => "full_moon",
            Self::LastQuarter => "lst_qtr",
        }
    }
}

impl fmt::Display for LunarPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LunarPhase {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_PHASES
            .into_iter()
            .find(|phase| phase.as_str() == s)
            .ok_or_else(|| CalendarError::UnknownCode { code: s.to_string() })
    }
}

/// Chinese lunar month labels, index 1..=12.
pub const MONTH_LABELS: [&str; 12] = [
    "正月", "二月", "三月", "四月", "五月", "六月",
    "七月", "八月", "九月", "十月", "十一月", "腊月",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::wrap_angle;

    #[test]
    fn twenty_four_distinct_codes_and_longitudes() {
        for (i, a) in ALL_TERMS.iter().enumerate() {
            for b in ALL_TERMS.iter().skip(i + 1) {
                assert_ne!(a, b);
                assert_ne!(a.target_longitude(), b.target_longitude());
            }
        }
    }

    #[test]
    fn terms_are_fifteen_degrees_apart_in_seasonal_order() {
        let step = PI / 12.0;
        for pair in ALL_TERMS.windows(2) {
            let gap = wrap_angle(pair[1].target_longitude() - pair[0].target_longitude());
            assert!((gap - step).abs() < 1e-15, "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn principal_terms_are_the_z_half() {
        assert_eq!(ALL_TERMS.iter().filter(|c| c.is_principal()).count(), 12);
        for code in PRINCIPAL_TERMS {
            assert!(code.is_principal());
            // Principal longitudes are multiples of 30°.
            let ratio = code.target_longitude() / (PI / 6.0);
            assert!((ratio - ratio.round()).abs() < 1e-12);
        }
    }

    #[test]
    fn code_string_roundtrip() {
        for code in ALL_TERMS {
            assert_eq!(code.as_str().parse::<SolarTermCode>().unwrap(), code);
        }
        assert!(matches!(
            "Z13".parse::<SolarTermCode>(),
            Err(CalendarError::UnknownCode { .. })
        ));
    }

    #[test]
    fn phase_key_roundtrip() {
        for phase in ALL_PHASES {
            assert_eq!(phase.as_str().parse::<LunarPhase>().unwrap(), phase);
        }
        assert!("third_qtr".parse::<LunarPhase>().is_err());
    }

    #[test]
    fn vernal_equinox_is_zero() {
        assert_eq!(SolarTermCode::Z2.target_longitude(), 0.0);
        assert_eq!(SolarTermCode::Z11.target_longitude(), -PI / 2.0);
        assert_eq!(SolarTermCode::Z8.target_longitude(), PI);
    }
}
