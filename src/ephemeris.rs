//! Ephemeris access: the body set, the accessor trait, and the SPK adapter.
//!
//! The calendar core never reads kernel files itself. It consumes
//! positions and velocities through the [`Ephemeris`] trait, in AU and
//! AU/day, in the J2000 equatorial inertial frame, geometric (no light-time
//! or aberration applied; that is the caller's job). [`SpkEphemeris`] is the
//! production implementation, backed by an ANISE [`Almanac`] reading a JPL
//! SPK kernel such as `de440s.bsp`.
//!
//! # Example
//!
//! ```no_run
//! use lunisolar_astro::ephemeris::{Body, Ephemeris, SpkEphemeris};
//!
//! let eph = SpkEphemeris::open("de440s.bsp")?;
//! let pos = eph.position(Body::Moon, Body::Earth, 2460000.5)?;
//! println!("geocentric moon at {:.6} AU", pos.norm());
//! # Ok::<(), lunisolar_astro::error::CalendarError>(())
//! ```

use std::path::{Path, PathBuf};

use anise::constants::frames::{
    EARTH_J2000, EARTH_MOON_BARYCENTER_J2000, MOON_J2000, SSB_J2000, SUN_J2000,
};
use anise::prelude::{Aberration, Almanac, Epoch, Frame, SPK};

use crate::error::{CalendarError, Result};
use crate::math::{Vec3, AU_KM, SEC_DAY};

/// The bodies the calendar core queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Body {
    SolarSystemBarycenter,
    Sun,
    EarthMoonBarycenter,
    Earth,
    Moon,
}

impl Body {
    /// NAIF body code.
    pub const fn naif_id(self) -> i32 {
        match self {
            Self::SolarSystemBarycenter => 0,
            Self::Sun => 10,
            Self::EarthMoonBarycenter => 3,
            Self::Earth => 399,
            Self::Moon => 301,
        }
    }

    /// Convert a NAIF body code into a [`Body`].
    pub const fn from_naif_id(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::SolarSystemBarycenter),
            10 => Some(Self::Sun),
            3 => Some(Self::EarthMoonBarycenter),
            399 => Some(Self::Earth),
            301 => Some(Self::Moon),
            _ => None,
        }
    }

    /// The J2000-oriented ANISE frame centered on this body.
    const fn frame(self) -> Frame {
        match self {
            Self::SolarSystemBarycenter => SSB_J2000,
            Self::Sun => SUN_J2000,
            Self::EarthMoonBarycenter => EARTH_MOON_BARYCENTER_J2000,
            Self::Earth => EARTH_J2000,
            Self::Moon => MOON_J2000,
        }
    }
}

/// Geometric state source in the J2000 inertial frame.
///
/// Implementations must be shareable across the batch orchestrator's worker
/// threads, hence the `Send + Sync` bound; all methods take `&self`.
pub trait Ephemeris: Send + Sync {
    /// Position and velocity of `target` relative to `observer` at a TDB
    /// Julian Date, in AU and AU/day.
    fn state(&self, target: Body, observer: Body, jd_tdb: f64) -> Result<(Vec3, Vec3)>;

    /// Position of `target` relative to `observer`, in AU.
    fn position(&self, target: Body, observer: Body, jd_tdb: f64) -> Result<Vec3> {
        Ok(self.state(target, observer, jd_tdb)?.0)
    }

    /// Velocity of `target` relative to `observer`, in AU/day.
    fn velocity(&self, target: Body, observer: Body, jd_tdb: f64) -> Result<Vec3> {
        Ok(self.state(target, observer, jd_tdb)?.1)
    }
}

/// SPK-kernel ephemeris backed by an ANISE [`Almanac`].
///
/// Construction validates that the file exists, is non-empty, and parses as
/// a kernel; coverage holes for a particular epoch surface later as
/// [`CalendarError::EphemerisUnavailable`] from the query itself.
pub struct SpkEphemeris {
    almanac: Almanac,
    path: PathBuf,
}

impl SpkEphemeris {
    /// Opens and validates an SPK kernel.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(CalendarError::InvalidInput {
                reason: "ephemeris path is empty".into(),
            });
        }
        let meta = std::fs::metadata(path).map_err(|e| CalendarError::EphemerisUnavailable {
            reason: format!("ephemeris file {}: {e}", path.display()),
        })?;
        if meta.len() == 0 {
            return Err(CalendarError::EphemerisUnavailable {
                reason: format!("ephemeris file {} is empty", path.display()),
            });
        }

        let path_str = path.to_str().ok_or_else(|| CalendarError::InvalidInput {
            reason: format!("ephemeris path {} is not valid UTF-8", path.display()),
        })?;
        let spk = SPK::load(path_str).map_err(|e| CalendarError::EphemerisUnavailable {
            reason: format!("failed to load kernel {}: {e}", path.display()),
        })?;
        let almanac =
            Almanac::from_spk(spk).map_err(|e| CalendarError::EphemerisUnavailable {
                reason: format!("failed to index kernel {}: {e}", path.display()),
            })?;

        Ok(Self {
            almanac,
            path: path.to_path_buf(),
        })
    }

    /// Path the kernel was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Ephemeris for SpkEphemeris {
    fn state(&self, target: Body, observer: Body, jd_tdb: f64) -> Result<(Vec3, Vec3)> {
        if target == observer {
            return Err(CalendarError::InvalidInput {
                reason: "target and observer must differ".into(),
            });
        }
        if !jd_tdb.is_finite() {
            return Err(CalendarError::InvalidInput {
                reason: format!("epoch JD {jd_tdb} is not finite"),
            });
        }

        let epoch = Epoch::from_jde_et(jd_tdb);
        let state = self
            .almanac
            .translate(target.frame(), observer.frame(), epoch, Aberration::NONE)
            .map_err(|e| CalendarError::EphemerisUnavailable {
                reason: format!(
                    "kernel {} query target {} observer {} at JD {jd_tdb}: {e}",
                    self.path.display(),
                    target.naif_id(),
                    observer.naif_id()
                ),
            })?;

        let pos = Vec3::new(
            state.radius_km[0] / AU_KM,
            state.radius_km[1] / AU_KM,
            state.radius_km[2] / AU_KM,
        );
        let vel = Vec3::new(
            state.velocity_km_s[0] * (SEC_DAY / AU_KM),
            state.velocity_km_s[1] * (SEC_DAY / AU_KM),
            state.velocity_km_s[2] * (SEC_DAY / AU_KM),
        );
        Ok((pos, vel))
    }
}
