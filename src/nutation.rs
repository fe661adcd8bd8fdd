//! Mean obliquity and nutation of the ecliptic.
//!
//! Nutation consists of two components:
//! - **Nutation in longitude** (Δψ): the equinox wobble along the ecliptic
//! - **Nutation in obliquity** (Δε): the wobble of the ecliptic tilt
//!
//! The series here is the truncated luni-solar expansion over the five
//! fundamental arguments (l, l′, F, D, Ω) with the thirteen largest IAU
//! terms, dominated by the 18.6-year node term (±17.2″ in longitude) and
//! the semi-annual 2F−2D+2Ω term. Truncation error stays below a few
//! hundredths of an arcsecond, which keeps solved solar-term instants
//! within about a second of the full series.
//!
//! All angles in and out are **radians**; this module feeds rotation
//! matrices, not display code.
//!
//! # Example
//!
//! ```
//! use lunisolar_astro::nutation::{nutation, mean_obliquity};
//!
//! let jd = 2451545.0; // J2000.0
//! let nut = nutation(jd);
//! let eps = mean_obliquity(jd);
//! // Longitude nutation never exceeds ±20 arcseconds.
//! assert!(nut.longitude.abs() < 20.0 * 4.85e-6);
//! assert!((eps.to_degrees() - 23.4392911).abs() < 1e-4);
//! ```

use crate::frames::rotation_x;
use crate::frames::rotation_z;
use crate::math::{wrap_angle, Mat3};
use crate::precession::centuries_since_j2000;

/// Arcseconds to radians.
const AS2RAD: f64 = std::f64::consts::PI / 648_000.0;

/// Both nutation components, in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nutation {
    /// Nutation in longitude (Δψ)
    pub longitude: f64,
    /// Nutation in obliquity (Δε)
    pub obliquity: f64,
}

/// Mean obliquity of the ecliptic ε_A in radians (IAU 2006 polynomial).
pub fn mean_obliquity(jd_tdb: f64) -> f64 {
    let t = centuries_since_j2000(jd_tdb);
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;
    let t5 = t4 * t;
    (84381.406 - 46.836769 * t - 0.0001831 * t2 + 0.00200340 * t3 - 0.000000576 * t4
        - 0.0000000434 * t5)
        * AS2RAD
}

/// Luni-solar nutation term: argument multipliers for (l, l′, F, D, Ω) and
/// sine/cosine coefficients in units of 0.1 mas, with their T rates.
struct NutationTerm {
    nl: i32,
    nlp: i32,
    nf: i32,
    nd: i32,
    nom: i32,
    psi: f64,
    psi_t: f64,
    eps: f64,
    eps_t: f64,
}

/// The thirteen largest terms of the IAU luni-solar nutation series.
#[rustfmt::skip]
static NUTATION_TERMS: &[NutationTerm] = &[
    NutationTerm { nl:  0, nlp:  0, nf: 0, nd:  0, nom: 1, psi: -171996.0, psi_t: -174.2, eps: 92025.0, eps_t:  8.9 },
    NutationTerm { nl:  0, nlp:  0, nf: 2, nd: -2, nom: 2, psi:  -13187.0, psi_t:   -1.6, eps:  5736.0, eps_t: -3.1 },
    NutationTerm { nl:  0, nlp:  0, nf: 2, nd:  0, nom: 2, psi:   -2274.0, psi_t:   -0.2, eps:   977.0, eps_t: -0.5 },
    NutationTerm { nl:  0, nlp:  0, nf: 0, nd:  0, nom: 2, psi:    2062.0, psi_t:    0.2, eps:  -895.0, eps_t:  0.5 },
    NutationTerm { nl:  0, nlp:  1, nf: 0, nd:  0, nom: 0, psi:    1426.0, psi_t:   -3.4, eps:    54.0, eps_t: -0.1 },
    NutationTerm { nl:  1, nlp:  0, nf: 0, nd:  0, nom: 0, psi:     712.0, psi_t:    0.1, eps:    -7.0, eps_t:  0.0 },
    NutationTerm { nl:  0, nlp:  1, nf: 2, nd: -2, nom: 2, psi:    -517.0, psi_t:    1.2, eps:   224.0, eps_t: -0.6 },
    NutationTerm { nl:  0, nlp:  0, nf: 2, nd:  0, nom: 1, psi:    -386.0, psi_t:   -0.4, eps:   200.0, eps_t:  0.0 },
    NutationTerm { nl:  1, nlp:  0, nf: 2, nd:  0, nom: 2, psi:    -301.0, psi_t:    0.0, eps:   129.0, eps_t: -0.1 },
    NutationTerm { nl:  0, nlp: -1, nf: 2, nd: -2, nom: 2, psi:     217.0, psi_t:   -0.5, eps:   -95.0, eps_t:  0.3 },
    NutationTerm { nl:  1, nlp:  0, nf: 0, nd: -2, nom: 0, psi:    -158.0, psi_t:    0.0, eps:     0.0, eps_t:  0.0 },
    NutationTerm { nl:  0, nlp:  0, nf: 2, nd: -2, nom: 1, psi:     129.0, psi_t:    0.1, eps:   -70.0, eps_t:  0.0 },
    NutationTerm { nl: -1, nlp:  0, nf: 2, nd:  0, nom: 2, psi:     123.0, psi_t:    0.0, eps:   -53.0, eps_t:  0.0 },
];

/// The five fundamental luni-solar arguments in radians (IERS 2003
/// polynomials): mean anomaly of the Moon and Sun, argument of latitude,
/// Moon−Sun elongation, longitude of the Moon's ascending node.
fn fundamental_arguments(t: f64) -> [f64; 5] {
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;

    let l = 134.96340251 * 3600.0 + 1717915923.2178 * t + 31.8792 * t2 + 0.051635 * t3
        - 0.00024470 * t4;
    let lp = 357.52910918 * 3600.0 + 129596581.0481 * t - 0.5532 * t2 + 0.000136 * t3
        - 0.00001149 * t4;
    let f = 93.27209062 * 3600.0 + 1739527262.8478 * t - 12.7512 * t2 - 0.001037 * t3
        + 0.00000417 * t4;
    let d = 297.85019547 * 3600.0 + 1602961601.2090 * t - 6.3706 * t2 + 0.006593 * t3
        - 0.00003169 * t4;
    let om = 125.04455501 * 3600.0 - 6962890.5431 * t + 7.4722 * t2 + 0.007702 * t3
        - 0.00005939 * t4;

    [l, lp, f, d, om].map(|arcsec| wrap_angle(arcsec * AS2RAD))
}

/// Nutation in longitude and obliquity, in radians.
pub fn nutation(jd_tdb: f64) -> Nutation {
    let t = centuries_since_j2000(jd_tdb);
    let [l, lp, f, d, om] = fundamental_arguments(t);

    let mut dpsi = 0.0;
    let mut deps = 0.0;
    for term in NUTATION_TERMS {
        let arg = term.nl as f64 * l
            + term.nlp as f64 * lp
            + term.nf as f64 * f
            + term.nd as f64 * d
            + term.nom as f64 * om;
        let (s, c) = arg.sin_cos();
        dpsi += (term.psi + term.psi_t * t) * s;
        deps += (term.eps + term.eps_t * t) * c;
    }

    // Coefficients are stored in 0.1 mas.
    Nutation {
        longitude: dpsi * 1e-4 * AS2RAD,
        obliquity: deps * 1e-4 * AS2RAD,
    }
}

/// True obliquity ε = ε_A + Δε in radians.
pub fn true_obliquity(jd_tdb: f64) -> f64 {
    mean_obliquity(jd_tdb) + nutation(jd_tdb).obliquity
}

/// Nutation matrix `N = R1(−ε) · R3(−Δψ) · R1(ε_A)`, taking mean-of-date
/// to true-of-date equatorial coordinates.
pub fn nutation_matrix(jd_tdb: f64) -> Mat3 {
    let eps_a = mean_obliquity(jd_tdb);
    let nut = nutation(jd_tdb);
    let eps = eps_a + nut.obliquity;
    rotation_x(-eps) * rotation_z(-nut.longitude) * rotation_x(eps_a)
}
