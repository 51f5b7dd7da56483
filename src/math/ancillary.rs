use super::MAX_ITERATIONS;
use std::f64::consts::FRAC_PI_2;

/// ts determines the function ts(phi) defined by Snyder (1987), eq. (7-10).
///
/// It is the exponential of the negated isometric latitude, exp(-𝜓),
/// evaluated in a numerically more stable way than the naive
/// `(-isometric_latitude).exp()`.
///
/// Inputs:
///   (sin 𝜙, cos 𝜙): trigs of the geographic latitude
///   e: eccentricity of the ellipsoid
/// Output:
///   ts: exp(-𝜓)  =  1 / (tan 𝜒 + sec 𝜒),
///   where 𝜒 is the conformal latitude
pub fn ts(sincos: (f64, f64), e: f64) -> f64 {
    // exp(-asinh(tan 𝜙))
    //    = 1 / (tan 𝜙 + sec 𝜙)
    //    = cos 𝜙 / (1 + sin 𝜙)  good for 𝜙 > 0
    //    = (1 - sin 𝜙) / cos 𝜙  good for 𝜙 < 0
    let factor = if sincos.0 > 0. {
        sincos.1 / (1. + sincos.0)
    } else {
        (1. - sincos.0) / sincos.1
    };
    (e * (e * sincos.0).atanh()).exp() * factor
}

/// The inverse of [`ts`]: the geographic latitude corresponding to
/// exp(-𝜓) = `ts0`. Snyder (1987), eq. (7-9), iterated to 1e-11 rad.
/// Returns the best estimate if the iteration budget runs out.
pub fn phi2(ts0: f64, e: f64) -> f64 {
    let half_e = e / 2.;
    let mut phi = FRAC_PI_2 - 2. * ts0.atan();

    for _ in 0..MAX_ITERATIONS {
        let con = e * phi.sin();
        let next = FRAC_PI_2 - 2. * (ts0 * ((1. - con) / (1. + con)).powf(half_e)).atan();
        if (next - phi).abs() < 1e-11 {
            return next;
        }
        phi = next;
    }
    log::warn!("phi2: iteration budget exhausted");
    phi
}

/// Snyder (1987) eq. (14-15): the radius of the parallel of latitude 𝜙,
/// scaled to the semimajor axis.
pub fn msfn(sincos: (f64, f64), es: f64) -> f64 {
    sincos.1 / (1. - sincos.0 * sincos.0 * es).sqrt()
}

/// Snyder (1987) eq. (3-12): the authalic latitude function q(𝜙).
pub fn qsfn(sinphi: f64, e: f64) -> f64 {
    if e < 1e-7 {
        return 2.0 * sinphi;
    }

    let es = e * e;
    let con = e * sinphi;
    let div1 = 1.0 - con * con;
    let div2 = 1.0 + con;

    (1.0 - es) * (sinphi / div1 - (0.5 / e) * ((1. - con) / div2).ln())
}

/// The inverse of [`qsfn`]: the geographic latitude with authalic latitude
/// function value `q`. Snyder (1987), eq. (3-16), iterated to 1e-11 rad.
/// Arguments with |q| at or beyond the polar value map to ±𝜋/2.
pub fn phi_from_q(q: f64, e: f64) -> f64 {
    let es = e * e;
    let qp = qsfn(1.0, e);
    if q.abs() >= qp - 1e-12 {
        return FRAC_PI_2.copysign(q);
    }

    let mut phi = (0.5 * q).asin();
    if e < 1e-7 {
        return phi;
    }

    for _ in 0..MAX_ITERATIONS {
        let (sinphi, cosphi) = phi.sin_cos();
        let con = e * sinphi;
        let com = 1.0 - con * con;
        let dphi = 0.5 * com * com / cosphi
            * (q / (1.0 - es) - sinphi / com + (0.5 / e) * ((1.0 - con) / (1.0 + con)).ln());
        phi += dphi;
        if dphi.abs() < 1e-11 {
            return phi;
        }
    }
    log::warn!("phi_from_q: iteration budget exhausted");
    phi
}

/// Coefficients for the meridional arc series, Snyder (1987) eq. (3-21).
/// The series gives arc lengths in units of the semimajor axis.
pub fn enfn(es: f64) -> [f64; 5] {
    const C00: f64 = 1.;
    const C02: f64 = 0.25;
    const C04: f64 = 0.046875;
    const C06: f64 = 0.01953125;
    const C08: f64 = 0.01068115234375;
    const C22: f64 = 0.75;
    const C44: f64 = 0.46875;
    const C46: f64 = 0.01302083333333333333;
    const C48: f64 = 0.00712076822916666666;
    const C66: f64 = 0.36458333333333333333;
    const C68: f64 = 0.00569661458333333333;
    const C88: f64 = 0.3076171875;

    let t = es * es;
    [
        C00 - es * (C02 + es * (C04 + es * (C06 + es * C08))),
        es * (C22 - es * (C04 + es * (C06 + es * C08))),
        t * (C44 - es * (C46 + es * C48)),
        t * es * (C66 - es * C68),
        t * t * C88,
    ]
}

/// The meridional arc from the equator to latitude 𝜙, in units of the
/// semimajor axis. `en` comes from [`enfn`].
pub fn mlfn(phi: f64, sinphi: f64, cosphi: f64, en: &[f64; 5]) -> f64 {
    let cs = cosphi * sinphi;
    let ss = sinphi * sinphi;
    en[0] * phi - cs * (en[1] + ss * (en[2] + ss * (en[3] + ss * en[4])))
}

/// The latitude with meridional arc `arg` (in units of the semimajor axis).
/// Newton iteration to 1e-11; best estimate on a blown budget.
pub fn inv_mlfn(arg: f64, es: f64, en: &[f64; 5]) -> f64 {
    let k = 1. / (1. - es);

    let mut phi = arg;
    for _ in 0..MAX_ITERATIONS {
        let s = phi.sin();
        let mut t = 1. - es * s * s;
        t = (mlfn(phi, s, phi.cos(), en) - arg) * t * t.sqrt() * k;
        phi -= t;
        if t.abs() < 1e-11 {
            return phi;
        }
    }
    log::warn!("inv_mlfn: iteration budget exhausted");
    phi
}

// ----- T E S T S ---------------------------------------------------------------------
