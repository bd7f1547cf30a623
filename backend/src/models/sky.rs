//! Spherical geometry on the celestial sphere (all angles in degrees).
//!
//! Mirrors the predicates the Q3C extension evaluates server-side so the
//! in-memory repository answers POS queries the same way Postgres does.

/// Great-circle distance between two sky positions, in degrees (haversine).
pub fn angular_distance(ra1: f64, dec1: f64, ra2: f64, dec2: f64) -> f64 {
    let (ra1, dec1, ra2, dec2) = (
        ra1.to_radians(),
        dec1.to_radians(),
        ra2.to_radians(),
        dec2.to_radians(),
    );
    let sin_ddec = ((dec2 - dec1) / 2.0).sin();
    let sin_dra = ((ra2 - ra1) / 2.0).sin();
    let a = sin_ddec * sin_ddec + dec1.cos() * dec2.cos() * sin_dra * sin_dra;
    2.0 * a.sqrt().min(1.0).asin().to_degrees()
}

fn to_unit_vector(ra: f64, dec: f64) -> [f64; 3] {
    let (ra, dec) = (ra.to_radians(), dec.to_radians());
    [dec.cos() * ra.cos(), dec.cos() * ra.sin(), dec.sin()]
}

/// Gnomonic (tangent-plane) projection of `(ra, dec)` around `(ra0, dec0)`.
///
/// Returns `None` for points on or behind the tangent plane's hemisphere.
pub fn gnomonic(ra0: f64, dec0: f64, ra: f64, dec: f64) -> Option<(f64, f64)> {
    let (ra0, dec0, ra, dec) = (
        ra0.to_radians(),
        dec0.to_radians(),
        ra.to_radians(),
        dec.to_radians(),
    );
    let dra = ra - ra0;
    let cos_c = dec0.sin() * dec.sin() + dec0.cos() * dec.cos() * dra.cos();
    if cos_c <= 1e-12 {
        return None;
    }
    let x = dec.cos() * dra.sin() / cos_c;
    let y = (dec0.cos() * dec.sin() - dec0.sin() * dec.cos() * dra.cos()) / cos_c;
    Some((x, y))
}

/// Point-in-polygon test for a spherical polygon with great-circle edges.
///
/// Great circles project to straight lines under the gnomonic projection, so
/// the test projects around the vertex centroid and ray-casts in the plane.
/// Polygons reaching a hemisphere or more never contain anything.
pub fn polygon_contains(vertices: &[(f64, f64)], ra: f64, dec: f64) -> bool {
    if vertices.len() < 3 {
        return false;
    }

    let sum = vertices.iter().fold([0.0_f64; 3], |acc, &(lon, lat)| {
        let v = to_unit_vector(lon, lat);
        [acc[0] + v[0], acc[1] + v[1], acc[2] + v[2]]
    });
    let norm = (sum[0] * sum[0] + sum[1] * sum[1] + sum[2] * sum[2]).sqrt();
    if norm < 1e-12 {
        return false;
    }
    let ra0 = sum[1].atan2(sum[0]).to_degrees().rem_euclid(360.0);
    let dec0 = (sum[2] / norm).clamp(-1.0, 1.0).asin().to_degrees();

    let projected: Option<Vec<(f64, f64)>> = vertices
        .iter()
        .map(|&(lon, lat)| gnomonic(ra0, dec0, lon, lat))
        .collect();
    let (Some(projected), Some((px, py))) = (projected, gnomonic(ra0, dec0, ra, dec)) else {
        return false;
    };

    let mut inside = false;
    let mut j = projected.len() - 1;
    for i in 0..projected.len() {
        let (xi, yi) = projected[i];
        let (xj, yj) = projected[j];
        if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}
