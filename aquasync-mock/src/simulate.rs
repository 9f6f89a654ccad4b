use rand::Rng;

/// Diurnal turbidity curve with noise, occasionally spiking the way storm
/// runoff would. `day_fraction` is 0.0..1.0 across one simulated day.
pub fn simulated_turbidity<R: Rng>(day_fraction: f64, rng: &mut R) -> f64 {
    let radians = day_fraction * 2.0 * std::f64::consts::PI;
    let base = 420.0 + 180.0 * radians.sin();
    let noise = rng.random_range(-35.0..35.0);
    let spike = if rng.random_bool(0.05) {
        rng.random_range(700.0..900.0)
    } else {
        0.0
    };

    (base + noise + spike).max(0.0)
}

pub fn simulated_rssi<R: Rng>(rng: &mut R) -> i64 {
    -55 - rng.random_range(0..20)
}

pub fn simulated_free_heap<R: Rng>(rng: &mut R) -> i64 {
    160_000 + rng.random_range(0..60_000)
}
