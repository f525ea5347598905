use crate::error::SimError;
use crate::geometry::Vec2;
use rand::Rng;

/// Random integer in `[min, max]`, inclusive on both ends.
pub fn random_integer(rng: &mut impl Rng, min: i64, max: i64) -> Result<i64, SimError> {
    if min > max {
        return Err(SimError::InvalidArgument(format!(
            "minimum {min} must not be larger than the maximum {max}"
        )));
    }
    Ok(rng.gen_range(min..=max))
}

/// Random float in `[min, max]`.
pub fn random_float(rng: &mut impl Rng, min: f64, max: f64) -> Result<f64, SimError> {
    if min > max {
        return Err(SimError::InvalidArgument(format!(
            "minimum {min} must not be larger than the maximum {max}"
        )));
    }
    Ok(rng.gen_range(min..=max))
}

/// True with probability `chance`.
pub fn random_chance(rng: &mut impl Rng, chance: f64) -> Result<bool, SimError> {
    if !(0.0..=1.0).contains(&chance) {
        return Err(SimError::InvalidArgument(format!(
            "chance must be in the range [0,1] instead {chance} was given"
        )));
    }
    Ok(rng.gen::<f64>() <= chance)
}

pub fn random_bool(rng: &mut impl Rng) -> bool {
    rng.gen::<f64>() <= 0.5
}

pub fn random_element<'a, T>(rng: &mut impl Rng, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get(rng.gen_range(0..items.len()))
}

/// Uniformly distributed point in the disk of the given radius around
/// `center`. The square root on the radial draw keeps the distribution
/// uniform over area; sampling the radius directly would crowd the center.
pub fn random_point_in_disk(rng: &mut impl Rng, center: Vec2, radius: f64) -> Vec2 {
    let r = rng.gen::<f64>().sqrt() * radius;
    let theta = rng.gen::<f64>() * std::f64::consts::TAU;

    Vec2::new(r * theta.cos() + center.x, r * theta.sin() + center.y)
}
