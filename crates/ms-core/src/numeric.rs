/// Floating point type used throughout the pipeline
pub type Real = f64;

/// Affine map of a unit-interval value into `[min, max]`.
#[inline]
pub fn lerp(unit: Real, min: Real, max: Real) -> Real {
    unit * (max - min) + min
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_hits_endpoints() {
        assert_eq!(lerp(0.0, 2.0, 4.0), 2.0);
        assert_eq!(lerp(1.0, 2.0, 4.0), 4.0);
        assert_eq!(lerp(0.5, 2.0, 4.0), 3.0);
    }
}
