//! Interpolation policies for sampling between two snapshots.

/// Blends two snapshots at fraction `t` in `[0, 1]`.
///
/// `t == 0` means `before`, `t == 1` means `after`. Implementations
/// should return exactly the endpoint at those values so that sampling
/// at a stored time is stable either way.
///
/// Any `Fn(&T, &T, f64) -> T` is an interpolator.
pub trait Interpolate<T> {
    /// Blend `before` and `after`.
    fn interpolate(&self, before: &T, after: &T, t: f64) -> T;
}

impl<T, F> Interpolate<T> for F
where
    F: Fn(&T, &T, f64) -> T,
{
    fn interpolate(&self, before: &T, after: &T, t: f64) -> T {
        self(before, after, t)
    }
}

/// Types that support componentwise linear interpolation.
pub trait Lerp: Sized {
    /// `self + (other - self) * t`.
    fn lerp(&self, other: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        // Exact at both endpoints, unlike `a + (b - a) * t` at t = 1.
        if t >= 1.0 {
            *other
        } else {
            self + (other - self) * t
        }
    }
}

impl Lerp for f32 {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        f64::from(*self).lerp(&f64::from(*other), t) as f32
    }
}

impl<A: Lerp, B: Lerp> Lerp for (A, B) {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        (self.0.lerp(&other.0, t), self.1.lerp(&other.1, t))
    }
}

impl<A: Lerp, B: Lerp, C: Lerp> Lerp for (A, B, C) {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        (
            self.0.lerp(&other.0, t),
            self.1.lerp(&other.1, t),
            self.2.lerp(&other.2, t),
        )
    }
}

impl<L: Lerp, const N: usize> Lerp for [L; N] {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        std::array::from_fn(|i| self[i].lerp(&other[i], t))
    }
}

/// Linear interpolation for any [`Lerp`] snapshot.
#[derive(Clone, Copy, Debug, Default)]
pub struct Linear;

impl<T: Lerp> Interpolate<T> for Linear {
    fn interpolate(&self, before: &T, after: &T, t: f64) -> T {
        before.lerp(after, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_hits_endpoints_exactly() {
        let (a, b) = (0.1_f64, 0.7_f64);
        assert_eq!(Linear.interpolate(&a, &b, 0.0), a);
        assert_eq!(Linear.interpolate(&a, &b, 1.0), b);
    }

    #[test]
    fn linear_midpoint() {
        let v = Linear.interpolate(&(0.0_f64, 10.0_f32), &(4.0, 20.0), 0.5);
        assert_eq!(v, (2.0, 15.0));
    }

    #[test]
    fn arrays_lerp_componentwise() {
        let v = Linear.interpolate(&[0.0_f64, 100.0], &[10.0, 0.0], 0.25);
        assert_eq!(v, [2.5, 75.0]);
    }

    #[test]
    fn closures_are_interpolators() {
        let pick_nearest = |a: &i32, b: &i32, t: f64| if t < 0.5 { *a } else { *b };
        assert_eq!(pick_nearest.interpolate(&1, &9, 0.4), 1);
        assert_eq!(pick_nearest.interpolate(&1, &9, 0.6), 9);
    }
}
