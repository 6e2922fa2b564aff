//! Numeric views of keys, used by the "closest key" and "sum" queries of
//! [`RotatingOrderedSet`][crate::rotating::RotatingOrderedSet].

/// How far apart two keys are, and whether a key can take part in integer sums.
///
/// Numbers measure a true distance. Text keys have no natural metric, so they fall back to
/// the magnitude of a character-wise comparison: the difference of the first pair of
/// characters that differ, or of the lengths if one is a prefix of the other. That proxy
/// orders candidates sensibly for nearby strings but is not a metric, so ties between
/// text keys are only approximately resolved.
pub trait KeyMetric {
    /// A non-negative distance between `self` and `other`.
    fn distance(&self, other: &Self) -> f64;

    /// The key as an integer for sum queries. Keys that aren't numbers return `None`.
    fn as_integer(&self) -> Option<i64> {
        None
    }
}

macro_rules! integer_metric {
    ($($t:ty),*) => {
        $(
            impl KeyMetric for $t {
                fn distance(&self, other: &Self) -> f64 {
                    (*self as f64 - *other as f64).abs()
                }

                fn as_integer(&self) -> Option<i64> {
                    i64::try_from(*self).ok()
                }
            }
        )*
    };
}

integer_metric!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! float_metric {
    ($($t:ty),*) => {
        $(
            impl KeyMetric for $t {
                fn distance(&self, other: &Self) -> f64 {
                    (*self as f64 - *other as f64).abs()
                }

                fn as_integer(&self) -> Option<i64> {
                    self.is_finite().then(|| self.trunc() as i64)
                }
            }
        )*
    };
}

float_metric!(f32, f64);

impl KeyMetric for char {
    fn distance(&self, other: &Self) -> f64 {
        (*self as u32 as f64 - *other as u32 as f64).abs()
    }
}

impl KeyMetric for str {
    fn distance(&self, other: &Self) -> f64 {
        let diff = self
            .chars()
            .zip(other.chars())
            .find(|(a, b)| a != b)
            .map(|(a, b)| a as i64 - b as i64)
            .unwrap_or_else(|| self.chars().count() as i64 - other.chars().count() as i64);
        diff.unsigned_abs() as f64
    }
}

impl KeyMetric for String {
    fn distance(&self, other: &Self) -> f64 {
        self.as_str().distance(other.as_str())
    }
}

impl<T: KeyMetric + ?Sized> KeyMetric for &T {
    fn distance(&self, other: &Self) -> f64 {
        (**self).distance(*other)
    }

    fn as_integer(&self) -> Option<i64> {
        (**self).as_integer()
    }
}
