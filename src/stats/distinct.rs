use std::cmp::Ordering;

/// Detects adjacent duplicates while walking a **sorted** sequence once.
///
/// Elements compare equal when `compare` returns [`Ordering::Equal`]. On an
/// unsorted sequence only consecutive duplicates are reported.
pub struct StatefulDistinct<'a, T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    prev: Option<&'a T>,
    compare: F,
}

impl<'a, T, F> StatefulDistinct<'a, T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    pub fn from_comparator(compare: F) -> Self {
        Self {
            prev: None,
            compare,
        }
    }

    /// Whether `current` equals the element passed in the previous call.
    pub fn is_duplicate(&mut self, current: &'a T) -> bool {
        let duplicate = self
            .prev
            .is_some_and(|prev| (self.compare)(prev, current) == Ordering::Equal);
        self.prev = Some(current);
        duplicate
    }
}
