use std::fmt::Debug;
use std::rc::Rc;

use crate::aggregation::{Grouping, Reducer};

/// A projection of records that filters can be placed on.
///
/// Dimensions are created by [`super::CrossFilter::dimension`]; the handle is
/// cheap to clone and is passed back to the filter methods.
pub struct Dimension<T, V> {
    pub(super) id: usize,
    pub(super) value_fn: Rc<dyn Fn(&T) -> V>,
}

impl<T, V> Clone for Dimension<T, V> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            value_fn: Rc::clone(&self.value_fn),
        }
    }
}

impl<T: 'static, V: 'static> Dimension<T, V> {
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn value_of(&self, item: &T) -> V {
        (self.value_fn)(item)
    }

    /// Group records by this dimension's value
    pub fn group<R>(&self, reducer: R) -> Grouping<T, V, R>
    where
        V: Ord + Debug,
        R: Reducer<T>,
    {
        let value_fn = Rc::clone(&self.value_fn);
        Grouping::new(move |item: &T| value_fn(item), reducer)
    }
}
