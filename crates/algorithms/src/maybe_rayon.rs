/// Row iteration that is parallel only when the `parallel` feature is on.
///
/// With the feature enabled this is rayon's prelude. Without it, a
/// sequential `into_par_iter` stand-in lets the same `flat_map`/`collect`
/// chains compile against plain `Iterator`, so the default build stays
/// single-threaded and free of the rayon dependency.
#[cfg(feature = "parallel")]
pub use rayon::prelude::*;

#[cfg(not(feature = "parallel"))]
mod sequential {
    pub trait IntoParallelIterator {
        type Iter: Iterator<Item = Self::Item>;
        type Item;
        fn into_par_iter(self) -> Self::Iter;
    }

    impl<I: IntoIterator> IntoParallelIterator for I {
        type Iter = I::IntoIter;
        type Item = I::Item;
        fn into_par_iter(self) -> Self::Iter {
            self.into_iter()
        }
    }
}

#[cfg(not(feature = "parallel"))]
pub use sequential::*;
