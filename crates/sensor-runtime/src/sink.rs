//! Sample consumer.

use crate::data::Sample;

/// Receives every acquired sample, in acquisition order.
pub trait EventSink {
    /// Reports one sample.
    fn report(&mut self, sample: Sample);
}

impl<F> EventSink for F
where
    F: FnMut(Sample),
{
    fn report(&mut self, sample: Sample) {
        self(sample);
    }
}
