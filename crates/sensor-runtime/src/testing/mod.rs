//! Testing infrastructure (mock transports, collaborators, delays).

pub(crate) mod mock;

pub(crate) use mock::{
    MockClock, MockDelay, MockInterface, MockInterrupt, MockPin, MockPower, RecordingSink,
};
