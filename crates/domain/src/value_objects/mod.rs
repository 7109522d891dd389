//! Value objects - immutable configuration and data without identity.

mod ring_settings;

pub use ring_settings::RingSettings;
