//! Power sequencing collaborator.

/// Board-level power control for one sensor (regulators, enable GPIOs).
///
/// Invoked at most once per enable or disable transition.
#[allow(async_fn_in_trait)]
pub trait PowerHook {
    /// Error reported by the board layer.
    type Error;

    /// Powers the sensor up.
    async fn power_on(&mut self) -> Result<(), Self::Error>;

    /// Powers the sensor down.
    async fn power_off(&mut self) -> Result<(), Self::Error>;
}

/// Always-on supply.
impl PowerHook for () {
    type Error = core::convert::Infallible;

    async fn power_on(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn power_off(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
