//! Physical state of a single crossbar element.

/// One memristor cell.
///
/// Fields are private: after initialization only the temperature may change,
/// and only through [`CrossbarState`](crate::CrossbarState) or the kernel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    conductance: f64,
    temperature: f64,
    drift: f64,
}

impl Cell {
    /// Create a cell in its initial state.
    pub(crate) fn new(conductance: f64, temperature: f64, drift: f64) -> Self {
        Self {
            conductance,
            temperature,
            drift,
        }
    }

    /// Conductance in Siemens. Always strictly positive.
    pub fn conductance(&self) -> f64 {
        self.conductance
    }

    /// Temperature in Kelvin.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Dopant drift position in `[0, 1)`. Currently inert.
    pub fn drift(&self) -> f64 {
        self.drift
    }

    /// Overwrite the temperature in Kelvin.
    #[inline]
    pub fn set_temperature(&mut self, kelvin: f64) {
        self.temperature = kelvin;
    }
}
