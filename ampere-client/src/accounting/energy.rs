use crate::configs::ResetPolicy;

const SECONDS_PER_HOUR: f64 = 3600.0;
const WH_PER_KWH: f64 = 1000.0;

/// Energy added by one 1 s tick, in Wh.
pub fn power_increment(avg_amp: f64, voltage: f64) -> f64 {
    avg_amp * voltage / SECONDS_PER_HOUR
}

pub fn price_for(energy_wh: f64, rate_per_kwh: f64) -> f64 {
    energy_wh / WH_PER_KWH * rate_per_kwh
}

/// Rounds to the 4 decimals used for display and billing.
pub fn round_price(price: f64) -> f64 {
    (price * 10_000.0).round() / 10_000.0
}

/// Parses a reported voltage, anything unusable counts as 0 V.
pub fn parse_voltage(voltage: &str) -> f64 {
    voltage
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// Cumulative energy and cost of one channel.
///
/// `energy_wh` is what the display shows. Under [`ResetPolicy::ResetOnSubmit`]
/// the part already accepted by the gateway moves to `billed_wh`, so the
/// session total submitted with every bill never shrinks.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyMeter {
    energy_wh: f64,
    billed_wh: f64,
    rate_per_kwh: f64,
    reset_policy: ResetPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeterSnapshot {
    pub energy_wh: f64,
    pub price: f64,
}

impl EnergyMeter {
    pub fn new(rate_per_kwh: f64, reset_policy: ResetPolicy) -> Self {
        Self {
            energy_wh: 0.0,
            billed_wh: 0.0,
            rate_per_kwh,
            reset_policy,
        }
    }

    /// Integrates one tick and returns the increment.
    pub fn step(&mut self, avg_amp: f64, voltage: f64) -> f64 {
        let increment = power_increment(avg_amp, voltage);
        // negative readings would let the total run backwards
        if increment.is_finite() && increment > 0.0 {
            self.energy_wh += increment;
        }
        increment
    }

    pub fn energy_wh(&self) -> f64 {
        self.energy_wh
    }

    pub fn price(&self) -> f64 {
        price_for(self.energy_wh, self.rate_per_kwh)
    }

    /// Session totals as submitted to the gateway, price rounded to 4 decimals.
    pub fn snapshot(&self) -> MeterSnapshot {
        let energy_wh = self.billed_wh + self.energy_wh;

        MeterSnapshot {
            energy_wh,
            price: round_price(price_for(energy_wh, self.rate_per_kwh)),
        }
    }

    /// Applies the reset policy after the gateway accepted `billed`.
    pub fn settle(&mut self, billed: &MeterSnapshot) {
        if self.reset_policy != ResetPolicy::ResetOnSubmit || billed.energy_wh <= self.billed_wh {
            return;
        }

        let newly_billed = billed.energy_wh - self.billed_wh;
        self.energy_wh = (self.energy_wh - newly_billed).max(0.0);
        self.billed_wh = billed.energy_wh;
    }
}
