//! Rate-based control status classification.

use crate::domain::Status;

/// Rate of rates below this means the growth rate itself is slowing down.
pub const IMPROVING_BELOW: f64 = 0.998;

/// Daily rate below which an epidemic is resolving; also the recovery-start target.
pub const RESOLVING_BELOW: f64 = 0.94;

const RESOLVING_SLOWLY_BELOW: f64 = 0.99;
const UNDER_CONTROL_BELOW: f64 = 1.05;
const BARELY_UNDER_CONTROL_BELOW: f64 = 1.09;
const LOOSING_CONTROL_BELOW: f64 = 1.14;

pub fn is_improving(rate_of_rates: f64) -> bool {
    rate_of_rates < IMPROVING_BELOW
}

/// Classify a current daily `rate` given how the rate itself is trending.
///
/// First matching rule wins; a slowing trend (`rate_of_rates < 0.998`) buys one
/// notch of leniency between 1.05 and 1.14 and above it.
pub fn classify(rate: f64, rate_of_rates: f64) -> Status {
    let improving = is_improving(rate_of_rates);

    if rate < RESOLVING_BELOW {
        Status::Resolving
    } else if rate < RESOLVING_SLOWLY_BELOW {
        Status::ResolvingSlowly
    } else if rate < UNDER_CONTROL_BELOW || (rate < BARELY_UNDER_CONTROL_BELOW && improving) {
        Status::UnderControl
    } else if rate < BARELY_UNDER_CONTROL_BELOW || (rate < LOOSING_CONTROL_BELOW && improving) {
        Status::BarelyUnderControl
    } else if rate < LOOSING_CONTROL_BELOW {
        Status::LoosingControl
    } else if improving {
        Status::HardToControl
    } else {
        Status::OutOfControl
    }
}
