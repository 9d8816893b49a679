//! PID controller block
//!
//! Proportional-integral-derivative control over `Float` ports. The
//! integral term is clamped to keep setpoint changes from winding it up,
//! and errors inside the deadband are treated as zero to reduce hunting.

use rheos_core::block::{Block, Fired, PortRefs};
use rheos_core::port::{InputPort, OutputPort, Value};
use rheos_core::ports;

use crate::fire;

/// PID tuning and limits
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PidConfig {
    /// Proportional gain
    pub kp: f32,
    /// Integral gain (per sample)
    pub ki: f32,
    /// Derivative gain (per sample)
    pub kd: f32,
    /// Absolute clamp on the accumulated error sum
    pub integral_limit: f32,
    /// Lower output clamp
    pub output_min: f32,
    /// Upper output clamp
    pub output_max: f32,
    /// Errors smaller than this are treated as zero
    pub deadband: f32,
}

impl Default for PidConfig {
    fn default() -> Self {
        Self {
            kp: 1.0,
            ki: 0.0,
            kd: 0.0,
            integral_limit: 100.0,
            output_min: 0.0,
            output_max: 100.0,
            deadband: 0.0,
        }
    }
}

/// PID controller
///
/// Evaluates when both `setpoint` and `measurement` have arrived. Gains
/// are live parameters; changing one resets the internal state so the
/// integral does not carry stale history into the new tuning.
pub struct Pid {
    config: PidConfig,
    integral: f32,
    prev_error: Option<f32>,
    /// Target value input
    pub setpoint: InputPort,
    /// Process value input
    pub measurement: InputPort,
    /// Control output, clamped to `output_min..=output_max`
    pub control: OutputPort,
}

impl Pid {
    /// Parameter index for the proportional gain
    pub const PARAM_KP: u8 = 0;
    /// Parameter index for the integral gain
    pub const PARAM_KI: u8 = 1;
    /// Parameter index for the derivative gain
    pub const PARAM_KD: u8 = 2;

    /// Create a controller with the given configuration
    pub fn new(config: PidConfig) -> Self {
        Self {
            config,
            integral: 0.0,
            prev_error: None,
            setpoint: InputPort::default(),
            measurement: InputPort::default(),
            control: OutputPort::default(),
        }
    }

    /// Current configuration
    pub fn config(&self) -> &PidConfig {
        &self.config
    }

    /// Clear the integral and derivative history
    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.prev_error = None;
    }
}

impl Block for Pid {
    fn inputs(&mut self) -> PortRefs<'_, InputPort> {
        ports![&mut self.setpoint, &mut self.measurement]
    }

    fn outputs(&mut self) -> PortRefs<'_, OutputPort> {
        ports![&mut self.control]
    }

    fn evaluate(&mut self) -> Fired {
        let (Some(sp), Some(pv)) = (
            self.setpoint.value.as_float(),
            self.measurement.value.as_float(),
        ) else {
            return Fired::new();
        };

        let mut error = sp - pv;
        if error.abs() < self.config.deadband {
            error = 0.0;
        }

        self.integral = (self.integral + error)
            .clamp(-self.config.integral_limit, self.config.integral_limit);

        let derivative = match self.prev_error {
            None => 0.0,
            Some(prev) => error - prev,
        };
        self.prev_error = Some(error);

        let out = self.config.kp * error
            + self.config.ki * self.integral
            + self.config.kd * derivative;
        let out = out.clamp(self.config.output_min, self.config.output_max);

        self.control.set(Value::Float(out));
        fire(&[0])
    }

    fn set_param(&mut self, index: u8, value: Value) -> bool {
        let Some(v) = value.as_float() else {
            return false;
        };
        match index {
            Self::PARAM_KP => self.config.kp = v,
            Self::PARAM_KI => self.config.ki = v,
            Self::PARAM_KD => self.config.kd = v,
            _ => return false,
        }
        self.reset();
        true
    }

    fn param(&self, index: u8) -> Option<Value> {
        match index {
            Self::PARAM_KP => Some(Value::Float(self.config.kp)),
            Self::PARAM_KI => Some(Value::Float(self.config.ki)),
            Self::PARAM_KD => Some(Value::Float(self.config.kd)),
            _ => None,
        }
    }
}
