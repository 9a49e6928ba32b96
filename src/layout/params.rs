#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayoutMode {
    #[default]
    Force,
    Radial,
}

impl LayoutMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Force => "Force",
            Self::Radial => "Radial",
        }
    }
}

/// Tunable force constants.
///
/// `charge_strength` is negative for repulsion. `collision_radius` is the
/// smallest allowed distance between two node centers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutParameters {
    pub link_distance: f32,
    pub charge_strength: f32,
    pub collision_radius: f32,
}

impl Default for LayoutParameters {
    fn default() -> Self {
        Self {
            link_distance: 100.0,
            charge_strength: -120.0,
            collision_radius: 12.0,
        }
    }
}

impl LayoutParameters {
    /// Fixed constants for radial mode; rings need more room than free layouts.
    pub const RADIAL: Self = Self {
        link_distance: 180.0,
        charge_strength: -400.0,
        collision_radius: 36.0,
    };

    /// Distance between consecutive hierarchy rings in radial mode.
    pub const RING_SPACING: f32 = 120.0;

    pub const LINK_DISTANCE_RANGE: std::ops::RangeInclusive<f32> = 10.0..=400.0;
    pub const CHARGE_STRENGTH_RANGE: std::ops::RangeInclusive<f32> = -1000.0..=-1.0;
    pub const COLLISION_RADIUS_RANGE: std::ops::RangeInclusive<f32> = 1.0..=80.0;

    /// Replaces non-finite values and non-positive distances with defaults.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let positive = |value: f32, fallback: f32| {
            if value.is_finite() && value > 0.0 {
                value
            } else {
                fallback
            }
        };

        Self {
            link_distance: positive(self.link_distance, defaults.link_distance),
            charge_strength: if self.charge_strength.is_finite() {
                self.charge_strength
            } else {
                defaults.charge_strength
            },
            collision_radius: positive(self.collision_radius, defaults.collision_radius),
        }
    }

    pub fn with_update(self, update: ParameterUpdate) -> Self {
        Self {
            link_distance: update.link_distance.unwrap_or(self.link_distance),
            charge_strength: update.charge_strength.unwrap_or(self.charge_strength),
            collision_radius: update.collision_radius.unwrap_or(self.collision_radius),
        }
        .sanitized()
    }
}

/// Partial parameter change; `None` fields keep their current value.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ParameterUpdate {
    pub link_distance: Option<f32>,
    pub charge_strength: Option<f32>,
    pub collision_radius: Option<f32>,
}

impl From<LayoutParameters> for ParameterUpdate {
    fn from(params: LayoutParameters) -> Self {
        Self {
            link_distance: Some(params.link_distance),
            charge_strength: Some(params.charge_strength),
            collision_radius: Some(params.collision_radius),
        }
    }
}

/// Everything that decides the identity of a layout run. Changing the
/// viewport size or mode means building a new engine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutConfig {
    pub width: f32,
    pub height: f32,
    pub mode: LayoutMode,
    /// Force-mode parameters; ignored in radial mode.
    pub params: LayoutParameters,
}

impl LayoutConfig {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            mode: LayoutMode::default(),
            params: LayoutParameters::default(),
        }
    }

    pub fn with_mode(mut self, mode: LayoutMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_params(mut self, params: LayoutParameters) -> Self {
        self.params = params;
        self
    }

    pub fn has_area(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Parameters the engine actually runs with for this mode.
    pub fn effective_params(&self) -> LayoutParameters {
        match self.mode {
            LayoutMode::Force => self.params.sanitized(),
            LayoutMode::Radial => LayoutParameters::RADIAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizes_broken_values() {
        let params = LayoutParameters {
            link_distance: -5.0,
            charge_strength: f32::NAN,
            collision_radius: 0.0,
        }
        .sanitized();
        assert_eq!(params, LayoutParameters::default());
    }

    #[test]
    fn partial_update_keeps_other_fields() {
        let params = LayoutParameters::default().with_update(ParameterUpdate {
            link_distance: Some(42.0),
            ..Default::default()
        });
        assert_eq!(params.link_distance, 42.0);
        assert_eq!(
            params.charge_strength,
            LayoutParameters::default().charge_strength
        );
    }

    #[test]
    fn radial_mode_ignores_configured_params() {
        let config = LayoutConfig::new(800.0, 600.0)
            .with_mode(LayoutMode::Radial)
            .with_params(LayoutParameters {
                link_distance: 10.0,
                ..Default::default()
            });
        assert_eq!(config.effective_params(), LayoutParameters::RADIAL);
        assert!(config.has_area());
        assert!(!LayoutConfig::new(0.0, 600.0).has_area());
    }
}
