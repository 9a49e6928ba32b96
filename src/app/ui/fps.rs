use std::collections::VecDeque;

const FPS_SAMPLE_WINDOW: usize = 180;

/// Rolling frame-rate readout for the header.
#[derive(Debug, Default)]
pub(in crate::app) struct FpsMeter {
    current: f32,
    samples: VecDeque<f32>,
}

impl FpsMeter {
    pub(in crate::app) fn record(&mut self, dt: f32) {
        if dt <= f32::EPSILON {
            return;
        }

        self.current = (1.0 / dt).clamp(0.0, 1000.0);
        self.samples.push_back(self.current);
        while self.samples.len() > FPS_SAMPLE_WINDOW {
            self.samples.pop_front();
        }
    }

    pub(in crate::app) fn average(&self) -> Option<f32> {
        (!self.samples.is_empty())
            .then(|| self.samples.iter().sum::<f32>() / self.samples.len() as f32)
    }

    pub(in crate::app) fn low(&self) -> Option<f32> {
        self.samples.iter().copied().reduce(f32::min)
    }

    pub(in crate::app) fn summary(&self) -> Option<String> {
        let average = self.average()?;
        let mut text = format!("FPS {:.0} | avg {average:.1}", self.current);
        if let Some(low) = self.low() {
            text.push_str(&format!(" | low {low:.0}"));
        }
        if self.current > f32::EPSILON {
            text.push_str(&format!(" | {:.1} ms", 1000.0 / self.current));
        }
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_is_bounded() {
        let mut meter = FpsMeter::default();
        for _ in 0..(FPS_SAMPLE_WINDOW + 50) {
            meter.record(1.0 / 60.0);
        }
        assert_eq!(meter.samples.len(), FPS_SAMPLE_WINDOW);
        assert!((meter.average().unwrap() - 60.0).abs() < 0.5);
    }

    #[test]
    fn empty_meter_has_no_summary() {
        let mut meter = FpsMeter::default();
        meter.record(0.0);
        assert!(meter.summary().is_none());

        meter.record(0.02);
        assert!(meter.summary().unwrap().starts_with("FPS 50"));
    }
}
