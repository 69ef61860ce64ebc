use std::f64::consts::PI;

/// Decoded mono PCM audio held in memory.
///
/// Samples are `f32` in `[-1.0, 1.0]`. All timeline arithmetic is done in
/// whole samples so that durations add up exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

/// Number of samples covering `duration_ms` at `sample_rate`.
pub fn samples_for(duration_ms: u64, sample_rate: u32) -> usize {
    (duration_ms * sample_rate as u64 / 1000) as usize
}

/// Convert a gain in dB into a linear amplitude factor.
pub fn db_to_amplitude(db: f32) -> f32 {
    10f32.powf(db / 20.0)
}

impl AudioClip {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn empty(sample_rate: u32) -> Self {
        Self::new(Vec::new(), sample_rate)
    }

    pub fn silent(duration_ms: u64, sample_rate: u32) -> Self {
        Self::new(vec![0.0; samples_for(duration_ms, sample_rate)], sample_rate)
    }

    /// Full-scale sine wave of `len` samples.
    pub fn sine(frequency_hz: f32, len: usize, sample_rate: u32) -> Self {
        let cycles_per_sample = frequency_hz as f64 / sample_rate as f64;
        let samples = (0..len)
            // Only the fractional cycle matters, which keeps long tones precise
            .map(|n| ((n as f64 * cycles_per_sample).fract() * 2.0 * PI).sin() as f32)
            .collect();
        Self::new(samples, sample_rate)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 {
            return 0;
        }
        self.samples.len() as u64 * 1000 / self.sample_rate as u64
    }

    /// Append `other` at the end. Both clips must share a sample rate.
    pub fn append(&mut self, other: &AudioClip) {
        debug_assert_eq!(self.sample_rate, other.sample_rate);
        self.samples.extend_from_slice(&other.samples);
    }

    pub fn apply_gain_db(mut self, db: f32) -> Self {
        let factor = db_to_amplitude(db);
        for sample in &mut self.samples {
            *sample *= factor;
        }
        self
    }

    /// Cut the clip down to at most `len` samples.
    pub fn truncated_to(mut self, len: usize) -> Self {
        self.samples.truncate(len);
        self
    }

    /// Repeat the clip until it covers `len` samples, then cut to exactly `len`.
    ///
    /// An empty clip cannot be repeated and is padded with silence instead.
    pub fn looped_to(self, len: usize) -> Self {
        if self.samples.len() >= len {
            return self.truncated_to(len);
        }
        if self.samples.is_empty() {
            return Self::new(vec![0.0; len], self.sample_rate);
        }
        let samples = self.samples.iter().copied().cycle().take(len).collect();
        Self::new(samples, self.sample_rate)
    }

    /// Additive mix of `other` onto `self`, both starting at time 0.
    ///
    /// The result keeps the length of `self`; anything in `other` past that
    /// point is dropped. Sums are clamped to full scale.
    pub fn overlay(mut self, other: &AudioClip) -> Self {
        debug_assert_eq!(self.sample_rate, other.sample_rate);
        for (sample, extra) in self.samples.iter_mut().zip(other.samples.iter()) {
            *sample = (*sample + extra).clamp(-1.0, 1.0);
        }
        self
    }

    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()))
    }
}
