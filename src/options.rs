use crate::segment::MIN_CURVE_SAMPLES;

/// Colour used when no fill can be resolved for a path, or it resolves to
/// `none`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum FillDefault {
    #[default]
    Black,
    White,
}

impl FillDefault {
    pub fn key(&self) -> &'static str {
        match self {
            FillDefault::Black => "#000000",
            FillDefault::White => "#ffffff",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub fill_default: FillDefault,
    /// Parametric steps per curve when sampling for bounds and flattening.
    pub curve_samples: usize,
    /// Upper bound on segments a single path element may produce.
    pub max_segments_per_path: Option<usize>,
    /// Declared size used when the root carries neither viewBox nor width/height.
    pub fallback_size: (f32, f32),
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            fill_default: FillDefault::Black,
            curve_samples: 16,
            max_segments_per_path: Some(1_000_000),
            fallback_size: (100.0, 100.0),
        }
    }
}

impl ExtractOptions {
    pub fn samples(&self) -> usize {
        self.curve_samples.max(MIN_CURVE_SAMPLES)
    }
}
