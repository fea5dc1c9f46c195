use std::fmt;
use std::io;
use std::ops::RangeInclusive;

use clap::ValueEnum;

pub const FILTER_SPECKLE_RANGE: RangeInclusive<u32> = 0..=16;
pub const COLOR_PRECISION_RANGE: RangeInclusive<u32> = 1..=8;
pub const GRADIENT_STEP_RANGE: RangeInclusive<u32> = 0..=64;
pub const CORNER_THRESHOLD_RANGE: RangeInclusive<u32> = 0..=180;
pub const SEGMENT_LENGTH_RANGE: RangeInclusive<f64> = 3.5..=10.0;
pub const SPLICE_THRESHOLD_RANGE: RangeInclusive<u32> = 0..=180;
pub const PATH_PRECISION_RANGE: RangeInclusive<u32> = 1..=10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Color,
    Bw,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Hierarchical {
    Stacked,
    Cutout,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CurveMode {
    Spline,
    Polygon,
    Pixel,
}

impl ColorMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorMode::Color => "color",
            ColorMode::Bw => "bw",
        }
    }
}

impl Hierarchical {
    pub fn as_str(&self) -> &'static str {
        match self {
            Hierarchical::Stacked => "stacked",
            Hierarchical::Cutout => "cutout",
        }
    }
}

impl CurveMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CurveMode::Spline => "spline",
            CurveMode::Polygon => "polygon",
            CurveMode::Pixel => "pixel",
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Hierarchical {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for CurveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 傳給外部轉換程式的全部參數
///
/// 部分欄位只在特定模式下有意義（見 [`ParamStates`]），但仍會保留數值，
/// 組裝命令列時才略過。
#[derive(Clone, Debug, PartialEq)]
pub struct ConversionParameters {
    pub color_mode: ColorMode,
    pub hierarchical: Hierarchical,
    pub curve_mode: CurveMode,
    pub filter_speckle: u32,
    pub color_precision: u32,
    pub gradient_step: u32,
    pub corner_threshold: u32,
    pub segment_length: f64,
    pub splice_threshold: u32,
    pub path_precision: u32,
}

/// 各個條件參數目前是否啟用
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParamStates {
    pub color_precision: bool,
    pub gradient_step: bool,
    pub hierarchical: bool,
    pub corner_threshold: bool,
    pub segment_length: bool,
    pub splice_threshold: bool,
}

impl Default for ConversionParameters {
    fn default() -> Self {
        ConversionParameters {
            color_mode: ColorMode::Color,
            hierarchical: Hierarchical::Stacked,
            curve_mode: CurveMode::Spline,
            filter_speckle: 4,
            color_precision: 6,
            gradient_step: 16,
            corner_threshold: 60,
            segment_length: 5.0,
            splice_threshold: 45,
            path_precision: 8,
        }
    }
}

impl ConversionParameters {
    pub fn is_color(&self) -> bool {
        self.color_mode == ColorMode::Color
    }

    pub fn uses_curves(&self) -> bool {
        self.curve_mode != CurveMode::Pixel
    }

    pub fn uses_splice(&self) -> bool {
        self.curve_mode == CurveMode::Spline
    }

    pub fn states(&self) -> ParamStates {
        ParamStates {
            color_precision: self.is_color(),
            gradient_step: self.is_color(),
            hierarchical: self.is_color(),
            corner_threshold: self.uses_curves(),
            segment_length: self.uses_curves(),
            splice_threshold: self.uses_splice(),
        }
    }

    /// 檢查所有數值是否落在外部程式接受的範圍內
    pub fn validate(&self) -> io::Result<()> {
        check_range("filter_speckle", self.filter_speckle, &FILTER_SPECKLE_RANGE)?;
        check_range("color_precision", self.color_precision, &COLOR_PRECISION_RANGE)?;
        check_range("gradient_step", self.gradient_step, &GRADIENT_STEP_RANGE)?;
        check_range("corner_threshold", self.corner_threshold, &CORNER_THRESHOLD_RANGE)?;
        check_range("splice_threshold", self.splice_threshold, &SPLICE_THRESHOLD_RANGE)?;
        check_range("path_precision", self.path_precision, &PATH_PRECISION_RANGE)?;
        if !SEGMENT_LENGTH_RANGE.contains(&self.segment_length) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "segment_length 超出範圍：{}（允許 {}-{}）",
                    self.segment_length,
                    SEGMENT_LENGTH_RANGE.start(),
                    SEGMENT_LENGTH_RANGE.end()
                ),
            ));
        }
        Ok(())
    }
}

fn check_range(name: &str, value: u32, range: &RangeInclusive<u32>) -> io::Result<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} 超出範圍：{}（允許 {}-{}）", name, value, range.start(), range.end()),
        ))
    }
}

/// 以至少一位小數輸出浮點數，例如 `5.0`、`3.5`
pub fn format_float(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(ConversionParameters::default().validate().is_ok());
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let mut params = ConversionParameters::default();
        params.filter_speckle = 17;
        assert_eq!(params.validate().unwrap_err().kind(), io::ErrorKind::InvalidInput);

        let mut params = ConversionParameters::default();
        params.segment_length = 3.4;
        assert!(params.validate().is_err());

        let mut params = ConversionParameters::default();
        params.color_precision = 0;
        assert!(params.validate().is_err());
    }

    #[test]
    fn states_follow_color_and_curve_mode() {
        let mut params = ConversionParameters::default();
        params.color_mode = ColorMode::Bw;
        params.curve_mode = CurveMode::Polygon;
        let states = params.states();
        assert!(!states.color_precision && !states.gradient_step && !states.hierarchical);
        assert!(states.corner_threshold && states.segment_length);
        assert!(!states.splice_threshold);

        params.curve_mode = CurveMode::Pixel;
        let states = params.states();
        assert!(!states.corner_threshold && !states.segment_length);
    }

    #[test]
    fn floats_keep_one_decimal() {
        assert_eq!(format_float(5.0), "5.0");
        assert_eq!(format_float(3.5), "3.5");
        assert_eq!(format_float(10.0), "10.0");
    }
}
