use crate::models::params::{ColorMode, ConversionParameters, CurveMode, Hierarchical};

/// 具名的整組參數快照
#[derive(Clone, Debug, PartialEq)]
pub struct Preset {
    pub name: &'static str,
    pub label: &'static str,
    pub params: ConversionParameters,
}

pub const DEFAULT_PRESET: &str = "default";

pub fn builtin_presets() -> Vec<Preset> {
    vec![
        Preset {
            name: DEFAULT_PRESET,
            label: "預設 (Default)",
            params: ConversionParameters::default(),
        },
        Preset {
            name: "bw",
            label: "黑白 (BW)",
            params: ConversionParameters {
                color_mode: ColorMode::Bw,
                ..ConversionParameters::default()
            },
        },
        Preset {
            name: "poster",
            label: "海報 (Poster)",
            params: ConversionParameters {
                filter_speckle: 8,
                color_precision: 8,
                gradient_step: 64,
                ..ConversionParameters::default()
            },
        },
        Preset {
            name: "photo",
            label: "照片 (Photo)",
            params: ConversionParameters {
                color_mode: ColorMode::Color,
                hierarchical: Hierarchical::Stacked,
                curve_mode: CurveMode::Spline,
                filter_speckle: 2,
                color_precision: 8,
                gradient_step: 16,
                corner_threshold: 180,
                segment_length: 3.5,
                splice_threshold: 180,
                path_precision: 10,
            },
        },
    ]
}

/// 依名稱（不分大小寫）尋找內建預設
pub fn find_preset(name: &str) -> Option<Preset> {
    builtin_presets()
        .into_iter()
        .find(|p| p.name.eq_ignore_ascii_case(name.trim()))
}

impl ConversionParameters {
    /// 套用預設，一次覆寫所有欄位
    pub fn apply_preset(&mut self, preset: &Preset) {
        *self = preset.params.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applying_a_preset_overwrites_every_field() {
        for preset in builtin_presets() {
            let mut params = ConversionParameters {
                color_mode: ColorMode::Bw,
                hierarchical: Hierarchical::Cutout,
                curve_mode: CurveMode::Pixel,
                filter_speckle: 16,
                color_precision: 1,
                gradient_step: 0,
                corner_threshold: 0,
                segment_length: 10.0,
                splice_threshold: 0,
                path_precision: 1,
            };
            params.apply_preset(&preset);
            assert_eq!(params, preset.params, "preset {}", preset.name);
        }
    }

    #[test]
    fn applying_twice_is_idempotent() {
        let poster = find_preset("poster").unwrap();
        let mut params = ConversionParameters::default();
        params.apply_preset(&poster);
        let once = params.clone();
        params.apply_preset(&poster);
        assert_eq!(params, once);
        assert_eq!(params.gradient_step, 64);
        assert_eq!(params.filter_speckle, 8);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(find_preset("PHOTO").unwrap().params.path_precision, 10);
        assert_eq!(find_preset(" Bw ").unwrap().params.color_mode, ColorMode::Bw);
        assert!(find_preset("sketch").is_none());
    }

    #[test]
    fn builtin_presets_are_valid() {
        for preset in builtin_presets() {
            assert!(preset.params.validate().is_ok(), "preset {}", preset.name);
        }
    }

    #[test]
    fn labels_are_traditional_chinese() {
        let labels: Vec<&str> = builtin_presets().iter().map(|p| p.label).collect();
        assert_eq!(labels, vec!["預設 (Default)", "黑白 (BW)", "海報 (Poster)", "照片 (Photo)"]);
    }
}
