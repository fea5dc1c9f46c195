use std::io;
use clap::Parser;
use crate::config::config::Cli;
use crate::action::interactive::process_interactive_mode;
use crate::utils::utils::setup_logging;
use crate::config::ports::{AppConfig, ConfigPort};
use crate::facade::conversion_facade::ConversionFacade;
use crate::facade::traits::i_conversion::ConversionFacadeTrait;
use crate::models::conversion::ConversionOutput;
use crate::models::params::{format_float, ConversionParameters};
use crate::models::preset::{builtin_presets, find_preset, DEFAULT_PRESET};
use crate::service::converter::locate_converter;
use crate::service::settings::{PersistedSettings, SettingsStore};

pub fn process_args(args: Vec<String>) -> io::Result<Option<ConversionOutput>> {
    if args.len() == 1 {
        process_interactive_mode().map(Some)
    } else {
        process_cli_mode()
    }
}

pub fn process_cli_mode() -> io::Result<Option<ConversionOutput>> {
    let cli = Cli::parse();
    setup_logging(&cli.log_level)?;

    if cli.list_presets {
        print_presets();
        return Ok(None);
    }

    let settings = SettingsStore::new(&cli.config).load();
    let facade = ConversionFacade::new(Box::new(CliConfigAdapter::new(cli, settings)));
    facade.execute_conversion().map(Some)
}

pub fn print_presets() {
    for preset in builtin_presets() {
        let p = &preset.params;
        println!(
            "{:<8} {}：colormode={} hierarchical={} mode={} filter_speckle={} color_precision={} gradient_step={} corner_threshold={} segment_length={} splice_threshold={} path_precision={}",
            preset.name, preset.label, p.color_mode, p.hierarchical, p.curve_mode, p.filter_speckle,
            p.color_precision, p.gradient_step, p.corner_threshold, format_float(p.segment_length),
            p.splice_threshold, p.path_precision
        );
    }
}

// CLI 配置適配器：命令列優先，未指定者沿用保存的設定
pub struct CliConfigAdapter {
    cli: Cli,
    settings: PersistedSettings,
}

impl CliConfigAdapter {
    pub fn new(cli: Cli, settings: PersistedSettings) -> Self {
        CliConfigAdapter { cli, settings }
    }
}

impl ConfigPort for CliConfigAdapter {
    fn get_config(&self) -> io::Result<AppConfig> {
        let preset_name = self.cli.preset.clone().unwrap_or_else(|| DEFAULT_PRESET.to_string());
        let preset = find_preset(&preset_name).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("未知的預設: {}（可用：default、bw、poster、photo）", preset_name),
            )
        })?;

        let mut params = ConversionParameters::default();
        params.apply_preset(&preset);
        self.cli.apply_overrides(&mut params);
        if params != preset.params {
            log::info!("以預設 {} 為基礎，套用自訂參數", preset.name);
        }

        let input = self.cli.input.clone().unwrap_or_else(|| self.settings.input.clone());
        let input_changed = self
            .cli
            .input
            .as_deref()
            .is_some_and(|i| i != self.settings.input);
        let output = match &self.cli.output {
            Some(output) => output.clone(),
            // 輸入目錄與上次不同時，輸出改用預設規則
            None if input_changed => String::new(),
            None => self.settings.output.clone(),
        };

        Ok(AppConfig {
            input,
            output,
            subdirs: self.cli.subdirs.unwrap_or(self.settings.subdirs),
            delete: self.cli.delete.unwrap_or(self.settings.delete),
            preset: preset.name.to_string(),
            params,
            converter: locate_converter(self.cli.converter.as_deref()),
            settings_path: self.cli.config.clone(),
            no_progress: self.cli.no_progress,
        })
    }
}
