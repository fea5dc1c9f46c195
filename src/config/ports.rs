use std::io;
use std::path::PathBuf;

use crate::models::job::BatchJob;
use crate::models::params::ConversionParameters;

// 應用配置結構體，封裝一次執行所需的所有參數
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub input: String,
    pub output: String,
    pub subdirs: bool,
    pub delete: bool,
    pub preset: String,
    pub params: ConversionParameters,
    pub converter: PathBuf,
    pub settings_path: PathBuf,
    pub no_progress: bool,
}

impl AppConfig {
    pub fn to_batch_job(&self) -> BatchJob {
        BatchJob {
            input_dir: PathBuf::from(&self.input),
            output_dir: PathBuf::from(&self.output),
            recurse: self.subdirs,
            delete_original: self.delete,
            params: self.params.clone(),
        }
    }
}

// 配置來源的 Port
pub trait ConfigPort {
    fn get_config(&self) -> io::Result<AppConfig>;
}
