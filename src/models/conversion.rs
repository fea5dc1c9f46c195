use crate::models::job::JobSummary;

#[derive(Debug)]
pub struct ConversionOutput {
    pub output_path: String,
    pub processed_files: usize,
    pub summary: JobSummary,
}

impl ConversionOutput {
    pub fn all_succeeded(&self) -> bool {
        self.summary.succeeded == self.summary.total
    }
}
