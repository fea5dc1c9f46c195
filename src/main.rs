use std::process::ExitCode;

use pic_to_svg::action::cli::process_args;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    match process_args(args) {
        Ok(Some(output)) => {
            let summary = &output.summary;
            log::info!("程式執行完成，輸出目錄：{}", output.output_path);
            if summary.total == 0 {
                println!("未找到圖片");
            } else {
                println!(
                    "完成! 成功: {}/{}，輸出檔案位於：{}",
                    summary.succeeded, summary.total, output.output_path
                );
                if !output.all_succeeded() {
                    println!("部分檔案未成功轉換，詳見上方日誌");
                }
            }
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("錯誤：{}", e);
            ExitCode::FAILURE
        }
    }
}
