// ==========================================
// GCP 编辑器 - 命令行入口
// ==========================================
// 用法:
//   gcp-editor import <file> [format]
//   gcp-editor export <format> <out_dir>
//   gcp-editor groups
//   gcp-editor match <gcp_name> <image>...
// 数据库: GCP_EDITOR_DB_PATH 或用户数据目录
// ==========================================

use anyhow::{bail, Context, Result};
use gcp_editor::app::{get_default_db_path, AppState};
use gcp_editor::delivery::LocalDirSink;
use gcp_editor::domain::types::{AssociationState, GcpFormat};
use gcp_editor::logging;

const USAGE: &str = "用法:
  gcp-editor import <file> [format]
  gcp-editor export <format> <out_dir>
  gcp-editor groups
  gcp-editor match <gcp_name> <image>...

format: csv-7field | text-whitespace-7field | csv-3field | text-3field";

fn parse_format(value: &str) -> Result<GcpFormat> {
    value.parse::<GcpFormat>().map_err(anyhow::Error::msg)
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        println!("{}", USAGE);
        return Ok(());
    };

    let db_path = get_default_db_path();
    tracing::info!(version = gcp_editor::VERSION, db_path = %db_path, "{}", gcp_editor::APP_NAME);
    let state = AppState::new(db_path).map_err(anyhow::Error::msg)?;

    match command.as_str() {
        "import" => {
            let file = args.get(1).context("缺少参数 <file>")?;
            let format = args.get(2).map(|f| parse_format(f)).transpose()?;
            let response = state.import_api.import_file(file, format).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        "export" => {
            let format = parse_format(args.get(1).context("缺少参数 <format>")?)?;
            let out_dir = args.get(2).context("缺少参数 <out_dir>")?;
            let file = state.export_api.export_points(format)?;
            let sink = LocalDirSink::new(out_dir);
            let location = state.export_api.deliver(&file, &sink).await?;
            println!("{}", location);
        }
        "groups" => {
            let groups = state.image_api.list_groups()?;
            println!("{}", serde_json::to_string_pretty(&groups)?);
        }
        "match" => {
            let gcp_name = args.get(1).context("缺少参数 <gcp_name>")?;
            let images = &args[2..];
            if images.is_empty() {
                bail!("至少需要一个影像名");
            }

            let mut session = state.image_api.open_session(gcp_name, images)?;
            // 命令行列出的影像全部关联
            let pending: Vec<usize> = session
                .images()
                .iter()
                .enumerate()
                .filter(|(_, i)| i.state == AssociationState::Unassociated)
                .map(|(index, _)| index)
                .collect();
            for index in pending {
                state.image_api.toggle(&mut session, index)?;
            }

            let summary = state.image_api.save(&session)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        other => {
            eprintln!("未知命令: {}\n\n{}", other, USAGE);
            std::process::exit(2);
        }
    }

    Ok(())
}
