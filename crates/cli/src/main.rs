use anyhow::{anyhow, Result};
use chrono::{NaiveDateTime, NaiveTime, Timelike};
use clap::{Args, Parser, Subcommand, ValueEnum};
use photo_retag_core::{
    app_paths, apply_plan, generate_plan, load_config, read_details, save_config, AppConfig,
    DateRule, Disposal, ModifyPlan, PlanOptions, RelativeOffset, TAG_REFERENCE,
};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

#[derive(Debug, Parser)]
#[command(name = "photo-retag-cli")]
#[command(about = "JPG写真のファイル名と撮影日時をテンプレートと日時ルールで一括変更します")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Preview(RunArgs),
    Modify(ModifyArgs),
    Info(InfoArgs),
    Tags,
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
struct RunArgs {
    #[arg(long)]
    input: String,
    #[arg(long, default_value_t = false)]
    recursive: bool,
    #[arg(long, default_value_t = false)]
    include_hidden: bool,
    #[arg(long)]
    template: Option<String>,
    #[arg(long, default_value_t = 0)]
    offset_days: u32,
    #[arg(long)]
    offset_time: Option<String>,
    #[arg(long, default_value_t = false)]
    subtract: bool,
    #[arg(long, conflicts_with_all = ["offset_days", "offset_time", "subtract"])]
    set_date: Option<String>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
}

#[derive(Debug, Args)]
struct ModifyArgs {
    #[command(flatten)]
    run: RunArgs,
    #[arg(long, default_value_t = false)]
    delete_original: bool,
}

#[derive(Debug, Args)]
struct InfoArgs {
    #[arg(long)]
    path: String,
}

#[derive(Debug, Args)]
struct ConfigArgs {
    #[command(subcommand)]
    action: ConfigAction,
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    Show,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Preview(args) => cmd_preview(args),
        Commands::Modify(args) => cmd_modify(args),
        Commands::Info(args) => cmd_info(args),
        Commands::Tags => cmd_tags(),
        Commands::Config(config) => match config.action {
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

fn cmd_preview(args: RunArgs) -> Result<()> {
    let config = load_config().unwrap_or_default();
    let plan = generate_plan(&plan_options(&args, &config)?)?;
    print_plan(&plan, args.output)?;
    eprintln!("dry-runモード: 実ファイルは変更していません。適用するには modify を使用してください。");
    Ok(())
}

fn cmd_modify(args: ModifyArgs) -> Result<()> {
    let config = load_config().unwrap_or_default();
    let options = plan_options(&args.run, &config)?;
    let plan = generate_plan(&options)?;
    print_plan(&plan, args.run.output)?;

    let disposal = if args.delete_original || !config.use_trash {
        Disposal::Delete
    } else {
        Disposal::Trash
    };

    let cancel = AtomicBool::new(false);
    let outcome = apply_plan(&plan, disposal, &cancel, |index, total| {
        eprintln!("処理中: {}/{}", index + 1, total);
    });

    for failure in &outcome.failures {
        eprintln!("失敗: {} ({})", failure.path.display(), failure.reason);
    }
    eprintln!(
        "適用完了: リネーム{}件 / 日時変更{}件 / 変更なし{}件 / 失敗{}件",
        outcome.renamed,
        outcome.retagged,
        outcome.unchanged,
        outcome.failures.len()
    );

    if let Err(err) = persist_last_used(config, &options) {
        eprintln!("設定の保存に失敗しました: {err}");
    }
    Ok(())
}

fn cmd_info(args: InfoArgs) -> Result<()> {
    let details = read_details(PathBuf::from(&args.path).as_path())?;
    let absent = "-".to_string();

    println!("ファイル名: {}", details.metadata.filename);
    println!("ファイルサイズ: {}", details.filesize_display());
    println!(
        "撮影日時: {}",
        details
            .metadata
            .date_taken
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| absent.clone())
    );
    println!(
        "カメラメーカー: {}",
        details.metadata.camera_maker.as_deref().unwrap_or(&absent)
    );
    println!(
        "カメラ機種: {}",
        details.metadata.camera_model.as_deref().unwrap_or(&absent)
    );
    println!(
        "レンズ: {}",
        details.lens_model.as_deref().unwrap_or(&absent)
    );
    println!(
        "F値: {}",
        details.f_stop_display().unwrap_or_else(|| absent.clone())
    );
    println!(
        "露出時間: {}",
        details.exposure_display().unwrap_or_else(|| absent.clone())
    );
    println!(
        "ISO感度: {}",
        details
            .iso
            .map(|v| v.to_string())
            .unwrap_or_else(|| absent.clone())
    );
    println!(
        "焦点距離: {}",
        details
            .focal_length_display()
            .unwrap_or_else(|| absent.clone())
    );
    println!(
        "解像度: {}",
        details
            .resolution_display()
            .unwrap_or_else(|| absent.clone())
    );
    Ok(())
}

fn cmd_tags() -> Result<()> {
    println!("使用できるタグ:");
    for (tag, description) in TAG_REFERENCE {
        println!("[{}]\t{}", tag, description);
    }
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config = load_config()?;
    let paths = app_paths()?;
    println!("設定ファイル: {}", paths.config_path.display());
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

fn plan_options(args: &RunArgs, config: &AppConfig) -> Result<PlanOptions> {
    Ok(PlanOptions {
        input: args.input.clone().into(),
        recursive: args.recursive || config.recursive_default,
        include_hidden: args.include_hidden,
        template: args
            .template
            .clone()
            .unwrap_or_else(|| config.template.clone()),
        date_rule: build_date_rule(args)?,
    })
}

fn build_date_rule(args: &RunArgs) -> Result<DateRule> {
    if let Some(raw) = args.set_date.as_deref() {
        return Ok(DateRule::Specific(parse_cli_datetime(raw)?));
    }

    if args.offset_days > 0 || args.offset_time.is_some() {
        let time = match args.offset_time.as_deref() {
            Some(raw) => NaiveTime::parse_from_str(raw, "%H:%M:%S")
                .map_err(|_| anyhow!("時刻オフセットの形式が不正です (hh:mm:ss): {raw}"))?,
            None => NaiveTime::MIN,
        };
        return Ok(DateRule::Relative(RelativeOffset {
            negative: args.subtract,
            days: args.offset_days,
            hours: time.hour(),
            minutes: time.minute(),
            seconds: time.second(),
        }));
    }

    Ok(DateRule::Unchanged)
}

fn parse_cli_datetime(raw: &str) -> Result<NaiveDateTime> {
    let candidates = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y:%m:%d %H:%M:%S",
    ];
    candidates
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw.trim(), fmt).ok())
        .ok_or_else(|| anyhow!("日時指定の形式が不正です (YYYY-MM-DD hh:mm:ss): {raw}"))
}

fn persist_last_used(mut config: AppConfig, options: &PlanOptions) -> Result<()> {
    config.template = options.template.clone();
    if let DateRule::Relative(offset) = &options.date_rule {
        config.relative_offset_seconds = offset.total_seconds();
    }
    save_config(&config)
}

fn print_plan(plan: &ModifyPlan, output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(plan)?);
        }
        OutputFormat::Table => {
            print_table(plan);
        }
    }
    Ok(())
}

fn print_table(plan: &ModifyPlan) {
    println!("元ファイル -> 新ファイル (撮影日時)");
    for item in &plan.items {
        let date_display = item
            .conversion
            .new_date_taken
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "変更なし".to_string());
        println!(
            "{} -> {} ({})",
            item.path.display(),
            item.target_filename(),
            date_display
        );
    }
    for failure in &plan.failures {
        println!("読み込み失敗: {} ({})", failure.path.display(), failure.reason);
    }

    println!(
        "\n集計: scanned={} jpg={} non_jpg_skip={} hidden_skip={} planned={} unchanged={} unreadable={}",
        plan.stats.scanned_files,
        plan.stats.jpg_files,
        plan.stats.skipped_non_jpg,
        plan.stats.skipped_hidden,
        plan.stats.planned,
        plan.stats.unchanged,
        plan.stats.unreadable
    );
}
