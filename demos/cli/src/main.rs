use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use serde_json::Value;
use timeline_core::{
    cache_token, load, AppState, Effect, LoadError, LoadStatus, Preferences, RenderedTimeline,
    SortOrder, Theme, TimelineConfig, ViewMode, Viewport,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod http;

#[derive(Parser, Debug)]
#[command(
    name = "timeline-cli",
    about = "Dựng timeline từ file JSON tĩnh hoặc URL, in tóm tắt hoặc xuất HTML."
)]
struct Args {
    /// Đường dẫn hoặc URL http(s) tới timeline.json (mặc định lấy `source` trong cấu hình).
    #[arg(short, long)]
    input: Option<String>,

    /// File cấu hình TOML.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long, default_value = "graph")]
    view: ViewMode,

    #[arg(long, default_value = "asc")]
    sort: SortOrder,

    #[arg(long, default_value = "light")]
    theme: Theme,

    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    #[arg(long, default_value_t = 800.0)]
    height: f64,

    /// Ghi trang HTML ra file thay vì in tóm tắt.
    #[arg(long)]
    html: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "timeline_core=debug,timeline_cli=debug"
    } else {
        "timeline_core=info,timeline_cli=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match &args.config {
        Some(path) => read_config(path)?,
        None => TimelineConfig::default(),
    };
    let source = args.input.clone().unwrap_or_else(|| config.source.clone());

    let preferences = Preferences {
        theme: args.theme,
        view: args.view,
        sort: args.sort,
    };
    let (state, effects) = AppState::new(preferences).on_reload();
    let request = effects
        .into_iter()
        .find_map(|effect| match effect {
            Effect::Fetch(request) => Some(request),
            _ => None,
        })
        .context("Lệnh tải lại không yêu cầu tải dữ liệu")?;

    let (result, scheme) = if http::is_remote(&source) {
        let fetcher = http::HttpFetch::new()?;
        (load(&fetcher, &source, cache_token()).await, None)
    } else {
        (read_local(Path::new(&source))?, Some("file:"))
    };
    let (state, _) = state.on_load_finished(request, result, scheme);

    if let LoadStatus::Failed(message) = &state.status {
        anyhow::bail!("{message}");
    }

    let frame = state.frame(Viewport::new(args.width, args.height), &config.layout);
    match &args.html {
        Some(path) => {
            std::fs::write(path, page_html(&frame, args.theme))
                .with_context(|| format!("Không ghi được file {path:?}"))?;
            tracing::info!(path = %path.display(), cards = frame.card_count(), "wrote timeline page");
        }
        None => print_summary(&state, &frame),
    }

    Ok(())
}

fn read_config(path: &Path) -> anyhow::Result<TimelineConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Không đọc được file cấu hình {path:?}"))?;
    let config: TimelineConfig =
        toml::from_str(&text).with_context(|| format!("Cấu hình {path:?} không hợp lệ"))?;
    config.validate()?;
    Ok(config)
}

fn read_local(path: &Path) -> anyhow::Result<Result<Value, LoadError>> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("Không đọc được file {path:?}"))?;
    Ok(serde_json::from_str(&text).map_err(|err| LoadError::Malformed(err.to_string())))
}

fn print_summary(state: &AppState, frame: &RenderedTimeline) {
    let years = state.events.iter().map(|event| event.year);
    let span = years
        .clone()
        .min()
        .zip(years.max())
        .map(|(first, last)| format!("{first}–{last}"))
        .unwrap_or_else(|| "--".to_string());

    println!(
        "Timeline events: {}\nYear span: {span}\nView: {} / {}",
        state.events.len(),
        state.preferences.view,
        state.preferences.sort
    );

    if let RenderedTimeline::Cards { cards, .. } = frame {
        for card in cards {
            println!("  {:<16} {}", card.date_label, card.title);
        }
    }
}

const PAGE_STYLE: &str = r#"
body { margin: 0; font-family: system-ui, sans-serif; background: #f8fafc; color: #1f2933; }
body[data-theme="dark"] { background: #0b111a; color: #e6edf7; }
body[data-theme="sepia"] { background: #f4ecd8; color: #4a3b28; }
.timeline-track { position: relative; display: flex; gap: 16px; padding: 20px; }
.timeline-track[data-view="graph"] { display: block; padding: 0; }
.timeline-track[data-view="vertical"] { flex-direction: column; max-width: 640px; margin: 0 auto; }
.timeline-card { position: relative; width: 240px; padding: 14px 16px; border-radius: 12px; border: 1px solid rgba(148, 163, 184, 0.4); background: rgba(255, 255, 255, 0.06); }
.timeline-track[data-view="graph"] .timeline-card { position: absolute; }
.timeline-swatch { display: inline-block; width: 10px; height: 10px; margin-right: 8px; border-radius: 50%; }
.timeline-date { font-size: 12px; font-weight: 600; }
.timeline-title { margin: 6px 0 4px; font-size: 16px; }
.timeline-description { margin: 0; font-size: 14px; opacity: 0.8; }
.timeline-state { padding: 48px 24px; text-align: center; }
"#;

fn page_html(frame: &RenderedTimeline, theme: Theme) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"vi\">\n<head>\n<meta charset=\"utf-8\">\n<title>Timeline</title>\n<style>{PAGE_STYLE}</style>\n</head>\n<body data-theme=\"{theme}\">\n{}\n</body>\n</html>\n",
        frame.to_html()
    )
}
