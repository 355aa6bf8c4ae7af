use anyhow::Result;
use chw_viz::selection::{Brush, BrushCoordinator, BrushSource, Range};
use chw_viz::viz::{self, ChartConfig, ChartKind, Theme, ViewParams};
use chw_viz::{dataset, stats, storage};
use chw_viz::{Attribute, Dataset};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "chw",
    version,
    about = "Load, cross-filter, visualize & summarize country health & wealth data"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render charts (and optionally export data and print stats).
    Render(RenderArgs),
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ChartArg {
    All,
    GdpHistogram,
    LifeHistogram,
    Scatter,
    YearScatter,
    Choropleth,
    Trend,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum AttributeArg {
    Gdp,
    Life,
    Population,
}

impl From<AttributeArg> for Attribute {
    fn from(a: AttributeArg) -> Self {
        match a {
            AttributeArg::Gdp => Attribute::Gdp,
            AttributeArg::Life => Attribute::LifeExpectancy,
            AttributeArg::Population => Attribute::Population,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ThemeArg {
    Light,
    Dark,
    Muted,
}

impl From<ThemeArg> for Theme {
    fn from(t: ThemeArg) -> Self {
        match t {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
            ThemeArg::Muted => Theme::Muted,
        }
    }
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Merged health/wealth CSV (country,code,year,gdp,life_expectancy).
    #[arg(short, long)]
    data: PathBuf,
    /// Optional per-country/year population CSV to join in.
    #[arg(long)]
    population: Option<PathBuf>,
    /// GeoJSON world boundary file (required for the choropleth).
    #[arg(long)]
    geojson: Option<PathBuf>,
    /// Directory the SVG files are written to.
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,
    /// Which chart to render.
    #[arg(long, value_enum, default_value = "all")]
    chart: ChartArg,
    /// Attribute coloring the choropleth.
    #[arg(short, long, value_enum, default_value = "gdp")]
    attribute: AttributeArg,
    /// Country for the trend view and year-scatter highlight.
    #[arg(short, long)]
    country: Option<String>,
    /// Year for the single-year views (default: latest in the data).
    #[arg(short, long)]
    year: Option<i32>,
    /// Color theme.
    #[arg(long, value_enum, default_value = "light")]
    theme: ThemeArg,
    /// Override width of a single chart (ignored with --chart all).
    #[arg(long)]
    width: Option<u32>,
    /// Override height of a single chart (ignored with --chart all).
    #[arg(long)]
    height: Option<u32>,
    /// GDP histogram brush as MIN:MAX.
    #[arg(long)]
    gdp_range: Option<String>,
    /// Life-expectancy histogram brush as MIN:MAX.
    #[arg(long)]
    life_range: Option<String>,
    /// Scatterplot brush as GDPMIN:GDPMAX/LIFEMIN:LIFEMAX.
    #[arg(long)]
    scatter_range: Option<String>,
    /// Save the tidy records to a file (format inferred by --format or extension).
    #[arg(long)]
    export: Option<PathBuf>,
    /// Export format (csv or json). If omitted, inferred from --export extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
    /// Print per-attribute statistics to stdout.
    #[arg(long, default_value_t = false)]
    stats: bool,
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => {
            // Format up to 4 decimals, then trim trailing zeros and trailing dot.
            let s = format!("{:.4}", x);
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
        _ => "NA".to_string(),
    }
}

fn parse_range(s: &str) -> Option<Range> {
    let (a, b) = s.split_once(':')?;
    Some(Range::new(a.trim().parse().ok()?, b.trim().parse().ok()?))
}

fn parse_scatter_range(s: &str) -> Option<(Range, Range)> {
    let (gdp, life) = s.split_once('/')?;
    Some((parse_range(gdp)?, parse_range(life)?))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
    }
}

fn cmd_render(args: RenderArgs) -> Result<()> {
    let mut records = dataset::load_records(&args.data)?;
    if let Some(pop) = args.population.as_ref() {
        dataset::merge_population(&mut records, pop)?;
    }
    let data = Dataset::new(records);

    let world = match args.geojson.as_ref() {
        Some(path) => Some(dataset::load_world(path)?),
        None => None,
    };

    let mut brushes = BrushCoordinator::new();
    if let Some(s) = args.gdp_range.as_deref() {
        let range =
            parse_range(s).ok_or_else(|| anyhow::anyhow!("invalid --gdp-range, expected MIN:MAX"))?;
        brushes.update(
            BrushSource::GdpHistogram,
            Some(Brush::Interval(Attribute::Gdp, range)),
        );
    }
    if let Some(s) = args.life_range.as_deref() {
        let range = parse_range(s)
            .ok_or_else(|| anyhow::anyhow!("invalid --life-range, expected MIN:MAX"))?;
        brushes.update(
            BrushSource::LifeHistogram,
            Some(Brush::Interval(Attribute::LifeExpectancy, range)),
        );
    }
    if let Some(s) = args.scatter_range.as_deref() {
        let (gdp, life) = parse_scatter_range(s).ok_or_else(|| {
            anyhow::anyhow!("invalid --scatter-range, expected GDPMIN:GDPMAX/LIFEMIN:LIFEMAX")
        })?;
        brushes.update(BrushSource::Scatterplot, Some(Brush::Region { gdp, life }));
    }

    let params = ViewParams {
        attribute: args.attribute.into(),
        country: args.country.clone(),
        year: args.year,
        theme: args.theme.into(),
    };

    std::fs::create_dir_all(&args.out_dir)?;
    let written = match args.chart {
        ChartArg::All => viz::render_all(&data, world.as_ref(), &params, &brushes, &args.out_dir)?,
        single => {
            let kind = match single {
                ChartArg::GdpHistogram => ChartKind::GdpHistogram,
                ChartArg::LifeHistogram => ChartKind::LifeHistogram,
                ChartArg::Scatter => ChartKind::Scatter,
                ChartArg::YearScatter => ChartKind::YearScatter,
                ChartArg::Choropleth => ChartKind::Choropleth,
                ChartArg::Trend => ChartKind::Trend,
                ChartArg::All => unreachable!(),
            };
            vec![render_one(kind, &data, world.as_ref(), &params, &brushes, &args)?]
        }
    };
    for path in &written {
        eprintln!("Wrote {}", path.display());
    }

    if let Some(path) = args.export.as_ref() {
        let fmt = match args.format {
            Some(OutFormat::Csv) => "csv",
            Some(OutFormat::Json) => "json",
            None => path.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
        }
        .to_ascii_lowercase();
        match fmt.as_str() {
            "csv" => storage::save_csv(data.records(), path)?,
            "json" => storage::save_json(data.records(), path)?,
            other => anyhow::bail!("unsupported format: {}", other),
        }
        eprintln!("Saved {} rows to {}", data.len(), path.display());
    }

    if args.stats {
        for s in stats::attribute_summary(data.records()) {
            println!(
                "{}  count={} missing={}  min={} max={} mean={} median={}",
                s.attribute,
                s.count,
                s.missing,
                fmt_opt(s.min),
                fmt_opt(s.max),
                fmt_opt(s.mean),
                fmt_opt(s.median)
            );
        }
    }

    Ok(())
}

fn render_one(
    kind: ChartKind,
    data: &Dataset,
    world: Option<&chw_viz::WorldMap>,
    params: &ViewParams,
    brushes: &BrushCoordinator,
    args: &RenderArgs,
) -> Result<PathBuf> {
    let year = params
        .resolve_year(data)
        .ok_or_else(|| anyhow::anyhow!("dataset has no years"))?;
    let year_records = data.for_year(year);
    let selection = brushes.selection(&year_records);

    let mut cfg = ChartConfig::for_kind(kind, params.theme);
    if let Some(w) = args.width {
        cfg.width = w;
    }
    if let Some(h) = args.height {
        cfg.height = h;
    }
    let path = args.out_dir.join(kind.file_name());

    match kind {
        ChartKind::GdpHistogram => {
            viz::histogram::render(&year_records, Attribute::Gdp, &selection, &cfg, &path)?
        }
        ChartKind::LifeHistogram => viz::histogram::render(
            &year_records,
            Attribute::LifeExpectancy,
            &selection,
            &cfg,
            &path,
        )?,
        ChartKind::Scatter => viz::scatter::render(&year_records, &selection, &cfg, &path)?,
        ChartKind::YearScatter => viz::scatter::render_year(
            data.records(),
            year,
            params.resolve_country(data).as_deref(),
            &cfg,
            &path,
        )?,
        ChartKind::Choropleth => {
            let world =
                world.ok_or_else(|| anyhow::anyhow!("--geojson is required for the choropleth"))?;
            viz::choropleth::render(world, &year_records, params.attribute, &selection, &cfg, &path)?
        }
        ChartKind::Trend => {
            let country = params.resolve_country(data).unwrap_or_default();
            viz::trend::render(data.records(), &country, Some(year), &cfg, &path)?
        }
    }
    Ok(path)
}
