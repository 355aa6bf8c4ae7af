//! Public types and constants for the visualization module.

use crate::models::Attribute;
use plotters::style::RGBColor;

/// The fixed set of views this crate renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    GdpHistogram,
    LifeHistogram,
    Scatter,
    YearScatter,
    Choropleth,
    Trend,
}

impl ChartKind {
    pub const ALL: [ChartKind; 6] = [
        ChartKind::GdpHistogram,
        ChartKind::LifeHistogram,
        ChartKind::Scatter,
        ChartKind::YearScatter,
        ChartKind::Choropleth,
        ChartKind::Trend,
    ];

    /// Output file name used by `render_all` and the binaries.
    pub fn file_name(&self) -> &'static str {
        match self {
            ChartKind::GdpHistogram => "gdp_histogram.svg",
            ChartKind::LifeHistogram => "life_histogram.svg",
            ChartKind::Scatter => "scatter.svg",
            ChartKind::YearScatter => "year_scatter.svg",
            ChartKind::Choropleth => "choropleth.svg",
            ChartKind::Trend => "trend.svg",
        }
    }

    /// Default canvas size for each view.
    pub fn default_size(&self) -> (u32, u32) {
        match self {
            ChartKind::GdpHistogram => (650, 350),
            ChartKind::LifeHistogram => (500, 350),
            ChartKind::Scatter => (700, 400),
            ChartKind::YearScatter => (640, 300),
            ChartKind::Choropleth => (880, 540),
            ChartKind::Trend => (640, 300),
        }
    }
}

/// Available color schemes; every view of one render pass shares a theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    /// Neutral palette on white.
    #[default]
    Light,
    /// Teal/violet accents on a dark page.
    Dark,
    /// Desaturated blues and greens.
    Muted,
}

/// Resolved colors for one theme.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub background: RGBColor,
    pub text: RGBColor,
    pub caption: RGBColor,
    pub axis: RGBColor,
    pub gdp: RGBColor,
    pub life: RGBColor,
    pub population: RGBColor,
    /// Highlighted-country fill in the year scatter.
    pub accent: RGBColor,
    /// Dashed year-marker stroke in the trend view.
    pub marker: RGBColor,
    pub map_water: RGBColor,
    pub map_border: RGBColor,
    pub no_data: RGBColor,
}

const LIGHT: Palette = Palette {
    background: RGBColor(255, 255, 255),
    text: RGBColor(44, 62, 80),
    caption: RGBColor(74, 85, 104),
    axis: RGBColor(139, 149, 164),
    gdp: RGBColor(70, 130, 180),
    life: RGBColor(46, 139, 87),
    population: RGBColor(106, 81, 163),
    accent: RGBColor(230, 126, 34),
    marker: RGBColor(139, 115, 85),
    map_water: RGBColor(238, 241, 244),
    map_border: RGBColor(176, 184, 196),
    no_data: RGBColor(221, 226, 232),
};

const DARK: Palette = Palette {
    background: RGBColor(13, 17, 23),
    text: RGBColor(230, 237, 243),
    caption: RGBColor(139, 148, 158),
    axis: RGBColor(139, 148, 158),
    gdp: RGBColor(0, 212, 170),
    life: RGBColor(124, 58, 237),
    population: RGBColor(91, 155, 213),
    accent: RGBColor(230, 126, 34),
    marker: RGBColor(139, 115, 85),
    map_water: RGBColor(22, 27, 34),
    map_border: RGBColor(48, 54, 61),
    no_data: RGBColor(33, 38, 45),
};

const MUTED: Palette = Palette {
    background: RGBColor(253, 252, 251),
    text: RGBColor(44, 62, 80),
    caption: RGBColor(74, 85, 104),
    axis: RGBColor(139, 149, 164),
    gdp: RGBColor(74, 123, 167),
    life: RGBColor(61, 122, 95),
    population: RGBColor(122, 103, 148),
    accent: RGBColor(230, 126, 34),
    marker: RGBColor(139, 115, 85),
    map_water: RGBColor(238, 241, 244),
    map_border: RGBColor(176, 184, 196),
    no_data: RGBColor(221, 226, 232),
};

impl Theme {
    pub fn palette(&self) -> &'static Palette {
        match self {
            Theme::Light => &LIGHT,
            Theme::Dark => &DARK,
            Theme::Muted => &MUTED,
        }
    }

    /// Series/bar fill for an attribute.
    pub fn series_color(&self, attr: Attribute) -> RGBColor {
        let p = self.palette();
        match attr {
            Attribute::Gdp => p.gdp,
            Attribute::LifeExpectancy => p.life,
            Attribute::Population => p.population,
        }
    }
}

/// Sequential ramp endpoints for the choropleth fill, per attribute: blues
/// for GDP, greens for life expectancy, purples for population. Identical in
/// every theme so toggling the attribute changes fills and legend only.
pub fn ramp_stops(attr: Attribute) -> (RGBColor, RGBColor) {
    match attr {
        Attribute::Gdp => (RGBColor(239, 243, 255), RGBColor(8, 48, 107)),
        Attribute::LifeExpectancy => (RGBColor(237, 248, 233), RGBColor(0, 68, 27)),
        Attribute::Population => (RGBColor(252, 251, 253), RGBColor(63, 0, 125)),
    }
}

/// Size and theme shared by all renderers of one render pass.
#[derive(Debug, Clone, Copy)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
    pub theme: Theme,
}

impl ChartConfig {
    pub fn for_kind(kind: ChartKind, theme: Theme) -> Self {
        let (width, height) = kind.default_size();
        Self {
            width,
            height,
            theme,
        }
    }
}
