/*!
 * GUI application for chw-viz - country health & wealth data explorer
 *
 * A cross-platform desktop application providing an intuitive interface for:
 * - Loading the health/wealth CSV, population CSV, and world boundary file
 * - Brushing value ranges and seeing the linked selection count
 * - Choosing attribute, country, year, and theme, then rendering the charts
 *
 * Platform support: Windows, macOS, Linux
 */

use chw_viz::selection::{Brush, BrushCoordinator, BrushSource, Range};
use chw_viz::viz::{self, Theme, ViewParams};
use chw_viz::{Attribute, Dataset, WorldMap, dataset};
use eframe::egui;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

fn main() -> Result<(), eframe::Error> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([780.0, 640.0])
            .with_min_inner_size([600.0, 420.0])
            .with_title("Country Health & Wealth - chw-viz"),
        ..Default::default()
    };

    eframe::run_native(
        "Country Health & Wealth",
        options,
        Box::new(|_cc| Ok(Box::new(ChwApp::new()))),
    )
}

/// Everything the one-time background load hands back.
struct Loaded {
    dataset: Dataset,
    world: Option<WorldMap>,
    countries: Vec<String>,
    years: Vec<i32>,
    gdp_extent: (f64, f64),
    life_extent: (f64, f64),
}

enum LoadResult {
    Success(Box<Loaded>),
    Error(String),
}

#[derive(Debug)]
enum OperationResult {
    Success(String),
    Error(String),
}

/// One editable brush range in the side panel.
#[derive(Debug, Clone, Copy, Default)]
struct BrushInput {
    active: bool,
    min: f64,
    max: f64,
}

impl BrushInput {
    fn range(&self) -> Option<Range> {
        self.active.then(|| Range::new(self.min, self.max))
    }

    fn seed(&mut self, (lo, hi): (f64, f64)) {
        self.min = lo;
        self.max = hi;
    }
}

/// Main application state
struct ChwApp {
    // Input files
    data_path: String,
    population_path: String,
    geojson_path: String,

    // Render options
    output_path: String,
    attribute: Attribute,
    country: String,
    year: i32,
    theme: Theme,

    // Brushes (the linked cross-filter)
    gdp_brush: BrushInput,
    life_brush: BrushInput,
    scatter_gdp: BrushInput,
    scatter_life: BrushInput,

    // Loaded data
    loaded: Option<Loaded>,

    // UI state
    is_loading: bool,
    is_rendering: bool,
    status_message: String,
    error_message: String,

    // Background operations
    load_receiver: Option<mpsc::Receiver<LoadResult>>,
    render_receiver: Option<mpsc::Receiver<OperationResult>>,
}

impl ChwApp {
    fn new() -> Self {
        let home_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .to_string_lossy()
            .to_string();

        Self {
            data_path: String::new(),
            population_path: String::new(),
            geojson_path: String::new(),

            output_path: home_dir,
            attribute: Attribute::Gdp,
            country: String::new(),
            year: 0,
            theme: Theme::Light,

            gdp_brush: BrushInput::default(),
            life_brush: BrushInput::default(),
            scatter_gdp: BrushInput::default(),
            scatter_life: BrushInput::default(),

            loaded: None,

            is_loading: false,
            is_rendering: false,
            status_message: String::new(),
            error_message: String::new(),

            load_receiver: None,
            render_receiver: None,
        }
    }

    fn coordinator(&self) -> BrushCoordinator {
        build_coordinator(
            self.gdp_brush,
            self.life_brush,
            self.scatter_gdp,
            self.scatter_life,
        )
    }

    fn start_load(&mut self) {
        if self.data_path.trim().is_empty() {
            self.error_message = "Please choose the health/wealth CSV file".to_string();
            return;
        }
        self.is_loading = true;
        self.error_message.clear();
        self.status_message = "Loading data...".to_string();

        let (sender, receiver) = mpsc::channel();
        self.load_receiver = Some(receiver);

        let data_path = self.data_path.clone();
        let population_path = self.population_path.clone();
        let geojson_path = self.geojson_path.clone();

        thread::spawn(move || {
            let result = perform_load(&data_path, &population_path, &geojson_path);
            let _ = sender.send(result);
        });
    }

    fn start_render(&mut self) {
        let Some(loaded) = self.loaded.as_ref() else {
            self.error_message = "Load data first".to_string();
            return;
        };
        if self.output_path.trim().is_empty() {
            self.error_message = "Please specify an output directory".to_string();
            return;
        }
        self.is_rendering = true;
        self.error_message.clear();
        self.status_message = "Rendering charts...".to_string();

        let (sender, receiver) = mpsc::channel();
        self.render_receiver = Some(receiver);

        let dataset = loaded.dataset.clone();
        let world = loaded.world.clone();
        let brushes = self.coordinator();
        let params = ViewParams {
            attribute: self.attribute,
            country: (!self.country.is_empty()).then(|| self.country.clone()),
            year: (self.year != 0).then_some(self.year),
            theme: self.theme,
        };
        let out_dir = PathBuf::from(self.output_path.clone());

        thread::spawn(move || {
            let _ = std::fs::create_dir_all(&out_dir);
            let result = match viz::render_all(&dataset, world.as_ref(), &params, &brushes, &out_dir)
            {
                Ok(paths) => {
                    let list = paths
                        .iter()
                        .map(|p| p.to_string_lossy().to_string())
                        .collect::<Vec<_>>()
                        .join("\n");
                    OperationResult::Success(format!("Charts written:\n{list}"))
                }
                Err(err) => OperationResult::Error(format!("Failed to render charts: {err}")),
            };
            let _ = sender.send(result);
        });
    }

    fn check_load_result(&mut self) {
        if let Some(receiver) = &self.load_receiver
            && let Ok(result) = receiver.try_recv()
        {
            self.is_loading = false;
            self.load_receiver = None;

            match result {
                LoadResult::Success(loaded) => {
                    self.status_message = format!(
                        "Loaded {} records across {} countries",
                        loaded.dataset.len(),
                        loaded.countries.len()
                    );
                    self.error_message.clear();

                    // Defaults: Canada when present, latest year, brushes
                    // seeded to the full extents.
                    self.country = if loaded.countries.iter().any(|c| c == "Canada") {
                        "Canada".to_string()
                    } else {
                        loaded.countries.first().cloned().unwrap_or_default()
                    };
                    self.year = loaded.years.last().copied().unwrap_or(0);
                    self.gdp_brush.seed(loaded.gdp_extent);
                    self.scatter_gdp.seed(loaded.gdp_extent);
                    self.life_brush.seed(loaded.life_extent);
                    self.scatter_life.seed(loaded.life_extent);
                    self.loaded = Some(*loaded);
                }
                LoadResult::Error(error) => {
                    self.error_message = error;
                    self.status_message.clear();
                }
            }
        }
    }

    fn check_render_result(&mut self) {
        if let Some(receiver) = &self.render_receiver
            && let Ok(result) = receiver.try_recv()
        {
            self.is_rendering = false;
            self.render_receiver = None;

            match result {
                OperationResult::Success(message) => {
                    self.status_message = message;
                    self.error_message.clear();
                }
                OperationResult::Error(error) => {
                    self.error_message = error;
                    self.status_message.clear();
                }
            }
        }
    }

    fn brush_row(ui: &mut egui::Ui, label: &str, brush: &mut BrushInput, speed: f64) {
        ui.horizontal(|ui| {
            ui.checkbox(&mut brush.active, label);
            if brush.active {
                ui.add(egui::DragValue::new(&mut brush.min).speed(speed));
                ui.label("to");
                ui.add(egui::DragValue::new(&mut brush.max).speed(speed));
            }
        });
    }
}

impl eframe::App for ChwApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for completed background operations
        self.check_load_result();
        self.check_render_result();

        // Request repaint while a background operation runs (spinner animation)
        if self.is_loading || self.is_rendering {
            ctx.request_repaint();
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Country Health & Wealth Explorer");
                ui.add_space(10.0);

                ui.group(|ui| {
                    ui.label("Input Files");
                    ui.add_space(5.0);

                    ui.horizontal(|ui| {
                        ui.label("Health/wealth CSV:");
                        ui.text_edit_singleline(&mut self.data_path);
                        if ui.button("Browse").clicked()
                            && let Some(path) = rfd::FileDialog::new().pick_file()
                        {
                            self.data_path = path.to_string_lossy().to_string();
                        }
                    });

                    ui.horizontal(|ui| {
                        ui.label("Population CSV:");
                        ui.text_edit_singleline(&mut self.population_path)
                            .on_hover_text("Optional per-country/year population file");
                        if ui.button("Browse").clicked()
                            && let Some(path) = rfd::FileDialog::new().pick_file()
                        {
                            self.population_path = path.to_string_lossy().to_string();
                        }
                    });

                    ui.horizontal(|ui| {
                        ui.label("World GeoJSON:");
                        ui.text_edit_singleline(&mut self.geojson_path)
                            .on_hover_text("Optional; required for the choropleth map");
                        if ui.button("Browse").clicked()
                            && let Some(path) = rfd::FileDialog::new().pick_file()
                        {
                            self.geojson_path = path.to_string_lossy().to_string();
                        }
                    });

                    ui.horizontal(|ui| {
                        if ui
                            .add_enabled(!self.is_loading, egui::Button::new("Load Data"))
                            .clicked()
                        {
                            self.start_load();
                        }
                        if self.is_loading {
                            ui.spinner();
                            ui.label("Loading...");
                        }
                    });
                });

                ui.add_space(10.0);

                if self.loaded.is_some() {
                    ui.group(|ui| {
                        ui.label("View Controls");
                        ui.add_space(5.0);

                        ui.horizontal(|ui| {
                            ui.label("Map attribute:");
                            egui::ComboBox::from_id_salt("attribute")
                                .selected_text(self.attribute.label())
                                .show_ui(ui, |ui| {
                                    for attr in Attribute::ALL {
                                        ui.selectable_value(
                                            &mut self.attribute,
                                            attr,
                                            attr.label(),
                                        );
                                    }
                                });
                        });

                        if let Some(loaded) = self.loaded.as_ref() {
                            ui.horizontal(|ui| {
                                ui.label("Country:");
                                egui::ComboBox::from_id_salt("country")
                                    .selected_text(self.country.as_str())
                                    .show_ui(ui, |ui| {
                                        for name in &loaded.countries {
                                            ui.selectable_value(
                                                &mut self.country,
                                                name.clone(),
                                                name.as_str(),
                                            );
                                        }
                                    });
                            });

                            ui.horizontal(|ui| {
                                ui.label("Year:");
                                egui::ComboBox::from_id_salt("year")
                                    .selected_text(self.year.to_string())
                                    .show_ui(ui, |ui| {
                                        for year in &loaded.years {
                                            ui.selectable_value(
                                                &mut self.year,
                                                *year,
                                                year.to_string(),
                                            );
                                        }
                                    });
                            });
                        }

                        ui.horizontal(|ui| {
                            ui.label("Theme:");
                            ui.radio_value(&mut self.theme, Theme::Light, "Light");
                            ui.radio_value(&mut self.theme, Theme::Dark, "Dark");
                            ui.radio_value(&mut self.theme, Theme::Muted, "Muted");
                        });
                    });

                    ui.add_space(10.0);

                    ui.group(|ui| {
                        ui.label("Brushes");
                        ui.add_space(5.0);

                        Self::brush_row(ui, "GDP histogram", &mut self.gdp_brush, 500.0);
                        Self::brush_row(ui, "Life histogram", &mut self.life_brush, 0.5);
                        Self::brush_row(ui, "Scatter GDP axis", &mut self.scatter_gdp, 500.0);
                        Self::brush_row(ui, "Scatter life axis", &mut self.scatter_life, 0.5);

                        if ui.button("Clear all brushes").clicked() {
                            self.gdp_brush.active = false;
                            self.life_brush.active = false;
                            self.scatter_gdp.active = false;
                            self.scatter_life.active = false;
                        }

                        let brushes = build_coordinator(
                            self.gdp_brush,
                            self.life_brush,
                            self.scatter_gdp,
                            self.scatter_life,
                        );
                        if let Some(loaded) = self.loaded.as_ref() {
                            let year_records = loaded.dataset.for_year(self.year);
                            let selection = brushes.selection(&year_records);
                            if selection.is_all() {
                                ui.label(format!(
                                    "No brush active: all {} countries shown",
                                    year_records.len()
                                ));
                            } else {
                                ui.label(format!(
                                    "{} of {} countries selected",
                                    selection.count(year_records.len()),
                                    year_records.len()
                                ));
                            }
                        }
                    });

                    ui.add_space(10.0);

                    ui.group(|ui| {
                        ui.label("Output");
                        ui.add_space(5.0);

                        ui.horizontal(|ui| {
                            ui.label("Output path:");
                            ui.text_edit_singleline(&mut self.output_path);
                            if ui.button("Browse").clicked()
                                && let Some(path) = rfd::FileDialog::new().pick_folder()
                            {
                                self.output_path = path.to_string_lossy().to_string();
                            }
                        });

                        ui.horizontal(|ui| {
                            if ui
                                .add_enabled(!self.is_rendering, egui::Button::new("Render Charts"))
                                .clicked()
                            {
                                self.start_render();
                            }
                            if self.is_rendering {
                                ui.spinner();
                                ui.label("Rendering...");
                            }
                        });
                    });
                }

                ui.add_space(10.0);

                if !self.status_message.is_empty() {
                    ui.colored_label(egui::Color32::DARK_GREEN, &self.status_message);
                }
                if !self.error_message.is_empty() {
                    ui.colored_label(egui::Color32::RED, &self.error_message);
                }
            });
        });
    }
}

/// Brush state assembled from the panel inputs. The scatter region only
/// becomes active once both of its axes are.
fn build_coordinator(
    gdp: BrushInput,
    life: BrushInput,
    scatter_gdp: BrushInput,
    scatter_life: BrushInput,
) -> BrushCoordinator {
    let mut brushes = BrushCoordinator::new();
    brushes.update(
        BrushSource::GdpHistogram,
        gdp.range().map(|r| Brush::Interval(Attribute::Gdp, r)),
    );
    brushes.update(
        BrushSource::LifeHistogram,
        life.range()
            .map(|r| Brush::Interval(Attribute::LifeExpectancy, r)),
    );
    let region = match (scatter_gdp.range(), scatter_life.range()) {
        (Some(gdp), Some(life)) => Some(Brush::Region { gdp, life }),
        _ => None,
    };
    brushes.update(BrushSource::Scatterplot, region);
    brushes
}

fn perform_load(data_path: &str, population_path: &str, geojson_path: &str) -> LoadResult {
    let mut records = match dataset::load_records(data_path) {
        Ok(records) => records,
        Err(err) => return LoadResult::Error(format!("Failed to load data: {err}")),
    };
    if !population_path.trim().is_empty()
        && let Err(err) = dataset::merge_population(&mut records, population_path)
    {
        return LoadResult::Error(format!("Failed to load population: {err}"));
    }
    let world = if geojson_path.trim().is_empty() {
        None
    } else {
        match dataset::load_world(geojson_path) {
            Ok(world) => Some(world),
            Err(err) => return LoadResult::Error(format!("Failed to load boundaries: {err}")),
        }
    };

    let dataset = Dataset::new(records);
    let countries = dataset.countries();
    let years = dataset.years();
    let latest = dataset.latest_year().unwrap_or(0);
    let year_records = dataset.for_year(latest);
    let gdp_extent =
        chw_viz::viz::util::finite_extent(&year_records, Attribute::Gdp).unwrap_or((0.0, 0.0));
    let life_extent = chw_viz::viz::util::finite_extent(&year_records, Attribute::LifeExpectancy)
        .unwrap_or((0.0, 0.0));

    LoadResult::Success(Box::new(Loaded {
        dataset,
        world,
        countries,
        years,
        gdp_extent,
        life_extent,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chw_viz::Record;

    fn rec(code: &str, gdp: f64, life: f64) -> Record {
        Record {
            country: code.to_string(),
            code: code.to_string(),
            year: 2023,
            gdp,
            life_expectancy: life,
            population: None,
        }
    }

    #[test]
    fn inactive_inputs_build_an_empty_coordinator() {
        let brushes = build_coordinator(
            BrushInput::default(),
            BrushInput::default(),
            BrushInput::default(),
            BrushInput::default(),
        );
        assert!(brushes.is_clear());
        assert!(brushes.selection(&[rec("A", 1.0, 50.0)]).is_all());
    }

    #[test]
    fn scatter_region_needs_both_axes() {
        let gdp_only = BrushInput {
            active: true,
            min: 0.0,
            max: 100.0,
        };
        let brushes = build_coordinator(
            BrushInput::default(),
            BrushInput::default(),
            gdp_only,
            BrushInput::default(),
        );
        assert!(brushes.is_clear());
    }

    #[test]
    fn active_brush_filters_the_selection() {
        let gdp = BrushInput {
            active: true,
            min: 10.0,
            max: 20.0,
        };
        let brushes = build_coordinator(
            gdp,
            BrushInput::default(),
            BrushInput::default(),
            BrushInput::default(),
        );
        let records = vec![rec("IN", 15.0, 50.0), rec("OUT", 25.0, 50.0)];
        let selection = brushes.selection(&records);
        assert!(selection.contains("IN"));
        assert!(!selection.contains("OUT"));
    }
}
