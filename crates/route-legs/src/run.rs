use crate::settings::{OutputFormat, Settings};
use route_legs_lib::magnetic::FixedDeclination;
use route_legs_lib::report::{self, ReportOptions};
use route_legs_lib::{
    Epoch, LegResult, MagneticModel, RouteError, RoutePlanner, Wgs84Geodesic,
    WorldMagneticModel, source,
};
use serde::Serialize;
use std::io::Write;

/// Failures of a run
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Route(#[from] RouteError),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write report: {0}")]
    Output(#[from] std::io::Error),

    #[error(
        "Date {year:.4} is outside the {model} domain [{start:.1}, {end:.1}); pass --model with a \
         current WMM .COF file (or set ROUTE_LEGS_MODEL), or --extrapolate"
    )]
    ModelExpired {
        model: String,
        year: f64,
        start: f64,
        end: f64,
    },
}

type DynModel = Box<dyn MagneticModel + Send + Sync>;

#[derive(Serialize)]
struct JsonLeg<'a> {
    #[serde(flatten)]
    leg: &'a LegResult,
    distance_nm: f64,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    date: &'a str,
    epoch: Epoch,
    magnetic_model: &'a str,
    legs: Vec<JsonLeg<'a>>,
    total_distance_m: f64,
    total_distance_nm: f64,
}

/// Select the magnetic model from the settings, returning it with a display name
///
/// Without a model file, a date outside the embedded model's window fails before any leg.
fn magnetic_model(settings: &Settings, epoch: Epoch) -> Result<(DynModel, String), AppError> {
    if let Some(declination) = settings.declination {
        tracing::info!("Using fixed declination {declination}°");
        return Ok((
            Box::new(FixedDeclination(declination)),
            format!("fixed {declination}"),
        ));
    }

    let model = match &settings.model {
        Some(path) => WorldMagneticModel::from_cof_file(path)?,
        None => {
            let embedded = WorldMagneticModel::wmm2020()?;
            let (start, end) = embedded.validity();
            let year = epoch.decimal_year();
            if !settings.extrapolate && !(start..end).contains(&year) {
                return Err(AppError::ModelExpired {
                    model: embedded.name().to_string(),
                    year,
                    start,
                    end,
                });
            }
            embedded
        }
    }
    .with_extrapolation(settings.extrapolate);
    let name = model.name().to_string();
    Ok((Box::new(model), name))
}

/// Compute every leg of the configured route
pub fn compute(settings: &Settings) -> Result<(Epoch, String, Vec<LegResult>), AppError> {
    let epoch = Epoch::parse(&settings.date)?;
    tracing::info!("Date {} is epoch {epoch}", settings.date);

    let route = source::load_route(&settings.route_file)?;
    let (model, model_name) = magnetic_model(settings, epoch)?;
    let planner = RoutePlanner::new(settings.planner_config(), Wgs84Geodesic, model);

    let legs = if settings.parallel {
        planner.compute_route_parallel(route.waypoints(), epoch)?
    } else {
        planner.compute_route(route.waypoints(), epoch)?
    };
    Ok((epoch, model_name, legs))
}

fn render_json(
    settings: &Settings,
    epoch: Epoch,
    model_name: &str,
    legs: &[LegResult],
    options: &ReportOptions,
) -> Result<String, serde_json::Error> {
    let total_distance_m: f64 = legs.iter().map(|leg| leg.distance_m).sum();
    let document = JsonReport {
        date: &settings.date,
        epoch,
        magnetic_model: model_name,
        legs: legs
            .iter()
            .map(|leg| JsonLeg {
                leg,
                distance_nm: leg.distance_nm(options.meters_per_nautical_mile),
            })
            .collect(),
        total_distance_m,
        total_distance_nm: total_distance_m / options.meters_per_nautical_mile,
    };
    let mut text = serde_json::to_string_pretty(&document)?;
    text.push('\n');
    Ok(text)
}

/// Compute the route and write the report to `out`
///
/// Nothing is written unless every leg succeeded.
pub fn run<W: Write>(settings: &Settings, mut out: W) -> Result<(), AppError> {
    let (epoch, model_name, legs) = compute(settings)?;
    let options = settings.report_options();

    match settings.format {
        OutputFormat::Text => report::write_report(out, &legs, &options)?,
        OutputFormat::Json => {
            let text = render_json(settings, epoch, &model_name, &legs, &options)?;
            out.write_all(text.as_bytes())?;
            out.flush()?;
        }
    }
    Ok(())
}
