//! demos/plot_tower.rs
//!
//! Fetches one day of 15-minute data for tower TA-54 and plots wind speed with
//! direction, then the temperature at the lowest sensor level.
//!
//! To run this demo:
//! cargo run --example plot_tower --features plotting

use std::error::Error;

use plotlars::{Axis, AxisSide, Legend, Line, Plot, Rgb, Text, TimeSeriesPlot};
use polars::prelude::*;
use weathermachine::{TimeRange, WeatherMachine};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    println!("Requesting tower data from the LANL weather machine...");

    let client = WeatherMachine::new().await?;
    let range = TimeRange::new((2017, 3, 1), (2017, 3, 2))?;

    let tower_data: DataFrame = client
        .request()
        .station("ta54")
        .keys(&["spd1", "dir1", "temp0"])
        .range(range)
        .call()
        .await?
        .to_lazy_frame()?
        .get_range(range.start(), range.end())?
        .frame
        .collect()?;

    println!("Generating plots for {range}...");
    plot_wind(&tower_data);
    plot_temperature(&tower_data);
    println!("Plots shown in browser.");

    Ok(())
}

/// Wind speed on the left axis, direction on the right.
fn plot_wind(data: &DataFrame) {
    TimeSeriesPlot::builder()
        .data(data)
        .x("datetime")
        .y("spd1")
        .additional_series(vec!["dir1"])
        .size(6)
        .colors(vec![Rgb(69, 157, 230), Rgb(235, 117, 0)])
        .lines(vec![Line::Solid, Line::Dot])
        .plot_title(Text::from("TA-54 wind").font("Arial").size(18))
        .legend(&Legend::new().x(0.05).y(0.9))
        .x_title("time")
        .y_title(Text::from("speed (m/s)").color(Rgb(0, 0, 0)))
        .y_title2(Text::from("direction (deg)").color(Rgb(0, 0, 0)))
        .y_axis(&Axis::new().value_color(Rgb(0, 0, 0)).show_grid(false))
        .y_axis2(
            &Axis::new()
                .axis_side(AxisSide::Right)
                .value_color(Rgb(0, 0, 0))
                .show_grid(false),
        )
        .build()
        .plot();
}

fn plot_temperature(data: &DataFrame) {
    TimeSeriesPlot::builder()
        .data(data)
        .x("datetime")
        .y("temp0")
        .size(6)
        .colors(vec![Rgb(235, 117, 0)])
        .plot_title(Text::from("TA-54 temperature").font("Arial").size(18))
        .x_title("time")
        .y_title(Text::from("deg F").color(Rgb(0, 0, 0)))
        .build()
        .plot();
}
